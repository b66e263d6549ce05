use std::fs;
use std::io;

use camino::Utf8Path;

pub fn ensure_parent(p: &Utf8Path) -> io::Result<()> {
    if let Some(dir) = p.parent() {
        if !dir.as_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

pub fn open(p: &Utf8Path) -> io::Result<fs::File> {
    fs::File::open(p)
}

pub fn create(p: &Utf8Path) -> io::Result<fs::File> {
    ensure_parent(p)?;
    fs::File::create(p)
}

/// Nettoyage best-effort (un fragment partiel ne doit pas survivre à un échec).
pub fn remove_quiet(p: &Utf8Path) {
    if let Err(e) = fs::remove_file(p) {
        log::debug!("suppression de {p} impossible: {e}");
    }
}
