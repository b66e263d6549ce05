//! Orchestration fichier : header en entrée, deux fragments en sortie.

use std::io::{self, BufReader, BufWriter};

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scanner::{scan, ScanReport};
use crate::util::fs;

/// Chemins d'une génération.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub input: Utf8PathBuf,
    pub declarations: Utf8PathBuf,
    pub definitions: Utf8PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            input: "squashfs_fs.h".into(),
            declarations: "swap.h.inc".into(),
            definitions: "swap.c.inc".into(),
        }
    }
}

/// Orchestrateur principal
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    cfg: Config,
}

impl Pipeline {
    pub const fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    pub const fn config(&self) -> &Config {
        &self.cfg
    }

    /// Génère les deux fragments. En cas d'échec du scan, les sorties
    /// partiellement écrites sont supprimées.
    pub fn run(&self, paths: &Paths) -> Result<ScanReport> {
        self.cfg.validate()?;
        let input = fs::open(&paths.input).map_err(|e| Error::io(&paths.input, e))?;
        let decls = fs::create(&paths.declarations).map_err(|e| Error::io(&paths.declarations, e))?;
        let defs = match fs::create(&paths.definitions) {
            Ok(f) => f,
            Err(e) => {
                fs::remove_quiet(&paths.declarations);
                return Err(Error::io(&paths.definitions, e));
            }
        };

        let res = scan(&self.cfg, BufReader::new(input), BufWriter::new(decls), BufWriter::new(defs));
        match res {
            Ok(report) => {
                log::info!(
                    "{}: {} structure(s), {} champ(s) convertis → {}, {}",
                    paths.input,
                    report.records.len(),
                    report.fields_converted(),
                    paths.declarations,
                    paths.definitions,
                );
                Ok(report)
            }
            Err(e) => {
                fs::remove_quiet(&paths.declarations);
                fs::remove_quiet(&paths.definitions);
                Err(e)
            }
        }
    }

    /// Scan à blanc : rien n'est écrit, seul le bilan est retourné.
    pub fn check(&self, input: &Utf8Path) -> Result<ScanReport> {
        let f = fs::open(input).map_err(|e| Error::io(input, e))?;
        scan(&self.cfg, BufReader::new(f), io::sink(), io::sink())
    }
}
