use camino::Utf8PathBuf;
use clap::Args as ClapArgs;
use color_eyre::eyre::{Result, WrapErr};
use swapgen::{Paths, Pipeline};

use super::ConfigArgs;

#[derive(ClapArgs, Debug, Default)]
pub struct Args {
    /// Header d'entrée (défaut: squashfs_fs.h)
    #[arg(long, short)]
    pub input: Option<Utf8PathBuf>,

    /// Fragment des déclarations (défaut: swap.h.inc)
    #[arg(long)]
    pub decls: Option<Utf8PathBuf>,

    /// Fragment des définitions (défaut: swap.c.inc)
    #[arg(long)]
    pub defs: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl Args {
    fn paths(&self) -> Paths {
        let d = Paths::default();
        Paths {
            input: self.input.clone().unwrap_or(d.input),
            declarations: self.decls.clone().unwrap_or(d.declarations),
            definitions: self.defs.clone().unwrap_or(d.definitions),
        }
    }
}

pub fn exec(args: Args) -> Result<()> {
    let cfg = args.config.load()?;
    let paths = args.paths();
    let report = Pipeline::new(cfg)
        .run(&paths)
        .wrap_err_with(|| format!("génération depuis {}", paths.input))?;
    for d in report.warnings() {
        log::warn!("{}: {d}", paths.input);
    }
    Ok(())
}
