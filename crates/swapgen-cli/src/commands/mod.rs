pub mod check;
pub mod completions;
pub mod gen;
pub mod man;
pub mod primitives;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args as ClapArgs;
use color_eyre::eyre::{Result, WrapErr};
use swapgen::config::DEFAULT_CONFIG_FILE;
use swapgen::{BitWidth, CliOverrides, Config};

/// Options de configuration partagées par `gen`, `check` et `primitives`.
#[derive(ClapArgs, Debug, Default)]
pub struct ConfigArgs {
    /// Fichier de configuration (défaut: ./swapgen.toml s'il existe)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Préfixe des structures reconnues (défaut: squashfs_)
    #[arg(long)]
    pub struct_prefix: Option<String>,

    /// Préfixe des fonctions générées (défaut: sqfs_swapin_)
    #[arg(long)]
    pub function_prefix: Option<String>,

    /// Préfixe des primitives de swap (défaut: sqfs_swapin)
    #[arg(long)]
    pub primitive_prefix: Option<String>,

    /// Nom du paramètre pointeur (défaut: s)
    #[arg(long)]
    pub param: Option<String>,

    /// Largeurs converties, ex. 16,32,64
    #[arg(long, value_delimiter = ',')]
    pub widths: Vec<BitWidth>,
}

impl ConfigArgs {
    /// defaults → TOML → ENV → flags.
    pub fn load(&self) -> Result<Config> {
        let file = match &self.config {
            Some(p) => Some(p.clone()),
            None => Some(Utf8PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        let mut cfg = match &file {
            Some(p) => {
                log::info!("configuration: {p}");
                Config::load(p)?
            }
            None => Config::default(),
        };
        cfg.apply_env();
        cfg.apply_cli_overrides(&self.overrides());
        cfg.validate().wrap_err("configuration refusée")?;
        Ok(cfg)
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            struct_prefix: self.struct_prefix.clone(),
            function_prefix: self.function_prefix.clone(),
            primitive_prefix: self.primitive_prefix.clone(),
            param: self.param.clone(),
            widths: (!self.widths.is_empty()).then(|| self.widths.clone()),
        }
    }
}

/// Écrit `text` dans `out` (dossiers parents créés) ou sur stdout.
pub fn write_or_print(out: Option<&Utf8Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(p) = path.parent().filter(|p| !p.as_str().is_empty()) {
                std::fs::create_dir_all(p).wrap_err_with(|| format!("création de {p}"))?;
            }
            std::fs::write(path, text).wrap_err_with(|| format!("écriture de {path}"))?;
            println!("{path}");
        }
        None => print!("{text}"),
    }
    Ok(())
}
