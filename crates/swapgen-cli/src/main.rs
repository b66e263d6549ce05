use clap::{Parser, Subcommand};
use log::LevelFilter;

pub mod commands;

#[derive(Parser)]
#[command(name = "swapgen", version, about = "Génère les conversions little-endian des structures SquashFS", long_about = None)]
pub struct Cli {
    /// Verbosité (répéter pour plus de bruit ; RUST_LOG a priorité)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Générer swap.h.inc et swap.c.inc depuis le header (défaut)
    Gen(commands::gen::Args),

    /// Lister les structures et champs reconnus, sans rien écrire
    Check(commands::check::Args),

    /// Émettre la bibliothèque C des primitives de swap
    Primitives(commands::primitives::Args),

    /// Générer autocomplétions shell
    Completions(commands::completions::Args),

    /// Générer la page man
    Man(commands::man::Args),
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Verbosité
    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    match cli.cmd {
        None                      => commands::gen::exec(commands::gen::Args::default()),
        Some(Cmd::Gen(a))         => commands::gen::exec(a),
        Some(Cmd::Check(a))       => commands::check::exec(a),
        Some(Cmd::Primitives(a))  => commands::primitives::exec(a),
        Some(Cmd::Completions(a)) => commands::completions::exec(a),
        Some(Cmd::Man(a))         => commands::man::exec(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_means_gen() {
        let cli = Cli::try_parse_from(["swapgen"]).unwrap();
        assert!(cli.cmd.is_none());
    }

    #[test]
    fn gen_accepts_width_list() {
        let cli = Cli::try_parse_from(["swapgen", "-vv", "gen", "--widths", "16,64", "--input", "h.h"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Cmd::Gen(a)) = cli.cmd else { panic!("attendu gen") };
        assert_eq!(a.config.widths.len(), 2);
        assert_eq!(a.input.as_deref().map(camino::Utf8Path::as_str), Some("h.h"));
    }

    #[test]
    fn unknown_width_is_rejected() {
        assert!(Cli::try_parse_from(["swapgen", "gen", "--widths", "12"]).is_err());
    }
}
