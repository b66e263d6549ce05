use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, CommandFactory};
use clap_complete::{generate, Shell};
use color_eyre::eyre::{Result, WrapErr};
use std::io;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Shell cible
    #[arg(long, value_enum)]
    pub shell: Shell,
    /// Dossier de sortie (stdout si omis)
    #[arg(long)]
    pub out_dir: Option<Utf8PathBuf>,
}

pub fn exec(args: Args) -> Result<()> {
    let mut cmd = crate::Cli::command();
    let bin = cmd.get_name().to_owned();

    match args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).wrap_err_with(|| format!("création de {dir}"))?;
            let path = dir.join(&bin);
            let mut f = std::fs::File::create(&path).wrap_err_with(|| format!("création de {path}"))?;
            generate(args.shell, &mut cmd, bin, &mut f);
            println!("{path}");
        }
        None => generate(args.shell, &mut cmd, bin, &mut io::stdout()),
    }
    Ok(())
}
