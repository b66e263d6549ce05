use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, CommandFactory};
use clap_mangen::Man;
use color_eyre::eyre::Result;

use super::write_or_print;

#[derive(ClapArgs, Debug, Default)]
pub struct Args {
    /// Fichier de sortie, ex. swapgen.1 (stdout si omis)
    #[arg(long, short)]
    pub out: Option<Utf8PathBuf>,
}

pub fn exec(args: Args) -> Result<()> {
    let mut buf = Vec::new();
    Man::new(crate::Cli::command()).render(&mut buf)?;
    write_or_print(args.out.as_deref(), &String::from_utf8_lossy(&buf))
}
