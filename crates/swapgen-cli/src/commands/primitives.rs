use camino::Utf8PathBuf;
use clap::Args as ClapArgs;
use color_eyre::eyre::Result;
use swapgen::primitives;

use super::{write_or_print, ConfigArgs};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Émettre les prototypes (swap.h) au lieu des définitions (swap.c)
    #[arg(long)]
    pub header: bool,

    /// Fichier de sortie (stdout si omis)
    #[arg(long, short)]
    pub out: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn exec(args: Args) -> Result<()> {
    let cfg = args.config.load()?;
    let text = if args.header {
        primitives::render_header(&cfg)
    } else {
        primitives::render_source(&cfg)
    };
    write_or_print(args.out.as_deref(), &text)
}
