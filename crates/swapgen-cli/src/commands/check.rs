use camino::Utf8PathBuf;
use clap::Args as ClapArgs;
use color_eyre::eyre::{Result, WrapErr};
use swapgen::{Pipeline, ScanReport, Severity};

use super::ConfigArgs;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Header à analyser
    #[arg(long, short, default_value = "squashfs_fs.h")]
    pub input: Utf8PathBuf,

    /// Afficher aussi les lignes ignorées dans les structures
    #[arg(long)]
    pub all: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn exec(args: Args) -> Result<()> {
    let cfg = args.config.load()?;
    let report = match Pipeline::new(cfg).check(&args.input) {
        Ok(report) => report,
        Err(e) => {
            if let Some(d) = e.diagnostic() {
                println!("{d}");
            }
            return Err(e).wrap_err_with(|| format!("analyse de {}", args.input));
        }
    };
    print!("{}", render(&report, args.all));
    Ok(())
}

fn render(report: &ScanReport, all: bool) -> String {
    let records = report.records.iter().map(|r| {
        format!(
            "{:>5}  {:<32} {:<40} {:>3} champ(s) {:>3} ignoré(s)\n",
            r.line, r.record_name, r.function_name, r.fields_converted, r.lines_skipped
        )
    });
    let diagnostics = report
        .diagnostics
        .iter()
        .filter(|d| all || d.severity != Severity::Info)
        .map(|d| format!("{d}\n"));
    let summary = format!(
        "{} structure(s), {} champ(s) convertis, {} ligne(s) lues\n",
        report.records.len(),
        report.fields_converted(),
        report.lines
    );
    records.chain(diagnostics).chain(std::iter::once(summary)).collect()
}
