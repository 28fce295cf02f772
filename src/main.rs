mod args;
mod survey;

use clap::Parser;
use log::{debug, error, LevelFilter};
use snafu::ErrorCompat;

use crate::args::Args;
use crate::survey::{run_survey, RunSettings};

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
    debug!("args: {:?}", args);

    let settings = RunSettings {
        config_path: args.config,
        reference_path: args.reference,
        summary_path: args.summary,
        sheet_path: args.out,
        input_path: args.input,
        input_type: args.input_type,
        chart_dir: args.chart_dir,
        excel_worksheet_name: args.excel_worksheet_name,
        dry_run: args.dry_run,
    };

    if let Err(e) = run_survey(&settings) {
        error!("An error occured: {}", e);
        for cause in e.iter_chain().skip(1) {
            error!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
