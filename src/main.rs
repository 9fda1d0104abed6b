use clap::Parser;
use filesort::cli::{Cli, VERSION, run_cli};
use filesort::logging;
use filesort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", VERSION);
        return ExitCode::SUCCESS;
    }

    logging::init();

    match run_cli(&cli.dir, cli.dry_run) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
