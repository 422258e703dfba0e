use std::process::ExitCode;

use clap::Parser;

use self::arg::Args;

mod arg;
mod fetch;
mod logging;
mod model;

pub fn run() -> ExitCode {
    match run_impl() {
        Ok(exit_code) => exit_code,
        Err(error) => {
            tracing::error!(?error);
            eprintln!("{:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run_impl() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    self::logging::set_up_logging(args.log_level, args.log_file.as_deref(), args.log_json)?;

    self::fetch::fetch(&args)?;

    Ok(ExitCode::SUCCESS)
}
