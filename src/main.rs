use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use chrome_instrument::logging::init_logging;
use chrome_instrument::Config;
use chrome_instrument::Instrumenter;
use chrome_instrument::Options;

fn main() -> ExitCode {
    // Usage errors exit here through clap, before any file is touched.
    let options = Options::parse();
    let _logger = init_logging(options.verbose);

    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Instrumentation failed: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let config = Config::from_options(options)?;
    Instrumenter::new(config)?.run()?;
    Ok(())
}
