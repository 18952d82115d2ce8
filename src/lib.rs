//! chrome-instrument: stage and instrument a Chrome installation
//!
//! This library produces an instrumented copy of a Chrome installation for
//! benchmarking. The installation tree is mirrored into an output directory,
//! the call-trace client library is dropped next to it, and `instrument.exe`
//! rewrites each target image in place so that it calls into the client.
//!
//! The binary rewriting itself happens in the external tool; this crate only
//! stages files, builds the tool's command line and checks its exit status.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chrome_instrument::ClientVariant;
//! use chrome_instrument::Config;
//! use chrome_instrument::Instrumenter;
//!
//! let config = Config::new(
//!     Path::new("chrome"),
//!     Path::new("chrome-instrumented"),
//!     ClientVariant::Profile,
//!     Path::new("build/Release"),
//!     false,
//! )
//! .unwrap();
//!
//! Instrumenter::new(config).unwrap().run().unwrap();
//! ```

pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod instrument;
pub mod logging;
pub mod stage;
pub mod tools;

use tracing::info;

pub use client::ClientVariant;
pub use config::Config;
pub use config::Options;
pub use error::InstrumentError;
pub use instrument::Invocation;
pub use instrument::TARGETS;
pub use tools::Toolchain;

/// High-level driver for one instrumentation run
///
/// A run is not idempotent. If it fails part way, the output directory keeps
/// whatever was staged so far and the targets may still be uninstrumented
/// copies; re-running overwrites everything from scratch.
pub struct Instrumenter {
    config: Config,
    tools: Toolchain,
}

impl Instrumenter {
    /// Resolve the tools the run needs from the configured tool directory
    pub fn new(config: Config) -> Result<Self, InstrumentError> {
        let tools = Toolchain::resolve(&config.tool_dir, &config.client)?;
        Ok(Self { config, tools })
    }

    /// Get the run configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the resolved tool paths
    pub fn tools(&self) -> &Toolchain {
        &self.tools
    }

    /// Copy the installation and the client library into the output directory
    pub fn stage(&self) -> Result<(), InstrumentError> {
        info!(
            "Copying chrome files from \"{}\" to \"{}\".",
            self.config.input_dir.display(),
            self.config.output_dir.display()
        );
        let copied = stage::copy_browser_files(&self.config.input_dir, &self.config.output_dir)?;
        info!("Copied {} files.", copied);

        stage::copy_client_library(&self.tools.client_library, &self.config.output_dir)?;
        Ok(())
    }

    /// Rewrite every target image in the output directory
    pub fn instrument(&self) -> Result<(), InstrumentError> {
        instrument::instrument_targets(
            &self.tools.instrument_exe,
            &self.config.input_dir,
            &self.config.output_dir,
            &self.config.client,
            TARGETS,
        )
    }

    /// Stage, then instrument. Stops at the first failure.
    pub fn run(&self) -> Result<(), InstrumentError> {
        self.stage()?;
        self.instrument()
    }
}
