//! Command-line options and the validated run configuration

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;

use crate::client::ClientVariant;
use crate::client::CALL_TRACE_CLIENT_DLL;
use crate::error::InstrumentError;

const ABOUT: &str = "\
Copies the Chrome executables supplied in an input directory to an output
directory and instruments them at the destination. Leaves the instrumented
Chrome instance in the destination directory ready to use.";

/// Raw command-line surface
#[derive(Parser, Debug, Clone)]
#[command(name = "chrome-instrument", version, about = ABOUT)]
pub struct Options {
    /// Verbose logging.
    #[arg(long)]
    pub verbose: bool,

    /// The input directory where the original Chrome executables are to be found.
    #[arg(long, value_name = "DIR", value_parser = non_empty_path)]
    pub input_dir: PathBuf,

    /// The directory where the instrumented Chrome installation will be
    /// created. From this location, one can subsequently run benchmarks.
    #[arg(long, value_name = "DIR", value_parser = non_empty_path)]
    pub output_dir: PathBuf,

    /// The DLL to use as the call trace client DLL.
    #[arg(long, value_name = "NAME", default_value = CALL_TRACE_CLIENT_DLL)]
    pub client_dll: ClientVariant,

    /// Directory holding instrument.exe and the client DLLs; defaults to the
    /// directory of this executable.
    #[arg(long, value_name = "DIR", value_parser = non_empty_path)]
    pub tool_dir: Option<PathBuf>,
}

fn non_empty_path(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        Err("path must not be empty".to_string())
    } else {
        Ok(PathBuf::from(s))
    }
}

/// Validated configuration for one instrumentation run
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub client: ClientVariant,
    pub tool_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    /// Normalize parsed options into absolute paths
    pub fn from_options(options: Options) -> Result<Self, InstrumentError> {
        let tool_dir = match options.tool_dir {
            Some(dir) => dir,
            None => default_tool_dir()?,
        };

        Self::new(
            &options.input_dir,
            &options.output_dir,
            options.client_dll,
            &tool_dir,
            options.verbose,
        )
    }

    /// Build a configuration directly; all paths are made absolute
    pub fn new(
        input_dir: &Path,
        output_dir: &Path,
        client: ClientVariant,
        tool_dir: &Path,
        verbose: bool,
    ) -> Result<Self, InstrumentError> {
        let input_dir = std::path::absolute(input_dir)?;
        let output_dir = std::path::absolute(output_dir)?;
        let tool_dir = std::path::absolute(tool_dir)?;

        if resolve_path(&output_dir)?.starts_with(resolve_path(&input_dir)?) {
            return Err(InstrumentError::InvalidPath(format!(
                "output directory {} must not be inside input directory {}",
                output_dir.display(),
                input_dir.display()
            )));
        }

        Ok(Self {
            input_dir,
            output_dir,
            client,
            tool_dir,
            verbose,
        })
    }
}

/// Fold `.` and `..` the way the filesystem would.
///
/// Each existing prefix is canonicalized before the next component is applied,
/// so `..` after a symlink leaves the link target. Components below the first
/// missing directory are folded lexically.
fn resolve_path(path: &Path) -> std::io::Result<PathBuf> {
    let mut resolved = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(real) = resolved.canonicalize() {
                    resolved = real;
                }
            }
            Component::Prefix(_) | Component::RootDir => resolved.push(component),
        }
    }
    Ok(resolved)
}

fn default_tool_dir() -> Result<PathBuf, InstrumentError> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        InstrumentError::InvalidPath(format!("{} has no parent directory", exe.display()))
    })
}
