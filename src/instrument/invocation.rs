//! Command line construction for `instrument.exe`

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;

use crate::client::ClientVariant;
use crate::error::InstrumentError;

/// One run of the instrumenter over a single image
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Path to `instrument.exe`
    pub program: PathBuf,
    /// Original, uninstrumented image
    pub input_image: PathBuf,
    /// Where the instrumented image is written
    pub output_image: PathBuf,
    pub client: ClientVariant,
    /// Replace `output_image` if it exists
    pub overwrite: bool,
    /// Working directory of the child process
    pub working_dir: PathBuf,
}

impl Invocation {
    /// Build an overwriting invocation that runs inside `working_dir`
    pub fn new(
        program: &Path,
        input_image: &Path,
        output_image: &Path,
        client: &ClientVariant,
        working_dir: &Path,
    ) -> Self {
        Self {
            program: program.to_path_buf(),
            input_image: input_image.to_path_buf(),
            output_image: output_image.to_path_buf(),
            client: client.clone(),
            overwrite: true,
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// Arguments passed to the instrumenter, in order
    pub fn args(&self) -> Vec<OsString> {
        let mut args = vec![
            flag_with_path("--input-image=", &self.input_image),
            flag_with_path("--output-image=", &self.output_image),
            OsString::from(format!(
                "--call-trace-client={}",
                self.client.library_name()
            )),
        ];
        if self.overwrite {
            args.push(OsString::from("--overwrite"));
        }
        args.extend(self.client.extra_flags().iter().map(OsString::from));
        args
    }

    /// The process to spawn; stdio is inherited from the caller
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args()).current_dir(&self.working_dir);
        command
    }

    /// Spawn the instrumenter and block until it exits.
    ///
    /// The child is always waited on, so no process is left behind whether it
    /// succeeds, fails or is killed.
    pub fn run(&self) -> Result<ExitStatus, InstrumentError> {
        self.command()
            .status()
            .map_err(|source| InstrumentError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

fn flag_with_path(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path);
    arg
}
