//! Location of the external instrumenter and client libraries

use std::path::Path;
use std::path::PathBuf;

use crate::client::ClientVariant;
use crate::error::InstrumentError;

/// File name of the binary rewriting tool
pub const INSTRUMENT_EXE: &str = "instrument.exe";

/// Absolute paths to the prebuilt tools a run depends on
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub instrument_exe: PathBuf,
    pub client_library: PathBuf,
}

impl Toolchain {
    /// Find `instrument.exe` and the client library in `tool_dir`
    pub fn resolve(tool_dir: &Path, client: &ClientVariant) -> Result<Self, InstrumentError> {
        Ok(Self {
            instrument_exe: resolve_exe_path(tool_dir, INSTRUMENT_EXE)?,
            client_library: resolve_exe_path(tool_dir, client.library_name())?,
        })
    }
}

/// Resolve a prebuilt executable or library by name inside `tool_dir`
pub fn resolve_exe_path(tool_dir: &Path, name: &str) -> Result<PathBuf, InstrumentError> {
    let path = tool_dir.join(name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(InstrumentError::ToolNotFound {
            name: name.to_string(),
            path: tool_dir.to_path_buf(),
        })
    }
}
