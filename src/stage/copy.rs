//! File copying for staging
//!
//! The installation tree is enumerated with `glob` and mirrored file by file.
//! Handles are opened per file and closed before the next one is touched.

use std::fs;
use std::fs::File;
use std::fs::FileTimes;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::error::InstrumentError;

/// Mirror the installation tree under `input_dir` into `output_dir`.
///
/// Directories are recreated and every file is copied, overwriting whatever
/// is already at the destination. Returns the number of files copied.
pub fn copy_browser_files(input_dir: &Path, output_dir: &Path) -> Result<usize, InstrumentError> {
    let metadata = fs::metadata(input_dir)?;
    if !metadata.is_dir() {
        return Err(InstrumentError::InvalidPath(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }

    let root = input_dir.to_str().ok_or_else(|| {
        InstrumentError::InvalidPath(format!("{} is not valid UTF-8", input_dir.display()))
    })?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(root));

    fs::create_dir_all(output_dir)?;

    let mut copied = 0;
    for entry in glob::glob(&pattern)? {
        let source = entry?;
        let relative = source.strip_prefix(input_dir).map_err(|_| {
            InstrumentError::InvalidPath(format!(
                "{} is outside {}",
                source.display(),
                input_dir.display()
            ))
        })?;
        let destination = output_dir.join(relative);

        if source.is_dir() {
            fs::create_dir_all(&destination)?;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("Copying \"{}\".", relative.display());
        fs::copy(&source, &destination)?;
        copied += 1;
    }

    Ok(copied)
}

/// Copy a single library into `output_dir`, keeping its timestamps.
///
/// The copy gets the source's access and modification times (and creation
/// time on Windows). If the library already lives in `output_dir` it is left
/// untouched. Returns the path of the copy.
pub fn copy_client_library(library: &Path, output_dir: &Path) -> Result<PathBuf, InstrumentError> {
    let name = library.file_name().ok_or_else(|| {
        InstrumentError::InvalidPath(format!("{} has no file name", library.display()))
    })?;
    let destination = output_dir.join(name);

    // Copying a file onto itself truncates it.
    if destination.exists() && fs::canonicalize(library)? == fs::canonicalize(&destination)? {
        debug!("\"{}\" is already in place.", destination.display());
        return Ok(destination);
    }

    fs::copy(library, &destination)?;

    let metadata = fs::metadata(library)?;
    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    #[cfg(windows)]
    let times = {
        use std::os::windows::fs::FileTimesExt;
        times.set_created(metadata.created()?)
    };

    // Windows needs write access to change times; unix only needs ownership.
    #[cfg(windows)]
    let file = File::options().write(true).open(&destination)?;
    #[cfg(not(windows))]
    let file = File::open(&destination)?;
    file.set_times(times)?;

    Ok(destination)
}
