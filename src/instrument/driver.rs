//! Sequential, fail-fast instrumentation of the target images

use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::client::ClientVariant;
use crate::digest::hash_file;
use crate::error::InstrumentError;

use super::invocation::Invocation;

/// Images rewritten in a staged Chrome installation
pub const TARGETS: &[&str] = &["chrome.dll"];

/// Instrument every target in order, stopping at the first failure
pub fn instrument_targets(
    instrument_exe: &Path,
    input_dir: &Path,
    output_dir: &Path,
    client: &ClientVariant,
    targets: &[&str],
) -> Result<(), InstrumentError> {
    for target in targets {
        instrument_target(instrument_exe, input_dir, output_dir, client, target)?;
    }
    Ok(())
}

/// Rewrite `input_dir/target` into `output_dir/target`.
///
/// The original image is always read from `input_dir`; the staged copy in
/// `output_dir` is replaced.
pub fn instrument_target(
    instrument_exe: &Path,
    input_dir: &Path,
    output_dir: &Path,
    client: &ClientVariant,
    target: &str,
) -> Result<(), InstrumentError> {
    info!("Instrumenting \"{}\".", target);

    let input_image = input_dir.join(target);
    if !input_image.is_file() {
        return Err(InstrumentError::MissingTarget {
            target: target.to_string(),
            path: input_image,
        });
    }
    let output_image = output_dir.join(target);

    let invocation = Invocation::new(
        instrument_exe,
        &input_image,
        &output_image,
        client,
        output_dir,
    );
    debug!(args = ?invocation.args(), "Running {}.", instrument_exe.display());

    let status = invocation.run()?;
    if !status.success() {
        return Err(InstrumentError::ToolFailed {
            target: target.to_string(),
            status,
        });
    }

    check_rewritten(target, &input_image, &output_image);
    Ok(())
}

fn check_rewritten(target: &str, input_image: &Path, output_image: &Path) {
    let (before, after) = match (hash_file(input_image), hash_file(output_image)) {
        (Ok(before), Ok(after)) => (before, after),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Could not digest \"{}\" after instrumenting: {}", target, e);
            return;
        }
    };

    debug!(%before, %after, "Digests for \"{}\".", target);
    if before == after {
        warn!("Instrumenter left \"{}\" unchanged.", target);
    }
}
