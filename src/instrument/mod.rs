//! Driving the external instrumenter over the target images

mod driver;
mod invocation;

pub use driver::instrument_target;
pub use driver::instrument_targets;
pub use driver::TARGETS;
pub use invocation::Invocation;
