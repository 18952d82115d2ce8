//! Staging of a clean Chrome installation into the output directory

mod copy;

pub use copy::copy_browser_files;
pub use copy::copy_client_library;
