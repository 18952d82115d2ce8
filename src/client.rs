//! Call-trace client library variants

use std::fmt;
use std::str::FromStr;

/// File name of the call-trace client used in the normal workflow
pub const CALL_TRACE_CLIENT_DLL: &str = "call_trace_client.dll";

/// File name of the hierarchical profiler client
pub const PROFILE_CLIENT_DLL: &str = "profile_client.dll";

/// The runtime library the instrumented image will call into.
///
/// Each variant knows the extra flags the instrumenter needs for it, so the
/// invocation builder never has to compare library names itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientVariant {
    /// `call_trace_client.dll`
    #[default]
    CallTrace,
    /// `profile_client.dll`; interior references must not be instrumented
    Profile,
    /// Any other client library, passed through by name
    Custom(String),
}

impl ClientVariant {
    /// Classify a client library by its file name
    pub fn from_name(name: &str) -> Self {
        match name {
            CALL_TRACE_CLIENT_DLL => ClientVariant::CallTrace,
            PROFILE_CLIENT_DLL => ClientVariant::Profile,
            other => ClientVariant::Custom(other.to_string()),
        }
    }

    /// File name of the client library
    pub fn library_name(&self) -> &str {
        match self {
            ClientVariant::CallTrace => CALL_TRACE_CLIENT_DLL,
            ClientVariant::Profile => PROFILE_CLIENT_DLL,
            ClientVariant::Custom(name) => name,
        }
    }

    /// Flags appended to the instrumenter command line for this client
    pub fn extra_flags(&self) -> &'static [&'static str] {
        match self {
            ClientVariant::Profile => &["--no-interior-refs"],
            ClientVariant::CallTrace | ClientVariant::Custom(_) => &[],
        }
    }
}

impl FromStr for ClientVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("client library name must not be empty".to_string());
        }
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for ClientVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.library_name())
    }
}
