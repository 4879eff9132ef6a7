//! Unified error handling for slbnc-admin.
//!
//! Console errors are always recovered locally: each one renders as a single
//! reply line. Only the host and store layers produce errors that reach the
//! binary.

use thiserror::Error;

// ============================================================================
// Console Errors (dispatch)
// ============================================================================

/// Errors produced while dispatching a console line.
///
/// The `Display` text is exactly what the user sees after the `Error: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    #[error("unknown (or ambiguous) network or channel")]
    AmbiguousTarget,

    #[error("unknown network")]
    UnknownNetwork,

    #[error("unknown channel")]
    UnknownChannel,

    #[error("access denied")]
    AccessDenied,

    #[error("unknown variable")]
    UnknownVariable,

    #[error("unknown command")]
    UnknownCommand,

    /// Missing required argument; carries the command syntax.
    #[error("{0}")]
    Usage(String),

    /// Setter-specific rejection (limits, unknown enumerated values, ...).
    #[error("{0}")]
    Validation(String),

    #[error("reset not supported")]
    ResetUnsupported,
}

impl ConsoleError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTarget(_) => "unknown_target",
            Self::AmbiguousTarget => "ambiguous_target",
            Self::UnknownNetwork => "unknown_network",
            Self::UnknownChannel => "unknown_channel",
            Self::AccessDenied => "access_denied",
            Self::UnknownVariable => "unknown_variable",
            Self::UnknownCommand => "unknown_command",
            Self::Usage(_) => "usage",
            Self::Validation(_) => "validation",
            Self::ResetUnsupported => "reset_unsupported",
        }
    }

    /// Render the error as a console reply line.
    pub fn to_reply_line(&self) -> String {
        match self {
            Self::Usage(syntax) => format!("Usage: {}", syntax),
            other => format!("Error: {}", other),
        }
    }
}

/// Address resolution failures.
///
/// These are distinct from "not routable": a token that matches nothing is
/// not an error, it simply isn't addressed to the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("unknown target '{0}'")]
    UnknownTarget(String),

    #[error("unknown (or ambiguous) network or channel")]
    Ambiguous,

    #[error("unknown network")]
    UnknownNetwork,

    #[error("unknown channel")]
    UnknownChannel,
}

impl From<AddressError> for ConsoleError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::UnknownTarget(token) => Self::UnknownTarget(token),
            AddressError::Ambiguous => Self::AmbiguousTarget,
            AddressError::UnknownNetwork => Self::UnknownNetwork,
            AddressError::UnknownChannel => Self::UnknownChannel,
        }
    }
}

// ============================================================================
// Host State Errors (bouncer configuration file)
// ============================================================================

/// Errors loading or writing the bouncer configuration file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("no configuration file")]
    NoConfigFile,

    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bouncer config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize bouncer config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ============================================================================
// Store Errors (persisted console settings)
// ============================================================================

/// Errors from the persisted key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store database error: {0}")]
    Database(String),
}
