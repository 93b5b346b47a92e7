//! Error types for netlink and CLI argument handling.

use std::io;

use crate::util::parse::ParseError;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the DPLL netlink family or
/// while turning command-line tokens into a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Generic netlink family not found.
    #[error("GENL family not found: {name}")]
    FamilyNotFound {
        /// The family name that was not found.
        name: String,
    },

    /// Reply message carries no id attribute for the entity.
    #[error("reply carries no {0} id")]
    MissingId(&'static str),

    /// A keyword was given without its value.
    #[error("{keyword} requires an argument")]
    MissingArgument {
        /// The keyword missing its value.
        keyword: String,
    },

    /// A required keyword was absent from the command line.
    #[error("{keyword} is required")]
    RequiredAttribute {
        /// The keyword that must be supplied.
        keyword: String,
    },

    /// A value failed its type conversion or enum lookup.
    #[error("invalid {what}: {value}")]
    InvalidArgument {
        /// What was being parsed.
        what: String,
        /// The offending value.
        value: String,
    },

    /// Unrecognised keyword in an argument list.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Unrecognised object or verb.
    #[error("command \"{0}\" not found")]
    UnknownCommand(String),

    /// Parse error from util parsing functions.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Create a kernel error from an errno value as carried in a netlink
    /// error message (negative).
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV, etc.).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } => matches!(*errno, libc::ENOENT | libc::ENODEV),
            Self::FamilyNotFound { .. } => true,
            _ => false,
        }
    }

    /// True for errors caused by the command line rather than the kernel
    /// or the transport.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument { .. }
                | Self::RequiredAttribute { .. }
                | Self::InvalidArgument { .. }
                | Self::UnknownOption(_)
                | Self::UnknownCommand(_)
                | Self::Parse(_)
        )
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}
