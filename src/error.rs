//! Error types.
//!
//! - `ProfileError` is what the library returns. Each variant is one failure
//!   category callers can match on (see `ErrorKind`).
//! - `AppError` is the binary's error: a message plus a process exit code.

use thiserror::Error;

use crate::transport::TransportError;

/// Failure categories, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ProfileFetch,
    AttributeResolution,
    AssociationFailed,
    DisassociationFailed,
    ProfileDecode,
    Config,
}

/// Why a remote call did not produce a usable response.
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected http status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ProfileError {
    /// Transport failure or non-2xx on a read endpoint.
    #[error("failed to fetch vehicle profile for '{target}': {cause}")]
    ProfileFetch {
        target: String,
        #[source]
        cause: FetchCause,
    },

    /// Path evaluation or type coercion failed for one descriptor.
    #[error("failed to resolve attribute '{attribute}' at path '{path}': {cause}")]
    AttributeResolution {
        attribute: String,
        path: String,
        cause: String,
    },

    #[error("failed to associate vehicle {vehicle_id} with user {user_id}: {reason}")]
    AssociationFailed {
        vehicle_id: String,
        user_id: String,
        reason: String,
    },

    #[error("failed to disassociate vehicle {vehicle_id} from user {user_id}: {reason}")]
    DisassociationFailed {
        vehicle_id: String,
        user_id: String,
        reason: String,
    },

    /// The document could not be parsed into the expected shape.
    #[error("failed to decode vehicle profile for '{target}': {cause}")]
    ProfileDecode {
        target: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::ProfileFetch { .. } => ErrorKind::ProfileFetch,
            ProfileError::AttributeResolution { .. } => ErrorKind::AttributeResolution,
            ProfileError::AssociationFailed { .. } => ErrorKind::AssociationFailed,
            ProfileError::DisassociationFailed { .. } => ErrorKind::DisassociationFailed,
            ProfileError::ProfileDecode { .. } => ErrorKind::ProfileDecode,
            ProfileError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn fetch(target: impl Into<String>, cause: impl Into<FetchCause>) -> Self {
        ProfileError::ProfileFetch {
            target: target.into(),
            cause: cause.into(),
        }
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        let exit_code = match err.kind() {
            ErrorKind::Config => 2,
            ErrorKind::AssociationFailed | ErrorKind::DisassociationFailed => 3,
            ErrorKind::ProfileFetch | ErrorKind::AttributeResolution | ErrorKind::ProfileDecode => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}
