//! Access Errors
//!
//! Failures reported by the open/create/close services. The status comes back
//! verbatim; the only thing added here is a tag for the operation that
//! produced it and a coarse kind for callers that branch on the outcome.

use core::fmt;

use super::status::NtStatus;

/// The privileged operation a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    Create,
    Close,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Open => "open",
            Operation::Create => "create",
            Operation::Close => "close",
        })
    }
}

/// Classification of a failure status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorKind {
    /// No object, or no intermediate directory, at the name
    NotFound,
    AccessDenied,
    /// The name resolves to an object of another kind
    TypeMismatch,
    QuotaExceeded,
    InvalidParameter,
    /// Preferred NUMA node rejected
    InvalidNode,
    /// Root directory or parent partition handle is not valid
    InvalidHandle,
    /// Create found an existing object and OBJ_OPENIF was not given
    NameCollision,
    /// A symbolic link was met while reparsing was disallowed or exhausted
    ReparsePoint,
    Other,
}

impl AccessErrorKind {
    pub fn from_status(status: NtStatus) -> Self {
        match status {
            NtStatus::OBJECT_NAME_NOT_FOUND | NtStatus::OBJECT_PATH_NOT_FOUND => Self::NotFound,
            NtStatus::ACCESS_DENIED => Self::AccessDenied,
            NtStatus::OBJECT_TYPE_MISMATCH => Self::TypeMismatch,
            NtStatus::QUOTA_EXCEEDED => Self::QuotaExceeded,
            NtStatus::INVALID_PARAMETER
            | NtStatus::OBJECT_NAME_INVALID
            | NtStatus::OBJECT_PATH_INVALID
            | NtStatus::OBJECT_PATH_SYNTAX_BAD
            | NtStatus::NAME_TOO_LONG => Self::InvalidParameter,
            NtStatus::INVALID_PARAMETER_5 => Self::InvalidNode,
            NtStatus::INVALID_HANDLE => Self::InvalidHandle,
            NtStatus::OBJECT_NAME_COLLISION => Self::NameCollision,
            NtStatus::REPARSE_POINT_ENCOUNTERED | NtStatus::REPARSE_POINT_NOT_RESOLVED => {
                Self::ReparsePoint
            }
            _ => Self::Other,
        }
    }
}

impl fmt::Display for AccessErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "object not found",
            Self::AccessDenied => "access denied",
            Self::TypeMismatch => "object type mismatch",
            Self::QuotaExceeded => "quota exceeded",
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidNode => "invalid preferred node",
            Self::InvalidHandle => "invalid root or parent handle",
            Self::NameCollision => "object name already exists",
            Self::ReparsePoint => "symbolic link not followed",
            Self::Other => "object manager failure",
        })
    }
}

/// A failed open, create or close
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {kind} [{status}]")]
pub struct AccessError {
    operation: Operation,
    kind: AccessErrorKind,
    status: NtStatus,
}

impl AccessError {
    pub fn new(operation: Operation, status: NtStatus) -> Self {
        Self {
            operation,
            kind: AccessErrorKind::from_status(status),
            status,
        }
    }

    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[inline]
    pub fn kind(&self) -> AccessErrorKind {
        self.kind
    }

    /// The status exactly as the service returned it
    #[inline]
    pub fn status(&self) -> NtStatus {
        self.status
    }
}
