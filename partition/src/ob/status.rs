//! NT Status Codes
//!
//! The object manager and the partition services report their outcome as an
//! NTSTATUS value. Bits 30-31 carry the severity:
//!
//! - `00` success
//! - `01` informational (still a success, e.g. `STATUS_OBJECT_NAME_EXISTS`)
//! - `10` warning
//! - `11` error
//!
//! Only the codes produced on the resolve/open/create path are named here.
//! Anything else is still carried verbatim by [`NtStatus`].

use core::fmt;

/// NTSTATUS value
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NtStatus(pub i32);

impl NtStatus {
    pub const SUCCESS: Self = Self(0);
    /// OBJ_OPENIF found an existing object and opened it
    pub const OBJECT_NAME_EXISTS: Self = Self(0x4000_0000);
    pub const INVALID_HANDLE: Self = Self(0xC000_0008u32 as i32);
    pub const INVALID_PARAMETER: Self = Self(0xC000_000Du32 as i32);
    pub const ACCESS_DENIED: Self = Self(0xC000_0022u32 as i32);
    pub const OBJECT_TYPE_MISMATCH: Self = Self(0xC000_0024u32 as i32);
    pub const OBJECT_NAME_INVALID: Self = Self(0xC000_0033u32 as i32);
    pub const OBJECT_NAME_NOT_FOUND: Self = Self(0xC000_0034u32 as i32);
    pub const OBJECT_NAME_COLLISION: Self = Self(0xC000_0035u32 as i32);
    pub const OBJECT_PATH_INVALID: Self = Self(0xC000_0039u32 as i32);
    pub const OBJECT_PATH_NOT_FOUND: Self = Self(0xC000_003Au32 as i32);
    pub const OBJECT_PATH_SYNTAX_BAD: Self = Self(0xC000_003Bu32 as i32);
    pub const QUOTA_EXCEEDED: Self = Self(0xC000_0044u32 as i32);
    pub const INSUFFICIENT_RESOURCES: Self = Self(0xC000_009Au32 as i32);
    /// Fifth service argument rejected (the preferred node of NtCreatePartition)
    pub const INVALID_PARAMETER_5: Self = Self(0xC000_00F3u32 as i32);
    pub const NAME_TOO_LONG: Self = Self(0xC000_0106u32 as i32);
    pub const REPARSE_POINT_NOT_RESOLVED: Self = Self(0xC000_0280u32 as i32);
    pub const REPARSE_POINT_ENCOUNTERED: Self = Self(0xC000_050Bu32 as i32);

    /// Raw 32-bit code
    #[inline]
    pub const fn code(self) -> u32 {
        self.0 as u32
    }

    /// Success or informational severity
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Error severity
    #[inline]
    pub const fn is_error(self) -> bool {
        self.code() >> 30 == 3
    }

    /// Symbolic name of a known code
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::SUCCESS => "STATUS_SUCCESS",
            Self::OBJECT_NAME_EXISTS => "STATUS_OBJECT_NAME_EXISTS",
            Self::INVALID_HANDLE => "STATUS_INVALID_HANDLE",
            Self::INVALID_PARAMETER => "STATUS_INVALID_PARAMETER",
            Self::ACCESS_DENIED => "STATUS_ACCESS_DENIED",
            Self::OBJECT_TYPE_MISMATCH => "STATUS_OBJECT_TYPE_MISMATCH",
            Self::OBJECT_NAME_INVALID => "STATUS_OBJECT_NAME_INVALID",
            Self::OBJECT_NAME_NOT_FOUND => "STATUS_OBJECT_NAME_NOT_FOUND",
            Self::OBJECT_NAME_COLLISION => "STATUS_OBJECT_NAME_COLLISION",
            Self::OBJECT_PATH_INVALID => "STATUS_OBJECT_PATH_INVALID",
            Self::OBJECT_PATH_NOT_FOUND => "STATUS_OBJECT_PATH_NOT_FOUND",
            Self::OBJECT_PATH_SYNTAX_BAD => "STATUS_OBJECT_PATH_SYNTAX_BAD",
            Self::QUOTA_EXCEEDED => "STATUS_QUOTA_EXCEEDED",
            Self::INSUFFICIENT_RESOURCES => "STATUS_INSUFFICIENT_RESOURCES",
            Self::INVALID_PARAMETER_5 => "STATUS_INVALID_PARAMETER_5",
            Self::NAME_TOO_LONG => "STATUS_NAME_TOO_LONG",
            Self::REPARSE_POINT_NOT_RESOLVED => "STATUS_REPARSE_POINT_NOT_RESOLVED",
            Self::REPARSE_POINT_ENCOUNTERED => "STATUS_REPARSE_POINT_ENCOUNTERED",
            _ => return None,
        };
        Some(name)
    }

    /// Convert to a `Result`, keeping informational codes as success
    #[inline]
    pub fn ok(self) -> Result<Self, Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({:#010X})", name, self.code()),
            None => write!(f, "{:#010X}", self.code()),
        }
    }
}

impl fmt::Debug for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<i32> for NtStatus {
    fn from(code: i32) -> Self {
        Self(code)
    }
}
