//! Object Attributes
//!
//! An OBJECT_ATTRIBUTES block tells the object manager where an object lives:
//!
//! - **Name**: a `\`-separated path, absolute (`\BaseNamedObjects\ABC`) or
//!   relative to the root directory (`ABC`)
//! - **Root**: an already-open directory handle the name is relative to
//! - **Attributes**: OBJ_* flags (case sensitivity, open-if, reparse control)
//!
//! Attributes are built once per call by the path resolver and consumed by
//! exactly one open or create service. They are never stored.

use alloc::string::String;
use core::fmt;

use super::handle::BorrowedHandle;

/// Path separator of the object namespace
pub const OBJ_NAME_PATH_SEPARATOR: char = '\\';

/// Longest name a UNICODE_STRING can carry, in UTF-16 code units
pub const MAX_NAME_LENGTH: usize = 0x7FFF;

bitflags::bitflags! {
    /// OBJ_* attribute flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttributeFlags: u32 {
        /// Handle is inherited by child processes
        const INHERIT = 0x0000_0002;
        /// Object survives its last handle being closed
        const PERMANENT = 0x0000_0010;
        /// Only one handle may be open at a time
        const EXCLUSIVE = 0x0000_0020;
        /// Names compare without regard to case
        const CASE_INSENSITIVE = 0x0000_0040;
        /// Create opens the existing object instead of failing
        const OPENIF = 0x0000_0080;
        /// Open the symbolic link itself, not its target
        const OPENLINK = 0x0000_0100;
        /// Handle lives in the kernel handle table
        const KERNEL_HANDLE = 0x0000_0200;
        /// Perform access checks even for kernel callers
        const FORCE_ACCESS_CHECK = 0x0000_0400;
        /// Fail instead of following any symbolic link
        const DONT_REPARSE = 0x0000_1000;
    }
}

/// Why a name was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameDefect {
    #[error("name is empty")]
    Empty,
    #[error("name contains an empty path component")]
    EmptySegment,
    #[error("name contains an embedded NUL")]
    EmbeddedNul,
    #[error("name is longer than {} characters", MAX_NAME_LENGTH)]
    TooLong,
}

/// Validated object name
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectName(String);

impl ObjectName {
    /// Validate a name
    ///
    /// `\` alone names the namespace root. Every other name must consist of
    /// non-empty components.
    pub fn new(text: &str) -> Result<Self, NameDefect> {
        if text.is_empty() {
            return Err(NameDefect::Empty);
        }
        if text.contains('\0') {
            return Err(NameDefect::EmbeddedNul);
        }
        if text.encode_utf16().count() > MAX_NAME_LENGTH {
            return Err(NameDefect::TooLong);
        }

        let body = text.strip_prefix(OBJ_NAME_PATH_SEPARATOR).unwrap_or(text);
        if !body.is_empty() && body.split(OBJ_NAME_PATH_SEPARATOR).any(str::is_empty) {
            return Err(NameDefect::EmptySegment);
        }

        Ok(Self(String::from(text)))
    }

    /// Wrap a name known to be well formed
    pub(crate) fn new_unchecked(text: &str) -> Self {
        Self(String::from(text))
    }

    /// The name text as given
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name starts at the namespace root
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with(OBJ_NAME_PATH_SEPARATOR)
    }

    /// Name is exactly `\`
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.len() == 1 && self.is_absolute()
    }

    /// Path components, without separators
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        let body = self.0.strip_prefix(OBJ_NAME_PATH_SEPARATOR).unwrap_or(&self.0);
        body.split(OBJ_NAME_PATH_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Append a relative name below this one
    pub fn join(&self, relative: &ObjectName) -> Result<ObjectName, NameDefect> {
        let mut joined = self.0.clone();
        if !joined.ends_with(OBJ_NAME_PATH_SEPARATOR) {
            joined.push(OBJ_NAME_PATH_SEPARATOR);
        }
        joined.push_str(relative.0.trim_start_matches(OBJ_NAME_PATH_SEPARATOR));
        Self::new(&joined)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Resolved OBJECT_ATTRIBUTES
///
/// The root, if any, is borrowed: the attributes never outlive it and never
/// close it.
#[derive(Debug, Clone)]
pub struct ObjectAttributes<'a> {
    name: Option<ObjectName>,
    root: Option<BorrowedHandle<'a>>,
    flags: AttributeFlags,
}

impl<'a> ObjectAttributes<'a> {
    /// Named attributes; only the path resolver builds these
    pub(crate) fn new(
        name: ObjectName,
        root: Option<BorrowedHandle<'a>>,
        flags: AttributeFlags,
    ) -> Self {
        Self {
            name: Some(name),
            root,
            flags,
        }
    }

    /// Attributes for an unnamed object (create only)
    pub fn anonymous(flags: AttributeFlags) -> Self {
        Self {
            name: None,
            root: None,
            flags,
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&ObjectName> {
        self.name.as_ref()
    }

    #[inline]
    pub fn root(&self) -> Option<BorrowedHandle<'a>> {
        self.root
    }

    #[inline]
    pub fn flags(&self) -> AttributeFlags {
        self.flags
    }

    #[inline]
    pub fn case_sensitive(&self) -> bool {
        !self.flags.contains(AttributeFlags::CASE_INSENSITIVE)
    }
}

impl fmt::Display for ObjectAttributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = self.root {
            write!(f, "[{:#x}]", root.raw())?;
        }
        match &self.name {
            Some(name) => write!(f, "{}", name),
            None => f.write_str("<unnamed>"),
        }
    }
}
