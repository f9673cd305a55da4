//! Path Resolution
//!
//! Turns caller input into [`ObjectAttributes`] without talking to the object
//! manager. Three ways of addressing an object are supported:
//!
//! - **Absolute**: `\BaseNamedObjects\ABC`
//! - **Root-relative**: `ABC` with a root directory handle
//! - **Location-relative**: `ABC` resolved against the caller's current
//!   location, either a namespace path (`NtObject:\BaseNamedObjects`) or an
//!   open directory handle
//!
//! The current location is handed in by the caller for each call and only
//! read. An absolute name combined with a root handle is governed by
//! [`RootConflictPolicy`].

use super::attributes::{
    AttributeFlags, NameDefect, ObjectAttributes, ObjectName, OBJ_NAME_PATH_SEPARATOR,
};
use super::handle::BorrowedHandle;
use super::status::NtStatus;

/// Drive prefix a shell location carries in front of the namespace path
pub const PROVIDER_DRIVE: &str = "NtObject:";

/// What to do with a root handle given alongside an absolute name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootConflictPolicy {
    /// Address the absolute name and drop the root
    #[default]
    IgnoreRoot,
    /// Fail with [`ResolutionError::RootWithAbsolutePath`]
    Reject,
}

/// Per-call resolution options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverOptions {
    /// Compare names exactly (clears OBJ_CASE_INSENSITIVE)
    pub case_sensitive: bool,
    /// OBJ_OPENLINK
    pub open_link: bool,
    /// OBJ_DONT_REPARSE
    pub dont_reparse: bool,
    /// OBJ_OPENIF
    pub open_if: bool,
    /// OBJ_PERMANENT
    pub permanent: bool,
    /// OBJ_INHERIT
    pub inherit: bool,
    /// OBJ_EXCLUSIVE
    pub exclusive: bool,
    /// OBJ_KERNEL_HANDLE
    pub kernel_handle: bool,
    /// OBJ_FORCE_ACCESS_CHECK
    pub force_access_check: bool,
    pub root_conflict: RootConflictPolicy,
}

impl ResolverOptions {
    /// OBJ_* flags these options stand for
    pub fn attribute_flags(&self) -> AttributeFlags {
        let mut flags = AttributeFlags::empty();
        flags.set(AttributeFlags::CASE_INSENSITIVE, !self.case_sensitive);
        flags.set(AttributeFlags::OPENLINK, self.open_link);
        flags.set(AttributeFlags::DONT_REPARSE, self.dont_reparse);
        flags.set(AttributeFlags::OPENIF, self.open_if);
        flags.set(AttributeFlags::PERMANENT, self.permanent);
        flags.set(AttributeFlags::INHERIT, self.inherit);
        flags.set(AttributeFlags::EXCLUSIVE, self.exclusive);
        flags.set(AttributeFlags::KERNEL_HANDLE, self.kernel_handle);
        flags.set(AttributeFlags::FORCE_ACCESS_CHECK, self.force_access_check);
        flags
    }
}

/// The caller's current namespace location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentLocation<'a> {
    /// Namespace path, optionally drive-qualified (`NtObject:\BaseNamedObjects`)
    Path(&'a str),
    /// An open directory standing for the location
    Directory(BorrowedHandle<'a>),
}

/// Input that cannot be turned into object attributes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("object path is empty")]
    EmptyPath,
    #[error("invalid object name: {0}")]
    InvalidName(NameDefect),
    #[error("relative path needs a root directory or a current location")]
    RelativePathWithoutRoot,
    #[error("absolute path given together with a root directory")]
    RootWithAbsolutePath,
    #[error("current location {0:?} is not a namespace path")]
    UnresolvableLocation(alloc::string::String),
}

impl ResolutionError {
    /// Status the object manager reports for the same input
    pub fn status(&self) -> NtStatus {
        match self {
            ResolutionError::EmptyPath => NtStatus::OBJECT_NAME_INVALID,
            ResolutionError::InvalidName(NameDefect::TooLong) => NtStatus::NAME_TOO_LONG,
            ResolutionError::InvalidName(_) => NtStatus::OBJECT_NAME_INVALID,
            ResolutionError::RelativePathWithoutRoot
            | ResolutionError::RootWithAbsolutePath => NtStatus::OBJECT_PATH_SYNTAX_BAD,
            ResolutionError::UnresolvableLocation(_) => NtStatus::OBJECT_PATH_INVALID,
        }
    }
}

/// Build object attributes for `path`
///
/// # Arguments
/// * `path` - Absolute (`\...`) or relative name
/// * `root` - Directory the relative name starts at
/// * `location` - Current location, used for a relative name without a root
/// * `options` - Attribute flags and the root conflict policy
pub fn resolve<'a>(
    path: &str,
    root: Option<BorrowedHandle<'a>>,
    location: Option<&CurrentLocation<'a>>,
    options: &ResolverOptions,
) -> Result<ObjectAttributes<'a>, ResolutionError> {
    if path.is_empty() {
        return Err(ResolutionError::EmptyPath);
    }

    let name = ObjectName::new(path).map_err(ResolutionError::InvalidName)?;
    let flags = options.attribute_flags();

    if name.is_absolute() {
        if let Some(root) = root {
            match options.root_conflict {
                RootConflictPolicy::Reject => return Err(ResolutionError::RootWithAbsolutePath),
                RootConflictPolicy::IgnoreRoot => {
                    log::debug!("[OB] Ignoring root {:#x} for absolute name {}", root.raw(), name);
                }
            }
        }
        return Ok(ObjectAttributes::new(name, None, flags));
    }

    if root.is_some() {
        return Ok(ObjectAttributes::new(name, root, flags));
    }

    match location {
        Some(CurrentLocation::Directory(directory)) => {
            log::trace!("[OB] Resolving {} under location handle {:#x}", name, directory.raw());
            Ok(ObjectAttributes::new(name, Some(*directory), flags))
        }
        Some(CurrentLocation::Path(text)) => {
            let base = location_name(text)?;
            let joined = base.join(&name).map_err(ResolutionError::InvalidName)?;
            log::trace!("[OB] Resolved {} under location {} to {}", name, text, joined);
            Ok(ObjectAttributes::new(joined, None, flags))
        }
        None => Err(ResolutionError::RelativePathWithoutRoot),
    }
}

/// Namespace path of a shell location
///
/// Strips the provider drive and any trailing separators. `NtObject:` alone
/// is the namespace root.
fn location_name(text: &str) -> Result<ObjectName, ResolutionError> {
    let unresolvable = || ResolutionError::UnresolvableLocation(alloc::string::String::from(text));

    let drive_len = PROVIDER_DRIVE.len();
    let rest = match text.get(..drive_len) {
        Some(prefix) if prefix.eq_ignore_ascii_case(PROVIDER_DRIVE) => {
            let rest = &text[drive_len..];
            if rest.is_empty() {
                "\\"
            } else {
                rest
            }
        }
        _ => text,
    };

    if !rest.starts_with(OBJ_NAME_PATH_SEPARATOR) {
        return Err(unresolvable());
    }
    let trimmed = rest.trim_end_matches(OBJ_NAME_PATH_SEPARATOR);
    let path = if trimmed.is_empty() { "\\" } else { trimmed };

    ObjectName::new(path).map_err(|_| unresolvable())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ResolverOptions {
        ResolverOptions::default()
    }

    #[test]
    fn test_absolute_path() {
        let attributes = resolve("\\BaseNamedObjects\\ABC", None, None, &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "\\BaseNamedObjects\\ABC");
        assert!(attributes.root().is_none());
        assert!(attributes.flags().contains(AttributeFlags::CASE_INSENSITIVE));
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let root = BorrowedHandle::borrow_raw(8);
        let attributes = resolve("\\BaseNamedObjects\\ABC", Some(root), None, &options()).unwrap();
        assert!(attributes.root().is_none());
        assert_eq!(attributes.name().unwrap().as_str(), "\\BaseNamedObjects\\ABC");
    }

    #[test]
    fn test_absolute_path_rejects_root() {
        let root = BorrowedHandle::borrow_raw(8);
        let strict = ResolverOptions {
            root_conflict: RootConflictPolicy::Reject,
            ..options()
        };
        let result = resolve("\\BaseNamedObjects\\ABC", Some(root), None, &strict);
        assert_eq!(result.unwrap_err(), ResolutionError::RootWithAbsolutePath);

        // Without a root the strict policy has nothing to reject
        assert!(resolve("\\BaseNamedObjects\\ABC", None, None, &strict).is_ok());
    }

    #[test]
    fn test_relative_path_with_root() {
        let root = BorrowedHandle::borrow_raw(12);
        let attributes = resolve("ABC", Some(root), None, &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "ABC");
        assert_eq!(attributes.root(), Some(root));
    }

    #[test]
    fn test_relative_path_without_root() {
        for path in ["ABC", "A\\B", "Session\\1"] {
            let error = resolve(path, None, None, &options()).unwrap_err();
            assert_eq!(error, ResolutionError::RelativePathWithoutRoot);
            assert_eq!(error.status(), NtStatus::OBJECT_PATH_SYNTAX_BAD);
        }
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(resolve("", None, None, &options()).unwrap_err(), ResolutionError::EmptyPath);
        assert_eq!(
            resolve("\\A\\\\B", None, None, &options()).unwrap_err(),
            ResolutionError::InvalidName(NameDefect::EmptySegment)
        );
    }

    #[test]
    fn test_location_path() {
        let location = CurrentLocation::Path("NtObject:\\BaseNamedObjects");
        let attributes = resolve("ABC", None, Some(&location), &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "\\BaseNamedObjects\\ABC");
        assert!(attributes.root().is_none());

        let bare = CurrentLocation::Path("\\BaseNamedObjects\\");
        let attributes = resolve("ABC", None, Some(&bare), &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "\\BaseNamedObjects\\ABC");

        let drive_root = CurrentLocation::Path("ntobject:");
        let attributes = resolve("ABC", None, Some(&drive_root), &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "\\ABC");
    }

    #[test]
    fn test_location_directory() {
        let directory = BorrowedHandle::borrow_raw(16);
        let location = CurrentLocation::Directory(directory);
        let attributes = resolve("ABC", None, Some(&location), &options()).unwrap();
        assert_eq!(attributes.root(), Some(directory));
        assert_eq!(attributes.name().unwrap().as_str(), "ABC");
    }

    #[test]
    fn test_explicit_root_beats_location() {
        let root = BorrowedHandle::borrow_raw(20);
        let location = CurrentLocation::Path("\\Device");
        let attributes = resolve("ABC", Some(root), Some(&location), &options()).unwrap();
        assert_eq!(attributes.root(), Some(root));
        assert_eq!(attributes.name().unwrap().as_str(), "ABC");
    }

    #[test]
    fn test_unresolvable_location() {
        for text in ["", "BaseNamedObjects", "C:\\Windows", "NtObject:BaseNamedObjects"] {
            let location = CurrentLocation::Path(text);
            let error = resolve("ABC", None, Some(&location), &options()).unwrap_err();
            assert!(matches!(error, ResolutionError::UnresolvableLocation(_)), "{}", text);
            assert_eq!(error.status(), NtStatus::OBJECT_PATH_INVALID);
        }
    }

    #[test]
    fn test_absolute_path_ignores_location() {
        let location = CurrentLocation::Path("\\Device");
        let attributes =
            resolve("\\BaseNamedObjects\\ABC", None, Some(&location), &options()).unwrap();
        assert_eq!(attributes.name().unwrap().as_str(), "\\BaseNamedObjects\\ABC");
    }

    #[test]
    fn test_option_flags() {
        let options = ResolverOptions {
            case_sensitive: true,
            open_if: true,
            dont_reparse: true,
            ..ResolverOptions::default()
        };
        let attributes = resolve("\\A", None, None, &options).unwrap();
        assert!(attributes.case_sensitive());
        assert_eq!(
            attributes.flags(),
            AttributeFlags::OPENIF | AttributeFlags::DONT_REPARSE
        );
    }

    #[test]
    fn test_handle_flags() {
        let options = ResolverOptions {
            inherit: true,
            exclusive: true,
            kernel_handle: true,
            force_access_check: true,
            ..ResolverOptions::default()
        };
        let attributes = resolve("\\A", None, None, &options).unwrap();
        assert_eq!(
            attributes.flags(),
            AttributeFlags::CASE_INSENSITIVE
                | AttributeFlags::INHERIT
                | AttributeFlags::EXCLUSIVE
                | AttributeFlags::KERNEL_HANDLE
                | AttributeFlags::FORCE_ACCESS_CHECK
        );
    }
}
