//! Object Manager (ob)
//!
//! Naming, handles and status codes shared by every object type:
//!
//! - **Names**: Validated `\`-separated object names and OBJECT_ATTRIBUTES
//! - **Resolution**: Absolute, root-relative and location-relative paths
//! - **Handles**: Owned handles closed exactly once, borrowed roots never closed
//! - **Security**: Access masks and generic mapping
//! - **Namespace**: An in-memory object manager with directories, symbolic
//!   links and partitions
//!
//! # Key Structures
//!
//! - `ObjectAttributes`: Name, root directory and OBJ_* flags for one call
//! - `OwnedHandle` / `BorrowedHandle`: Handle ownership
//! - `ObjectNamespace`: Directory tree plus handle table

// Submodules
pub mod access;
pub mod attributes;
pub mod error;
pub mod handle;
pub mod namespace;
pub mod resolve;
pub mod status;

// Re-exports for convenience
pub use access::{access_check, generic_rights, special_rights, standard_rights, GenericMapping};
pub use attributes::{
    AttributeFlags, NameDefect, ObjectAttributes, ObjectName, MAX_NAME_LENGTH,
    OBJ_NAME_PATH_SEPARATOR,
};
pub use error::{AccessError, AccessErrorKind, Operation};
pub use handle::{
    BorrowedHandle, Handle, HandleApi, HandleGrant, OwnedHandle, HANDLE_INCREMENT,
    INVALID_HANDLE_VALUE, MAX_HANDLES, NULL_HANDLE,
};
pub use namespace::{
    directory_access, symlink_access, NamespaceConfig, NamespaceStats, ObjectKind,
    ObjectNamespace, PartitionInfo, MAX_REPARSE_DEPTH,
};
pub use resolve::{
    resolve, CurrentLocation, ResolutionError, ResolverOptions, RootConflictPolicy,
    PROVIDER_DRIVE,
};
pub use status::NtStatus;
