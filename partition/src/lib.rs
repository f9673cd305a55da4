//! NT memory partition access
//!
//! Resolves object paths into OBJECT_ATTRIBUTES and opens or creates memory
//! partition objects through an object manager service boundary.
//!
//! # Subsystems
//!
//! - `ob` - Object Manager (names, handles, status codes, in-memory namespace)
//! - `mm` - Memory Manager (partition objects)
//!
//! # Example
//!
//! ```
//! use nt_partition::mm::{new_partition, get_partition, CreationParameters, PartitionRequest};
//! use nt_partition::ob::ObjectNamespace;
//!
//! let ns = ObjectNamespace::new();
//! let request = PartitionRequest::new("\\BaseNamedObjects\\ABC");
//! let created = new_partition(&ns, &request, &CreationParameters::new()).unwrap();
//! let opened = get_partition(&ns, &request).unwrap();
//! assert_ne!(created.raw(), opened.raw());
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod mm;
pub mod ob;

pub use mm::{
    get_partition, invoke, new_partition, CreationParameters, PartitionAccess, PartitionApi,
    PartitionError, PartitionHandle, PartitionRequest, PartitionVerb, PreferredNode,
};
pub use ob::{
    AccessError, AccessErrorKind, BorrowedHandle, CurrentLocation, NtStatus, ObjectAttributes,
    ObjectNamespace, OwnedHandle, ResolutionError, ResolverOptions,
};
