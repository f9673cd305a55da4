//! Memory Manager (mm)
//!
//! Only the partition object lives here: the named container a set of
//! physical pages and working sets is carved out of.
//!
//! # Key Structures
//!
//! - `PartitionAccess`: MEMORY_PARTITION_* rights
//! - `PartitionHandle`: Open partition, closed on drop
//! - `PartitionApi`: NtOpenPartition / NtCreatePartition

pub mod partition;

pub use partition::{
    create, get_partition, invoke, new_partition, open, CreationParameters, InvalidNodeValue,
    PartitionAccess, PartitionApi, PartitionError, PartitionHandle, PartitionRequest,
    PartitionVerb, PreferredNode, ANY_NODE, PARTITION_GENERIC_MAPPING,
};
