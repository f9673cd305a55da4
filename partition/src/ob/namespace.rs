//! Object Namespace
//!
//! An in-memory object manager: the privileged side of the open/create
//! protocol. It owns the directory tree, the handle table and every object
//! reachable from them.
//!
//! # Namespace Hierarchy
//!
//! - `\` - Root directory
//! - `\ObjectTypes` - Type objects
//! - `\BaseNamedObjects` - Named events, partitions, etc.
//! - `\Device` - Device objects
//! - `\GLOBAL??` - DOS device names
//! - `\??` - Symbolic link to `\GLOBAL??`
//!
//! A system partition exists from boot; it is unnamed and is the parent of
//! every partition created without an explicit one.
//!
//! # Object Lifetime
//!
//! Each object counts its handles and the pointer references other objects
//! hold on it (directory entries, child partitions). A named temporary object
//! loses its name when its last handle closes and is freed once nothing
//! references it. Objects created with OBJ_PERMANENT, and everything created
//! at boot, stay until the namespace is dropped.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use spin::RwLock;

use super::access::{access_check, standard_rights, GenericMapping};
use super::attributes::{AttributeFlags, ObjectAttributes, ObjectName, OBJ_NAME_PATH_SEPARATOR};
use super::handle::{
    BorrowedHandle, Handle, HandleApi, HandleGrant, OwnedHandle, HANDLE_INCREMENT, MAX_HANDLES,
};
use super::status::NtStatus;
use crate::mm::partition::{PartitionAccess, PartitionApi, ANY_NODE, PARTITION_GENERIC_MAPPING};

/// Symbolic links followed by one lookup before giving up
pub const MAX_REPARSE_DEPTH: u32 = 32;

/// Access rights for directory objects
pub mod directory_access {
    pub const DIRECTORY_QUERY: u32 = 0x0001;
    pub const DIRECTORY_TRAVERSE: u32 = 0x0002;
    pub const DIRECTORY_CREATE_OBJECT: u32 = 0x0004;
    pub const DIRECTORY_CREATE_SUBDIRECTORY: u32 = 0x0008;
    pub const DIRECTORY_ALL_ACCESS: u32 = 0x000F_000F;
}

/// Access rights for symbolic link objects
pub mod symlink_access {
    pub const SYMBOLIC_LINK_QUERY: u32 = 0x0001;
    pub const SYMBOLIC_LINK_ALL_ACCESS: u32 = 0x000F_0001;
}

/// Object types known to the namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Directory,
    SymbolicLink,
    Partition,
}

impl ObjectKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ObjectKind::Directory => "Directory",
            ObjectKind::SymbolicLink => "SymbolicLink",
            ObjectKind::Partition => "Partition",
        }
    }

    pub fn generic_mapping(self) -> GenericMapping {
        use directory_access::*;
        use standard_rights::READ_CONTROL;
        use symlink_access::*;

        match self {
            ObjectKind::Directory => GenericMapping {
                generic_read: READ_CONTROL | DIRECTORY_QUERY | DIRECTORY_TRAVERSE,
                generic_write: READ_CONTROL
                    | DIRECTORY_CREATE_OBJECT
                    | DIRECTORY_CREATE_SUBDIRECTORY,
                generic_execute: READ_CONTROL | DIRECTORY_QUERY | DIRECTORY_TRAVERSE,
                generic_all: DIRECTORY_ALL_ACCESS,
            },
            ObjectKind::SymbolicLink => GenericMapping {
                generic_read: READ_CONTROL | SYMBOLIC_LINK_QUERY,
                generic_write: READ_CONTROL,
                generic_execute: READ_CONTROL | SYMBOLIC_LINK_QUERY,
                generic_all: SYMBOLIC_LINK_ALL_ACCESS,
            },
            ObjectKind::Partition => PARTITION_GENERIC_MAPPING,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Limits of one namespace instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Partitions that may exist at once, the system partition excluded
    pub max_partitions: usize,
    /// NUMA nodes; preferred nodes at or above this are rejected
    pub node_count: u32,
    pub max_reparse_depth: u32,
    pub max_handles: usize,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            max_partitions: 64,
            node_count: 1,
            max_reparse_depth: MAX_REPARSE_DEPTH,
            max_handles: MAX_HANDLES,
        }
    }
}

/// What the namespace knows about an open partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    /// Full name, `None` for unnamed partitions
    pub path: Option<String>,
    /// Full name of the parent when it is a named partition
    pub parent_path: Option<String>,
    /// Parent is the system partition
    pub under_system_partition: bool,
    /// Node hint exactly as passed to create (`-1` for no preference)
    pub preferred_node: i32,
    /// Node the partition was placed on
    pub node: u32,
}

/// Namespace statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NamespaceStats {
    pub object_count: usize,
    pub directory_count: usize,
    pub symbolic_link_count: usize,
    /// Includes the system partition
    pub partition_count: usize,
    pub handle_count: usize,
}

type ObjectId = u32;

/// The root directory is the first object allocated at boot
const ROOT_DIRECTORY: ObjectId = 0;

/// Directory entry
struct DirectoryEntry {
    name: String,
    /// Hash of name (for faster lookup)
    name_hash: u32,
    object: ObjectId,
}

/// Object directory
struct ObjectDirectory {
    entries: Vec<DirectoryEntry>,
}

impl ObjectDirectory {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Upcase one character, like RtlUpcaseUnicodeChar
    ///
    /// Characters whose uppercase form is more than one character stay as
    /// they are.
    fn upcase(c: char) -> char {
        let mut upper = c.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(single), None) => single,
            _ => c,
        }
    }

    /// Case-insensitive hash, so it also filters exact lookups
    fn hash_name(name: &str) -> u32 {
        let mut hash: u32 = 0;
        for c in name.chars() {
            hash = hash.wrapping_mul(31).wrapping_add(Self::upcase(c) as u32);
        }
        hash
    }

    fn names_equal(a: &str, b: &str, case_insensitive: bool) -> bool {
        if case_insensitive {
            a.chars().map(Self::upcase).eq(b.chars().map(Self::upcase))
        } else {
            a == b
        }
    }

    fn lookup(&self, name: &str, case_insensitive: bool) -> Option<ObjectId> {
        let hash = Self::hash_name(name);
        self.entries
            .iter()
            .filter(|entry| entry.name_hash == hash)
            .find(|entry| Self::names_equal(name, &entry.name, case_insensitive))
            .map(|entry| entry.object)
    }

    /// Returns false if the name is already taken
    fn insert(&mut self, name: &str, object: ObjectId, case_insensitive: bool) -> bool {
        if self.lookup(name, case_insensitive).is_some() {
            return false;
        }
        self.entries.push(DirectoryEntry {
            name: String::from(name),
            name_hash: Self::hash_name(name),
            object,
        });
        true
    }

    fn remove_object(&mut self, object: ObjectId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.object != object);
        self.entries.len() != before
    }
}

struct PartitionBody {
    /// `None` only for the system partition
    parent: Option<ObjectId>,
    preferred_node: i32,
    node: u32,
}

enum ObjectBody {
    Directory(ObjectDirectory),
    SymbolicLink(ObjectName),
    Partition(PartitionBody),
}

impl ObjectBody {
    fn kind(&self) -> ObjectKind {
        match self {
            ObjectBody::Directory(_) => ObjectKind::Directory,
            ObjectBody::SymbolicLink(_) => ObjectKind::SymbolicLink,
            ObjectBody::Partition(_) => ObjectKind::Partition,
        }
    }
}

/// Object header plus body
struct NamespaceObject {
    /// Name within `directory`
    name: Option<String>,
    directory: Option<ObjectId>,
    body: ObjectBody,
    handle_count: u32,
    /// References held by directory entries and child partitions
    pointer_count: u32,
    permanent: bool,
    /// Rights the object's security grants
    allowed_access: u32,
}

/// Handle table entry
struct HandleTableEntry {
    object: ObjectId,
    granted_access: u32,
}

/// Result of walking a name
enum Lookup {
    Found(ObjectId),
    /// Everything but the last component exists
    Missing {
        directory: ObjectId,
        leaf: String,
    },
}

struct NamespaceState {
    objects: BTreeMap<ObjectId, NamespaceObject>,
    next_object: ObjectId,
    handles: BTreeMap<Handle, HandleTableEntry>,
    system_partition: ObjectId,
}

impl NamespaceState {
    fn boot() -> Self {
        let mut state = Self {
            objects: BTreeMap::new(),
            next_object: ROOT_DIRECTORY,
            handles: BTreeMap::new(),
            system_partition: ROOT_DIRECTORY,
        };

        state.allocate(ObjectBody::Directory(ObjectDirectory::new()), true);

        for name in ["ObjectTypes", "BaseNamedObjects", "Device", "GLOBAL??"] {
            let directory = state.allocate(ObjectBody::Directory(ObjectDirectory::new()), true);
            let linked = state.link(ROOT_DIRECTORY, name, directory, true);
            debug_assert!(linked);
        }

        let dos_devices = ObjectName::new_unchecked("\\GLOBAL??");
        let link = state.allocate(ObjectBody::SymbolicLink(dos_devices), true);
        let linked = state.link(ROOT_DIRECTORY, "??", link, true);
        debug_assert!(linked);

        state.system_partition = state.allocate(
            ObjectBody::Partition(PartitionBody {
                parent: None,
                preferred_node: ANY_NODE,
                node: 0,
            }),
            true,
        );

        state
    }

    fn allocate(&mut self, body: ObjectBody, permanent: bool) -> ObjectId {
        let id = self.next_object;
        self.next_object += 1;

        if let ObjectBody::Partition(PartitionBody { parent: Some(parent), .. }) = &body {
            if let Some(parent) = self.objects.get_mut(parent) {
                parent.pointer_count += 1;
            }
        }

        let allowed_access = body.kind().generic_mapping().generic_all;
        self.objects.insert(
            id,
            NamespaceObject {
                name: None,
                directory: None,
                body,
                handle_count: 0,
                pointer_count: 0,
                permanent,
                allowed_access,
            },
        );
        id
    }

    fn link(
        &mut self,
        directory: ObjectId,
        name: &str,
        object: ObjectId,
        case_insensitive: bool,
    ) -> bool {
        let inserted = match self.objects.get_mut(&directory) {
            Some(NamespaceObject {
                body: ObjectBody::Directory(entries),
                pointer_count,
                ..
            }) => {
                let inserted = entries.insert(name, object, case_insensitive);
                if inserted {
                    *pointer_count += 1;
                }
                inserted
            }
            _ => false,
        };

        if inserted {
            if let Some(object) = self.objects.get_mut(&object) {
                object.name = Some(String::from(name));
                object.directory = Some(directory);
            }
        }
        inserted
    }

    fn unlink(&mut self, directory: ObjectId, object: ObjectId) {
        if let Some(NamespaceObject {
            body: ObjectBody::Directory(entries),
            pointer_count,
            ..
        }) = self.objects.get_mut(&directory)
        {
            if entries.remove_object(object) {
                *pointer_count = pointer_count.saturating_sub(1);
            }
        }
        if let Some(object) = self.objects.get_mut(&object) {
            object.name = None;
        }
    }

    fn kind(&self, id: ObjectId) -> Option<ObjectKind> {
        self.objects.get(&id).map(|object| object.body.kind())
    }

    /// Full name of a linked object
    fn path_of(&self, id: ObjectId) -> Option<String> {
        let mut components = Vec::new();
        let mut current = id;
        while current != ROOT_DIRECTORY {
            let object = self.objects.get(&current)?;
            components.push(object.name.as_deref()?);
            current = object.directory?;
        }

        if components.is_empty() {
            return Some(String::from("\\"));
        }
        let mut path = String::new();
        for component in components.iter().rev() {
            path.push(OBJ_NAME_PATH_SEPARATOR);
            path.push_str(component);
        }
        Some(path)
    }

    /// Walk a name from the root directory or from the attributes' root
    fn lookup(
        &self,
        attributes: &ObjectAttributes<'_>,
        max_reparse_depth: u32,
    ) -> Result<Lookup, NtStatus> {
        let name = attributes.name().ok_or(NtStatus::OBJECT_NAME_INVALID)?;

        let start = match attributes.root() {
            Some(_) if name.is_absolute() => return Err(NtStatus::OBJECT_PATH_SYNTAX_BAD),
            Some(root) => {
                let entry = self.handles.get(&root.raw()).ok_or(NtStatus::INVALID_HANDLE)?;
                match self.kind(entry.object) {
                    Some(ObjectKind::Directory) => entry.object,
                    Some(_) => return Err(NtStatus::OBJECT_TYPE_MISMATCH),
                    None => return Err(NtStatus::INVALID_HANDLE),
                }
            }
            None if name.is_absolute() => ROOT_DIRECTORY,
            None => return Err(NtStatus::OBJECT_PATH_SYNTAX_BAD),
        };

        let case_insensitive = !attributes.case_sensitive();
        let flags = attributes.flags();
        let mut remaining: VecDeque<String> = name.segments().map(String::from).collect();
        let mut current = start;
        let mut reparses = 0;

        while let Some(segment) = remaining.pop_front() {
            let directory = match self.objects.get(&current).map(|object| &object.body) {
                Some(ObjectBody::Directory(directory)) => directory,
                _ => return Err(NtStatus::OBJECT_TYPE_MISMATCH),
            };
            let last = remaining.is_empty();

            let Some(found) = directory.lookup(&segment, case_insensitive) else {
                if last {
                    return Ok(Lookup::Missing {
                        directory: current,
                        leaf: segment,
                    });
                }
                return Err(NtStatus::OBJECT_PATH_NOT_FOUND);
            };

            let body = self.objects.get(&found).map(|object| &object.body);
            if let Some(ObjectBody::SymbolicLink(target)) = body {
                if flags.contains(AttributeFlags::DONT_REPARSE) {
                    return Err(NtStatus::REPARSE_POINT_ENCOUNTERED);
                }
                if last && flags.contains(AttributeFlags::OPENLINK) {
                    return Ok(Lookup::Found(found));
                }

                reparses += 1;
                if reparses > max_reparse_depth {
                    return Err(NtStatus::REPARSE_POINT_NOT_RESOLVED);
                }
                log::trace!("[OB] Reparse {} -> {}", segment, target);

                for component in target.segments().rev() {
                    remaining.push_front(String::from(component));
                }
                current = ROOT_DIRECTORY;
                continue;
            }

            current = found;
        }

        Ok(Lookup::Found(current))
    }

    fn insert_handle(
        &mut self,
        object: ObjectId,
        granted_access: u32,
        max_handles: usize,
    ) -> Result<Handle, NtStatus> {
        if self.handles.len() >= max_handles {
            return Err(NtStatus::INSUFFICIENT_RESOURCES);
        }

        let mut handle = HANDLE_INCREMENT;
        while self.handles.contains_key(&handle) {
            handle += HANDLE_INCREMENT;
        }

        self.handles.insert(
            handle,
            HandleTableEntry {
                object,
                granted_access,
            },
        );
        if let Some(object) = self.objects.get_mut(&object) {
            object.handle_count += 1;
        }
        Ok(handle)
    }

    /// Access-check an existing object and give out a handle to it
    fn grant(
        &mut self,
        id: ObjectId,
        desired_access: u32,
        kind: ObjectKind,
        config: &NamespaceConfig,
        status: NtStatus,
    ) -> Result<HandleGrant, NtStatus> {
        let object = self.objects.get(&id).ok_or(NtStatus::OBJECT_NAME_NOT_FOUND)?;
        if object.body.kind() != kind {
            return Err(NtStatus::OBJECT_TYPE_MISMATCH);
        }

        let granted_access =
            access_check(desired_access, object.allowed_access, &kind.generic_mapping())?;
        let handle = self.insert_handle(id, granted_access, config.max_handles)?;
        Ok(HandleGrant {
            handle,
            granted_access,
            status,
        })
    }

    fn open(
        &mut self,
        attributes: &ObjectAttributes<'_>,
        desired_access: u32,
        kind: ObjectKind,
        config: &NamespaceConfig,
    ) -> Result<HandleGrant, NtStatus> {
        let id = match self.lookup(attributes, config.max_reparse_depth)? {
            Lookup::Found(id) => id,
            Lookup::Missing { .. } => return Err(NtStatus::OBJECT_NAME_NOT_FOUND),
        };
        self.grant(id, desired_access, kind, config, NtStatus::SUCCESS)
    }

    fn create(
        &mut self,
        attributes: &ObjectAttributes<'_>,
        desired_access: u32,
        body: ObjectBody,
        config: &NamespaceConfig,
    ) -> Result<HandleGrant, NtStatus> {
        let kind = body.kind();
        let flags = attributes.flags();

        let placement = match attributes.name() {
            None => None,
            Some(_) => match self.lookup(attributes, config.max_reparse_depth)? {
                Lookup::Found(existing) if flags.contains(AttributeFlags::OPENIF) => {
                    return self.grant(
                        existing,
                        desired_access,
                        kind,
                        config,
                        NtStatus::OBJECT_NAME_EXISTS,
                    );
                }
                Lookup::Found(_) => return Err(NtStatus::OBJECT_NAME_COLLISION),
                Lookup::Missing { directory, leaf } => Some((directory, leaf)),
            },
        };

        if kind == ObjectKind::Partition && self.partition_count() >= config.max_partitions {
            return Err(NtStatus::QUOTA_EXCEEDED);
        }

        let mapping = kind.generic_mapping();
        let granted_access = access_check(desired_access, mapping.generic_all, &mapping)?;
        if self.handles.len() >= config.max_handles {
            return Err(NtStatus::INSUFFICIENT_RESOURCES);
        }

        let id = self.allocate(body, flags.contains(AttributeFlags::PERMANENT));
        if let Some((directory, leaf)) = placement {
            let linked = self.link(directory, &leaf, id, !attributes.case_sensitive());
            debug_assert!(linked);
        }

        match self.insert_handle(id, granted_access, config.max_handles) {
            Ok(handle) => {
                log::debug!("[OB] Created {} {}", kind, attributes);
                Ok(HandleGrant {
                    handle,
                    granted_access,
                    status: NtStatus::SUCCESS,
                })
            }
            Err(status) => {
                if let Some(object) = self.objects.get_mut(&id) {
                    object.permanent = false;
                }
                self.release(id);
                Err(status)
            }
        }
    }

    fn create_partition(
        &mut self,
        attributes: &ObjectAttributes<'_>,
        desired_access: u32,
        parent: Option<BorrowedHandle<'_>>,
        preferred_node: i32,
        config: &NamespaceConfig,
    ) -> Result<HandleGrant, NtStatus> {
        if preferred_node < ANY_NODE {
            return Err(NtStatus::INVALID_PARAMETER);
        }
        let node_count = config.node_count.max(1);
        if preferred_node >= 0 && preferred_node as u32 >= node_count {
            return Err(NtStatus::INVALID_PARAMETER_5);
        }

        let parent = match parent {
            None => self.system_partition,
            Some(handle) => {
                let entry = self.handles.get(&handle.raw()).ok_or(NtStatus::INVALID_HANDLE)?;
                if self.kind(entry.object) != Some(ObjectKind::Partition) {
                    return Err(NtStatus::OBJECT_TYPE_MISMATCH);
                }
                if entry.granted_access & PartitionAccess::MODIFY.bits() == 0 {
                    return Err(NtStatus::ACCESS_DENIED);
                }
                entry.object
            }
        };

        let node = if preferred_node == ANY_NODE {
            self.least_loaded_node(node_count)
        } else {
            preferred_node as u32
        };

        let body = ObjectBody::Partition(PartitionBody {
            parent: Some(parent),
            preferred_node,
            node,
        });
        self.create(attributes, desired_access, body, config)
    }

    fn partitions(&self) -> impl Iterator<Item = (ObjectId, &PartitionBody)> + '_ {
        self.objects.iter().filter_map(|(id, object)| match &object.body {
            ObjectBody::Partition(body) => Some((*id, body)),
            _ => None,
        })
    }

    fn partition_count(&self) -> usize {
        self.partitions()
            .filter(|(id, _)| *id != self.system_partition)
            .count()
    }

    /// Node with the fewest partitions, lowest index on ties
    fn least_loaded_node(&self, node_count: u32) -> u32 {
        (0..node_count)
            .min_by_key(|node| {
                self.partitions()
                    .filter(|(id, body)| *id != self.system_partition && body.node == *node)
                    .count()
            })
            .unwrap_or(0)
    }

    fn close(&mut self, handle: Handle) -> NtStatus {
        let Some(entry) = self.handles.remove(&handle) else {
            return NtStatus::INVALID_HANDLE;
        };
        if let Some(object) = self.objects.get_mut(&entry.object) {
            object.handle_count = object.handle_count.saturating_sub(1);
        }
        self.release(entry.object);
        NtStatus::SUCCESS
    }

    /// Drop the name and then the object once nothing holds it
    fn release(&mut self, id: ObjectId) {
        let mut pending = vec![id];

        while let Some(id) = pending.pop() {
            let directory = match self.objects.get_mut(&id) {
                Some(object) if object.handle_count == 0 && !object.permanent => {
                    object.directory.take()
                }
                _ => continue,
            };
            if let Some(directory) = directory {
                self.unlink(directory, id);
                pending.push(directory);
            }

            let unreferenced = self
                .objects
                .get(&id)
                .map_or(false, |object| object.pointer_count == 0);
            if !unreferenced {
                continue;
            }

            if let Some(object) = self.objects.remove(&id) {
                log::trace!("[OB] Deleted {} object {}", object.body.kind(), id);
                if let ObjectBody::Partition(PartitionBody {
                    parent: Some(parent),
                    ..
                }) = object.body
                {
                    if let Some(parent_object) = self.objects.get_mut(&parent) {
                        parent_object.pointer_count = parent_object.pointer_count.saturating_sub(1);
                    }
                    pending.push(parent);
                }
            }
        }
    }
}

/// In-memory object manager
pub struct ObjectNamespace {
    config: NamespaceConfig,
    state: RwLock<NamespaceState>,
}

impl ObjectNamespace {
    /// Boot a namespace with default limits
    pub fn new() -> Self {
        Self::with_config(NamespaceConfig::default())
    }

    pub fn with_config(config: NamespaceConfig) -> Self {
        log::debug!(
            "[OB] Namespace initialized ({} node(s), {} partition(s) max)",
            config.node_count,
            config.max_partitions
        );
        Self {
            config,
            state: RwLock::new(NamespaceState::boot()),
        }
    }

    #[inline]
    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// NtOpenDirectoryObject
    pub fn open_directory(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: u32,
    ) -> Result<OwnedHandle<'_, Self>, NtStatus> {
        let grant = self
            .state
            .write()
            .open(attributes, desired_access, ObjectKind::Directory, &self.config)?;
        Ok(OwnedHandle::from_grant(self, grant))
    }

    /// NtCreateDirectoryObject
    pub fn create_directory(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: u32,
    ) -> Result<OwnedHandle<'_, Self>, NtStatus> {
        let body = ObjectBody::Directory(ObjectDirectory::new());
        let grant = self
            .state
            .write()
            .create(attributes, desired_access, body, &self.config)?;
        Ok(OwnedHandle::from_grant(self, grant))
    }

    /// NtCreateSymbolicLinkObject; `target` must be an absolute name
    pub fn create_symbolic_link(
        &self,
        attributes: &ObjectAttributes<'_>,
        target: &str,
    ) -> Result<OwnedHandle<'_, Self>, NtStatus> {
        let target = ObjectName::new(target).map_err(|_| NtStatus::OBJECT_NAME_INVALID)?;
        if !target.is_absolute() {
            return Err(NtStatus::OBJECT_PATH_SYNTAX_BAD);
        }

        let body = ObjectBody::SymbolicLink(target);
        let grant = self.state.write().create(
            attributes,
            symlink_access::SYMBOLIC_LINK_ALL_ACCESS,
            body,
            &self.config,
        )?;
        Ok(OwnedHandle::from_grant(self, grant))
    }

    /// Restrict the rights later opens of an object can be granted
    pub fn set_allowed_access(
        &self,
        attributes: &ObjectAttributes<'_>,
        allowed_access: u32,
    ) -> Result<(), NtStatus> {
        let mut state = self.state.write();
        let id = match state.lookup(attributes, self.config.max_reparse_depth)? {
            Lookup::Found(id) => id,
            Lookup::Missing { .. } => return Err(NtStatus::OBJECT_NAME_NOT_FOUND),
        };
        let object = state.objects.get_mut(&id).ok_or(NtStatus::OBJECT_NAME_NOT_FOUND)?;
        object.allowed_access = allowed_access & object.body.kind().generic_mapping().generic_all;
        Ok(())
    }

    /// Type of the object a name resolves to
    pub fn object_kind(&self, attributes: &ObjectAttributes<'_>) -> Result<ObjectKind, NtStatus> {
        let state = self.state.read();
        match state.lookup(attributes, self.config.max_reparse_depth)? {
            Lookup::Found(id) => state.kind(id).ok_or(NtStatus::OBJECT_NAME_NOT_FOUND),
            Lookup::Missing { .. } => Err(NtStatus::OBJECT_NAME_NOT_FOUND),
        }
    }

    /// Describe the partition behind a handle
    pub fn partition_info(&self, handle: BorrowedHandle<'_>) -> Result<PartitionInfo, NtStatus> {
        let state = self.state.read();
        let entry = state.handles.get(&handle.raw()).ok_or(NtStatus::INVALID_HANDLE)?;
        let object = state.objects.get(&entry.object).ok_or(NtStatus::INVALID_HANDLE)?;
        let ObjectBody::Partition(body) = &object.body else {
            return Err(NtStatus::OBJECT_TYPE_MISMATCH);
        };

        let under_system_partition = body.parent == Some(state.system_partition);
        let parent_path = body
            .parent
            .filter(|parent| *parent != state.system_partition)
            .and_then(|parent| state.path_of(parent));

        Ok(PartitionInfo {
            path: state.path_of(entry.object),
            parent_path,
            under_system_partition,
            preferred_node: body.preferred_node,
            node: body.node,
        })
    }

    pub fn handle_count(&self) -> usize {
        self.state.read().handles.len()
    }

    pub fn stats(&self) -> NamespaceStats {
        let state = self.state.read();
        let mut stats = NamespaceStats {
            object_count: state.objects.len(),
            handle_count: state.handles.len(),
            ..NamespaceStats::default()
        };
        for object in state.objects.values() {
            match object.body.kind() {
                ObjectKind::Directory => stats.directory_count += 1,
                ObjectKind::SymbolicLink => stats.symbolic_link_count += 1,
                ObjectKind::Partition => stats.partition_count += 1,
            }
        }
        stats
    }
}

impl Default for ObjectNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleApi for ObjectNamespace {
    fn close_handle(&self, handle: Handle) -> NtStatus {
        let status = self.state.write().close(handle);
        log::trace!("[OB] NtClose({:#x}) = {}", handle, status);
        status
    }
}

impl PartitionApi for ObjectNamespace {
    fn open_partition(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: PartitionAccess,
    ) -> Result<HandleGrant, NtStatus> {
        self.state.write().open(
            attributes,
            desired_access.bits(),
            ObjectKind::Partition,
            &self.config,
        )
    }

    fn create_partition(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: PartitionAccess,
        parent: Option<BorrowedHandle<'_>>,
        preferred_node: i32,
    ) -> Result<HandleGrant, NtStatus> {
        self.state.write().create_partition(
            attributes,
            desired_access.bits(),
            parent,
            preferred_node,
            &self.config,
        )
    }
}
