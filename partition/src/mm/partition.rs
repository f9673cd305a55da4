//! Memory Partitions
//!
//! Opening and creating memory partition objects by name.
//!
//! # Operations
//!
//! - [`open`]: NtOpenPartition on already resolved attributes
//! - [`create`]: NtCreatePartition on already resolved attributes
//! - [`get_partition`] / [`new_partition`]: resolve a path, then open or create
//! - [`invoke`]: the same two verbs selected by [`PartitionVerb`]
//!
//! Each operation issues exactly one privileged call. Open never creates,
//! create never falls back to open, and a failing status is handed back
//! unchanged inside an [`AccessError`].

use bitflags::bitflags;

use crate::ob::access::{generic_rights, special_rights, standard_rights, GenericMapping};
use crate::ob::attributes::ObjectAttributes;
use crate::ob::error::{AccessError, Operation};
use crate::ob::handle::{BorrowedHandle, Handle, HandleApi, HandleGrant, OwnedHandle};
use crate::ob::resolve::{resolve, CurrentLocation, ResolutionError, ResolverOptions};
use crate::ob::status::NtStatus;

/// Wire value for "let the system choose the node"
pub const ANY_NODE: i32 = -1;

bitflags! {
    /// Access rights for partition objects
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PartitionAccess: u32 {
        const QUERY = 0x0001;
        const MODIFY = 0x0002;

        const DELETE = standard_rights::DELETE;
        const READ_CONTROL = standard_rights::READ_CONTROL;
        const WRITE_DAC = standard_rights::WRITE_DAC;
        const WRITE_OWNER = standard_rights::WRITE_OWNER;
        const SYNCHRONIZE = standard_rights::SYNCHRONIZE;

        const ACCESS_SYSTEM_SECURITY = special_rights::ACCESS_SYSTEM_SECURITY;
        const MAXIMUM_ALLOWED = special_rights::MAXIMUM_ALLOWED;

        const GENERIC_READ = generic_rights::GENERIC_READ;
        const GENERIC_WRITE = generic_rights::GENERIC_WRITE;
        const GENERIC_EXECUTE = generic_rights::GENERIC_EXECUTE;
        const GENERIC_ALL = generic_rights::GENERIC_ALL;

        /// MEMORY_PARTITION_ALL_ACCESS
        const ALL_ACCESS = standard_rights::STANDARD_RIGHTS_REQUIRED
            | standard_rights::SYNCHRONIZE
            | 0x0001
            | 0x0002;
    }
}

impl Default for PartitionAccess {
    fn default() -> Self {
        PartitionAccess::MAXIMUM_ALLOWED
    }
}

/// Generic mapping for partition objects
pub const PARTITION_GENERIC_MAPPING: GenericMapping = GenericMapping {
    generic_read: standard_rights::READ_CONTROL | 0x0001,
    generic_write: standard_rights::READ_CONTROL | 0x0002,
    generic_execute: standard_rights::READ_CONTROL | standard_rights::SYNCHRONIZE,
    generic_all: 0x001F_0003,
};

/// NUMA node hint for a new partition: `-1` or a node index
///
/// Holds the wire value, so every hint reaches the service unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreferredNode(i32);

/// A node value that is neither `-1` nor an `i32` node index
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("preferred node {0} is neither -1 nor a node index")]
pub struct InvalidNodeValue(pub i64);

impl PreferredNode {
    /// Let the system choose
    pub const ANY: Self = Self(ANY_NODE);

    /// A specific node
    pub fn node(index: u32) -> Result<Self, InvalidNodeValue> {
        i32::try_from(index)
            .map(Self)
            .map_err(|_| InvalidNodeValue(i64::from(index)))
    }

    #[inline]
    pub fn is_any(self) -> bool {
        self.0 == ANY_NODE
    }

    /// Node index, `None` for [`PreferredNode::ANY`]
    pub fn index(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    /// Wire form
    #[inline]
    pub fn to_raw(self) -> i32 {
        self.0
    }
}

impl Default for PreferredNode {
    fn default() -> Self {
        PreferredNode::ANY
    }
}

impl TryFrom<i32> for PreferredNode {
    type Error = InvalidNodeValue;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value >= ANY_NODE {
            Ok(Self(value))
        } else {
            Err(InvalidNodeValue(i64::from(value)))
        }
    }
}

/// Creation-only parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreationParameters<'a> {
    /// Parent partition; `None` means the system partition
    pub parent: Option<BorrowedHandle<'a>>,
    pub preferred_node: PreferredNode,
}

impl<'a> CreationParameters<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: BorrowedHandle<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_preferred_node(mut self, preferred_node: PreferredNode) -> Self {
        self.preferred_node = preferred_node;
        self
    }
}

/// Partition services of the object manager
pub trait PartitionApi: HandleApi {
    /// NtOpenPartition
    fn open_partition(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: PartitionAccess,
    ) -> Result<HandleGrant, NtStatus>;

    /// NtCreatePartition
    fn create_partition(
        &self,
        attributes: &ObjectAttributes<'_>,
        desired_access: PartitionAccess,
        parent: Option<BorrowedHandle<'_>>,
        preferred_node: i32,
    ) -> Result<HandleGrant, NtStatus>;
}

/// Open partition handle
pub struct PartitionHandle<'m, A: PartitionApi + ?Sized> {
    handle: OwnedHandle<'m, A>,
}

impl<'m, A: PartitionApi + ?Sized> PartitionHandle<'m, A> {
    fn from_grant(api: &'m A, grant: HandleGrant) -> Self {
        Self {
            handle: OwnedHandle::from_grant(api, grant),
        }
    }

    #[inline]
    pub fn raw(&self) -> Handle {
        self.handle.raw()
    }

    pub fn granted_access(&self) -> PartitionAccess {
        PartitionAccess::from_bits_retain(self.handle.granted_access())
    }

    #[inline]
    pub fn status(&self) -> NtStatus {
        self.handle.status()
    }

    /// Create returned an existing partition (OBJ_OPENIF)
    pub fn opened_existing(&self) -> bool {
        self.handle.status() == NtStatus::OBJECT_NAME_EXISTS
    }

    /// Lend the handle as a root or parent
    #[inline]
    pub fn as_borrowed(&self) -> BorrowedHandle<'_> {
        self.handle.as_borrowed()
    }

    pub fn close(self) -> Result<(), AccessError> {
        self.handle
            .close()
            .map_err(|status| AccessError::new(Operation::Close, status))
    }

    /// Give up ownership without closing
    pub fn into_raw(self) -> Handle {
        self.handle.into_raw()
    }
}

impl<A: PartitionApi + ?Sized> core::fmt::Debug for PartitionHandle<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PartitionHandle")
            .field("raw", &format_args!("{:#x}", self.raw()))
            .field("granted_access", &self.granted_access())
            .field("status", &self.status())
            .finish()
    }
}

/// Open an existing partition
pub fn open<'m, A: PartitionApi + ?Sized>(
    api: &'m A,
    attributes: &ObjectAttributes<'_>,
    access: PartitionAccess,
) -> Result<PartitionHandle<'m, A>, AccessError> {
    log::trace!("[MM] NtOpenPartition({}, {:#x})", attributes, access.bits());

    match api.open_partition(attributes, access) {
        Ok(grant) => Ok(PartitionHandle::from_grant(api, grant)),
        Err(status) => {
            log::debug!("[MM] Open of partition {} failed: {}", attributes, status);
            Err(AccessError::new(Operation::Open, status))
        }
    }
}

/// Create a partition
///
/// Parent and preferred node go to the service unmodified. What happens when
/// the name already exists is up to the service: a collision, or the existing
/// partition when the attributes carry OBJ_OPENIF.
pub fn create<'m, A: PartitionApi + ?Sized>(
    api: &'m A,
    attributes: &ObjectAttributes<'_>,
    access: PartitionAccess,
    params: &CreationParameters<'_>,
) -> Result<PartitionHandle<'m, A>, AccessError> {
    let preferred_node = params.preferred_node.to_raw();
    log::trace!(
        "[MM] NtCreatePartition({}, {:#x}, parent {:?}, node {})",
        attributes,
        access.bits(),
        params.parent,
        preferred_node
    );

    match api.create_partition(attributes, access, params.parent, preferred_node) {
        Ok(grant) => Ok(PartitionHandle::from_grant(api, grant)),
        Err(status) => {
            log::debug!("[MM] Create of partition {} failed: {}", attributes, status);
            Err(AccessError::new(Operation::Create, status))
        }
    }
}

/// Failure of a verb: bad input, or a failed privileged call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartitionError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl PartitionError {
    pub fn status(&self) -> NtStatus {
        match self {
            PartitionError::Resolution(error) => error.status(),
            PartitionError::Access(error) => error.status(),
        }
    }
}

/// Path plus everything needed to resolve it
#[derive(Debug, Clone, Copy)]
pub struct PartitionRequest<'a> {
    path: &'a str,
    root: Option<BorrowedHandle<'a>>,
    location: Option<CurrentLocation<'a>>,
    options: ResolverOptions,
    access: PartitionAccess,
}

impl<'a> PartitionRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            root: None,
            location: None,
            options: ResolverOptions::default(),
            access: PartitionAccess::default(),
        }
    }

    pub fn with_root(mut self, root: BorrowedHandle<'a>) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_location(mut self, location: CurrentLocation<'a>) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_access(mut self, access: PartitionAccess) -> Self {
        self.access = access;
        self
    }

    #[inline]
    pub fn path(&self) -> &'a str {
        self.path
    }

    #[inline]
    pub fn access(&self) -> PartitionAccess {
        self.access
    }

    pub fn resolve(&self) -> Result<ObjectAttributes<'a>, ResolutionError> {
        resolve(self.path, self.root, self.location.as_ref(), &self.options)
    }
}

/// Which of the two verbs to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionVerb<'a> {
    /// Open only
    Get,
    /// Create only
    New(CreationParameters<'a>),
}

/// Resolve and open; never creates
pub fn get_partition<'m, A: PartitionApi + ?Sized>(
    api: &'m A,
    request: &PartitionRequest<'_>,
) -> Result<PartitionHandle<'m, A>, PartitionError> {
    let attributes = request.resolve()?;
    Ok(open(api, &attributes, request.access())?)
}

/// Resolve and create; never falls back to open
pub fn new_partition<'m, A: PartitionApi + ?Sized>(
    api: &'m A,
    request: &PartitionRequest<'_>,
    params: &CreationParameters<'_>,
) -> Result<PartitionHandle<'m, A>, PartitionError> {
    let attributes = request.resolve()?;
    Ok(create(api, &attributes, request.access(), params)?)
}

pub fn invoke<'m, A: PartitionApi + ?Sized>(
    api: &'m A,
    request: &PartitionRequest<'_>,
    verb: PartitionVerb<'_>,
) -> Result<PartitionHandle<'m, A>, PartitionError> {
    log::debug!("[MM] {:?} partition {}", verb, request.path());
    match verb {
        PartitionVerb::Get => get_partition(api, request),
        PartitionVerb::New(params) => new_partition(api, request, &params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ob::error::AccessErrorKind;
    use crate::ob::namespace::{NamespaceConfig, ObjectNamespace};
    use crate::ob::resolve::RootConflictPolicy;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// One privileged call as the fake saw it
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Open {
            name: Option<String>,
            root: Option<Handle>,
        },
        Create {
            name: Option<String>,
            parent: Option<Handle>,
            node: i32,
        },
        Close(Handle),
    }

    fn opened(path: &str) -> Call {
        Call::Open {
            name: Some(String::from(path)),
            root: None,
        }
    }

    fn created(path: &str, parent: Option<Handle>, node: i32) -> Call {
        Call::Create {
            name: Some(String::from(path)),
            parent,
            node,
        }
    }

    /// Answers every call with one fixed outcome and records it
    struct RecordingApi {
        calls: RefCell<Vec<Call>>,
        outcome: Result<HandleGrant, NtStatus>,
    }

    impl RecordingApi {
        fn granting() -> Self {
            Self::answering(Ok(HandleGrant {
                handle: 0x24,
                granted_access: 0x1,
                status: NtStatus::SUCCESS,
            }))
        }

        fn answering(outcome: Result<HandleGrant, NtStatus>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                outcome,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    fn name_of(attributes: &ObjectAttributes<'_>) -> Option<String> {
        attributes.name().map(|name| String::from(name.as_str()))
    }

    impl HandleApi for RecordingApi {
        fn close_handle(&self, handle: Handle) -> NtStatus {
            self.calls.borrow_mut().push(Call::Close(handle));
            NtStatus::SUCCESS
        }
    }

    impl PartitionApi for RecordingApi {
        fn open_partition(
            &self,
            attributes: &ObjectAttributes<'_>,
            _desired_access: PartitionAccess,
        ) -> Result<HandleGrant, NtStatus> {
            self.calls.borrow_mut().push(Call::Open {
                name: name_of(attributes),
                root: attributes.root().map(|root| root.raw()),
            });
            self.outcome
        }

        fn create_partition(
            &self,
            attributes: &ObjectAttributes<'_>,
            _desired_access: PartitionAccess,
            parent: Option<BorrowedHandle<'_>>,
            preferred_node: i32,
        ) -> Result<HandleGrant, NtStatus> {
            self.calls.borrow_mut().push(Call::Create {
                name: name_of(attributes),
                parent: parent.map(|parent| parent.raw()),
                node: preferred_node,
            });
            self.outcome
        }
    }

    const ABC: &str = "\\BaseNamedObjects\\ABC";

    /// New partition under `\BaseNamedObjects`
    fn create_named<'m>(
        ns: &'m ObjectNamespace,
        name: &str,
        params: &CreationParameters<'_>,
    ) -> Result<PartitionHandle<'m, ObjectNamespace>, PartitionError> {
        let path = alloc::format!("\\BaseNamedObjects\\{}", name);
        new_partition(ns, &PartitionRequest::new(&path), params)
    }

    fn open_base_named_objects(ns: &ObjectNamespace) -> OwnedHandle<'_, ObjectNamespace> {
        let attributes = PartitionRequest::new("\\BaseNamedObjects").resolve().unwrap();
        ns.open_directory(&attributes, 0).unwrap()
    }

    #[test]
    fn test_access_defaults() {
        assert_eq!(PartitionAccess::default(), PartitionAccess::MAXIMUM_ALLOWED);
        assert_eq!(PartitionAccess::ALL_ACCESS.bits(), 0x001F_0003);
        assert_eq!(
            PARTITION_GENERIC_MAPPING.generic_all,
            PartitionAccess::ALL_ACCESS.bits()
        );
    }

    #[test]
    fn test_preferred_node_conversion() {
        assert_eq!(PreferredNode::try_from(-1), Ok(PreferredNode::ANY));
        assert_eq!(PreferredNode::try_from(2), PreferredNode::node(2));
        assert_eq!(PreferredNode::try_from(-2), Err(InvalidNodeValue(-2)));
        assert_eq!(PreferredNode::default(), PreferredNode::ANY);

        assert!(PreferredNode::ANY.is_any());
        assert_eq!(PreferredNode::ANY.index(), None);
        assert_eq!(PreferredNode::ANY.to_raw(), -1);

        let two = PreferredNode::node(2).unwrap();
        assert_eq!(two.index(), Some(2));
        assert_eq!(two.to_raw(), 2);

        // No wire form for indices past i32::MAX
        assert_eq!(
            PreferredNode::node(3_000_000_000),
            Err(InvalidNodeValue(3_000_000_000))
        );
        let last = PreferredNode::node(i32::MAX as u32).unwrap();
        assert_eq!(last.to_raw(), i32::MAX);
    }

    #[test]
    fn test_relative_path_without_root_makes_no_call() {
        let api = RecordingApi::granting();
        let request = PartitionRequest::new("ABC");

        let error = get_partition(&api, &request).unwrap_err();
        assert_eq!(
            error,
            PartitionError::Resolution(ResolutionError::RelativePathWithoutRoot)
        );
        assert_eq!(error.status(), NtStatus::OBJECT_PATH_SYNTAX_BAD);
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_absolute_path_ignores_root() {
        let api = RecordingApi::granting();
        let root = BorrowedHandle::borrow_raw(0x10);
        let request = PartitionRequest::new(ABC).with_root(root);

        let handle = get_partition(&api, &request).unwrap();
        drop(handle);
        assert_eq!(api.calls(), [opened(ABC), Call::Close(0x24)]);

        let strict = ResolverOptions {
            root_conflict: RootConflictPolicy::Reject,
            ..Default::default()
        };
        let rejected = get_partition(&api, &request.with_options(strict));
        assert!(matches!(
            rejected,
            Err(PartitionError::Resolution(ResolutionError::RootWithAbsolutePath))
        ));
    }

    #[test]
    fn test_get_only_opens() {
        let api = RecordingApi::answering(Err(NtStatus::OBJECT_NAME_NOT_FOUND));
        let error = invoke(&api, &PartitionRequest::new(ABC), PartitionVerb::Get).unwrap_err();

        let PartitionError::Access(error) = error else {
            panic!("expected an access error");
        };
        assert_eq!(error.operation(), Operation::Open);
        assert_eq!(error.kind(), AccessErrorKind::NotFound);
        assert_eq!(api.calls(), [opened(ABC)]);
    }

    #[test]
    fn test_new_only_creates() {
        let api = RecordingApi::answering(Err(NtStatus::OBJECT_NAME_COLLISION));
        let verb = PartitionVerb::New(CreationParameters::new());
        let error = invoke(&api, &PartitionRequest::new(ABC), verb).unwrap_err();

        assert_eq!(error.status(), NtStatus::OBJECT_NAME_COLLISION);
        assert_eq!(api.calls(), [created(ABC, None, -1)]);
    }

    #[test]
    fn test_create_passes_parameters_through() {
        let api = RecordingApi::granting();
        let parent = BorrowedHandle::borrow_raw(0x30);
        let params = CreationParameters::new()
            .with_parent(parent)
            .with_preferred_node(PreferredNode::node(2).unwrap());

        let handle = new_partition(&api, &PartitionRequest::new(ABC), &params).unwrap();
        assert_eq!(handle.into_raw(), 0x24);
        assert_eq!(api.calls(), [created(ABC, Some(0x30), 2)]);
    }

    #[test]
    fn test_unknown_status_preserved() {
        let odd = NtStatus(0xC0001234u32 as i32);
        let api = RecordingApi::answering(Err(odd));
        let attributes = PartitionRequest::new(ABC).resolve().unwrap();

        let error = open(&api, &attributes, PartitionAccess::QUERY).unwrap_err();
        assert_eq!(error.status(), odd);
        assert_eq!(error.kind(), AccessErrorKind::Other);
    }

    #[test]
    fn test_absolute_and_root_relative_name_the_same_object() {
        let ns = ObjectNamespace::new();
        let created = create_named(&ns, "ABC", &CreationParameters::new()).unwrap();

        let directory = open_base_named_objects(&ns);
        let relative = PartitionRequest::new("ABC").with_root(directory.as_borrowed());
        let opened = get_partition(&ns, &relative).unwrap();

        let created_info = ns.partition_info(created.as_borrowed()).unwrap();
        let opened_info = ns.partition_info(opened.as_borrowed()).unwrap();
        assert_eq!(created_info.path, opened_info.path);
        assert_eq!(ns.stats().partition_count, 2);
    }

    #[test]
    fn test_current_location() {
        let ns = ObjectNamespace::new();
        let _created = create_named(&ns, "ABC", &CreationParameters::new()).unwrap();

        let by_path = PartitionRequest::new("ABC")
            .with_location(CurrentLocation::Path("NtObject:\\BaseNamedObjects"));
        assert!(get_partition(&ns, &by_path).is_ok());

        let directory = open_base_named_objects(&ns);
        let by_handle = PartitionRequest::new("ABC")
            .with_location(CurrentLocation::Directory(directory.as_borrowed()));
        assert!(get_partition(&ns, &by_handle).is_ok());
    }

    #[test]
    fn test_open_never_creates() {
        let ns = ObjectNamespace::new();
        let error = get_partition(&ns, &PartitionRequest::new(ABC)).unwrap_err();
        assert_eq!(error.status(), NtStatus::OBJECT_NAME_NOT_FOUND);
        assert_eq!(ns.stats().partition_count, 1);
    }

    #[test]
    fn test_second_create() {
        let ns = ObjectNamespace::new();
        let request = PartitionRequest::new(ABC);
        let params = CreationParameters::new();
        let first = new_partition(&ns, &request, &params).unwrap();
        assert!(!first.opened_existing());

        let error = new_partition(&ns, &request, &params).unwrap_err();
        let PartitionError::Access(error) = error else {
            panic!("expected an access error");
        };
        assert_eq!(error.operation(), Operation::Create);
        assert_eq!(error.kind(), AccessErrorKind::NameCollision);

        let open_if = ResolverOptions {
            open_if: true,
            ..Default::default()
        };
        let second = new_partition(&ns, &request.with_options(open_if), &params).unwrap();
        assert!(second.opened_existing());
        assert_eq!(ns.stats().partition_count, 2);
    }

    #[test]
    fn test_preferred_node_on_namespace() {
        let ns = ObjectNamespace::with_config(NamespaceConfig {
            node_count: 4,
            ..NamespaceConfig::default()
        });

        let any = create_named(&ns, "Any", &CreationParameters::new()).unwrap();
        let info = ns.partition_info(any.as_borrowed()).unwrap();
        assert_eq!(info.preferred_node, -1);

        let node = |index| PreferredNode::node(index).unwrap();
        let pinned = CreationParameters::new().with_preferred_node(node(2));
        let two = create_named(&ns, "Two", &pinned).unwrap();
        let info = ns.partition_info(two.as_borrowed()).unwrap();
        assert_eq!((info.preferred_node, info.node), (2, 2));

        let out_of_range = CreationParameters::new().with_preferred_node(node(9));
        let error = create_named(&ns, "Nine", &out_of_range).unwrap_err();
        let PartitionError::Access(error) = error else {
            panic!("expected an access error");
        };
        assert_eq!(error.kind(), AccessErrorKind::InvalidNode);
    }

    #[test]
    fn test_child_partition() {
        let ns = ObjectNamespace::new();
        let parent = create_named(&ns, "Parent", &CreationParameters::new()).unwrap();
        let params = CreationParameters::new().with_parent(parent.as_borrowed());
        let child = create_named(&ns, "Child", &params).unwrap();

        let info = ns.partition_info(child.as_borrowed()).unwrap();
        assert_eq!(info.parent_path.as_deref(), Some("\\BaseNamedObjects\\Parent"));

        let query = PartitionRequest::new("\\BaseNamedObjects\\Parent")
            .with_access(PartitionAccess::QUERY);
        let weak_parent = get_partition(&ns, &query).unwrap();
        assert_eq!(weak_parent.granted_access(), PartitionAccess::QUERY);

        let params = CreationParameters::new().with_parent(weak_parent.as_borrowed());
        let error = create_named(&ns, "Other", &params).unwrap_err();
        assert_eq!(error.status(), NtStatus::ACCESS_DENIED);
    }

    #[test]
    fn test_close_reports_status() {
        let ns = ObjectNamespace::new();
        let handle = create_named(&ns, "ABC", &CreationParameters::new()).unwrap();
        assert_eq!(handle.granted_access(), PartitionAccess::ALL_ACCESS);
        assert_eq!(handle.close(), Ok(()));
        assert_eq!(ns.handle_count(), 0);

        let raw = create_named(&ns, "ABC", &CreationParameters::new())
            .unwrap()
            .into_raw();
        assert_eq!(ns.close_handle(raw), NtStatus::SUCCESS);
        assert_eq!(ns.close_handle(raw), NtStatus::INVALID_HANDLE);
    }
}
