//! Handles
//!
//! A handle is a small integer naming an entry in the object manager's
//! handle table. This module gives it ownership semantics:
//!
//! - [`OwnedHandle`]: returned by a successful open or create. The caller owns
//!   it exclusively and it is closed exactly once, explicitly or on drop.
//! - [`BorrowedHandle`]: a non-owning reference used for root directories and
//!   parent partitions. Borrowed handles are never closed here; the borrow
//!   keeps the owner alive for as long as the reference is in use.
//!
//! # Handle Format
//! Handles are multiples of 4 (so bits 0-1 are always 0).

use core::fmt;
use core::marker::PhantomData;

use super::status::NtStatus;

/// Handle type (unsigned 32-bit, like Windows HANDLE)
pub type Handle = u32;

/// Invalid handle value
pub const INVALID_HANDLE_VALUE: Handle = 0xFFFF_FFFF;

/// Null handle
pub const NULL_HANDLE: Handle = 0;

/// Handle increment (handles are multiples of 4)
pub const HANDLE_INCREMENT: Handle = 4;

/// Maximum handles per handle table
pub const MAX_HANDLES: usize = 1024;

/// Closing half of the object manager services
pub trait HandleApi {
    /// NtClose
    fn close_handle(&self, handle: Handle) -> NtStatus;
}

/// What a successful open or create service hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleGrant {
    /// The new handle
    pub handle: Handle,
    /// Access mask recorded in the handle table entry
    pub granted_access: u32,
    /// `SUCCESS`, or an informational code such as `OBJECT_NAME_EXISTS`
    pub status: NtStatus,
}

/// Non-owning handle reference
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BorrowedHandle<'a> {
    raw: Handle,
    _owner: PhantomData<&'a ()>,
}

impl BorrowedHandle<'_> {
    /// Borrow a raw handle value
    ///
    /// The caller keeps the handle open while the borrow is in use.
    #[inline]
    pub const fn borrow_raw(raw: Handle) -> Self {
        Self {
            raw,
            _owner: PhantomData,
        }
    }

    #[inline]
    pub const fn raw(&self) -> Handle {
        self.raw
    }
}

impl fmt::Debug for BorrowedHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BorrowedHandle({:#x})", self.raw)
    }
}

/// Owned handle, closed through the service that opened it
pub struct OwnedHandle<'m, A: HandleApi + ?Sized> {
    api: &'m A,
    raw: Handle,
    granted_access: u32,
    status: NtStatus,
}

impl<'m, A: HandleApi + ?Sized> OwnedHandle<'m, A> {
    /// Take ownership of a freshly granted handle
    pub fn from_grant(api: &'m A, grant: HandleGrant) -> Self {
        Self {
            api,
            raw: grant.handle,
            granted_access: grant.granted_access,
            status: grant.status,
        }
    }

    #[inline]
    pub fn raw(&self) -> Handle {
        self.raw
    }

    #[inline]
    pub fn granted_access(&self) -> u32 {
        self.granted_access
    }

    /// Completion status of the open or create that produced this handle
    #[inline]
    pub fn status(&self) -> NtStatus {
        self.status
    }

    /// Lend the handle as a root or parent
    #[inline]
    pub fn as_borrowed(&self) -> BorrowedHandle<'_> {
        BorrowedHandle::borrow_raw(self.raw)
    }

    /// Close the handle and report the outcome
    pub fn close(mut self) -> Result<(), NtStatus> {
        let raw = core::mem::replace(&mut self.raw, NULL_HANDLE);
        self.api.close_handle(raw).ok().map(|_| ())
    }

    /// Give up ownership without closing
    pub fn into_raw(mut self) -> Handle {
        core::mem::replace(&mut self.raw, NULL_HANDLE)
    }
}

impl<A: HandleApi + ?Sized> Drop for OwnedHandle<'_, A> {
    fn drop(&mut self) {
        if self.raw == NULL_HANDLE {
            return;
        }
        let status = self.api.close_handle(self.raw);
        if !status.is_success() {
            log::warn!("[OB] Failed to close handle {:#x}: {}", self.raw, status);
        }
    }
}

impl<A: HandleApi + ?Sized> fmt::Debug for OwnedHandle<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedHandle")
            .field("raw", &format_args!("{:#x}", self.raw))
            .field("granted_access", &format_args!("{:#x}", self.granted_access))
            .field("status", &self.status)
            .finish()
    }
}
