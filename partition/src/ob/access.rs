//! Access Masks
//!
//! Every handle carries an access mask:
//!
//! - bits 28-31: generic rights (read, write, execute, all)
//! - bit 25: MAXIMUM_ALLOWED
//! - bit 24: ACCESS_SYSTEM_SECURITY
//! - bits 16-20: standard rights shared by all object types
//! - bits 0-15: type-specific rights
//!
//! Generic rights are translated to specific rights through the type's
//! [`GenericMapping`] before the check runs. MAXIMUM_ALLOWED grants
//! everything the object allows.

use super::status::NtStatus;

/// Generic access rights (mapped to specific rights per object type)
pub mod generic_rights {
    pub const GENERIC_READ: u32 = 0x8000_0000;
    pub const GENERIC_WRITE: u32 = 0x4000_0000;
    pub const GENERIC_EXECUTE: u32 = 0x2000_0000;
    pub const GENERIC_ALL: u32 = 0x1000_0000;
}

/// Standard access rights (apply to all object types)
pub mod standard_rights {
    pub const DELETE: u32 = 0x0001_0000;
    pub const READ_CONTROL: u32 = 0x0002_0000;
    pub const WRITE_DAC: u32 = 0x0004_0000;
    pub const WRITE_OWNER: u32 = 0x0008_0000;
    pub const SYNCHRONIZE: u32 = 0x0010_0000;

    pub const STANDARD_RIGHTS_REQUIRED: u32 = 0x000F_0000;
    pub const STANDARD_RIGHTS_ALL: u32 = 0x001F_0000;
}

/// Special access rights
pub mod special_rights {
    pub const ACCESS_SYSTEM_SECURITY: u32 = 0x0100_0000;
    pub const MAXIMUM_ALLOWED: u32 = 0x0200_0000;
}

/// Generic mapping - maps generic rights to specific rights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericMapping {
    pub generic_read: u32,
    pub generic_write: u32,
    pub generic_execute: u32,
    pub generic_all: u32,
}

impl GenericMapping {
    /// Map generic rights to specific rights
    pub fn map_generic(&self, access_mask: u32) -> u32 {
        let mut result = access_mask;

        if (result & generic_rights::GENERIC_READ) != 0 {
            result &= !generic_rights::GENERIC_READ;
            result |= self.generic_read;
        }
        if (result & generic_rights::GENERIC_WRITE) != 0 {
            result &= !generic_rights::GENERIC_WRITE;
            result |= self.generic_write;
        }
        if (result & generic_rights::GENERIC_EXECUTE) != 0 {
            result &= !generic_rights::GENERIC_EXECUTE;
            result |= self.generic_execute;
        }
        if (result & generic_rights::GENERIC_ALL) != 0 {
            result &= !generic_rights::GENERIC_ALL;
            result |= self.generic_all;
        }

        result
    }
}

/// Check a desired mask against what an object allows
///
/// # Arguments
/// * `desired_access` - Requested mask, generic bits and MAXIMUM_ALLOWED included
/// * `allowed_access` - Rights the object's security grants the caller
/// * `mapping` - Generic mapping of the object's type; `generic_all` doubles
///   as the type's valid access mask
///
/// # Returns
/// * `Ok(granted_access)` - Mask to record in the handle table
/// * `Err(STATUS_ACCESS_DENIED)` - A requested right is invalid or not allowed
pub fn access_check(
    desired_access: u32,
    allowed_access: u32,
    mapping: &GenericMapping,
) -> Result<u32, NtStatus> {
    let mut remaining = mapping.map_generic(desired_access);

    let maximum_allowed = (remaining & special_rights::MAXIMUM_ALLOWED) != 0;
    remaining &= !special_rights::MAXIMUM_ALLOWED;

    if remaining & !mapping.generic_all != 0 {
        return Err(NtStatus::ACCESS_DENIED);
    }
    if remaining & !allowed_access != 0 {
        return Err(NtStatus::ACCESS_DENIED);
    }

    if maximum_allowed {
        Ok((allowed_access & mapping.generic_all) | remaining)
    } else {
        Ok(remaining)
    }
}
