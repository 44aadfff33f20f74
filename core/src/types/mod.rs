//! Domain types exchanged with the SmarterU API.
//!
//! # Design
//! Every type is a plain struct with public, mostly optional fields and a
//! `Default` impl, so callers fill in what they have with struct-update
//! syntax. Absent optional fields are omitted from generated requests. Read
//! operations rebuild these values from the response; nothing is shared
//! between the value a caller passed in and the value returned.

mod action;
mod auth;
mod error_code;
mod group;
mod report;
mod timezone;
mod user;

pub use action::{Action, PermissionAction};
pub use auth::ExternalAuthorization;
pub use error_code::ErrorCode;
pub use group::{Group, GroupIdentifier, GroupPermissions, LearningModule, Permission, SubscriptionVariant, Tag};
pub use report::LearnerReport;
pub use timezone::Timezone;
pub use user::User;

/// `value` unless it is absent or blank. Blank identifiers address nothing
/// on the vendor side and are treated as missing.
pub(crate) fn filled(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|v| !v.trim().is_empty())
}
