//! Blocking client for the SmarterU learning-management API.
//!
//! # Overview
//! SmarterU exposes a single XML-over-HTTP endpoint. Each request is an XML
//! document carrying the account and user API keys, a method name and the
//! method's parameters, posted as the URL-encoded `Package` form field. The
//! response is an XML envelope with `<Result>`, `<Info>` and `<Errors>`.
//!
//! # Design
//! - `XmlGenerator` renders request documents and is a pure function of its
//!   input and the credentials. Validation runs before any XML is written.
//! - `Client` posts the documents through an injected `Transport` and maps
//!   responses back into `User`, `Group`, `LearnerReport` and friends.
//! - Vendor failures surface as one `Error::SmarterU` carrying every vendor
//!   error code. Lookups return `Ok(None)` for the configured not-found codes.
//!
//! ```no_run
//! # fn main() -> smarteru_core::Result<()> {
//! let client = smarteru_core::Client::new("account-key", "user-key");
//! if let Some(user) = client.read_user_by_email("learner@example.com")? {
//!     println!("{:?} {:?}", user.given_name, user.surname);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod http;
pub mod method;
pub mod query;
mod response;
pub mod types;
mod validation;
mod xml;

pub use client::{Client, GroupUpdate};
pub use config::{ClientConfig, Credentials};
pub use error::{Error, Result, SmarterUError, SMARTERU_EXCEPTION_MESSAGE};
pub use generator::{GroupUpdateRequest, XmlGenerator};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use method::Method;
pub use query::{
    DateRangeTag, GetLearnerReportQuery, GetUserGroupsQuery, GetUserQuery, ListUsersQuery, MatchTag,
    UserIdentifier,
};
pub use types::{
    Action, ErrorCode, ExternalAuthorization, Group, GroupIdentifier, GroupPermissions, LearnerReport,
    LearningModule, Permission, PermissionAction, SubscriptionVariant, Tag, Timezone, User,
};
