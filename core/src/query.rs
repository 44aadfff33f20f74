//! Parameter bags for read requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a request addresses a single user. Exactly one mode per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserIdentifier {
    Id(String),
    Email(String),
    EmployeeId(String),
}

impl UserIdentifier {
    pub fn element_name(&self) -> &'static str {
        match self {
            UserIdentifier::Id(_) => "ID",
            UserIdentifier::Email(_) => "Email",
            UserIdentifier::EmployeeId(_) => "EmployeeID",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            UserIdentifier::Id(v) | UserIdentifier::Email(v) | UserIdentifier::EmployeeId(v) => v,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }
}

/// Look up one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetUserQuery {
    pub identifier: Option<UserIdentifier>,
}

impl GetUserQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            identifier: Some(UserIdentifier::Id(id.into())),
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            identifier: Some(UserIdentifier::Email(email.into())),
        }
    }

    pub fn by_employee_id(employee_id: impl Into<String>) -> Self {
        Self {
            identifier: Some(UserIdentifier::EmployeeId(employee_id.into())),
        }
    }
}

/// List the groups one user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetUserGroupsQuery {
    pub identifier: Option<UserIdentifier>,
}

impl From<GetUserQuery> for GetUserGroupsQuery {
    fn from(query: GetUserQuery) -> Self {
        Self {
            identifier: query.identifier,
        }
    }
}

/// A text filter that either matches exactly or by substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTag {
    Exact(String),
    Contains(String),
}

impl MatchTag {
    pub fn match_type(&self) -> &'static str {
        match self {
            MatchTag::Exact(_) => "EXACT",
            MatchTag::Contains(_) => "CONTAINS",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            MatchTag::Exact(v) | MatchTag::Contains(v) => v,
        }
    }
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeTag {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRangeTag {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }
}

/// Filters and paging for `listUsers`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// `NAME` or `EMPLOYEE_ID`.
    pub sort_field: Option<String>,
    /// `ASC` or `DESC`.
    pub sort_order: Option<String>,
    pub email: Option<MatchTag>,
    pub employee_id: Option<MatchTag>,
    pub name: Option<MatchTag>,
    pub home_group: Option<String>,
    pub group_name: Option<String>,
    /// `Active`, `Inactive` or `All`.
    pub user_status: Option<String>,
    pub created_date: Option<DateRangeTag>,
    pub modified_date: Option<DateRangeTag>,
    pub teams: Vec<String>,
}

/// Filters and output columns for `getLearnerReport`.
///
/// The vendor needs a group scope: at least one group name or a group
/// status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLearnerReportQuery {
    pub enrollment_id: Option<String>,
    pub group_names: Vec<String>,
    /// `Active`, `Inactive` or `All`.
    pub group_status: Option<String>,
    pub learning_module_ids: Vec<String>,
    /// `Active`, `Inactive` or `All`.
    pub user_status: Option<String>,
    pub user_emails: Vec<String>,
    pub user_employee_ids: Vec<String>,
    pub created_date: Option<DateRangeTag>,
    pub modified_date: Option<DateRangeTag>,
    pub columns: Vec<String>,
    pub custom_fields: Vec<String>,
}
