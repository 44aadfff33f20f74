use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{filled, Action, PermissionAction};

/// A SmarterU group.
///
/// `name` and `group_id` identify the group. To rename it, put the current
/// identifier in `old_name` / `old_group_id` and the new value in `name` /
/// `group_id`; see [`Group::without_rename`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub name: Option<String>,
    pub group_id: Option<String>,
    pub old_name: Option<String>,
    pub old_group_id: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub home_group_message: Option<String>,
    pub notification_emails: Vec<String>,
    pub user_help_override_default: Option<bool>,
    pub user_help_enabled: Option<bool>,
    pub user_help_email: Vec<String>,
    pub user_help_text: Option<String>,
    pub tags: Vec<Tag>,
    pub user_limit_enabled: Option<bool>,
    pub user_limit_amount: Option<u32>,
    pub users: Vec<GroupPermissions>,
    pub learning_modules: Vec<LearningModule>,
    pub subscription_variants: Vec<SubscriptionVariant>,
    pub dashboard_set_id: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
    /// Set by user-group lookups: whether this is the user's home group.
    pub home_group: Option<bool>,
    /// Set by user-group lookups: permission codes the user holds here.
    pub permissions: Vec<String>,
}

/// How a request addresses an existing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupIdentifier {
    Name(String),
    Id(String),
}

impl Group {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Current identifier, name first.
    pub fn identifier(&self) -> Option<GroupIdentifier> {
        if let Some(name) = filled(&self.name) {
            return Some(GroupIdentifier::Name(name.clone()));
        }
        filled(&self.group_id).cloned().map(GroupIdentifier::Id)
    }

    /// The identifier an update addresses: a pending rename's old value if
    /// one is set, otherwise the current identifier.
    pub fn target_identifier(&self) -> Option<GroupIdentifier> {
        if let Some(old) = filled(&self.old_name) {
            return Some(GroupIdentifier::Name(old.clone()));
        }
        if let Some(old) = filled(&self.old_group_id) {
            return Some(GroupIdentifier::Id(old.clone()));
        }
        self.identifier()
    }

    pub fn is_renaming(&self) -> bool {
        filled(&self.old_name).is_some() || filled(&self.old_group_id).is_some()
    }

    /// A copy with the rename identifiers cleared, so rendering it again
    /// addresses the group by its new identifier.
    pub fn without_rename(&self) -> Self {
        Self {
            old_name: None,
            old_group_id: None,
            ..self.clone()
        }
    }
}

/// A per-user membership record within a group update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermissions {
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub action: Action,
    pub home_group: bool,
    pub permissions: Vec<Permission>,
}

impl GroupPermissions {
    pub fn new(action: Action) -> Self {
        Self {
            email: None,
            employee_id: None,
            action,
            home_group: false,
            permissions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
    pub action: Option<PermissionAction>,
}

impl Permission {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            action: None,
        }
    }
}

/// A group tag, addressed by ID or by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub tag_id: Option<String>,
    pub tag_name: Option<String>,
    pub tag_values: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningModule {
    pub id: String,
    pub action: Option<Action>,
    pub allow_self_enroll: bool,
    pub auto_enroll: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionVariant {
    pub id: String,
    pub action: Option<Action>,
    pub requires_credits: bool,
}
