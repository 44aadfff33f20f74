use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{filled, Timezone};
use crate::query::UserIdentifier;

/// A SmarterU learner account.
///
/// Any of `id`, `email` and `employee_id` identifies the account on the
/// vendor side; creating a user needs `email` or `employee_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: Option<String>,
    pub email: Option<String>,
    pub employee_id: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub password: Option<String>,
    pub timezone: Option<Timezone>,
    pub learner_notifications: Option<bool>,
    pub supervisor_notifications: Option<bool>,
    pub send_email_to: Option<String>,
    pub alternate_email: Option<String>,
    pub authentication_type: Option<String>,
    pub supervisors: Vec<String>,
    pub organization: Option<String>,
    pub teams: Vec<String>,
    pub roles: Vec<String>,
    pub language: Option<String>,
    pub status: Option<String>,
    pub title: Option<String>,
    pub division: Option<String>,
    pub allow_feedback: Option<bool>,
    pub phone_primary: Option<String>,
    pub phone_alternate: Option<String>,
    pub phone_mobile: Option<String>,
    pub fax: Option<String>,
    pub website: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub send_mail_to: Option<String>,
    pub receive_notifications: Option<bool>,
    pub home_group: Option<String>,
    pub created_date: Option<NaiveDateTime>,
    pub modified_date: Option<NaiveDateTime>,
}

impl User {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn with_employee_id(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    /// The identifier used when this user is the target of an update:
    /// ID first, then email, then employee ID. Blank values are skipped.
    pub fn identifier(&self) -> Option<UserIdentifier> {
        if let Some(id) = filled(&self.id) {
            return Some(UserIdentifier::Id(id.clone()));
        }
        if let Some(email) = filled(&self.email) {
            return Some(UserIdentifier::Email(email.clone()));
        }
        filled(&self.employee_id).cloned().map(UserIdentifier::EmployeeId)
    }
}
