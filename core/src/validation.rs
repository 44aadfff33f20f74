//! Field-presence and enumerated-value rules consulted by the generator.
//!
//! # Design
//! Each request kind has a table of `Rule`s. A rule pairs the message raised
//! on violation with a predicate that holds for valid input; `Required`
//! rules raise `MissingValue`, `OneOf` rules raise `InvalidArgument`. Tables
//! are checked in order and the first violation wins.

use crate::error::{Error, Result};
use crate::query::{GetLearnerReportQuery, GetUserGroupsQuery, GetUserQuery, ListUsersQuery, UserIdentifier};
use crate::types::{filled, Group, GroupPermissions, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RuleKind {
    Required,
    OneOf,
}

pub(crate) struct Rule<T: ?Sized> {
    pub kind: RuleKind,
    pub message: &'static str,
    pub holds: fn(&T) -> bool,
}

pub(crate) fn check<T: ?Sized>(value: &T, rules: &[Rule<T>]) -> Result<()> {
    match rules.iter().find(|rule| !(rule.holds)(value)) {
        None => Ok(()),
        Some(rule) if rule.kind == RuleKind::Required => Err(Error::missing(rule.message)),
        Some(rule) => Err(Error::invalid(rule.message)),
    }
}

pub(crate) const USER_STATUSES: &[&str] = &["Active", "Inactive"];
pub(crate) const SEND_EMAIL_TO: &[&str] = &["Supervisor", "Self", "Alternate"];
pub(crate) const SEND_MAIL_TO: &[&str] = &["Organization", "Personal"];
pub(crate) const AUTHENTICATION_TYPES: &[&str] = &["SmarterU", "External", "Both"];
pub(crate) const GROUP_STATUSES: &[&str] = &["Active", "Inactive"];
pub(crate) const FILTER_STATUSES: &[&str] = &["Active", "Inactive", "All"];
pub(crate) const SORT_FIELDS: &[&str] = &["NAME", "EMPLOYEE_ID"];
pub(crate) const SORT_ORDERS: &[&str] = &["ASC", "DESC"];

pub(crate) const LEARNER_REPORT_COLUMNS: &[&str] = &[
    "ALTERNATE_EMAIL",
    "COMPLETED_DATE",
    "COURSE_DURATION",
    "COURSE_NAME",
    "DIVISION",
    "DUE_DATE",
    "EMPLOYEE_ID",
    "ENROLLED_DATE",
    "GRADE",
    "GRADE_PERCENTAGE",
    "GROUP_ID",
    "GROUP_NAME",
    "LAST_ACCESSED_DATE",
    "POINTS",
    "PROGRESS",
    "STARTED_DATE",
    "SUBSCRIPTION_NAME",
    "TITLE",
    "USER_EMAIL",
    "VARIANT_NAME",
];

fn one_of(value: Option<&str>, allowed: &[&str]) -> bool {
    value.map_or(true, |v| allowed.contains(&v))
}

pub(crate) const GET_USER: &[Rule<GetUserQuery>] = &[Rule {
    kind: RuleKind::Required,
    message: "Cannot read a User without an ID, email address or employee ID.",
    holds: |q| has_user_identifier(q.identifier.as_ref()),
}];

pub(crate) const GET_USER_GROUPS: &[Rule<GetUserGroupsQuery>] = &[Rule {
    kind: RuleKind::Required,
    message: "Cannot read a User's Groups without an ID, email address or employee ID.",
    holds: |q| has_user_identifier(q.identifier.as_ref()),
}];

pub(crate) const EXTERNAL_AUTHORIZATION: &[Rule<UserIdentifier>] = &[Rule {
    kind: RuleKind::Required,
    message: "Cannot request external authorization without an email address or employee ID.",
    holds: |id| !id.is_blank(),
}];

fn has_user_identifier(identifier: Option<&UserIdentifier>) -> bool {
    identifier.is_some_and(|id| !id.is_blank())
}

const USER_ENUMERATIONS: &[Rule<User>] = &[
    Rule {
        kind: RuleKind::OneOf,
        message: "A User's status must be Active or Inactive.",
        holds: |u| one_of(u.status.as_deref(), USER_STATUSES),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "A User's SendEmailTo must be Supervisor, Self or Alternate.",
        holds: |u| one_of(u.send_email_to.as_deref(), SEND_EMAIL_TO),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "A User's SendMailTo must be Organization or Personal.",
        holds: |u| one_of(u.send_mail_to.as_deref(), SEND_MAIL_TO),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "A User's authentication type must be SmarterU, External or Both.",
        holds: |u| one_of(u.authentication_type.as_deref(), AUTHENTICATION_TYPES),
    },
];

pub(crate) const CREATE_USER: &[Rule<User>] = &[
    Rule {
        kind: RuleKind::Required,
        message: "A User cannot be created without an email address or employee ID.",
        holds: |u| filled(&u.email).is_some() || filled(&u.employee_id).is_some(),
    },
    Rule {
        kind: RuleKind::Required,
        message: "A User cannot be created without a given name.",
        holds: |u| u.given_name.is_some(),
    },
    Rule {
        kind: RuleKind::Required,
        message: "A User cannot be created without a surname.",
        holds: |u| u.surname.is_some(),
    },
    Rule {
        kind: RuleKind::Required,
        message: "A User cannot be created without a password.",
        holds: |u| u.password.is_some(),
    },
    Rule {
        kind: RuleKind::Required,
        message: "A User cannot be created without a home group.",
        holds: |u| u.home_group.is_some(),
    },
];

pub(crate) const UPDATE_USER: &[Rule<User>] = &[Rule {
    kind: RuleKind::Required,
    message: "A User cannot be updated without an ID, email address or employee ID.",
    holds: |u| u.identifier().is_some(),
}];

pub(crate) fn user_for_create(user: &User) -> Result<()> {
    check(user, CREATE_USER)?;
    check(user, USER_ENUMERATIONS)
}

pub(crate) fn user_for_update(user: &User) -> Result<()> {
    check(user, UPDATE_USER)?;
    check(user, USER_ENUMERATIONS)
}

pub(crate) const LIST_USERS: &[Rule<ListUsersQuery>] = &[
    Rule {
        kind: RuleKind::OneOf,
        message: "A user status filter must be Active, Inactive or All.",
        holds: |q| one_of(q.user_status.as_deref(), FILTER_STATUSES),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "Users can only be sorted by NAME or EMPLOYEE_ID.",
        holds: |q| one_of(q.sort_field.as_deref(), SORT_FIELDS),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "The sort order must be ASC or DESC.",
        holds: |q| one_of(q.sort_order.as_deref(), SORT_ORDERS),
    },
];

const GROUP_STATUS: Rule<Group> = Rule {
    kind: RuleKind::OneOf,
    message: "A Group's status must be Active or Inactive.",
    holds: |g| one_of(g.status.as_deref(), GROUP_STATUSES),
};

const GROUP_MEMBERS: Rule<Group> = Rule {
    kind: RuleKind::Required,
    message: "All Users being added to or removed from a Group must have an email address or employee ID.",
    holds: |g| g.users.iter().all(has_member_identifier),
};

pub(crate) const CREATE_GROUP: &[Rule<Group>] = &[
    Rule {
        kind: RuleKind::Required,
        message: "A Group cannot be created without a name.",
        holds: |g| filled(&g.name).is_some(),
    },
    GROUP_STATUS,
    GROUP_MEMBERS,
];

pub(crate) const GET_GROUP: &[Rule<Group>] = &[Rule {
    kind: RuleKind::Required,
    message: "Cannot read a Group without a group name or ID.",
    holds: |g| g.identifier().is_some(),
}];

pub(crate) const UPDATE_GROUP: &[Rule<Group>] = &[
    Rule {
        kind: RuleKind::Required,
        message: "Cannot update a Group without a group name or ID.",
        holds: |g| g.target_identifier().is_some(),
    },
    GROUP_STATUS,
    GROUP_MEMBERS,
    Rule {
        kind: RuleKind::Required,
        message: "Learning modules and subscription variants in a Group update must have an action.",
        holds: |g| {
            g.learning_modules.iter().all(|m| m.action.is_some())
                && g.subscription_variants.iter().all(|v| v.action.is_some())
        },
    },
];

pub(crate) const CHANGE_MEMBERS: &[Rule<Group>] = &[
    Rule {
        kind: RuleKind::Required,
        message: "Cannot add or remove users from a Group without a group name or ID.",
        holds: |g| g.target_identifier().is_some(),
    },
    GROUP_MEMBERS,
];

fn has_member_identifier(member: &GroupPermissions) -> bool {
    filled(&member.email).is_some() || filled(&member.employee_id).is_some()
}

pub(crate) const LEARNER_REPORT: &[Rule<GetLearnerReportQuery>] = &[
    Rule {
        kind: RuleKind::Required,
        message: "A learner report requires at least one group name or a group status.",
        holds: |q| !q.group_names.is_empty() || q.group_status.is_some(),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "A group status filter must be Active, Inactive or All.",
        holds: |q| one_of(q.group_status.as_deref(), FILTER_STATUSES),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "A user status filter must be Active, Inactive or All.",
        holds: |q| one_of(q.user_status.as_deref(), FILTER_STATUSES),
    },
    Rule {
        kind: RuleKind::OneOf,
        message: "Learner report columns must be one of the columns the report supports.",
        holds: |q| q.columns.iter().all(|c| LEARNER_REPORT_COLUMNS.contains(&c.as_str())),
    },
];
