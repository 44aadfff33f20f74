//! Parsing of vendor response envelopes into domain values.

use crate::error::{Error, Result};
use crate::types::{ErrorCode, ExternalAuthorization, Group, LearnerReport, Timezone, User};
use crate::xml::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Success,
    Failed,
}

/// `<SmarterU><Result/><Info/><Errors/></SmarterU>`, with `Info` defaulting
/// to an empty element when the vendor omits it.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    pub status: Status,
    pub info: Element,
    pub errors: Vec<ErrorCode>,
}

pub(crate) fn parse_envelope(body: &str) -> Result<Envelope> {
    let root = Element::parse(body)?;
    let status = match root.text("Result").as_deref() {
        Some("Success") => Status::Success,
        Some("Failed") => Status::Failed,
        Some(other) => {
            return Err(Error::Deserialization(format!("unexpected <Result> value: {other}")));
        }
        None => return Err(Error::Deserialization("response has no <Result>".into())),
    };
    let errors = root
        .child("Errors")
        .map(|errors| {
            errors
                .children("Error")
                .map(|e| {
                    ErrorCode::new(
                        e.text("ErrorID").unwrap_or_default(),
                        e.text("ErrorMessage").unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    let info = root.child("Info").cloned().unwrap_or_else(|| Element::named("Info"));
    Ok(Envelope { status, info, errors })
}

fn required<'a>(parent: &'a Element, name: &str) -> Result<&'a Element> {
    parent
        .child(name)
        .ok_or_else(|| Error::Deserialization(format!("<{}> has no <{name}>", parent.name)))
}

fn timezone(element: &Element) -> Result<Option<Timezone>> {
    element
        .text("Timezone")
        .map(|raw| {
            Timezone::from_display_value(&raw)
                .or_else(|_| Timezone::from_provided_name(&raw))
                .map_err(|_| Error::Deserialization(format!("unknown timezone: {raw}")))
        })
        .transpose()
}

/// A full user record as returned by `getUser` in `<Info><User>`.
pub(crate) fn user(info: &Element) -> Result<User> {
    user_from_element(required(info, "User")?)
}

pub(crate) fn user_from_element(u: &Element) -> Result<User> {
    Ok(User {
        id: u.text("ID"),
        email: u.text("Email"),
        employee_id: u.text("EmployeeID"),
        given_name: u.text("GivenName"),
        surname: u.text("Surname"),
        password: None,
        timezone: timezone(u)?,
        learner_notifications: u.flag("SendWeeklyTaskReminder"),
        supervisor_notifications: u.flag("SendWeeklyProgressSummary"),
        send_email_to: u.text("SendEmailTo"),
        alternate_email: u.text("AlternateEmail"),
        authentication_type: u.text("AuthenticationType"),
        supervisors: u.list("Supervisors", "Supervisor"),
        organization: u.text("Organization"),
        teams: u.list("Teams", "Team"),
        roles: u.list("Roles", "Role"),
        language: u.text("Language"),
        status: u.text("Status"),
        title: u.text("Title"),
        division: u.text("Division"),
        allow_feedback: u.flag("AllowFeedback"),
        phone_primary: u.text("PhonePrimary"),
        phone_alternate: u.text("PhoneAlternate"),
        phone_mobile: u.text("PhoneMobile"),
        fax: u.text("Fax"),
        website: u.text("Website"),
        address1: u.text("Address1"),
        address2: u.text("Address2"),
        city: u.text("City"),
        province: u.text("Province"),
        country: u.text("Country"),
        postal_code: u.text("PostalCode"),
        send_mail_to: u.text("SendMailTo"),
        receive_notifications: u.flag("ReceiveNotifications"),
        home_group: u.text("HomeGroup"),
        created_date: u.datetime("CreatedDate")?,
        modified_date: u.datetime("ModifiedDate")?,
    })
}

/// `<Info><Users><User>…</User>…</Users>` from `listUsers`.
pub(crate) fn users(info: &Element) -> Result<Vec<User>> {
    match info.child("Users") {
        Some(users) => users.children("User").map(user_from_element).collect(),
        None => Ok(Vec::new()),
    }
}

/// The `ID`/`Email`/`EmployeeID` a create or update call echoes back.
pub(crate) fn user_identity(info: &Element) -> User {
    User {
        id: info.text("ID"),
        email: info.text("Email"),
        employee_id: info.text("EmployeeID"),
        ..User::default()
    }
}

/// `<Info><UserGroups><Group>…</Group></UserGroups>` from `getUserGroups`.
pub(crate) fn user_groups(info: &Element) -> Vec<Group> {
    let Some(groups) = info.child("UserGroups") else {
        return Vec::new();
    };
    groups
        .children("Group")
        .map(|g| Group {
            name: g.text("Name"),
            group_id: g.text("Identifier"),
            home_group: g.flag("IsHomeGroup"),
            permissions: g.list("Permissions", "Permission"),
            ..Group::default()
        })
        .collect()
}

/// A full group record from `getGroup`.
pub(crate) fn group(info: &Element) -> Result<Group> {
    let g = required(info, "Group")?;
    Ok(Group {
        name: g.text("Name"),
        group_id: g.text("GroupID"),
        status: g.text("Status"),
        description: g.text("Description"),
        home_group_message: g.text("HomeGroupMessage"),
        notification_emails: g.list("NotificationEmails", "NotificationEmail"),
        user_help_override_default: g.flag("UserHelpOverrideDefault"),
        user_help_enabled: g.flag("UserHelpEnabled"),
        user_help_email: g
            .text("UserHelpEmail")
            .map(|emails| emails.split(',').map(|e| e.trim().to_string()).collect())
            .unwrap_or_default(),
        user_help_text: g.text("UserHelpText"),
        tags: g
            .child("Tags2")
            .map(|tags| {
                tags.children("Tag2")
                    .map(|t| crate::types::Tag {
                        tag_id: t.text("TagID"),
                        tag_name: t.text("TagName"),
                        tag_values: t.text("TagValues").unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        user_limit_enabled: g.child("UserLimit").and_then(|l| l.flag("Enabled")),
        user_limit_amount: match g.child("UserLimit") {
            Some(limit) => limit.number("Amount")?,
            None => None,
        },
        learning_modules: g
            .child("LearningModules")
            .map(|modules| {
                modules
                    .children("LearningModule")
                    .map(|m| crate::types::LearningModule {
                        id: m.text("ID").unwrap_or_default(),
                        action: None,
                        allow_self_enroll: m.flag("AllowSelfEnroll").unwrap_or(false),
                        auto_enroll: m.flag("AutoEnroll").unwrap_or(false),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        subscription_variants: g
            .child("SubscriptionVariants")
            .map(|variants| {
                variants
                    .children("SubscriptionVariant")
                    .map(|v| crate::types::SubscriptionVariant {
                        id: v.text("ID").unwrap_or_default(),
                        action: None,
                        requires_credits: v.flag("RequiresCredits").unwrap_or(false),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        dashboard_set_id: g.text("DashboardSetID"),
        created_date: g.datetime("CreatedDate")?,
        modified_date: g.datetime("ModifiedDate")?,
        ..Group::default()
    })
}

/// `<Info><Group>name</Group><GroupID>id</GroupID>` from `createGroup` and
/// `updateGroup`.
pub(crate) fn group_identity(info: &Element) -> Group {
    Group {
        name: info.text("Group"),
        group_id: info.text("GroupID"),
        ..Group::default()
    }
}

pub(crate) fn external_authorization(info: &Element) -> Result<ExternalAuthorization> {
    let text = |name: &str| {
        info.text(name)
            .ok_or_else(|| Error::Deserialization(format!("authorization response has no <{name}>")))
    };
    Ok(ExternalAuthorization {
        auth_key: text("AuthKey")?,
        request_key: text("RequestKey")?,
        redirect_path: text("RedirectPath")?,
    })
}

/// `<Info><LearnerReport><Learner>…</Learner>…</LearnerReport>`.
pub(crate) fn learner_reports(info: &Element) -> Result<Vec<LearnerReport>> {
    let Some(report) = info.child("LearnerReport") else {
        return Ok(Vec::new());
    };
    report.children("Learner").map(learner).collect()
}

fn learner(l: &Element) -> Result<LearnerReport> {
    Ok(LearnerReport {
        id: l
            .text("ID")
            .ok_or_else(|| Error::Deserialization("learner report row has no <ID>".into()))?,
        course_name: l.text("CourseName"),
        surname: l.text("Surname"),
        given_name: l.text("GivenName"),
        learning_module_id: l.text("LearningModuleID"),
        user_id: l.text("UserID"),
        employee_id: l.text("EmployeeID"),
        user_email: l.text("UserEmail"),
        alternate_email: l.text("AlternateEmail"),
        division: l.text("Division"),
        title: l.text("Title"),
        group_id: l.text("GroupID"),
        group_name: l.text("GroupName"),
        course_duration: l.text("CourseDuration"),
        progress: l.text("Progress"),
        grade: l.text("Grade"),
        grade_percentage: l.number("GradePercentage")?,
        points: l.number("Points")?,
        subscription_name: l.text("SubscriptionName"),
        variant_name: l.text("VariantName"),
        enrolled_date: l.datetime("EnrolledDate")?,
        started_date: l.datetime("StartedDate")?,
        due_date: l.datetime("DueDate")?,
        completed_date: l.datetime("CompletedDate")?,
        last_accessed_date: l.datetime("LastAccessedDate")?,
        created_date: l.datetime("CreatedDate")?,
        modified_date: l.datetime("ModifiedDate")?,
    })
}
