//! Renders vendor XML request documents.
//!
//! # Design
//! Every request has the same envelope:
//!
//! ```text
//! <?xml version="1.0"?>
//! <SmarterU><AccountAPI>…</AccountAPI><UserAPI>…</UserAPI><Method>…</Method><Parameters>…</Parameters></SmarterU>
//! ```
//!
//! Each `XmlGenerator` method validates its input against the tables in
//! `validation` before writing anything, then renders only the fields that
//! are set. Rendering is a pure function of the input and the credentials;
//! the rename consumed by `update_group` is handed back as a new `Group`
//! rather than written into the caller's value.

use crate::config::{Credentials, REDACTED};
use crate::error::Result;
use crate::method::Method;
use crate::query::{
    DateRangeTag, GetLearnerReportQuery, GetUserGroupsQuery, GetUserQuery, ListUsersQuery, MatchTag,
    UserIdentifier,
};
use crate::types::{
    filled, Action, Group, GroupIdentifier, GroupPermissions, LearningModule, SubscriptionVariant, Tag, User,
};
use crate::validation::{self, check};
use crate::xml::XmlWriter;

/// Date format used in request filters.
const FILTER_DATE_FORMAT: &str = "%d/%m/%Y";

/// The output of [`XmlGenerator::update_group`]: the request document and
/// the group as it should be used for any later request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUpdateRequest {
    pub xml: String,
    /// The input group with `old_name` / `old_group_id` cleared.
    pub group: Group,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlGenerator;

impl XmlGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn create_user(&self, credentials: &Credentials, user: &User) -> Result<String> {
        validation::user_for_create(user)?;
        envelope(credentials, Method::CreateUser, |w| {
            w.nested("User", |w| {
                user_info(w, user)?;
                user_profile(w, user)?;
                w.empty("Venues")?;
                w.empty("Wages")
            })
        })
    }

    pub fn get_user(&self, credentials: &Credentials, query: &GetUserQuery) -> Result<String> {
        check(query, validation::GET_USER)?;
        envelope(credentials, Method::GetUser, |w| {
            w.nested("User", |w| identifier(w, query.identifier.as_ref()))
        })
    }

    pub fn update_user(&self, credentials: &Credentials, user: &User) -> Result<String> {
        validation::user_for_update(user)?;
        envelope(credentials, Method::UpdateUser, |w| {
            w.nested("User", |w| {
                w.nested("Identifier", |w| identifier(w, user.identifier().as_ref()))?;
                user_info(w, user)?;
                user_profile(w, user)
            })
        })
    }

    pub fn list_users(&self, credentials: &Credentials, query: &ListUsersQuery) -> Result<String> {
        check(query, validation::LIST_USERS)?;
        envelope(credentials, Method::ListUsers, |w| {
            w.nested("User", |w| {
                w.optional("Page", query.page.map(|p| p.to_string()).as_deref())?;
                w.optional("PageSize", query.page_size.map(|p| p.to_string()).as_deref())?;
                w.optional("SortField", query.sort_field.as_deref())?;
                w.optional("SortOrder", query.sort_order.as_deref())?;
                w.nested("Filters", |w| {
                    match_tag(w, "Email", query.email.as_ref())?;
                    match_tag(w, "EmployeeID", query.employee_id.as_ref())?;
                    match_tag(w, "Name", query.name.as_ref())?;
                    w.optional("HomeGroup", query.home_group.as_deref())?;
                    w.optional("GroupName", query.group_name.as_deref())?;
                    w.optional("UserStatus", query.user_status.as_deref())?;
                    date_range(w, "CreatedDate", query.created_date.as_ref())?;
                    date_range(w, "ModifiedDate", query.modified_date.as_ref())?;
                    w.list("Teams", "TeamName", &query.teams)
                })
            })
        })
    }

    pub fn get_user_groups(&self, credentials: &Credentials, query: &GetUserGroupsQuery) -> Result<String> {
        check(query, validation::GET_USER_GROUPS)?;
        envelope(credentials, Method::GetUserGroups, |w| {
            w.nested("User", |w| identifier(w, query.identifier.as_ref()))
        })
    }

    pub fn create_group(&self, credentials: &Credentials, group: &Group) -> Result<String> {
        check(group, validation::CREATE_GROUP)?;
        envelope(credentials, Method::CreateGroup, |w| {
            w.nested("Group", |w| {
                w.optional("Name", group.name.as_deref())?;
                w.optional("GroupID", group.group_id.as_deref())?;
                group_settings(w, group)?;
                w.container("Users", group.users.is_empty(), |w| {
                    group.users.iter().try_for_each(|m| member(w, m, false))
                })?;
                learning_modules(w, &group.learning_modules, false)?;
                subscription_variants(w, &group.subscription_variants, false)?;
                w.optional("DashboardSetID", group.dashboard_set_id.as_deref())
            })
        })
    }

    pub fn get_group(&self, credentials: &Credentials, group: &Group) -> Result<String> {
        check(group, validation::GET_GROUP)?;
        envelope(credentials, Method::GetGroup, |w| {
            w.nested("Group", |w| group_identifier(w, group.identifier()))
        })
    }

    /// Render an `updateGroup` request. When the group carries a pending
    /// rename, the request addresses it by the old identifier and sets the
    /// new one; the returned group has the rename cleared.
    pub fn update_group(&self, credentials: &Credentials, group: &Group) -> Result<GroupUpdateRequest> {
        check(group, validation::UPDATE_GROUP)?;
        let xml = envelope(credentials, Method::UpdateGroup, |w| {
            w.nested("Group", |w| {
                w.nested("Identifier", |w| group_identifier(w, group.target_identifier()))?;
                if group.old_name.is_some() {
                    w.optional("Name", group.name.as_deref())?;
                }
                if group.old_group_id.is_some() {
                    w.optional("GroupID", group.group_id.as_deref())?;
                }
                group_settings(w, group)?;
                group_members(w, &group.users)?;
                learning_modules(w, &group.learning_modules, true)?;
                subscription_variants(w, &group.subscription_variants, true)?;
                w.optional("DashboardSetID", group.dashboard_set_id.as_deref())
            })
        })?;
        Ok(GroupUpdateRequest {
            xml,
            group: group.without_rename(),
        })
    }

    /// Render the `updateGroup` request that adds or removes `users`. Only
    /// the group's identifier and the membership entries are sent.
    pub fn change_group_members(
        &self,
        credentials: &Credentials,
        users: &[User],
        group: &Group,
        action: Action,
    ) -> Result<String> {
        let members = Group {
            name: group.name.clone(),
            group_id: group.group_id.clone(),
            old_name: group.old_name.clone(),
            old_group_id: group.old_group_id.clone(),
            users: users
                .iter()
                .map(|user| GroupPermissions {
                    email: user.email.clone(),
                    employee_id: user.employee_id.clone(),
                    ..GroupPermissions::new(action)
                })
                .collect(),
            ..Group::default()
        };
        check(&members, validation::CHANGE_MEMBERS)?;
        envelope(credentials, Method::UpdateGroup, |w| {
            w.nested("Group", |w| {
                w.nested("Identifier", |w| group_identifier(w, members.target_identifier()))?;
                group_members(w, &members.users)?;
                w.empty("LearningModules")?;
                w.empty("SubscriptionVariants")
            })
        })
    }

    pub fn request_external_authorization(
        &self,
        credentials: &Credentials,
        user: &UserIdentifier,
    ) -> Result<String> {
        check(user, validation::EXTERNAL_AUTHORIZATION)?;
        envelope(credentials, Method::RequestExternalAuthorization, |w| {
            w.nested("Security", |w| identifier(w, Some(user)))
        })
    }

    pub fn get_learner_report(&self, credentials: &Credentials, query: &GetLearnerReportQuery) -> Result<String> {
        check(query, validation::LEARNER_REPORT)?;
        envelope(credentials, Method::GetLearnerReport, |w| {
            w.nested("Report", |w| {
                w.nested("Filters", |w| {
                    w.optional("EnrollmentID", query.enrollment_id.as_deref())?;
                    w.nested("Groups", |w| {
                        w.optional("GroupStatus", query.group_status.as_deref())?;
                        w.list("GroupNames", "GroupName", &query.group_names)
                    })?;
                    w.list("LearningModules", "LearningModuleID", &query.learning_module_ids)?;
                    let has_user_filter = query.user_status.is_some()
                        || !query.user_emails.is_empty()
                        || !query.user_employee_ids.is_empty();
                    if has_user_filter {
                        w.nested("Users", |w| {
                            w.optional("UserStatus", query.user_status.as_deref())?;
                            if query.user_emails.is_empty() && query.user_employee_ids.is_empty() {
                                return Ok(());
                            }
                            w.nested("UserIdentifiers", |w| {
                                for email in &query.user_emails {
                                    w.element("Email", email)?;
                                }
                                for employee_id in &query.user_employee_ids {
                                    w.element("EmployeeID", employee_id)?;
                                }
                                Ok(())
                            })
                        })?;
                    }
                    date_range(w, "CreatedDate", query.created_date.as_ref())?;
                    date_range(w, "ModifiedDate", query.modified_date.as_ref())
                })?;
                w.list("Columns", "ColumnName", &query.columns)?;
                w.list("CustomFields", "FieldName", &query.custom_fields)
            })
        })
    }

    /// Replace both API keys in a rendered request with [`REDACTED`].
    pub fn redact(xml: &str) -> String {
        let masked = mask_element(xml, "AccountAPI");
        mask_element(&masked, "UserAPI")
    }
}

fn mask_element(xml: &str, name: &str) -> String {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let Some(start) = xml.find(&open).map(|i| i + open.len()) else {
        return xml.to_string();
    };
    let Some(end) = xml[start..].find(&close).map(|i| start + i) else {
        return xml.to_string();
    };
    format!("{}{REDACTED}{}", &xml[..start], &xml[end..])
}

fn envelope(
    credentials: &Credentials,
    method: Method,
    parameters: impl FnOnce(&mut XmlWriter) -> Result<()>,
) -> Result<String> {
    let mut w = XmlWriter::document()?;
    w.nested("SmarterU", |w| {
        w.element("AccountAPI", credentials.account_api_key())?;
        w.element("UserAPI", credentials.user_api_key())?;
        w.element("Method", method.as_str())?;
        w.nested("Parameters", parameters)
    })?;
    w.finish()
}

fn identifier(w: &mut XmlWriter, identifier: Option<&UserIdentifier>) -> Result<()> {
    match identifier {
        Some(id) => w.element(id.element_name(), id.value()),
        None => Ok(()),
    }
}

fn group_identifier(w: &mut XmlWriter, identifier: Option<GroupIdentifier>) -> Result<()> {
    match identifier {
        Some(GroupIdentifier::Name(name)) => w.element("Name", &name),
        Some(GroupIdentifier::Id(id)) => w.element("GroupID", &id),
        None => Ok(()),
    }
}

fn user_info(w: &mut XmlWriter, user: &User) -> Result<()> {
    w.nested("Info", |w| {
        w.optional("Email", user.email.as_deref())?;
        w.optional("EmployeeID", user.employee_id.as_deref())?;
        w.optional("GivenName", user.given_name.as_deref())?;
        w.optional("Surname", user.surname.as_deref())?;
        w.optional("Password", user.password.as_deref())?;
        w.optional("Timezone", user.timezone.map(|tz| tz.display_value()))?;
        w.optional_flag("LearnerNotifications", user.learner_notifications)?;
        w.optional_flag("SupervisorNotifications", user.supervisor_notifications)?;
        w.optional("SendEmailTo", user.send_email_to.as_deref())?;
        w.optional("AlternateEmail", user.alternate_email.as_deref())?;
        w.optional("AuthenticationType", user.authentication_type.as_deref())
    })
}

fn user_profile(w: &mut XmlWriter, user: &User) -> Result<()> {
    w.nested("Profile", |w| {
        w.list("Supervisors", "Supervisor", &user.supervisors)?;
        w.optional("Organization", user.organization.as_deref())?;
        w.list("Teams", "Team", &user.teams)?;
        w.list("Roles", "Role", &user.roles)?;
        w.optional("Language", user.language.as_deref())?;
        w.optional("Status", user.status.as_deref())?;
        w.optional("Title", user.title.as_deref())?;
        w.optional("Division", user.division.as_deref())?;
        w.optional_flag("AllowFeedback", user.allow_feedback)?;
        w.optional("PhonePrimary", user.phone_primary.as_deref())?;
        w.optional("PhoneAlternate", user.phone_alternate.as_deref())?;
        w.optional("PhoneMobile", user.phone_mobile.as_deref())?;
        w.optional("Fax", user.fax.as_deref())?;
        w.optional("Website", user.website.as_deref())?;
        w.optional("Address1", user.address1.as_deref())?;
        w.optional("Address2", user.address2.as_deref())?;
        w.optional("City", user.city.as_deref())?;
        w.optional("Province", user.province.as_deref())?;
        w.optional("Country", user.country.as_deref())?;
        w.optional("PostalCode", user.postal_code.as_deref())?;
        w.optional("SendMailTo", user.send_mail_to.as_deref())?;
        w.optional_flag("ReceiveNotifications", user.receive_notifications)?;
        w.optional("HomeGroup", user.home_group.as_deref())
    })
}

fn group_settings(w: &mut XmlWriter, group: &Group) -> Result<()> {
    w.optional("Status", group.status.as_deref())?;
    w.optional("Description", group.description.as_deref())?;
    w.optional("HomeGroupMessage", group.home_group_message.as_deref())?;
    w.list("NotificationEmails", "NotificationEmail", &group.notification_emails)?;
    w.optional_flag("UserHelpOverrideDefault", group.user_help_override_default)?;
    w.optional_flag("UserHelpEnabled", group.user_help_enabled)?;
    if !group.user_help_email.is_empty() {
        w.element("UserHelpEmail", &group.user_help_email.join(","))?;
    }
    w.optional("UserHelpText", group.user_help_text.as_deref())?;
    tags(w, &group.tags)?;
    if group.user_limit_enabled.is_some() || group.user_limit_amount.is_some() {
        w.nested("UserLimit", |w| {
            w.optional_flag("Enabled", group.user_limit_enabled)?;
            w.optional("Amount", group.user_limit_amount.map(|a| a.to_string()).as_deref())
        })?;
    }
    Ok(())
}

fn tags(w: &mut XmlWriter, tags: &[Tag]) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }
    w.nested("Tags2", |w| {
        for tag in tags {
            w.nested("Tag2", |w| {
                w.optional("TagID", tag.tag_id.as_deref())?;
                w.optional("TagName", tag.tag_name.as_deref())?;
                w.element("TagValues", &tag.tag_values)
            })?;
        }
        Ok(())
    })
}

fn group_members(w: &mut XmlWriter, members: &[GroupPermissions]) -> Result<()> {
    w.container("Users", members.is_empty(), |w| {
        members.iter().try_for_each(|m| member(w, m, true))
    })
}

fn member(w: &mut XmlWriter, member: &GroupPermissions, with_action: bool) -> Result<()> {
    w.nested("User", |w| {
        match (filled(&member.email), filled(&member.employee_id)) {
            (Some(email), _) => w.element("Email", email)?,
            (None, Some(employee_id)) => w.element("EmployeeID", employee_id)?,
            (None, None) => {}
        }
        if with_action {
            w.element("UserAction", member.action.as_str())?;
        }
        w.flag("HomeGroup", member.home_group)?;
        w.container("Permissions", member.permissions.is_empty(), |w| {
            for permission in &member.permissions {
                w.nested("Permission", |w| {
                    w.optional("Action", permission.action.map(|a| a.as_str()))?;
                    w.element("Code", &permission.code)
                })?;
            }
            Ok(())
        })
    })
}

fn learning_modules(w: &mut XmlWriter, modules: &[LearningModule], with_action: bool) -> Result<()> {
    w.container("LearningModules", modules.is_empty(), |w| {
        for module in modules {
            w.nested("LearningModule", |w| {
                w.element("ID", &module.id)?;
                if with_action {
                    w.optional("LearningModuleAction", module.action.map(Action::as_str))?;
                }
                w.flag("AllowSelfEnroll", module.allow_self_enroll)?;
                w.flag("AutoEnroll", module.auto_enroll)
            })?;
        }
        Ok(())
    })
}

fn subscription_variants(w: &mut XmlWriter, variants: &[SubscriptionVariant], with_action: bool) -> Result<()> {
    w.container("SubscriptionVariants", variants.is_empty(), |w| {
        for variant in variants {
            w.nested("SubscriptionVariant", |w| {
                w.element("ID", &variant.id)?;
                if with_action {
                    w.optional("SubscriptionVariantAction", variant.action.map(Action::as_str))?;
                }
                w.flag("RequiresCredits", variant.requires_credits)
            })?;
        }
        Ok(())
    })
}

fn match_tag(w: &mut XmlWriter, name: &str, tag: Option<&MatchTag>) -> Result<()> {
    match tag {
        Some(tag) => w.nested(name, |w| {
            w.element("MatchType", tag.match_type())?;
            w.element("Value", tag.value())
        }),
        None => Ok(()),
    }
}

fn date_range(w: &mut XmlWriter, name: &str, range: Option<&DateRangeTag>) -> Result<()> {
    match range {
        Some(range) => w.nested(name, |w| {
            w.element(&format!("{name}From"), &range.from.format(FILTER_DATE_FORMAT).to_string())?;
            w.element(&format!("{name}To"), &range.to.format(FILTER_DATE_FORMAT).to_string())
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::Permission;
    use pretty_assertions::assert_eq;

    fn credentials() -> Credentials {
        Credentials::new("account", "user")
    }

    #[test]
    fn get_user_by_id_matches_vendor_layout() {
        let xml = XmlGenerator::new()
            .get_user(&credentials(), &GetUserQuery::by_id("1"))
            .unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\"?>\n<SmarterU><AccountAPI>account</AccountAPI><UserAPI>user</UserAPI>\
             <Method>getUser</Method><Parameters><User><ID>1</ID></User></Parameters></SmarterU>\n"
        );
    }

    #[test]
    fn query_without_identifier_is_missing_value() {
        let err = XmlGenerator::new()
            .get_user(&credentials(), &GetUserQuery::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
        let err = XmlGenerator::new()
            .get_user_groups(&credentials(), &GetUserGroupsQuery::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
    }

    #[test]
    fn blank_identifiers_are_missing_values() {
        let generator = XmlGenerator::new();
        for err in [
            generator.get_user(&credentials(), &GetUserQuery::by_email("")).unwrap_err(),
            generator.get_user(&credentials(), &GetUserQuery::by_employee_id("  ")).unwrap_err(),
            generator
                .change_group_members(&credentials(), &[User::with_email("a@b.c")], &Group::named(""), Action::Add)
                .unwrap_err(),
            generator
                .change_group_members(&credentials(), &[User::with_email(" ")], &Group::named("My Group"), Action::Add)
                .unwrap_err(),
            generator.get_group(&credentials(), &Group::named("")).unwrap_err(),
            generator
                .request_external_authorization(&credentials(), &UserIdentifier::Email(String::new()))
                .unwrap_err(),
        ] {
            assert!(matches!(err, Error::MissingValue(_)), "{err:?}");
        }
    }

    #[test]
    fn blank_email_falls_back_to_employee_id() {
        let user = User {
            email: Some(String::new()),
            ..User::with_employee_id("7")
        };
        let xml = XmlGenerator::new()
            .change_group_members(&credentials(), &[user], &Group::named("My Group"), Action::Add)
            .unwrap();
        assert!(GeneratorFixture::parameters(&xml).contains("<User><EmployeeID>7</EmployeeID><UserAction>Add"));
    }

    #[test]
    fn remove_member_renders_action_and_empty_containers() {
        let xml = XmlGenerator::new()
            .change_group_members(
                &credentials(),
                &[User::with_email("test@test.com")],
                &Group::named("My Group"),
                Action::Remove,
            )
            .unwrap();
        assert_eq!(
            GeneratorFixture::parameters(&xml),
            "<Group><Identifier><Name>My Group</Name></Identifier><Users><User><Email>test@test.com</Email>\
             <UserAction>Remove</UserAction><HomeGroup>0</HomeGroup><Permissions/></User></Users>\
             <LearningModules/><SubscriptionVariants/></Group>"
        );
    }

    #[test]
    fn membership_change_without_group_identifier_fails_first() {
        let err = XmlGenerator::new()
            .change_group_members(&credentials(), &[User::default()], &Group::default(), Action::Add)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot add or remove users from a Group without a group name or ID."
        );
    }

    #[test]
    fn membership_change_requires_user_identifier() {
        let err = XmlGenerator::new()
            .change_group_members(&credentials(), &[User::default()], &Group::named("My Group"), Action::Add)
            .unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
        assert_eq!(
            err.to_string(),
            "All Users being added to or removed from a Group must have an email address or employee ID."
        );
    }

    #[test]
    fn update_group_consumes_rename() {
        let group = Group {
            old_group_id: Some("1".into()),
            group_id: Some("2".into()),
            ..Group::default()
        };
        let generator = XmlGenerator::new();
        let first = generator.update_group(&credentials(), &group).unwrap();
        assert!(GeneratorFixture::parameters(&first.xml)
            .starts_with("<Group><Identifier><GroupID>1</GroupID></Identifier><GroupID>2</GroupID>"));

        let second = generator.update_group(&credentials(), &first.group).unwrap();
        assert!(GeneratorFixture::parameters(&second.xml)
            .starts_with("<Group><Identifier><GroupID>2</GroupID></Identifier><Users/>"));
        assert!(!second.xml.contains("<GroupID>1</GroupID>"));

        // the caller's value is untouched
        assert_eq!(group.old_group_id.as_deref(), Some("1"));
    }

    #[test]
    fn update_group_renders_member_modules_and_variants() {
        let group = Group {
            users: vec![GroupPermissions {
                employee_id: Some("2".into()),
                home_group: true,
                permissions: vec![Permission::new("MANAGE_USERS")],
                ..GroupPermissions::new(Action::Add)
            }],
            learning_modules: vec![LearningModule {
                id: "4".into(),
                action: Some(Action::Add),
                allow_self_enroll: true,
                auto_enroll: false,
            }],
            subscription_variants: vec![SubscriptionVariant {
                id: "6".into(),
                action: Some(Action::Remove),
                requires_credits: true,
            }],
            ..Group::named("My Group")
        };
        let request = XmlGenerator::new().update_group(&credentials(), &group).unwrap();
        assert_eq!(
            GeneratorFixture::parameters(&request.xml),
            "<Group><Identifier><Name>My Group</Name></Identifier>\
             <Users><User><EmployeeID>2</EmployeeID><UserAction>Add</UserAction><HomeGroup>1</HomeGroup>\
             <Permissions><Permission><Code>MANAGE_USERS</Code></Permission></Permissions></User></Users>\
             <LearningModules><LearningModule><ID>4</ID><LearningModuleAction>Add</LearningModuleAction>\
             <AllowSelfEnroll>1</AllowSelfEnroll><AutoEnroll>0</AutoEnroll></LearningModule></LearningModules>\
             <SubscriptionVariants><SubscriptionVariant><ID>6</ID><SubscriptionVariantAction>Remove</SubscriptionVariantAction>\
             <RequiresCredits>1</RequiresCredits></SubscriptionVariant></SubscriptionVariants></Group>"
        );
    }

    #[test]
    fn update_group_module_without_action_is_missing_value() {
        let group = Group {
            learning_modules: vec![LearningModule {
                id: "4".into(),
                ..LearningModule::default()
            }],
            ..Group::named("My Group")
        };
        let err = XmlGenerator::new().update_group(&credentials(), &group).unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
    }

    #[test]
    fn external_authorization_uses_security_block() {
        let xml = XmlGenerator::new()
            .request_external_authorization(&credentials(), &UserIdentifier::EmployeeId("12".into()))
            .unwrap();
        assert_eq!(
            GeneratorFixture::parameters(&xml),
            "<Security><EmployeeID>12</EmployeeID></Security>"
        );
    }

    #[test]
    fn learner_report_renders_filters_and_columns() {
        let query = GetLearnerReportQuery {
            group_names: vec!["SANDBOX".into()],
            user_status: Some("Active".into()),
            columns: vec!["PROGRESS".into(), "COURSE_DURATION".into()],
            created_date: Some(DateRangeTag::new(
                chrono::NaiveDate::from_ymd_opt(2022, 7, 1).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2022, 7, 31).unwrap(),
            )),
            ..GetLearnerReportQuery::default()
        };
        let xml = XmlGenerator::new().get_learner_report(&credentials(), &query).unwrap();
        assert_eq!(
            GeneratorFixture::parameters(&xml),
            "<Report><Filters><Groups><GroupNames><GroupName>SANDBOX</GroupName></GroupNames></Groups>\
             <Users><UserStatus>Active</UserStatus></Users>\
             <CreatedDate><CreatedDateFrom>01/07/2022</CreatedDateFrom><CreatedDateTo>31/07/2022</CreatedDateTo></CreatedDate>\
             </Filters><Columns><ColumnName>PROGRESS</ColumnName><ColumnName>COURSE_DURATION</ColumnName></Columns></Report>"
        );
    }

    #[test]
    fn create_user_rejects_unknown_status() {
        let user = User {
            email: Some("a@b.c".into()),
            given_name: Some("A".into()),
            surname: Some("B".into()),
            password: Some("pw".into()),
            home_group: Some("Home".into()),
            status: Some("Suspended".into()),
            ..User::default()
        };
        let err = XmlGenerator::new().create_user(&credentials(), &user).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn redact_masks_both_keys() {
        let xml = XmlGenerator::new()
            .get_user(&Credentials::new("s3cret", "k3y"), &GetUserQuery::by_email("a@b.c"))
            .unwrap();
        let redacted = XmlGenerator::redact(&xml);
        assert!(redacted.contains("<AccountAPI>********</AccountAPI><UserAPI>********</UserAPI>"));
        assert!(!redacted.contains("s3cret"));
        assert!(!redacted.contains("k3y"));
    }

    struct GeneratorFixture;

    impl GeneratorFixture {
        /// The inner XML of `<Parameters>`.
        fn parameters(xml: &str) -> &str {
            let start = xml.find("<Parameters>").unwrap() + "<Parameters>".len();
            let end = xml.rfind("</Parameters>").unwrap();
            &xml[start..end]
        }
    }
}
