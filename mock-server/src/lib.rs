//! In-memory stand-in for the SmarterU XML API.
//!
//! Accepts the same `Package=<xml>` form posts as the real endpoint and
//! answers with vendor-shaped envelopes. Users and groups live in memory for
//! the lifetime of the router.

mod xml;

use std::sync::Arc;

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, routing::post, Form, Router};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use xml::Node;

/// API keys the mock accepts.
pub const ACCOUNT_API_KEY: &str = "account";
pub const USER_API_KEY: &str = "user";

#[derive(Deserialize)]
pub struct Package {
    #[serde(rename = "Package")]
    pub package: String,
}

/// A group member as recorded by `updateGroup`/`createGroup`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Member {
    email: Option<String>,
    employee_id: Option<String>,
    permissions: Vec<String>,
}

#[derive(Clone, Debug)]
struct StoredGroup {
    /// `getGroup`-shaped `<Group>` element, without members.
    node: Node,
    members: Vec<Member>,
}

impl StoredGroup {
    fn name(&self) -> &str {
        self.node.text_of("Name").unwrap_or_default()
    }

    fn id(&self) -> &str {
        self.node.text_of("GroupID").unwrap_or_default()
    }

    fn identity(&self) -> Vec<Node> {
        vec![Node::leaf("Group", self.name()), Node::leaf("GroupID", self.id())]
    }
}

#[derive(Default)]
pub struct Store {
    /// `getUser`-shaped `<User>` elements.
    users: Vec<Node>,
    groups: Vec<StoredGroup>,
}

pub type Db = Arc<RwLock<Store>>;

/// Outcome of one vendor method: the `<Info>` children, or error codes.
type Outcome = Result<Vec<Node>, Vec<(&'static str, String)>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", post(handle))
        .route("/apiv2/", post(handle))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn handle(State(db): State<Db>, Form(input): Form<Package>) -> impl IntoResponse {
    let request = match Node::parse(&input.package) {
        Ok(request) if request.name == "SmarterU" => request,
        Ok(other) => {
            tracing::warn!(root = %other.name, "rejecting package with unexpected root");
            return (StatusCode::BAD_REQUEST, "Package root must be <SmarterU>".to_string()).into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed package");
            return (StatusCode::BAD_REQUEST, format!("malformed package: {e}")).into_response();
        }
    };

    let method = request.text_of("Method").unwrap_or_default().to_string();
    let outcome = if request.text_of("AccountAPI") != Some(ACCOUNT_API_KEY)
        || request.text_of("UserAPI") != Some(USER_API_KEY)
    {
        Err(vec![("SU:01", "Invalid API credentials.".to_string())])
    } else {
        let empty = Node::new("Parameters");
        let parameters = request.child("Parameters").unwrap_or(&empty);
        let mut store = db.write().await;
        dispatch(&mut store, &method, parameters)
    };
    tracing::debug!(%method, success = outcome.is_ok(), "handled package");

    (
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        envelope(outcome).render(),
    )
        .into_response()
}

fn envelope(outcome: Outcome) -> Node {
    match outcome {
        Ok(info) => Node::new("SmarterU")
            .with(Node::leaf("Result", "Success"))
            .with(Node {
                children: info,
                ..Node::new("Info")
            })
            .with(Node::new("Errors")),
        Err(errors) => Node::new("SmarterU")
            .with(Node::leaf("Result", "Failed"))
            .with(Node::new("Info"))
            .with(Node {
                children: errors
                    .into_iter()
                    .map(|(code, message)| {
                        Node::new("Error")
                            .with(Node::leaf("ErrorID", code))
                            .with(Node::leaf("ErrorMessage", message))
                    })
                    .collect(),
                ..Node::new("Errors")
            }),
    }
}

fn dispatch(store: &mut Store, method: &str, parameters: &Node) -> Outcome {
    match method {
        "createUser" => create_user(store, parameters),
        "getUser" => get_user(store, parameters),
        "updateUser" => update_user(store, parameters),
        "listUsers" => list_users(store, parameters),
        "getUserGroups" => get_user_groups(store, parameters),
        "createGroup" => create_group(store, parameters),
        "getGroup" => get_group(store, parameters),
        "updateGroup" => update_group(store, parameters),
        "requestExternalAuthorization" => request_external_authorization(store, parameters),
        "getLearnerReport" => get_learner_report(store, parameters),
        other => Err(vec![("SU:02", format!("Unknown method: {other}"))]),
    }
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn missing(code: &'static str, what: &str) -> Vec<(&'static str, String)> {
    vec![(code, format!("{what} is required."))]
}

// --- users ---

/// Request field names that the vendor reports under a different name.
fn response_name(request_name: &str) -> &str {
    match request_name {
        "LearnerNotifications" => "SendWeeklyTaskReminder",
        "SupervisorNotifications" => "SendWeeklyProgressSummary",
        other => other,
    }
}

/// Fold `<Info>` and `<Profile>` of a create/update request into a stored
/// user. Passwords are never echoed back.
fn apply_user_fields(user: &mut Node, request: &Node) {
    for section in ["Info", "Profile"] {
        let Some(section) = request.child(section) else {
            continue;
        };
        for field in section.children.iter().filter(|f| f.name != "Password") {
            user.set(Node {
                name: response_name(&field.name).to_string(),
                ..field.clone()
            });
        }
    }
}

fn find_user<'a>(users: &'a [Node], identifier: &Node) -> Option<&'a Node> {
    position_of_user(users, identifier).map(|i| &users[i])
}

fn position_of_user(users: &[Node], identifier: &Node) -> Option<usize> {
    ["ID", "Email", "EmployeeID"].iter().find_map(|field| {
        let wanted = identifier.text_of(field)?;
        users.iter().position(|u| u.text_of(field) == Some(wanted))
    })
}

fn user_not_found() -> Vec<(&'static str, String)> {
    vec![("GU:03", "The user requested does not exist.".to_string())]
}

fn create_user(store: &mut Store, parameters: &Node) -> Outcome {
    let request = parameters.child("User").ok_or_else(|| missing("CU:01", "User"))?;
    let info = request.child("Info").ok_or_else(|| missing("CU:01", "Info"))?;
    if info.text_of("Email").is_none() && info.text_of("EmployeeID").is_none() {
        return Err(missing("CU:02", "Email or EmployeeID"));
    }
    for field in ["Email", "EmployeeID"] {
        if let Some(value) = info.text_of(field) {
            if store.users.iter().any(|u| u.text_of(field) == Some(value)) {
                return Err(vec![("CU:03", format!("A user with {field} {value} already exists."))]);
            }
        }
    }

    let stamp = now();
    let mut user = Node::new("User")
        .with(Node::leaf("ID", Uuid::new_v4().to_string()))
        .with(Node::leaf("CreatedDate", stamp.clone()))
        .with(Node::leaf("ModifiedDate", stamp));
    apply_user_fields(&mut user, request);
    let echo = identity_of(&user);
    store.users.push(user);
    Ok(echo)
}

fn identity_of(user: &Node) -> Vec<Node> {
    ["ID", "Email", "EmployeeID"]
        .iter()
        .filter_map(|field| user.text_of(field).map(|v| Node::leaf(field, v)))
        .collect()
}

fn get_user(store: &mut Store, parameters: &Node) -> Outcome {
    let identifier = parameters.child("User").ok_or_else(|| missing("GU:01", "User"))?;
    find_user(&store.users, identifier)
        .map(|user| vec![user.clone()])
        .ok_or_else(user_not_found)
}

fn update_user(store: &mut Store, parameters: &Node) -> Outcome {
    let request = parameters.child("User").ok_or_else(|| missing("UU:01", "User"))?;
    let identifier = request.child("Identifier").ok_or_else(|| missing("UU:01", "Identifier"))?;
    let index = position_of_user(&store.users, identifier).ok_or_else(user_not_found)?;
    let user = &mut store.users[index];
    apply_user_fields(user, request);
    user.set(Node::leaf("ModifiedDate", now()));
    Ok(identity_of(user))
}

fn matches_tag(value: Option<&str>, tag: &Node) -> bool {
    let wanted = tag.text_of("Value").unwrap_or_default();
    match (value, tag.text_of("MatchType")) {
        (Some(value), Some("CONTAINS")) => value.contains(wanted),
        (Some(value), _) => value == wanted,
        (None, _) => false,
    }
}

fn list_users(store: &mut Store, parameters: &Node) -> Outcome {
    let empty = Node::new("Filters");
    let filters = parameters
        .child("User")
        .and_then(|u| u.child("Filters"))
        .unwrap_or(&empty);
    let users = store
        .users
        .iter()
        .filter(|u| {
            filters
                .child("Email")
                .map_or(true, |tag| matches_tag(u.text_of("Email"), tag))
                && filters
                    .child("EmployeeID")
                    .map_or(true, |tag| matches_tag(u.text_of("EmployeeID"), tag))
                && filters
                    .child("Name")
                    .map_or(true, |tag| {
                        let name = format!(
                            "{} {}",
                            u.text_of("GivenName").unwrap_or_default(),
                            u.text_of("Surname").unwrap_or_default()
                        );
                        matches_tag(Some(name.as_str()), tag)
                    })
                && match filters.text_of("UserStatus") {
                    None | Some("All") => true,
                    Some(status) => u.text_of("Status") == Some(status),
                }
                && filters
                    .text_of("HomeGroup")
                    .map_or(true, |group| u.text_of("HomeGroup") == Some(group))
        })
        .cloned()
        .collect();
    Ok(vec![Node {
        children: users,
        ..Node::new("Users")
    }])
}

// --- groups ---

fn find_group<'a>(groups: &'a mut [StoredGroup], identifier: &Node) -> Option<&'a mut StoredGroup> {
    if let Some(name) = identifier.text_of("Name") {
        return groups.iter_mut().find(|g| g.name() == name);
    }
    let id = identifier.text_of("GroupID")?;
    groups.iter_mut().find(|g| g.id() == id)
}

fn group_not_found() -> Vec<(&'static str, String)> {
    vec![("GG:03", "The group requested does not exist.".to_string())]
}

/// Settings copied verbatim between request and stored group.
const GROUP_SETTINGS: &[&str] = &[
    "Status",
    "Description",
    "HomeGroupMessage",
    "NotificationEmails",
    "UserHelpOverrideDefault",
    "UserHelpEnabled",
    "UserHelpEmail",
    "UserHelpText",
    "Tags2",
    "UserLimit",
    "DashboardSetID",
];

fn apply_group_settings(group: &mut Node, request: &Node) {
    for field in request.children.iter().filter(|f| GROUP_SETTINGS.contains(&f.name.as_str())) {
        group.set(field.clone());
    }
}

fn member_from(node: &Node) -> Member {
    Member {
        email: node.text_of("Email").map(str::to_string),
        employee_id: node.text_of("EmployeeID").map(str::to_string),
        permissions: node
            .child("Permissions")
            .map(|p| {
                p.children("Permission")
                    .filter(|perm| perm.text_of("Action") != Some("Deny"))
                    .filter_map(|perm| perm.text_of("Code").map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn same_member(a: &Member, b: &Member) -> bool {
    (a.email.is_some() && a.email == b.email) || (a.employee_id.is_some() && a.employee_id == b.employee_id)
}

/// The member identity of a stored user.
fn member_of(user: &Node) -> Member {
    Member {
        email: user.text_of("Email").map(str::to_string),
        employee_id: user.text_of("EmployeeID").map(str::to_string),
        permissions: Vec::new(),
    }
}

/// Fill in the identifier the request left out when the user is known, so
/// entries added by email and removed by employee ID refer to one member.
fn resolve(member: Member, users: &[Node]) -> Member {
    match users.iter().map(member_of).find(|known| same_member(known, &member)) {
        Some(known) => Member {
            permissions: member.permissions,
            ..known
        },
        None => member,
    }
}

fn apply_members(group: &mut StoredGroup, request: &Node, users: &[Node]) {
    let Some(entries) = request.child("Users") else {
        return;
    };
    for entry in entries.children("User") {
        let member = resolve(member_from(entry), users);
        group.members.retain(|m| !same_member(m, &member));
        if entry.text_of("UserAction") != Some("Remove") {
            group.members.push(member);
        }
    }
}

/// Learning modules and subscription variants: `Add` upserts by ID,
/// `Remove` deletes by ID, entries without an action replace the list.
fn apply_catalog(group: &mut Node, request: &Node, container: &str, item: &str, action: &str) {
    let Some(incoming) = request.child(container) else {
        return;
    };
    let mut current = group.child(container).cloned().unwrap_or_else(|| Node::new(container));
    for entry in incoming.children(item) {
        let id = entry.text_of("ID").unwrap_or_default();
        current.children.retain(|c| c.text_of("ID") != Some(id));
        if entry.text_of(action) != Some("Remove") {
            current.children.push(Node {
                children: entry.children.iter().filter(|c| c.name != action).cloned().collect(),
                ..entry.clone()
            });
        }
    }
    group.set(current);
}

fn create_group(store: &mut Store, parameters: &Node) -> Outcome {
    let request = parameters.child("Group").ok_or_else(|| missing("CG:01", "Group"))?;
    let name = request.text_of("Name").ok_or_else(|| missing("CG:02", "Name"))?;
    if store.groups.iter().any(|g| g.name() == name) {
        return Err(vec![("CG:03", format!("A group named {name} already exists."))]);
    }
    let id = request
        .text_of("GroupID")
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let stamp = now();
    let mut group = StoredGroup {
        node: Node::new("Group")
            .with(Node::leaf("Name", name))
            .with(Node::leaf("GroupID", id))
            .with(Node::leaf("CreatedDate", stamp.clone()))
            .with(Node::leaf("ModifiedDate", stamp)),
        members: Vec::new(),
    };
    apply_group_settings(&mut group.node, request);
    apply_members(&mut group, request, &store.users);
    apply_catalog(&mut group.node, request, "LearningModules", "LearningModule", "LearningModuleAction");
    apply_catalog(
        &mut group.node,
        request,
        "SubscriptionVariants",
        "SubscriptionVariant",
        "SubscriptionVariantAction",
    );
    let identity = group.identity();
    store.groups.push(group);
    Ok(identity)
}

fn get_group(store: &mut Store, parameters: &Node) -> Outcome {
    let identifier = parameters.child("Group").ok_or_else(|| missing("GG:01", "Group"))?;
    find_group(&mut store.groups, identifier)
        .map(|g| vec![g.node.clone()])
        .ok_or_else(group_not_found)
}

fn update_group(store: &mut Store, parameters: &Node) -> Outcome {
    let request = parameters.child("Group").ok_or_else(|| missing("UG:01", "Group"))?;
    let identifier = request.child("Identifier").ok_or_else(|| missing("UG:01", "Identifier"))?;
    let group = find_group(&mut store.groups, identifier).ok_or_else(group_not_found)?;
    for field in ["Name", "GroupID"] {
        if let Some(value) = request.text_of(field) {
            group.node.set(Node::leaf(field, value));
        }
    }
    apply_group_settings(&mut group.node, request);
    apply_members(group, request, &store.users);
    apply_catalog(&mut group.node, request, "LearningModules", "LearningModule", "LearningModuleAction");
    apply_catalog(
        &mut group.node,
        request,
        "SubscriptionVariants",
        "SubscriptionVariant",
        "SubscriptionVariantAction",
    );
    group.node.set(Node::leaf("ModifiedDate", now()));
    Ok(group.identity())
}

fn get_user_groups(store: &mut Store, parameters: &Node) -> Outcome {
    let identifier = parameters.child("User").ok_or_else(|| missing("GUG:01", "User"))?;
    let user = find_user(&store.users, identifier).ok_or_else(user_not_found)?;
    let as_member = member_of(user);
    let home_group = user.text_of("HomeGroup");

    let groups = store
        .groups
        .iter()
        .filter_map(|group| {
            let membership = group.members.iter().find(|m| same_member(m, &as_member));
            let is_home = home_group == Some(group.name());
            if membership.is_none() && !is_home {
                return None;
            }
            let permissions: Vec<Node> = membership
                .map(|m| m.permissions.iter().map(|p| Node::leaf("Permission", p.as_str())).collect())
                .unwrap_or_default();
            Some(
                Node::new("Group")
                    .with(Node::leaf("Name", group.name()))
                    .with(Node::leaf("Identifier", group.name()))
                    .with(Node::leaf("IsHomeGroup", if is_home { "1" } else { "0" }))
                    .with(Node {
                        children: permissions,
                        ..Node::new("Permissions")
                    }),
            )
        })
        .collect();
    Ok(vec![Node {
        children: groups,
        ..Node::new("UserGroups")
    }])
}

// --- security and reporting ---

fn request_external_authorization(store: &mut Store, parameters: &Node) -> Outcome {
    let identifier = parameters
        .child("Security")
        .ok_or_else(|| missing("RA:01", "Security"))?;
    let user = find_user(&store.users, identifier).ok_or_else(user_not_found)?;
    let user_id = user.text_of("ID").unwrap_or_default();
    Ok(vec![
        Node::leaf("AuthKey", Uuid::new_v4().to_string()),
        Node::leaf("RequestKey", Uuid::new_v4().to_string()),
        Node::leaf("RedirectPath", format!("https://mock.smarteru.local/sso/{user_id}")),
    ])
}

/// One row per (group, member) pair in the requested groups.
fn get_learner_report(store: &mut Store, parameters: &Node) -> Outcome {
    let filters = parameters
        .child("Report")
        .and_then(|r| r.child("Filters"))
        .ok_or_else(|| missing("GLR:01", "Filters"))?;
    let names: Vec<&str> = filters
        .child("Groups")
        .and_then(|g| g.child("GroupNames"))
        .map(|names| names.children("GroupName").map(|n| n.text.as_str()).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for group in store.groups.iter().filter(|g| names.is_empty() || names.contains(&g.name())) {
        for member in &group.members {
            let Some(user) = store.users.iter().find(|u| same_member(member, &member_of(u))) else {
                continue;
            };
            let mut row = Node::new("Learner")
                .with(Node::leaf("ID", format!("{}-{}", group.id(), rows.len() + 1)))
                .with(Node::leaf("CourseName", "Orientation"))
                .with(Node::leaf("GroupName", group.name()))
                .with(Node::leaf("GroupID", group.id()))
                .with(Node::leaf("Progress", "0"));
            for (request_field, report_field) in [
                ("ID", "UserID"),
                ("Email", "UserEmail"),
                ("EmployeeID", "EmployeeID"),
                ("GivenName", "GivenName"),
                ("Surname", "Surname"),
            ] {
                if let Some(value) = user.text_of(request_field) {
                    row.set(Node::leaf(report_field, value));
                }
            }
            rows.push(row);
        }
    }
    Ok(vec![Node {
        children: rows,
        ..Node::new("LearnerReport")
    }])
}
