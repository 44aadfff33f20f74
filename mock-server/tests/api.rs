use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Node, ACCOUNT_API_KEY, USER_API_KEY};
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_xml(response: axum::response::Response) -> Node {
    Node::parse(&body_text(response).await).unwrap()
}

fn package_request(uri: &str, xml: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(format!("Package={}", urlencoding::encode(xml)))
        .unwrap()
}

fn package(method: &str, parameters: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<SmarterU><AccountAPI>{ACCOUNT_API_KEY}</AccountAPI><UserAPI>{USER_API_KEY}</UserAPI>\
         <Method>{method}</Method><Parameters>{parameters}</Parameters></SmarterU>\n"
    )
}

fn error_ids(envelope: &Node) -> Vec<String> {
    envelope
        .child("Errors")
        .map(|e| e.children("Error").filter_map(|e| e.text_of("ErrorID")).map(str::to_string).collect())
        .unwrap_or_default()
}

const CREATE_USER: &str = "<User><Info><Email>jane@example.com</Email><EmployeeID>7</EmployeeID>\
    <GivenName>Jane</GivenName><Surname>Doe</Surname><Password>secret</Password>\
    <LearnerNotifications>1</LearnerNotifications></Info>\
    <Profile><Teams><Team>blue</Team></Teams><HomeGroup>Staff</HomeGroup></Profile><Venues/><Wages/></User>";

// --- envelope ---

#[tokio::test]
async fn wrong_credentials_fail_with_vendor_error() {
    let xml = "<SmarterU><AccountAPI>nope</AccountAPI><UserAPI>nope</UserAPI><Method>getUser</Method>\
               <Parameters><User><ID>1</ID></User></Parameters></SmarterU>";
    let resp = app().oneshot(package_request("/", xml)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope = body_xml(resp).await;
    assert_eq!(envelope.text_of("Result"), Some("Failed"));
    assert_eq!(error_ids(&envelope), vec!["SU:01"]);
}

#[tokio::test]
async fn malformed_package_returns_400() {
    let resp = app()
        .oneshot(package_request("/", "<SmarterU><Method>"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_package_field_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("Other=1".to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn unknown_method_fails() {
    let resp = app()
        .oneshot(package_request("/apiv2/", &package("deleteEverything", "")))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    assert_eq!(error_ids(&envelope), vec!["SU:02"]);
}

// --- users ---

#[tokio::test]
async fn unknown_user_is_gu03() {
    let resp = app()
        .oneshot(package_request("/", &package("getUser", "<User><ID>missing</ID></User>")))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    assert_eq!(envelope.text_of("Result"), Some("Failed"));
    assert_eq!(error_ids(&envelope), vec!["GU:03"]);
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app();

    // create
    let resp = app
        .clone()
        .oneshot(package_request("/", &package("createUser", CREATE_USER)))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    assert_eq!(envelope.text_of("Result"), Some("Success"));
    let info = envelope.child("Info").unwrap();
    let id = info.text_of("ID").unwrap().to_string();
    assert_eq!(info.text_of("Email"), Some("jane@example.com"));

    // duplicate email is rejected
    let resp = app
        .clone()
        .oneshot(package_request("/", &package("createUser", CREATE_USER)))
        .await
        .unwrap();
    assert_eq!(error_ids(&body_xml(resp).await), vec!["CU:03"]);

    // read back in the flat response shape
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package("getUser", "<User><EmployeeID>7</EmployeeID></User>"),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    let user = envelope.child("Info").unwrap().child("User").unwrap();
    assert_eq!(user.text_of("ID"), Some(id.as_str()));
    assert_eq!(user.text_of("SendWeeklyTaskReminder"), Some("1"));
    assert_eq!(user.text_of("HomeGroup"), Some("Staff"));
    assert!(user.child("Password").is_none());
    assert!(user.text_of("CreatedDate").is_some());

    // update
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package(
                "updateUser",
                &format!("<User><Identifier><ID>{id}</ID></Identifier><Info><Surname>Roe</Surname></Info><Profile/></User>"),
            ),
        ))
        .await
        .unwrap();
    assert_eq!(body_xml(resp).await.text_of("Result"), Some("Success"));

    // list with a CONTAINS filter
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package(
                "listUsers",
                "<User><Filters><Name><MatchType>CONTAINS</MatchType><Value>Roe</Value></Name></Filters></User>",
            ),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    let users = envelope.child("Info").unwrap().child("Users").unwrap();
    assert_eq!(users.children("User").count(), 1);
    assert_eq!(users.child("User").unwrap().text_of("Surname"), Some("Roe"));
}

// --- groups ---

#[tokio::test]
async fn group_membership_lifecycle() {
    let app = app();

    for xml in [
        package("createUser", CREATE_USER),
        package(
            "createGroup",
            "<Group><Name>Staff</Name><Status>Active</Status><Users/><LearningModules/><SubscriptionVariants/></Group>",
        ),
        package(
            "updateGroup",
            "<Group><Identifier><Name>Staff</Name></Identifier><Users><User><Email>jane@example.com</Email>\
             <UserAction>Add</UserAction><HomeGroup>0</HomeGroup><Permissions><Permission><Code>MANAGE_USERS</Code>\
             </Permission></Permissions></User></Users><LearningModules/><SubscriptionVariants/></Group>",
        ),
    ] {
        let resp = app.clone().oneshot(package_request("/", &xml)).await.unwrap();
        assert_eq!(body_xml(resp).await.text_of("Result"), Some("Success"));
    }

    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package("getUserGroups", "<User><Email>jane@example.com</Email></User>"),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    let group = envelope
        .child("Info")
        .and_then(|i| i.child("UserGroups"))
        .and_then(|g| g.child("Group"))
        .unwrap();
    assert_eq!(group.text_of("Name"), Some("Staff"));
    assert_eq!(group.text_of("IsHomeGroup"), Some("1"));
    assert_eq!(group.child("Permissions").unwrap().text_of("Permission"), Some("MANAGE_USERS"));

    // rename, then the old name no longer resolves
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package(
                "updateGroup",
                "<Group><Identifier><Name>Staff</Name></Identifier><Name>Employees</Name><Users/>\
                 <LearningModules/><SubscriptionVariants/></Group>",
            ),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    assert_eq!(envelope.child("Info").unwrap().text_of("Group"), Some("Employees"));

    let resp = app
        .clone()
        .oneshot(package_request("/", &package("getGroup", "<Group><Name>Staff</Name></Group>")))
        .await
        .unwrap();
    assert_eq!(error_ids(&body_xml(resp).await), vec!["GG:03"]);

    // learner report lists the member under the new name
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package(
                "getLearnerReport",
                "<Report><Filters><Groups><GroupNames><GroupName>Employees</GroupName></GroupNames></Groups></Filters></Report>",
            ),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    let report = envelope.child("Info").unwrap().child("LearnerReport").unwrap();
    let learner = report.child("Learner").unwrap();
    assert_eq!(learner.text_of("UserEmail"), Some("jane@example.com"));
    assert_eq!(learner.text_of("GroupName"), Some("Employees"));
}

#[tokio::test]
async fn external_authorization_needs_known_user() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(package_request(
            "/",
            &package("requestExternalAuthorization", "<Security><Email>jane@example.com</Email></Security>"),
        ))
        .await
        .unwrap();
    assert_eq!(error_ids(&body_xml(resp).await), vec!["GU:03"]);

    app.clone()
        .oneshot(package_request("/", &package("createUser", CREATE_USER)))
        .await
        .unwrap();
    let resp = app
        .oneshot(package_request(
            "/",
            &package("requestExternalAuthorization", "<Security><EmployeeID>7</EmployeeID></Security>"),
        ))
        .await
        .unwrap();
    let envelope = body_xml(resp).await;
    let info = envelope.child("Info").unwrap();
    assert!(info.text_of("AuthKey").is_some());
    assert!(info.text_of("RequestKey").is_some());
    assert!(info.text_of("RedirectPath").unwrap().starts_with("https://"));
}
