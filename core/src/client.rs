//! Blocking SmarterU API client.
//!
//! # Design
//! `Client` holds configuration, an [`XmlGenerator`] and a [`Transport`] and
//! nothing else. Every operation renders one request document, posts it as
//! the `Package` form field, and maps the response `<Info>` into domain
//! values. The request/response split is exposed through
//! [`Client::build_request`] so a caller can drive the round trip itself.

use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{Error, Result, SmarterUError};
use crate::generator::XmlGenerator;
use crate::http::{HttpRequest, Transport, FORM_CONTENT_TYPE};
use crate::method::Method;
use crate::query::{GetLearnerReportQuery, GetUserGroupsQuery, GetUserQuery, ListUsersQuery, UserIdentifier};
use crate::response::{self, Envelope, Status};
use crate::types::{Action, ErrorCode, ExternalAuthorization, Group, LearnerReport, User};
use crate::xml::Element;

#[cfg(feature = "ureq")]
use crate::http::UreqTransport;

const FAILURE_LOG_MESSAGE: &str =
    "Failed to make request to SmarterU API. See context for request/response details.";

/// The result of [`Client::update_group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupUpdate {
    /// Name and ID the vendor reported for the updated group.
    pub result: Group,
    /// The submitted group with any pending rename cleared; pass this to
    /// later updates.
    pub updated: Group,
}

#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
    generator: XmlGenerator,
}

#[cfg(feature = "ureq")]
impl Client<UreqTransport> {
    /// A client for the default endpoint using a blocking `ureq` agent.
    pub fn new(account_api_key: impl Into<String>, user_api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(account_api_key, user_api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            generator: XmlGenerator::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn generator(&self) -> &XmlGenerator {
        &self.generator
    }

    /// The form POST carrying `xml` to the configured endpoint.
    pub fn build_request(&self, xml: &str) -> HttpRequest {
        HttpRequest {
            url: self.config.endpoint.clone(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: format!("Package={}", urlencoding::encode(xml)),
        }
    }

    /// Create a user. Returns the identifiers the vendor assigned or echoed.
    pub fn create_user(&self, user: &User) -> Result<User> {
        let xml = self.generator.create_user(&self.config.credentials(), user)?;
        let info = self.call(Method::CreateUser, &xml)?;
        Ok(response::user_identity(&info))
    }

    pub fn read_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user(&GetUserQuery::by_id(id))
    }

    pub fn read_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user(&GetUserQuery::by_email(email))
    }

    pub fn read_user_by_employee_id(&self, employee_id: &str) -> Result<Option<User>> {
        self.get_user(&GetUserQuery::by_employee_id(employee_id))
    }

    /// Look up one user. `Ok(None)` when the vendor reports a configured
    /// not-found code for `getUser`.
    pub fn get_user(&self, query: &GetUserQuery) -> Result<Option<User>> {
        let xml = self.generator.get_user(&self.config.credentials(), query)?;
        self.lookup(Method::GetUser, &xml)?
            .map(|info| response::user(&info))
            .transpose()
    }

    pub fn update_user(&self, user: &User) -> Result<User> {
        let xml = self.generator.update_user(&self.config.credentials(), user)?;
        let info = self.call(Method::UpdateUser, &xml)?;
        Ok(response::user_identity(&info))
    }

    pub fn list_users(&self, query: &ListUsersQuery) -> Result<Vec<User>> {
        let xml = self.generator.list_users(&self.config.credentials(), query)?;
        match self.lookup(Method::ListUsers, &xml)? {
            Some(info) => response::users(&info),
            None => Ok(Vec::new()),
        }
    }

    pub fn read_groups_for_user_by_id(&self, id: &str) -> Result<Vec<Group>> {
        self.get_user_groups(&GetUserQuery::by_id(id).into())
    }

    pub fn read_groups_for_user_by_email(&self, email: &str) -> Result<Vec<Group>> {
        self.get_user_groups(&GetUserQuery::by_email(email).into())
    }

    pub fn read_groups_for_user_by_employee_id(&self, employee_id: &str) -> Result<Vec<Group>> {
        self.get_user_groups(&GetUserQuery::by_employee_id(employee_id).into())
    }

    pub fn get_user_groups(&self, query: &GetUserGroupsQuery) -> Result<Vec<Group>> {
        let xml = self.generator.get_user_groups(&self.config.credentials(), query)?;
        Ok(self
            .lookup(Method::GetUserGroups, &xml)?
            .map(|info| response::user_groups(&info))
            .unwrap_or_default())
    }

    pub fn create_group(&self, group: &Group) -> Result<Group> {
        let xml = self.generator.create_group(&self.config.credentials(), group)?;
        let info = self.call(Method::CreateGroup, &xml)?;
        Ok(response::group_identity(&info))
    }

    /// Look up a group by its name, or by its ID when no name is set.
    pub fn get_group(&self, group: &Group) -> Result<Option<Group>> {
        let xml = self.generator.get_group(&self.config.credentials(), group)?;
        self.lookup(Method::GetGroup, &xml)?
            .map(|info| response::group(&info))
            .transpose()
    }

    /// Update a group, consuming any pending rename. Use
    /// [`GroupUpdate::updated`] for subsequent updates.
    pub fn update_group(&self, group: Group) -> Result<GroupUpdate> {
        let request = self.generator.update_group(&self.config.credentials(), &group)?;
        let info = self.call(Method::UpdateGroup, &request.xml)?;
        Ok(GroupUpdate {
            result: response::group_identity(&info),
            updated: request.group,
        })
    }

    pub fn add_users_to_group(&self, users: &[User], group: &Group) -> Result<Group> {
        self.change_group_members(users, group, Action::Add)
    }

    pub fn remove_users_from_group(&self, users: &[User], group: &Group) -> Result<Group> {
        self.change_group_members(users, group, Action::Remove)
    }

    fn change_group_members(&self, users: &[User], group: &Group, action: Action) -> Result<Group> {
        let xml = self
            .generator
            .change_group_members(&self.config.credentials(), users, group, action)?;
        let info = self.call(Method::UpdateGroup, &xml)?;
        Ok(response::group_identity(&info))
    }

    pub fn request_external_authorization_by_email(&self, email: &str) -> Result<ExternalAuthorization> {
        self.request_external_authorization(&UserIdentifier::Email(email.to_string()))
    }

    pub fn request_external_authorization_by_employee_id(
        &self,
        employee_id: &str,
    ) -> Result<ExternalAuthorization> {
        self.request_external_authorization(&UserIdentifier::EmployeeId(employee_id.to_string()))
    }

    fn request_external_authorization(&self, user: &UserIdentifier) -> Result<ExternalAuthorization> {
        let xml = self
            .generator
            .request_external_authorization(&self.config.credentials(), user)?;
        let info = self.call(Method::RequestExternalAuthorization, &xml)?;
        response::external_authorization(&info)
    }

    /// Rows of the learner report, in vendor order.
    pub fn get_learner_report(&self, query: &GetLearnerReportQuery) -> Result<Vec<LearnerReport>> {
        let xml = self.generator.get_learner_report(&self.config.credentials(), query)?;
        match self.lookup(Method::GetLearnerReport, &xml)? {
            Some(info) => response::learner_reports(&info),
            None => Ok(Vec::new()),
        }
    }

    fn round_trip(&self, xml: &str) -> Result<(Envelope, String)> {
        let response = self.transport.send(&self.build_request(xml))?;
        if !response.is_success() {
            return Err(Error::Http {
                status: response.status,
                body: response.body,
            });
        }
        let envelope = response::parse_envelope(&response.body)?;
        Ok((envelope, response.body))
    }

    fn call(&self, method: Method, xml: &str) -> Result<Element> {
        let (envelope, body) = self.round_trip(xml)?;
        match envelope.status {
            Status::Success => {
                debug!(%method, "SmarterU request succeeded");
                Ok(envelope.info)
            }
            Status::Failed => Err(rejected(xml, &body, envelope.errors)),
        }
    }

    /// Like `call`, but a failure carrying one of the method's not-found
    /// codes is `Ok(None)`.
    fn lookup(&self, method: Method, xml: &str) -> Result<Option<Element>> {
        let (envelope, body) = self.round_trip(xml)?;
        match envelope.status {
            Status::Success => {
                debug!(%method, "SmarterU request succeeded");
                Ok(Some(envelope.info))
            }
            Status::Failed if self.config.is_not_found(method, &envelope.errors) => {
                debug!(%method, "SmarterU reported no matching record");
                Ok(None)
            }
            Status::Failed => Err(rejected(xml, &body, envelope.errors)),
        }
    }
}

fn rejected(xml: &str, body: &str, errors: Vec<ErrorCode>) -> Error {
    error!(
        request = %XmlGenerator::redact(xml),
        response = %body,
        "{}", FAILURE_LOG_MESSAGE
    );
    SmarterUError::new(errors).into()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_test::traced_test;

    use super::*;
    use crate::error::SMARTERU_EXCEPTION_MESSAGE;
    use crate::http::HttpResponse;

    /// Records every request and replays queued responses.
    #[derive(Default)]
    struct Capture {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<HttpResponse>>,
    }

    impl Capture {
        fn replying(bodies: &[&str]) -> Self {
            let capture = Self::default();
            capture
                .responses
                .borrow_mut()
                .extend(bodies.iter().map(|b| HttpResponse::ok(*b)));
            capture
        }

        fn package(&self, index: usize) -> String {
            let body = self.requests.borrow()[index].body.clone();
            let encoded = body.strip_prefix("Package=").unwrap();
            urlencoding::decode(encoded).unwrap().into_owned()
        }
    }

    impl Transport for Capture {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| Error::Transport("no response queued".into()))
        }
    }

    /// Collects formatted log output, including continuation lines.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn client(capture: &Capture) -> Client<&Capture> {
        Client::with_transport(ClientConfig::new("account", "user"), capture)
    }

    const FAILED_TWICE: &str = "<SmarterU><Result>Failed</Result><Errors>\
        <Error><ErrorID>Error1</ErrorID><ErrorMessage>Testing</ErrorMessage></Error>\
        <Error><ErrorID>Error2</ErrorID><ErrorMessage>123</ErrorMessage></Error>\
        </Errors></SmarterU>";

    #[test]
    fn request_is_url_encoded_form_post() {
        let capture = Capture::replying(&["<SmarterU><Result>Success</Result><Info><UserGroups/></Info></SmarterU>"]);
        client(&capture).read_groups_for_user_by_id("1").unwrap();

        let request = capture.requests.borrow()[0].clone();
        assert_eq!(request.url, "https://api.smarteru.com/apiv2/");
        assert_eq!(
            request.headers,
            vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())]
        );
        assert!(!request.body.contains('<'));
        assert_eq!(
            capture.package(0),
            XmlGenerator::new()
                .get_user_groups(
                    &ClientConfig::new("account", "user").credentials(),
                    &GetUserQuery::by_id("1").into()
                )
                .unwrap()
        );
    }

    #[test]
    fn query_without_identifier_sends_nothing() {
        let capture = Capture::default();
        let err = client(&capture).get_user(&GetUserQuery::default()).unwrap_err();
        assert!(matches!(err, Error::MissingValue(_)));
        assert!(capture.requests.borrow().is_empty());
    }

    #[test]
    fn unknown_user_is_none() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Failed</Result><Info><User/></Info><Errors>\
             <Error><ErrorID>GU:03</ErrorID><ErrorMessage>The user requested does not exist.</ErrorMessage></Error>\
             </Errors></SmarterU>",
        ]);
        assert_eq!(client(&capture).read_user_by_employee_id("1").unwrap(), None);
    }

    #[test]
    fn not_found_code_only_applies_to_its_method() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Failed</Result><Errors>\
             <Error><ErrorID>GU:03</ErrorID><ErrorMessage>nope</ErrorMessage></Error>\
             </Errors></SmarterU>",
        ]);
        let err = client(&capture).read_groups_for_user_by_id("1").unwrap_err();
        assert!(matches!(err, Error::SmarterU(_)));
    }

    #[test]
    #[traced_test]
    fn vendor_failure_is_logged_with_masked_credentials() {
        let capture = Capture::replying(&[FAILED_TWICE]);
        let err = client(&capture)
            .remove_users_from_group(&[User::with_email("test@test.com")], &Group::named("My Group"))
            .unwrap_err();

        let Error::SmarterU(rejection) = err else {
            panic!("expected a vendor rejection, got {err:?}");
        };
        assert_eq!(rejection.to_string(), SMARTERU_EXCEPTION_MESSAGE);
        assert_eq!(rejection.error_codes().len(), 2);
        assert_eq!(rejection.error_codes()[0].error_code, "Error1");
        assert_eq!(rejection.details(), "Error1: Testing, Error2: 123");

        assert!(logs_contain(FAILURE_LOG_MESSAGE));
        assert!(logs_contain("request=<?xml version=\"1.0\"?>"));
    }

    #[test]
    fn failure_log_carries_literal_masked_request_and_response() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let capture = Capture::replying(&[FAILED_TWICE]);
        let err = tracing::subscriber::with_default(subscriber, || {
            client(&capture).remove_users_from_group(&[User::with_email("test@test.com")], &Group::named("My Group"))
        })
        .unwrap_err();
        assert!(matches!(err, Error::SmarterU(_)));

        let output = logs.contents();
        assert!(output.contains(FAILURE_LOG_MESSAGE));
        assert!(output.contains(
            "request=<?xml version=\"1.0\"?>\n<SmarterU><AccountAPI>********</AccountAPI><UserAPI>********</UserAPI>\
             <Method>updateGroup</Method>"
        ));
        assert!(output.contains("<UserAction>Remove</UserAction>"));
        assert!(output.contains(&format!("response={FAILED_TWICE}")));
        assert!(!output.contains("<AccountAPI>account</AccountAPI>"));
        assert!(!output.contains("\\n"));
    }

    #[test]
    fn http_error_status_is_surfaced() {
        let capture = Capture::default();
        capture.responses.borrow_mut().push_back(HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: "Client error".into(),
        });
        let err = client(&capture).read_user_by_id("1").unwrap_err();
        assert!(matches!(err, Error::Http { status: 404, ref body } if body == "Client error"));
    }

    #[test]
    fn unexpected_result_is_deserialization_error() {
        let capture = Capture::replying(&["<SmarterU><Result>Pending</Result></SmarterU>"]);
        let err = client(&capture).read_user_by_id("1").unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[test]
    fn update_group_returns_renamed_copy() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Success</Result><Info><Group>Renamed</Group><GroupID>9</GroupID></Info><Errors/></SmarterU>",
            "<SmarterU><Result>Success</Result><Info><Group>Renamed</Group><GroupID>9</GroupID></Info><Errors/></SmarterU>",
        ]);
        let client = client(&capture);
        let group = Group {
            old_name: Some("Original".into()),
            ..Group::named("Renamed")
        };

        let first = client.update_group(group).unwrap();
        assert_eq!(first.result.name.as_deref(), Some("Renamed"));
        assert_eq!(first.result.group_id.as_deref(), Some("9"));
        assert!(!first.updated.is_renaming());
        assert!(capture.package(0).contains("<Identifier><Name>Original</Name></Identifier><Name>Renamed</Name>"));

        client.update_group(first.updated).unwrap();
        let second = capture.package(1);
        assert!(second.contains("<Identifier><Name>Renamed</Name></Identifier>"));
        assert!(!second.contains("Original"));
    }

    #[test]
    fn external_authorization_is_parsed() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Success</Result><Info><AuthKey>authKey</AuthKey>\
             <RequestKey>requestKey</RequestKey><RedirectPath>https://localhost</RedirectPath></Info>\
             <Errors></Errors></SmarterU>",
        ]);
        let auth = client(&capture)
            .request_external_authorization_by_email("test@test.com")
            .unwrap();
        assert_eq!(
            auth,
            ExternalAuthorization {
                auth_key: "authKey".into(),
                request_key: "requestKey".into(),
                redirect_path: "https://localhost".into(),
            }
        );
        assert!(capture.package(0).contains("<Security><Email>test@test.com</Email></Security>"));
    }

    #[test]
    fn success_ignores_non_fatal_errors() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Success</Result><Info><User><ID>1</ID><Email>a@b.c</Email></User></Info>\
             <Errors><Error><ErrorID>Error 1</ErrorID><ErrorMessage>Non-fatal Error</ErrorMessage></Error></Errors>\
             </SmarterU>",
        ]);
        let user = client(&capture).read_user_by_id("1").unwrap().unwrap();
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn learner_report_rows_keep_vendor_order() {
        let capture = Capture::replying(&[
            "<SmarterU><Result>Success</Result><Info><LearnerReport>\
             <Learner><ID>2</ID><Progress>100</Progress><GradePercentage>97.5</GradePercentage></Learner>\
             <Learner><ID>1</ID><Progress>40</Progress><DueDate>2022-08-01</DueDate></Learner>\
             </LearnerReport></Info></SmarterU>",
        ]);
        let query = GetLearnerReportQuery {
            group_names: vec!["SANDBOX".into()],
            ..GetLearnerReportQuery::default()
        };
        let rows = client(&capture).get_learner_report(&query).unwrap();
        assert_eq!(rows.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["2", "1"]);
        assert!(rows[0].is_completed());
        assert_eq!(rows[0].grade_percentage, Some(97.5));
        assert!(!rows[1].is_completed());
        assert!(rows[1].due_date.is_some());
    }
}
