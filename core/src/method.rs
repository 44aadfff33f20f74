use std::fmt;

use serde::{Deserialize, Serialize};

/// The `<Method>` of a vendor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    CreateUser,
    GetUser,
    UpdateUser,
    ListUsers,
    GetUserGroups,
    CreateGroup,
    GetGroup,
    UpdateGroup,
    RequestExternalAuthorization,
    GetLearnerReport,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::CreateUser => "createUser",
            Method::GetUser => "getUser",
            Method::UpdateUser => "updateUser",
            Method::ListUsers => "listUsers",
            Method::GetUserGroups => "getUserGroups",
            Method::CreateGroup => "createGroup",
            Method::GetGroup => "getGroup",
            Method::UpdateGroup => "updateGroup",
            Method::RequestExternalAuthorization => "requestExternalAuthorization",
            Method::GetLearnerReport => "getLearnerReport",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
