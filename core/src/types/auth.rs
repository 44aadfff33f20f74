use serde::{Deserialize, Serialize};

/// Session tokens returned by `requestExternalAuthorization`.
///
/// `redirect_path` is the URL the learner's browser should be sent to; the
/// keys are single-use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExternalAuthorization {
    pub auth_key: String,
    pub request_key: String,
    pub redirect_path: String,
}
