use serde::{Deserialize, Serialize};

/// One `<Error>` entry of a vendor response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode {
    pub error_code: String,
    pub error_message: String,
}

impl ErrorCode {
    pub fn new(error_code: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            error_message: error_message.into(),
        }
    }
}
