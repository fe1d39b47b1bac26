//! Response envelope returned across the invocation boundary

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, RotationResult};

/// `{ "code": 200|400, "message": "...", "error": "<kind>"? }`
///
/// ```
/// use rotator_core::{RotationError, RotationResponse};
///
/// let ok = RotationResponse::from_result(&Ok(()));
/// assert_eq!(ok.code, 200);
///
/// let failed = RotationResponse::from_result(&Err(RotationError::unsupported_engine("oracle")));
/// assert_eq!(failed.code, 400);
/// assert_eq!(failed.message, "unsupported engine 'oracle'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResponse {
    /// HTTP-style status code
    pub code: u16,
    /// `"ok"` or the failure report
    pub message: String,
    /// Failure classification; absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl RotationResponse {
    /// Status code for a completed rotation
    pub const OK: u16 = 200;
    /// Status code for any expected failure
    pub const CLIENT_ERROR: u16 = 400;

    /// Successful rotation
    pub fn ok() -> Self {
        Self {
            code: Self::OK,
            message: "ok".to_string(),
            error: None,
        }
    }

    /// Map a dispatch outcome to the envelope
    pub fn from_result(result: &RotationResult<()>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self {
                code: Self::CLIENT_ERROR,
                message: err.report(),
                error: Some(err.kind()),
            },
        }
    }

    /// Whether this envelope reports success
    pub fn is_success(&self) -> bool {
        self.code == Self::OK
    }
}
