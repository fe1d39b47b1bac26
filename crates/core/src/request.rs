//! Rotation request model
//!
//! The inbound envelope is `{ "type": "<engine>", ...fields }`. Every engine
//! currently shares the same field layout, [`RotateParams`]; the engine is
//! carried by the [`RotationRequest`] variant.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{RotationError, RotationResult};
use crate::secret::SecretString;

/// Identity used to open the connection. Never rotated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagingUser {
    /// Login name
    pub username: String,
    /// Login password
    pub password: SecretString,
}

/// Identity whose password is being changed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateUser {
    /// Account name to alter
    pub username: String,
    /// Current password; informational only, never used to connect
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Password to set. `null` and a missing key both decode to `None`.
    #[serde(default)]
    pub new_password: Option<SecretString>,
}

/// Engine-specific rotation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateParams {
    /// Database host name or address
    pub host: String,
    /// Database port (1-65535)
    pub port: u16,
    /// Database to connect to
    pub database: String,
    /// Connecting identity
    pub managing_user: ManagingUser,
    /// Identity to rotate
    pub rotate_user: RotateUser,
}

impl RotateParams {
    /// Structural checks serde cannot express
    pub fn validate(&self) -> RotationResult<()> {
        if self.host.trim().is_empty() {
            return Err(RotationError::malformed("host cannot be empty"));
        }
        if self.port == 0 {
            return Err(RotationError::malformed("port must be between 1 and 65535"));
        }
        if self.database.is_empty() {
            return Err(RotationError::malformed("database cannot be empty"));
        }
        if self.managing_user.username.is_empty() {
            return Err(RotationError::malformed("managingUser.username cannot be empty"));
        }
        if self.rotate_user.username.is_empty() {
            return Err(RotationError::malformed("rotateUser.username cannot be empty"));
        }
        Ok(())
    }
}

/// A decoded rotation request, one variant per engine
#[derive(Debug, Clone)]
pub enum RotationRequest {
    /// Rotate a MySQL account
    MySql(RotateParams),
    /// Rotate a PostgreSQL role
    Postgres(RotateParams),
}

impl RotationRequest {
    /// Decode the full payload for an already-resolved engine.
    ///
    /// The envelope's `type` key and any other unknown keys are ignored.
    pub fn decode(engine: Engine, payload: &serde_json::Value) -> RotationResult<Self> {
        let params = RotateParams::deserialize(payload)
            .map_err(|e| RotationError::decode(format!("invalid {engine} request"), e))?;
        params.validate()?;

        Ok(match engine {
            Engine::MySql => Self::MySql(params),
            Engine::Postgres => Self::Postgres(params),
        })
    }

    /// Engine this request targets
    pub const fn engine(&self) -> Engine {
        match self {
            Self::MySql(_) => Engine::MySql,
            Self::Postgres(_) => Engine::Postgres,
        }
    }

    /// Engine-specific payload
    pub const fn params(&self) -> &RotateParams {
        match self {
            Self::MySql(params) | Self::Postgres(params) => params,
        }
    }

    /// Consume the request, keeping the payload
    pub fn into_params(self) -> RotateParams {
        match self {
            Self::MySql(params) | Self::Postgres(params) => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn payload() -> Value {
        json!({
            "type": "mysql",
            "host": "127.0.0.1",
            "port": 3306,
            "database": "credential_rotation_test",
            "managingUser": { "username": "managing_user", "password": "manager_password" },
            "rotateUser": {
                "username": "target_user",
                "password": "initial_password",
                "newPassword": "n3w-s3cret"
            }
        })
    }

    #[test]
    fn test_decode_full_payload() {
        let request = RotationRequest::decode(Engine::MySql, &payload()).unwrap();

        assert_eq!(request.engine(), Engine::MySql);
        let params = request.into_params();
        assert_eq!(params.host, "127.0.0.1");
        assert_eq!(params.port, 3306);
        assert_eq!(params.managing_user.username, "managing_user");
        assert!(
            params
                .rotate_user
                .new_password
                .is_some_and(|p| p.expose_secret(|s| s == "n3w-s3cret"))
        );
    }

    #[test]
    fn test_null_and_missing_new_password_decode_to_none() {
        let mut null = payload();
        null["rotateUser"]["newPassword"] = Value::Null;
        let mut missing = payload();
        missing["rotateUser"].as_object_mut().unwrap().remove("newPassword");

        for body in [null, missing] {
            let request = RotationRequest::decode(Engine::Postgres, &body).unwrap();
            assert!(request.params().rotate_user.new_password.is_none());
        }
    }

    #[rstest]
    #[case::port_out_of_range("/port", json!(70000))]
    #[case::port_negative("/port", json!(-1))]
    #[case::port_as_string("/port", json!("5432"))]
    #[case::port_zero("/port", json!(0))]
    #[case::host_missing("/host", Value::Null)]
    #[case::host_empty("/host", json!(""))]
    #[case::database_empty("/database", json!(""))]
    #[case::rotate_username_empty("/rotateUser/username", json!(""))]
    #[case::managing_user_not_object("/managingUser", json!("admin"))]
    fn test_malformed_payloads(#[case] pointer: &str, #[case] value: Value) {
        let mut body = payload();
        *body.pointer_mut(pointer).unwrap() = value;

        let err = RotationRequest::decode(Engine::MySql, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    }

    #[test]
    fn test_decode_error_never_echoes_passwords() {
        let mut body = payload();
        body["port"] = json!("not-a-port");

        let err = RotationRequest::decode(Engine::MySql, &body).unwrap_err();
        let report = err.report();
        assert!(!report.contains("manager_password"));
        assert!(!report.contains("n3w-s3cret"));
    }

    #[rstest]
    #[case::managing_password_number("/managingUser/password", json!(987_654_321))]
    #[case::managing_password_bool("/managingUser/password", json!(true))]
    #[case::new_password_number("/rotateUser/newPassword", json!(123_456_789))]
    #[case::new_password_bool("/rotateUser/newPassword", json!(false))]
    #[case::current_password_float("/rotateUser/password", json!(2.718_281))]
    fn test_non_string_password_is_never_echoed(#[case] pointer: &str, #[case] value: Value) {
        let mut body = payload();
        *body.pointer_mut(pointer).unwrap() = value.clone();

        let err = RotationRequest::decode(Engine::MySql, &body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest);
        let report = err.report();
        assert!(report.contains("expected a string"), "{report}");
        assert!(!report.contains(&value.to_string()), "{report}");
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let request = RotationRequest::decode(Engine::MySql, &payload()).unwrap();
        let debug = format!("{request:?}");

        assert!(debug.contains("target_user"));
        assert!(!debug.contains("manager_password"));
        assert!(!debug.contains("initial_password"));
        assert!(!debug.contains("n3w-s3cret"));
    }
}
