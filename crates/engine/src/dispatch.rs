//! Request dispatch
//!
//! The dispatcher reads only the envelope's `type` tag, resolves it to an
//! [`Engine`], decodes the rest of the payload for that engine and hands it
//! to the matching rotator. Routing depends on the tag alone.

use rotator_core::{Engine, RotationContext, RotationError, RotationRequest, RotationResult};
use serde::Deserialize;

use crate::rotator::{MySqlRotator, PostgresRotator, Rotate};

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
}

/// Resolve the envelope's `type` tag without decoding anything else.
///
/// A payload that is not an object, or whose `type` is missing or not a
/// string, is malformed. A string tag naming no engine is unsupported.
pub fn read_engine_tag(payload: &serde_json::Value) -> RotationResult<Engine> {
    let envelope = Envelope::deserialize(payload)
        .map_err(|e| RotationError::decode("invalid request envelope", e))?;

    Engine::from_tag(&envelope.tag).ok_or_else(|| RotationError::unsupported_engine(envelope.tag))
}

/// Routes rotation requests to one rotator per engine.
///
/// Holds no per-request state; one dispatcher can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<M = MySqlRotator, P = PostgresRotator> {
    mysql: M,
    postgres: P,
}

impl Dispatcher {
    /// Dispatcher backed by the real database drivers
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: Rotate, P: Rotate> Dispatcher<M, P> {
    /// Dispatcher with caller-supplied rotators
    pub const fn with_rotators(mysql: M, postgres: P) -> Self {
        Self { mysql, postgres }
    }

    /// Engines this dispatcher can route to
    pub fn engines(&self) -> &'static [Engine] {
        &Engine::ALL
    }

    /// Rotate the credentials described by `payload`
    pub async fn dispatch(
        &self,
        ctx: &RotationContext,
        payload: &serde_json::Value,
    ) -> RotationResult<()> {
        let result = self.resolve_and_route(ctx, payload).await;

        let engine = result
            .as_ref()
            .err()
            .and_then(RotationError::engine)
            .map_or_else(|| tag_of(payload), |engine| engine.tag().to_owned());
        match &result {
            Ok(()) => tracing::info!(
                %engine,
                trace_id = %ctx.trace_id,
                outcome = "rotated",
                "dispatched"
            ),
            Err(error) => tracing::info!(
                %engine,
                trace_id = %ctx.trace_id,
                outcome = error.kind().as_str(),
                "dispatched"
            ),
        }
        result
    }

    async fn resolve_and_route(
        &self,
        ctx: &RotationContext,
        payload: &serde_json::Value,
    ) -> RotationResult<()> {
        let engine = read_engine_tag(payload)?;
        let request = RotationRequest::decode(engine, payload)?;
        self.route(ctx, request).await
    }

    async fn route(&self, ctx: &RotationContext, request: RotationRequest) -> RotationResult<()> {
        match request {
            RotationRequest::MySql(params) => self.mysql.rotate(ctx, params).await,
            RotationRequest::Postgres(params) => self.postgres.rotate(ctx, params).await,
        }
    }
}

/// Tag for logging; `-` when there is no string tag
fn tag_of(payload: &serde_json::Value) -> String {
    payload
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("-")
        .to_owned()
}
