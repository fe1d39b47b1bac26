//! `rotator rotate`

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use rotator_core::{RotationContext, RotationResponse};
use rotator_engine::Dispatcher;
use tokio_util::sync::CancellationToken;

use super::EXIT_ROTATION_FAILED;
use crate::cli::RotateArgs;
use crate::config::Settings;

pub async fn run(args: RotateArgs, settings: &Settings) -> Result<ExitCode> {
    let raw = read_payload(args.payload.as_deref())?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("request payload is not valid JSON")?;

    let cancellation = CancellationToken::new();
    let ctrl_c = tokio::spawn(cancel_on_ctrl_c(cancellation.clone()));

    let ctx = RotationContext::new()
        .with_timeout(settings.timeout())
        .with_cancellation(cancellation);
    let result = Dispatcher::new().dispatch(&ctx, &payload).await;
    ctrl_c.abort();

    let response = RotationResponse::from_result(&result);
    println!(
        "{}",
        serde_json::to_string(&response).context("failed to encode response")?
    );

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_ROTATION_FAILED)
    })
}

/// Payload from `path`, or stdin for `None` and `-`
fn read_payload(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read payload from stdin")?;
            Ok(raw)
        }
    }
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("interrupted, cancelling rotation");
        token.cancel();
    }
}
