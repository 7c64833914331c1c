//! Conversation starter generation handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::instrument;
use validator::{Validate, ValidationError};

use crate::AppState;
use leadspark_common::{
    errors::{AppError, Result},
    OutreachBundle,
};

/// Generate request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Full or partial lead name
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub lead_name: String,
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Resolve a lead and return its news and conversation starters
#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<OutreachBundle>> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|e| AppError::Validation {
        message: e.body_text(),
        field: None,
    })?;

    request.validate().map_err(|_| AppError::MissingField {
        field: "Lead name".to_string(),
    })?;

    let bundle = state.outreach.generate_for(&request.lead_name).await?;

    tracing::info!(
        lead = %bundle.lead.name,
        articles = bundle.articles.len(),
        starters = bundle.conversation_starters.len(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Generation completed"
    );

    Ok(Json(bundle))
}
