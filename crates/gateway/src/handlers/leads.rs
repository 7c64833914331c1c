//! Lead listing handler

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;

use crate::AppState;
use leadspark_common::{errors::Result, models::Lead};

#[derive(Debug, Serialize)]
pub struct LeadsResponse {
    pub leads: Vec<Lead>,
}

/// List every lead in the sheet
#[instrument(skip(state))]
pub async fn list_leads(State(state): State<AppState>) -> Result<Json<LeadsResponse>> {
    let leads = state.outreach.list_leads().await?;

    tracing::info!(count = leads.len(), "Leads listed");

    Ok(Json(LeadsResponse { leads }))
}
