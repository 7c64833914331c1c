//! Lead store
//!
//! Turns the raw sheet grid into `Lead` records. Row 0 is the header.

use crate::errors::{AppError, Result};
use crate::metrics;
use crate::models::Lead;
use crate::sheets::SheetSource;
use std::sync::Arc;
use tracing::instrument;

/// Stable message surfaced when the sheet cannot be read
pub const SHEET_READ_FAILED: &str = "Failed to read Google Sheet";

/// Reads and filters leads from a sheet source
#[derive(Clone)]
pub struct LeadStore {
    source: Arc<dyn SheetSource>,
}

impl LeadStore {
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Self { source }
    }

    /// Fetch every complete lead, in sheet order.
    ///
    /// Any collaborator failure is logged with its cause and surfaced as
    /// [`AppError::SourceUnavailable`].
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Lead>> {
        let rows = match self.source.read_rows().await {
            Ok(rows) => {
                metrics::record_sheet_read(true);
                rows
            }
            Err(e) => {
                metrics::record_sheet_read(false);
                tracing::error!(error = %e, "Error reading Google Sheet");
                return Err(AppError::SourceUnavailable {
                    message: SHEET_READ_FAILED.to_string(),
                });
            }
        };

        if rows.is_empty() {
            tracing::info!("No data found in the sheet");
            return Ok(Vec::new());
        }

        let leads: Vec<Lead> = rows
            .iter()
            .skip(1)
            .map(|row| Lead::from_row(row))
            .filter(Lead::is_complete)
            .collect();

        tracing::debug!(rows = rows.len() - 1, leads = leads.len(), "Leads loaded");
        Ok(leads)
    }
}
