//! Outreach orchestration
//!
//! Resolve a lead by name, gather its news, generate starters. Only the
//! lead lookup can fail the request; news and model problems degrade the
//! result instead.

use crate::errors::{AppError, Result};
use crate::leads::LeadStore;
use crate::models::{ConversationStarter, Lead, NewsArticle};
use crate::news::NewsAggregator;
use crate::starters::StarterGenerator;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Everything gathered for one lead
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachBundle {
    pub lead: Lead,
    pub articles: Vec<NewsArticle>,
    pub conversation_starters: Vec<ConversationStarter>,
}

/// First lead, in storage order, whose name matches `query` in either direction.
///
/// Ambiguous queries resolve to the earliest row.
pub fn find_lead<'a>(leads: &'a [Lead], query: &str) -> Option<&'a Lead> {
    leads.iter().find(|lead| lead.matches_name(query))
}

/// Pipeline over the three collaborators
#[derive(Clone)]
pub struct OutreachService {
    leads: LeadStore,
    news: NewsAggregator,
    starters: StarterGenerator,
}

impl OutreachService {
    pub fn new(leads: LeadStore, news: NewsAggregator, starters: StarterGenerator) -> Self {
        Self { leads, news, starters }
    }

    /// All leads as stored
    pub async fn list_leads(&self) -> Result<Vec<Lead>> {
        self.leads.get_all().await
    }

    /// Resolve `lead_name` and build its outreach bundle
    #[instrument(skip(self))]
    pub async fn generate_for(&self, lead_name: &str) -> Result<OutreachBundle> {
        let query = lead_name.trim();
        if query.is_empty() {
            return Err(AppError::MissingField {
                field: "Lead name".to_string(),
            });
        }

        let leads = self.leads.get_all().await?;
        let lead = find_lead(&leads, query)
            .cloned()
            .ok_or_else(|| AppError::LeadNotFound {
                name: lead_name.to_string(),
            })?;

        tracing::info!(query = %query, lead = %lead.name, "Lead resolved");

        let articles = self.news.for_lead(&lead.name, &lead.org).await;
        let conversation_starters = self.starters.generate(&lead, &articles).await;

        Ok(OutreachBundle {
            lead,
            articles,
            conversation_starters,
        })
    }
}
