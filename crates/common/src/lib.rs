//! LeadSpark Common Library
//!
//! Shared code for the LeadSpark services including:
//! - Domain records (leads, articles, conversation starters)
//! - Collaborator clients (Google Sheets, Google News RSS, chat models)
//! - The lead → news → starters pipeline
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod leads;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod news;
pub mod outreach;
pub mod sheets;
pub mod starters;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use leads::LeadStore;
pub use llm::ChatModel;
pub use news::{NewsAggregator, NewsSource};
pub use outreach::{OutreachBundle, OutreachService};
pub use sheets::SheetSource;
pub use starters::StarterGenerator;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
