//! Request-scoped domain records
//!
//! Nothing here is persisted. Every value is rebuilt from the collaborators on
//! each request and serialized straight into the response body.

use serde::{Deserialize, Serialize};

/// Source name used when a feed item does not carry one
pub const DEFAULT_NEWS_SOURCE: &str = "Google News";

/// A prospective business contact read from the lead sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub name: String,
    pub org: String,
    pub role: String,
    /// Profile URL, empty when the sheet has none
    pub linkedin: String,
}

impl Lead {
    /// Map a sheet row positionally: name, org, role, linkedin.
    /// Missing cells become empty strings.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        Self {
            name: cell(0),
            org: cell(1),
            role: cell(2),
            linkedin: cell(3),
        }
    }

    /// Rows without a name or organization are not usable leads
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.org.is_empty()
    }

    /// Case-insensitive match in either direction, so partial names
    /// ("Jane") and suffixed names ("Jane Smith Jr") both resolve.
    pub fn matches_name(&self, query: &str) -> bool {
        let name = self.name.to_lowercase();
        let query = query.to_lowercase();
        name.contains(&query) || query.contains(&name)
    }
}

/// A news item returned by the feed search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub link: String,
    /// Publication date exactly as the feed provided it
    pub pub_date: String,
    /// Plain-text snippet
    pub content: String,
    pub source: String,
}

impl NewsArticle {
    /// Syndicated reposts share a headline, redirects share a link;
    /// either is enough to treat two items as the same story.
    pub fn is_duplicate_of(&self, other: &NewsArticle) -> bool {
        self.title == other.title || self.link == other.link
    }
}

/// Tone tag attached to a conversation starter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Enthusiastic,
}

impl Tone {
    /// Coerce free-form model output into a known tone
    pub fn coerce(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("casual") => Tone::Casual,
            Some("enthusiastic") => Tone::Enthusiastic,
            _ => Tone::Professional,
        }
    }
}

/// A generated outreach message with its rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStarter {
    pub id: String,
    pub text: String,
    pub context: String,
    pub tone: Tone,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_lead_from_short_row() {
        let lead = Lead::from_row(&row(&["Jane Doe", "Acme"]));
        assert_eq!(lead.name, "Jane Doe");
        assert_eq!(lead.org, "Acme");
        assert_eq!(lead.role, "");
        assert_eq!(lead.linkedin, "");
        assert!(lead.is_complete());
    }

    #[test]
    fn test_lead_completeness_is_raw() {
        assert!(!Lead::from_row(&row(&["", "Acme"])).is_complete());
        assert!(!Lead::from_row(&row(&["Jane"])).is_complete());
        // Whitespace is kept as-is
        assert!(Lead::from_row(&row(&[" ", "Acme"])).is_complete());
    }

    #[test]
    fn test_name_matching() {
        let lead = Lead::from_row(&row(&["Jane Smith", "Acme"]));
        assert!(lead.matches_name("Jane"));
        assert!(lead.matches_name("jane smith jr"));
        assert!(lead.matches_name("SMITH"));
        assert!(!lead.matches_name("John"));
    }

    #[test]
    fn test_tone_coercion() {
        assert_eq!(Tone::coerce(Some("casual")), Tone::Casual);
        assert_eq!(Tone::coerce(Some("Enthusiastic")), Tone::Enthusiastic);
        assert_eq!(Tone::coerce(Some("sarcastic")), Tone::Professional);
        assert_eq!(Tone::coerce(None), Tone::Professional);
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let article = NewsArticle {
            title: "t".into(),
            link: "l".into(),
            pub_date: "Mon, 01 Jan 2024".into(),
            content: String::new(),
            source: DEFAULT_NEWS_SOURCE.into(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["pubDate"], "Mon, 01 Jan 2024");
        assert_eq!(json["source"], "Google News");
    }

    #[test]
    fn test_duplicate_rule_is_either_field() {
        let a = NewsArticle {
            title: "X".into(),
            link: "L1".into(),
            pub_date: String::new(),
            content: String::new(),
            source: String::new(),
        };
        let mut b = a.clone();
        b.link = "L2".into();
        assert!(b.is_duplicate_of(&a));
        b.title = "Y".into();
        assert!(!b.is_duplicate_of(&a));
        b.link = "L1".into();
        assert!(b.is_duplicate_of(&a));
    }
}
