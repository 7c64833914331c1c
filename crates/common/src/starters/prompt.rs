//! Prompt and fallback templates

use crate::models::{ConversationStarter, Lead, NewsArticle, Tone};

/// System turn for every generation call
pub const SYSTEM_PROMPT: &str = "You are a business development expert who creates personalized \
conversation starters based on recent news and professional context.";

/// Render articles as a bullet list, one per line
pub fn article_lines(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .map(|a| format!("- {} ({})", a.title, a.pub_date))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user prompt for a lead and its articles
pub fn build_prompt(lead: &Lead, articles: &[NewsArticle]) -> String {
    format!(
        r#"You are a business development professional looking to start a conversation with {name}, {role} at {org}.

Recent news about {name} or {org}:
{articles}

Based on this information, generate 3 conversation starters that are:
1. Professional and respectful
2. Relevant to recent news or their role
3. Open-ended to encourage response
4. Personalized to their specific situation

For each conversation starter, provide:
- The actual message text
- Brief context explaining why this topic is relevant
- The tone (professional, casual, or enthusiastic)

Format your response as JSON with this structure:
{{
  "starters": [
    {{
      "text": "the conversation starter message",
      "context": "why this topic is relevant",
      "tone": "professional"
    }}
  ]
}}

Keep each message under 150 words and make them genuinely helpful and engaging."#,
        name = lead.name,
        role = lead.role,
        org = lead.org,
        articles = article_lines(articles),
    )
}

/// Template starters used whenever the model path fails
pub fn fallback_starters(lead: &Lead) -> Vec<ConversationStarter> {
    vec![
        ConversationStarter {
            id: format!("{}-fallback-1", lead.name),
            text: format!(
                "Hi {}, I noticed you're {} at {}. I'd love to learn more about your current \
                 initiatives and see if there might be opportunities for collaboration. Would you \
                 be open to a brief conversation?",
                lead.name, lead.role, lead.org
            ),
            context: "Generic professional outreach based on role and company".to_string(),
            tone: Tone::Professional,
        },
        ConversationStarter {
            id: format!("{}-fallback-2", lead.name),
            text: format!(
                "Hello {}, I've been following {}'s work and would appreciate the chance to \
                 discuss potential synergies. Your role in {} seems particularly relevant to \
                 what we're working on.",
                lead.name, lead.org, lead.role
            ),
            context: "Company-focused outreach with role relevance".to_string(),
            tone: Tone::Professional,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead() -> Lead {
        Lead {
            name: "Jane Doe".into(),
            org: "Acme".into(),
            role: "CMO".into(),
            linkedin: String::new(),
        }
    }

    #[test]
    fn test_article_lines() {
        let articles = vec![
            NewsArticle {
                title: "Acme raises $10M".into(),
                link: "l1".into(),
                pub_date: "Mon, 06 May 2024".into(),
                content: String::new(),
                source: String::new(),
            },
            NewsArticle {
                title: "Jane Doe joins Acme".into(),
                link: "l2".into(),
                pub_date: String::new(),
                content: String::new(),
                source: String::new(),
            },
        ];
        assert_eq!(
            article_lines(&articles),
            "- Acme raises $10M (Mon, 06 May 2024)\n- Jane Doe joins Acme ()"
        );
    }

    #[test]
    fn test_prompt_embeds_lead_and_contract() {
        let prompt = build_prompt(&lead(), &[]);
        assert!(prompt.contains("Jane Doe, CMO at Acme"));
        assert!(prompt.contains("Recent news about Jane Doe or Acme:"));
        assert!(prompt.contains("generate 3 conversation starters"));
        assert!(prompt.contains("\"starters\": ["));
        assert!(prompt.contains("under 150 words"));
    }

    #[test]
    fn test_fallback_shape() {
        let starters = fallback_starters(&lead());
        assert_eq!(starters.len(), 2);
        assert_eq!(starters[0].id, "Jane Doe-fallback-1");
        assert_eq!(starters[1].id, "Jane Doe-fallback-2");
        assert!(starters.iter().all(|s| s.tone == Tone::Professional));
        assert!(starters[0].text.contains("you're CMO at Acme"));
        assert!(starters[1].text.contains("following Acme's work"));
    }
}
