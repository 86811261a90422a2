//! Defensive parsing of suggestion service responses.
//!
//! The service replies with free-form text that usually, but not always,
//! contains a JSON object with `query` and `explanation` fields. Parsing
//! degrades gracefully: JSON first, then a JSON-looking substring, then a
//! best-effort SQL statement, and finally the raw text as explanation only.

use regex::Regex;
use serde::Deserialize;

/// A query suggestion for the chat front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested SQL; empty when the service produced none
    pub query: String,
    /// Human-readable explanation of the suggestion or failure
    pub explanation: String,
}

impl Suggestion {
    /// An explanation-only suggestion, used for every degraded path.
    pub fn degraded(explanation: impl Into<String>) -> Self {
        Suggestion {
            query: String::new(),
            explanation: explanation.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawSuggestion {
    #[serde(default, alias = "sql")]
    query: Option<String>,
    #[serde(default, alias = "answer")]
    explanation: Option<String>,
}

/// Recovers a [`Suggestion`] from free-form service output. Never fails.
pub fn parse_suggestion(text: &str) -> Suggestion {
    if let Some(suggestion) = parse_json(text) {
        return suggestion;
    }
    // The JSON may be wrapped in prose or a markdown fence
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Some(suggestion) = parse_json(&text[start..=end]) {
                return suggestion;
            }
        }
    }
    if let Some(query) = extract_sql(text) {
        let explanation = text.replacen(&query, "", 1).trim().to_owned();
        return Suggestion { query, explanation };
    }
    Suggestion::degraded(text.trim())
}

/// Parses one candidate JSON object into a suggestion.
fn parse_json(text: &str) -> Option<Suggestion> {
    let raw: RawSuggestion = serde_json::from_str(text.trim()).ok()?;
    let query = raw.query.unwrap_or_default().trim().to_owned();
    let explanation = raw.explanation.unwrap_or_default().trim().to_owned();
    // An object without either field is not a suggestion
    if query.is_empty() && explanation.is_empty() {
        return None;
    }
    Some(Suggestion { query, explanation })
}

/// Pulls the first SQL-looking statement out of prose.
fn extract_sql(text: &str) -> Option<String> {
    let pattern = Regex::new(r"(?is)\b(?:select|with)\b.*?(?:;|\z)").expect("Hardcode regex pattern");
    pattern
        .find(text)
        .map(|statement| statement.as_str().trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_json_parses() {
        let suggestion = parse_suggestion(
            "{\"query\": \"SELECT * FROM \\\"people\\\"\", \"explanation\": \"Lists everyone.\"}",
        );
        assert_eq!(suggestion.query, "SELECT * FROM \"people\"");
        assert_eq!(suggestion.explanation, "Lists everyone.");
    }

    #[test]
    fn json_inside_prose_is_extracted() {
        let suggestion = parse_suggestion(
            "Here you go:\n```json\n{\"query\": \"SELECT 1\", \"explanation\": \"A test.\"}\n```\nEnjoy!",
        );
        assert_eq!(suggestion.query, "SELECT 1");
        assert_eq!(suggestion.explanation, "A test.");
    }

    #[test]
    fn sql_alias_field_is_accepted() {
        let suggestion = parse_suggestion("{\"sql\": \"SELECT 2\"}");
        assert_eq!(suggestion.query, "SELECT 2");
        assert_eq!(suggestion.explanation, "");
    }

    #[test]
    fn bare_sql_statement_is_extracted() {
        let suggestion =
            parse_suggestion("Try this: SELECT \"Name\" FROM \"people\" WHERE \"Age\" > 28;");
        assert_eq!(suggestion.query, "SELECT \"Name\" FROM \"people\" WHERE \"Age\" > 28;");
        assert_eq!(suggestion.explanation, "Try this:");
    }

    #[test]
    fn sql_without_terminator_runs_to_the_end() {
        let suggestion = parse_suggestion("with t as (select 1) select * from t");
        assert_eq!(suggestion.query, "with t as (select 1) select * from t");
    }

    #[test]
    fn plain_prose_degrades_to_explanation_only() {
        let suggestion = parse_suggestion("I could not find a matching table.");
        assert_eq!(suggestion.query, "");
        assert_eq!(suggestion.explanation, "I could not find a matching table.");
    }

    #[test]
    fn empty_response_degrades_to_empty_suggestion() {
        let suggestion = parse_suggestion("   ");
        assert_eq!(suggestion, Suggestion::degraded(""));
    }

    #[test]
    fn json_without_known_fields_falls_through() {
        let suggestion = parse_suggestion("{\"unrelated\": true} SELECT 3;");
        assert_eq!(suggestion.query, "SELECT 3;");
    }
}
