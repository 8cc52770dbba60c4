use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct CopyTextRequest<'a> {
    pub text: &'a str,
}

/// Body of the JSON form of `/app/paste/latest`.
#[derive(Debug, Deserialize)]
pub(crate) struct LatestMetadata {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl LatestMetadata {
    pub fn is_text(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("text"))
    }

    pub fn text(&self) -> Option<String> {
        match self.content.as_ref()? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Accepts epoch milliseconds or an RFC 3339 string; anything else is ignored.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.timestamp.as_ref()? {
            Value::Number(n) => n.as_i64().and_then(from_millis),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| s.parse::<i64>().ok().and_then(from_millis)),
            _ => None,
        }
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LatestMetadata {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_entry_with_millis_timestamp() {
        let meta = parse(r#"{"type":"text","content":"hi","timestamp":1700000000000}"#);
        assert!(meta.is_text());
        assert_eq!(meta.text().as_deref(), Some("hi"));
        assert_eq!(meta.timestamp().unwrap().timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn rfc3339_and_missing_fields() {
        let meta = parse(r#"{"type":"file","timestamp":"2024-05-01T10:00:00Z"}"#);
        assert!(!meta.is_text());
        assert!(meta.text().is_none());
        assert!(meta.timestamp().is_some());

        let empty = parse("{}");
        assert!(empty.kind.is_none());
        assert!(empty.timestamp().is_none());
    }

    #[test]
    fn garbage_timestamp_is_ignored() {
        let meta = parse(r#"{"type":"text","content":"x","timestamp":"yesterday"}"#);
        assert!(meta.timestamp().is_none());
    }
}
