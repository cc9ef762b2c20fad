//! Parsing of the multipart submission form into a [`TaskSpec`].

use std::time::Duration;

use axum::extract::Multipart;
use cadence_core::error::{CadenceError, Result};
use cadence_scheduler::TaskSpec;

/// Raw form fields as received.
#[derive(Debug, Default)]
pub struct Submission {
    pub tokens: Option<Vec<u8>>,
    pub comments: Option<Vec<u8>>,
    pub post_id: Option<String>,
    pub prefix: Option<String>,
    pub interval: Option<String>,
}

impl Submission {
    /// Drain every field of a multipart request. Unknown fields are ignored.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| CadenceError::invalid_input(format!("malformed form: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| CadenceError::invalid_input(format!("failed to read field '{name}': {e}")))?;
            match name.as_str() {
                "tokens" => form.tokens = Some(data.to_vec()),
                "comments" => form.comments = Some(data.to_vec()),
                "post_id" => form.post_id = Some(String::from_utf8_lossy(&data).into_owned()),
                "prefix" => form.prefix = Some(String::from_utf8_lossy(&data).into_owned()),
                "interval" => form.interval = Some(String::from_utf8_lossy(&data).into_owned()),
                other => tracing::debug!("Ignoring unknown form field '{}'", other),
            }
        }
        Ok(form)
    }

    /// Validate required fields and build the task spec.
    pub fn into_spec(self, default_interval_secs: u64) -> Result<TaskSpec> {
        let tokens = self.tokens.ok_or_else(|| CadenceError::invalid_input("missing field 'tokens'"))?;
        let comments = self
            .comments
            .ok_or_else(|| CadenceError::invalid_input("missing field 'comments'"))?;
        let post_id = self
            .post_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CadenceError::invalid_input("missing field 'post_id'"))?;
        let interval = parse_interval(self.interval.as_deref(), default_interval_secs)?;

        let spec = TaskSpec::new(parse_lines(&tokens), parse_lines(&comments), &post_id)
            .with_prefix(self.prefix.as_deref().unwrap_or(""))
            .with_interval(Duration::from_secs(interval));
        spec.validate()?;
        Ok(spec)
    }
}

/// Split an uploaded file into trimmed, non-blank lines.
pub fn parse_lines(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// Seconds between ticks; blank or absent means `default`.
pub fn parse_interval(raw: Option<&str>, default: u64) -> Result<u64> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse::<u64>()
            .map_err(|_| CadenceError::invalid_input(format!("interval must be a non-negative integer, got '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Submission {
        Submission {
            tokens: Some(b"c1\r\nc2\n\n".to_vec()),
            comments: Some(b"  hi \nyo".to_vec()),
            post_id: Some("P1".into()),
            prefix: Some("[bot]".into()),
            interval: Some("0".into()),
        }
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_lines(b"\n a \r\nb\r\n\r\n c"), vec!["a", "b", "c"]);
        assert!(parse_lines(b" \n\n").is_empty());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval(None, 10).unwrap(), 10);
        assert_eq!(parse_interval(Some(" "), 10).unwrap(), 10);
        assert_eq!(parse_interval(Some("0"), 10).unwrap(), 0);
        assert_eq!(parse_interval(Some("45"), 10).unwrap(), 45);
        assert!(parse_interval(Some("-1"), 10).is_err());
        assert!(parse_interval(Some("ten"), 10).is_err());
    }

    #[test]
    fn test_into_spec() {
        let spec = full().into_spec(10).unwrap();
        assert_eq!(spec.credentials, vec!["c1", "c2"]);
        assert_eq!(spec.messages, vec!["hi", "yo"]);
        assert_eq!(spec.target_id, "P1");
        assert_eq!(spec.prefix, "[bot]");
        assert_eq!(spec.interval, Duration::ZERO);
    }

    #[test]
    fn test_into_spec_defaults() {
        let mut form = full();
        form.prefix = None;
        form.interval = None;
        let spec = form.into_spec(10).unwrap();
        assert_eq!(spec.prefix, "");
        assert_eq!(spec.interval, Duration::from_secs(10));
    }

    #[test]
    fn test_into_spec_missing_fields() {
        let mut form = full();
        form.post_id = Some("   ".into());
        assert!(matches!(form.into_spec(10), Err(CadenceError::InvalidInput(_))));

        let mut form = full();
        form.tokens = None;
        assert!(matches!(form.into_spec(10), Err(CadenceError::InvalidInput(_))));

        let mut form = full();
        form.comments = Some(b"\n\n".to_vec());
        assert!(matches!(form.into_spec(10), Err(CadenceError::InvalidInput(_))));
    }
}
