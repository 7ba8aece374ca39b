use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("missing required field `url`")]
    MissingLocation,
}

/// Body of a scrape call. The wire field is `url`; `location` is accepted as
/// an alias. The field may be absent on the wire so that its absence is
/// reported as a [`RequestError`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(rename = "url", alias = "location", default)]
    pub location: Option<String>,
}

impl ScrapeRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
        }
    }

    /// The trimmed target location, if one was supplied.
    pub fn location(&self) -> Result<&str, RequestError> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .ok_or(RequestError::MissingLocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_url_and_location_field_names() {
        let a: ScrapeRequest = serde_json::from_str(r#"{"url":"https://a.example"}"#).unwrap();
        let b: ScrapeRequest =
            serde_json::from_str(r#"{"location":"https://a.example"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.location(), Ok("https://a.example"));
    }

    #[test]
    fn missing_blank_and_absent_locations_are_rejected() {
        let absent: ScrapeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.location(), Err(RequestError::MissingLocation));
        assert_eq!(
            ScrapeRequest::new("").location(),
            Err(RequestError::MissingLocation)
        );
        assert_eq!(
            ScrapeRequest::new("  \t").location(),
            Err(RequestError::MissingLocation)
        );
    }

    #[test]
    fn serializes_with_url_field() {
        let json = serde_json::to_string(&ScrapeRequest::new("https://a.example")).unwrap();
        assert_eq!(json, r#"{"url":"https://a.example"}"#);
    }
}
