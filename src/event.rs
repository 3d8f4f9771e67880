use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use crate::config::ConfigError;

#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestField>,
}

#[derive(Deserialize)]
struct PullRequestField {
    number: Option<NumberField>,
}

/// GitHub sends an integer; accept a numeric string as well.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberField {
    Int(u64),
    Text(String),
}

/// Read the triggering event file and return `pull_request.number`.
#[instrument]
pub fn read_pull_request_number(path: &Path) -> Result<u64, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let number = parse_pull_request_number(&contents)?;
    debug!(pr = number, "read pull request number from event");
    Ok(number)
}

pub fn parse_pull_request_number(json: &str) -> Result<u64, ConfigError> {
    let event: EventPayload = serde_json::from_str(json)?;
    match event.pull_request.and_then(|pr| pr.number) {
        Some(NumberField::Int(number)) => Ok(number),
        Some(NumberField::Text(text)) => text
            .trim()
            .parse()
            .map_err(|_| ConfigError::MissingPullRequestNumber),
        None => Err(ConfigError::MissingPullRequestNumber),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pull_request_number() {
        let event = r#"{"action": "labeled", "pull_request": {"number": 42, "title": "x"}}"#;
        assert_eq!(parse_pull_request_number(event).unwrap(), 42);
    }

    #[test]
    fn test_parse_numeric_string() {
        let event = r#"{"pull_request": {"number": "7"}}"#;
        assert_eq!(parse_pull_request_number(event).unwrap(), 7);
    }

    #[test]
    fn test_missing_number_is_config_error() {
        for event in [
            r#"{}"#,
            r#"{"pull_request": null}"#,
            r#"{"pull_request": {}}"#,
            r#"{"pull_request": {"number": null}}"#,
            r#"{"pull_request": {"number": "abc"}}"#,
            r#"{"issue": {"number": 3}}"#,
        ] {
            assert!(
                matches!(
                    parse_pull_request_number(event),
                    Err(ConfigError::MissingPullRequestNumber)
                ),
                "{event}"
            );
        }
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_pull_request_number("{not json"),
            Err(ConfigError::EventParse(_))
        ));
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        fs::write(&path, r#"{"pull_request": {"number": 42}}"#).unwrap();
        assert_eq!(read_pull_request_number(&path).unwrap(), 42);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_pull_request_number(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }
}
