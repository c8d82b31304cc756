use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialize a document piped on stdin.
///
/// `None` when stdin is a terminal or the pipe is empty, so callers can fall
/// back to flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

/// JSON first; anything else is tried as YAML, matching `--input` files.
fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(json_err) => serde_yaml::from_str(trimmed)
            .map_err(|_| format!("Failed to parse stdin as JSON or YAML: {json_err}"))?,
    };
    tracing::debug!(bytes = trimmed.len(), "parsed piped input");
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_blank_pipe_is_none() {
        assert!(parse_piped::<Value>("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let from_json: Value = parse_piped(r#"{"term_months": 60}"#).unwrap().unwrap();
        let from_yaml: Value = parse_piped("term_months: 60\n").unwrap().unwrap();
        assert_eq!(from_json, json!({"term_months": 60}));
        assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn test_unparseable_pipe_is_an_error() {
        assert!(parse_piped::<Vec<u32>>("{ not: [valid").is_err());
    }
}
