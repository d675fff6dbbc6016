use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a piped pipeline config from stdin.
///
/// YAML is a superset of JSON, so either is accepted. Returns `None` when
/// stdin is a terminal or the pipe is empty.
pub fn read_stdin_config<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }

    let config: T = serde_yaml::from_str(&buffer)
        .map_err(|e| format!("Failed to parse config from stdin: {}", e))?;
    Ok(Some(config))
}
