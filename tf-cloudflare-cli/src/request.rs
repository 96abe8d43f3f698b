//! JSON request documents

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Input of one invocation.
///
/// ```json
/// {
///   "provider": { "api_token": "..." },
///   "config": { "zone_id": "..." },
///   "state": { "id": "..." }
/// }
/// ```
///
/// Every member is optional; which ones matter depends on the command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    #[serde(default)]
    pub provider: Value,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub state: Value,
}

impl Request {
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text).context("request is not a valid JSON document")
    }

    /// Read from `path`, or stdin when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let text = match path {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request file {}", path.display()))?,
            None => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("failed to read request from stdin")?;
                text
            }
        };
        Self::parse(&text)
    }
}
