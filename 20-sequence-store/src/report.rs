use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{Format, Runtime};

/// Store contents observed around the bulk replace.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub runtime: Runtime,
    pub workers: usize,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl Report {
    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Text => Ok(self.to_string()),
            Format::Json => {
                serde_json::to_string_pretty(self).context("failed to serialize report")
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Before Replace: {:?}", self.before)?;
        write!(f, "After Replace: {:?}", self.after)
    }
}
