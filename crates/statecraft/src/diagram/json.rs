//! JSON renderer

use super::DiagramDescription;
use crate::core::Renderer;
use anyhow::{Context, Result};

/// Serializes a diagram description with `serde_json`
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn render(&self, diagram: &DiagramDescription) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(diagram)
        } else {
            serde_json::to_string(diagram)
        };
        json.context("Failed to serialize diagram description")
    }
}

impl Renderer<DiagramDescription> for JsonRenderer {
    type Output = String;

    fn render(&self, diagram: &DiagramDescription) -> Result<Self::Output> {
        self.render(diagram)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}
