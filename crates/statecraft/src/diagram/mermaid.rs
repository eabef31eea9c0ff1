//! Mermaid `stateDiagram-v2` renderer
//!
//! Emits `state "label" as sN` declarations so composite labels such as
//! `{q0,q1}` survive Mermaid's identifier rules.

use super::{DiagramConfig, DiagramDescription};
use crate::core::Renderer;
use anyhow::Result;
use std::fmt::Write;

/// Renders a diagram description as Mermaid state diagram text
#[derive(Debug, Clone, Default)]
pub struct MermaidRenderer {
    config: DiagramConfig,
}

impl MermaidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagramConfig) -> Self {
        Self { config }
    }

    /// Mermaid has no string escapes; use its entity codes instead
    fn escape(text: &str) -> String {
        text.replace('"', "#quot;").replace(':', "#58;")
    }

    pub fn render(&self, diagram: &DiagramDescription) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "stateDiagram-v2")?;
        writeln!(out, "    direction {}", self.config.direction.code())?;

        for node in &diagram.nodes {
            writeln!(out, "    state \"{}\" as {}", Self::escape(&node.label), node.id)?;
        }

        if self.config.show_start_arrow {
            if let Some(start) = diagram.start_node() {
                writeln!(out, "    [*] --> {}", start.id)?;
            }
        }
        for edge in &diagram.edges {
            writeln!(
                out,
                "    {} --> {} : {}",
                edge.from,
                edge.to,
                Self::escape(&edge.label)
            )?;
        }
        for node in diagram.nodes.iter().filter(|n| n.is_accepting) {
            writeln!(out, "    {} --> [*]", node.id)?;
        }

        Ok(out)
    }
}

impl Renderer<DiagramDescription> for MermaidRenderer {
    type Output = String;

    fn render(&self, diagram: &DiagramDescription) -> Result<Self::Output> {
        self.render(diagram)
    }

    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "mermaid"
    }
}
