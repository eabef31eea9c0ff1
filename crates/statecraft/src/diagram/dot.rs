//! Graphviz DOT renderer

use super::{DiagramConfig, DiagramDescription};
use crate::core::Renderer;
use anyhow::Result;
use std::fmt::Write;

const START_NODE: &str = "__start";

/// Renders a diagram description as Graphviz DOT source
#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    config: DiagramConfig,
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagramConfig) -> Self {
        Self { config }
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }

    pub fn render(&self, diagram: &DiagramDescription) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "digraph automaton {{")?;
        writeln!(out, "    rankdir={};", self.config.direction.code())?;
        writeln!(out, "    node [shape=circle];")?;

        let start = diagram.start_node().filter(|_| self.config.show_start_arrow);
        if start.is_some() {
            writeln!(out, "    {} [shape=point, style=invis];", START_NODE)?;
        }

        for node in &diagram.nodes {
            if node.is_accepting {
                writeln!(
                    out,
                    "    {} [label=\"{}\", shape=doublecircle];",
                    node.id,
                    Self::escape(&node.label)
                )?;
            } else {
                writeln!(out, "    {} [label=\"{}\"];", node.id, Self::escape(&node.label))?;
            }
        }

        if let Some(start) = start {
            writeln!(out, "    {} -> {};", START_NODE, start.id)?;
        }
        for edge in &diagram.edges {
            writeln!(
                out,
                "    {} -> {} [label=\"{}\"];",
                edge.from,
                edge.to,
                Self::escape(&edge.label)
            )?;
        }

        writeln!(out, "}}")?;
        Ok(out)
    }
}

impl Renderer<DiagramDescription> for DotRenderer {
    type Output = String;

    fn render(&self, diagram: &DiagramDescription) -> Result<Self::Output> {
        self.render(diagram)
    }

    fn name(&self) -> &'static str {
        "dot"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}
