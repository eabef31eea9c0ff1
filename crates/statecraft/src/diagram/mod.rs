//! Diagram descriptions and the text renderers that consume them
//!
//! A [`DiagramDescription`] is a renderer-agnostic node/edge view of an
//! automaton. Renderers turn it into Graphviz DOT, Mermaid
//! `stateDiagram-v2` text or JSON.

mod config;
mod description;
mod dot;
mod json;
mod mermaid;

pub use config::{DiagramConfig, Direction};
pub use description::{DiagramDescription, DiagramEdge, DiagramNode, ToDiagram};
pub use dot::DotRenderer;
pub use json::JsonRenderer;
pub use mermaid::MermaidRenderer;
