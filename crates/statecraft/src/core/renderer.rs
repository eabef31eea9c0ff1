//! Core renderer trait for diagram output
//!
//! This trait defines the interface for turning a renderer-agnostic
//! description into a concrete output format (DOT, Mermaid, JSON, ...).

use anyhow::Result;

/// Core trait for renderers
///
/// # Example
/// ```
/// use statecraft::core::Renderer;
/// use statecraft::diagram::{DiagramDescription, DotRenderer};
///
/// let renderer = DotRenderer::new();
/// let output = renderer.render(&DiagramDescription::default()).unwrap();
/// assert!(output.starts_with("digraph"));
/// ```
pub trait Renderer<D>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the input into the output format
    fn render(&self, input: &D) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
