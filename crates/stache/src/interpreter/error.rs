//! Error types for the renderer.

use thiserror::Error;

use crate::parser::ParseError;

/// An error that occurred while rendering.
///
/// Missing or falsy data is never an error; lookups that find nothing render
/// as empty text. Errors come only from text that has to be parsed while
/// rendering and from runaway expansion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A template, partial or lambda result failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Partial or lambda expansion nested deeper than the configured limit,
    /// usually because a partial includes itself.
    #[error("maximum expansion depth {depth} exceeded while expanding '{name}'")]
    MaxDepthExceeded { name: String, depth: usize },

    /// Too many sections and expansions were open at once. Sections nested
    /// inside a self-including partial end here before the stack runs out.
    #[error("maximum render nesting {limit} exceeded at section '{key}'")]
    NestingTooDeep { key: String, limit: usize },
}
