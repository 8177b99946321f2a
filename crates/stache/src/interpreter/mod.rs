//! Mustache renderer.
//!
//! This module provides the rendering engine that takes parsed templates and
//! data and produces output text. It resolves keys through a scope stack,
//! iterates sections, expands partials and lambdas, and escapes HTML.

mod context;
mod error;
mod renderer;

pub use context::Context;
pub use error::RenderError;
pub use renderer::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_NESTING, Renderer, SectionRenderer, escape_html, render,
    render_with_partials,
};
