//! CLI command implementations.

mod check;
mod render;
mod spec;

pub use check::{run_check, CheckArgs};
pub use render::{run_render, RenderArgs};
pub use spec::{run_spec, SpecArgs};
