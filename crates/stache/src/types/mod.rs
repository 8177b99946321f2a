mod lambda;
mod value;

pub use lambda::{Lambda, RenderFn, SectionFn, ValueFn};
pub use value::Value;
