//! A Mustache template engine.
//!
//! Templates are parsed into a [`Template`] tree and rendered against
//! [`Value`] data. Partials are supplied by the caller as a map from name to
//! template source; the engine never touches the file system.
//!
//! ```
//! use stache::{data, render};
//!
//! let data = data! { "name" => "Chris", "items" => vec!["a", "b"] };
//! let output = render("Hello {{name}}:{{#items}} {{.}}{{/items}}", &data).unwrap();
//! assert_eq!(output, "Hello Chris: a b");
//! ```

pub mod interpreter;
pub mod parser;
pub mod types;

pub use interpreter::{
    Context, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NESTING, RenderError, Renderer, SectionRenderer,
    render, render_with_partials,
};
pub use parser::{Delimiters, Node, ParseError, ParseErrorKind, Template, parse_template};
pub use types::{Lambda, Value};

/// Creates a [`Value::Map`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so integers, floats, strings,
/// vectors, lambdas and nested `data!` maps can be passed directly.
///
/// # Example
///
/// ```
/// use stache::{data, Value};
///
/// let d = data! { "count" => 3, "name" => "Alice" };
/// assert_eq!(d.get("count"), Some(&Value::Integer(3)));
/// assert_eq!(d.get("name").and_then(Value::as_str), Some("Alice"));
/// ```
#[macro_export]
macro_rules! data {
    {} => {
        $crate::Value::Map(::std::collections::HashMap::new())
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, $crate::Value>::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            $crate::Value::Map(map)
        }
    };
}
