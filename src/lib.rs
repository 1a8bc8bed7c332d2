//! Tag-based template transpilation with layout and section composition.
//!
//! # Features
//!
//! * Rewrite `{{ expr }}`, `{! expr !}` and `{% stmt %}` tags into executable code fragments.
//! * Normalize control structures before scanning (colon insertion, implicit `break`, `fallthrough`).
//! * Compose templates with `extend`/`block`/`endblock`/`yield`/`parent`.
//! * Include or fetch other templates with an isolated composition context.
//! * Register custom functions, output filters and a custom escape function.
//! * Build render data from JSON documents (optional, requires the `json` feature).
//!
//! # Examples
//!
//! The [`transpile()`][transpile] function turns template source into a blob of
//! literal text and code fragments.
//!
//! ```
//! # fn main() -> Result<(), weft::Error> {
//! assert_eq!(weft::transpile("Hello {{ name }}!")?, "Hello <?r echo escape( name ) ?>!");
//! # Ok(())
//! # }
//! ```
//!
//! The [`Engine`][Engine] resolves templates through a [`Loader`][Loader],
//! renders them and stitches layouts together. A child template overrides the
//! blocks its layout declares:
//!
//! ```
//! # fn main() -> Result<(), weft::Error> {
//! let mut loader = weft::MemoryLoader::new();
//! loader.add("layouts/app", "<main>{% block('content') %}Default{% endblock() %}</main>");
//! loader.add("home", "{% extend('layouts/app') %}{% block('content') %}Hello {{ name }}{% endblock() %}");
//!
//! let engine = weft::Engine::new(loader);
//! let mut data = weft::ValueMap::new();
//! data.insert("name".into(), "world".into());
//! assert_eq!(engine.render("home", data)?, "<main>Hello world</main>");
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub use error::Error;

mod engine;
pub use engine::{escape_html, Engine, EscapeFn, MissingFunctions, NotFound, TemplateFn};

mod eval;
pub use eval::{BasicEvaluator, Evaluator, Host};

mod filters;
pub use filters::{builtin_filters, FilterFn};

mod loader;
pub use loader::{FileLoader, Loader, MemoryLoader};

mod normalize;
pub use normalize::normalize;

mod scan;
pub use scan::{scan, FRAGMENT_CLOSE, FRAGMENT_OPEN};

mod value;
pub use value::{resolve_callables, Value, ValueFn, ValueMap};

/// Transpile template source into executable code fragments.
///
/// Runs control structure normalization followed by the tag scan.
/// This is what the [`Engine`][Engine] applies to every loaded template.
///
/// ```
/// # fn main() -> Result<(), weft::Error> {
/// assert_eq!(
///   weft::transpile("{% if (done) %}{! label !}{% endif %}")?,
///   "<?r if (done): ?><?r echo  label ?><?r endif ?>",
/// );
/// # Ok(())
/// # }
/// ```
pub fn transpile(text: &str) -> Result<String, Error> {
	scan::scan(&normalize::normalize(text))
}
