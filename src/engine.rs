//! The template engine: configuration, rendering and layout composition.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{self, Error};
use crate::eval::{BasicEvaluator, Evaluator, Host};
use crate::filters::{builtin_filters, FilterFn};
use crate::loader::Loader;
use crate::value::{resolve_callables, Value, ValueMap};

/// A template function registered on the engine.
pub type TemplateFn = Arc<dyn Fn(&[Value]) -> Value>;

/// An escape function for variable output.
pub type EscapeFn = Arc<dyn Fn(&str) -> String>;

/// What to do when a template cannot be found.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NotFound {
	/// Propagate [`TemplateNotFound`][error::TemplateNotFound] to the caller.
	Error,

	/// Render a diagnostic listing the searched paths instead of failing.
	Fallback,
}

/// What to do when a template calls an unregistered function.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MissingFunctions {
	/// Propagate [`UnknownFunction`][error::UnknownFunction] to the caller.
	Error,

	/// Evaluate the call to null and continue.
	Ignore,
}

/// A template engine.
///
/// The engine holds configuration only; all per-render state lives in a
/// composition context created for each [`render()`][Self::render] call.
/// Nested `include`/`fetch` calls get a fresh context sharing nothing but
/// this configuration, so sections never leak between sibling renders.
///
/// ```
/// # fn main() -> Result<(), weft::Error> {
/// let mut loader = weft::MemoryLoader::new();
/// loader.add("page", "Hello {{ name }}!");
///
/// let engine = weft::Engine::new(loader);
/// let mut data = weft::ValueMap::new();
/// data.insert("name".into(), "weft".into());
/// assert_eq!(engine.render("page", data)?, "Hello weft!");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Engine {
	loader: Rc<dyn Loader>,
	evaluator: Rc<dyn Evaluator>,
	functions: HashMap<String, TemplateFn>,
	filters: HashMap<String, FilterFn>,
	escape: EscapeFn,
	not_found: NotFound,
	missing_functions: MissingFunctions,
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("functions", &self.functions.keys().collect::<Vec<_>>())
			.field("filters", &self.filters.keys().collect::<Vec<_>>())
			.field("not_found", &self.not_found)
			.field("missing_functions", &self.missing_functions)
			.finish_non_exhaustive()
	}
}

impl Engine {
	/// Create an engine with the default configuration.
	///
	/// The defaults: the [`BasicEvaluator`], the built-in filters, HTML
	/// escaping, and errors for missing templates and unknown functions.
	pub fn new(loader: impl Loader + 'static) -> Self {
		Self {
			loader: Rc::new(loader),
			evaluator: Rc::new(BasicEvaluator),
			functions: HashMap::new(),
			filters: builtin_filters(),
			escape: Arc::new(escape_html),
			not_found: NotFound::Error,
			missing_functions: MissingFunctions::Error,
		}
	}

	/// Replace the evaluator executing transpiled code.
	pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
		self.evaluator = Rc::new(evaluator);
		self
	}

	/// Register a template function.
	pub fn with_function(mut self, name: impl Into<String>, function: impl Fn(&[Value]) -> Value + 'static) -> Self {
		self.functions.insert(name.into(), Arc::new(function));
		self
	}

	/// Register an output filter.
	pub fn with_filter(mut self, name: impl Into<String>, filter: impl Fn(&Value) -> Value + 'static) -> Self {
		self.filters.insert(name.into(), Arc::new(filter));
		self
	}

	/// Replace the escape function used for variable output.
	pub fn with_escape(mut self, escape: impl Fn(&str) -> String + 'static) -> Self {
		self.escape = Arc::new(escape);
		self
	}

	/// Set the policy for templates that cannot be found.
	pub fn not_found(mut self, policy: NotFound) -> Self {
		self.not_found = policy;
		self
	}

	/// Set the policy for calls to unregistered functions.
	pub fn missing_functions(mut self, policy: MissingFunctions) -> Self {
		self.missing_functions = policy;
		self
	}

	/// Render the named template with the given data.
	///
	/// Zero-argument callables in `data` are invoked once, recursively through
	/// nested maps and lists, before the render starts.
	pub fn render(&self, name: &str, data: ValueMap) -> Result<String, Error> {
		Render::new(self).run(name, data)
	}

	/// Apply a `|`-separated filter chain to a value, left to right.
	///
	/// Each name must resolve to a registered filter or, failing that, to a
	/// registered unary function. All names are resolved before any filter is
	/// applied, so a chain with an unknown name changes nothing.
	pub fn filter(&self, value: &Value, chain: &str) -> Result<Value, Error> {
		enum Step<'a> {
			Filter(&'a FilterFn),
			Function(&'a TemplateFn),
		}

		let mut steps = Vec::new();
		for name in chain.split('|') {
			let name = name.trim();
			if let Some(filter) = self.filters.get(name) {
				steps.push(Step::Filter(filter));
			} else if let Some(function) = self.functions.get(name) {
				steps.push(Step::Function(function));
			} else {
				return Err(error::FilterNotFound { name: name.into() }.into());
			}
		}

		let mut value = value.clone();
		for step in steps {
			value = match step {
				Step::Filter(filter) => filter(&value),
				Step::Function(function) => function(std::slice::from_ref(&value)),
			};
		}
		Ok(value)
	}
}

/// Escape `&`, `<`, `>` and `"` to HTML entities.
///
/// Single quotes pass through, mirroring the default policy of common
/// HTML-escaping routines.
pub fn escape_html(text: &str) -> String {
	let mut output = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => output.push_str("&amp;"),
			'<' => output.push_str("&lt;"),
			'>' => output.push_str("&gt;"),
			'"' => output.push_str("&quot;"),
			other => output.push(other),
		}
	}
	output
}

/// The opening delimiter of a section placeholder token.
///
/// STX/ETX delimiters cannot appear in sane template content, and the tokens
/// stay readable when dumping intermediate output.
const SECTION_OPEN: &str = "\u{2}[";

/// The closing delimiter of a section placeholder token.
const SECTION_CLOSE: &str = "]\u{3}";

fn placeholder(name: &str) -> String {
	let mut token = String::with_capacity(SECTION_OPEN.len() + name.len() + SECTION_CLOSE.len());
	token.push_str(SECTION_OPEN);
	token.push_str(name);
	token.push_str(SECTION_CLOSE);
	token
}

/// A named section accumulator.
#[derive(Debug, Clone, Default)]
struct Section {
	/// Content supplied by overriding (non-owning) block declarations.
	text: String,

	/// Content supplied by the owning declaration, reachable via `parent()`.
	parent: String,
}

/// A block declaration whose capture scope is still open.
#[derive(Debug)]
struct OpenBlock {
	name: String,
	is_parent: bool,
}

/// Per-render composition state.
struct Render<'a> {
	engine: &'a Engine,
	sections: BTreeMap<String, Section>,
	layout: Option<String>,
	open_blocks: Vec<OpenBlock>,
	buffers: Vec<String>,
}

impl<'a> Render<'a> {
	fn new(engine: &'a Engine) -> Self {
		Self {
			engine,
			sections: BTreeMap::new(),
			layout: None,
			open_blocks: Vec::new(),
			buffers: Vec::new(),
		}
	}

	/// Render a template to completion, including final placeholder substitution.
	fn run(&mut self, name: &str, data: ValueMap) -> Result<String, Error> {
		tracing::debug!(template = name, "rendering");
		let output = self.evaluate(name, data)?;

		// A layout set by `extend` replaces the template's own output.
		let output = match self.layout.take() {
			Some(layout) => layout,
			None => output,
		};
		Ok(self.substitute(&output))
	}

	/// Load, transpile and evaluate one template, returning its raw output.
	///
	/// Section state is shared with the caller; the output buffer is not.
	fn evaluate(&mut self, name: &str, data: ValueMap) -> Result<String, Error> {
		let source = match self.engine.loader.load(name) {
			Ok(source) => source,
			Err(Error::TemplateNotFound(e)) if self.engine.not_found == NotFound::Fallback => {
				tracing::debug!(template = name, "template not found, rendering diagnostic");
				return Ok(e.to_string());
			},
			Err(e) => return Err(e),
		};
		let code = crate::transpile(&source)?;
		let vars: ValueMap = data.into_iter().map(|(k, v)| (k, resolve_callables(v))).collect();

		let buffers = self.buffers.len();
		let blocks = self.open_blocks.len();
		self.buffers.push(String::new());

		let evaluator = Rc::clone(&self.engine.evaluator);
		let result = evaluator.eval(&code, &vars, self);

		let unbalanced = result.is_ok() && self.open_blocks.len() > blocks;
		if result.is_err() || unbalanced {
			self.buffers.truncate(buffers);
			self.open_blocks.truncate(blocks);
			result?;
			return Err(error::Eval::new("block without matching endblock").into());
		}
		Ok(self.buffers.pop().unwrap_or_default())
	}

	/// Replace every placeholder token with its section's accumulated text.
	///
	/// Section text can itself contain placeholder tokens (a `yield` inside a
	/// captured block body), so inserted text is substituted recursively.
	/// No token survives into the output.
	fn substitute(&self, text: &str) -> String {
		self.substitute_expanding(text, &mut Vec::new())
	}

	fn substitute_expanding(&self, text: &str, expanding: &mut Vec<String>) -> String {
		let mut output = String::with_capacity(text.len());
		let mut rest = text;
		while let Some(open) = rest.find(SECTION_OPEN) {
			output.push_str(&rest[..open]);
			let after = &rest[open + SECTION_OPEN.len()..];
			match after.find(SECTION_CLOSE) {
				Some(end) => {
					let name = &after[..end];
					// A section already being expanded substitutes to nothing,
					// so self-referential sections cannot recurse forever.
					if !expanding.iter().any(|n| n == name) {
						if let Some(section) = self.sections.get(name) {
							tracing::trace!(section = name, len = section.text.len(), "substituting section");
							expanding.push(name.to_owned());
							let expanded = self.substitute_expanding(&section.text, expanding);
							expanding.pop();
							output.push_str(&expanded);
						}
					}
					rest = &after[end + SECTION_CLOSE.len()..];
				},
				None => {
					output.push_str(SECTION_OPEN);
					rest = after;
				},
			}
		}
		output.push_str(rest);
		output
	}
}

impl Host for Render<'_> {
	fn write(&mut self, text: &str) {
		if let Some(buffer) = self.buffers.last_mut() {
			buffer.push_str(text);
		}
	}

	fn block(&mut self, name: &str, args: &[Value]) -> Result<(), Error> {
		let is_parent = !self.sections.contains_key(name);
		if is_parent {
			self.sections.insert(name.into(), Section::default());
			let token = placeholder(name);
			self.write(&token);
		}

		if args.is_empty() {
			self.open_blocks.push(OpenBlock {
				name: name.into(),
				is_parent,
			});
			self.buffers.push(String::new());
		} else if let Some(section) = self.sections.get_mut(name) {
			// Inline content goes straight to the section, no capture scope.
			for arg in args {
				section.text.push_str(&arg.to_string());
			}
		}
		Ok(())
	}

	fn endblock(&mut self) -> Result<(), Error> {
		let block = match self.open_blocks.pop() {
			Some(block) => block,
			None => return Err(error::Eval::new("endblock without matching block").into()),
		};
		let captured = self.buffers.pop().unwrap_or_default();
		if let Some(section) = self.sections.get_mut(&block.name) {
			if block.is_parent {
				section.parent.push_str(&captured);
			} else {
				section.text.push_str(&captured);
			}
		}
		Ok(())
	}

	fn yield_section(&mut self, name: &str) {
		self.sections.entry(name.into()).or_default();
		let token = placeholder(name);
		self.write(&token);
	}

	fn parent(&mut self) {
		let content = match self.open_blocks.last() {
			Some(block) => self.sections.get(&block.name).map(|section| section.parent.clone()),
			None => None,
		};
		if let Some(content) = content {
			self.write(&content);
		}
	}

	fn extend(&mut self, name: &str, data: ValueMap) -> Result<(), Error> {
		tracing::trace!(layout = name, "extending layout");
		let output = self.evaluate(name, data)?;
		self.layout = Some(output);
		Ok(())
	}

	fn include(&mut self, name: &str, data: ValueMap) -> Result<(), Error> {
		let output = Render::new(self.engine).run(name, data)?;
		self.write(&output);
		Ok(())
	}

	fn fetch(&mut self, name: &str, data: ValueMap) -> Result<Value, Error> {
		Ok(Value::String(Render::new(self.engine).run(name, data)?))
	}

	fn escape(&self, text: &str) -> String {
		(self.engine.escape)(text)
	}

	fn filter(&self, value: &Value, chain: &str) -> Result<Value, Error> {
		self.engine.filter(value, chain)
	}

	fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error> {
		match self.engine.functions.get(name) {
			Some(function) => Ok(function(args)),
			None => match self.engine.missing_functions {
				MissingFunctions::Error => Err(error::UnknownFunction { name: name.into() }.into()),
				MissingFunctions::Ignore => Ok(Value::Null),
			},
		}
	}
}

#[cfg(test)]
mod test {
	use assert2::{assert, check, let_assert};

	use crate::loader::MemoryLoader;

	use super::*;

	fn engine(templates: &[(&str, &str)]) -> Engine {
		let mut loader = MemoryLoader::new();
		for (name, source) in templates {
			loader.add(*name, *source);
		}
		Engine::new(loader)
	}

	fn data(entries: &[(&str, &str)]) -> ValueMap {
		entries.iter().map(|(k, v)| (k.to_string(), Value::from(*v))).collect()
	}

	#[test]
	fn test_plain_render() {
		let engine = engine(&[("page", "Hello {{ name }}!")]);
		let_assert!(Ok(output) = engine.render("page", data(&[("name", "world")])));
		assert!(output == "Hello world!");
	}

	#[test]
	fn test_variable_output_is_html_escaped() {
		let engine = engine(&[("page", "{{ markup }}")]);
		let_assert!(Ok(output) = engine.render("page", data(&[("markup", r##"<a href="#">&</a>"##)])));
		assert!(output == "&lt;a href=&quot;#&quot;&gt;&amp;&lt;/a&gt;");
	}

	#[test]
	fn test_raw_output_is_not_escaped() {
		let engine = engine(&[("page", "{! markup !}")]);
		let_assert!(Ok(output) = engine.render("page", data(&[("markup", "<b>hi</b>")])));
		assert!(output == "<b>hi</b>");
	}

	#[test]
	fn test_child_block_overrides_layout_default() {
		let engine = engine(&[
			(
				"layouts/app",
				"<main>{% block('content') %}<p>Hello parent block</p>{% endblock() %}</main>",
			),
			(
				"404",
				"{% extend('layouts/app') %}{% block('content') %}<h1>Not found</h1>{% endblock() %}",
			),
		]);
		let_assert!(Ok(output) = engine.render("404", ValueMap::new()));
		assert!(output == "<main><h1>Not found</h1></main>");
	}

	#[test]
	fn test_parent_interleaves_layout_content() {
		let engine = engine(&[
			("layouts/app", "{% block('content') %}first{% endblock() %}"),
			(
				"page",
				"{% extend('layouts/app') %}{% block('content') %}{% parent() %} then second{% endblock() %}",
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "first then second");
	}

	#[test]
	fn test_unfilled_yield_substitutes_to_empty() {
		let engine = engine(&[
			("layouts/app", "<footer>{% yield('footer') %}</footer>"),
			("page", "{% extend('layouts/app') %}"),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "<footer></footer>");
		assert!(!output.contains('\u{2}'));
		assert!(!output.contains('\u{3}'));
	}

	#[test]
	fn test_yield_inside_block_body_substitutes() {
		let engine = engine(&[
			("layouts/app", "before {% block('content') %}{% endblock() %}after"),
			(
				"page",
				"{% extend('layouts/app') %}{% block('content') %}{% yield('footer') %}{% endblock() %}",
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "before after");
		assert!(!output.contains('\u{2}'));
		assert!(!output.contains('\u{3}'));
	}

	#[test]
	fn test_nested_section_content_is_expanded() {
		let engine = engine(&[
			("layouts/app", "{% block('content') %}{% endblock() %}"),
			(
				"page",
				concat!(
					"{% extend('layouts/app') %}",
					"{% block('content') %}body {% yield('footer') %}{% endblock() %}",
					"{% block('footer', 'notes') %}",
				),
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "body notes");
	}

	#[test]
	fn test_self_referential_section_substitutes_once() {
		let engine = engine(&[
			("layouts/app", "[{% block('a') %}{% endblock() %}]"),
			(
				"page",
				"{% extend('layouts/app') %}{% block('a') %}{% yield('a') %}{% endblock() %}",
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "[]");
	}

	#[test]
	fn test_nested_blocks_capture_independently() {
		let engine = engine(&[
			(
				"layouts/app",
				"[{% block('outer') %}{% endblock() %}][{% yield('inner') %}]",
			),
			(
				"page",
				concat!(
					"{% extend('layouts/app') %}",
					"{% block('outer') %}A{% block('inner') %}B{% endblock() %}C{% endblock() %}",
				),
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "[AC][B]");
	}

	#[test]
	fn test_reentrant_blocks_append() {
		let engine = engine(&[
			("layouts/app", "{% block('content') %}{% endblock() %}"),
			(
				"page",
				concat!(
					"{% extend('layouts/app') %}",
					"{% block('content') %}one{% endblock() %}",
					"{% block('content') %} two{% endblock() %}",
				),
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "one two");
	}

	#[test]
	fn test_layout_receives_extend_data() {
		let engine = engine(&[
			("layouts/app", "<title>{{ title }}</title>{% yield('content') %}"),
			("page", "{% extend('layouts/app', {title: 'Home'}) %}"),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "<title>Home</title>");
	}

	#[test]
	fn test_second_extend_overwrites_layout() {
		let engine = engine(&[
			("a", "layout a"),
			("b", "layout b"),
			("page", "{% extend('a') %}{% extend('b') %}"),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "layout b");
	}

	#[test]
	fn test_inline_block_content() {
		let engine = engine(&[
			("layouts/app", "[{% yield('title') %}]"),
			("page", "{% extend('layouts/app') %}{% block('title', 'Home') %}"),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "[Home]");
	}

	#[test]
	fn test_include_renders_in_place() {
		let engine = engine(&[
			("partials/title", "<h1>{{ title }}</h1>"),
			("page", "before {% include('partials/title', {title: 'Test'}) %} after"),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "before <h1>Test</h1> after");
	}

	#[test]
	fn test_fetch_returns_output_as_value() {
		let engine = engine(&[
			("partials/title", "<h1>{{ title }}</h1>"),
			("page", "{{ fetch('partials/title', {title: 'X & Y'}) }}"),
		]);
		// The fetched output is a variable emission, so it gets escaped.
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "&lt;h1&gt;X &amp;amp; Y&lt;/h1&gt;");
	}

	#[test]
	fn test_include_uses_a_fresh_section_store() {
		let engine = engine(&[
			("layouts/app", "{% block('content') %}default{% endblock() %}"),
			(
				"partial",
				"{% extend('layouts/app') %}{% block('content') %}inner{% endblock() %}",
			),
			(
				"page",
				"{% extend('layouts/app') %}{% block('content') %}outer {% include('partial') %}{% endblock() %}",
			),
		]);
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "outer inner");
	}

	#[test]
	fn test_filter_chain() {
		let engine = engine(&[]);
		let_assert!(Ok(value) = engine.filter(&"UP".into(), "lower|upper"));
		assert!(value == "UP".into());
	}

	#[test]
	fn test_filter_chain_resolves_functions() {
		let engine = engine(&[]).with_function("exclaim", |args| format!("{}!", args[0]).into());
		let_assert!(Ok(value) = engine.filter(&"hi".into(), "upper|exclaim"));
		assert!(value == "HI!".into());
	}

	#[test]
	fn test_unknown_filter_fails_whole_chain() {
		let engine = engine(&[]);
		let_assert!(Err(Error::FilterNotFound(e)) = engine.filter(&"UP".into(), "lower|upper|missing"));
		check!(e.name == "missing");
	}

	#[test]
	fn test_filter_in_template() {
		let engine = engine(&[("page", "{! filter(name, 'upper') !}")]);
		let_assert!(Ok(output) = engine.render("page", data(&[("name", "weft")])));
		assert!(output == "WEFT");
	}

	#[test]
	fn test_custom_function() {
		let engine = engine(&[("page", "{! up('hello') !}")])
			.with_function("up", |args| args[0].to_string().to_uppercase().into());
		let_assert!(Ok(output) = engine.render("page", ValueMap::new()));
		assert!(output == "HELLO");
	}

	#[test]
	fn test_unknown_function_policy() {
		let strict = engine(&[("page", "a{! nope() !}b")]);
		let_assert!(Err(Error::UnknownFunction(e)) = strict.render("page", ValueMap::new()));
		check!(e.name == "nope");

		let lenient = engine(&[("page", "a{! nope() !}b")]).missing_functions(MissingFunctions::Ignore);
		let_assert!(Ok(output) = lenient.render("page", ValueMap::new()));
		assert!(output == "ab");
	}

	#[test]
	fn test_missing_template_policies() {
		let strict = engine(&[]);
		let_assert!(Err(Error::TemplateNotFound(e)) = strict.render("missing", ValueMap::new()));
		check!(e.name == "missing");

		let fallback = engine(&[]).not_found(NotFound::Fallback);
		let_assert!(Ok(output) = fallback.render("missing", ValueMap::new()));
		assert!(output.contains("Template not found: missing"));
	}

	#[test]
	fn test_callables_are_resolved_before_binding() {
		use std::sync::atomic::{AtomicUsize, Ordering};

		static CALLS: AtomicUsize = AtomicUsize::new(0);

		let engine = engine(&[("page", "{{ lazy }} {{ lazy }}")]);
		let mut data = ValueMap::new();
		data.insert(
			"lazy".into(),
			Value::Func(Arc::new(|| {
				CALLS.fetch_add(1, Ordering::SeqCst);
				"computed".into()
			})),
		);

		let_assert!(Ok(output) = engine.render("page", data));
		assert!(output == "computed computed");
		assert!(CALLS.load(Ordering::SeqCst) == 1);
	}

	#[test]
	fn test_unbalanced_block_is_an_error() {
		let engine = engine(&[("page", "{% block('content') %}never closed")]);
		let_assert!(Err(e) = engine.render("page", ValueMap::new()));
		check!(e.to_string() == "Evaluation error: block without matching endblock");
	}

	#[test]
	fn test_stray_endblock_is_an_error() {
		let engine = engine(&[("page", "{% endblock() %}")]);
		let_assert!(Err(e) = engine.render("page", ValueMap::new()));
		check!(e.to_string() == "Evaluation error: endblock without matching block");
	}

	#[test]
	fn test_custom_escape() {
		let engine = engine(&[("page", "{{ name }}")]).with_escape(|text| format!("[{text}]"));
		let_assert!(Ok(output) = engine.render("page", data(&[("name", "x")])));
		assert!(output == "[x]");
	}
}
