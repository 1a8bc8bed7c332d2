//! Evaluation of transpiled code fragments.
//!
//! Transpilation turns a template into a blob of literal text with embedded
//! code fragments. Executing that blob is the job of an [`Evaluator`]. The
//! evaluator never touches engine state directly; all output and every
//! composition directive goes through the [`Host`] callback surface, which the
//! engine implements per render.
//!
//! The crate ships [`BasicEvaluator`], a small interpreter covering literal
//! text, `echo` fragments and directive statements. Control structures are out
//! of its scope and raise an evaluation error naming the construct.

use crate::error::{self, Error};
use crate::scan::{FRAGMENT_CLOSE, FRAGMENT_OPEN};
use crate::value::{Value, ValueMap};

/// The callback surface the engine exposes to an evaluator during one render.
pub trait Host {
	/// Append literal output.
	fn write(&mut self, text: &str);

	/// Open a block, or append inline content to it when `args` is non-empty.
	fn block(&mut self, name: &str, args: &[Value]) -> Result<(), Error>;

	/// Close the innermost open block.
	fn endblock(&mut self) -> Result<(), Error>;

	/// Emit a placeholder for the named section.
	fn yield_section(&mut self, name: &str);

	/// Emit the parent content of the innermost open block.
	fn parent(&mut self);

	/// Render the named layout template and store it as the layout context.
	fn extend(&mut self, name: &str, data: ValueMap) -> Result<(), Error>;

	/// Render another template in a fresh context and write its output in place.
	fn include(&mut self, name: &str, data: ValueMap) -> Result<(), Error>;

	/// Render another template in a fresh context and return its output.
	fn fetch(&mut self, name: &str, data: ValueMap) -> Result<Value, Error>;

	/// Escape text for output.
	fn escape(&self, text: &str) -> String;

	/// Apply a `|`-separated filter chain to a value.
	fn filter(&self, value: &Value, chain: &str) -> Result<Value, Error>;

	/// Call a registered template function.
	fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, Error>;
}

/// An executor for transpiled template code.
pub trait Evaluator {
	/// Execute a transpiled blob, driving output and composition through `host`.
	fn eval(&self, code: &str, vars: &ValueMap, host: &mut dyn Host) -> Result<(), Error>;
}

/// Statement keywords that open or continue a control structure.
///
/// Executing these requires a full host-language evaluator.
const CONTROL_KEYWORDS: &[&str] = &[
	"if",
	"else",
	"elseif",
	"end",
	"endif",
	"for",
	"endfor",
	"foreach",
	"endforeach",
	"while",
	"endwhile",
	"switch",
	"endswitch",
	"case",
	"default",
	"break",
	"continue",
	"where",
	"endwhere",
	"fallthrough",
];

/// A minimal fragment interpreter.
///
/// Supports literal text, `echo EXPR` fragments and bare directive or function
/// call statements. The expression grammar covers quoted strings, integers,
/// floats, `true`/`false`/`null`, dotted variable paths, calls, list literals
/// and `{key: value}` map literals.
///
/// Control structure fragments produce an [`Eval`][error::Eval] error naming
/// the construct.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEvaluator;

impl Evaluator for BasicEvaluator {
	fn eval(&self, code: &str, vars: &ValueMap, host: &mut dyn Host) -> Result<(), Error> {
		let mut rest = code;
		while let Some(open) = rest.find(FRAGMENT_OPEN) {
			host.write(&rest[..open]);
			let body = &rest[open + FRAGMENT_OPEN.len()..];
			let close = body
				.find(FRAGMENT_CLOSE)
				.ok_or_else(|| error::Eval::new("code fragment without closing marker"))?;
			fragment(&body[..close], vars, host)?;
			rest = &body[close + FRAGMENT_CLOSE.len()..];
		}
		host.write(rest);
		Ok(())
	}
}

/// Execute a single code fragment.
fn fragment(content: &str, vars: &ValueMap, host: &mut dyn Host) -> Result<(), Error> {
	let content = content.trim();
	if content.is_empty() {
		return Ok(());
	}

	if let Some(expr) = strip_keyword(content, "echo") {
		let expr = parse(expr)?;
		let value = eval_expr(&expr, vars, host)?;
		host.write(&value.to_string());
		return Ok(());
	}

	let word = leading_word(content);
	if CONTROL_KEYWORDS.contains(&word) {
		return Err(error::Eval::new(format!("unsupported control structure: {word}")).into());
	}

	match parse(content)? {
		Expr::Call(name, args) => {
			eval_call(&name, &args, vars, host)?;
			Ok(())
		},
		_ => Err(error::Eval::new(format!("expected a statement, got: {content}")).into()),
	}
}

/// Strip a leading keyword, requiring a word boundary after it.
fn strip_keyword<'a>(content: &'a str, keyword: &str) -> Option<&'a str> {
	let rest = content.strip_prefix(keyword)?;
	match rest.chars().next() {
		None => Some(rest),
		Some(c) if !c.is_alphanumeric() && c != '_' => Some(rest),
		Some(_) => None,
	}
}

fn leading_word(content: &str) -> &str {
	let end = content
		.find(|c: char| !c.is_alphanumeric() && c != '_')
		.unwrap_or(content.len());
	&content[..end]
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
enum Expr {
	Lit(Value),
	Var(Vec<String>),
	Call(String, Vec<Expr>),
	List(Vec<Expr>),
	Map(Vec<(String, Expr)>),
}

/// Parse a complete expression, requiring all input to be consumed.
fn parse(input: &str) -> Result<Expr, Error> {
	let mut cursor = Cursor { input, pos: 0 };
	let expr = cursor.expr()?;
	cursor.skip_whitespace();
	if cursor.pos != input.len() {
		return Err(error::Eval::new(format!("unexpected trailing input: {}", &input[cursor.pos..])).into());
	}
	Ok(expr)
}

struct Cursor<'a> {
	input: &'a str,
	pos: usize,
}

impl Cursor<'_> {
	fn peek(&self) -> Option<char> {
		self.input[self.pos..].chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.peek(), Some(c) if c.is_whitespace()) {
			self.bump();
		}
	}

	fn eat(&mut self, expected: char) -> Result<(), Error> {
		self.skip_whitespace();
		if self.bump() != Some(expected) {
			return Err(error::Eval::new(format!("expected `{expected}` in expression: {}", self.input)).into());
		}
		Ok(())
	}

	fn expr(&mut self) -> Result<Expr, Error> {
		self.skip_whitespace();
		match self.peek() {
			Some('\'') | Some('"') => Ok(Expr::Lit(Value::String(self.string()?))),
			Some('[') => self.list(),
			Some('{') => self.map(),
			Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
			Some(c) if c.is_alphabetic() || c == '_' => self.path_or_call(),
			_ => Err(error::Eval::new(format!("malformed expression: {}", self.input)).into()),
		}
	}

	fn string(&mut self) -> Result<String, Error> {
		let quote = match self.bump() {
			Some(quote) => quote,
			None => return Err(error::Eval::new("expected a string literal").into()),
		};
		let mut value = String::new();
		loop {
			match self.bump() {
				None => return Err(error::Eval::new("unterminated string literal").into()),
				Some('\\') => match self.bump() {
					None => return Err(error::Eval::new("unterminated string literal").into()),
					Some('n') => value.push('\n'),
					Some('t') => value.push('\t'),
					Some('r') => value.push('\r'),
					Some(other) => value.push(other),
				},
				Some(c) if c == quote => return Ok(value),
				Some(c) => value.push(c),
			}
		}
	}

	fn number(&mut self) -> Result<Expr, Error> {
		let start = self.pos;
		if self.peek() == Some('-') {
			self.bump();
		}
		let mut float = false;
		while let Some(c) = self.peek() {
			if c.is_ascii_digit() {
				self.bump();
			} else if c == '.' && !float && matches!(self.input[self.pos + 1..].chars().next(), Some(d) if d.is_ascii_digit()) {
				float = true;
				self.bump();
			} else {
				break;
			}
		}
		let text = &self.input[start..self.pos];
		if float {
			let value: f64 = text
				.parse()
				.map_err(|_| error::Eval::new(format!("malformed number: {text}")))?;
			Ok(Expr::Lit(Value::Float(value)))
		} else {
			let value: i64 = text
				.parse()
				.map_err(|_| error::Eval::new(format!("malformed number: {text}")))?;
			Ok(Expr::Lit(Value::Int(value)))
		}
	}

	fn ident(&mut self) -> Result<String, Error> {
		self.skip_whitespace();
		let start = self.pos;
		while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
			self.bump();
		}
		if self.pos == start {
			return Err(error::Eval::new(format!("expected an identifier in expression: {}", self.input)).into());
		}
		Ok(self.input[start..self.pos].into())
	}

	fn path_or_call(&mut self) -> Result<Expr, Error> {
		let name = self.ident()?;
		match name.as_str() {
			"true" => return Ok(Expr::Lit(Value::Bool(true))),
			"false" => return Ok(Expr::Lit(Value::Bool(false))),
			"null" => return Ok(Expr::Lit(Value::Null)),
			_ => {},
		}

		if self.peek() == Some('(') {
			return Ok(Expr::Call(name, self.arguments()?));
		}

		let mut path = vec![name];
		while self.peek() == Some('.') {
			self.bump();
			path.push(self.ident()?);
		}
		Ok(Expr::Var(path))
	}

	fn arguments(&mut self) -> Result<Vec<Expr>, Error> {
		self.eat('(')?;
		let mut args = Vec::new();
		self.skip_whitespace();
		if self.peek() == Some(')') {
			self.bump();
			return Ok(args);
		}
		loop {
			args.push(self.expr()?);
			self.skip_whitespace();
			match self.bump() {
				Some(',') => {},
				Some(')') => return Ok(args),
				_ => return Err(error::Eval::new(format!("unterminated argument list: {}", self.input)).into()),
			}
		}
	}

	fn list(&mut self) -> Result<Expr, Error> {
		self.eat('[')?;
		let mut items = Vec::new();
		self.skip_whitespace();
		if self.peek() == Some(']') {
			self.bump();
			return Ok(Expr::List(items));
		}
		loop {
			items.push(self.expr()?);
			self.skip_whitespace();
			match self.bump() {
				Some(',') => {},
				Some(']') => return Ok(Expr::List(items)),
				_ => return Err(error::Eval::new(format!("unterminated list literal: {}", self.input)).into()),
			}
		}
	}

	fn map(&mut self) -> Result<Expr, Error> {
		self.eat('{')?;
		let mut entries = Vec::new();
		self.skip_whitespace();
		if self.peek() == Some('}') {
			self.bump();
			return Ok(Expr::Map(entries));
		}
		loop {
			self.skip_whitespace();
			let key = match self.peek() {
				Some('\'') | Some('"') => self.string()?,
				_ => self.ident()?,
			};
			self.eat(':')?;
			entries.push((key, self.expr()?));
			self.skip_whitespace();
			match self.bump() {
				Some(',') => {},
				Some('}') => return Ok(Expr::Map(entries)),
				_ => return Err(error::Eval::new(format!("unterminated map literal: {}", self.input)).into()),
			}
		}
	}
}

/// Evaluate a parsed expression.
fn eval_expr(expr: &Expr, vars: &ValueMap, host: &mut dyn Host) -> Result<Value, Error> {
	match expr {
		Expr::Lit(value) => Ok(value.clone()),
		Expr::Var(path) => Ok(lookup(path, vars)),
		Expr::Call(name, args) => eval_call(name, args, vars, host),
		Expr::List(items) => {
			let items: Result<Vec<_>, _> = items.iter().map(|item| eval_expr(item, vars, host)).collect();
			Ok(Value::List(items?))
		},
		Expr::Map(entries) => {
			let mut map = ValueMap::new();
			for (key, value) in entries {
				map.insert(key.clone(), eval_expr(value, vars, host)?);
			}
			Ok(Value::Map(map))
		},
	}
}

/// Look up a dotted variable path; unknown names evaluate to null.
fn lookup(path: &[String], vars: &ValueMap) -> Value {
	let mut value = match vars.get(&path[0]) {
		Some(value) => value,
		None => return Value::Null,
	};
	for key in &path[1..] {
		value = match value.get(key) {
			Some(value) => value,
			None => return Value::Null,
		};
	}
	value.clone()
}

/// Evaluate a call: engine directives are routed to the host, everything else
/// goes through the registered function table.
fn eval_call(name: &str, args: &[Expr], vars: &ValueMap, host: &mut dyn Host) -> Result<Value, Error> {
	match name {
		"escape" => {
			let value = single_argument(name, args, vars, host)?;
			Ok(Value::String(host.escape(&value.to_string())))
		},
		"filter" => {
			if args.len() != 2 {
				return Err(error::Eval::new("filter() takes a value and a filter chain").into());
			}
			let value = eval_expr(&args[0], vars, host)?;
			let chain = eval_expr(&args[1], vars, host)?;
			host.filter(&value, &chain.to_string())
		},
		"block" => {
			let (name, rest) = name_argument(args, vars, host)?;
			host.block(&name, &rest)?;
			Ok(Value::Null)
		},
		"endblock" => {
			no_arguments(name, args)?;
			host.endblock()?;
			Ok(Value::Null)
		},
		"yield" | "section" => {
			let name = single_argument(name, args, vars, host)?.to_string();
			host.yield_section(&name);
			Ok(Value::Null)
		},
		"parent" => {
			no_arguments(name, args)?;
			host.parent();
			Ok(Value::Null)
		},
		"extend" => {
			let (name, data) = template_arguments(args, vars, host)?;
			host.extend(&name, data)?;
			Ok(Value::Null)
		},
		"include" => {
			let (name, data) = template_arguments(args, vars, host)?;
			host.include(&name, data)?;
			Ok(Value::Null)
		},
		"fetch" => {
			let (name, data) = template_arguments(args, vars, host)?;
			host.fetch(&name, data)
		},
		_ => {
			let args: Result<Vec<_>, _> = args.iter().map(|arg| eval_expr(arg, vars, host)).collect();
			host.call(name, &args?)
		},
	}
}

fn single_argument(name: &str, args: &[Expr], vars: &ValueMap, host: &mut dyn Host) -> Result<Value, Error> {
	if args.len() != 1 {
		return Err(error::Eval::new(format!("{name}() takes exactly one argument")).into());
	}
	eval_expr(&args[0], vars, host)
}

fn no_arguments(name: &str, args: &[Expr]) -> Result<(), Error> {
	if !args.is_empty() {
		return Err(error::Eval::new(format!("{name}() takes no further arguments")).into());
	}
	Ok(())
}

/// Evaluate a directive's leading name argument plus any trailing values.
fn name_argument(args: &[Expr], vars: &ValueMap, host: &mut dyn Host) -> Result<(String, Vec<Value>), Error> {
	let name = match args.first() {
		Some(expr) => eval_expr(expr, vars, host)?.to_string(),
		None => return Err(error::Eval::new("directive requires a name argument").into()),
	};
	let rest: Result<Vec<_>, _> = args[1..].iter().map(|arg| eval_expr(arg, vars, host)).collect();
	Ok((name, rest?))
}

/// Evaluate a template name plus an optional data map argument.
fn template_arguments(args: &[Expr], vars: &ValueMap, host: &mut dyn Host) -> Result<(String, ValueMap), Error> {
	let (name, rest) = name_argument(args, vars, host)?;
	match rest.len() {
		0 => Ok((name, ValueMap::new())),
		1 => match rest.into_iter().next() {
			Some(Value::Map(data)) => Ok((name, data)),
			_ => Err(error::Eval::new("template data must be a map").into()),
		},
		_ => Err(error::Eval::new("too many template arguments").into()),
	}
}
