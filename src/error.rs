//! Module containing error details.

use std::path::PathBuf;

/// An error that can occur while transpiling or rendering a template.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub enum Error {
	/// The template source contains a tag that is never closed.
	UnterminatedTag(UnterminatedTag),

	/// A template could not be found in any of the configured search paths.
	TemplateNotFound(TemplateNotFound),

	/// A template file exists but could not be read.
	Io(Io),

	/// A filter chain names a filter that is not registered.
	FilterNotFound(FilterNotFound),

	/// A template calls a function that is not registered.
	UnknownFunction(UnknownFunction),

	/// A transpiled fragment could not be evaluated.
	Eval(Eval),
}

impl From<UnterminatedTag> for Error {
	fn from(other: UnterminatedTag) -> Self {
		Self::UnterminatedTag(other)
	}
}

impl From<TemplateNotFound> for Error {
	fn from(other: TemplateNotFound) -> Self {
		Self::TemplateNotFound(other)
	}
}

impl From<Io> for Error {
	fn from(other: Io) -> Self {
		Self::Io(other)
	}
}

impl From<FilterNotFound> for Error {
	fn from(other: FilterNotFound) -> Self {
		Self::FilterNotFound(other)
	}
}

impl From<UnknownFunction> for Error {
	fn from(other: UnknownFunction) -> Self {
		Self::UnknownFunction(other)
	}
}

impl From<Eval> for Error {
	fn from(other: Eval) -> Self {
		Self::Eval(other)
	}
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::UnterminatedTag(e) => e.fmt(f),
			Self::TemplateNotFound(e) => e.fmt(f),
			Self::Io(e) => e.fmt(f),
			Self::FilterNotFound(e) => e.fmt(f),
			Self::UnknownFunction(e) => e.fmt(f),
			Self::Eval(e) => e.fmt(f),
		}
	}
}

/// The kind of tag that was left unterminated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TagKind {
	/// A variable output tag: `{{ expr }}`.
	Variable,

	/// A raw output tag: `{! expr !}`.
	Raw,

	/// A code tag: `{% stmt %}`.
	Code,
}

impl TagKind {
	fn name(self) -> &'static str {
		match self {
			Self::Variable => "variable",
			Self::Raw => "raw",
			Self::Code => "code",
		}
	}
}

/// The template source contains a tag that is never closed before end of input.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnterminatedTag {
	/// The byte offset within the input where the error occurs.
	///
	/// This points to the opening marker of the tag in the source text.
	pub position: usize,

	/// The length of the opening marker in bytes.
	pub len: usize,

	/// The kind of tag that was opened.
	pub kind: TagKind,
}

impl std::error::Error for UnterminatedTag {}

impl std::fmt::Display for UnterminatedTag {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Unterminated {} tag", self.kind.name())
	}
}

/// A template could not be found in any of the configured search paths.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct TemplateNotFound {
	/// The template identifier as given to the engine.
	pub name: String,

	/// Every path that was tried, in search order.
	pub searched: Vec<PathBuf>,
}

impl std::error::Error for TemplateNotFound {}

impl std::fmt::Display for TemplateNotFound {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Template not found: {}", self.name)?;
		for path in &self.searched {
			write!(f, "\n  searched: {}", path.display())?;
		}
		Ok(())
	}
}

/// A template file exists but could not be read.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct Io {
	/// The path of the file that failed to read.
	pub path: PathBuf,

	/// The I/O error message.
	pub message: String,
}

impl std::error::Error for Io {}

impl std::fmt::Display for Io {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Failed to read {}: {}", self.path.display(), self.message)
	}
}

/// A filter chain names a filter that is not registered.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct FilterNotFound {
	/// The name of the unresolved filter.
	pub name: String,
}

impl std::error::Error for FilterNotFound {}

impl std::fmt::Display for FilterNotFound {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "No such filter: {}", self.name)
	}
}

/// A template calls a function that is not registered.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct UnknownFunction {
	/// The name of the unresolved function.
	pub name: String,
}

impl std::error::Error for UnknownFunction {}

impl std::fmt::Display for UnknownFunction {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "No such function: {}", self.name)
	}
}

/// A transpiled fragment could not be evaluated.
#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub struct Eval {
	/// A human readable description of the evaluation failure.
	pub message: String,
}

impl Eval {
	/// Create an evaluation error from a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

impl std::error::Error for Eval {}

impl std::fmt::Display for Eval {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Evaluation error: {}", self.message)
	}
}

impl Error {
	/// Get the range in the source text that contains the error.
	///
	/// Only scan errors carry a source position.
	/// Errors raised during composition or evaluation return [`None`].
	pub fn source_range(&self) -> Option<std::ops::Range<usize>> {
		match self {
			Self::UnterminatedTag(e) => Some(std::ops::Range {
				start: e.position,
				end: e.position + e.len,
			}),
			_ => None,
		}
	}

	/// Get the line of source that contains the error.
	///
	/// Returns [`None`] for errors without a source position.
	pub fn source_line<'a>(&self, source: &'a str) -> Option<&'a str> {
		let position = self.source_range()?.start;
		let start = line_start(source.as_bytes(), position);
		let end = line_end(source.as_bytes(), position);
		Some(&source[start..end])
	}

	/// Write source highlighting for the error location.
	///
	/// The highlighting ends with a newline.
	///
	/// Note: this function doesn't print anything if the error has no source position,
	/// or if the source line exceeds 60 characters in width.
	/// For more control over this behaviour, consider using [`Self::source_range()`] and [`Self::source_line()`] instead.
	pub fn write_source_highlighting(&self, f: &mut impl std::fmt::Write, source: &str) -> std::fmt::Result {
		use unicode_width::UnicodeWidthStr;

		let range = match self.source_range() {
			Some(range) => range,
			None => return Ok(()),
		};
		let line = match self.source_line(source) {
			Some(line) => line,
			None => return Ok(()),
		};
		if line.width() > 60 {
			return Ok(());
		}
		let line_offset = line_start(source.as_bytes(), range.start);
		let range = range.start - line_offset..range.end - line_offset;
		write!(f, "  {}\n  ", line)?;
		write_underline(f, line, range)?;
		writeln!(f)
	}

	/// Get source highlighting for the error location as a string.
	///
	/// The highlighting ends with a newline.
	pub fn source_highlighting(&self, source: &str) -> String {
		let mut output = String::new();
		self.write_source_highlighting(&mut output, source).unwrap();
		output
	}
}

fn line_start(source: &[u8], position: usize) -> usize {
	match source[..position].iter().rposition(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => line_end + 1,
		None => 0,
	}
}

fn line_end(source: &[u8], position: usize) -> usize {
	match source[position..].iter().position(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => position + line_end,
		None => source.len(),
	}
}

fn write_underline(f: &mut impl std::fmt::Write, line: &str, range: std::ops::Range<usize>) -> std::fmt::Result {
	use unicode_width::UnicodeWidthStr;
	let spaces = line[..range.start].width();
	let carets = line[range].width();
	write!(f, "{}", " ".repeat(spaces))?;
	write!(f, "{}", "^".repeat(carets))?;
	Ok(())
}
