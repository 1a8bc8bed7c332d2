//! The tag scanner: rewrites template tags into executable code fragments.
//!
//! The scanner performs a single left-to-right pass over the source and
//! rewrites the three tag forms into code fragments for the evaluator:
//!
//! * `{{ expr }}` becomes an escaped echo fragment,
//! * `{! expr !}` becomes a raw echo fragment,
//! * `{% stmt %}` becomes a statement fragment.
//!
//! Everything else is copied through unchanged, except that runs of
//! whitespace-only lines collapse to a single newline afterwards.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{self, Error, TagKind};

/// The opening marker of an emitted code fragment.
pub const FRAGMENT_OPEN: &str = "<?r";

/// The closing marker of an emitted code fragment.
pub const FRAGMENT_CLOSE: &str = "?>";

/// The name of the escaping function wrapped around variable output.
const ESCAPE_FUNCTION: &str = "escape";

/// Matches any run of whitespace-only lines, including the line breaks around it.
static BLANK_LINES: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:\A[\r\n]*|[\r\n]+)[ \t\r\n]*[\r\n]+").unwrap());

/// Scan template source and rewrite all tags into executable code fragments.
///
/// The scan is a single pass over the input bytes.
/// All tag markers are ASCII, so multi-byte characters are copied through untouched.
/// Text without any tags is returned unchanged, apart from blank line collapsing.
///
/// A tag that is still open at the end of the input is an error;
/// the scanner never emits an unbalanced code fragment.
///
/// ```
/// # fn main() -> Result<(), weft::Error> {
/// assert_eq!(weft::scan("Hello {{ name }}!")?, "Hello <?r echo escape( name ) ?>!");
/// assert_eq!(weft::scan("{! markup !}")?, "<?r echo  markup ?>");
/// # Ok(())
/// # }
/// ```
pub fn scan(text: &str) -> Result<String, Error> {
	let source = text.as_bytes();
	let mut output = Vec::with_capacity(source.len() + source.len() / 4);
	let mut pos = 0;

	while pos < source.len() {
		// Jump to the next opening brace; everything before it is literal.
		let open = match memchr::memchr(b'{', &source[pos..]) {
			Some(idx) => pos + idx,
			None => break,
		};
		output.extend_from_slice(&source[pos..open]);

		pos = match source.get(open + 1) {
			Some(b'{') => scan_variable(source, open, &mut output)?,
			Some(b'!') => scan_raw(source, open, &mut output)?,
			Some(b'%') => scan_code(source, open, &mut output)?,
			// A lone brace is literal text.
			_ => {
				output.push(b'{');
				open + 1
			},
		};
	}
	output.extend_from_slice(&source[pos..]);

	// SAFETY: The scanner only splits the input at ASCII bytes and all emitted
	// marker text is ASCII, so the output is valid UTF-8.
	#[cfg(not(debug_assertions))]
	let output = unsafe { String::from_utf8_unchecked(output) };
	#[cfg(debug_assertions)]
	let output = String::from_utf8(output).unwrap();

	Ok(collapse_blank_lines(&output))
}

/// Scan a variable output tag starting at `open` (which points at the first `{` of a `{{` run).
///
/// Returns the position of the first byte after the tag.
fn scan_variable(source: &[u8], open: usize, output: &mut Vec<u8>) -> Result<usize, Error> {
	// A triple brace marker does not re-trigger; the third brace is consumed.
	let marker = if source.get(open + 2) == Some(&b'{') { 3 } else { 2 };

	output.extend_from_slice(FRAGMENT_OPEN.as_bytes());
	output.extend_from_slice(b" echo ");
	output.extend_from_slice(ESCAPE_FUNCTION.as_bytes());
	output.push(b'(');

	let mut depth: i32 = 2;
	let mut i = open + marker;
	while i < source.len() {
		match source[i] {
			b'{' => {
				output.push(b'{');
				depth += 1;
			},
			b'}' => {
				depth -= 1;
				if depth <= 0 && source[i - 1] == b'}' {
					output.extend_from_slice(b") ?>");
					// Consume the symmetric extra brace of a triple marker.
					if marker == 3 && source.get(i + 1) == Some(&b'}') {
						return Ok(i + 2);
					}
					return Ok(i + 1);
				} else if depth > 1 {
					output.push(b'}');
				}
				// The first brace of the closing pair is dropped.
			},
			other => output.push(other),
		}
		i += 1;
	}

	Err(error::UnterminatedTag {
		position: open,
		len: marker,
		kind: TagKind::Variable,
	}
	.into())
}

/// Scan a raw output tag starting at `open` (which points at the `{` of `{!`).
///
/// The tag is closed by any run of `!` characters directly followed by `}`.
/// Returns the position of the first byte after the tag.
fn scan_raw(source: &[u8], open: usize, output: &mut Vec<u8>) -> Result<usize, Error> {
	// Consume the brace and the whole run of leading exclamation marks.
	let mut marker = 2;
	while source.get(open + marker) == Some(&b'!') {
		marker += 1;
	}

	output.extend_from_slice(FRAGMENT_OPEN.as_bytes());
	output.extend_from_slice(b" echo ");

	let mut i = open + marker;
	loop {
		let bang = match memchr::memchr(b'!', &source[i..]) {
			Some(idx) => i + idx,
			None => {
				return Err(error::UnterminatedTag {
					position: open,
					len: marker,
					kind: TagKind::Raw,
				}
				.into())
			},
		};
		output.extend_from_slice(&source[i..bang]);

		let mut end = bang;
		while source.get(end) == Some(&b'!') {
			end += 1;
		}
		if source.get(end) == Some(&b'}') {
			output.extend_from_slice(FRAGMENT_CLOSE.as_bytes());
			return Ok(end + 1);
		}

		// An exclamation run that does not close the tag is literal content.
		output.extend_from_slice(&source[bang..end]);
		i = end;
	}
}

/// Scan a code tag starting at `open` (which points at the `{` of `{%`).
///
/// Content is copied verbatim until the closing `%}`; no nested markers are
/// recognized inside a code region.
/// Returns the position of the first byte after the tag.
fn scan_code(source: &[u8], open: usize, output: &mut Vec<u8>) -> Result<usize, Error> {
	output.extend_from_slice(FRAGMENT_OPEN.as_bytes());

	let mut i = open + 2;
	loop {
		let percent = match memchr::memchr(b'%', &source[i..]) {
			Some(idx) => i + idx,
			None => {
				return Err(error::UnterminatedTag {
					position: open,
					len: 2,
					kind: TagKind::Code,
				}
				.into())
			},
		};
		if source.get(percent + 1) == Some(&b'}') {
			output.extend_from_slice(&source[i..percent]);
			output.extend_from_slice(FRAGMENT_CLOSE.as_bytes());
			return Ok(percent + 2);
		}
		output.extend_from_slice(&source[i..=percent]);
		i = percent + 1;
	}
}

/// Collapse every run of whitespace-only lines to a single newline.
fn collapse_blank_lines(text: &str) -> String {
	BLANK_LINES.replace_all(text, "\n").into_owned()
}
