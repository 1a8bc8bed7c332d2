//! Control structure normalization passes, applied before scanning.
//!
//! Templates use the alternative block syntax for control structures
//! (`{% if (x) %}` ... `{% endif %}`).
//! These passes rewrite the source so the scanner can emit well-formed
//! fragments without understanding the control grammar:
//!
//! 1. append a block-terminator colon to control headers,
//! 2. append the same colon to `case`/`default` labels,
//! 3. strip indentation between a `switch` header and the next line,
//! 4. insert an implicit `{% break %}` between case bodies,
//! 5. remove explicit `{% fallthrough %}` markers.
//!
//! The passes are purely textual and order-sensitive; [`normalize()`] runs
//! them exactly once, in the listed order.

use std::sync::LazyLock;

use regex::Regex;

/// Control headers that take a parenthesized expression and a terminating colon.
static CONTROL_COLON: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\{%\s*((?:end\s?if|if|foreach|for|switch|where)\b[^%]*\))\s*%\}").unwrap()
});

/// `case`/`default` labels missing their terminating colon.
static LABEL_COLON: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{%\s*((?:case\b[^%:]*?|default\b))\s*%\}").unwrap());

/// Indented whitespace directly after a `switch` header line.
static SWITCH_GAP: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(\{%\s*switch\b[^%]*%\})\r?\n[ \t]+").unwrap());

/// Any code fragment, capturing its leading keyword.
static FRAGMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{%\s*([A-Za-z_]\w*)[^%]*?%\}").unwrap());

/// Explicit fallthrough markers; they only exist to suppress pass 4.
static FALLTHROUGH: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\s*%\s*fallthrough\s*%\s*\}").unwrap());

/// Normalize control structures in template source.
///
/// Runs all rewrite passes once, in order.
/// The output is meant to be fed to [`scan()`][crate::scan()].
pub fn normalize(text: &str) -> String {
	let text = CONTROL_COLON.replace_all(text, "{% ${1}: %}");
	let text = LABEL_COLON.replace_all(&text, "{% ${1}: %}");
	let text = SWITCH_GAP.replace_all(&text, "${1}\n");
	let text = insert_breaks(&text);
	FALLTHROUGH.replace_all(&text, "").into_owned()
}

/// Insert an implicit `{% break %}` between each case body and the next fragment.
///
/// A `case` or `default` label whose next code fragment is already `break`
/// or `fallthrough` is left alone, as is a fragment on the same line as the
/// label.
fn insert_breaks(text: &str) -> String {
	struct Fragment {
		start: usize,
		end: usize,
		word: String,
	}

	let fragments: Vec<Fragment> = FRAGMENT
		.captures_iter(text)
		.map(|captures| {
			let all = captures.get(0).unwrap();
			Fragment {
				start: all.start(),
				end: all.end(),
				word: captures[1].to_owned(),
			}
		})
		.collect();

	let mut insertions = Vec::new();
	for (label, next) in fragments.iter().zip(fragments.iter().skip(1)) {
		if label.word != "case" && label.word != "default" {
			continue;
		}
		if next.word == "break" || next.word == "fallthrough" {
			continue;
		}
		if !text[label.end..next.start].contains('\n') {
			continue;
		}
		insertions.push(next.start);
	}

	let mut output = String::with_capacity(text.len() + insertions.len() * 12);
	let mut last = 0;
	for position in insertions {
		output.push_str(&text[last..position]);
		output.push_str("{% break %}\n");
		last = position;
	}
	output.push_str(&text[last..]);
	output
}

#[cfg(test)]
mod test {
	use assert2::{assert, check};

	use super::*;

	#[test]
	fn test_control_header_gets_colon() {
		check!(normalize("{% if (x) %}") == "{% if (x): %}");
		check!(normalize("{% foreach (items as item) %}") == "{% foreach (items as item): %}");
		check!(normalize("{% switch (n) %}") == "{% switch (n): %}");
	}

	#[test]
	fn test_control_header_with_colon_is_unchanged() {
		check!(normalize("{% if (x): %}") == "{% if (x): %}");
	}

	#[test]
	fn test_header_without_parens_is_unchanged() {
		check!(normalize("{% endif %}") == "{% endif %}");
		check!(normalize("{% extend('layouts/app') %}") == "{% extend('layouts/app') %}");
	}

	#[test]
	fn test_case_labels_get_colon() {
		check!(normalize("{% case 1 %}\n{% break %}") == "{% case 1: %}\n{% break %}");
		check!(normalize("{% default %}") == "{% default: %}");
	}

	#[test]
	fn test_switch_gap_is_stripped() {
		let input = "{% switch (n) %}\n    {% case 1 %}";
		check!(normalize(input) == "{% switch (n): %}\n{% case 1: %}");
	}

	#[test]
	fn test_implicit_break_insertion() {
		let input = concat!(
			"{% switch (n) %}\n",
			"{% case 1 %}\n",
			"One\n",
			"{% case 2 %}\n",
			"Two\n",
			"{% fallthrough %}\n",
			"{% default %}\n",
			"Three\n",
			"{% endswitch %}\n",
		);
		let output = normalize(input);

		// One break between case 1 and case 2, one before endswitch;
		// the fallthrough marker suppresses the break after case 2.
		assert!(output.matches("{% break %}").count() == 2);
		assert!(!output.contains("fallthrough"));
		assert!(output.contains("One\n{% break %}\n{% case 2: %}"));
		assert!(output.contains("Three\n{% break %}\n{% endswitch %}"));
		assert!(output.contains("Two\n\n{% default: %}"));
	}

	#[test]
	fn test_no_break_before_same_line_fragment() {
		let input = "{% case 1 %} one {% endswitch %}";
		check!(normalize(input) == "{% case 1: %} one {% endswitch %}");
	}

	#[test]
	fn test_explicit_break_is_not_doubled() {
		let input = "{% case 1 %}\nOne\n{% break %}\n{% case 2 %}\nTwo\n{% endswitch %}";
		let output = normalize(input);
		assert!(output.matches("{% break %}").count() == 2);
	}

	#[test]
	fn test_fallthrough_marker_is_removed() {
		check!(normalize("{ % fallthrough % }") == "");
		check!(normalize("a{% fallthrough %}b") == "ab");
	}
}
