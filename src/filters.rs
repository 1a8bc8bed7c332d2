//! Output filters and the built-in filter set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::value::Value;

/// A filter: a pure transformation of one value into another.
pub type FilterFn = Arc<dyn Fn(&Value) -> Value>;

/// The built-in filters every engine starts with.
///
/// * `lower` / `upper` — ASCII-insensitive case mapping over the string form,
/// * `trim` — strip leading and trailing whitespace,
/// * `capitalize` — upper-case the first character of the string form,
/// * `length` — element count for lists and maps, character count for strings.
pub fn builtin_filters() -> HashMap<String, FilterFn> {
	let mut filters: HashMap<String, FilterFn> = HashMap::new();
	filters.insert("lower".into(), Arc::new(|v| v.to_string().to_lowercase().into()));
	filters.insert("upper".into(), Arc::new(|v| v.to_string().to_uppercase().into()));
	filters.insert("trim".into(), Arc::new(|v| v.to_string().trim().into()));
	filters.insert("capitalize".into(), Arc::new(capitalize));
	filters.insert("length".into(), Arc::new(length));
	filters
}

fn capitalize(value: &Value) -> Value {
	let text = value.to_string();
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => {
			let mut output: String = first.to_uppercase().collect();
			output.push_str(chars.as_str());
			output.into()
		},
		None => "".into(),
	}
}

fn length(value: &Value) -> Value {
	let count = match value {
		Value::List(values) => values.len(),
		Value::Map(map) => map.len(),
		other => other.to_string().chars().count(),
	};
	Value::Int(count as i64)
}

#[cfg(test)]
mod test {
	use assert2::check;

	use super::*;

	fn apply(name: &str, value: &Value) -> Value {
		builtin_filters()[name](value)
	}

	#[test]
	fn test_case_filters() {
		check!(apply("lower", &"MiXeD".into()) == "mixed".into());
		check!(apply("upper", &"MiXeD".into()) == "MIXED".into());
		check!(apply("capitalize", &"wide world".into()) == "Wide world".into());
		check!(apply("capitalize", &"".into()) == "".into());
	}

	#[test]
	fn test_trim() {
		check!(apply("trim", &"  padded \n".into()) == "padded".into());
	}

	#[test]
	fn test_length() {
		check!(apply("length", &"héllo".into()) == Value::Int(5));
		check!(apply("length", &Value::List(vec![Value::Null, Value::Null])) == Value::Int(2));
		check!(apply("length", &Value::Int(1234)) == Value::Int(4));
	}
}
