//! The data model for values bound to templates.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A map of variable names to values, as passed to a render.
pub type ValueMap = BTreeMap<String, Value>;

/// A zero-argument callable producing a value on demand.
///
/// Callables in render data are invoked once before the render starts,
/// see [`resolve_callables()`].
pub type ValueFn = Arc<dyn Fn() -> Value>;

/// A value bound to a template variable or produced by an expression.
#[derive(Clone)]
pub enum Value {
	/// The absence of a value; displays as the empty string.
	Null,

	/// A boolean.
	Bool(bool),

	/// A signed integer.
	Int(i64),

	/// A floating point number.
	Float(f64),

	/// A string.
	String(String),

	/// An ordered list of values.
	List(Vec<Value>),

	/// A string-keyed map of values.
	Map(ValueMap),

	/// A lazily computed value.
	Func(ValueFn),
}

impl Value {
	/// Get the value as a string slice, if it is a string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Look up an entry by key, if the value is a map.
	pub fn get(&self, key: &str) -> Option<&Value> {
		match self {
			Self::Map(map) => map.get(key),
			_ => None,
		}
	}
}

impl std::fmt::Debug for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Null => f.write_str("Null"),
			Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
			Self::Int(value) => f.debug_tuple("Int").field(value).finish(),
			Self::Float(value) => f.debug_tuple("Float").field(value).finish(),
			Self::String(value) => f.debug_tuple("String").field(value).finish(),
			Self::List(value) => f.debug_tuple("List").field(value).finish(),
			Self::Map(value) => f.debug_tuple("Map").field(value).finish(),
			Self::Func(_) => f.write_str("Func(..)"),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Map(a), Self::Map(b)) => a == b,
			// Callables compare by identity.
			(Self::Func(a), Self::Func(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Null => Ok(()),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::String(value) => f.write_str(value),
			Self::List(values) => {
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{value}")?;
				}
				Ok(())
			},
			Self::Map(map) => {
				for (i, (key, value)) in map.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{key}: {value}")?;
				}
				Ok(())
			},
			Self::Func(func) => write!(f, "{}", func()),
		}
	}
}

impl From<bool> for Value {
	fn from(other: bool) -> Self {
		Self::Bool(other)
	}
}

impl From<i64> for Value {
	fn from(other: i64) -> Self {
		Self::Int(other)
	}
}

impl From<f64> for Value {
	fn from(other: f64) -> Self {
		Self::Float(other)
	}
}

impl From<&str> for Value {
	fn from(other: &str) -> Self {
		Self::String(other.into())
	}
}

impl From<String> for Value {
	fn from(other: String) -> Self {
		Self::String(other)
	}
}

impl From<Vec<Value>> for Value {
	fn from(other: Vec<Value>) -> Self {
		Self::List(other)
	}
}

impl From<ValueMap> for Value {
	fn from(other: ValueMap) -> Self {
		Self::Map(other)
	}
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Value {
	fn from(other: serde_json::Value) -> Self {
		match other {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(value) => Self::Bool(value),
			serde_json::Value::Number(value) => {
				if let Some(value) = value.as_i64() {
					Self::Int(value)
				} else {
					Self::Float(value.as_f64().unwrap_or(f64::NAN))
				}
			},
			serde_json::Value::String(value) => Self::String(value),
			serde_json::Value::Array(values) => Self::List(values.into_iter().map(Self::from).collect()),
			serde_json::Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
		}
	}
}

/// Invoke every callable in a value tree, recursively.
///
/// Render data may carry [`Value::Func`] entries for values that are expensive
/// to compute. They are resolved once, before the render begins, so a value
/// referenced from several blocks is only computed one time.
pub fn resolve_callables(value: Value) -> Value {
	match value {
		Value::Func(func) => resolve_callables(func()),
		Value::List(values) => Value::List(values.into_iter().map(resolve_callables).collect()),
		Value::Map(map) => Value::Map(map.into_iter().map(|(k, v)| (k, resolve_callables(v))).collect()),
		other => other,
	}
}
