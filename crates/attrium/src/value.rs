//! Attribute value payloads.
//!
//! [`Value`] is the opaque payload stored for every attribute. Scalars are
//! plain copies; [`Value::List`] is a shared, lockable payload so that owners
//! which have not overridden an attribute can observe mutations made through
//! siblings (the `instantiate = false` sharing model). [`Value::deep_clone`]
//! severs that sharing and is what `instantiate = true` uses.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Shared, mutable list payload.
///
/// Shallow clones of a [`Value::List`] alias the same storage; use
/// [`Value::deep_clone`] to obtain an independent copy.
pub type SharedList = Arc<RwLock<Vec<Value>>>;

/// The value of an attribute.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Absence sentinel. Legal only for schemas with `allow_none`.
	#[default]
	None,
	/// Boolean value (true/false).
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
	/// String value.
	Str(String),
	/// List value with shared interior storage.
	List(SharedList),
}

/// The kind of a [`Value`], used by stock validators for type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	/// Absence sentinel.
	None,
	/// Boolean kind.
	Bool,
	/// Integer kind.
	Int,
	/// Floating-point kind.
	Float,
	/// String kind.
	Str,
	/// List kind.
	List,
}

impl Value {
	/// Creates a list value with fresh shared storage.
	pub fn list(items: Vec<Value>) -> Self {
		Value::List(Arc::new(RwLock::new(items)))
	}

	/// Returns true if this is the absence sentinel.
	pub fn is_none(&self) -> bool {
		matches!(self, Value::None)
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value if this is a `Float` variant.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			Value::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(v) => Some(v),
			_ => None,
		}
	}

	/// Returns a handle to the shared list storage if this is a `List` variant.
	pub fn as_list(&self) -> Option<SharedList> {
		match self {
			Value::List(v) => Some(v.clone()),
			_ => None,
		}
	}

	/// Returns the kind of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::None => ValueKind::None,
			Value::Bool(_) => ValueKind::Bool,
			Value::Int(_) => ValueKind::Int,
			Value::Float(_) => ValueKind::Float,
			Value::Str(_) => ValueKind::Str,
			Value::List(_) => ValueKind::List,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::None => "none",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Str(_) => "string",
			Value::List(_) => "list",
		}
	}

	/// Produces a copy that shares no storage with `self`.
	///
	/// Scalars copy as usual; list storage is re-allocated and its elements
	/// deep-cloned recursively.
	pub fn deep_clone(&self) -> Value {
		match self {
			Value::List(items) => {
				let copied = items.read().iter().map(Value::deep_clone).collect();
				Value::List(Arc::new(RwLock::new(copied)))
			}
			other => other.clone(),
		}
	}

	/// Returns true if `self` and `other` alias the same shared storage.
	///
	/// Always false for scalar variants, which have no shared storage.
	pub fn shares_storage_with(&self, other: &Value) -> bool {
		match (self, other) {
			(Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::None, Value::None) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b) || *a.read() == *b.read(),
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::None => f.write_str("none"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Str(v) => write!(f, "{v:?}"),
			Value::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.read().iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
		}
	}
}

// Serialization boundary for external persisters: they only ever see values
// through `get`, so `Serialize` on the payload is all that is needed here.
impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Value::None => serializer.serialize_unit(),
			Value::Bool(v) => serializer.serialize_bool(*v),
			Value::Int(v) => serializer.serialize_i64(*v),
			Value::Float(v) => serializer.serialize_f64(*v),
			Value::Str(v) => serializer.serialize_str(v),
			Value::List(items) => {
				let items = items.read();
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items.iter() {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v.into())
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Str(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Str(v.to_string())
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::list(v)
	}
}
