//! Standard validators for attribute values.
//!
//! A validator is a predicate run on every candidate value before it is
//! accepted (see [`SchemaDecl::validator`](crate::schema::SchemaDecl::validator)).
//! The functions here build the common ones; anything implementing the
//! [`Validator`] signature works.

use std::sync::Arc;

use crate::value::{Value, ValueKind};

/// Pluggable validation predicate invoked on every candidate value.
///
/// Returns `Err` with a human-readable reason to reject the candidate. The
/// absence sentinel is gated by `allow_none` before the validator runs, so
/// validators never see [`Value::None`].
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Validates that a value has the given kind.
pub fn of_kind(kind: ValueKind) -> Validator {
	Arc::new(move |value| {
		if value.kind() == kind {
			Ok(())
		} else {
			Err(format!("expected {kind:?}, got {}", value.type_name()))
		}
	})
}

/// Validates that an integer falls within the inclusive bounds.
pub fn int_bounds(low: i64, high: i64) -> Validator {
	Arc::new(move |value| match value.as_int() {
		Some(n) if (low..=high).contains(&n) => Ok(()),
		Some(n) => Err(format!("must be in {low}..={high}, got {n}")),
		None => Err(format!("expected integer, got {}", value.type_name())),
	})
}

/// Validates that a number falls within the inclusive bounds.
///
/// Accepts both `Int` and `Float` candidates.
pub fn float_bounds(low: f64, high: f64) -> Validator {
	Arc::new(move |value| match value.as_float() {
		Some(n) if n >= low && n <= high => Ok(()),
		Some(n) => Err(format!("must be in {low}..={high}, got {n}")),
		None => Err(format!("expected number, got {}", value.type_name())),
	})
}

/// Validates that an integer is positive (>= 1).
pub fn positive_int(value: &Value) -> Result<(), String> {
	match value {
		Value::Int(n) if *n >= 1 => Ok(()),
		Value::Int(n) => Err(format!("must be at least 1, got {n}")),
		_ => Err("expected integer".to_string()),
	}
}
