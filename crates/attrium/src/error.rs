//! Error types for schema declaration and attribute access.

use thiserror::Error;

use crate::value::Value;

/// Errors raised while declaring a type or finalizing its schemas.
///
/// These are fatal at type-definition time: a type whose declaration fails
/// must not be used.
#[derive(Debug, Error)]
pub enum SchemaError {
	/// The declared default was rejected by the schema's own validator.
	#[error("invalid default for attribute '{name}': {reason}")]
	InvalidDefault {
		/// The attribute being declared.
		name: String,
		/// Why the validator rejected the default.
		reason: String,
	},

	/// The same attribute name was declared twice on one type.
	#[error("duplicate declaration of attribute '{name}' on type '{ty}'")]
	DuplicateDeclaration {
		/// The declaring type.
		ty: String,
		/// The duplicated attribute name.
		name: String,
	},

	/// The base types cannot be merged into a consistent linearization.
	#[error("cannot linearize bases of type '{ty}': inconsistent hierarchy")]
	InconsistentHierarchy {
		/// The type whose bases failed to linearize.
		ty: String,
	},
}

/// Errors raised by attribute access on a live type or instance.
///
/// Every variant reflects a caller-correctable programming error; none is
/// transient and none is retried.
#[derive(Debug, Error)]
pub enum AttrError {
	/// The name is not declared anywhere in the type's hierarchy.
	#[error("unknown attribute: {name}")]
	UnknownAttribute {
		/// The unrecognized attribute name.
		name: String,
	},

	/// A candidate value was rejected by the schema's validator.
	#[error("invalid value for attribute '{name}': {reason} (got {value})")]
	Validation {
		/// The attribute whose validator rejected the value.
		name: String,
		/// The rejected value.
		value: Value,
		/// Why the validator rejected it.
		reason: String,
	},

	/// Write to a read-only attribute. No call path may pass this gate.
	#[error("attribute '{name}' is read-only")]
	ReadOnly {
		/// The read-only attribute name.
		name: String,
	},

	/// Write to a constant attribute outside construction or an override scope.
	#[error("attribute '{name}' is constant; set it at construction or inside an override scope")]
	Constant {
		/// The constant attribute name.
		name: String,
	},
}

/// Result type for attribute access operations.
pub type Result<T> = std::result::Result<T, AttrError>;
