//! Attribute schemas and their declarations.
//!
//! A [`SchemaDecl`] is what a type author writes: every field is optional so
//! that a redeclaration in a subtype inherits, field by field, whatever it
//! does not respecify from the shadowed ancestor schema. Finalization binds
//! the declaration to a name exactly once and produces the immutable-identity
//! [`AttributeSchema`] the resolution engine works with.

use crate::error::{AttrError, SchemaError};
use crate::validators::Validator;
use crate::value::Value;


/// Declaration of one named attribute (builder form).
///
/// Fields left unset inherit from the shadowed ancestor schema of the same
/// name, or fall back to the framework defaults when there is none.
#[derive(Clone, Default)]
pub struct SchemaDecl {
	label: Option<String>,
	doc: Option<String>,
	default: Option<Value>,
	allow_none: Option<bool>,
	constant: Option<bool>,
	readonly: Option<bool>,
	instantiate: Option<bool>,
	per_instance: Option<bool>,
	precedence: Option<f64>,
	validator: Option<Validator>,
}

impl SchemaDecl {
	/// Creates an empty declaration; every field inherits or defaults.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default value.
	pub fn default_value(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Sets the display label.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the documentation string.
	pub fn doc(mut self, doc: impl Into<String>) -> Self {
		self.doc = Some(doc.into());
		self
	}

	/// Permits the absence sentinel as a legal value.
	pub fn allow_none(mut self, yes: bool) -> Self {
		self.allow_none = Some(yes);
		self
	}

	/// Restricts writes to construction and override scopes.
	pub fn constant(mut self, yes: bool) -> Self {
		self.constant = Some(yes);
		self
	}

	/// Forbids writes on every path after declaration.
	pub fn readonly(mut self, yes: bool) -> Self {
		self.readonly = Some(yes);
		self
	}

	/// Deep-clones the default into each owner at construction.
	pub fn instantiate(mut self, yes: bool) -> Self {
		self.instantiate = Some(yes);
		self
	}

	/// Allows owner-local schema copies for metadata edits.
	pub fn per_instance(mut self, yes: bool) -> Self {
		self.per_instance = Some(yes);
		self
	}

	/// Sets the ordering hint. Display-only; resolution ignores it.
	pub fn precedence(mut self, precedence: f64) -> Self {
		self.precedence = Some(precedence);
		self
	}

	/// Sets the validation predicate.
	pub fn validator(mut self, validator: Validator) -> Self {
		self.validator = Some(validator);
		self
	}

	/// Binds this declaration to `name`, producing the finalized schema.
	///
	/// Fields not set here inherit from `inherited` (the shadowed ancestor
	/// schema, if any). Normalizes the flag interactions and checks that the
	/// resulting default passes the validator.
	pub(crate) fn finalize(
		self,
		name: &str,
		inherited: Option<&AttributeSchema>,
	) -> Result<AttributeSchema, SchemaError> {
		let default = self
			.default
			.or_else(|| inherited.map(|s| s.default.clone()))
			.unwrap_or(Value::None);
		let readonly = self
			.readonly
			.or(inherited.map(|s| s.readonly))
			.unwrap_or(false);
		let mut constant = self
			.constant
			.or(inherited.map(|s| s.constant))
			.unwrap_or(false);
		let mut instantiate = self
			.instantiate
			.or(inherited.map(|s| s.instantiate))
			.unwrap_or(false);
		let mut allow_none = self
			.allow_none
			.or(inherited.map(|s| s.allow_none))
			.unwrap_or(false);

		// Flag normalization: readonly subsumes constant and makes
		// per-construction instantiation meaningless; an absent default
		// must itself be a legal value.
		if readonly {
			constant = true;
			instantiate = false;
		}
		if default.is_none() {
			allow_none = true;
		}

		let validator = self
			.validator
			.or_else(|| inherited.and_then(|s| s.validator.clone()));

		if !default.is_none()
			&& let Some(validator) = &validator
			&& let Err(reason) = validator(&default)
		{
			return Err(SchemaError::InvalidDefault {
				name: name.to_string(),
				reason,
			});
		}

		Ok(AttributeSchema {
			name: name.to_string(),
			label: self.label.or_else(|| inherited.and_then(|s| s.label.clone())),
			doc: self.doc.or_else(|| inherited.and_then(|s| s.doc.clone())),
			default,
			allow_none,
			constant,
			readonly,
			instantiate,
			per_instance: self
				.per_instance
				.or(inherited.map(|s| s.per_instance))
				.unwrap_or(true),
			precedence: self.precedence.or(inherited.and_then(|s| s.precedence)),
			validator,
		})
	}
}

impl core::fmt::Debug for SchemaDecl {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("SchemaDecl")
			.field("default", &self.default)
			.field("constant", &self.constant)
			.field("readonly", &self.readonly)
			.finish_non_exhaustive()
	}
}

/// Finalized schema of one named attribute.
///
/// The name is bound once at finalization and never changes. Metadata fields
/// (default, label) may be edited afterwards at the class level, or on an
/// owner-local copy produced by [`clone_for_instance`](Self::clone_for_instance).
#[derive(Clone)]
pub struct AttributeSchema {
	name: String,
	label: Option<String>,
	doc: Option<String>,
	default: Value,
	allow_none: bool,
	constant: bool,
	readonly: bool,
	instantiate: bool,
	per_instance: bool,
	precedence: Option<f64>,
	validator: Option<Validator>,
}

impl AttributeSchema {
	/// The bound attribute name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The display label, falling back to the attribute name.
	pub fn label(&self) -> &str {
		self.label.as_deref().unwrap_or(&self.name)
	}

	/// The documentation string, if any.
	pub fn doc(&self) -> Option<&str> {
		self.doc.as_deref()
	}

	/// The current default value.
	pub fn default(&self) -> &Value {
		&self.default
	}

	/// Whether the absence sentinel is a legal value.
	pub fn allow_none(&self) -> bool {
		self.allow_none
	}

	/// Whether writes are restricted to construction and override scopes.
	pub fn constant(&self) -> bool {
		self.constant
	}

	/// Whether writes are forbidden on every path.
	pub fn readonly(&self) -> bool {
		self.readonly
	}

	/// Whether the default is deep-cloned into each owner at construction.
	pub fn instantiate(&self) -> bool {
		self.instantiate
	}

	/// Whether owner-local schema copies may be created.
	pub fn per_instance(&self) -> bool {
		self.per_instance
	}

	/// The display ordering hint, if any.
	pub fn precedence(&self) -> Option<f64> {
		self.precedence
	}

	/// Checks a candidate value against this schema.
	///
	/// The absence sentinel is accepted iff `allow_none`; anything else goes
	/// through the validator. Failure carries the attribute name and the
	/// offending value.
	pub fn validate(&self, candidate: &Value) -> Result<(), AttrError> {
		if candidate.is_none() {
			if self.allow_none {
				return Ok(());
			}
			return Err(AttrError::Validation {
				name: self.name.clone(),
				value: candidate.clone(),
				reason: "attribute does not allow none".to_string(),
			});
		}
		if let Some(validator) = &self.validator
			&& let Err(reason) = validator(candidate)
		{
			return Err(AttrError::Validation {
				name: self.name.clone(),
				value: candidate.clone(),
				reason,
			});
		}
		Ok(())
	}

	/// Produces an independent copy for owner-local metadata edits.
	///
	/// The copy keeps the bound name; the validator is shared (validators
	/// are stateless predicates).
	pub fn clone_for_instance(&self) -> AttributeSchema {
		self.clone()
	}

	/// Replaces the default. Callers validate first; see
	/// [`TypeDef::set_default`](crate::registry::TypeDef::set_default).
	pub(crate) fn replace_default(&mut self, value: Value) {
		if value.is_none() {
			self.allow_none = true;
		}
		self.default = value;
	}

	/// Replaces the display label.
	pub(crate) fn replace_label(&mut self, label: String) {
		self.label = Some(label);
	}
}

impl core::fmt::Debug for AttributeSchema {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("AttributeSchema")
			.field("name", &self.name)
			.field("default", &self.default)
			.field("constant", &self.constant)
			.field("readonly", &self.readonly)
			.field("instantiate", &self.instantiate)
			.field("per_instance", &self.per_instance)
			.finish_non_exhaustive()
	}
}
