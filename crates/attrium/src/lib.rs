//! Declarative typed attributes with inheritance, validation, and scoped
//! overrides.
//!
//! A type author declares named, validated attributes on a [`TypeDef`];
//! constructed [`Instance`]s override individual values while inheriting the
//! rest down the hierarchy. The crate provides:
//!
//! - **Schemas**: per-attribute default, validator, and mutability policy
//!   ([`SchemaDecl`], [`AttributeSchema`])
//! - **Registry**: per-type merged name→schema map with C3 linearization
//!   ([`TypeDef`], [`SchemaRegistry`])
//! - **Resolution**: instance → declaring class → schema default, with
//!   copy-on-write for both values and per-owner schema metadata
//!   ([`Instance`])
//! - **Scoped overrides**: drop-guarded temporary permissions and value
//!   substitutions ([`ConstantWriteScope`], [`ValueOverrideScope`])
//!
//! # Example
//!
//! ```
//! use attrium::{SchemaDecl, TypeDef, Value, validators};
//!
//! let ty = TypeDef::builder("Widget")
//! 	.attr(
//! 		"width",
//! 		SchemaDecl::new()
//! 			.default_value(80)
//! 			.validator(validators::int_bounds(1, 1000)),
//! 	)
//! 	.build()
//! 	.unwrap();
//!
//! let w = ty.construct([("width", 120)]).unwrap();
//! assert_eq!(w.get("width").unwrap(), Value::Int(120));
//! assert!(w.set("width", 0).is_err());
//! ```

pub mod error;
pub mod instance;
pub mod registry;
pub mod schema;
pub mod scope;
pub mod shared;
pub mod store;
pub mod validators;
pub mod value;

pub use error::{AttrError, Result, SchemaError};
pub use instance::{ChangeCallback, Instance};
pub use registry::{SchemaRegistry, SchemaSlot, TypeDef, TypeDefBuilder};
pub use schema::{AttributeSchema, SchemaDecl};
pub use scope::{ConstantWriteScope, ValueOverrideScope};
pub use shared::SharedPool;
pub use store::OverrideStore;
pub use validators::Validator;
pub use value::{SharedList, Value, ValueKind};
