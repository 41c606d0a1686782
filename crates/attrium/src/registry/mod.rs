//! Type definitions and the merged schema registry.
//!
//! A [`TypeDef`] is declared once, computes its ancestor linearization once
//! (C3, so lookup never re-walks the graph), and merges its own attribute
//! declarations with inherited ones into a [`SchemaRegistry`]. Names not
//! redeclared locally *share* the ancestor's schema object, so class-level
//! metadata edits on the ancestor stay visible through every subtype until a
//! subtype shadows the name.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{AttrError, Result, SchemaError};
use crate::schema::{AttributeSchema, SchemaDecl};
use crate::value::Value;


/// Shared handle to a finalized schema.
///
/// The lock guards class-level metadata edits ([`TypeDef::set_default`],
/// [`TypeDef::set_label`]) against concurrent readers, per schema object.
pub type SchemaSlot = Arc<RwLock<AttributeSchema>>;

/// Ordered mapping of attribute name to schema, merged across a hierarchy.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
	entries: IndexMap<String, SchemaSlot>,
}

impl SchemaRegistry {
	/// Looks up a schema by name.
	pub fn lookup(&self, name: &str) -> Option<SchemaSlot> {
		self.entries.get(name).cloned()
	}

	/// Returns true if the name is declared anywhere in the hierarchy.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Iterates every declared attribute name, local declarations first,
	/// then inherited ones in linearization order.
	pub fn all_names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	/// Iterates every (name, schema) entry in registry order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaSlot)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns the number of declared attributes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if no attributes are declared.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns names ordered for display: by precedence hint, then registry
	/// order. Precedence has no effect on resolution.
	pub fn display_order(&self) -> Vec<String> {
		let mut names: Vec<(usize, f64, &String)> = self
			.entries
			.iter()
			.enumerate()
			.map(|(i, (name, slot))| (i, slot.read().precedence().unwrap_or(0.0), name))
			.collect();
		names.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
		names.into_iter().map(|(_, _, name)| name.clone()).collect()
	}
}

/// A declared type: name, bases, linearization, and merged registry.
///
/// Construct with [`TypeDef::builder`]; instances are created through
/// [`TypeDef::construct`](crate::instance) once the type is built.
pub struct TypeDef {
	name: String,
	abstract_: bool,
	bases: Vec<Arc<TypeDef>>,
	/// Ancestors in C3 order, self excluded.
	lin: Vec<Arc<TypeDef>>,
	/// This type's own declarations, in declaration order.
	locals: IndexMap<String, SchemaSlot>,
	registry: SchemaRegistry,
}

impl TypeDef {
	/// Starts declaring a new type.
	pub fn builder(name: impl Into<String>) -> TypeDefBuilder {
		TypeDefBuilder {
			name: name.into(),
			abstract_: false,
			bases: Vec::new(),
			decls: Vec::new(),
		}
	}

	/// The type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Whether the type was declared abstract.
	pub fn is_abstract(&self) -> bool {
		self.abstract_
	}

	/// The direct bases, in declaration order.
	pub fn bases(&self) -> &[Arc<TypeDef>] {
		&self.bases
	}

	/// The ancestor linearization (C3 order, self excluded).
	pub fn linearization(&self) -> &[Arc<TypeDef>] {
		&self.lin
	}

	/// The merged schema registry for this type.
	pub fn registry(&self) -> &SchemaRegistry {
		&self.registry
	}

	/// Looks up the class-level schema for an attribute.
	pub fn schema(&self, name: &str) -> Result<SchemaSlot> {
		self.registry.lookup(name).ok_or_else(|| AttrError::UnknownAttribute {
			name: name.to_string(),
		})
	}

	/// Reads the class-level value of an attribute (its current default).
	///
	/// The returned value shares storage with the default, so mutating a
	/// list payload through it edits the class-wide default, exactly as a
	/// class-attribute read would.
	pub fn get(&self, name: &str) -> Result<Value> {
		Ok(self.schema(name)?.read().default().clone())
	}

	/// Replaces the class-level default of an attribute.
	///
	/// Validates the candidate first. Read-only attributes refuse; constant
	/// attributes accept, since the constant gate binds owner writes, not
	/// the declaration's own slot.
	pub fn set_default(&self, name: &str, value: impl Into<Value>) -> Result<()> {
		let value = value.into();
		let slot = self.schema(name)?;
		{
			let schema = slot.read();
			if schema.readonly() {
				return Err(AttrError::ReadOnly {
					name: name.to_string(),
				});
			}
			schema.validate(&value)?;
		}
		tracing::trace!(ty = %self.name, attr = name, "class default replaced");
		slot.write().replace_default(value);
		Ok(())
	}

	/// Replaces the class-level display label of an attribute.
	pub fn set_label(&self, name: &str, label: impl Into<String>) -> Result<()> {
		self.schema(name)?.write().replace_label(label.into());
		Ok(())
	}

	/// Finds the nearest ancestor schema for a name by scanning local
	/// declarations along the linearization.
	fn inherited_schema(lin: &[Arc<TypeDef>], name: &str) -> Option<SchemaSlot> {
		lin.iter().find_map(|a| a.locals.get(name).cloned())
	}
}

impl core::fmt::Debug for TypeDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("TypeDef")
			.field("name", &self.name)
			.field("abstract", &self.abstract_)
			.field("attrs", &self.registry.len())
			.finish()
	}
}

/// Builder for [`TypeDef`].
#[derive(Debug)]
pub struct TypeDefBuilder {
	name: String,
	abstract_: bool,
	bases: Vec<Arc<TypeDef>>,
	decls: Vec<(String, SchemaDecl)>,
}

impl TypeDefBuilder {
	/// Adds a base type. Order matters for linearization ties.
	pub fn extends(mut self, base: &Arc<TypeDef>) -> Self {
		self.bases.push(base.clone());
		self
	}

	/// Marks the type abstract. Constructing it is flagged but not refused.
	pub fn abstract_type(mut self) -> Self {
		self.abstract_ = true;
		self
	}

	/// Declares an attribute on this type.
	pub fn attr(mut self, name: impl Into<String>, decl: SchemaDecl) -> Self {
		self.decls.push((name.into(), decl));
		self
	}

	/// Finalizes the declaration: linearizes the bases, finalizes every
	/// local schema (with field-level inheritance from the shadowed
	/// ancestor), and merges the registry.
	pub fn build(self) -> std::result::Result<Arc<TypeDef>, SchemaError> {
		let lin = linearize(&self.name, &self.bases)?;

		let mut locals: IndexMap<String, SchemaSlot> = IndexMap::new();
		for (name, decl) in self.decls {
			if locals.contains_key(&name) {
				return Err(SchemaError::DuplicateDeclaration {
					ty: self.name,
					name,
				});
			}
			let inherited = TypeDef::inherited_schema(&lin, &name);
			let inherited = inherited.as_ref().map(|slot| slot.read());
			let schema = decl.finalize(&name, inherited.as_deref())?;
			drop(inherited);
			locals.insert(name, Arc::new(RwLock::new(schema)));
		}

		let mut entries = locals.clone();
		for ancestor in &lin {
			for (name, slot) in &ancestor.locals {
				if !entries.contains_key(name) {
					entries.insert(name.clone(), slot.clone());
				}
			}
		}

		Ok(Arc::new(TypeDef {
			name: self.name,
			abstract_: self.abstract_,
			bases: self.bases,
			lin,
			locals,
			registry: SchemaRegistry { entries },
		}))
	}
}

/// Computes the C3 linearization of the ancestors of a type with the given
/// bases (the type itself is excluded).
fn linearize(ty: &str, bases: &[Arc<TypeDef>]) -> std::result::Result<Vec<Arc<TypeDef>>, SchemaError> {
	if bases.is_empty() {
		return Ok(Vec::new());
	}
	let mut seqs: Vec<Vec<Arc<TypeDef>>> = bases
		.iter()
		.map(|b| {
			let mut seq = vec![b.clone()];
			seq.extend(b.lin.iter().cloned());
			seq
		})
		.collect();
	seqs.push(bases.to_vec());

	let mut out = Vec::new();
	loop {
		seqs.retain(|s| !s.is_empty());
		if seqs.is_empty() {
			return Ok(out);
		}
		// A head is good if it appears in no other sequence's tail.
		let head = seqs
			.iter()
			.map(|s| &s[0])
			.find(|&head| {
				!seqs
					.iter()
					.any(|s| s[1..].iter().any(|t| Arc::ptr_eq(t, head)))
			})
			.cloned();
		let Some(head) = head else {
			return Err(SchemaError::InconsistentHierarchy { ty: ty.to_string() });
		};
		for seq in &mut seqs {
			seq.retain(|t| !Arc::ptr_eq(t, &head));
		}
		out.push(head);
	}
}
