//! Owner instances and the get/set resolution engine.
//!
//! Every attribute access goes through [`Instance::get`] / [`Instance::set`];
//! there is no direct field access, which is what keeps the validation and
//! mutability contract airtight. Resolution is three-level: the owner's
//! sparse [`OverrideStore`] entry, else the declaring class along the
//! linearization, else the schema default (deep-cloned when the schema says
//! `instantiate`).

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::error::{AttrError, Result};
use crate::registry::{SchemaSlot, TypeDef};
use crate::shared::SharedPool;
use crate::store::OverrideStore;
use crate::value::Value;


/// Post-commit change observer.
///
/// Invoked with the attribute name and the committed value, in registration
/// order, after the write lands and before `set` returns. Dispatch beyond
/// that (dependency graphs, batching) lives outside this crate. Callbacks
/// must not re-enter `set` on the same attribute they observe.
pub type ChangeCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Write origin, used by the constant gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WritePhase {
	/// Ordinary post-construction write.
	Plain,
	/// Write performed while the owner is being constructed.
	Construction,
}

/// An owner object: a constructed instance of a [`TypeDef`].
///
/// Holds the sparse override store behind a per-owner lock. Reads are safe
/// concurrently; a write to the same attribute must be externally ordered
/// against reads of it, since `set` validates before it commits.
pub struct Instance {
	ty: Arc<TypeDef>,
	store: RwLock<OverrideStore>,
	/// Active scoped-override permits. Non-zero lets constant writes pass.
	scope_permits: AtomicU32,
	observers: Mutex<FxHashMap<String, Vec<ChangeCallback>>>,
}

impl TypeDef {
	/// Constructs an instance, applying `kwargs` in the construction phase.
	///
	/// Every key must name a declared attribute. Constant attributes accept
	/// construction-phase writes; read-only attributes refuse even here.
	/// After the keywords are applied, every still-unset `instantiate`
	/// schema is materialized into the override store so that unset reads
	/// are stable and payload mutations never leak into the class default.
	pub fn construct<K, V, I>(self: &Arc<Self>, kwargs: I) -> Result<Instance>
	where
		K: Into<String>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		self.construct_inner(kwargs, None)
	}

	/// Constructs an instance with no keyword overrides.
	pub fn construct_default(self: &Arc<Self>) -> Result<Instance> {
		self.construct_inner(Vec::<(String, Value)>::new(), None)
	}

	/// Like [`construct`](Self::construct), but resolves `instantiate`
	/// defaults through a [`SharedPool`] so a batch of constructions shares
	/// one clone per (type, attribute).
	pub fn construct_shared<K, V, I>(self: &Arc<Self>, kwargs: I, pool: &SharedPool) -> Result<Instance>
	where
		K: Into<String>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		self.construct_inner(kwargs, Some(pool))
	}

	fn construct_inner<K, V, I>(self: &Arc<Self>, kwargs: I, pool: Option<&SharedPool>) -> Result<Instance>
	where
		K: Into<String>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		if self.is_abstract() {
			tracing::warn!(ty = %self.name(), "constructing a type declared abstract");
		}

		let kwargs: Vec<(String, Value)> = kwargs
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		for (name, _) in &kwargs {
			if !self.registry().contains(name) {
				return Err(AttrError::UnknownAttribute { name: name.clone() });
			}
		}

		let instance = Instance {
			ty: self.clone(),
			store: RwLock::new(OverrideStore::new()),
			scope_permits: AtomicU32::new(0),
			observers: Mutex::new(FxHashMap::default()),
		};

		for (name, value) in kwargs {
			instance.set_in(WritePhase::Construction, &name, value)?;
		}

		for (name, slot) in self.registry().iter() {
			let schema = slot.read();
			if !schema.instantiate() || instance.store.read().contains(name) {
				continue;
			}
			let value = match pool {
				Some(pool) => pool.fetch(self.name(), name, schema.default()),
				None => schema.default().deep_clone(),
			};
			instance.store.write().set(name, value);
		}

		Ok(instance)
	}
}

impl Instance {
	/// The type this instance was constructed from.
	pub fn ty(&self) -> &Arc<TypeDef> {
		&self.ty
	}

	/// Resolves the effective value of an attribute.
	///
	/// Set attributes read from this owner's store. Unset attributes fall
	/// back to the schema default: a deep clone when the schema says
	/// `instantiate`, otherwise a shallow copy that shares the referenced
	/// payload with the class and with sibling owners.
	pub fn get(&self, name: &str) -> Result<Value> {
		if let Some(value) = self.store.read().get(name) {
			return Ok(value.clone());
		}
		let slot = self.schema(name)?;
		let schema = slot.read();
		if schema.instantiate() {
			Ok(schema.default().deep_clone())
		} else {
			Ok(schema.default().clone())
		}
	}

	/// Writes an attribute value through the full mutability gate.
	pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
		self.set_in(WritePhase::Plain, name, value.into())
	}

	/// Reports this owner's stored entry without materializing anything.
	///
	/// `None` means "unset: deferring to the class-level chain". Unknown
	/// names are still an error.
	pub fn inspect(&self, name: &str) -> Result<Option<Value>> {
		if !self.known(name) {
			return Err(AttrError::UnknownAttribute {
				name: name.to_string(),
			});
		}
		Ok(self.store.read().get(name).cloned())
	}

	/// Returns the effective schema for an attribute: the owner-local copy
	/// when one has been promoted, else the class-level schema.
	pub fn schema(&self, name: &str) -> Result<SchemaSlot> {
		if let Some(slot) = self.store.read().schema(name) {
			return Ok(slot);
		}
		self.ty.schema(name)
	}

	/// Promotes an owner-local schema copy if the schema opts in.
	///
	/// Copy-on-write: the first call for a `per_instance` attribute clones
	/// the current effective schema into this owner's store; later metadata
	/// writes on this owner mutate only the clone. Attributes without
	/// `per_instance` return the class-level schema unchanged.
	pub fn ensure_per_instance_schema(&self, name: &str) -> Result<SchemaSlot> {
		if let Some(slot) = self.store.read().schema(name) {
			return Ok(slot);
		}
		let class_slot = self.ty.schema(name)?;
		if !class_slot.read().per_instance() {
			return Ok(class_slot);
		}
		let copy: SchemaSlot = Arc::new(RwLock::new(class_slot.read().clone_for_instance()));
		tracing::debug!(ty = %self.ty.name(), attr = name, "promoted per-instance schema copy");
		self.store.write().set_schema(name, copy.clone());
		Ok(copy)
	}

	/// Edits the display label through the per-instance copy-on-write path.
	pub fn set_label(&self, name: &str, label: impl Into<String>) -> Result<()> {
		let slot = self.ensure_per_instance_schema(name)?;
		slot.write().replace_label(label.into());
		Ok(())
	}

	/// Registers a post-commit observer for one attribute.
	pub fn on_change(&self, name: &str, callback: ChangeCallback) -> Result<()> {
		if !self.known(name) {
			return Err(AttrError::UnknownAttribute {
				name: name.to_string(),
			});
		}
		self.observers
			.lock()
			.entry(name.to_string())
			.or_default()
			.push(callback);
		Ok(())
	}

	/// The gated write path.
	///
	/// Order is load-bearing: schema resolution, read-only gate, constant
	/// gate, validation, commit, observers. Writing an identical value still
	/// runs the gates; enforcement is by call context, not by difference.
	pub(crate) fn set_in(&self, phase: WritePhase, name: &str, value: Value) -> Result<()> {
		let slot = self.schema(name)?;
		{
			let schema = slot.read();
			if schema.readonly() {
				return Err(AttrError::ReadOnly {
					name: name.to_string(),
				});
			}
			if schema.constant()
				&& phase == WritePhase::Plain
				&& self.scope_permits.load(Ordering::SeqCst) == 0
			{
				return Err(AttrError::Constant {
					name: name.to_string(),
				});
			}
			schema.validate(&value)?;
		}

		self.store.write().set(name, value.clone());
		tracing::trace!(ty = %self.ty.name(), attr = name, phase = ?phase, "attribute write committed");

		let callbacks: Vec<ChangeCallback> = self
			.observers
			.lock()
			.get(name)
			.map(|cbs| cbs.to_vec())
			.unwrap_or_default();
		for callback in callbacks {
			callback(name, &value);
		}
		Ok(())
	}

	/// Restores a prior store entry verbatim (scoped-override rollback).
	///
	/// Bypasses gates and validation: the prior state was legal when it was
	/// saved. Does not notify observers; rollback is not a change event.
	pub(crate) fn restore_entry(&self, name: &str, prior: Option<Value>) {
		let mut store = self.store.write();
		match prior {
			Some(value) => store.set(name, value),
			None => {
				store.remove(name);
			}
		}
	}

	pub(crate) fn permit_acquire(&self) {
		self.scope_permits.fetch_add(1, Ordering::SeqCst);
	}

	pub(crate) fn permit_release(&self) {
		let prev = self.scope_permits.fetch_sub(1, Ordering::SeqCst);
		debug_assert!(prev > 0, "scope_permits underflow");
	}

	fn known(&self, name: &str) -> bool {
		self.ty.registry().contains(name) || self.store.read().schema(name).is_some()
	}
}

impl core::fmt::Debug for Instance {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Instance")
			.field("ty", &self.ty.name())
			.field("overrides", &self.store.read().len())
			.finish()
	}
}
