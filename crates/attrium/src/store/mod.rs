//! Per-owner sparse storage for attribute overrides.
//!
//! An [`OverrideStore`] holds only what diverges from the type-level chain:
//! values an owner has set, and owner-local schema copies promoted by the
//! per-instance copy-on-write path. Absence of an entry means "defer to the
//! class-level resolution chain". One store exists per owner, created empty
//! and destroyed with it.

use rustc_hash::FxHashMap;

use crate::registry::SchemaSlot;
use crate::value::Value;

#[cfg(test)]
mod tests;

/// Sparse per-owner value and schema overrides.
///
/// Presence of a value entry is the "instance-set" provenance marker; there
/// is no separate flag.
#[derive(Debug, Default)]
pub struct OverrideStore {
	values: FxHashMap<String, Value>,
	schemas: FxHashMap<String, SchemaSlot>,
}

impl OverrideStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Looks up this owner's value entry, if set.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Returns true if this owner has set the attribute.
	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	/// Inserts or overwrites this owner's value entry. Never touches
	/// ancestor or class-level storage.
	pub fn set(&mut self, name: &str, value: Value) {
		self.values.insert(name.to_string(), value);
	}

	/// Removes this owner's value entry, reverting the attribute to the
	/// class-level chain.
	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.values.remove(name)
	}

	/// Looks up this owner's promoted schema copy, if one exists.
	pub fn schema(&self, name: &str) -> Option<SchemaSlot> {
		self.schemas.get(name).cloned()
	}

	/// Installs an owner-local schema copy.
	pub fn set_schema(&mut self, name: &str, slot: SchemaSlot) {
		self.schemas.insert(name.to_string(), slot);
	}

	/// Returns the number of set value entries.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns true if no value entries are set.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Iterates this owner's set (name, value) entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}
}
