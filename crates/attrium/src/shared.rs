//! Construction-time shared-instantiation pool.
//!
//! Batch construction can opt into sharing one clone of each `instantiate`
//! default across the batch instead of deep-cloning per owner. The pool is a
//! construction-time policy object passed to
//! [`TypeDef::construct_shared`](crate::registry::TypeDef), not a resolver
//! mode: resolution itself never consults it.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Cache of one instantiated default per (type, attribute).
///
/// Owners constructed through the same pool share the cached clone's
/// storage; the clone itself is distinct from the class-level default.
#[derive(Debug, Default)]
pub struct SharedPool {
	cache: Mutex<FxHashMap<(String, String), Value>>,
}

impl SharedPool {
	/// Creates an empty pool.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the pooled clone for (type, attribute), creating it from the
	/// schema default on first use.
	pub(crate) fn fetch(&self, ty: &str, attr: &str, default: &Value) -> Value {
		self.cache
			.lock()
			.entry((ty.to_string(), attr.to_string()))
			.or_insert_with(|| default.deep_clone())
			.clone()
	}

	/// Returns the number of pooled entries.
	pub fn len(&self) -> usize {
		self.cache.lock().len()
	}

	/// Returns true if nothing has been pooled yet.
	pub fn is_empty(&self) -> bool {
		self.cache.lock().is_empty()
	}
}
