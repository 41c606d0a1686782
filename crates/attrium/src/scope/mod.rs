//! Scoped overrides with guaranteed restore.
//!
//! Both guards here follow stack discipline: state is captured on entry and
//! restored exactly once in `Drop`, on every exit path including unwinding.
//! Nesting is legal; permits are reference-counted per owner so an inner
//! scope's exit never clears an outer scope's permission.

use crate::error::Result;
use crate::instance::Instance;
use crate::value::Value;

#[cfg(test)]
mod tests;

/// Scope during which constant attributes on one owner accept writes.
///
/// Read-only attributes remain unwritable. Dropping the guard releases the
/// permission exactly once.
#[derive(Debug)]
#[must_use = "the permission lasts only while the guard is held"]
pub struct ConstantWriteScope<'a> {
	owner: &'a Instance,
}

impl<'a> ConstantWriteScope<'a> {
	/// Enters the scope, incrementing the owner's permit count.
	pub fn enter(owner: &'a Instance) -> Self {
		owner.permit_acquire();
		Self { owner }
	}

	/// The owner this scope permits writes on.
	pub fn owner(&self) -> &Instance {
		self.owner
	}
}

impl Drop for ConstantWriteScope<'_> {
	fn drop(&mut self) {
		self.owner.permit_release();
	}
}

/// Scope that temporarily overrides attribute values on one owner.
///
/// On entry every override is validated and applied under an active
/// constant-write permit; the exact prior state of each touched entry
/// (including "was previously unset") is recorded. Dropping the guard
/// restores the recorded entries in reverse order.
#[derive(Debug)]
#[must_use = "the overrides are rolled back when the guard drops"]
pub struct ValueOverrideScope<'a> {
	owner: &'a Instance,
	saved: Vec<(String, Option<Value>)>,
	_permit: ConstantWriteScope<'a>,
}

impl<'a> ValueOverrideScope<'a> {
	/// Enters the scope, applying every override through the normal write
	/// path (validation included; read-only attributes still refuse).
	///
	/// If any override fails, the ones already applied are rolled back and
	/// the error is returned.
	pub fn enter<K, V, I>(owner: &'a Instance, overrides: I) -> Result<Self>
	where
		K: Into<String>,
		V: Into<Value>,
		I: IntoIterator<Item = (K, V)>,
	{
		let mut scope = Self {
			owner,
			saved: Vec::new(),
			_permit: ConstantWriteScope::enter(owner),
		};
		for (name, value) in overrides {
			let name = name.into();
			// Record before writing; drop of the partially-built scope
			// unwinds the applied prefix on failure.
			let prior = owner.inspect(&name)?;
			owner.set(&name, value.into())?;
			scope.saved.push((name, prior));
		}
		Ok(scope)
	}

	/// The owner this scope overrides values on.
	pub fn owner(&self) -> &Instance {
		self.owner
	}
}

impl Drop for ValueOverrideScope<'_> {
	fn drop(&mut self) {
		for (name, prior) in self.saved.drain(..).rev() {
			self.owner.restore_entry(&name, prior);
		}
	}
}
