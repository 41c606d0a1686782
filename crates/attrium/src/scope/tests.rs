use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::error::AttrError;
use crate::registry::TypeDef;
use crate::schema::SchemaDecl;
use crate::validators;

fn fixture() -> Arc<TypeDef> {
	TypeDef::builder("Scoped")
		.attr("konst", SchemaDecl::new().default_value(1).constant(true))
		.attr("ro", SchemaDecl::new().default_value("fixed").readonly(true))
		.attr(
			"bounded",
			SchemaDecl::new()
				.default_value(1)
				.validator(validators::int_bounds(0, 10)),
		)
		.build()
		.unwrap()
}

#[test]
fn constant_writes_pass_only_while_scope_is_held() {
	let ty = fixture();
	let t = ty.construct([("konst", 5)]).unwrap();

	assert!(t.set("konst", 6).is_err());
	{
		let _scope = ConstantWriteScope::enter(&t);
		t.set("konst", 6).unwrap();
		assert_eq!(t.get("konst").unwrap(), Value::Int(6));
	}
	assert!(matches!(
		t.set("konst", 7).unwrap_err(),
		AttrError::Constant { .. }
	));
	// The scoped write itself persists.
	assert_eq!(t.get("konst").unwrap(), Value::Int(6));
}

#[test]
fn nested_permits_are_reference_counted() {
	let ty = fixture();
	let t = ty.construct_default().unwrap();

	let outer = ConstantWriteScope::enter(&t);
	{
		let _inner = ConstantWriteScope::enter(&t);
	}
	// The inner scope's exit must not clear the outer permission.
	t.set("konst", 3).unwrap();
	drop(outer);
	assert!(t.set("konst", 4).is_err());
}

#[test]
fn readonly_refuses_inside_every_scope() {
	let ty = fixture();
	let t = ty.construct_default().unwrap();

	let _scope = ConstantWriteScope::enter(&t);
	assert!(matches!(
		t.set("ro", "still no").unwrap_err(),
		AttrError::ReadOnly { .. }
	));
	assert!(matches!(
		ValueOverrideScope::enter(&t, [("ro", "still no")]).unwrap_err(),
		AttrError::ReadOnly { .. }
	));
}

#[test]
fn value_overrides_restore_on_drop() {
	let ty = fixture();
	let t = ty.construct([("bounded", 2)]).unwrap();

	{
		let _scope = ValueOverrideScope::enter(&t, [("bounded", 9), ("konst", 8)]).unwrap();
		assert_eq!(t.get("bounded").unwrap(), Value::Int(9));
		assert_eq!(t.get("konst").unwrap(), Value::Int(8));
	}
	// "bounded" had an entry; "konst" was previously unset and reverts to
	// the class default.
	assert_eq!(t.inspect("bounded").unwrap(), Some(Value::Int(2)));
	assert_eq!(t.inspect("konst").unwrap(), None);
	assert_eq!(t.get("konst").unwrap(), Value::Int(1));
}

#[test]
fn overrides_roll_back_when_the_scope_unwinds() {
	let ty = fixture();
	let t = ty.construct([("bounded", 2)]).unwrap();

	let result = catch_unwind(AssertUnwindSafe(|| {
		let _scope = ValueOverrideScope::enter(&t, [("bounded", 7)]).unwrap();
		assert_eq!(t.get("bounded").unwrap(), Value::Int(7));
		panic!("deliberate failure inside the scope");
	}));
	assert!(result.is_err());
	assert_eq!(t.get("bounded").unwrap(), Value::Int(2));
}

#[test]
fn failed_enter_rolls_back_the_applied_prefix() {
	let ty = fixture();
	let t = ty.construct_default().unwrap();

	// First override applies, second is rejected by the validator.
	let err = ValueOverrideScope::enter(&t, [("bounded", 9), ("bounded", 99)]).unwrap_err();
	assert!(matches!(err, AttrError::Validation { .. }));
	assert_eq!(t.inspect("bounded").unwrap(), None);

	// Unknown names also fail enter and leave nothing applied.
	assert!(ValueOverrideScope::enter(&t, [("bogus", 1)]).is_err());
	assert!(t.inspect("bounded").unwrap().is_none());
}

#[test]
fn nested_value_overrides_unwind_in_stack_order() {
	let ty = fixture();
	let t = ty.construct([("bounded", 1)]).unwrap();

	let outer = ValueOverrideScope::enter(&t, [("bounded", 5)]).unwrap();
	{
		let _inner = ValueOverrideScope::enter(&t, [("bounded", 9)]).unwrap();
		assert_eq!(t.get("bounded").unwrap(), Value::Int(9));
	}
	assert_eq!(t.get("bounded").unwrap(), Value::Int(5));
	drop(outer);
	assert_eq!(t.get("bounded").unwrap(), Value::Int(1));
}

#[test]
fn override_scope_keeps_constants_writable_while_held() {
	let ty = fixture();
	let t = ty.construct_default().unwrap();

	let scope = ValueOverrideScope::enter(&t, [("bounded", 3)]).unwrap();
	// The scope's permit also covers direct writes made while it is held.
	t.set("konst", 2).unwrap();
	assert_eq!(scope.owner().get("konst").unwrap(), Value::Int(2));
	drop(scope);
	assert!(t.set("konst", 3).is_err());
}
