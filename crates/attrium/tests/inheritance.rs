//! Inheritance behavior across a multi-level hierarchy.

use attrium::{SchemaDecl, TypeDef, Value, validators};

/// A <- B <- C chain where each level redeclares part of the surface.
fn chain() -> (std::sync::Arc<TypeDef>, std::sync::Arc<TypeDef>, std::sync::Arc<TypeDef>) {
	let a = TypeDef::builder("A")
		.attr("a", SchemaDecl::new().default_value("something unique"))
		.attr("b", SchemaDecl::new())
		.attr(
			"c",
			SchemaDecl::new()
				.default_value(4)
				.validator(validators::int_bounds(0, 100))
				.constant(true),
		)
		.build()
		.unwrap();
	let b = TypeDef::builder("B")
		.extends(&a)
		.attr("a", SchemaDecl::new().default_value("overridden"))
		.build()
		.unwrap();
	let c = TypeDef::builder("C")
		.extends(&b)
		.attr("c", SchemaDecl::new().default_value(8))
		.build()
		.unwrap();
	(a, b, c)
}

#[test]
fn redeclaration_overrides_and_silence_inherits() {
	let (a, b, _c) = chain();
	assert_eq!(b.get("a").unwrap(), Value::from("overridden"));
	assert_eq!(b.get("b").unwrap(), a.get("b").unwrap());
	assert_eq!(b.get("c").unwrap(), a.get("c").unwrap());
}

#[test]
fn redeclaration_field_inherits_flags_and_validator() {
	let (_a, _b, c) = chain();
	let slot = c.schema("c").unwrap();
	// Only the default was respecified two levels down; constant and the
	// validator come from A's declaration.
	assert!(slot.read().constant());
	assert_eq!(c.get("c").unwrap(), Value::Int(8));
	assert!(c.set_default("c", 200).is_err());
}

#[test]
fn instances_resolve_through_the_nearest_declaration() {
	let (a, _b, c) = chain();
	let inst = c.construct_default().unwrap();
	assert_eq!(inst.get("a").unwrap(), Value::from("overridden"));
	assert_eq!(inst.get("c").unwrap(), Value::Int(8));

	// An ancestor-level default change reaches instances only for names the
	// subtype chain never redeclared.
	a.set_default("b", "filled in").unwrap();
	assert_eq!(inst.get("b").unwrap(), Value::from("filled in"));
	a.set_default("a", "changed").unwrap();
	assert_eq!(inst.get("a").unwrap(), Value::from("overridden"));
}

#[test]
fn instance_overrides_are_insulated_from_class_edits() {
	let (a, _b, c) = chain();
	let inst = c.construct_default().unwrap();

	inst.set("b", "mine").unwrap();
	a.set_default("b", "theirs").unwrap();
	assert_eq!(inst.get("b").unwrap(), Value::from("mine"));

	// Sibling instances still follow the class.
	let other = c.construct_default().unwrap();
	assert_eq!(other.get("b").unwrap(), Value::from("theirs"));
}

#[test]
fn constructing_an_abstract_type_is_permitted_but_flagged() {
	let base = TypeDef::builder("AbstractBase")
		.abstract_type()
		.attr("x", SchemaDecl::new().default_value(1))
		.build()
		.unwrap();
	assert!(base.is_abstract());

	let concrete = TypeDef::builder("Concrete").extends(&base).build().unwrap();
	assert!(!concrete.is_abstract());
	assert_eq!(concrete.construct_default().unwrap().get("x").unwrap(), Value::Int(1));
}
