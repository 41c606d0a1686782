use super::*;

#[test]
fn starts_empty_and_stays_sparse() {
	let mut store = OverrideStore::new();
	assert!(store.is_empty());
	assert_eq!(store.get("x"), None);

	store.set("x", Value::Int(5));
	assert!(store.contains("x"));
	assert!(!store.contains("y"));
	assert_eq!(store.len(), 1);
	assert_eq!(store.get("x"), Some(&Value::Int(5)));
}

#[test]
fn remove_reverts_to_unset() {
	let mut store = OverrideStore::new();
	store.set("x", Value::Int(5));
	assert_eq!(store.remove("x"), Some(Value::Int(5)));
	assert_eq!(store.remove("x"), None);
	assert!(store.is_empty());
}

#[test]
fn overwrite_replaces_the_entry() {
	let mut store = OverrideStore::new();
	store.set("x", Value::Int(1));
	store.set("x", Value::Int(2));
	assert_eq!(store.get("x"), Some(&Value::Int(2)));
	assert_eq!(store.len(), 1);
}
