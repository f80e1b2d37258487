use std::collections::BTreeMap;

use enact::{trap, FormData, Outcome, Panicked};
use proptest::prelude::*;

// Strategy for form entries with a small key alphabet, so duplicate keys
// show up often.
fn entries_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    let key = prop::sample::select(vec!["a", "b", "c", "email"]).prop_map(str::to_string);
    let value = "[a-z0-9]{0,6}";
    prop::collection::vec((key, value), 0..12)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fault {
    Flat(String),
    Panic(String),
}

impl From<Panicked> for Fault {
    fn from(panic: Panicked) -> Self {
        Fault::Panic(panic.message().to_string())
    }
}

proptest! {
    #[test]
    fn test_flattening_keeps_the_last_duplicate(entries in entries_strategy()) {
        let mut expected = BTreeMap::new();
        for (name, value) in &entries {
            expected.insert(name.clone(), value.clone());
        }

        let form: FormData = entries.into_iter().collect();
        let object = form.into_object();

        let expected = serde_json::to_value(&expected).unwrap();
        assert_eq!(object, expected);
    }

    #[test]
    fn test_flattened_values_are_always_strings(entries in entries_strategy()) {
        let form: FormData = entries.into_iter().collect();
        let object = form.into_object();

        for (_name, value) in object.as_object().unwrap() {
            assert!(value.is_string(), "got: {value:?}");
        }
    }

    #[test]
    fn test_trap_sorts_outcomes_by_arm(message in "[a-zA-Z0-9 .!-]{1,24}") {
        let ok: Outcome<String, Fault> = trap(|| Ok(message.clone()));
        assert_eq!(ok, Outcome::Value(message.clone()));

        let flat: Outcome<String, Fault> = trap(|| Err(Fault::Flat(message.clone())));
        assert_eq!(flat, Outcome::Failure(Fault::Flat(message.clone())));

        let panicked: Outcome<String, Fault> = trap(|| panic!("{}", message));
        assert_eq!(panicked, Outcome::Failure(Fault::Panic(message.clone())));
    }
}
