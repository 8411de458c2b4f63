//! Property-based tests for selectors and rule compilation.

use crate::compile_str;
use crate::selector::Selector;
use confguard_domain::Policy;
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_]{0,8}").unwrap()
}

proptest! {
    #[test]
    fn selector_parse_never_panics(text in ".{0,40}") {
        let _ = Selector::parse(&text);
    }

    #[test]
    fn dotted_keys_select_nested_values(keys in prop::collection::vec(arb_key(), 1..5)) {
        prop_assume!(keys[0] != "data" && keys[0] != "input");

        let mut value = json!("leaf");
        for key in keys.iter().rev() {
            let mut map = serde_json::Map::new();
            map.insert(key.clone(), value);
            value = Value::Object(map);
        }
        let path = keys.join(".");

        let sel = Selector::parse(&path).expect("parse");
        let data = json!({});
        let leaf = json!("leaf");
        prop_assert_eq!(sel.select(&value, &data), vec![&leaf]);
    }

    #[test]
    fn rule_names_are_sorted_and_unique(names in prop::collection::vec(arb_key(), 1..8)) {
        let text: String = names
            .iter()
            .map(|n| format!("[[rule]]\nname = \"{n}\"\n"))
            .collect();
        let policy = compile_str("p.toml", &text).expect("compile");

        let listed = policy.rule_names("main");
        let mut expected = names.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(listed, expected);
    }
}
