use proptest::prelude::*;
use transjob::args::{ArgumentSet, OptionValue};
use transjob::types::ArgStyle;

#[derive(Debug, Clone)]
enum Value {
    Absent,
    Flag(bool),
    Word(String),
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Absent),
        any::<bool>().prop_map(Value::Flag),
        "[a-z0-9][a-z0-9:._]{0,7}".prop_map(Value::Word),
    ]
}

fn style_strategy() -> impl Strategy<Value = ArgStyle> {
    prop_oneof![Just(ArgStyle::Flag), Just(ArgStyle::Assignment)]
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, Value, bool)>> {
    proptest::collection::btree_map("[a-z][a-z0-9_]{0,5}", (value_strategy(), any::<bool>()), 0..8)
        .prop_map(|m| m.into_iter().map(|(k, (v, d))| (k, v, d)).collect())
}

proptest! {
    #[test]
    fn parse_of_serialize_yields_the_emitted_options(
        style in style_strategy(),
        entries in entries_strategy(),
    ) {
        let mut set = ArgumentSet::new(style);
        let mut expected = Vec::new();

        for (name, value, disabled) in &entries {
            let option = match value {
                Value::Absent => OptionValue::Absent,
                Value::Flag(b) => OptionValue::Bool(*b),
                Value::Word(w) => OptionValue::Text(w.clone()),
            };
            set.set(name.as_str(), option.clone());
            if *disabled {
                set.toggle_disabled(name);
            } else if option.is_emitted() {
                expected.push((name.clone(), option));
            }
        }

        let parsed = set.parse(&set.serialize());
        let got: Vec<(String, OptionValue)> = parsed
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();

        prop_assert_eq!(got, expected);
    }

    #[test]
    fn disabling_twice_restores_emission(
        style in style_strategy(),
        entries in entries_strategy(),
    ) {
        let mut set = ArgumentSet::new(style);
        for (name, value, _) in &entries {
            if let Value::Word(w) = value {
                set.set(name.as_str(), w.as_str());
            }
        }
        let before = set.emit();

        for (name, _, _) in &entries {
            prop_assert!(set.toggle_disabled(name));
        }
        prop_assert!(set.effective_names().is_empty());

        for (name, _, _) in &entries {
            prop_assert!(!set.toggle_disabled(name));
        }
        prop_assert_eq!(set.emit(), before);
    }
}
