use labbook_core::{ParamSet, ParamValue};
use labbook_exp::{count, expand};
use proptest::prelude::*;

fn template_strategy() -> impl Strategy<Value = ParamSet> {
    let value = prop_oneof![
        any::<i32>().prop_map(ParamValue::from),
        "[a-z]{1,3}".prop_map(ParamValue::from),
        proptest::collection::vec(any::<i8>().prop_map(|v| ParamValue::from(i32::from(v))), 0..4)
            .prop_map(ParamValue::List),
    ];
    proptest::collection::btree_map("[a-e]{1,2}", value, 0..5)
}

proptest! {
    #[test]
    fn count_matches_expansion_length(template in template_strategy()) {
        let expected: usize = template
            .values()
            .map(|value| value.as_list().map(|items| items.len()).unwrap_or(1))
            .product();
        prop_assert_eq!(count(&template).unwrap(), expected);
        prop_assert_eq!(expand(&template).unwrap().len(), expected);
    }

    #[test]
    fn every_configuration_keeps_the_key_set(template in template_strategy()) {
        for config in expand(&template).unwrap() {
            prop_assert!(config.keys().eq(template.keys()));
            for (key, value) in &config {
                match &template[key] {
                    ParamValue::List(options) => prop_assert!(options.contains(value)),
                    constant => prop_assert_eq!(constant, value),
                }
            }
        }
    }
}
