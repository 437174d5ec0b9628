use labbook_core::{ParamSet, ParamValue, Parameters};
use labbook_exp::{savename, NamingPolicy};
use proptest::prelude::*;

proptest! {
    #[test]
    fn output_keys_are_ascending(entries in proptest::collection::btree_map("[a-z]{1,6}", any::<i32>(), 1..8)) {
        let params: ParamSet = entries
            .iter()
            .map(|(key, value)| (key.clone(), ParamValue::from(*value)))
            .collect();
        let name = savename(&params, &NamingPolicy::default()).unwrap();
        let keys: Vec<&str> = name
            .split('_')
            .map(|pair| pair.split('=').next().unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys.len(), entries.len());
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn integral_roundings_drop_the_decimal_point(value in -1.0e6f64..1.0e6, digits in 0i32..6) {
        let mut params = ParamSet::new();
        params.insert("x".into(), ParamValue::Float(value));
        let name = savename(&params, &NamingPolicy::default().with_digits(digits)).unwrap();
        let token = name.strip_prefix("x=").unwrap();
        let scale = 10f64.powi(digits);
        let rounded = (value * scale).round_ties_even() / scale;
        if rounded == rounded.round() {
            prop_assert!(!token.contains('.'));
            prop_assert_eq!(token.to_string(), format!("{}", rounded as i64));
        }
    }

    #[test]
    fn adapter_key_order_is_irrelevant(entries in proptest::collection::btree_map("[a-z]{1,4}", any::<i16>(), 1..6)) {
        let params: ParamSet = entries
            .iter()
            .map(|(key, value)| (key.clone(), ParamValue::from(i32::from(*value))))
            .collect();
        let reversed = Reversed(params.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect());
        let policy = NamingPolicy::default();
        prop_assert_eq!(savename(&params, &policy).unwrap(), savename(&reversed, &policy).unwrap());
    }
}

/// Exposes its keys in reverse order.
struct Reversed(Vec<(String, ParamValue)>);

impl Parameters for Reversed {
    fn all_keys(&self) -> Vec<&str> {
        self.0.iter().map(|(key, _)| key.as_str()).collect()
    }

    fn access(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, value)| value)
    }
}
