use labbook_core::{param_set, LabError, ParamSet, ParamValue, ValueKind};
use labbook_exp::{savename, NamingPolicy};

fn sample() -> ParamSet {
    param_set!("a" => 0.153456453, "b" => 5.0, "mode" => "double")
}

#[test]
fn digits_and_integer_collapse() {
    let name = savename(&sample(), &NamingPolicy::default().with_digits(4)).unwrap();
    assert_eq!(name, "a=0.1535_b=5_mode=double");
}

#[test]
fn keys_are_sorted() {
    let rick = param_set!("never" => "gonna", "give" => "you", "up" => "!");
    assert_eq!(
        savename(&rick, &NamingPolicy::default()).unwrap(),
        "give=you_never=gonna_up=!"
    );
}

#[test]
fn prefix_and_suffix_forms() {
    let d = sample();
    let policy = NamingPolicy::default();
    assert_eq!(
        savename(&d, &policy.clone().with_prefix("n")).unwrap(),
        "n_a=0.153_b=5_mode=double"
    );
    assert_eq!(
        savename(&d, &policy.clone().with_prefix("n/")).unwrap(),
        "n/a=0.153_b=5_mode=double"
    );
    assert_eq!(
        savename(&d, &policy.clone().with_suffix("n")).unwrap(),
        "a=0.153_b=5_mode=double.n"
    );
    assert_eq!(
        savename(&d, &policy.clone().with_prefix("data/n").with_suffix("n")).unwrap(),
        "data/n_a=0.153_b=5_mode=double.n"
    );
    assert_eq!(
        savename(
            &d,
            &policy
                .clone()
                .with_prefix("n")
                .with_suffix("n")
                .with_connector("-")
        )
        .unwrap(),
        "n-a=0.153-b=5-mode=double.n"
    );
}

#[test]
fn windows_style_directory_prefix() {
    let policy = NamingPolicy::default().with_prefix("runs\\");
    assert_eq!(savename(&param_set!("x" => 1), &policy).unwrap(), "runs\\x=1");
}

#[test]
fn allowed_kinds_filter() {
    let policy = NamingPolicy::default().with_allowed([ValueKind::Text]);
    assert_eq!(savename(&sample(), &policy).unwrap(), "mode=double");
}

#[test]
fn lists_excluded_unless_allowed() {
    let params = param_set!("a" => 1, "e" => vec![1, 2]);
    assert_eq!(savename(&params, &NamingPolicy::default()).unwrap(), "a=1");
    let policy = NamingPolicy::default().with_allowed([ValueKind::Int, ValueKind::List]);
    assert_eq!(savename(&params, &policy).unwrap(), "a=1_e=[1, 2]");
}

#[test]
fn accesses_restrict_and_skip_missing_keys() {
    let policy = NamingPolicy::default().with_accesses(["mode", "a", "missing"]);
    assert_eq!(savename(&sample(), &policy).unwrap(), "a=0.153_mode=double");
}

#[test]
fn booleans_and_symbols_are_named() {
    let mut params = param_set!("flag" => true);
    params.insert("model".into(), ParamValue::symbol("linear"));
    assert_eq!(
        savename(&params, &NamingPolicy::default()).unwrap(),
        "flag=true_model=linear"
    );
}

#[test]
fn empty_body_leaves_no_dangling_connector() {
    let params = param_set!("e" => vec![1, 2]);
    let policy = NamingPolicy::default().with_prefix("run").with_suffix("json");
    assert_eq!(savename(&params, &policy).unwrap(), "run.json");
    assert_eq!(savename(&ParamSet::new(), &NamingPolicy::default()).unwrap(), "");
}

#[test]
fn suffix_with_leading_dot_is_not_doubled() {
    let policy = NamingPolicy::default().with_suffix(".json");
    assert_eq!(savename(&param_set!("x" => 1), &policy).unwrap(), "x=1.json");
}

#[test]
fn negative_digits_are_rejected() {
    let err = savename(&sample(), &NamingPolicy::default().with_digits(-1)).unwrap_err();
    assert!(matches!(err, LabError::InvalidPolicy(_)));
    assert_eq!(err.info().code, "savename.digits");
}

#[test]
fn policy_deserializes_with_defaults() {
    let policy: NamingPolicy = serde_json::from_str(r#"{"suffix": "json"}"#).unwrap();
    assert_eq!(policy.digits, 3);
    assert_eq!(policy.connector, "_");
    assert_eq!(policy.suffix, "json");
    assert!(policy.prefix.is_none());
}
