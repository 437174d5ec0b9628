use labbook_core::errors::{ErrorInfo, LabError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("key", "alpha")
        .with_context("reason", "example")
}

#[test]
fn invalid_template_surface() {
    let err = LabError::InvalidTemplate(sample_info("expand.mixed-axis", "mixed axis"));
    assert_eq!(err.info().code, "expand.mixed-axis");
    assert!(err.info().context.contains_key("key"));
}

#[test]
fn invalid_policy_surface() {
    let err = LabError::InvalidPolicy(sample_info("savename.digits", "negative digits"));
    assert_eq!(err.info().code, "savename.digits");
    assert!(err.to_string().starts_with("invalid policy: negative digits"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = LabError::Load(
        ErrorInfo::new("params.parse", "bad json")
            .with_context("path", "data/x.json")
            .with_hint("check the file"),
    );
    assert_eq!(
        err.to_string(),
        "load failure: bad json (code: params.parse) | context: [path=data/x.json] | hint: check the file"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = LabError::Extractor(ErrorInfo::new("collect.derived", "boom"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Extractor");
    assert_eq!(json["detail"]["code"], "collect.derived");
    let decoded: LabError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn io_helper_records_path() {
    let err = LabError::io("store.write", std::path::Path::new("/tmp/x"), "denied");
    assert!(matches!(err, LabError::Io(_)));
    assert_eq!(err.info().context.get("path").map(String::as_str), Some("/tmp/x"));
}
