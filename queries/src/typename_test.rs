use super::*;

#[test]
fn typename_serializes_to_graphql_type_name() {
    assert_eq!(serde_json::to_string(&CreateExperiment::default()).unwrap(), "\"CreateExperiment\"");
    assert_eq!(serde_json::to_string(&NimbusExperimentType::default()).unwrap(), "\"NimbusExperimentType\"");
    assert_eq!(
        serde_json::to_string(&NimbusConfigurationType::default()).unwrap(),
        "\"NimbusConfigurationType\""
    );
    assert_eq!(serde_json::to_string(&NimbusLabelValueType::default()).unwrap(), "\"NimbusLabelValueType\"");
    assert_eq!(
        serde_json::to_string(&NimbusFeatureConfigType::default()).unwrap(),
        "\"NimbusFeatureConfigType\""
    );
    assert_eq!(serde_json::to_string(&NimbusProbeSetType::default()).unwrap(), "\"NimbusProbeSetType\"");
}

#[test]
fn typename_accepts_its_own_literal() {
    let tag: NimbusProbeSetType = serde_json::from_str("\"NimbusProbeSetType\"").unwrap();
    assert_eq!(tag, NimbusProbeSetType::NimbusProbeSetType);
}

#[test]
fn typename_rejects_other_literal() {
    assert!(serde_json::from_str::<NimbusProbeSetType>("\"NimbusLabelValueType\"").is_err());
}

#[test]
fn typename_rejects_case_mismatch() {
    assert!(serde_json::from_str::<CreateExperiment>("\"createExperiment\"").is_err());
}

#[test]
fn typename_rejects_null() {
    assert!(serde_json::from_str::<NimbusExperimentType>("null").is_err());
}

#[test]
fn typename_rejects_enum_object_form() {
    let from_value = serde_json::from_value::<CreateExperiment>(serde_json::json!({"CreateExperiment": null}));
    assert!(from_value.is_err());
    let from_str = serde_json::from_str::<NimbusLabelValueType>(r#"{"NimbusLabelValueType": null}"#);
    assert!(from_str.is_err());
}

#[test]
fn typename_mismatch_names_expected_literal() {
    let err = NimbusProbeSetType::try_from("NimbusLabelValueType".to_owned()).unwrap_err();
    assert_eq!(err.expected, "NimbusProbeSetType");
    assert!(err.to_string().contains("NimbusLabelValueType"));
}
