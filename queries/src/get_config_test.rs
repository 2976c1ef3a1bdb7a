use super::*;
use serde_json::{Value, json};

// =============================================================
// Helpers
// =============================================================

fn label_value(label: &str, value: &str) -> Value {
    json!({"__typename": "NimbusLabelValueType", "label": label, "value": value})
}

fn feature(id: &str, slug: &str, application: Value) -> Value {
    json!({
        "__typename": "NimbusFeatureConfigType",
        "id": id,
        "name": slug.to_uppercase(),
        "slug": slug,
        "description": "A feature",
        "application": application,
        "ownerEmail": "owner@example.com",
        "schema": "{\"type\": \"object\"}"
    })
}

fn full_config() -> Value {
    json!({
        "nimbusConfig": {
            "__typename": "NimbusConfigurationType",
            "application": [label_value("Firefox Desktop", "DESKTOP"), label_value("Firefox for Android", "FENIX")],
            "channel": [label_value("Nightly", "NIGHTLY"), null, label_value("Release", "RELEASE")],
            "featureConfig": [feature("1", "picture-up", json!("DESKTOP")), feature("2", "homescreen", json!("FENIX"))],
            "firefoxMinVersion": [label_value("Firefox 83", "FIREFOX_83")],
            "probeSets": [{"__typename": "NimbusProbeSetType", "name": "Pinned Tabs", "slug": "pinned-tabs"}],
            "targetingConfigSlug": [label_value("No targeting", "")],
            "hypothesisDefault": "If we <do this/build this/create this change in the experiment> for <these users>, then we will see <this outcome>.",
            "documentationLink": [label_value("Design Document", "DESIGN_DOC")]
        }
    })
}

fn empty_lists_config() -> Value {
    json!({
        "nimbusConfig": {
            "__typename": "NimbusConfigurationType",
            "application": null,
            "channel": null,
            "featureConfig": null,
            "firefoxMinVersion": null,
            "probeSets": null,
            "targetingConfigSlug": null,
            "hypothesisDefault": null,
            "documentationLink": null
        }
    })
}

fn decode(value: Value) -> Result<ResponseData, serde_json::Error> {
    serde_json::from_value(value)
}

fn config(value: Value) -> NimbusConfig {
    decode(value).unwrap().nimbus_config.unwrap()
}

// =============================================================
// Request body
// =============================================================

#[test]
fn build_query_sends_empty_variables() {
    let body = GetConfigQuery::build_query(Variables::default());
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["operationName"], json!("getConfig"));
    assert_eq!(value["variables"], json!({}));
    assert!(value["query"].as_str().unwrap().starts_with("query getConfig {"));
}

#[test]
fn document_selects_typename_on_every_object() {
    // nimbusConfig, five label/value lists, featureConfig, probeSets
    assert_eq!(QUERY.matches("__typename").count(), 8);
}

// =============================================================
// Decoding
// =============================================================

#[test]
fn null_config_is_conforming_empty_result() {
    let data = decode(json!({"nimbusConfig": null})).unwrap();
    assert!(data.nimbus_config.is_none());
}

#[test]
fn null_feature_config_element_is_conforming() {
    let mut value = empty_lists_config();
    value["nimbusConfig"]["featureConfig"] = json!([
        null,
        {
            "__typename": "NimbusFeatureConfigType",
            "id": "1",
            "name": "F",
            "slug": "f",
            "description": null,
            "application": null,
            "ownerEmail": null,
            "schema": null
        }
    ]);

    let cfg = config(value);
    let list = cfg.feature_config.as_ref().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list[0].is_none());
    let feature = list[1].as_ref().unwrap();
    assert_eq!(feature.slug, "f");
    assert_eq!(feature.application, None);
    assert!(feature.parsed_schema().is_none());
}

#[test]
fn decodes_full_config() {
    let cfg = config(full_config());
    assert_eq!(cfg.applications().count(), 2);
    assert_eq!(cfg.probe_sets().next().unwrap().slug, "pinned-tabs");
    assert!(cfg.hypothesis_default.as_deref().unwrap().starts_with("If we"));
    let feature = cfg.feature_config_by_slug("homescreen").unwrap();
    assert_eq!(feature.application, Some(NimbusFeatureConfigApplication::Fenix));
}

#[test]
fn list_null_and_element_null_stay_distinct() {
    let cfg = config(full_config());
    assert_eq!(cfg.channel.as_ref().map(Vec::len), Some(3));
    assert!(cfg.channel.as_ref().unwrap()[1].is_none());

    let empty = config(empty_lists_config());
    assert!(empty.channel.is_none());

    let mut value = empty_lists_config();
    value["nimbusConfig"]["channel"] = json!([]);
    let present_but_empty = config(value);
    assert_eq!(present_but_empty.channel, Some(Vec::new()));
    assert_ne!(present_but_empty, empty);
}

#[test]
fn rejects_missing_nullable_list() {
    let mut value = full_config();
    value["nimbusConfig"].as_object_mut().unwrap().remove("documentationLink");
    let err = decode(value).unwrap_err();
    assert!(err.to_string().contains("missing field `documentationLink`"));
}

#[test]
fn rejects_missing_nullable_label() {
    let mut value = full_config();
    value["nimbusConfig"]["application"][0].as_object_mut().unwrap().remove("label");
    assert!(decode(value).is_err());
}

#[test]
fn rejects_missing_config_field() {
    assert!(decode(json!({})).is_err());
}

#[test]
fn rejects_null_feature_id() {
    let mut value = full_config();
    value["nimbusConfig"]["featureConfig"][0]["id"] = Value::Null;
    assert!(decode(value).is_err());
}

#[test]
fn rejects_null_probe_set_name() {
    let mut value = full_config();
    value["nimbusConfig"]["probeSets"][0]["name"] = Value::Null;
    assert!(decode(value).is_err());
}

#[test]
fn rejects_label_value_with_wrong_typename() {
    let mut value = full_config();
    value["nimbusConfig"]["channel"][0]["__typename"] = json!("NimbusProbeSetType");
    assert!(decode(value).is_err());
}

#[test]
fn rejects_unknown_feature_application() {
    let mut value = full_config();
    value["nimbusConfig"]["featureConfig"][0]["application"] = json!("KLAR");
    assert!(decode(value).is_err());
}

#[test]
fn round_trip_reproduces_payload() {
    let data = decode(full_config()).unwrap();
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value, full_config());
    assert_eq!(decode(value).unwrap(), data);
}

#[test]
fn round_trip_keeps_null_lists() {
    let data = decode(empty_lists_config()).unwrap();
    assert_eq!(serde_json::to_value(&data).unwrap(), empty_lists_config());
}

// =============================================================
// Accessors
// =============================================================

#[test]
fn accessors_skip_absent_entries() {
    let cfg = config(full_config());
    let channels: Vec<_> = cfg.channels().filter_map(LabelValue::pair).collect();
    assert_eq!(channels, vec![("Nightly", "NIGHTLY"), ("Release", "RELEASE")]);
}

#[test]
fn accessors_on_null_lists_yield_nothing() {
    let cfg = config(empty_lists_config());
    assert_eq!(cfg.applications().count(), 0);
    assert_eq!(cfg.channels().count(), 0);
    assert_eq!(cfg.firefox_min_versions().count(), 0);
    assert_eq!(cfg.targeting_configs().count(), 0);
    assert_eq!(cfg.documentation_links().count(), 0);
    assert_eq!(cfg.feature_configs().count(), 0);
    assert_eq!(cfg.probe_sets().count(), 0);
    assert!(cfg.feature_config_by_slug("picture-up").is_none());
}

#[test]
fn pair_requires_both_halves() {
    let mut option = LabelValue::new("Nightly", "NIGHTLY");
    assert_eq!(option.pair(), Some(("Nightly", "NIGHTLY")));
    option.label = None;
    assert_eq!(option.pair(), None);
}

#[test]
fn label_for_finds_matching_value() {
    let cfg = config(full_config());
    assert_eq!(label_for(cfg.firefox_min_versions(), "FIREFOX_83"), Some("Firefox 83"));
    assert_eq!(label_for(cfg.targeting_configs(), ""), Some("No targeting"));
    assert_eq!(label_for(cfg.channels(), "BETA"), None);
}

#[test]
fn parsed_schema_parses_json_text() {
    let cfg = config(full_config());
    let feature = cfg.feature_config_by_slug("picture-up").unwrap();
    let schema = feature.parsed_schema().unwrap().unwrap();
    assert_eq!(schema["type"], json!("object"));
}

#[test]
fn parsed_schema_reports_invalid_json() {
    let mut cfg = config(full_config());
    let list = cfg.feature_config.as_mut().unwrap();
    list[0].as_mut().unwrap().schema = Some("{not json".to_owned());
    assert!(cfg.feature_configs().next().unwrap().parsed_schema().unwrap().is_err());
}
