use crate::*;
use serde_json::json;

#[test]
fn dotted_path_getters() {
    let config = HistoryConfig::from_value(json!({
        "history": { "startX": 24, "showLabels": true, "stroke": "#888" }
    }));
    assert_eq!(config.get_f64("history.startX"), Some(24.0));
    assert_eq!(config.get_bool("history.showLabels"), Some(true));
    assert_eq!(config.get_str("history.stroke"), Some("#888"));
    assert_eq!(config.get_f64("history.curveOffset"), None);
}

#[test]
fn set_value_creates_intermediate_objects() {
    let mut config = HistoryConfig::empty_object();
    config.set_value("history.adjacencyThreshold", json!(64.0));
    assert_eq!(config.get_f64("history.adjacencyThreshold"), Some(64.0));
}

#[test]
fn set_value_coerces_non_object_roots() {
    let mut config = HistoryConfig::from_value(json!("scalar"));
    config.set_value("history.startX", json!(10.0));
    assert_eq!(config.get_f64("history.startX"), Some(10.0));
}

#[test]
fn deep_merge_overrides_leaves_only() {
    let mut config = HistoryConfig::from_value(json!({
        "history": { "startX": 32.0, "curveOffset": 40.0 }
    }));
    config.deep_merge(&json!({ "history": { "startX": 16.0 } }));
    assert_eq!(config.get_f64("history.startX"), Some(16.0));
    assert_eq!(config.get_f64("history.curveOffset"), Some(40.0));
}
