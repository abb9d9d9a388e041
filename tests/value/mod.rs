// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use formexpr::*;

#[test]
fn serialize_number() -> Result<()> {
    // Check that integer values are serialized without fractional part
    assert_eq!(serde_json::to_string_pretty(&Value::try_from(1.0)?)?, "1");
    assert_eq!(serde_json::to_string_pretty(&Value::try_from(-1.0)?)?, "-1");
    assert_eq!(serde_json::to_string_pretty(&Value::try_from(2.5)?)?, "2.5");
    Ok(())
}

#[test]
fn json_round_trip_keeps_structure() -> Result<()> {
    let json = r#"{"a":[1,"two",true,null],"b":{"c":1.5}}"#;
    let v = Value::from_json_str(json)?;
    assert_eq!(v["a"][1], Value::from("two"));
    assert_eq!(v["b"]["c"], Value::try_from(1.5)?);
    assert_eq!(serde_json::to_string(&v)?, json);
    assert_eq!(Value::from_json_str(&v.to_json_str()?)?, v);
    Ok(())
}

#[test]
fn missing_keys_are_undefined() -> Result<()> {
    let v = Value::from_json_str(r#"{"a": [1]}"#)?;
    assert!(v["b"].is_undefined());
    assert!(v["a"][3].is_undefined());
    assert!(Value::Null["a"].is_undefined());
    Ok(())
}

#[test]
fn accessors() -> Result<()> {
    let mut v = Value::new_object();
    v.as_object_mut()?.insert("x".into(), Value::from(1i64));
    assert_eq!(v.as_object()?.len(), 1);
    assert!(v.as_array().is_err());
    assert_eq!(v["x"].as_number()?.as_i64(), Some(1));
    assert!(Value::from("s").as_bool().is_err());
    Ok(())
}

#[test]
fn scalars_as_text() -> Result<()> {
    assert_eq!(Value::from(3i64).to_text().as_deref(), Some("3"));
    assert_eq!(Value::try_from(0.25)?.to_text().as_deref(), Some("0.25"));
    assert_eq!(Value::try_from(1e-7)?.to_text().as_deref(), Some("1e-7"));
    assert_eq!(Value::Bool(false).to_text().as_deref(), Some("false"));
    assert_eq!(Value::Null.to_text(), None);
    assert_eq!(Value::new_array().to_text(), None);
    Ok(())
}

#[test]
fn non_finite_floats_are_rejected() {
    assert!(Value::try_from(f64::NAN).is_err());
    assert!(Value::try_from(f64::NEG_INFINITY).is_err());
}

#[test]
fn load_from_json_file() -> Result<()> {
    let v = Value::from_json_file("tests/value/data.json")?;
    assert_eq!(v["Applicant"]["Name"], Value::from("Kari"));
    assert!(Value::from_json_file("tests/value/missing.json").is_err());

    let sources = ContextDataSources::from_json_file("tests/value/sources.json")?;
    assert_eq!(sources.form_data.default_data_type.as_deref(), Some("model"));
    assert_eq!(sources.layout.order, vec!["page1".to_string(), "summary".to_string()]);
    assert!(ContextDataSources::from_json_file("tests/value/missing.json").is_err());
    Ok(())
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_sources() -> Result<()> {
    let sources = ContextDataSources::from_yaml_str(
        r#"
formData:
  defaultDataType: model
  models:
    model:
      Name: Ola
roles: [admin]
"#,
    )?;
    assert_eq!(sources.roles, vec!["admin".to_string()]);
    assert_eq!(sources.form_data.models["model"]["Name"], Value::from("Ola"));
    Ok(())
}
