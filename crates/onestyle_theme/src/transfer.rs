//! Import/export of configuration documents as JSON text

use onestyle_core::ConfigDocument;
use serde_json::Value;
use tracing::warn;

use crate::ImportError;

/// Serialize `doc` as indented JSON in document order.
pub fn export(doc: &ConfigDocument) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|err| {
        warn!("export: failed to serialize configuration: {}", err);
        String::from("{}")
    })
}

/// Parse and shape-check a configuration document.
///
/// Text that is not JSON yields [`ImportError::Syntax`]; JSON that does not
/// decode as a document (not an object, missing `colors`, wrong value types)
/// yields [`ImportError::Schema`].
pub fn import(text: &str) -> Result<ConfigDocument, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ImportError::Schema(format!(
            "expected a JSON object, found {}",
            kind_of(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use crate::DefaultPreset;
    use onestyle_core::OverrideMap;

    #[test]
    fn export_is_indented_and_ordered() {
        let doc = DefaultPreset::One.document();
        let text = export(&doc);
        assert!(text.starts_with("{\n  \"theme\": {"));

        let brand = text.find("\"brand\"").unwrap();
        let components = text.find("\"components\"").unwrap();
        let scopes = text.find("\"scopes\"").unwrap();
        assert!(brand < components && components < scopes);
    }

    #[test]
    fn round_trip_compiles_identically() {
        for preset in DefaultPreset::all() {
            let doc = preset.document();
            let back = import(&export(&doc)).unwrap();
            assert_eq!(back, doc);
            assert_eq!(
                compile(&back, &OverrideMap::new()),
                compile(&doc, &OverrideMap::new())
            );
        }
    }

    #[test]
    fn syntax_errors_carry_position() {
        match import("{not json") {
            Err(ImportError::Syntax { line, column, .. }) => {
                assert_eq!(line, 1);
                assert!(column > 0);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn shape_errors_are_descriptive() {
        let err = import("[1, 2]").unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration does not match the expected shape: expected a JSON object, found an array"
        );

        let err = import(r#"{ "components": {} }"#).unwrap_err();
        assert!(matches!(err, ImportError::Schema(ref msg) if msg.contains("colors")));

        let err = import(r#"{ "colors": { "brand": { "color1": "red" } } }"#).unwrap_err();
        assert!(matches!(err, ImportError::Schema(_)));

        // Scale values are not checked here; the compiler skips non-strings.
        assert!(import(r#"{ "colors": { "brand": { "color1": { "500": 12 } } } }"#).is_ok());
    }
}
