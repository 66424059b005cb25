//! Draft-07 schema loading and violation reporting.

use jsonschema::Validator;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::config::ROOT_PATH;
use crate::error::{PipelineError, Result};

/// Built-in record schema, used when no usable schema is supplied.
pub const DEFAULT_SCHEMA_JSON: &str = include_str!("../schema/record.schema.json");

/// One step in a violation path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Slash-joined path, or `<root>` for the document itself.
#[must_use]
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn serialize_path<S: Serializer>(
    path: &[PathSegment],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&render_path(path))
}

/// A schema violation at a location in the record.
///
/// Serializes as `{"path": "a/0/b", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(serialize_with = "serialize_path")]
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Violation {
    /// Slash-joined path, or `<root>` for the document itself.
    #[must_use]
    pub fn render_path(&self) -> String {
        render_path(&self.path)
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.render_path(), self.message)
    }
}

/// Turn a JSON Pointer into typed segments by walking the instance.
///
/// A segment is an index only where the instance holds an array at that
/// point, so an object key "0" stays a key.
fn pointer_segments(pointer: &str, instance: &Value) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut current = Some(instance);

    for raw in pointer.split('/').skip(1) {
        let token = raw.replace("~1", "/").replace("~0", "~");
        match current {
            Some(Value::Array(items)) => match token.parse::<usize>() {
                Ok(index) => {
                    current = items.get(index);
                    segments.push(PathSegment::Index(index));
                }
                Err(_) => {
                    current = None;
                    segments.push(PathSegment::Key(token));
                }
            },
            Some(Value::Object(map)) => {
                current = map.get(&token);
                segments.push(PathSegment::Key(token));
            }
            _ => {
                current = None;
                segments.push(PathSegment::Key(token));
            }
        }
    }

    segments
}

/// A compiled schema plus a note when it is not the one the caller supplied.
pub struct LoadedSchema {
    pub validator: SchemaValidator,
    /// Set when supplied schema text was unusable and the default took over.
    pub fallback_warning: Option<String>,
}

/// Validates records against a Draft-07 JSON schema.
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Compile a schema value as Draft-07.
    pub fn from_value(schema: &Value) -> Result<Self> {
        let validator = jsonschema::draft7::new(schema)
            .map_err(|e| PipelineError::SchemaLoad(format!("failed to compile schema: {e}")))?;
        Ok(Self { validator })
    }

    /// Compile the built-in record schema.
    pub fn default_schema() -> Result<Self> {
        let schema: Value = serde_json::from_str(DEFAULT_SCHEMA_JSON)
            .map_err(|e| PipelineError::SchemaLoad(format!("invalid default schema JSON: {e}")))?;
        Self::from_value(&schema)
    }

    /// Load user-supplied schema text, falling back to the default.
    ///
    /// Absent or blank text selects the default silently. Text that is not
    /// JSON, or JSON that is not a valid schema, selects the default and
    /// sets `fallback_warning`. Only a broken built-in schema is an error.
    pub fn load(schema_text: Option<&str>) -> Result<LoadedSchema> {
        let Some(text) = schema_text.filter(|t| !t.trim().is_empty()) else {
            return Ok(LoadedSchema {
                validator: Self::default_schema()?,
                fallback_warning: None,
            });
        };

        let supplied = serde_json::from_str::<Value>(text)
            .map_err(|e| format!("schema is not valid JSON ({e}), using default schema"))
            .and_then(|schema| {
                Self::from_value(&schema).map_err(|e| format!("{e}, using default schema"))
            });

        match supplied {
            Ok(validator) => Ok(LoadedSchema {
                validator,
                fallback_warning: None,
            }),
            Err(message) => {
                warn!(%message, "schema fallback");
                Ok(LoadedSchema {
                    validator: Self::default_schema()?,
                    fallback_warning: Some(message),
                })
            }
        }
    }

    /// Validate a record, returning violations sorted by path.
    pub fn validate(&self, value: &Value) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .validator
            .iter_errors(value)
            .map(|e| Violation {
                path: pointer_segments(&e.instance_path().to_string(), value),
                message: e.to_string(),
            })
            .collect();
        violations.sort_by(|a, b| a.path.cmp(&b.path));
        violations
    }

    /// Whether a record has no violations.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewrepair_engine::ReviewerMode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn valid_multi() -> Value {
        json!({
            "reviewer": "R1/R2",
            "answer": ["A", "C"],
            "answer_index": [0, 2],
            "explanation": "Both apply.",
            "explanation_residual": "Both apply."
        })
    }

    #[test]
    fn test_default_schema_compiles() {
        assert!(SchemaValidator::default_schema().is_ok());
    }

    #[test]
    fn test_valid_records() {
        let validator = SchemaValidator::default_schema().expect("validator");
        assert!(validator.validate(&valid_multi()).is_empty());

        let single = json!({
            "reviewer": "R3",
            "answer": null,
            "answer_index": null,
            "explanation": "Nothing fits.",
            "overall_notes": null
        });
        assert!(validator.is_valid(&single));
    }

    #[test]
    fn test_violation_paths() {
        let validator = SchemaValidator::default_schema().expect("validator");
        let mut record = valid_multi();
        record["answer_index"] = json!([0, -1]);
        record["overall_notes"] = json!(5);

        let violations = validator.validate(&record);
        let paths: Vec<String> = violations.iter().map(Violation::render_path).collect();
        assert!(paths.contains(&"answer_index/1".to_string()), "{paths:?}");
        assert!(paths.contains(&"overall_notes".to_string()), "{paths:?}");
        let index = violations
            .iter()
            .find(|v| v.render_path() == "answer_index/1")
            .expect("index violation");
        assert_eq!(
            index.path,
            vec![PathSegment::Key("answer_index".into()), PathSegment::Index(1)]
        );
    }

    #[test]
    fn test_root_violation() {
        let validator = SchemaValidator::default_schema().expect("validator");
        let violations = validator.validate(&json!({"reviewer": "R3"}));
        assert!(!violations.is_empty());
        assert!(violations.iter().all(|v| v.render_path() == ROOT_PATH));
        assert!(violations[0].to_string().starts_with("<root>: "));
    }

    #[test]
    fn test_reviewer_enum_matches_modes() {
        let schema: Value = serde_json::from_str(DEFAULT_SCHEMA_JSON).expect("schema json");
        let modes: Vec<&str> = ReviewerMode::ALL.iter().map(ReviewerMode::as_str).collect();
        assert_eq!(schema["properties"]["reviewer"]["enum"], json!(modes));
        assert_eq!(
            schema["if"]["properties"]["reviewer"]["const"],
            json!(ReviewerMode::MultiSelect.as_str())
        );
    }

    #[test]
    fn test_violation_serializes_rendered_path() {
        let nested = Violation {
            path: vec![PathSegment::Key("answer".into()), PathSegment::Index(1)],
            message: "1 is not of type \"string\"".into(),
        };
        let root = Violation {
            path: vec![],
            message: "\"answer\" is a required property".into(),
        };
        assert_eq!(
            serde_json::to_value([&nested, &root]).expect("serialize"),
            json!([
                {"path": "answer/1", "message": "1 is not of type \"string\""},
                {"path": "<root>", "message": "\"answer\" is a required property"}
            ])
        );
    }

    #[test]
    fn test_pointer_segments_keeps_numeric_keys() {
        let instance = json!({"0": {"a/b": [1, 2]}});
        assert_eq!(
            pointer_segments("/0/a~1b/1", &instance),
            vec![
                PathSegment::Key("0".into()),
                PathSegment::Key("a/b".into()),
                PathSegment::Index(1)
            ]
        );
        assert!(pointer_segments("", &instance).is_empty());
    }

    #[test]
    fn test_load_blank_uses_default_silently() {
        let loaded = SchemaValidator::load(Some("   ")).expect("load");
        assert!(loaded.fallback_warning.is_none());
        let loaded = SchemaValidator::load(None).expect("load");
        assert!(loaded.fallback_warning.is_none());
        assert!(loaded.validator.is_valid(&valid_multi()));
    }

    #[test]
    fn test_load_unparsable_falls_back_with_warning() {
        let loaded = SchemaValidator::load(Some("{not json")).expect("load");
        let warning = loaded.fallback_warning.expect("warning");
        assert!(warning.contains("not valid JSON"));
        assert!(!loaded.validator.validate(&json!({})).is_empty());
    }

    #[test]
    fn test_load_invalid_schema_falls_back_with_warning() {
        let loaded = SchemaValidator::load(Some(r#"{"type": 12}"#)).expect("load");
        assert!(loaded.fallback_warning.is_some());
    }

    #[test]
    fn test_load_custom_schema() {
        let loaded =
            SchemaValidator::load(Some(r#"{"type": "object", "required": ["x"]}"#)).expect("load");
        assert!(loaded.fallback_warning.is_none());
        let violations = loaded.validator.validate(&json!({}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].render_path(), "<root>");
        assert!(violations[0].message.contains("\"x\""));
    }
}
