//! Declarative configuration schemas.
//!
//! A [`Schema`] describes the shape of one micro-app's configuration object:
//! typed fields, per-field defaults and value rules. Validation normalises a
//! candidate object (defaults filled in, unknown keys handled per policy) and
//! reports every problem it finds rather than stopping at the first one.

mod field;
mod issue;

pub use field::{Field, FieldKind, Rule};
pub use issue::{json_type_name, IssueKind, ValidationIssue};

use std::collections::BTreeMap;

use regex_lite::Regex;
use serde_json::{Map, Value};

use issue::format_bounds;

/// What to do with object keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Drop them from the normalised output.
    #[default]
    Strip,
    /// Keep them untouched.
    Allow,
    /// Report each one as an issue.
    Reject,
}

/// Shape and defaults of a configuration object.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: BTreeMap<String, Field>,
    unknown_keys: UnknownKeys,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Object made of every declared default.
    ///
    /// Nested object fields without an explicit default contribute their own
    /// nested defaults (omitted when that yields an empty object).
    pub fn defaults(&self) -> Value {
        let mut out = Map::new();
        for (name, field) in &self.fields {
            if let Some(default) = &field.default {
                out.insert(name.clone(), default.clone());
            } else if let FieldKind::Object(nested) = &field.kind {
                let nested_defaults = nested.defaults();
                if nested_defaults.as_object().is_some_and(|m| !m.is_empty()) {
                    out.insert(name.clone(), nested_defaults);
                }
            }
        }
        Value::Object(out)
    }

    /// Validate `value` and return its normalised form.
    ///
    /// The value must be an object. All issues are collected; the normalised
    /// value is only returned when there are none.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        let normalised = match value.as_object() {
            Some(map) => self.validate_object(map, "", &mut issues),
            None => {
                issues.push(ValidationIssue::new(
                    "",
                    IssueKind::TypeMismatch {
                        expected: "object",
                        found: json_type_name(value),
                    },
                ));
                Value::Null
            }
        };

        if issues.is_empty() {
            Ok(normalised)
        } else {
            Err(issues)
        }
    }

    /// Check that every pattern rule (recursively) compiles.
    pub fn check_patterns(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        self.collect_pattern_issues("", &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Machine-readable description of the schema, for tooling output.
    pub fn describe(&self) -> Value {
        let mut fields = Map::new();
        for (name, field) in &self.fields {
            fields.insert(name.clone(), describe_field(field));
        }
        serde_json::json!({
            "type": "object",
            "unknownKeys": format!("{:?}", self.unknown_keys).to_lowercase(),
            "fields": fields,
        })
    }

    fn validate_object(
        &self,
        map: &Map<String, Value>,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Value {
        let mut out = Map::new();

        for (name, field) in &self.fields {
            let field_path = join_path(path, name);
            match map.get(name) {
                Some(value) if !value.is_null() || matches!(field.kind, FieldKind::Any) => {
                    if let Some(v) = validate_field(field, value, &field_path, issues) {
                        out.insert(name.clone(), v);
                    }
                }
                _ => {
                    if let Some(default) = &field.default {
                        out.insert(name.clone(), default.clone());
                    } else if let FieldKind::Object(nested) = &field.kind {
                        // A missing nested object is filled from its own defaults
                        // when possible; it is only an issue if required.
                        let mut nested_issues = Vec::new();
                        let filled = nested.validate_object(&Map::new(), &field_path, &mut nested_issues);
                        if nested_issues.is_empty() {
                            out.insert(name.clone(), filled);
                        } else if field.required {
                            issues.extend(nested_issues);
                        }
                    } else if field.required {
                        issues.push(ValidationIssue::new(field_path, IssueKind::MissingRequired));
                    }
                }
            }
        }

        for (key, value) in map {
            if self.fields.contains_key(key) {
                continue;
            }
            match self.unknown_keys {
                UnknownKeys::Strip => {}
                UnknownKeys::Allow => {
                    out.insert(key.clone(), value.clone());
                }
                UnknownKeys::Reject => {
                    issues.push(ValidationIssue::new(join_path(path, key), IssueKind::UnknownField));
                }
            }
        }

        Value::Object(out)
    }

    fn collect_pattern_issues(&self, path: &str, issues: &mut Vec<ValidationIssue>) {
        for (name, field) in &self.fields {
            let field_path = join_path(path, name);
            for rule in &field.rules {
                if let Rule::Pattern(pattern) = rule {
                    if let Err(e) = Regex::new(pattern) {
                        issues.push(ValidationIssue::new(
                            field_path.clone(),
                            IssueKind::InvalidPattern {
                                pattern: pattern.clone(),
                                reason: e.to_string(),
                            },
                        ));
                    }
                }
            }
            if let Some(nested) = nested_schema(&field.kind) {
                nested.collect_pattern_issues(&field_path, issues);
            }
        }
    }
}

fn nested_schema(kind: &FieldKind) -> Option<&Schema> {
    match kind {
        FieldKind::Object(schema) => Some(schema),
        FieldKind::Array(item) | FieldKind::Map(item) => nested_schema(item),
        _ => None,
    }
}

fn validate_field(
    field: &Field,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    let before = issues.len();
    let normalised = validate_kind(&field.kind, value, path, issues)?;
    if issues.len() == before {
        check_rules(&field.rules, &normalised, path, issues);
    }
    Some(normalised)
}

fn validate_kind(
    kind: &FieldKind,
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Value> {
    if !kind.accepts(value) {
        issues.push(ValidationIssue::new(
            path,
            IssueKind::TypeMismatch {
                expected: kind.name(),
                found: json_type_name(value),
            },
        ));
        return None;
    }

    match (kind, value) {
        (FieldKind::Array(item), Value::Array(items)) => {
            let out = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| validate_kind(item, v, &format!("{}[{}]", path, i), issues))
                .collect();
            Some(Value::Array(out))
        }
        (FieldKind::Object(schema), Value::Object(map)) => Some(schema.validate_object(map, path, issues)),
        (FieldKind::Map(item), Value::Object(map)) => {
            let mut out = Map::new();
            for (key, v) in map {
                if let Some(normalised) = validate_kind(item, v, &join_path(path, key), issues) {
                    out.insert(key.clone(), normalised);
                }
            }
            Some(Value::Object(out))
        }
        _ => Some(value.clone()),
    }
}

fn check_rules(rules: &[Rule], value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    for rule in rules {
        match rule {
            Rule::Range { min, max } => {
                let Some(n) = value.as_f64() else { continue };
                let below = min.is_some_and(|lo| n < lo);
                let above = max.is_some_and(|hi| n > hi);
                if below || above {
                    issues.push(ValidationIssue::new(
                        path,
                        IssueKind::OutOfRange {
                            value: n,
                            bounds: format_bounds(*min, *max),
                        },
                    ));
                }
            }
            Rule::OneOf(allowed) => {
                let Some(s) = value.as_str() else { continue };
                if !allowed.iter().any(|a| a == s) {
                    issues.push(ValidationIssue::new(
                        path,
                        IssueKind::NotAllowed {
                            value: s.to_string(),
                            allowed: allowed.clone(),
                        },
                    ));
                }
            }
            Rule::Pattern(pattern) => {
                let Some(s) = value.as_str() else { continue };
                match Regex::new(pattern) {
                    Ok(re) if re.is_match(s) => {}
                    Ok(_) => issues.push(ValidationIssue::new(
                        path,
                        IssueKind::PatternMismatch {
                            value: s.to_string(),
                            pattern: pattern.clone(),
                        },
                    )),
                    Err(e) => issues.push(ValidationIssue::new(
                        path,
                        IssueKind::InvalidPattern {
                            pattern: pattern.clone(),
                            reason: e.to_string(),
                        },
                    )),
                }
            }
            Rule::MinLength(min) => {
                let length = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(a) => a.len(),
                    _ => continue,
                };
                if length < *min {
                    issues.push(ValidationIssue::new(path, IssueKind::TooShort { length, min: *min }));
                }
            }
            Rule::Items(item_rules) => {
                let Some(items) = value.as_array() else { continue };
                for (i, item) in items.iter().enumerate() {
                    check_rules(item_rules, item, &format!("{}[{}]", path, i), issues);
                }
            }
        }
    }
}

fn describe_field(field: &Field) -> Value {
    let mut out = describe_kind(&field.kind);
    if let Value::Object(map) = &mut out {
        map.insert("required".to_string(), Value::Bool(field.required));
        if let Some(default) = &field.default {
            map.insert("default".to_string(), default.clone());
        }
        if let Some(description) = &field.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        if !field.rules.is_empty() {
            let rules: Vec<Value> = field.rules.iter().map(describe_rule).collect();
            map.insert("rules".to_string(), Value::Array(rules));
        }
    }
    out
}

fn describe_kind(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::Object(schema) => schema.describe(),
        FieldKind::Array(item) => serde_json::json!({ "type": "array", "items": describe_kind(item) }),
        FieldKind::Map(item) => serde_json::json!({ "type": "map", "values": describe_kind(item) }),
        other => serde_json::json!({ "type": other.name() }),
    }
}

fn describe_rule(rule: &Rule) -> Value {
    match rule {
        Rule::Range { min, max } => serde_json::json!({ "range": { "min": min, "max": max } }),
        Rule::OneOf(allowed) => serde_json::json!({ "oneOf": allowed }),
        Rule::Pattern(pattern) => serde_json::json!({ "pattern": pattern }),
        Rule::MinLength(min) => serde_json::json!({ "minLength": min }),
        Rule::Items(rules) => {
            let rules: Vec<Value> = rules.iter().map(describe_rule).collect();
            serde_json::json!({ "items": rules })
        }
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analytics_like() -> Schema {
        Schema::new()
            .field(
                "theme",
                Field::object(
                    Schema::new().field("mode", Field::string().default("light").one_of(&["light", "dark"])),
                ),
            )
            .field("refreshIntervalMs", Field::integer().default(60000).range(1000, 3_600_000))
    }

    #[test]
    fn test_defaults_include_nested() {
        let schema = analytics_like();
        assert_eq!(
            schema.defaults(),
            json!({"theme": {"mode": "light"}, "refreshIntervalMs": 60000})
        );
    }

    #[test]
    fn test_validate_fills_missing_fields() {
        let schema = analytics_like();
        let result = schema.validate(&json!({"refreshIntervalMs": 30000})).unwrap();
        assert_eq!(result, json!({"theme": {"mode": "light"}, "refreshIntervalMs": 30000}));
    }

    #[test]
    fn test_null_takes_default() {
        let schema = analytics_like();
        let result = schema.validate(&json!({"refreshIntervalMs": null})).unwrap();
        assert_eq!(result["refreshIntervalMs"], 60000);
    }

    #[test]
    fn test_type_mismatch_reported_with_path() {
        let schema = analytics_like();
        let issues = schema.validate(&json!({"theme": {"mode": 3}})).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "theme.mode");
        assert_eq!(
            issues[0].kind,
            IssueKind::TypeMismatch {
                expected: "string",
                found: "integer"
            }
        );
    }

    #[test]
    fn test_rules_checked() {
        let schema = analytics_like();
        let issues = schema
            .validate(&json!({"theme": {"mode": "sepia"}, "refreshIntervalMs": 10}))
            .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| matches!(i.kind, IssueKind::NotAllowed { .. })));
        assert!(issues.iter().any(|i| matches!(i.kind, IssueKind::OutOfRange { .. })));
    }

    #[test]
    fn test_missing_required_without_default() {
        let schema = Schema::new().field("baseUrl", Field::string());
        let issues = schema.validate(&json!({})).unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::new("baseUrl", IssueKind::MissingRequired)]);
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let schema = Schema::new().field("label", Field::string().optional());
        assert_eq!(schema.validate(&json!({})).unwrap(), json!({}));
    }

    #[test]
    fn test_missing_required_nested_object_reports_nested_fields() {
        let schema = Schema::new().field("api", Field::object(Schema::new().field("baseUrl", Field::string())));
        let issues = schema.validate(&json!({})).unwrap_err();
        assert_eq!(issues[0].path, "api.baseUrl");
    }

    #[test]
    fn test_unknown_keys_policies() {
        let base = Schema::new().field("a", Field::integer().default(1));

        let stripped = base.clone().validate(&json!({"a": 2, "extra": true})).unwrap();
        assert_eq!(stripped, json!({"a": 2}));

        let allowed = base
            .clone()
            .unknown_keys(UnknownKeys::Allow)
            .validate(&json!({"a": 2, "extra": true}))
            .unwrap();
        assert_eq!(allowed, json!({"a": 2, "extra": true}));

        let issues = base
            .unknown_keys(UnknownKeys::Reject)
            .validate(&json!({"extra": true}))
            .unwrap_err();
        assert_eq!(issues, vec![ValidationIssue::new("extra", IssueKind::UnknownField)]);
    }

    #[test]
    fn test_root_must_be_object() {
        let issues = analytics_like().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(issues[0].path, "");
    }

    #[test]
    fn test_array_items_validated() {
        let schema = Schema::new().field("tags", Field::array(FieldKind::String).default(json!([])));
        let issues = schema.validate(&json!({"tags": ["a", 2, "c"]})).unwrap_err();
        assert_eq!(issues[0].path, "tags[1]");
    }

    #[test]
    fn test_map_values_validated() {
        let schema = Schema::new().field("features", Field::map(FieldKind::Boolean).default(json!({})));
        let ok = schema.validate(&json!({"features": {"export": true}})).unwrap();
        assert_eq!(ok["features"]["export"], true);

        let issues = schema.validate(&json!({"features": {"export": "yes"}})).unwrap_err();
        assert_eq!(issues[0].path, "features.export");
    }

    #[test]
    fn test_pattern_rule() {
        let schema = Schema::new().field("color", Field::string().pattern(r"^#[0-9a-fA-F]{6}$"));
        assert!(schema.validate(&json!({"color": "#61dafb"})).is_ok());
        let issues = schema.validate(&json!({"color": "cyan"})).unwrap_err();
        assert!(matches!(issues[0].kind, IssueKind::PatternMismatch { .. }));
    }

    #[test]
    fn test_check_patterns_finds_bad_regex() {
        let schema = Schema::new().field(
            "nested",
            Field::object(Schema::new().field("x", Field::string().pattern("(unclosed"))),
        );
        let issues = schema.check_patterns().unwrap_err();
        assert_eq!(issues[0].path, "nested.x");
    }

    #[test]
    fn test_min_length() {
        let schema = Schema::new().field("baseUrl", Field::string().min_length(1));
        let issues = schema.validate(&json!({"baseUrl": ""})).unwrap_err();
        assert_eq!(issues[0].kind, IssueKind::TooShort { length: 0, min: 1 });
    }

    #[test]
    fn test_item_range_reports_each_element() {
        let schema = Schema::new().field(
            "pageSizeOptions",
            Field::array(FieldKind::Integer).items_range(1, 1000),
        );
        assert!(schema.validate(&json!({"pageSizeOptions": [10, 1000]})).is_ok());

        let issues = schema
            .validate(&json!({"pageSizeOptions": [-1, 25, 0]}))
            .unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["pageSizeOptions[0]", "pageSizeOptions[2]"]);
        assert!(matches!(issues[0].kind, IssueKind::OutOfRange { .. }));
    }

    #[test]
    fn test_describe() {
        let described = analytics_like().describe();
        assert_eq!(described["type"], "object");
        assert_eq!(described["fields"]["refreshIntervalMs"]["type"], "integer");
        assert_eq!(described["fields"]["refreshIntervalMs"]["default"], 60000);
        assert_eq!(described["fields"]["theme"]["fields"]["mode"]["default"], "light");
    }
}
