use super::catalog::builtin_types;
use super::definition::AggregationTypeDefinition;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Immutable catalog of aggregation types, keyed by id.
pub struct AggregationRegistry {
    types: Vec<AggregationTypeDefinition>,
    by_id: HashMap<&'static str, usize>,
}

impl AggregationRegistry {
    /// Build a registry from definitions, keeping their order.
    ///
    /// A later definition with an id already seen is ignored.
    pub fn new(definitions: Vec<AggregationTypeDefinition>) -> Self {
        let mut types = Vec::with_capacity(definitions.len());
        let mut by_id = HashMap::with_capacity(definitions.len());

        for def in definitions {
            if by_id.contains_key(def.id) {
                tracing::warn!("Duplicate aggregation type '{}' ignored", def.id);
                continue;
            }
            by_id.insert(def.id, types.len());
            types.push(def);
        }

        Self { types, by_id }
    }

    /// Registry of the built-in types, constructed on first use.
    pub fn global() -> &'static AggregationRegistry {
        static REGISTRY: OnceLock<AggregationRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| AggregationRegistry::new(builtin_types()))
    }

    /// Get a type definition by id.
    pub fn get(&self, type_id: &str) -> Option<&AggregationTypeDefinition> {
        self.by_id.get(type_id).map(|&idx| &self.types[idx])
    }

    /// All types in registration order.
    pub fn list(&self) -> &[AggregationTypeDefinition] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Validate supplied values against a type's parameters.
    ///
    /// Parameters are checked in declaration order and the first failure is
    /// returned. Keys that name no parameter are rejected after that, in
    /// sorted order.
    pub fn validate(&self, type_id: &str, values: &Map<String, Value>) -> Result<()> {
        let def = self
            .get(type_id)
            .ok_or_else(|| Error::UnknownAggregation(type_id.to_string()))?;

        for param in &def.parameters {
            let value = values.get(param.id);
            if let Err(reason) = param.check(value) {
                return Err(Error::validation(type_id, param.id, reason, value));
            }
        }

        let mut unknown: Vec<&String> = values
            .keys()
            .filter(|key| def.parameter(key).is_none())
            .collect();
        unknown.sort();

        if let Some(key) = unknown.first() {
            return Err(Error::validation(
                type_id,
                key,
                "unknown parameter",
                values.get(key.as_str()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_registration_order() {
        let ids: Vec<&str> = AggregationRegistry::global()
            .list()
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "avg",
                "cardinality",
                "extended_stats",
                "max",
                "min",
                "percentiles",
                "percentile_ranks",
                "stats",
                "sum",
                "value_count",
                "date_histogram",
                "terms",
            ]
        );
    }

    #[test]
    fn test_get_unknown_type() {
        assert!(AggregationRegistry::global().get("geo_bounds").is_none());
        let err = AggregationRegistry::global()
            .validate("geo_bounds", &Map::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAggregation(ref t) if t == "geo_bounds"));
    }

    #[test]
    fn test_cardinality_with_missing_is_valid() {
        let registry = AggregationRegistry::global();
        registry
            .validate("cardinality", &values(json!({"field": "x", "missing": "y"})))
            .unwrap();
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let err = AggregationRegistry::global()
            .validate("avg", &values(json!({"field": "x", "unknownParam": 1})))
            .unwrap_err();
        match err {
            Error::Validation {
                aggregation,
                parameter,
                value,
                ..
            } => {
                assert_eq!(aggregation, "avg");
                assert_eq!(parameter, "unknownParam");
                assert_eq!(value, Some(json!(1)));
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_first_failing_parameter_wins() {
        // both `field` and `percents` are bad; `field` is declared first
        let err = AggregationRegistry::global()
            .validate("percentiles", &values(json!({"field": 7, "percents": [200]})))
            .unwrap_err();
        assert_eq!(err.parameter(), Some("field"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = AggregationRegistry::global()
            .validate("avg", &values(json!({"unknownParam": 1})))
            .unwrap_err();
        match err {
            Error::Validation { parameter, value, .. } => {
                assert_eq!(parameter, "field");
                assert_eq!(value, None);
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_definitions_keep_first() {
        let mut defs = super::builtin_types();
        let mut dup = defs[0].clone();
        dup.display_name = "Shadow";
        defs.push(dup);
        let registry = AggregationRegistry::new(defs);
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.get("avg").unwrap().display_name, "Average");
    }
}
