use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Record metadata as stored in the index
pub type Metadata = serde_json::Map<String, Value>;

/// Single-field filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals value (`$eq`)
    Eq(Value),

    /// Field differs from value (`$ne`)
    Ne(Value),

    /// Inclusive numeric range (`$gte` / `$lte`)
    Range { gte: f64, lte: f64 },
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Eq(value) => map.serialize_entry("$eq", value)?,
            Self::Ne(value) => map.serialize_entry("$ne", value)?,
            Self::Range { gte, lte } => {
                map.serialize_entry("$gte", gte)?;
                map.serialize_entry("$lte", lte)?;
            }
        }
        map.end()
    }
}

/// Conjunction of field conditions, evaluated server-side over metadata
///
/// A field either has exactly one condition or is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Predicate {
    clauses: BTreeMap<String, Condition>,
}

impl Predicate {
    /// Create empty predicate
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn equal_to(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    /// Require `field != value`
    pub fn not_equal_to(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Ne(value.into()))
    }

    /// Require `gte <= field <= lte`
    pub fn between(self, field: impl Into<String>, gte: f64, lte: f64) -> Self {
        self.with(field, Condition::Range { gte, lte })
    }

    /// Set the condition for a field, replacing any previous one
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.insert(field.into(), condition);
        self
    }

    /// Condition on a field, if present
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.clauses.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.clauses.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Query request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Logical collection to search
    pub namespace: String,

    /// Query embedding
    pub vector: Vec<f32>,

    /// Maximum number of matches
    pub top_k: usize,

    /// Metadata filter
    #[serde(skip_serializing_if = "Predicate::is_empty")]
    pub filter: Predicate,

    /// Return metadata with matches
    pub include_metadata: bool,
}

/// Scored match returned by the index
#[derive(Debug, Clone, Deserialize)]
pub struct Match {
    /// Vector ID
    pub id: String,

    /// Similarity score
    #[serde(default)]
    pub score: f32,

    /// Record metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Query response, matches in service order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<Match>,

    #[serde(default)]
    pub namespace: String,
}

/// Per-namespace statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    #[serde(default)]
    pub vector_count: u64,
}

/// Index statistics from `describe_index_stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceStats>,

    #[serde(default)]
    pub dimension: usize,

    #[serde(default)]
    pub total_vector_count: u64,
}

impl IndexStats {
    /// Vector count of a namespace (0 when unknown)
    pub fn namespace_count(&self, namespace: &str) -> u64 {
        self.namespaces
            .get(namespace)
            .map(|ns| ns.vector_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_predicate_wire_format() {
        let predicate = Predicate::new()
            .between("Market Cap", 0.0, 3.67e12)
            .not_equal_to("Ticker", "N/A")
            .equal_to("Sector", "Technology");

        assert_eq!(
            serde_json::to_value(&predicate).unwrap(),
            json!({
                "Market Cap": {"$gte": 0.0, "$lte": 3.67e12},
                "Ticker": {"$ne": "N/A"},
                "Sector": {"$eq": "Technology"},
            })
        );
    }

    #[test]
    fn test_predicate_replaces_field_condition() {
        let predicate = Predicate::new()
            .equal_to("Sector", "Energy")
            .equal_to("Sector", "Utilities");
        assert_eq!(predicate.len(), 1);
        assert_eq!(
            predicate.get("Sector"),
            Some(&Condition::Eq(json!("Utilities")))
        );
    }

    #[test]
    fn test_query_request_wire_format() {
        let request = QueryRequest {
            namespace: "stock-descriptions".to_string(),
            vector: vec![0.5, 0.25],
            top_k: 10,
            filter: Predicate::new().not_equal_to("Ticker", "N/A"),
            include_metadata: true,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "namespace": "stock-descriptions",
                "vector": [0.5, 0.25],
                "topK": 10,
                "filter": {"Ticker": {"$ne": "N/A"}},
                "includeMetadata": true,
            })
        );
    }

    #[test]
    fn test_query_response_tolerates_missing_fields() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"matches":[{"id":"a","score":0.9},{"id":"b","score":0.8,"metadata":{"Name":"Tesla","Earnings_Growth":"n/a"}}]}"#,
        )
        .unwrap();

        assert_eq!(response.matches.len(), 2);
        assert!(response.matches[0].metadata.is_none());
        let metadata = response.matches[1].metadata.as_ref().unwrap();
        assert_eq!(metadata.get("Name"), Some(&json!("Tesla")));

        let empty: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.matches.is_empty());
    }
}
