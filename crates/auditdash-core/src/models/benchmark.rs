//! Benchmark documents: per-item quality and relevance evaluations of a run

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::null_as_default;

/// Quality rating assigned by the benchmark judge
///
/// Labels outside the known four are kept verbatim so they can still be
/// displayed with the default treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
    Other(String),
}

impl QualityRating {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl Default for QualityRating {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for QualityRating {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Excellent" => Self::Excellent,
            "Good" => Self::Good,
            "Fair" => Self::Fair,
            "Poor" => Self::Poor,
            _ => Self::Other(label),
        }
    }
}

impl From<QualityRating> for String {
    fn from(rating: QualityRating) -> Self {
        match rating {
            QualityRating::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Judge verdict for a single item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Evaluation {
    pub quality_rating: QualityRating,
    pub quality_explanation: String,
    pub relevance_correct: bool,
    pub relevance_explanation: String,
}

/// Item id to evaluation, in the enumeration order of the source JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationMap {
    entries: Vec<(String, Evaluation)>,
}

impl EvaluationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an evaluation. An existing key keeps its position and has its
    /// value replaced; the previous value is returned.
    pub fn insert(&mut self, item_id: impl Into<String>, evaluation: Evaluation) -> Option<Evaluation> {
        let item_id = item_id.into();
        match self.entries.iter_mut().find(|(id, _)| *id == item_id) {
            Some((_, existing)) => Some(std::mem::replace(existing, evaluation)),
            None => {
                self.entries.push((item_id, evaluation));
                None
            }
        }
    }

    pub fn get(&self, item_id: &str) -> Option<&Evaluation> {
        self.entries
            .iter()
            .find(|(id, _)| id == item_id)
            .map(|(_, evaluation)| evaluation)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Evaluation)> {
        self.entries.iter().map(|(id, evaluation)| (id.as_str(), evaluation))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Evaluation)> for EvaluationMap {
    fn from_iter<I: IntoIterator<Item = (K, Evaluation)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (id, evaluation) in iter {
            map.insert(id, evaluation);
        }
        map
    }
}

impl Serialize for EvaluationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, evaluation) in &self.entries {
            map.serialize_entry(id, evaluation)?;
        }
        map.end()
    }
}

struct EvaluationMapVisitor;

impl<'de> Visitor<'de> for EvaluationMapVisitor {
    type Value = EvaluationMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping item ids to evaluations")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = EvaluationMap::new();
        while let Some((id, evaluation)) = access.next_entry::<String, Evaluation>()? {
            map.insert(id, evaluation);
        }
        Ok(map)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(EvaluationMap::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(EvaluationMap::new())
    }
}

impl<'de> Deserialize<'de> for EvaluationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EvaluationMapVisitor)
    }
}

/// Results of a benchmark pass over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchmarkRecord {
    pub total_items: u64,
    pub relevance_accuracy: f64,
    pub quality_score: f64,
    pub detailed_evaluations: EvaluationMap,
    pub persona_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub persona_focus_areas: Vec<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub missing_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judgement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl BenchmarkRecord {
    /// Failure reason reported by the service, if the benchmark did not complete
    pub fn failure(&self) -> Option<&str> {
        super::non_empty(self.failure_reason.as_deref())
    }
}

/// Whether a benchmark is currently running on the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchmarkStatus {
    pub is_running: bool,
}

/// Acknowledgement returned when a benchmark is started
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BenchmarkResponse {
    pub id: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogProgress {
    pub current: u64,
    pub total: u64,
}

/// One line of benchmark log output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<LogProgress>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Error body the service returns alongside non-success statuses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub code: i32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(rating: &str) -> Evaluation {
        Evaluation {
            quality_rating: QualityRating::from(rating.to_string()),
            ..Evaluation::default()
        }
    }

    #[test]
    fn test_quality_rating_known_and_unknown() {
        assert_eq!(QualityRating::from("Good".to_string()), QualityRating::Good);
        assert_eq!(
            QualityRating::from("Stellar".to_string()),
            QualityRating::Other("Stellar".to_string())
        );
        assert_eq!(QualityRating::Other("Stellar".into()).to_string(), "Stellar");
        assert_eq!(QualityRating::Fair.as_str(), "Fair");
    }

    #[test]
    fn test_evaluation_map_preserves_document_order() {
        let json = r#"{
            "zeta": {"qualityRating": "Poor"},
            "alpha": {"qualityRating": "Excellent"},
            "mid": {"qualityRating": "Fair"}
        }"#;
        let map: EvaluationMap = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha").unwrap().quality_rating, QualityRating::Excellent);
    }

    #[test]
    fn test_evaluation_map_repeated_key_replaces_in_place() {
        let json = r#"{"a": {"qualityRating": "Poor"}, "b": {}, "a": {"qualityRating": "Good"}}"#;
        let map: EvaluationMap = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().quality_rating, QualityRating::Good);
    }

    #[test]
    fn test_evaluation_map_null_is_empty() {
        let record: BenchmarkRecord =
            serde_json::from_str(r#"{"detailedEvaluations": null, "totalItems": 0}"#).unwrap();
        assert!(record.detailed_evaluations.is_empty());
    }

    #[test]
    fn test_evaluation_map_serializes_in_order() {
        let map: EvaluationMap = vec![("b", evaluation("Good")), ("a", evaluation("Fair"))]
            .into_iter()
            .collect();
        let out = serde_json::to_string(&map).unwrap();
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn test_benchmark_failure_reason() {
        let ok: BenchmarkRecord = serde_json::from_str(r#"{"failureReason": ""}"#).unwrap();
        assert!(ok.failure().is_none());

        let failed: BenchmarkRecord =
            serde_json::from_str(r#"{"failureReason": "LLM timed out"}"#).unwrap();
        assert_eq!(failed.failure(), Some("LLM timed out"));
    }

    #[test]
    fn test_log_entry_type_field() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"level": "info", "message": "started", "type": "log", "progress": {"current": 1, "total": 4}}"#,
        )
        .unwrap();
        assert_eq!(entry.kind.as_deref(), Some("log"));
        assert_eq!(entry.progress, Some(LogProgress { current: 1, total: 4 }));
    }
}
