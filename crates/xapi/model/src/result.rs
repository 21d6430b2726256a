//! Measured outcomes of a statement.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::activity::hash_extension_keys;
use crate::Extensions;

/// A score attached to a [`StatementResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Score normalized to the range [-1, 1].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled: Option<f64>,

    /// Unnormalized score between `min` and `max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,

    /// Lowest possible raw score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Highest possible raw score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Score {
    /// Starts building a Score.
    pub fn builder() -> ScoreBuilder {
        ScoreBuilder {
            score: Score::default(),
        }
    }
}

impl Hash for Score {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for field in [&self.scaled, &self.raw, &self.min, &self.max] {
            field.map(f64::to_bits).hash(state);
        }
    }
}

/// Builder for [`Score`].
#[derive(Debug)]
pub struct ScoreBuilder {
    score: Score,
}

impl ScoreBuilder {
    /// Sets the scaled score.
    pub fn scaled(mut self, scaled: f64) -> Self {
        self.score.scaled = Some(scaled);
        self
    }

    /// Sets the raw score.
    pub fn raw(mut self, raw: f64) -> Self {
        self.score.raw = Some(raw);
        self
    }

    /// Sets the minimum possible score.
    pub fn min(mut self, min: f64) -> Self {
        self.score.min = Some(min);
        self
    }

    /// Sets the maximum possible score.
    pub fn max(mut self, max: f64) -> Self {
        self.score.max = Some(max);
        self
    }

    /// Finishes the Score.
    pub fn build(self) -> Score {
        self.score
    }
}

/// Further details representing a measured outcome.
///
/// Named `StatementResult` here because the wire name `Result` collides with
/// the prelude; wire keys are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    /// The score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    /// Whether the attempt was successful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    /// Whether the Activity was completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<bool>,

    /// Response to the Activity, format free.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Duration over which the statement occurred, as ISO 8601 duration
    /// text. Kept verbatim so the original representation survives
    /// round-trips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Domain-specific extension map, keyed by absolute IRI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
}

impl StatementResult {
    /// Starts building a result.
    pub fn builder() -> StatementResultBuilder {
        StatementResultBuilder {
            result: StatementResult::default(),
        }
    }
}

impl Hash for StatementResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.score.hash(state);
        self.success.hash(state);
        self.completion.hash(state);
        self.response.hash(state);
        self.duration.hash(state);
        hash_extension_keys(&self.extensions, state);
    }
}

/// Builder for [`StatementResult`].
#[derive(Debug)]
pub struct StatementResultBuilder {
    result: StatementResult,
}

impl StatementResultBuilder {
    /// Sets the score.
    pub fn score(mut self, score: Score) -> Self {
        self.result.score = Some(score);
        self
    }

    /// Sets the score through a nested builder.
    pub fn score_with(self, f: impl FnOnce(ScoreBuilder) -> ScoreBuilder) -> Self {
        self.score(f(Score::builder()).build())
    }

    /// Sets the success flag.
    pub fn success(mut self, success: bool) -> Self {
        self.result.success = Some(success);
        self
    }

    /// Sets the completion flag.
    pub fn completion(mut self, completion: bool) -> Self {
        self.result.completion = Some(completion);
        self
    }

    /// Sets the response text.
    pub fn response(mut self, response: impl Into<String>) -> Self {
        self.result.response = Some(response.into());
        self
    }

    /// Sets the duration text.
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.result.duration = Some(duration.into());
        self
    }

    /// Adds an extension entry, accumulating across calls.
    pub fn extension(mut self, iri: impl Into<String>, value: serde_json::Value) -> Self {
        self.result
            .extensions
            .get_or_insert_with(Extensions::new)
            .insert(iri.into(), value);
        self
    }

    /// Finishes the result.
    pub fn build(self) -> StatementResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_expected_wire_form() {
        let result = StatementResult::builder()
            .score_with(|s| s.scaled(0.95).raw(95.0).min(0.0).max(100.0))
            .success(true)
            .completion(true)
            .duration("PT1H0M0S")
            .build();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({
                "score": {"scaled": 0.95, "raw": 95.0, "min": 0.0, "max": 100.0},
                "success": true,
                "completion": true,
                "duration": "PT1H0M0S"
            })
        );

        let decoded: StatementResult = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn empty_result_serializes_as_empty_object() {
        let result = StatementResult::default();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({}));
    }

    #[test]
    fn duration_text_survives_verbatim() {
        let decoded: StatementResult =
            serde_json::from_value(json!({"duration": "P1DT12H"})).unwrap();
        assert_eq!(decoded.duration.as_deref(), Some("P1DT12H"));
        assert_eq!(
            serde_json::to_value(&decoded).unwrap()["duration"],
            "P1DT12H"
        );
    }
}
