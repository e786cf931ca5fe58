//! Report shapes the model is prompted to return.
//!
//! Responses are passed through as raw JSON; these types describe the shape
//! the validator checks against and build the contextual fallback body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::validation::{ExpectedShape, ShapeCheck, ShapeViolation};

/// One observed handwriting feature and what it is read to mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitReading {
    pub feature: String,
    pub observation: String,
    pub interpretation: String,
    /// Free text from the model, e.g. "Tinggi" / "Sedang" / "Rendah".
    pub confidence: String,
}

/// Result of the unconditioned analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub personality_summary: String,
    pub traits: Vec<TraitReading>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub graphology_basis: Vec<String>,
}

impl ExpectedShape for AnalysisReport {
    const NAME: &'static str = "AnalysisReport";

    fn violations(value: &Value) -> Vec<ShapeViolation> {
        ShapeCheck::root(value)
            .string("personalitySummary")
            .object_array("traits", |t| {
                t.string("feature")
                    .string("observation")
                    .string("interpretation")
                    .string("confidence")
            })
            .string_array("strengths")
            .string_array("weaknesses")
            .string_array("graphologyBasis")
            .finish()
    }
}

/// Result of the context-scored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextualAssessment {
    /// 0 – 100
    pub suitability_score: u32,
    pub relevance_explanation: String,
    pub actionable_advice: Vec<String>,
    pub specific_risks: Vec<String>,
}

impl ContextualAssessment {
    /// Zero-score result returned when the analysis could not be produced.
    pub fn degraded(message: &str) -> Self {
        Self {
            suitability_score: 0,
            relevance_explanation: message.to_string(),
            actionable_advice: vec![],
            specific_risks: vec![],
        }
    }
}

impl ExpectedShape for ContextualAssessment {
    const NAME: &'static str = "ContextualAssessment";

    fn violations(value: &Value) -> Vec<ShapeViolation> {
        ShapeCheck::root(value)
            .percentage("suitabilityScore")
            .string("relevanceExplanation")
            .string_array("actionableAdvice")
            .string_array("specificRisks")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> Value {
        json!({
            "personalitySummary": "Penulis tampak teliti dan terstruktur.",
            "traits": [{
                "feature": "Kemiringan",
                "observation": "Condong ke kanan",
                "interpretation": "Ekspresif secara emosional",
                "confidence": "Sedang"
            }],
            "strengths": ["Teliti"],
            "weaknesses": ["Perfeksionis"],
            "graphologyBasis": ["Kemiringan huruf", "Tekanan pena"]
        })
    }

    #[test]
    fn test_report_fixture_deserializes_into_typed_report() {
        let report: AnalysisReport = serde_json::from_value(sample_report()).unwrap();
        assert_eq!(report.traits.len(), 1);
        assert_eq!(report.traits[0].confidence, "Sedang");
        assert_eq!(report.graphology_basis.len(), 2);
    }

    #[test]
    fn test_conformant_report_has_no_violations() {
        assert!(AnalysisReport::violations(&sample_report()).is_empty());
    }

    #[test]
    fn test_report_missing_traits_field_is_flagged() {
        let mut value = sample_report();
        value.as_object_mut().unwrap().remove("traits");
        let violations = AnalysisReport::violations(&value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "traits");
    }

    #[test]
    fn test_report_trait_with_numeric_confidence_is_flagged() {
        let mut value = sample_report();
        value["traits"][0]["confidence"] = json!(0.8);
        let violations = AnalysisReport::violations(&value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "traits[0].confidence");
    }

    #[test]
    fn test_assessment_score_as_string_is_flagged() {
        let value = json!({
            "suitabilityScore": "72",
            "relevanceExplanation": "ok",
            "actionableAdvice": [],
            "specificRisks": []
        });
        let violations = ContextualAssessment::violations(&value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "suitabilityScore");
    }

    #[test]
    fn test_degraded_assessment_serializes_to_fallback_shape() {
        let value = serde_json::to_value(ContextualAssessment::degraded("gagal")).unwrap();
        assert_eq!(
            value,
            json!({
                "suitabilityScore": 0,
                "relevanceExplanation": "gagal",
                "actionableAdvice": [],
                "specificRisks": []
            })
        );
        assert!(ContextualAssessment::violations(&value).is_empty());
    }
}
