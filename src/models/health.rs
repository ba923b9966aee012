use serde::{Deserialize, Serialize};

use super::enums::{ActivityLevel, Gender, RiskLabel};

/// Fully validated questionnaire answers, built by the form collector.
///
/// Every field is required, so a partially filled record cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthDataRecord {
    pub age: u32,
    pub gender: Gender,
    pub weight_lbs: f64,
    pub height_inches: f64,
    pub waist_circumference_inches: f64,
    pub physical_activity_level: ActivityLevel,
    pub family_history: bool,
    pub ethnicity: String,
    pub prediabetes: bool,
    pub has_comorbid_condition: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_label: RiskLabel,
}

impl PredictionResult {
    pub fn at_risk() -> Self {
        Self { risk_label: RiskLabel::AtRisk }
    }

    pub fn not_at_risk() -> Self {
        Self { risk_label: RiskLabel::NotAtRisk }
    }

    /// Result to show when the prediction endpoint failed.
    pub fn unknown() -> Self {
        Self { risk_label: RiskLabel::Unknown }
    }
}
