use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const WEIGHT: &str = "Weight";
pub const HEIGHT: &str = "Height";
pub const WAIST_CIRCUMFERENCE: &str = "WaistCircumference";
pub const PHYSICAL_ACTIVITY_LEVEL: &str = "PhysicalActivityLevel";
pub const FAMILY_HISTORY: &str = "FamilyHistory";
pub const ETHNICITY: &str = "Ethnicity";
pub const PREDIABETES: &str = "Prediabetes";
pub const CONDITIONS: &str = "Conditions";

/// A single submitted answer, as typed or picked in the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// A checkbox-style answer; `true` reads as "Yes".
    Flag(bool),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Raw questionnaire submission keyed by wire field name.
pub type RawFields = HashMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Number,
    Choice,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Number(f64),
    Text(&'static str),
}

/// How the display surface should render one question.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub options: &'static [&'static str],
    pub default: FieldDefault,
}

const YES_NO: &[&str] = &["Yes", "No"];

/// Questionnaire fields in presentation and validation order.
pub const FORM_FIELDS: &[FormField] = &[
    FormField {
        key: AGE,
        label: "Age",
        kind: FieldKind::Integer,
        options: &[],
        default: FieldDefault::Number(30.0),
    },
    FormField {
        key: GENDER,
        label: "Gender",
        kind: FieldKind::Choice,
        options: &["Male", "Female", "Other"],
        default: FieldDefault::Text("Male"),
    },
    FormField {
        key: WEIGHT,
        label: "Weight (lbs)",
        kind: FieldKind::Number,
        options: &[],
        default: FieldDefault::Number(150.0),
    },
    FormField {
        key: HEIGHT,
        label: "Height (inches)",
        kind: FieldKind::Number,
        options: &[],
        default: FieldDefault::Number(65.0),
    },
    FormField {
        key: WAIST_CIRCUMFERENCE,
        label: "Waist circumference (inches)",
        kind: FieldKind::Number,
        options: &[],
        default: FieldDefault::Number(30.0),
    },
    FormField {
        key: PHYSICAL_ACTIVITY_LEVEL,
        label: "Physical activity level",
        kind: FieldKind::Choice,
        options: &["Sedentary", "Moderately Active", "Very Active"],
        default: FieldDefault::Text("Sedentary"),
    },
    FormField {
        key: FAMILY_HISTORY,
        label: "Family history of diabetes?",
        kind: FieldKind::Choice,
        options: YES_NO,
        default: FieldDefault::Text("Yes"),
    },
    FormField {
        key: ETHNICITY,
        label: "Race/ethnicity",
        kind: FieldKind::Text,
        options: &[],
        default: FieldDefault::Text("Asian"),
    },
    FormField {
        key: PREDIABETES,
        label: "Have you ever been diagnosed with prediabetes?",
        kind: FieldKind::Choice,
        options: YES_NO,
        default: FieldDefault::Text("Yes"),
    },
    FormField {
        key: CONDITIONS,
        label: "Do you have any of the following conditions: high blood pressure, \
                high cholesterol, or heart disease?",
        kind: FieldKind::Choice,
        options: YES_NO,
        default: FieldDefault::Text("Yes"),
    },
];

/// A submission pre-filled with every default answer.
pub fn default_fields() -> RawFields {
    FORM_FIELDS
        .iter()
        .map(|f| {
            let value = match f.default {
                FieldDefault::Number(n) => FieldValue::Number(n),
                FieldDefault::Text(t) => FieldValue::Text(t.to_string()),
            };
            (f.key.to_string(), value)
        })
        .collect()
}
