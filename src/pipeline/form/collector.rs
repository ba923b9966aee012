use std::str::FromStr;

use super::fields::*;
use super::ValidationError;
use crate::models::enums::{ActivityLevel, Gender, YesNo};
use crate::models::HealthDataRecord;

/// Validate a raw questionnaire submission into a `HealthDataRecord`.
///
/// Fields are checked in `FORM_FIELDS` order and the first violation is
/// returned, so the same bad submission always reports the same field.
pub fn collect(raw: &RawFields) -> Result<HealthDataRecord, ValidationError> {
    let age = whole_number(raw, AGE)?;
    let gender: Gender = choice(raw, GENDER)?;
    let weight_lbs = measurement(raw, WEIGHT)?;
    let height_inches = measurement(raw, HEIGHT)?;
    let waist_circumference_inches = measurement(raw, WAIST_CIRCUMFERENCE)?;
    let physical_activity_level: ActivityLevel = choice(raw, PHYSICAL_ACTIVITY_LEVEL)?;
    let family_history: YesNo = choice(raw, FAMILY_HISTORY)?;
    let ethnicity = free_text(raw, ETHNICITY)?;
    let prediabetes: YesNo = choice(raw, PREDIABETES)?;
    let conditions: YesNo = choice(raw, CONDITIONS)?;

    Ok(HealthDataRecord {
        age,
        gender,
        weight_lbs,
        height_inches,
        waist_circumference_inches,
        physical_activity_level,
        family_history: family_history.as_bool(),
        ethnicity,
        prediabetes: prediabetes.as_bool(),
        has_comorbid_condition: conditions.as_bool(),
    })
}

fn required<'a>(raw: &'a RawFields, field: &'static str) -> Result<&'a FieldValue, ValidationError> {
    raw.get(field)
        .ok_or_else(|| ValidationError::new(field, "is required"))
}

fn measurement(raw: &RawFields, field: &'static str) -> Result<f64, ValidationError> {
    let value = match required(raw, field)? {
        FieldValue::Number(n) => *n,
        FieldValue::Text(t) => {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::new(field, "is required"));
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::new(field, format!("must be a number, got {t:?}")))?
        }
        FieldValue::Flag(b) => {
            return Err(ValidationError::new(field, format!("must be a number, got {b}")))
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, "must be zero or greater"));
    }
    Ok(value)
}

fn whole_number(raw: &RawFields, field: &'static str) -> Result<u32, ValidationError> {
    let value = measurement(raw, field)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::new(field, "must be a whole number"));
    }
    if value > f64::from(u32::MAX) {
        return Err(ValidationError::new(field, "is out of range"));
    }
    Ok(value as u32)
}

fn choice<T>(raw: &RawFields, field: &'static str) -> Result<T, ValidationError>
where
    T: FromStr,
{
    let options = FORM_FIELDS
        .iter()
        .find(|f| f.key == field)
        .map(|f| f.options.join(", "))
        .unwrap_or_default();

    match required(raw, field)? {
        FieldValue::Text(t) => t
            .parse::<T>()
            .map_err(|_| ValidationError::new(field, format!("must be one of {options}, got {t:?}"))),
        FieldValue::Flag(b) => YesNo::from_bool(*b)
            .as_str()
            .parse::<T>()
            .map_err(|_| ValidationError::new(field, format!("must be one of {options}, got {b}"))),
        FieldValue::Number(n) => Err(ValidationError::new(
            field,
            format!("must be one of {options}, got {n}"),
        )),
    }
}

fn free_text(raw: &RawFields, field: &'static str) -> Result<String, ValidationError> {
    match required(raw, field)? {
        FieldValue::Text(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        FieldValue::Text(_) => Err(ValidationError::new(field, "must not be empty")),
        FieldValue::Number(_) | FieldValue::Flag(_) => {
            Err(ValidationError::new(field, "must be text"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> RawFields {
        [
            (AGE, FieldValue::from(30_i64)),
            (GENDER, "Male".into()),
            (WEIGHT, 150_i64.into()),
            (HEIGHT, 65_i64.into()),
            (WAIST_CIRCUMFERENCE, 30_i64.into()),
            (PHYSICAL_ACTIVITY_LEVEL, "Sedentary".into()),
            (FAMILY_HISTORY, "No".into()),
            (ETHNICITY, "Asian".into()),
            (PREDIABETES, "No".into()),
            (CONDITIONS, "No".into()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn with(field: &str, value: FieldValue) -> RawFields {
        let mut raw = valid_fields();
        raw.insert(field.to_string(), value);
        raw
    }

    #[test]
    fn valid_submission_builds_record() {
        let record = collect(&valid_fields()).unwrap();
        assert_eq!(record.age, 30);
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.weight_lbs, 150.0);
        assert_eq!(record.height_inches, 65.0);
        assert_eq!(record.waist_circumference_inches, 30.0);
        assert_eq!(record.physical_activity_level, ActivityLevel::Sedentary);
        assert_eq!(record.ethnicity, "Asian");
        assert!(!record.family_history);
        assert!(!record.prediabetes);
        assert!(!record.has_comorbid_condition);
    }

    #[test]
    fn yes_answers_become_true() {
        let mut raw = valid_fields();
        raw.insert(FAMILY_HISTORY.into(), "Yes".into());
        raw.insert(PREDIABETES.into(), "yes".into());
        raw.insert(CONDITIONS.into(), "Yes".into());
        let record = collect(&raw).unwrap();
        assert!(record.family_history);
        assert!(record.prediabetes);
        assert!(record.has_comorbid_condition);
    }

    #[test]
    fn negative_age_is_rejected() {
        let err = collect(&with(AGE, (-1_i64).into())).unwrap_err();
        assert_eq!(err.field, "Age");
        assert_eq!(err.reason, "must be zero or greater");
    }

    #[test]
    fn fractional_age_is_rejected() {
        let err = collect(&with(AGE, 30.5_f64.into())).unwrap_err();
        assert_eq!(err.field, AGE);
        assert_eq!(err.reason, "must be a whole number");
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let mut raw = with(AGE, "42".into());
        raw.insert(WEIGHT.into(), " 180.5 ".into());
        let record = collect(&raw).unwrap();
        assert_eq!(record.age, 42);
        assert_eq!(record.weight_lbs, 180.5);
    }

    #[test]
    fn non_numeric_measurement_is_rejected() {
        let err = collect(&with(HEIGHT, "tall".into())).unwrap_err();
        assert_eq!(err.field, HEIGHT);
        assert!(err.reason.starts_with("must be a number"));
    }

    #[test]
    fn negative_measurements_are_rejected() {
        for field in [WEIGHT, HEIGHT, WAIST_CIRCUMFERENCE] {
            let err = collect(&with(field, (-0.5_f64).into())).unwrap_err();
            assert_eq!(err.field, field);
        }
    }

    #[test]
    fn non_finite_number_is_rejected() {
        let err = collect(&with(WEIGHT, f64::INFINITY.into())).unwrap_err();
        assert_eq!(err.field, WEIGHT);
        assert_eq!(err.reason, "must be a finite number");
    }

    #[test]
    fn zero_is_allowed() {
        let mut raw = with(AGE, 0_i64.into());
        raw.insert(WAIST_CIRCUMFERENCE.into(), 0_i64.into());
        let record = collect(&raw).unwrap();
        assert_eq!(record.age, 0);
        assert_eq!(record.waist_circumference_inches, 0.0);
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let err = collect(&with(GENDER, "Robot".into())).unwrap_err();
        assert_eq!(err.field, GENDER);
        assert!(err.reason.contains("Male, Female, Other"));
    }

    #[test]
    fn activity_level_accepts_compact_spelling() {
        let record = collect(&with(PHYSICAL_ACTIVITY_LEVEL, "ModeratelyActive".into())).unwrap();
        assert_eq!(record.physical_activity_level, ActivityLevel::ModeratelyActive);
    }

    #[test]
    fn yes_no_rejects_other_answers() {
        let err = collect(&with(PREDIABETES, "Maybe".into())).unwrap_err();
        assert_eq!(err.field, PREDIABETES);
    }

    #[test]
    fn choice_given_as_number_is_rejected() {
        let err = collect(&with(CONDITIONS, 1_i64.into())).unwrap_err();
        assert_eq!(err.field, CONDITIONS);
    }

    #[test]
    fn boolean_answers_map_to_yes_no() {
        let mut raw = with(FAMILY_HISTORY, true.into());
        raw.insert(PREDIABETES.into(), false.into());
        let record = collect(&raw).unwrap();
        assert!(record.family_history);
        assert!(!record.prediabetes);
    }

    #[test]
    fn boolean_for_other_fields_is_rejected() {
        let err = collect(&with(GENDER, true.into())).unwrap_err();
        assert_eq!(err.field, GENDER);
        assert!(err.reason.contains("got true"));

        let err = collect(&with(WEIGHT, false.into())).unwrap_err();
        assert_eq!(err, ValidationError::new(WEIGHT, "must be a number, got false"));

        let err = collect(&with(ETHNICITY, true.into())).unwrap_err();
        assert_eq!(err.field, ETHNICITY);
    }

    #[test]
    fn blank_ethnicity_is_rejected() {
        let err = collect(&with(ETHNICITY, "   ".into())).unwrap_err();
        assert_eq!(err.field, ETHNICITY);
        assert_eq!(err.reason, "must not be empty");
    }

    #[test]
    fn missing_field_is_required() {
        let mut raw = valid_fields();
        raw.remove(WAIST_CIRCUMFERENCE);
        let err = collect(&raw).unwrap_err();
        assert_eq!(err, ValidationError::new(WAIST_CIRCUMFERENCE, "is required"));
    }

    #[test]
    fn first_failing_field_in_form_order_wins() {
        let mut raw = valid_fields();
        raw.insert(CONDITIONS.into(), "Perhaps".into());
        raw.insert(GENDER.into(), "Unknown".into());
        raw.insert(AGE.into(), (-3_i64).into());
        assert_eq!(collect(&raw).unwrap_err().field, AGE);

        raw.insert(AGE.into(), 30_i64.into());
        assert_eq!(collect(&raw).unwrap_err().field, GENDER);

        raw.insert(GENDER.into(), "Female".into());
        assert_eq!(collect(&raw).unwrap_err().field, CONDITIONS);
    }

    #[test]
    fn defaults_form_a_valid_submission() {
        let record = collect(&default_fields()).unwrap();
        assert_eq!(record.age, 30);
        assert!(record.family_history);
    }
}
