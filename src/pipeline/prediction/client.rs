use serde::{Deserialize, Serialize};

use super::{RiskPredictor, TransportError};
use crate::models::enums::{ActivityLevel, Gender, YesNo};
use crate::models::{HealthDataRecord, PredictionResult};

/// Blocking HTTP client for the diabetes prediction endpoint.
///
/// One POST per call, no retries, and the reqwest default timeout.
pub struct PredictionClient {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl PredictionClient {
    pub fn new(endpoint: &str) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("xplovo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientSetup(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn network_failure(&self, e: &reqwest::Error) -> TransportError {
        let detail = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("connection failed: {e}")
        } else {
            e.to_string()
        };
        TransportError::NetworkFailure {
            endpoint: self.endpoint.clone(),
            detail,
        }
    }
}

/// Request body sent to the prediction endpoint (keys are case-sensitive).
#[derive(Debug, Serialize)]
pub struct PredictionRequest<'a> {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "WaistCircumference")]
    pub waist_circumference: f64,
    #[serde(rename = "PhysicalActivityLevel")]
    pub physical_activity_level: ActivityLevel,
    #[serde(rename = "FamilyHistory")]
    pub family_history: YesNo,
    #[serde(rename = "Ethnicity")]
    pub ethnicity: &'a str,
    #[serde(rename = "Prediabetes")]
    pub prediabetes: YesNo,
    #[serde(rename = "Conditions")]
    pub conditions: YesNo,
}

impl<'a> From<&'a HealthDataRecord> for PredictionRequest<'a> {
    fn from(record: &'a HealthDataRecord) -> Self {
        Self {
            age: record.age,
            gender: record.gender,
            weight: record.weight_lbs,
            height: record.height_inches,
            waist_circumference: record.waist_circumference_inches,
            physical_activity_level: record.physical_activity_level,
            family_history: YesNo::from_bool(record.family_history),
            ethnicity: &record.ethnicity,
            prediabetes: YesNo::from_bool(record.prediabetes),
            conditions: YesNo::from_bool(record.has_comorbid_condition),
        }
    }
}

/// Response body from the prediction endpoint.
#[derive(Deserialize)]
struct PredictionResponse {
    prediction: i64,
}

impl RiskPredictor for PredictionClient {
    fn predict(&self, record: &HealthDataRecord) -> Result<PredictionResult, TransportError> {
        let body = PredictionRequest::from(record);
        tracing::debug!(endpoint = %self.endpoint, "Sending prediction request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| self.network_failure(&e))?;

        let status = response.status();
        let text = response.text().map_err(|e| self.network_failure(&e))?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Prediction endpoint returned an error");
            return Err(TransportError::UnexpectedStatus {
                status_code: status.as_u16(),
                body: text,
            });
        }

        let parsed: PredictionResponse =
            serde_json::from_str(&text).map_err(|_| TransportError::MalformedBody {
                status_code: status.as_u16(),
                body: text.clone(),
            })?;

        match parsed.prediction {
            1 => Ok(PredictionResult::at_risk()),
            0 => Ok(PredictionResult::not_at_risk()),
            other => {
                tracing::warn!(prediction = other, "Prediction outside the 0/1 range");
                Err(TransportError::MalformedBody {
                    status_code: status.as_u16(),
                    body: text,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    use super::*;
    use crate::models::enums::RiskLabel;
    use crate::test_support::{refused_url, spawn_stub};

    fn sample_record() -> HealthDataRecord {
        HealthDataRecord {
            age: 30,
            gender: Gender::Male,
            weight_lbs: 150.0,
            height_inches: 65.0,
            waist_circumference_inches: 30.0,
            physical_activity_level: ActivityLevel::ModeratelyActive,
            family_history: true,
            ethnicity: "Asian".into(),
            prediabetes: false,
            has_comorbid_condition: false,
        }
    }

    fn stub_replying(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/predict", post(move || async move { (status, body) }));
        format!("{}/predict", spawn_stub(app))
    }

    #[test]
    fn request_uses_wire_keys_and_yes_no_strings() {
        let record = sample_record();
        let json = serde_json::to_value(PredictionRequest::from(&record)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Age": 30,
                "Gender": "Male",
                "Weight": 150.0,
                "Height": 65.0,
                "WaistCircumference": 30.0,
                "PhysicalActivityLevel": "Moderately Active",
                "FamilyHistory": "Yes",
                "Ethnicity": "Asian",
                "Prediabetes": "No",
                "Conditions": "No",
            })
        );
    }

    #[test]
    fn client_keeps_configured_endpoint() {
        let client = PredictionClient::new("http://localhost:5000/predict").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/predict");
    }

    #[test]
    fn prediction_one_is_at_risk() {
        let url = stub_replying(StatusCode::OK, r#"{"prediction": 1}"#);
        let client = PredictionClient::new(&url).unwrap();
        let result = client.predict(&sample_record()).unwrap();
        assert_eq!(result.risk_label, RiskLabel::AtRisk);
    }

    #[test]
    fn prediction_zero_is_not_at_risk() {
        let url = stub_replying(StatusCode::OK, r#"{"prediction": 0}"#);
        let client = PredictionClient::new(&url).unwrap();
        let result = client.predict(&sample_record()).unwrap();
        assert_eq!(result.risk_label, RiskLabel::NotAtRisk);
    }

    #[test]
    fn server_error_is_transport_error() {
        let url = stub_replying(StatusCode::INTERNAL_SERVER_ERROR, "model crashed");
        let client = PredictionClient::new(&url).unwrap();
        let err = client.predict(&sample_record()).unwrap_err();
        assert_eq!(
            err,
            TransportError::UnexpectedStatus {
                status_code: 500,
                body: "model crashed".into(),
            }
        );
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn non_200_success_status_is_still_an_error() {
        let url = stub_replying(StatusCode::ACCEPTED, r#"{"prediction": 1}"#);
        let client = PredictionClient::new(&url).unwrap();
        let err = client.predict(&sample_record()).unwrap_err();
        assert_eq!(err.status_code(), Some(202));
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let url = stub_replying(StatusCode::OK, "<html>oops</html>");
        let client = PredictionClient::new(&url).unwrap();
        let err = client.predict(&sample_record()).unwrap_err();
        assert!(matches!(err, TransportError::MalformedBody { status_code: 200, .. }));
    }

    #[test]
    fn prediction_outside_range_is_malformed() {
        let url = stub_replying(StatusCode::OK, r#"{"prediction": 7}"#);
        let client = PredictionClient::new(&url).unwrap();
        let err = client.predict(&sample_record()).unwrap_err();
        assert!(matches!(err, TransportError::MalformedBody { .. }));
    }

    #[test]
    fn connection_refused_is_network_failure() {
        let url = format!("{}/predict", refused_url());
        let client = PredictionClient::new(&url).unwrap();
        let err = client.predict(&sample_record()).unwrap_err();
        assert!(matches!(err, TransportError::NetworkFailure { .. }));
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn endpoint_receives_serialized_record() {
        let (tx, rx) = mpsc::channel::<serde_json::Value>();
        let tx = Arc::new(Mutex::new(tx));
        let app = Router::new().route(
            "/predict",
            post(move |Json(body): Json<serde_json::Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.lock().unwrap().send(body);
                    Json(serde_json::json!({ "prediction": 0 }))
                }
            }),
        );
        let url = format!("{}/predict", spawn_stub(app));

        let client = PredictionClient::new(&url).unwrap();
        client.predict(&sample_record()).unwrap();

        let received = rx.recv().unwrap();
        assert_eq!(received["Age"], 30);
        assert_eq!(received["Conditions"], "No");
        assert_eq!(received["FamilyHistory"], "Yes");
    }
}
