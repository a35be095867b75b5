use crate::error::AppError;
use jiff::civil::Date;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{ "flightCodes": string[], "date"?: "YYYY-MM-DD" }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub flight_codes: Vec<String>,
    pub date: Option<Date>,
}

impl BatchRequest {
    /// Validates a decoded JSON body field by field so each shape problem
    /// gets its own message.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let Value::Object(mut body) = value else {
            return Err(AppError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        };

        let Some(Value::Array(codes)) = body.remove("flightCodes") else {
            return Err(AppError::Validation(
                "flightCodes must be an array".to_string(),
            ));
        };

        let flight_codes = codes
            .into_iter()
            .map(|code| match code {
                Value::String(code) => Ok(code),
                other => Err(AppError::Validation(format!(
                    "flightCodes must contain only strings, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let date = match body.remove("date") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if raw.trim().is_empty() => None,
            Some(Value::String(raw)) => Some(
                flightcheck_core::parse_date(&raw)
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "date must be a YYYY-MM-DD string, got {other}"
                )))
            }
        };

        Ok(Self { flight_codes, date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use serde_json::json;

    #[test]
    fn accepts_codes_with_and_without_date() {
        let request =
            BatchRequest::from_value(json!({ "flightCodes": ["AA 2641"], "date": "2025-03-14" }))
                .unwrap();
        assert_eq!(request.flight_codes, vec!["AA 2641".to_string()]);
        assert_eq!(request.date, Some(date(2025, 3, 14)));

        let undated = BatchRequest::from_value(json!({ "flightCodes": [] })).unwrap();
        assert_eq!(undated.date, None);
    }

    #[test]
    fn rejects_malformed_shapes() {
        for body in [
            json!([]),
            json!({}),
            json!({ "flightCodes": "AA2641" }),
            json!({ "flightCodes": ["AA2641", 7] }),
            json!({ "flightCodes": [], "date": "14/03/2025" }),
            json!({ "flightCodes": [], "date": 20250314 }),
        ] {
            let err = BatchRequest::from_value(body.clone()).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{body}");
        }
    }
}
