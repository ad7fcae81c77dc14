use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a network's training history.
///
/// `validation_error` is `0.0` for runs without a validation set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochRecord {
    /// Zero-based epoch index within its training run.
    pub epoch: usize,
    pub training_error: f64,
    pub validation_error: f64,
    /// RFC 3339 UTC time at which the epoch finished.
    pub timestamp: String,
}

impl EpochRecord {
    pub fn new(epoch: usize, training_error: f64, validation_error: f64) -> Self {
        Self {
            epoch,
            training_error,
            validation_error,
            timestamp: now_timestamp(),
        }
    }
}

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let stamp = now_timestamp();
        assert!(stamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = EpochRecord {
            epoch: 3,
            training_error: 0.25,
            validation_error: 0.5,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["epoch"], 3);
        assert_eq!(json["trainingError"], 0.25);
        assert_eq!(json["validationError"], 0.5);
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00.000Z");
    }
}
