//! Field extractors.
//!
//! Each helper turns one resource field into zero or one sample. They are
//! total over the field's type: an unset optional field produces no sample,
//! never a zero.

use chrono::{DateTime, Utc};

use super::Sample;

/// Label carrying the value of a string status field.
pub const REVISION_LABEL: &str = "revision";

/// Always emits the value; used for fields that default to zero.
pub fn value(value: f64) -> Vec<Sample> {
    vec![Sample::new(value)]
}

/// Emits the value only when it is present.
pub fn optional(value: Option<f64>) -> Vec<Sample> {
    value.map(Sample::new).into_iter().collect()
}

/// Emits the timestamp as Unix seconds when it is set. The Unix epoch
/// itself is a set value and renders as `0`.
pub fn timestamp(time: Option<&DateTime<Utc>>) -> Vec<Sample> {
    optional(time.map(|t| t.timestamp() as f64))
}

/// Encodes a string field as a sample of value `1` with the string in
/// `label`. Empty strings are treated as unset.
pub fn label_valued(label: &str, value: &str) -> Vec<Sample> {
    if value.is_empty() {
        return Vec::new();
    }
    vec![Sample::with_label(label, value, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_optional_distinguishes_unset_from_zero() {
        assert!(optional(None).is_empty());
        assert_eq!(optional(Some(0.0)), vec![Sample::new(0.0)]);
    }

    #[test]
    fn test_timestamp_in_seconds() {
        let created = Utc.timestamp_opt(1_500_000_000, 0).unwrap();
        assert_eq!(timestamp(Some(&created)), vec![Sample::new(1.5e9)]);
        assert!(timestamp(None).is_empty());

        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(timestamp(Some(&epoch)), vec![Sample::new(0.0)]);
    }

    #[test]
    fn test_label_valued() {
        let samples = label_valued(REVISION_LABEL, "cr1");
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 1.0);
        assert_eq!(samples[0].labels, vec![("revision".to_string(), "cr1".to_string())]);
        assert!(label_valued(REVISION_LABEL, "").is_empty());
    }
}
