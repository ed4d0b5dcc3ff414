use super::id_from_any;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const LABEL_FORMAT: &str = "%a, %d %b %Y • %I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Open,
    Closed,
    Completed,
    Cancelled,
}

/// A scheduled delivery run customers attach their orders to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySession {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default = "unknown_location")]
    pub location: String,
    #[serde(with = "timestamp", alias = "datetime")]
    pub delivery_datetime: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub cutoff_time: NaiveDateTime,
    #[serde(default)]
    pub status: DeliveryStatus,
}

fn unknown_location() -> String {
    "Unknown Location".to_string()
}

impl DeliverySession {
    /// Open sessions accept orders until their cutoff.
    pub fn is_accepting(&self, now: NaiveDateTime) -> bool {
        self.status == DeliveryStatus::Open && now < self.cutoff_time
    }

    pub fn time_label(&self) -> String {
        format_timestamp(&self.delivery_datetime)
    }

    /// `"{location} • {time}"`
    pub fn button_label(&self) -> String {
        format!("{} • {}", self.location, self.time_label())
    }

    /// Stores keep numeric session ids; other ids are recorded as absent.
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(LABEL_FORMAT).to_string()
}

/// Naive local timestamps, written as ISO-8601 and read from the shapes the
/// data sources have used over time.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    const READ_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        READ_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        timestamp::parse(raw).unwrap()
    }

    #[test]
    fn reads_legacy_and_iso_shapes() {
        let session: DeliverySession = serde_json::from_str(
            r#"{"id": 12, "location": "NUS UTown", "datetime": "2026-10-20 21:30",
                "cutoff_time": "2026-10-20T18:00:00+08:00", "status": "open"}"#,
        )
        .unwrap();

        assert_eq!(session.id, "12");
        assert_eq!(session.numeric_id(), Some(12));
        assert_eq!(session.delivery_datetime, at("2026-10-20T21:30:00"));
        assert_eq!(session.cutoff_time, at("2026-10-20T18:00:00"));
        assert_eq!(session.button_label(), "NUS UTown • Tue, 20 Oct 2026 • 09:30 PM");
    }

    #[test]
    fn accepting_until_cutoff_while_open() {
        let mut session = DeliverySession {
            id: "d-1".to_string(),
            location: "Clementi".to_string(),
            delivery_datetime: at("2026-10-20T21:00:00"),
            cutoff_time: at("2026-10-20T18:00:00"),
            status: DeliveryStatus::Open,
        };
        assert!(session.is_accepting(at("2026-10-20T17:59:59")));
        assert!(!session.is_accepting(at("2026-10-20T18:00:00")));
        assert_eq!(session.numeric_id(), None);

        session.status = DeliveryStatus::Closed;
        assert!(!session.is_accepting(at("2026-10-20T12:00:00")));
    }
}
