/// Entity identifiers are opaque strings. New ids are UUIDs; ids coming from
/// imported backups (e.g. `proj1`) are kept verbatim.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (project/contract/task boundaries, reception day).
pub type Date = chrono::NaiveDate;

/// Generate a fresh entity id.
pub fn new_id() -> EntityId {
    uuid::Uuid::now_v7().to_string()
}

/// Format a date the way French documents print it: `dd/mm/yyyy`.
pub fn format_date_fr(date: Date) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format an instant as `dd/mm/yyyy HH:MM:SS` (UTC).
pub fn format_timestamp_fr(ts: Timestamp) -> String {
    ts.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Serde adapter for calendar dates.
///
/// Writes `YYYY-MM-DD`. Reads either a plain date or a full RFC 3339
/// timestamp (older backups stored `new Date().toISOString()` in date
/// fields), keeping only the date part.
pub mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse a date string accepting `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub fn parse(raw: &str) -> Result<NaiveDate, String> {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, FORMAT) {
            return Ok(date);
        }
        chrono::DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.date_naive())
            .map_err(|_| format!("Invalid date '{raw}'. Expected YYYY-MM-DD"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Holder {
        #[serde(with = "serde_date")]
        day: Date,
    }

    #[test]
    fn plain_date_is_read_and_written_unchanged() {
        let holder: Holder = serde_json::from_str(r#"{"day":"2024-03-20"}"#).unwrap();
        assert_eq!(holder.day, Date::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"day":"2024-03-20"}"#);
    }

    #[test]
    fn timestamp_is_truncated_to_its_date() {
        let holder: Holder =
            serde_json::from_str(r#"{"day":"2024-03-20T15:00:00.000Z"}"#).unwrap();
        assert_eq!(holder.day, Date::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn garbage_date_is_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"day":"20/03/2024"}"#).is_err());
    }

    #[test]
    fn french_formatting() {
        let d = Date::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(format_date_fr(d), "09/01/2024");
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
