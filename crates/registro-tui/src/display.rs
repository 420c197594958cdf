//! Text formatting for record fields.

use chrono::{DateTime, NaiveDateTime, TimeDelta};

/// Rendered in place of a missing timestamp.
pub const FECHA_PLACEHOLDER: &str = "N/A";

/// Fixed shift applied to every timestamp before display.
const DISPLAY_OFFSET_HOURS: i64 = 5;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Format a server timestamp as `dd/mm/yyyy, HH:MM` after the fixed +5h
/// shift. The shift applies to the wall-clock value as transmitted; any
/// offset carried by the string is ignored. Unparseable values, and values
/// the shift would push out of range, are shown verbatim.
pub fn format_fecha(fecha: Option<&str>) -> String {
    let Some(raw) = fecha.filter(|raw| !raw.trim().is_empty()) else {
        return FECHA_PLACEHOLDER.to_string();
    };
    parse_wall_clock(raw.trim())
        .and_then(|value| value.checked_add_signed(TimeDelta::hours(DISPLAY_OFFSET_HOURS)))
        .map(|value| value.format("%d/%m/%Y, %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::{FECHA_PLACEHOLDER, format_fecha};
    use pretty_assertions::assert_eq;

    #[test]
    fn shifts_naive_timestamp_by_five_hours() {
        assert_eq!(
            format_fecha(Some("2024-03-01T10:30:00")),
            "01/03/2024, 15:30"
        );
        assert_eq!(
            format_fecha(Some("2024-03-01T10:30:00.123456")),
            "01/03/2024, 15:30"
        );
    }

    #[test]
    fn shift_crosses_midnight() {
        assert_eq!(
            format_fecha(Some("2023-12-31T21:15:00")),
            "01/01/2024, 02:15"
        );
    }

    #[test]
    fn offset_timestamps_use_transmitted_wall_clock() {
        assert_eq!(
            format_fecha(Some("2024-03-01T10:30:00Z")),
            "01/03/2024, 15:30"
        );
        assert_eq!(
            format_fecha(Some("2024-03-01T10:30:00-05:00")),
            "01/03/2024, 15:30"
        );
    }

    #[test]
    fn missing_and_unparseable_values() {
        assert_eq!(format_fecha(None), FECHA_PLACEHOLDER);
        assert_eq!(format_fecha(Some("")), FECHA_PLACEHOLDER);
        assert_eq!(format_fecha(Some("ayer")), "ayer");
    }

    #[test]
    fn shift_past_the_last_representable_date_shows_raw_value() {
        assert_eq!(
            format_fecha(Some("+262142-12-31T23:00:00")),
            "+262142-12-31T23:00:00"
        );
    }
}
