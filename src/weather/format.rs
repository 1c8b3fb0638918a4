//! Text rendering for NWS alert features and forecast periods.

use serde_json::Value;
use std::borrow::Cow;

/// Line placed between rendered blocks.
pub const SEPARATOR: &str = "\n---\n";

const UNKNOWN: &str = "Unknown";

/// Render one alert feature (`{"properties": {...}}`).
pub fn format_alert(feature: &Value) -> String {
    let props = &feature["properties"];
    format!(
        "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
        field(props, "event", UNKNOWN),
        field(props, "areaDesc", UNKNOWN),
        field(props, "severity", UNKNOWN),
        field(props, "description", "No description available"),
        field(props, "instruction", "No specific instructions provided"),
    )
}

/// Render one forecast period.
pub fn format_period(period: &Value) -> String {
    format!(
        "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
        field(period, "name", UNKNOWN),
        field(period, "temperature", UNKNOWN),
        field(period, "temperatureUnit", UNKNOWN),
        field(period, "windSpeed", UNKNOWN),
        field(period, "windDirection", UNKNOWN),
        field(period, "detailedForecast", UNKNOWN),
    )
}

/// Render every alert feature, separated by [`SEPARATOR`].
pub fn format_alerts(features: &[Value]) -> String {
    join_blocks(features.iter().map(format_alert))
}

/// Render at most `limit` leading periods, separated by [`SEPARATOR`].
pub fn format_forecast(periods: &[Value], limit: usize) -> String {
    join_blocks(periods.iter().take(limit).map(format_period))
}

pub fn join_blocks(blocks: impl IntoIterator<Item = String>) -> String {
    blocks.into_iter().collect::<Vec<_>>().join(SEPARATOR)
}

/// Field as display text. Absent and null both fall back to `default`.
fn field<'a>(object: &'a Value, key: &str, default: &'a str) -> Cow<'a, str> {
    match object.get(key) {
        None | Some(Value::Null) => Cow::Borrowed(default),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}
