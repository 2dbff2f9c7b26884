/// Display unit for a weather field, matched on lowercase name fragments.
///
/// # Examples
///
/// ```
/// use weather_dashboard::field_unit;
///
/// assert_eq!(field_unit("airTemperature"), Some("°C"));
/// assert_eq!(field_unit("windDirection"), Some("°"));
/// assert_eq!(field_unit("strikes"), None);
/// ```
pub fn field_unit(field: &str) -> Option<&'static str> {
    let name = field.to_lowercase();
    if name.contains("temp") {
        Some("°C")
    } else if name.contains("solar") {
        Some("W/m²")
    } else if name.contains("precipitation") {
        Some("mm")
    } else if name.contains("distance") {
        Some("km")
    } else if name.contains("wind") && !name.contains("direction") {
        Some("m/s")
    } else if name.contains("direction") || name.contains("heading") || name.contains("orintation") {
        Some("°")
    } else if name.contains("pressure") {
        Some("hPa")
    } else if name.contains("humidity") {
        Some("%")
    } else {
        None
    }
}

/// Column name as shown to users: first character upper-cased, underscores as spaces.
pub fn display_label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .map(|c| if c == '_' { ' ' } else { c })
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(field_unit("sensorTemp"), Some("°C"));
        assert_eq!(field_unit("solar"), Some("W/m²"));
        assert_eq!(field_unit("precipitation"), Some("mm"));
        assert_eq!(field_unit("strikeDistance"), Some("km"));
        assert_eq!(field_unit("gustWindSpeed"), Some("m/s"));
        assert_eq!(field_unit("compassHeading"), Some("°"));
        assert_eq!(field_unit("X orintation"), Some("°"));
        assert_eq!(field_unit("atmosphericPressure"), Some("hPa"));
        assert_eq!(field_unit("Vapor pressure"), Some("hPa"));
        assert_eq!(field_unit("R.Humidity"), Some("%"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(display_label("air_temperature"), "Air temperature");
        assert_eq!(display_label("windSpeed"), "WindSpeed");
        assert_eq!(display_label(""), "");
    }
}
