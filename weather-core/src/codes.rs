//! Static WMO weather-code table.
//!
//! Icon references follow the OpenWeatherMap icon names (`01d`, `10n`, ...);
//! the host decides how they resolve to assets.

use crate::model::DayPeriod;

pub const UNKNOWN_DESCRIPTION: &str = "Unknown";
pub const UNKNOWN_ICON: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeLabel {
    pub description: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeEntry {
    pub code: i32,
    pub day: CodeLabel,
    pub night: CodeLabel,
}

impl WeatherCodeEntry {
    pub fn label(&self, period: DayPeriod) -> CodeLabel {
        match period {
            DayPeriod::Day => self.day,
            DayPeriod::Night => self.night,
        }
    }
}

const UNKNOWN: CodeLabel = CodeLabel { description: UNKNOWN_DESCRIPTION, icon: UNKNOWN_ICON };

const fn entry(
    code: i32,
    day: &'static str,
    day_icon: &'static str,
    night: &'static str,
    night_icon: &'static str,
) -> WeatherCodeEntry {
    WeatherCodeEntry {
        code,
        day: CodeLabel { description: day, icon: day_icon },
        night: CodeLabel { description: night, icon: night_icon },
    }
}

/// Sorted by code.
pub static WEATHER_CODES: &[WeatherCodeEntry] = &[
    entry(0, "Sunny", "01d", "Clear", "01n"),
    entry(1, "Mainly Sunny", "01d", "Mainly Clear", "01n"),
    entry(2, "Partly Cloudy", "02d", "Partly Cloudy", "02n"),
    entry(3, "Cloudy", "03d", "Cloudy", "03n"),
    entry(45, "Foggy", "50d", "Foggy", "50n"),
    entry(48, "Rime Fog", "50d", "Rime Fog", "50n"),
    entry(51, "Light Drizzle", "09d", "Light Drizzle", "09n"),
    entry(53, "Drizzle", "09d", "Drizzle", "09n"),
    entry(55, "Heavy Drizzle", "09d", "Heavy Drizzle", "09n"),
    entry(56, "Light Freezing Drizzle", "09d", "Light Freezing Drizzle", "09n"),
    entry(57, "Freezing Drizzle", "09d", "Freezing Drizzle", "09n"),
    entry(61, "Light Rain", "10d", "Light Rain", "10n"),
    entry(63, "Rain", "10d", "Rain", "10n"),
    entry(65, "Heavy Rain", "10d", "Heavy Rain", "10n"),
    entry(66, "Light Freezing Rain", "10d", "Light Freezing Rain", "10n"),
    entry(67, "Freezing Rain", "10d", "Freezing Rain", "10n"),
    entry(71, "Light Snow", "13d", "Light Snow", "13n"),
    entry(73, "Snow", "13d", "Snow", "13n"),
    entry(75, "Heavy Snow", "13d", "Heavy Snow", "13n"),
    entry(77, "Snow Grains", "13d", "Snow Grains", "13n"),
    entry(80, "Light Showers", "09d", "Light Showers", "09n"),
    entry(81, "Showers", "09d", "Showers", "09n"),
    entry(82, "Heavy Showers", "09d", "Heavy Showers", "09n"),
    entry(85, "Light Snow Showers", "13d", "Light Snow Showers", "13n"),
    entry(86, "Snow Showers", "13d", "Snow Showers", "13n"),
    entry(95, "Thunderstorm", "11d", "Thunderstorm", "11n"),
    entry(96, "Light Thunderstorms With Hail", "11d", "Light Thunderstorms With Hail", "11n"),
    entry(99, "Thunderstorm With Hail", "11d", "Thunderstorm With Hail", "11n"),
];

/// Find the entry for `code`. `None` is an ordinary outcome for codes the
/// provider adds later.
pub fn lookup(code: i32) -> Option<&'static WeatherCodeEntry> {
    WEATHER_CODES
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|idx| &WEATHER_CODES[idx])
}

/// Description and icon for `code`, falling back to the "Unknown" placeholder.
pub fn label(code: i32, period: DayPeriod) -> CodeLabel {
    lookup(code).map(|e| e.label(period)).unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in WEATHER_CODES.windows(2) {
            assert!(pair[0].code < pair[1].code, "{} !< {}", pair[0].code, pair[1].code);
        }
    }

    #[test]
    fn lookup_is_stable_for_every_code() {
        for e in WEATHER_CODES {
            let first = lookup(e.code).expect("known code");
            let second = lookup(e.code).expect("known code");
            assert_eq!(first, second);
            assert_eq!(first, e);
        }
    }

    #[test]
    fn lookup_misses_are_none() {
        assert!(lookup(4).is_none());
        assert!(lookup(-1).is_none());
        assert!(lookup(100).is_none());
    }

    #[test]
    fn label_picks_period() {
        assert_eq!(label(0, DayPeriod::Day).description, "Sunny");
        assert_eq!(label(0, DayPeriod::Night).description, "Clear");
        assert_eq!(label(61, DayPeriod::Night).icon, "10n");
    }

    #[test]
    fn label_falls_back_for_unknown_codes() {
        let l = label(42, DayPeriod::Night);
        assert_eq!(l.description, UNKNOWN_DESCRIPTION);
        assert_eq!(l.icon, UNKNOWN_ICON);
    }
}
