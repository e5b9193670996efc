use serde::{Deserialize, Serialize};

/// Background picked from the dominant weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundCategory {
    #[default]
    Clear,
    Cloudy,
    Foggy,
    Rainy,
    Snowy,
    Stormy,
}

impl BackgroundCategory {
    pub const fn all() -> &'static [BackgroundCategory] {
        &[
            BackgroundCategory::Clear,
            BackgroundCategory::Cloudy,
            BackgroundCategory::Foggy,
            BackgroundCategory::Rainy,
            BackgroundCategory::Snowy,
            BackgroundCategory::Stormy,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundCategory::Clear => "clear",
            BackgroundCategory::Cloudy => "cloudy",
            BackgroundCategory::Foggy => "foggy",
            BackgroundCategory::Rainy => "rainy",
            BackgroundCategory::Snowy => "snowy",
            BackgroundCategory::Stormy => "stormy",
        }
    }

    /// The image actually shown: fog shares the cloudy backdrop and storms
    /// share the rainy one.
    pub fn backdrop(&self) -> BackgroundCategory {
        match self {
            BackgroundCategory::Foggy => BackgroundCategory::Cloudy,
            BackgroundCategory::Stormy => BackgroundCategory::Rainy,
            other => *other,
        }
    }
}

impl std::fmt::Display for BackgroundCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a WMO code to its background. Codes outside every known range are `Clear`.
pub fn categorize(code: i32) -> BackgroundCategory {
    match code {
        0 => BackgroundCategory::Clear,
        1..=3 => BackgroundCategory::Cloudy,
        45 | 48 => BackgroundCategory::Foggy,
        51..=67 | 80..=82 => BackgroundCategory::Rainy,
        71..=77 | 85..=86 => BackgroundCategory::Snowy,
        95 | 96 | 99 => BackgroundCategory::Stormy,
        _ => BackgroundCategory::Clear,
    }
}
