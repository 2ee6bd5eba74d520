//! Condition description → icon lookup.
//!
//! The table is static configuration: one entry per description the backend
//! can emit, keyed in lowercase. Anything not listed gets [`DEFAULT_ICON`].

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    CloudSun,
    Cloud,
    CloudRain,
    CloudShowersHeavy,
    Bolt,
    CloudDrizzle,
    Snowflake,
    Smog,
    Wind,
    Tornado,
}

pub const DEFAULT_ICON: Icon = Icon::Sun;

impl Icon {
    /// Icon-library class name, e.g. `"fas fa-cloud-rain"`.
    pub fn css_class(&self) -> &'static str {
        match self {
            Icon::Sun => "fas fa-sun",
            Icon::CloudSun => "fas fa-cloud-sun",
            Icon::Cloud => "fas fa-cloud",
            Icon::CloudRain => "fas fa-cloud-rain",
            Icon::CloudShowersHeavy => "fas fa-cloud-showers-heavy",
            Icon::Bolt => "fas fa-bolt",
            Icon::CloudDrizzle => "fas fa-cloud-drizzle",
            Icon::Snowflake => "fas fa-snowflake",
            Icon::Smog => "fas fa-smog",
            Icon::Wind => "fas fa-wind",
            Icon::Tornado => "fas fa-tornado",
        }
    }

    /// Single glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Sun => "\u{2600}",                // sun
            Icon::CloudSun => "\u{26C5}",           // sun behind cloud
            Icon::Cloud => "\u{2601}",              // cloud
            Icon::CloudRain => "\u{1F327}",         // cloud with rain
            Icon::CloudShowersHeavy => "\u{2614}",  // umbrella with rain
            Icon::Bolt => "\u{26A1}",               // high voltage
            Icon::CloudDrizzle => "\u{1F326}",      // sun behind rain cloud
            Icon::Snowflake => "\u{2744}",          // snowflake
            Icon::Smog => "\u{1F32B}",              // fog
            Icon::Wind => "\u{1F32C}",              // wind face
            Icon::Tornado => "\u{1F32A}",           // tornado
        }
    }
}

pub static ICON_TABLE: &[(&str, Icon)] = &[
    ("clear sky", Icon::Sun),
    ("few clouds", Icon::CloudSun),
    ("scattered clouds", Icon::Cloud),
    ("broken clouds", Icon::Cloud),
    ("overcast clouds", Icon::Cloud),
    ("light rain", Icon::CloudRain),
    ("moderate rain", Icon::CloudRain),
    ("heavy intensity rain", Icon::CloudShowersHeavy),
    ("very heavy rain", Icon::CloudShowersHeavy),
    ("extreme rain", Icon::CloudShowersHeavy),
    ("freezing rain", Icon::CloudRain),
    ("light intensity shower rain", Icon::CloudRain),
    ("shower rain", Icon::CloudRain),
    ("heavy intensity shower rain", Icon::CloudShowersHeavy),
    ("ragged shower rain", Icon::CloudRain),
    ("thunderstorm", Icon::Bolt),
    ("thunderstorm with light rain", Icon::Bolt),
    ("thunderstorm with rain", Icon::Bolt),
    ("thunderstorm with heavy rain", Icon::Bolt),
    ("light thunderstorm", Icon::Bolt),
    ("heavy thunderstorm", Icon::Bolt),
    ("ragged thunderstorm", Icon::Bolt),
    ("thunderstorm with light drizzle", Icon::Bolt),
    ("thunderstorm with drizzle", Icon::Bolt),
    ("thunderstorm with heavy drizzle", Icon::Bolt),
    ("light intensity drizzle", Icon::CloudDrizzle),
    ("drizzle", Icon::CloudDrizzle),
    ("heavy intensity drizzle", Icon::CloudDrizzle),
    ("light intensity drizzle rain", Icon::CloudDrizzle),
    ("drizzle rain", Icon::CloudDrizzle),
    ("heavy intensity drizzle rain", Icon::CloudDrizzle),
    ("shower rain and drizzle", Icon::CloudDrizzle),
    ("heavy shower rain and drizzle", Icon::CloudDrizzle),
    ("shower drizzle", Icon::CloudDrizzle),
    ("light snow", Icon::Snowflake),
    ("snow", Icon::Snowflake),
    ("heavy snow", Icon::Snowflake),
    ("sleet", Icon::Snowflake),
    ("light shower sleet", Icon::Snowflake),
    ("shower sleet", Icon::Snowflake),
    ("light rain and snow", Icon::Snowflake),
    ("rain and snow", Icon::Snowflake),
    ("light shower snow", Icon::Snowflake),
    ("shower snow", Icon::Snowflake),
    ("heavy shower snow", Icon::Snowflake),
    ("mist", Icon::Smog),
    ("smoke", Icon::Smog),
    ("haze", Icon::Smog),
    ("sand/dust whirls", Icon::Smog),
    ("fog", Icon::Smog),
    ("sand", Icon::Smog),
    ("dust", Icon::Smog),
    ("volcanic ash", Icon::Smog),
    ("squalls", Icon::Wind),
    ("tornado", Icon::Tornado),
];

/// Case-insensitive lookup with fallback to [`DEFAULT_ICON`].
pub fn icon_for(description: &str) -> Icon {
    let key = description.to_lowercase();
    ICON_TABLE
        .iter()
        .find(|(desc, _)| *desc == key)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
