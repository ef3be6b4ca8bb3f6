//! User-visible appearance preferences.
//!
//! The palette catalog itself lives in the presentation layer; the core
//! only persists the selected identifiers. Unknown persisted identifiers
//! fall back to the defaults instead of failing the load.

use serde::{Deserialize, Serialize};

/// Theme identifier. `dark` is the startup default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Midnight,
    Ocean,
    Sunset,
    Mint,
    Gold,
    Pastel,
    Earth,
    Lavender,
}

impl Theme {
    pub const ALL: [Theme; 9] = [
        Theme::Dark,
        Theme::Midnight,
        Theme::Ocean,
        Theme::Sunset,
        Theme::Mint,
        Theme::Gold,
        Theme::Pastel,
        Theme::Earth,
        Theme::Lavender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Midnight => "midnight",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
            Theme::Mint => "mint",
            Theme::Gold => "gold",
            Theme::Pastel => "pastel",
            Theme::Earth => "earth",
            Theme::Lavender => "lavender",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

/// Clock face style. `serif` is the startup default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStyle {
    #[default]
    Serif,
    Sans,
    Mono,
    Rounded,
}

impl ClockStyle {
    pub const ALL: [ClockStyle; 4] = [
        ClockStyle::Serif,
        ClockStyle::Sans,
        ClockStyle::Mono,
        ClockStyle::Rounded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClockStyle::Serif => "serif",
            ClockStyle::Sans => "sans",
            ClockStyle::Mono => "mono",
            ClockStyle::Rounded => "rounded",
        }
    }
}

impl std::fmt::Display for ClockStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClockStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClockStyle::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown clock style: {s}"))
    }
}

/// Validate and normalize a CSS hex color (`#rgb` or `#rrggbb`).
/// Returns the lowercased form, or `None` for anything else.
pub fn normalize_hex_color(input: &str) -> Option<String> {
    let hex = input.strip_prefix('#')?;
    if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", hex.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_identifiers_roundtrip() {
        for t in Theme::ALL {
            assert_eq!(t.as_str().parse::<Theme>().unwrap(), t);
        }
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn clock_style_identifiers_roundtrip() {
        for c in ClockStyle::ALL {
            assert_eq!(c.as_str().parse::<ClockStyle>().unwrap(), c);
        }
    }

    #[test]
    fn defaults_are_dark_and_serif() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(ClockStyle::default(), ClockStyle::Serif);
    }

    #[test]
    fn hex_colors_are_validated_and_lowercased() {
        assert_eq!(normalize_hex_color("#FFD700").as_deref(), Some("#ffd700"));
        assert_eq!(normalize_hex_color("#abc").as_deref(), Some("#abc"));
        assert!(normalize_hex_color("ffd700").is_none());
        assert!(normalize_hex_color("#ffd7").is_none());
        assert!(normalize_hex_color("#gggggg").is_none());
    }
}
