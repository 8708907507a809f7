//! Constructor colours and logos used by the chart and standings renderers.

/// Bar colour for constructors missing from the palette.
pub const CHART_FALLBACK_COLOR: &str = "#D0D0D0";

/// Row background for constructors missing from the palette.
pub const ROW_FALLBACK_COLOR: &str = "#444444";

const LOGO_BASE: &str = "https://media.formula1.com/image/upload/c_lfill,w_48/q_auto/v1740000000/common/f1/2025";

/// Visual identity of a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamStyle {
    /// Hex colour, `#RRGGBB`.
    pub color: &'static str,
    /// Path segment and file stem of the white logo on the media CDN.
    logo_slug: &'static str,
}

impl TeamStyle {
    /// Look up a constructor by its Ergast `constructorId`.
    pub fn for_constructor(constructor_id: &str) -> Option<TeamStyle> {
        let (color, logo_slug) = match constructor_id {
            "mclaren" => ("#FF8000", "mclaren"),
            "red_bull" => ("#1E41FF", "redbullracing"),
            "ferrari" => ("#DC0000", "ferrari"),
            "mercedes" => ("#00D2BE", "mercedes"),
            "williams" => ("#005AFF", "williams"),
            "aston_martin" => ("#006F62", "astonmartin"),
            "haas" => ("#B6BABD", "haas"),
            "alpine" => ("#2293D1", "alpine"),
            "sauber" => ("#52E252", "kicksauber"),
            "rb" => ("#6692FF", "rb"),
            _ => return None,
        };
        Some(TeamStyle { color, logo_slug })
    }

    pub fn logo_url(&self) -> String {
        format!(
            "{}/{}/2025{}logowhite.webp",
            LOGO_BASE, self.logo_slug, self.logo_slug
        )
    }
}

/// Bar colour for a constructor, falling back to neutral grey.
pub fn chart_color(constructor_id: &str) -> &'static str {
    TeamStyle::for_constructor(constructor_id)
        .map(|t| t.color)
        .unwrap_or(CHART_FALLBACK_COLOR)
}

/// Row colour for a constructor, falling back to dark grey.
pub fn row_color(constructor_id: &str) -> &'static str {
    TeamStyle::for_constructor(constructor_id)
        .map(|t| t.color)
        .unwrap_or(ROW_FALLBACK_COLOR)
}
