//! Deterministic object keys for generated assets.

/// Path builder for consistent storage layout.
pub struct AssetPath;

impl AssetPath {
    /// Qualifying delta chart.
    /// Format: {year}/{event}/qualifying.png
    pub fn qualifying_chart(year: i32, event: &str) -> String {
        format!("{}/{}/qualifying.png", year, clean_segment(event))
    }

    /// Driver standings board.
    /// Format: standings/{season}/drivers.png
    pub fn driver_standings(season: i32) -> String {
        format!("standings/{}/drivers.png", season)
    }

    /// Session asset as published on the CDN. Segments are kept as given.
    /// Format: {year}/{event}/{session}/{asset}.png
    pub fn session_asset(year: i32, event: &str, session: &str, asset: &str) -> String {
        format!(
            "{}/{}/{}/{}.png",
            year,
            clean_segment(event),
            clean_segment(session),
            clean_segment(asset)
        )
    }
}

/// Keep user-provided segments from introducing extra path levels.
fn clean_segment(raw: &str) -> String {
    raw.trim().replace(['/', '\\'], "-")
}
