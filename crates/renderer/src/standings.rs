//! Driver standings board: one team-coloured row per driver.

use motorsport_common::team::row_color;

use crate::svg::{Anchor, SvgDocument, TextStyle};

/// One line of the standings board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    /// Classification text ("1", "2", ... or "-")
    pub position: String,
    pub name: String,
    pub constructor_id: String,
    /// Constructor display name, abbreviated into the badge
    pub constructor_name: String,
    pub points: f64,
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub padding: f32,
    pub row_height: f32,
    pub row_gap: f32,
    pub background: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 1100,
            padding: 20.0,
            row_height: 40.0,
            row_gap: 4.0,
            background: "#15151E".to_string(),
        }
    }
}

impl BoardConfig {
    /// Rows that fit on the canvas.
    pub fn capacity(&self) -> usize {
        let usable = self.height as f32 - 2.0 * self.padding + self.row_gap;
        (usable / (self.row_height + self.row_gap)).floor().max(0.0) as usize
    }
}

/// Compose the board. Rows past the canvas capacity are dropped.
pub fn render_standings_board(rows: &[BoardRow], config: &BoardConfig) -> SvgDocument {
    let mut doc = SvgDocument::new(config.width, config.height);
    doc.background(&config.background);

    let left = config.padding;
    let right = config.width as f32 - config.padding;
    let text_style = TextStyle {
        size: 14.0,
        color: "#FFFFFF",
        ..Default::default()
    };

    for (i, row) in rows.iter().take(config.capacity()).enumerate() {
        let top = config.padding + i as f32 * (config.row_height + config.row_gap);
        let baseline = top + config.row_height / 2.0 + 5.0;

        doc.rect(
            left,
            top,
            right - left,
            config.row_height,
            row_color(&row.constructor_id),
            None,
            6.0,
        );

        doc.text(
            left + 40.0,
            baseline,
            &row.position,
            TextStyle {
                anchor: Anchor::End,
                bold: true,
                ..text_style
            },
        );

        let badge_x = left + 50.0;
        let badge_top = top + (config.row_height - 28.0) / 2.0;
        doc.rect(badge_x, badge_top, 28.0, 28.0, "#1F1F27", None, 4.0);
        doc.text(
            badge_x + 14.0,
            badge_top + 18.0,
            &team_badge(&row.constructor_name),
            TextStyle {
                size: 9.0,
                anchor: Anchor::Middle,
                bold: true,
                ..text_style
            },
        );

        doc.text(
            badge_x + 40.0,
            baseline,
            &row.name,
            TextStyle {
                bold: true,
                ..text_style
            },
        );

        doc.text(
            right - 12.0,
            baseline,
            &format!("{} pts", format_points(row.points)),
            TextStyle {
                size: 13.0,
                anchor: Anchor::End,
                ..text_style
            },
        );
    }

    doc
}

/// Three-letter constructor badge ("Red Bull" -> "RED").
fn team_badge(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Whole points print without decimals; sprint half-points keep one.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{:.0}", points)
    } else {
        format!("{:.1}", points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_fits_full_grid() {
        // 24 rows: 2*20 padding + 24*40 + 23*4 = 1092 <= 1100
        assert_eq!(BoardConfig::default().capacity(), 24);
    }

    #[test]
    fn test_team_badge() {
        assert_eq!(team_badge("Red Bull"), "RED");
        assert_eq!(team_badge("RB F1 Team"), "RBF");
        assert_eq!(team_badge(""), "");
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(25.0), "25");
        assert_eq!(format_points(12.5), "12.5");
    }
}
