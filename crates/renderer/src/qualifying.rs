//! Qualifying gap-to-pole chart.
//!
//! Each driver's fastest lap is compared to the pole lap and drawn as a
//! horizontal bar, fastest at the top, coloured by team.

use serde::Serialize;

use motorsport_common::team::chart_color;
use motorsport_common::LapTime;

use crate::svg::{Anchor, SvgDocument, TextStyle};

/// A driver's fastest qualifying lap.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifyingLap {
    /// Driver abbreviation, used as the bar label
    pub driver: String,
    /// Constructor id, used for the bar colour
    pub team_id: String,
    pub lap: LapTime,
}

/// One row of the gap-to-pole table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeltaRow {
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "Team")]
    pub team_id: String,
    #[serde(rename = "LapTime")]
    pub lap: LapTime,
    /// Gap to pole in seconds
    #[serde(rename = "LapTimeDelta")]
    pub delta_seconds: f64,
}

/// Fastest laps sorted ascending with their gap to pole.
#[derive(Debug, Clone)]
pub struct DeltaTable {
    rows: Vec<DeltaRow>,
}

impl DeltaTable {
    /// Build the table. Returns `None` when no driver set a time.
    pub fn from_laps(mut laps: Vec<QualifyingLap>) -> Option<Self> {
        laps.sort_by(|a, b| a.lap.cmp(&b.lap).then_with(|| a.driver.cmp(&b.driver)));
        let pole = laps.first()?.lap;

        let rows = laps
            .into_iter()
            .map(|lap| DeltaRow {
                delta_seconds: lap.lap.delta_from(pole).as_secs_f64(),
                driver: lap.driver,
                team_id: lap.team_id,
                lap: lap.lap,
            })
            .collect();

        Some(Self { rows })
    }

    pub fn rows(&self) -> &[DeltaRow] {
        &self.rows
    }

    pub fn pole(&self) -> &DeltaRow {
        // from_laps never builds an empty table
        &self.rows[0]
    }

    pub fn max_delta(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.delta_seconds)
            .fold(0.0, f64::max)
    }
}

/// Layout of the chart.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub bar_height: f32,
    pub bar_gap: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub background: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            bar_height: 20.0,
            bar_gap: 6.0,
            margin_left: 60.0,
            margin_right: 30.0,
            margin_top: 80.0,
            margin_bottom: 40.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl ChartConfig {
    /// Canvas height needed for `rows` bars.
    pub fn height_for(&self, rows: usize) -> u32 {
        let bars = rows as f32 * (self.bar_height + self.bar_gap);
        (self.margin_top + bars + self.margin_bottom).ceil() as u32
    }
}

/// Title lines: event, year and session, then the pole lap.
pub fn chart_title(event_name: &str, year: i32, table: &DeltaTable) -> (String, String) {
    let pole = table.pole();
    (
        format!("{} {} Qualifying", event_name, year),
        format!("Fastest Lap: {} ({})", pole.lap, pole.driver),
    )
}

/// Compose the chart as SVG.
pub fn render_delta_chart(table: &DeltaTable, event_name: &str, year: i32, config: &ChartConfig) -> SvgDocument {
    let height = config.height_for(table.rows().len());
    let mut doc = SvgDocument::new(config.width, height);
    doc.background(&config.background);

    let plot_left = config.margin_left;
    let plot_right = config.width as f32 - config.margin_right;
    let plot_top = config.margin_top;
    let plot_bottom = height as f32 - config.margin_bottom;
    let plot_width = plot_right - plot_left;

    let step = tick_step(table.max_delta());
    let axis_max = (table.max_delta() / step).ceil().max(1.0) * step;
    let x_for = |seconds: f64| plot_left + (seconds / axis_max) as f32 * plot_width;

    // Grid first so the bars sit on top of it.
    let mut tick = 0.0;
    while tick <= axis_max + step / 2.0 {
        let x = x_for(tick);
        doc.line(x, plot_top, x, plot_bottom, "#000000", true);
        doc.text(
            x,
            plot_bottom + 16.0,
            &format_tick(tick, step),
            TextStyle {
                size: 10.0,
                anchor: Anchor::Middle,
                ..Default::default()
            },
        );
        tick += step;
    }

    for (i, row) in table.rows().iter().enumerate() {
        let y = plot_top + i as f32 * (config.bar_height + config.bar_gap) + config.bar_gap / 2.0;
        let bar_width = x_for(row.delta_seconds) - plot_left;

        doc.rect(
            plot_left,
            y,
            bar_width,
            config.bar_height,
            chart_color(&row.team_id),
            Some("grey"),
            0.0,
        );
        doc.text(
            plot_left - 8.0,
            y + config.bar_height * 0.75,
            &row.driver,
            TextStyle {
                size: 11.0,
                anchor: Anchor::End,
                ..Default::default()
            },
        );
    }

    doc.line(plot_left, plot_top, plot_left, plot_bottom, "#000000", false);

    let (title, subtitle) = chart_title(event_name, year, table);
    let centre = config.width as f32 / 2.0;
    let title_style = TextStyle {
        size: 15.0,
        anchor: Anchor::Middle,
        bold: true,
        ..Default::default()
    };
    doc.text(centre, 28.0, &title, title_style);
    doc.text(centre, 50.0, &subtitle, title_style);

    doc
}

/// Pick a tick spacing giving at most ~8 gridlines.
fn tick_step(max_seconds: f64) -> f64 {
    const STEPS: [f64; 10] = [0.05, 0.1, 0.2, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0];
    STEPS
        .iter()
        .copied()
        .find(|step| max_seconds / step <= 8.0)
        .unwrap_or(60.0)
}

fn format_tick(value: f64, step: f64) -> String {
    if step < 0.1 {
        format!("{:.2}", value)
    } else if step < 1.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(driver: &str, team: &str, time: &str) -> QualifyingLap {
        QualifyingLap {
            driver: driver.to_string(),
            team_id: team.to_string(),
            lap: time.parse().unwrap(),
        }
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(0.0), 0.05);
        assert_eq!(tick_step(0.35), 0.05);
        assert_eq!(tick_step(1.5), 0.2);
        assert_eq!(tick_step(3.0), 0.5);
        assert_eq!(tick_step(500.0), 60.0);
    }

    #[test]
    fn test_empty_laps() {
        assert!(DeltaTable::from_laps(Vec::new()).is_none());
    }

    #[test]
    fn test_chart_height_grows_with_rows() {
        let config = ChartConfig::default();
        assert!(config.height_for(20) > config.height_for(10));
        assert_eq!(config.height_for(0), 120);
    }

    #[test]
    fn test_title() {
        let table = DeltaTable::from_laps(vec![
            lap("NOR", "mclaren", "1:10.500"),
            lap("VER", "red_bull", "1:10.123"),
        ])
        .unwrap();
        let (title, subtitle) = chart_title("Brazilian Grand Prix", 2024, &table);
        assert_eq!(title, "Brazilian Grand Prix 2024 Qualifying");
        assert_eq!(subtitle, "Fastest Lap: 1:10.123 (VER)");
    }
}
