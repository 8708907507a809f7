//! Generation pipelines behind the protected routes.
//!
//! Each pipeline fetches upstream data, reshapes it into response records
//! and, for image assets, renders and uploads a PNG. They return
//! `Ok(None)` when upstream has nothing published yet.

use std::time::Instant;

use bytes::Bytes;
use metrics::histogram;
use serde::Serialize;
use tracing::{info, instrument};

use ergast_client::{QualifyingResult, Race, RaceResult, StandingsList};
use motorsport_common::{EventRef, MotorsportError, MotorsportResult, SessionKind, TeamStyle};
use renderer::{
    render_delta_chart, render_png, render_standings_board, BoardConfig, BoardRow, ChartConfig,
    DeltaRow, DeltaTable, QualifyingLap,
};
use storage::AssetPath;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

/// One classified driver of a session.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionRecord {
    #[serde(rename = "Abbreviation")]
    pub abbreviation: String,
    #[serde(rename = "Position")]
    pub position: u32,
    #[serde(rename = "Time")]
    pub time: Option<String>,
    #[serde(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReady {
    pub event: String,
    pub results: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualifyingReady {
    pub event: String,
    pub url: String,
    pub results: Vec<DeltaRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsDescription {
    pub season: i32,
    pub round: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverStandingRecord {
    pub position: Option<u32>,
    pub position_text: String,
    pub points: f64,
    pub wins: u32,
    pub driver_id: String,
    pub driver_number: Option<String>,
    pub driver_code: String,
    pub given_name: String,
    pub family_name: String,
    pub driver_nationality: Option<String>,
    pub constructor_ids: Vec<String>,
    pub constructor_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStandingRecord {
    pub position: Option<u32>,
    pub position_text: String,
    pub points: f64,
    pub wins: u32,
    pub constructor_id: String,
    pub constructor_name: String,
    pub constructor_nationality: Option<String>,
    /// Team logo on the media CDN, for known constructors
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverStandingsReady {
    pub description: Vec<StandingsDescription>,
    pub standings: Vec<DriverStandingRecord>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstructorStandingsReady {
    pub description: Vec<StandingsDescription>,
    pub standings: Vec<ConstructorStandingRecord>,
}

/// Label used in responses: "{event} {session}".
pub fn event_label(event: &EventRef, kind: SessionKind) -> String {
    format!("{} {}", event, kind)
}

// ============================================================================
// Sessions
// ============================================================================

/// Classification of a race, sprint or qualifying session as records.
#[instrument(skip(state, event), fields(event = %event))]
pub async fn session_results(
    state: &AppState,
    year: i32,
    event: &EventRef,
    kind: SessionKind,
) -> MotorsportResult<Option<SessionReady>> {
    let race = match state.ergast.session(year, event, kind).await? {
        Some(race) => race,
        None => return Ok(None),
    };

    Ok(Some(SessionReady {
        event: event_label(event, kind),
        results: session_records(&race, kind),
    }))
}

/// Reshape an upstream classification into response records.
pub fn session_records(race: &Race, kind: SessionKind) -> Vec<SessionRecord> {
    match kind {
        SessionKind::Race => race.results.iter().map(race_record).collect(),
        SessionKind::Sprint => race.sprint_results.iter().map(race_record).collect(),
        SessionKind::Qualifying => race.qualifying_results.iter().map(qualifying_record).collect(),
    }
}

fn race_record(result: &RaceResult) -> SessionRecord {
    SessionRecord {
        abbreviation: result.driver.abbreviation(),
        position: result.position,
        time: result.time.as_ref().map(|t| t.time.clone()),
        status: result.status.clone(),
    }
}

/// Qualifying rows carry the driver's fastest lap and the last part reached.
fn qualifying_record(result: &QualifyingResult) -> SessionRecord {
    let reached = [(&result.q3, "Q3"), (&result.q2, "Q2"), (&result.q1, "Q1")]
        .into_iter()
        .find(|(time, _)| time.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|(_, part)| part)
        .unwrap_or("");

    SessionRecord {
        abbreviation: result.driver.abbreviation(),
        position: result.position,
        time: result.fastest_lap().map(|lap| lap.to_string()),
        status: reached.to_string(),
    }
}

// ============================================================================
// Qualifying chart
// ============================================================================

/// Fastest lap of every driver who set a time.
pub fn qualifying_laps(race: &Race) -> Vec<QualifyingLap> {
    race.qualifying_results
        .iter()
        .filter_map(|result| {
            result.fastest_lap().map(|lap| QualifyingLap {
                driver: result.driver.abbreviation(),
                team_id: result.constructor.constructor_id.clone(),
                lap,
            })
        })
        .collect()
}

/// Render the gap-to-pole chart and upload it under `{year}/{event}/qualifying.png`.
#[instrument(skip(state, event), fields(event = %event))]
pub async fn qualifying_chart(
    state: &AppState,
    year: i32,
    event: &EventRef,
) -> MotorsportResult<Option<QualifyingReady>> {
    let race = match state.ergast.session(year, event, SessionKind::Qualifying).await? {
        Some(race) => race,
        None => return Ok(None),
    };

    let table = match DeltaTable::from_laps(qualifying_laps(&race)) {
        Some(table) => table,
        None => return Ok(None),
    };

    let event_name = race.race_name.clone();
    let chart_table = table.clone();
    let png = render_blocking("qualifying", move || {
        render_png(render_delta_chart(&chart_table, &event_name, year, &ChartConfig::default()))
    })
    .await?;

    let key = AssetPath::qualifying_chart(year, &event.to_string());
    state.storage.put(&key, Bytes::from(png)).await?;
    let url = state.storage.public_url(&key);

    info!(key = %key, drivers = table.rows().len(), "Uploaded qualifying chart");

    Ok(Some(QualifyingReady {
        event: event_label(event, SessionKind::Qualifying),
        url,
        results: table.rows().to_vec(),
    }))
}

// ============================================================================
// Standings
// ============================================================================

fn describe(list: &StandingsList) -> Vec<StandingsDescription> {
    vec![StandingsDescription {
        season: list.season,
        round: list.round,
    }]
}

pub fn driver_records(list: &StandingsList) -> Vec<DriverStandingRecord> {
    list.driver_standings
        .iter()
        .map(|s| DriverStandingRecord {
            position: s.position,
            position_text: s.position_text.clone(),
            points: s.points,
            wins: s.wins,
            driver_id: s.driver.driver_id.clone(),
            driver_number: s.driver.permanent_number.clone(),
            driver_code: s.driver.abbreviation(),
            given_name: s.driver.given_name.clone(),
            family_name: s.driver.family_name.clone(),
            driver_nationality: s.driver.nationality.clone(),
            constructor_ids: s.constructors.iter().map(|c| c.constructor_id.clone()).collect(),
            constructor_names: s.constructors.iter().map(|c| c.name.clone()).collect(),
        })
        .collect()
}

pub fn constructor_records(list: &StandingsList) -> Vec<ConstructorStandingRecord> {
    list.constructor_standings
        .iter()
        .map(|s| ConstructorStandingRecord {
            position: s.position,
            position_text: s.position_text.clone(),
            points: s.points,
            wins: s.wins,
            constructor_id: s.constructor.constructor_id.clone(),
            constructor_name: s.constructor.name.clone(),
            constructor_nationality: s.constructor.nationality.clone(),
            logo_url: TeamStyle::for_constructor(&s.constructor.constructor_id)
                .map(|style| style.logo_url()),
        })
        .collect()
}

/// Board rows; a driver's current team is the last constructor listed.
fn board_rows(list: &StandingsList) -> Vec<BoardRow> {
    list.driver_standings
        .iter()
        .map(|s| {
            let team = s.constructors.last();
            BoardRow {
                position: s.position_text.clone(),
                name: s.driver.full_name(),
                constructor_id: team.map(|c| c.constructor_id.clone()).unwrap_or_default(),
                constructor_name: team.map(|c| c.name.clone()).unwrap_or_default(),
                points: s.points,
            }
        })
        .collect()
}

/// Driver standings, rendered as a board and uploaded.
#[instrument(skip(state))]
pub async fn driver_standings(
    state: &AppState,
    season: &str,
) -> MotorsportResult<Option<DriverStandingsReady>> {
    let list = match state.ergast.driver_standings(season).await? {
        Some(list) if !list.driver_standings.is_empty() => list,
        _ => return Ok(None),
    };

    let standings = driver_records(&list);
    let rows = board_rows(&list);
    let png = render_blocking("standings", move || {
        render_png(render_standings_board(&rows, &BoardConfig::default()))
    })
    .await?;

    let key = AssetPath::driver_standings(list.season);
    state.storage.put(&key, Bytes::from(png)).await?;
    info!(key = %key, drivers = standings.len(), "Uploaded driver standings board");

    Ok(Some(DriverStandingsReady {
        description: describe(&list),
        standings,
        url: state.storage.public_url(&key),
    }))
}

/// Constructor standings as records.
#[instrument(skip(state))]
pub async fn constructor_standings(
    state: &AppState,
    season: &str,
) -> MotorsportResult<Option<ConstructorStandingsReady>> {
    let list = match state.ergast.constructor_standings(season).await? {
        Some(list) if !list.constructor_standings.is_empty() => list,
        _ => return Ok(None),
    };

    Ok(Some(ConstructorStandingsReady {
        description: describe(&list),
        standings: constructor_records(&list),
    }))
}

// ============================================================================
// Season schedule
// ============================================================================

/// Event countries of a season in schedule order.
pub async fn season_countries(state: &AppState, year: i32) -> MotorsportResult<Vec<String>> {
    let schedule = state.ergast.season_schedule(year).await?;
    Ok(schedule
        .into_iter()
        .map(|race| race.circuit.location.country)
        .collect())
}

// ============================================================================
// Helpers
// ============================================================================

/// Run a CPU-bound render on the blocking pool and record its duration.
async fn render_blocking<F>(asset: &'static str, render: F) -> MotorsportResult<Vec<u8>>
where
    F: FnOnce() -> MotorsportResult<Vec<u8>> + Send + 'static,
{
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| MotorsportError::RenderError(format!("Render task failed: {}", e)))?;
    histogram!("yaru_render_seconds", "asset" => asset).record(started.elapsed().as_secs_f64());
    result
}
