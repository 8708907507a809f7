//! Tests for the results API client against a mocked upstream.
//!
//! Covers:
//! - Event resolution by round and by (accent-insensitive) name
//! - Session classifications and the "not yet published" case
//! - Standings decoding
//! - Upstream error mapping and the response cache

use std::time::Duration;

use ergast_client::{ErgastClient, ErgastConfig};
use motorsport_common::{EventRef, MotorsportError, SessionKind};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

fn driver(id: &str, code: &str, given: &str, family: &str) -> Value {
    json!({
        "driverId": id,
        "permanentNumber": "1",
        "code": code,
        "givenName": given,
        "familyName": family,
        "nationality": "Testish"
    })
}

fn constructor(id: &str, name: &str) -> Value {
    json!({"constructorId": id, "name": name, "nationality": "Testish"})
}

fn race(round: u32, name: &str, locality: &str, country: &str) -> Value {
    json!({
        "season": "2024",
        "round": round.to_string(),
        "raceName": name,
        "Circuit": {
            "circuitId": format!("circuit_{}", round),
            "circuitName": format!("{} Circuit", locality),
            "Location": {"lat": "0", "long": "0", "locality": locality, "country": country}
        },
        "date": "2024-11-03"
    })
}

fn race_table(races: Vec<Value>) -> Value {
    json!({"MRData": {"RaceTable": {"season": "2024", "Races": races}}})
}

fn schedule() -> Value {
    race_table(vec![
        race(1, "Bahrain Grand Prix", "Sakhir", "Bahrain"),
        race(21, "São Paulo Grand Prix", "São Paulo", "Brazil"),
        race(22, "Las Vegas Grand Prix", "Las Vegas", "USA"),
    ])
}

async fn client_for(server: &MockServer) -> ErgastClient {
    ErgastClient::new(ErgastConfig {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        cache_dir: None,
        cache_ttl: Duration::from_secs(60),
    })
    .await
    .unwrap()
}

// ============================================================================
// Event resolution
// ============================================================================

#[tokio::test]
async fn test_resolve_round_by_name_ignores_accents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let round = client
        .resolve_round(2024, &EventRef::parse("Sao Paulo"))
        .await
        .unwrap();
    assert_eq!(round, 21);
}

#[tokio::test]
async fn test_resolve_round_by_number_skips_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.resolve_round(2024, &EventRef::Round(7)).await.unwrap(), 7);
}

#[tokio::test]
async fn test_resolve_unknown_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .resolve_round(2024, &EventRef::parse("Atlantis"))
        .await
        .unwrap_err();
    assert!(matches!(err, MotorsportError::EventNotFound { year: 2024, .. }));
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_race_results() {
    let server = MockServer::start().await;
    let mut entry = race(21, "São Paulo Grand Prix", "São Paulo", "Brazil");
    entry["Results"] = json!([
        {
            "number": "1", "position": "1", "positionText": "1", "points": "25",
            "Driver": driver("max_verstappen", "VER", "Max", "Verstappen"),
            "Constructor": constructor("red_bull", "Red Bull"),
            "grid": "17", "laps": "69", "status": "Finished",
            "Time": {"millis": "8651000", "time": "2:06:54.430"}
        },
        {
            "number": "31", "position": "2", "positionText": "2", "points": "18",
            "Driver": driver("ocon", "OCO", "Esteban", "Ocon"),
            "Constructor": constructor("alpine", "Alpine F1 Team"),
            "grid": "4", "laps": "69", "status": "Finished",
            "Time": {"millis": "8670477", "time": "+19.477"}
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/2024/21/results.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(race_table(vec![entry])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let race = client
        .session(2024, &EventRef::Round(21), SessionKind::Race)
        .await
        .unwrap()
        .expect("classification");

    assert_eq!(race.race_name, "São Paulo Grand Prix");
    assert_eq!(race.results.len(), 2);
    assert_eq!(race.results[0].driver.abbreviation(), "VER");
    assert_eq!(race.results[1].time.as_ref().unwrap().time, "+19.477");
    assert_eq!(race.results[1].points, 18.0);
}

#[tokio::test]
async fn test_session_not_published_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024/22/sprint.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(race_table(vec![])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let race = client
        .session(2024, &EventRef::Round(22), SessionKind::Sprint)
        .await
        .unwrap();
    assert!(race.is_none());
}

#[tokio::test]
async fn test_upstream_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024/1/qualifying.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .session(2024, &EventRef::Round(1), SessionKind::Qualifying)
        .await
        .unwrap_err();
    assert!(matches!(err, MotorsportError::UpstreamStatus { status: 503, .. }));
    assert_eq!(err.http_status_code(), 502);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.season_schedule(2024).await.unwrap_err();
    assert!(matches!(err, MotorsportError::DecodeError(_)));
}

// ============================================================================
// Standings
// ============================================================================

#[tokio::test]
async fn test_driver_standings() {
    let server = MockServer::start().await;
    let body = json!({"MRData": {"StandingsTable": {"season": "2024", "StandingsLists": [{
        "season": "2024",
        "round": "21",
        "DriverStandings": [
            {
                "position": "1", "positionText": "1", "points": "393", "wins": "8",
                "Driver": driver("max_verstappen", "VER", "Max", "Verstappen"),
                "Constructors": [constructor("red_bull", "Red Bull")]
            },
            {
                "position": "2", "positionText": "2", "points": "331", "wins": "3",
                "Driver": driver("norris", "NOR", "Lando", "Norris"),
                "Constructors": [constructor("mclaren", "McLaren")]
            }
        ]
    }]}}});

    Mock::given(method("GET"))
        .and(path("/current/driverStandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let list = client.driver_standings("current").await.unwrap().unwrap();
    assert_eq!(list.season, 2024);
    assert_eq!(list.round, 21);
    assert_eq!(list.driver_standings.len(), 2);
    assert_eq!(list.driver_standings[1].constructors[0].constructor_id, "mclaren");
    assert_eq!(list.driver_standings[0].wins, 8);
}

#[tokio::test]
async fn test_constructor_standings_empty_season() {
    let server = MockServer::start().await;
    let body = json!({"MRData": {"StandingsTable": {"season": "2030", "StandingsLists": []}}});
    Mock::given(method("GET"))
        .and(path("/2030/constructorStandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(client.constructor_standings("2030").await.unwrap().is_none());
}

// ============================================================================
// Cache
// ============================================================================

#[tokio::test]
async fn test_cache_serves_repeat_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schedule()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = cached_client_for(&server, dir.path()).await;

    let first = client.season_schedule(2024).await.unwrap();
    let second = client.season_schedule(2024).await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(second[1].circuit.location.country, "Brazil");
}

async fn cached_client_for(server: &MockServer, dir: &std::path::Path) -> ErgastClient {
    ErgastClient::new(ErgastConfig {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        cache_dir: Some(dir.to_path_buf()),
        cache_ttl: Duration::from_secs(600),
    })
    .await
    .unwrap()
}

fn qualifying_table() -> Value {
    let mut entry = race(21, "São Paulo Grand Prix", "São Paulo", "Brazil");
    entry["QualifyingResults"] = json!([
        {
            "position": "1",
            "Driver": driver("norris", "NOR", "Lando", "Norris"),
            "Constructor": constructor("mclaren", "McLaren"),
            "Q1": "1:10.500", "Q2": "1:10.200", "Q3": "1:10.400"
        }
    ]);
    race_table(vec![entry])
}

#[tokio::test]
async fn test_unpublished_session_is_not_cached() {
    let server = MockServer::start().await;
    // The first answer predates publication; later ones carry the classification
    Mock::given(method("GET"))
        .and(path("/2024/21/qualifying.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(race_table(vec![])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2024/21/qualifying.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(qualifying_table()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = cached_client_for(&server, dir.path()).await;
    let event = EventRef::Round(21);

    let early = client.session(2024, &event, SessionKind::Qualifying).await.unwrap();
    assert!(early.is_none());

    let published = client.session(2024, &event, SessionKind::Qualifying).await.unwrap();
    assert_eq!(published.unwrap().qualifying_results.len(), 1);

    // The populated answer is now cached
    let cached = client.session(2024, &event, SessionKind::Qualifying).await.unwrap();
    assert!(cached.is_some());
}

#[tokio::test]
async fn test_empty_standings_are_not_cached() {
    let server = MockServer::start().await;
    let body = json!({"MRData": {"StandingsTable": {"season": "2025", "StandingsLists": []}}});
    Mock::given(method("GET"))
        .and(path("/current/constructorStandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = cached_client_for(&server, dir.path()).await;
    assert!(client.constructor_standings("current").await.unwrap().is_none());
    assert!(client.constructor_standings("current").await.unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_cache_entry_is_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024/21/qualifying.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(qualifying_table()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("2024_21_qualifying_json_limit_100.json"),
        br#"{"MRData": {"RaceTable": {"Races": [{"season": "20"#,
    )
    .unwrap();

    let client = cached_client_for(&server, dir.path()).await;
    let event = EventRef::Round(21);

    let first = client.session(2024, &event, SessionKind::Qualifying).await.unwrap();
    assert!(first.is_some());

    // The refetched body replaced the torn entry
    let second = client.session(2024, &event, SessionKind::Qualifying).await.unwrap();
    assert!(second.is_some());
}
