//! HTTP client for the Ergast-compatible results API.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use motorsport_common::{EventRef, MotorsportError, MotorsportResult, SessionKind};

use crate::cache::ResponseCache;
use crate::models::{Envelope, Race, RaceTableData, StandingsList, StandingsTableData};

/// Public Ergast mirror maintained by the Jolpica project.
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// Page size requested from upstream. Larger than any season or grid.
const PAGE_LIMIT: u32 = 100;

/// Configuration for the results API client.
#[derive(Debug, Clone)]
pub struct ErgastConfig {
    /// Base URL without trailing slash
    pub base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Directory for cached responses (`None` disables caching)
    pub cache_dir: Option<PathBuf>,
    /// How long a cached response stays fresh
    pub cache_ttl: Duration,
}

impl Default for ErgastConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            cache_dir: Some(PathBuf::from("./cache")),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Results API client.
#[derive(Debug, Clone)]
pub struct ErgastClient {
    http: Client,
    base_url: String,
    cache: Option<ResponseCache>,
}

impl ErgastClient {
    /// Create a client, opening the response cache if one is configured.
    pub async fn new(config: ErgastConfig) -> MotorsportResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("yarumotors/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MotorsportError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        let cache = match &config.cache_dir {
            Some(dir) => Some(ResponseCache::open(dir.clone(), config.cache_ttl).await?),
            None => None,
        };

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All events of a season in schedule order.
    #[instrument(skip(self))]
    pub async fn season_schedule(&self, year: i32) -> MotorsportResult<Vec<Race>> {
        let data: RaceTableData = self
            .fetch(&format!("/{}.json", year), |data: &RaceTableData| {
                !data.race_table.races.is_empty()
            })
            .await?;
        let mut races = data.race_table.races;
        races.sort_by_key(|r| r.round);
        Ok(races)
    }

    /// Resolve an event reference to its round number.
    ///
    /// Round references are returned as-is; names are matched against the
    /// season schedule and the first matching event wins.
    #[instrument(skip(self, event), fields(event = %event))]
    pub async fn resolve_round(&self, year: i32, event: &EventRef) -> MotorsportResult<u32> {
        match event {
            EventRef::Round(round) => Ok(*round),
            EventRef::Name(_) => {
                let schedule = self.season_schedule(year).await?;
                let race = schedule
                    .iter()
                    .find(|race| event.matches_any(&race.match_fields()))
                    .ok_or_else(|| MotorsportError::EventNotFound {
                        year,
                        event: event.to_string(),
                    })?;
                debug!(round = race.round, race = %race.race_name, "Resolved event");
                Ok(race.round)
            }
        }
    }

    /// Fetch the classification of one session.
    ///
    /// Returns `Ok(None)` when the event exists upstream but the session has
    /// no published classification yet.
    #[instrument(skip(self, event, kind), fields(event = %event, session = %kind))]
    pub async fn session(
        &self,
        year: i32,
        event: &EventRef,
        kind: SessionKind,
    ) -> MotorsportResult<Option<Race>> {
        let round = self.resolve_round(year, event).await?;
        let path = format!("/{}/{}/{}.json", year, round, kind.ergast_resource());
        let data: RaceTableData = self
            .fetch(&path, |data: &RaceTableData| {
                data.race_table.races.first().is_some_and(|race| is_classified(race, kind))
            })
            .await?;

        let race = data.race_table.races.into_iter().next();
        let populated = race.filter(|race| is_classified(race, kind));

        info!(
            year = year,
            round = round,
            available = populated.is_some(),
            "Fetched session classification"
        );
        Ok(populated)
    }

    /// Driver standings for a season (`"current"` or a year).
    #[instrument(skip(self))]
    pub async fn driver_standings(&self, season: &str) -> MotorsportResult<Option<StandingsList>> {
        self.standings(season, "driverStandings").await
    }

    /// Constructor standings for a season (`"current"` or a year).
    #[instrument(skip(self))]
    pub async fn constructor_standings(&self, season: &str) -> MotorsportResult<Option<StandingsList>> {
        self.standings(season, "constructorStandings").await
    }

    async fn standings(&self, season: &str, resource: &str) -> MotorsportResult<Option<StandingsList>> {
        validate_season(season)?;
        let data: StandingsTableData = self
            .fetch(&format!("/{}/{}.json", season, resource), |data: &StandingsTableData| {
                data.standings_table.standings_lists.first().is_some_and(|list| {
                    !list.driver_standings.is_empty() || !list.constructor_standings.is_empty()
                })
            })
            .await?;
        Ok(data.standings_table.standings_lists.into_iter().next())
    }

    /// GET a resource, going through the response cache when enabled.
    ///
    /// Only bodies for which `complete` holds are stored, so an empty
    /// "not published yet" answer is asked for again on the next call. A
    /// cached body that no longer decodes is evicted and refetched.
    async fn fetch<T, F>(&self, path: &str, complete: F) -> MotorsportResult<T>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let key = format!("{}?limit={}", path, PAGE_LIMIT);

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&key).await {
                match decode::<T>(path, &body) {
                    Ok(data) => return Ok(data),
                    Err(e) => {
                        warn!(key = %key, error = %e, "Evicting undecodable cache entry");
                        cache.remove(&key).await;
                    }
                }
            }
        }

        let body = self.fetch_remote(&key).await?;
        let data = decode::<T>(path, &body)?;

        if let Some(cache) = &self.cache {
            if complete(&data) {
                cache.put(&key, &body).await;
            } else {
                debug!(key = %key, "Response incomplete; not caching");
            }
        }
        Ok(data)
    }

    async fn fetch_remote(&self, key: &str) -> MotorsportResult<Bytes> {
        let url = format!("{}{}", self.base_url, key);
        debug!(url = %url, "Requesting upstream");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MotorsportError::UpstreamError(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MotorsportError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| MotorsportError::UpstreamError(format!("{}: {}", url, e)))
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> MotorsportResult<T> {
    let envelope: Envelope<T> = serde_json::from_slice(body)
        .map_err(|e| MotorsportError::DecodeError(format!("{}: {}", path, e)))?;
    Ok(envelope.mr_data)
}

/// Whether the race carries a classification for the session.
fn is_classified(race: &Race, kind: SessionKind) -> bool {
    match kind {
        SessionKind::Race => !race.results.is_empty(),
        SessionKind::Sprint => !race.sprint_results.is_empty(),
        SessionKind::Qualifying => !race.qualifying_results.is_empty(),
    }
}

fn validate_season(season: &str) -> MotorsportResult<()> {
    if season == "current" || season.parse::<u16>().is_ok() {
        Ok(())
    } else {
        Err(MotorsportError::InvalidParameter {
            param: "season".to_string(),
            message: format!("expected a year or 'current', got '{}'", season),
        })
    }
}
