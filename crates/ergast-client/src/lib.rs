//! Client for the Ergast-compatible motorsport results API.
//!
//! Provides:
//! - Season schedules and event resolution by round or name
//! - Session classifications (race, sprint, qualifying)
//! - Driver and constructor standings
//! - A transparent on-disk response cache

pub mod cache;
pub mod client;
pub mod models;

pub use cache::ResponseCache;
pub use client::{ErgastClient, ErgastConfig, DEFAULT_BASE_URL};
pub use models::{
    Circuit, Constructor, ConstructorStanding, Driver, DriverStanding, Location,
    QualifyingResult, Race, RaceResult, ResultTime, StandingsList,
};
