//! Common types and utilities shared across all yarumotors services.

pub mod error;
pub mod event;
pub mod laptime;
pub mod session;
pub mod team;

pub use error::{MotorsportError, MotorsportResult};
pub use event::EventRef;
pub use laptime::LapTime;
pub use session::SessionKind;
pub use team::{TeamStyle, CHART_FALLBACK_COLOR, ROW_FALLBACK_COLOR};
