//! Storage abstractions for yarumotors services.
//!
//! Provides:
//! - Object storage (R2/S3, or in-memory for development) for rendered images
//! - Deterministic object key layout

pub mod object_store;
pub mod paths;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig, ObjectStream};
pub use paths::AssetPath;
