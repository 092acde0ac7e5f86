//! Showreel — project catalog.
//!
//! Turns catalog records (a YAML document or the bundled portfolio) into the
//! immutable, validated group → unit → step model the playback engine plays.

pub mod application;
pub mod domain;
pub mod error;

pub use domain::model::{Catalog, Group, Step, Unit};
pub use error::CatalogError;
