//! Catalog domain model.

pub mod model;
pub mod ordering;
pub mod records;
