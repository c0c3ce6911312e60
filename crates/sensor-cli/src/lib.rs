//! Host for the report sensors: project indexing, settings, the measure
//! store and logging setup.

pub mod analysis;
pub mod logging;
pub mod project;
pub mod store;
