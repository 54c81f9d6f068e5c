//! Weighted wellness assessments: form definitions, submission resolution,
//! and the harmony-score engine.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
