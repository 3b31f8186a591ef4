//! Solvability scoring for French rental applications, with the configuration, telemetry
//! and HTTP plumbing needed to run it as a service.

pub mod applications;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

pub use scoring::{
    calculate_solvability_score, SolvabilityScore, SolvabilityScorer, TenantScoreInput,
};
