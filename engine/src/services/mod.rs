// Service layer: the one entry point the CLI (or any embedding host) talks to.
pub mod analysis_service;

pub use analysis_service::{Analysis, AnalysisService};
