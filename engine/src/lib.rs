// Engine library root: indicator calculator, scorer and the service around them.
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod presentation;
pub mod scoring;
pub mod services;
