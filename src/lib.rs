// Phishscope: email phishing triage from the terminal
//
// This is the library root. Each module corresponds to a major subsystem:
// the risk classifier, the backend API gateway, the scan workflow, the
// admin query layer, and analytics aggregation.

pub mod admin;
pub mod analytics;
pub mod api;
pub mod config;
pub mod output;
pub mod risk;
pub mod workflow;
