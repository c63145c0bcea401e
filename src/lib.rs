//! Move Jira tickets through their workflow from CI: transition, reassign,
//! stamp a custom field and leave a comment, one ticket or a whole batch.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod report;
pub mod telemetry;
pub mod workflow;
