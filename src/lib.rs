pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod submission_guard;
pub mod telemetry;
mod utils;
