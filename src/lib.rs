//! Live aircraft state: snapshot ingestion, dead-reckoning between snapshots, bounded trails,
//! geofencing and display filters, served to a map frontend over HTTP.

pub mod aircraft;
pub mod animate;
pub mod config;
pub mod errors;
pub mod filter;
pub mod geo;
pub mod ingest;
pub mod route;
pub mod server;
pub mod source;
pub mod state;
pub mod tracker;
pub mod units;
