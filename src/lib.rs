pub mod config;
pub mod controllers;
pub mod domain;
pub mod errors;
pub mod export;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
