//! HTTP inbound adapter exposing REST endpoints.

pub mod client_ip;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod stats;
pub mod stats_dto;

pub use error::ApiResult;
