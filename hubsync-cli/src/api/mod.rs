//! HubSpot CRM v3 API access

pub mod auth;
pub mod client;
pub mod constants;
pub mod fetch;
pub mod models;
pub mod pipelines;
