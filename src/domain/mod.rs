//! Domain aggregates exposed by the lansia service layer.

pub mod auth;
pub mod dashboard;
pub mod filter;
pub mod lansia;
pub mod types;
pub mod upload;
