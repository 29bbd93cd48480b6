//! Models shared by the client binary and its library.

pub mod config;
