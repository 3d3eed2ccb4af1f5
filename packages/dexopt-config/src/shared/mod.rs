//! Shared models used across config and feature slices

pub mod models;
