//! Command handlers

pub mod config;
pub mod query;
pub mod record;
pub mod school;
pub mod user;
