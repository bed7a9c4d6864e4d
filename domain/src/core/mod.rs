//! Errors shared by the account and connection models.

pub mod error;
