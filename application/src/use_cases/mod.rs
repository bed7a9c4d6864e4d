//! Use cases
//!
//! - [`route_inbound`]: classify inbound gateway events and dispatch them
//! - [`manage_accounts`]: start, stop and send on account connections

pub mod manage_accounts;
pub mod route_inbound;
