//! Wire protocol spoken with the gateway service.
//!
//! Every message is a JSON object tagged by a `"type"` field; payload field
//! names are camelCase.
//!
//! - **Inbound** ([`inbound::InboundEvent`]): gateway → relay
//! - **Outbound** ([`outbound::OutboundFrame`]): relay → gateway

pub mod error;
pub mod inbound;
pub mod outbound;
