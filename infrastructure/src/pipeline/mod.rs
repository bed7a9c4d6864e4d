//! Host pipeline adapters
//!
//! Provides [`HttpHostPipeline`], which forwards chat messages to an HTTP
//! endpoint of the host agent system.

mod http;

pub use http::HttpHostPipeline;
