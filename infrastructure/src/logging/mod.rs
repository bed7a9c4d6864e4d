//! Logging infrastructure: structured status logging.
//!
//! Provides [`JsonlStatusLog`], a JSONL file writer that implements the
//! [`StatusSink`](relay_application::StatusSink) port.

mod jsonl_status;

pub use jsonl_status::JsonlStatusLog;
