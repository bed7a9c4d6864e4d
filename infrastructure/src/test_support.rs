//! Local servers and fakes for adapter tests.

use axum::Router;
use relay_application::{ConnectionLink, SendError};
use relay_domain::{AccountId, OutboundFrame};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral loopback port and return the port.
pub async fn serve(router: Router) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    port
}

/// A loopback port nothing is listening on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Open connection that records what it is asked to send.
pub struct RecordingLink {
    account_id: AccountId,
    sent: Mutex<Vec<OutboundFrame>>,
}

impl RecordingLink {
    pub fn new(account: &str) -> Arc<Self> {
        Arc::new(Self {
            account_id: AccountId::new(account),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<OutboundFrame> {
        self.sent.lock().unwrap().clone()
    }
}

impl ConnectionLink for RecordingLink {
    fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }
}
