//! In-memory fakes for the ports, shared by this crate's unit tests.

use crate::ports::connection::{ConnectionHandle, ConnectionLink, Connector, SendError};
use crate::ports::hook_dispatcher::{HookDispatcher, HookError, HookRequest};
use crate::ports::host_pipeline::{HostPipeline, InboundChatMessage, PipelineError, ReplyHandle};
use crate::ports::inbound_handler::InboundHandler;
use async_trait::async_trait;
use relay_domain::{AccountId, ConnectionState, OutboundFrame, ResolvedAccount};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Connection fake that records every frame it is asked to send.
pub struct RecordingLink {
    account_id: AccountId,
    connected: AtomicBool,
    sent: Mutex<Vec<OutboundFrame>>,
    attempts: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    cancel: Mutex<Option<CancellationToken>>,
}

impl RecordingLink {
    fn with_state(account: &str, connected: bool) -> Arc<Self> {
        Arc::new(Self {
            account_id: AccountId::new(account),
            connected: AtomicBool::new(connected),
            sent: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            cancel: Mutex::new(None),
        })
    }

    pub fn connected(account: &str) -> Arc<Self> {
        Self::with_state(account, true)
    }

    pub fn disconnected(account: &str) -> Arc<Self> {
        Self::with_state(account, false)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutboundFrame> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.cancel.lock().unwrap().clone()
    }
}

impl ConnectionLink for RecordingLink {
    fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, frame: OutboundFrame) -> Result<(), SendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.is_connected() {
            return Err(SendError::NotConnected(self.account_id.clone()));
        }
        self.sent.lock().unwrap().push(frame);
        Ok(())
    }
}

impl ConnectionHandle for RecordingLink {
    fn start(&self, cancel: CancellationToken) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        *self.cancel.lock().unwrap() = Some(cancel);
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.set_connected(false);
    }

    fn state(&self) -> ConnectionState {
        if self.is_connected() {
            ConnectionState::Open
        } else {
            ConnectionState::Idle
        }
    }
}

/// Connector fake that hands out [`RecordingLink`]s.
#[derive(Default)]
pub struct StubConnector {
    built: Mutex<Vec<(ResolvedAccount, Arc<RecordingLink>)>>,
}

impl StubConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn built(&self) -> Vec<Arc<RecordingLink>> {
        self.built
            .lock()
            .unwrap()
            .iter()
            .map(|(_, link)| link.clone())
            .collect()
    }

    pub fn accounts(&self) -> Vec<ResolvedAccount> {
        self.built
            .lock()
            .unwrap()
            .iter()
            .map(|(account, _)| account.clone())
            .collect()
    }
}

impl Connector for StubConnector {
    fn connect(
        &self,
        account: ResolvedAccount,
        _handler: Arc<dyn InboundHandler>,
    ) -> Arc<dyn ConnectionHandle> {
        let link = RecordingLink::connected(account.id.as_str());
        self.built.lock().unwrap().push((account, link.clone()));
        link
    }
}

/// Host pipeline fake that records deliveries and optionally replies.
#[derive(Default)]
pub struct RecordingPipeline {
    delivered: Mutex<Vec<InboundChatMessage>>,
    auto_reply: Option<String>,
    fail: bool,
}

impl RecordingPipeline {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            auto_reply: Some(text.to_string()),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn delivered(&self) -> Vec<InboundChatMessage> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostPipeline for RecordingPipeline {
    async fn deliver(
        &self,
        message: InboundChatMessage,
        reply: ReplyHandle,
    ) -> Result<(), PipelineError> {
        self.delivered.lock().unwrap().push(message);
        if self.fail {
            return Err(PipelineError::Rejected("queue full".into()));
        }
        if let Some(text) = &self.auto_reply {
            reply.reply(text.clone());
        }
        Ok(())
    }
}

/// Hook dispatcher fake returning a fixed result.
pub struct StubHooks {
    result: Result<(), HookError>,
    calls: Mutex<Vec<HookRequest>>,
}

impl StubHooks {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            result: Ok(()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: HookError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<HookRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HookDispatcher for StubHooks {
    async fn dispatch(&self, request: &HookRequest) -> Result<(), HookError> {
        self.calls.lock().unwrap().push(request.clone());
        self.result.clone()
    }
}
