//! Launches the controller's task requests as tokio tasks.
//!
//! Every task reports back by pushing events into the one session
//! channel and then terminates; nothing here touches session state.
//! Tasks are abandoned on quit — their sends fail silently once the
//! receiver is gone.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{
    events::{ServiceError, SessionEvent, TaskRequest},
    message::{Message, RemoteMessage, UNKNOWN_SENDER},
};

use super::contracts::ChatService;

/// Fixed polling cadence; re-armed on every tick.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Pause between a send completing and the follow-up refresh, to
/// absorb eventual-consistency lag on the service side.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Page size for history fetches.
pub const FETCH_PAGE_SIZE: usize = 20;

pub struct TaskGateway<S: ChatService + 'static> {
    service: Arc<S>,
    channel_id: String,
    events: UnboundedSender<SessionEvent>,
}

impl<S: ChatService + 'static> TaskGateway<S> {
    pub fn new(service: Arc<S>, channel_id: String, events: UnboundedSender<SessionEvent>) -> Self {
        Self {
            service,
            channel_id,
            events,
        }
    }

    pub fn dispatch(&self, requests: Vec<TaskRequest>) {
        for request in requests {
            match request {
                TaskRequest::ScheduleTick => self.schedule_tick(),
                TaskRequest::Fetch { cursor } => self.spawn_fetch(cursor),
                TaskRequest::SendThenRefresh { text } => self.spawn_send_then_refresh(text),
            }
        }
    }

    fn schedule_tick(&self) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(POLL_INTERVAL).await;
            let _ = events.send(SessionEvent::Tick);
        });
    }

    fn spawn_fetch(&self, cursor: String) {
        let service = Arc::clone(&self.service);
        let channel_id = self.channel_id.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = fetch_page(service.as_ref(), &channel_id, &cursor).await;
            let _ = events.send(SessionEvent::FetchCompleted(result));
        });
    }

    /// The send-then-refresh pipeline: one task, two ordered stages.
    /// The refresh stage always requests the most recent page (the
    /// just-sent message may not be visible on an incremental poll
    /// yet) and runs even when the send stage failed.
    fn spawn_send_then_refresh(&self, text: String) {
        let service = Arc::clone(&self.service);
        let channel_id = self.channel_id.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let sent = service.send_message(&channel_id, &text).await;
            if let Err(error) = &sent {
                tracing::warn!(error = %error, "send stage failed, refresh still scheduled");
            }
            let _ = events.send(SessionEvent::SendCompleted(sent.map(|_| ())));

            tokio::time::sleep(SETTLE_DELAY).await;

            let result = fetch_page(service.as_ref(), &channel_id, "").await;
            let _ = events.send(SessionEvent::FetchCompleted(result));
        });
    }
}

/// Fetches one page and resolves sender names. A resolution miss is
/// absorbed per message and never fails the fetch.
async fn fetch_page<S: ChatService>(
    service: &S,
    channel_id: &str,
    cursor: &str,
) -> Result<Vec<Message>, ServiceError> {
    let remote = service
        .fetch_history(channel_id, cursor, FETCH_PAGE_SIZE)
        .await?;

    let mut messages = Vec::with_capacity(remote.len());
    for raw in remote {
        let sender_name = resolve_sender(service, &raw).await;
        messages.push(Message::new(raw.id, sender_name, raw.text));
    }
    Ok(messages)
}

async fn resolve_sender<S: ChatService>(service: &S, raw: &RemoteMessage) -> String {
    if raw.sender_ref.is_empty() {
        return UNKNOWN_SENDER.to_owned();
    }
    match service.resolve_sender_name(&raw.sender_ref).await {
        Ok(name) => name,
        Err(error) => {
            tracing::debug!(sender_ref = %raw.sender_ref, error = %error, "sender lookup missed");
            UNKNOWN_SENDER.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        events::ServiceError,
        message::{ChannelInfo, RemoteMessage},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct StubService {
        calls: Mutex<Vec<String>>,
        history: Result<Vec<RemoteMessage>, ServiceError>,
        send: Result<String, ServiceError>,
        names: Result<String, ServiceError>,
    }

    impl StubService {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                history: Ok(Vec::new()),
                send: Ok("100.1".to_owned()),
                names: Ok("alice".to_owned()),
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().expect("calls lock").push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ChatService for StubService {
        async fn channel_info(&self, _channel_id: &str) -> Result<ChannelInfo, ServiceError> {
            self.record("channel_info");
            Ok(ChannelInfo {
                name: "general".to_owned(),
            })
        }

        async fn fetch_history(
            &self,
            _channel_id: &str,
            since_cursor: &str,
            limit: usize,
        ) -> Result<Vec<RemoteMessage>, ServiceError> {
            self.record(format!("fetch:{since_cursor}:{limit}"));
            self.history.clone()
        }

        async fn send_message(
            &self,
            _channel_id: &str,
            text: &str,
        ) -> Result<String, ServiceError> {
            self.record(format!("send:{text}"));
            self.send.clone()
        }

        async fn resolve_sender_name(&self, sender_ref: &str) -> Result<String, ServiceError> {
            self.record(format!("resolve:{sender_ref}"));
            self.names.clone()
        }
    }

    fn remote(id: &str, sender_ref: &str) -> RemoteMessage {
        RemoteMessage {
            id: id.to_owned(),
            text: "body".to_owned(),
            sender_ref: sender_ref.to_owned(),
        }
    }

    fn gateway(
        service: StubService,
    ) -> (
        TaskGateway<StubService>,
        mpsc::UnboundedReceiver<SessionEvent>,
        Arc<StubService>,
    ) {
        let service = Arc::new(service);
        let (tx, rx) = mpsc::unbounded_channel();
        (
            TaskGateway::new(Arc::clone(&service), "C123".to_owned(), tx),
            rx,
            service,
        )
    }

    #[tokio::test]
    async fn fetch_resolves_sender_names() {
        let mut service = StubService::new();
        service.history = Ok(vec![remote("100.1", "U1")]);
        let (gateway, mut rx, stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::Fetch {
            cursor: "50.0".to_owned(),
        }]);

        let event = rx.recv().await.expect("fetch event");
        match event {
            SessionEvent::FetchCompleted(Ok(messages)) => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].sender_name, "alice");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(stub.calls().contains(&"fetch:50.0:20".to_owned()));
    }

    #[tokio::test]
    async fn lookup_miss_falls_back_to_placeholder() {
        let mut service = StubService::new();
        service.history = Ok(vec![remote("100.1", "U1")]);
        service.names = Err(ServiceError::NotFound);
        let (gateway, mut rx, _stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::Fetch {
            cursor: String::new(),
        }]);

        match rx.recv().await.expect("fetch event") {
            SessionEvent::FetchCompleted(Ok(messages)) => {
                assert_eq!(messages[0].sender_name, UNKNOWN_SENDER);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_sender_ref_skips_the_lookup() {
        let mut service = StubService::new();
        service.history = Ok(vec![remote("100.1", "")]);
        let (gateway, mut rx, stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::Fetch {
            cursor: String::new(),
        }]);

        match rx.recv().await.expect("fetch event") {
            SessionEvent::FetchCompleted(Ok(messages)) => {
                assert_eq!(messages[0].sender_name, UNKNOWN_SENDER);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!stub.calls().iter().any(|call| call.starts_with("resolve:")));
    }

    #[tokio::test]
    async fn fetch_failure_is_delivered_as_error_event() {
        let mut service = StubService::new();
        service.history = Err(ServiceError::Transport("down".to_owned()));
        let (gateway, mut rx, _stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::Fetch {
            cursor: String::new(),
        }]);

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::FetchCompleted(Err(ServiceError::Transport(
                "down".to_owned()
            ))))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn send_completion_precedes_the_refresh() {
        let mut service = StubService::new();
        service.history = Ok(vec![remote("200.1", "U1")]);
        let (gateway, mut rx, stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::SendThenRefresh {
            text: "hello".to_owned(),
        }]);

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::SendCompleted(Ok(())))
        );

        // The refresh fires only after the settle delay.
        match rx.recv().await.expect("refresh event") {
            SessionEvent::FetchCompleted(Ok(messages)) => assert_eq!(messages.len(), 1),
            other => panic!("unexpected event: {other:?}"),
        }

        let calls = stub.calls();
        let send_at = calls
            .iter()
            .position(|call| call == "send:hello")
            .expect("send call");
        let fetch_at = calls
            .iter()
            .position(|call| call.starts_with("fetch:"))
            .expect("fetch call");
        assert!(send_at < fetch_at);
        // The pipeline's refresh ignores the sync cursor.
        assert_eq!(calls[fetch_at], "fetch::20");
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_still_runs_after_a_failed_send() {
        let mut service = StubService::new();
        service.send = Err(ServiceError::RateLimited);
        let (gateway, mut rx, _stub) = gateway(service);

        gateway.dispatch(vec![TaskRequest::SendThenRefresh {
            text: "hello".to_owned(),
        }]);

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::SendCompleted(Err(ServiceError::RateLimited)))
        );
        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::FetchCompleted(Ok(Vec::new())))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn tick_is_rearmed_after_the_poll_interval() {
        let (gateway, mut rx, _stub) = gateway(StubService::new());

        gateway.dispatch(vec![TaskRequest::ScheduleTick]);

        assert_eq!(rx.recv().await, Some(SessionEvent::Tick));
    }
}
