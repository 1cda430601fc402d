//! Control-channel session state machine.
//!
//! One [`SessionManager`] owns the channel to the controller. A single
//! driving task sequences every transition - connect, snapshot, pump,
//! failure, backoff, reconnect - so no two channel handles can ever overlap
//! and at most one reconnect timer is outstanding. The manager itself is an
//! explicit handle constructed by the embedding binary; there is no global
//! agent instance.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use tether_protocol::{Command, Outbound};

use crate::dispatch::CommandDispatcher;
use crate::error::{Error, Result};
use crate::events::{EventBus, EventStream, EventWaiter};
use crate::host::DeviceInfo;
use crate::transport::{Connector, Transport, TransportEvent, TransportParts};

/// Fixed interval between a channel failure and the next connect attempt.
///
/// Constant on purpose: this is fixed-interval retry without an attempt
/// cap, not exponential backoff or circuit breaking.
pub const RECONNECT_BACKOFF: Duration = Duration::from_millis(5000);

/// Close code sent when the session is stopped locally.
pub const CLOSE_NORMAL: u16 = 1000;

/// Close reason sent when the session is stopped locally.
pub const CLOSE_REASON_STOPPED: &str = "ServiceDestroyed";

/// Connection state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No channel and no driving task
    Disconnected,
    /// A connect attempt is in progress
    Connecting,
    /// Channel established, snapshot sent, commands accepted
    Open,
    /// Channel lost; a reconnect is pending
    Failed,
}

/// Observable session happenings.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A connect attempt started.
    Connecting,
    /// The channel is open and the device snapshot has been sent.
    Opened,
    /// An inbound frame failed to parse and was dropped without an ack.
    FrameRejected {
        /// Parse error text
        reason: String,
    },
    /// The channel failed or was closed by the peer.
    ChannelFailed {
        /// Failure description
        reason: String,
    },
    /// A reconnect attempt was scheduled.
    ReconnectScheduled {
        /// Delay until the attempt
        backoff: Duration,
    },
    /// The session was stopped locally.
    Stopped,
}

struct SessionShared {
    url: String,
    connector: Arc<dyn Connector>,
    device: Arc<dyn DeviceInfo>,
    dispatcher: CommandDispatcher,
    state: Mutex<SessionState>,
    // Some exactly while the session is Open.
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    events: EventBus<SessionEvent>,
}

impl SessionShared {
    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock();
        if *state != next {
            debug!(target: "tether.session", from = ?*state, to = ?next, "state change");
            *state = next;
        }
    }
}

/// Owns the control channel and its state machine.
///
/// Construct one per process, `start()` it, and share it behind an [`Arc`]
/// with whatever needs to observe or stop the session.
pub struct SessionManager {
    shared: Arc<SessionShared>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    /// Creates a session against `url`. Inert until [`start`](Self::start).
    pub fn new(
        url: impl Into<String>,
        connector: Arc<dyn Connector>,
        device: Arc<dyn DeviceInfo>,
        dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            shared: Arc::new(SessionShared {
                url: url.into(),
                connector,
                device,
                dispatcher,
                state: Mutex::new(SessionState::Disconnected),
                outbound: Mutex::new(None),
                events: EventBus::default(),
            }),
            stop_tx: Mutex::new(None),
            task: Mutex::new(None),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        *self.shared.state.lock()
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> EventStream<SessionEvent> {
        EventStream::new(self.shared.events.subscribe())
    }

    /// Resolves once an event matching `predicate` is emitted, or times out.
    pub fn wait_for<F>(&self, predicate: F, timeout: Duration) -> EventWaiter<SessionEvent>
    where
        F: Fn(&SessionEvent) -> bool + Send + Sync + 'static,
    {
        EventWaiter::new(self.shared.events.register_waiter(predicate), timeout)
    }

    /// Starts the driving task. No-op while one is already running.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!(target: "tether.session", "start ignored, session already running");
            return;
        }
        let (stop_tx, stop_rx) = watch::channel(false);
        *self.stop_tx.lock() = Some(stop_tx);
        *task = Some(tokio::spawn(run_loop(self.shared.clone(), stop_rx)));
    }

    /// Stops the session.
    ///
    /// Closes a live channel with [`CLOSE_NORMAL`] / [`CLOSE_REASON_STOPPED`],
    /// cancels any pending reconnect timer, and waits for the driving task
    /// to finish. No reconnect happens afterwards until `start()` is called
    /// again.
    pub async fn stop(&self) {
        if let Some(stop_tx) = self.stop_tx.lock().take() {
            let _ = stop_tx.send(true);
        }
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                error!(target: "tether.session", error = %e, "session task failed");
            }
        }
    }

    /// Sends a raw text payload to the controller; valid only while Open.
    ///
    /// Outside Open the payload is dropped, a warning is logged, and
    /// [`Error::NotOpen`] is returned. Dropping a payload is not fatal to
    /// the session.
    pub fn send(&self, payload: impl Into<String>) -> Result<()> {
        match self.shared.outbound.lock().as_ref() {
            Some(tx) => tx.send(payload.into()).map_err(|_| Error::ChannelClosed),
            None => {
                warn!(target: "tether.session", "send while session not open, payload dropped");
                Err(Error::NotOpen)
            }
        }
    }
}

enum ChannelOutcome {
    /// Stopped locally; leave the loop without reconnecting.
    Stopped,
    /// The attempt or the channel failed; reconnect after the backoff.
    Failed(String),
}

async fn run_loop(shared: Arc<SessionShared>, mut stop_rx: watch::Receiver<bool>) {
    loop {
        shared.set_state(SessionState::Connecting);
        shared.events.emit(SessionEvent::Connecting);
        info!(target: "tether.session", url = %shared.url, "connecting");

        let outcome = run_channel(&shared, &mut stop_rx).await;
        shared.outbound.lock().take();

        match outcome {
            ChannelOutcome::Stopped => break,
            ChannelOutcome::Failed(reason) => {
                shared.set_state(SessionState::Failed);
                warn!(target: "tether.session", %reason, "channel failed");
                shared.events.emit(SessionEvent::ChannelFailed { reason });
                shared.events.emit(SessionEvent::ReconnectScheduled {
                    backoff: RECONNECT_BACKOFF,
                });
                tokio::select! {
                    _ = wait_for_stop(&mut stop_rx) => break,
                    _ = sleep(RECONNECT_BACKOFF) => {}
                }
            }
        }
    }

    shared.set_state(SessionState::Disconnected);
    shared.events.emit(SessionEvent::Stopped);
    info!(target: "tether.session", "session stopped");
}

/// One connect attempt and, if it opens, the pump until the channel ends.
async fn run_channel(
    shared: &SessionShared,
    stop_rx: &mut watch::Receiver<bool>,
) -> ChannelOutcome {
    let parts = tokio::select! {
        _ = wait_for_stop(stop_rx) => return ChannelOutcome::Stopped,
        parts = shared.connector.connect(&shared.url) => parts,
    };
    let TransportParts {
        mut sender,
        mut receiver,
    } = match parts {
        Ok(parts) => parts,
        Err(e) => return ChannelOutcome::Failed(e.to_string()),
    };

    // Contract: the controller sees the snapshot before the session enters
    // Open, and therefore before any ack.
    let snapshot = shared.device.snapshot();
    let first = match serde_json::to_string(&snapshot) {
        Ok(text) => text,
        Err(e) => return ChannelOutcome::Failed(e.to_string()),
    };
    if let Err(e) = sender.send_text(first).await {
        return ChannelOutcome::Failed(e.to_string());
    }

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    *shared.outbound.lock() = Some(outbound_tx);
    shared.set_state(SessionState::Open);
    shared.events.emit(SessionEvent::Opened);
    info!(
        target: "tether.session",
        device = %snapshot.device_id,
        "channel open, snapshot sent"
    );

    loop {
        tokio::select! {
            _ = wait_for_stop(stop_rx) => {
                if let Err(e) = sender.close(CLOSE_NORMAL, CLOSE_REASON_STOPPED).await {
                    debug!(target: "tether.session", error = %e, "close frame not delivered");
                }
                return ChannelOutcome::Stopped;
            }
            Some(payload) = outbound_rx.recv() => {
                if let Err(e) = sender.send_text(payload).await {
                    return ChannelOutcome::Failed(e.to_string());
                }
            }
            event = receiver.next_event() => match event {
                Some(Ok(TransportEvent::Text(text))) => {
                    if let Err(e) = handle_frame(shared, &text, sender.as_mut()).await {
                        return ChannelOutcome::Failed(e.to_string());
                    }
                }
                Some(Ok(TransportEvent::Closed { code, reason })) => {
                    // Any close not initiated by us counts as a failure and
                    // feeds the reconnect path.
                    let detail = match (code, reason) {
                        (Some(code), Some(reason)) if !reason.is_empty() => {
                            format!("code {code}, {reason}")
                        }
                        (Some(code), _) => format!("code {code}"),
                        _ => "no close frame".to_string(),
                    };
                    return ChannelOutcome::Failed(format!("closed by peer ({detail})"));
                }
                Some(Err(e)) => return ChannelOutcome::Failed(e.to_string()),
                None => return ChannelOutcome::Failed("stream ended".to_string()),
            }
        }
    }
}

/// Parses one inbound frame, dispatches it, and writes the ack.
///
/// Parse failures drop the frame: with no verb recovered there is nothing
/// to acknowledge. Only a write failure is an error here.
async fn handle_frame(
    shared: &SessionShared,
    text: &str,
    sender: &mut dyn Transport,
) -> Result<()> {
    let command: Command = match serde_json::from_str(text) {
        Ok(command) => command,
        Err(e) => {
            warn!(target: "tether.session", error = %e, "unparseable inbound frame dropped");
            shared.events.emit(SessionEvent::FrameRejected {
                reason: e.to_string(),
            });
            return Ok(());
        }
    };
    debug!(target: "tether.session", action = %command.action, "command received");
    let ack = shared.dispatcher.dispatch(&command);
    let frame = serde_json::to_string(&Outbound::Ack(ack))?;
    sender.send_text(frame).await
}

async fn wait_for_stop(stop_rx: &mut watch::Receiver<bool>) {
    // A dropped sender also means shut down.
    let _ = stop_rx.wait_for(|stopped| *stopped).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use tether_protocol::{Ack, DeviceSnapshot};

    use crate::host::{ActionExecutor, HostServices};
    use crate::scheduler::ActionScheduler;
    use crate::transport::TransportReceiver;

    /// What the agent wrote to one scripted channel.
    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Text(String),
        Close { code: u16, reason: String },
    }

    struct FakeSender {
        sent: Arc<Mutex<Vec<Sent>>>,
    }

    #[async_trait]
    impl Transport for FakeSender {
        async fn send_text(&mut self, text: String) -> Result<()> {
            self.sent.lock().push(Sent::Text(text));
            Ok(())
        }

        async fn close(&mut self, code: u16, reason: &str) -> Result<()> {
            self.sent.lock().push(Sent::Close {
                code,
                reason: reason.to_string(),
            });
            Ok(())
        }
    }

    struct FakeReceiver {
        rx: mpsc::UnboundedReceiver<Result<TransportEvent>>,
    }

    #[async_trait]
    impl TransportReceiver for FakeReceiver {
        async fn next_event(&mut self) -> Option<Result<TransportEvent>> {
            self.rx.recv().await
        }
    }

    /// Test-side handle to one scripted channel.
    struct ChannelHandle {
        sent: Arc<Mutex<Vec<Sent>>>,
        feed: mpsc::UnboundedSender<Result<TransportEvent>>,
    }

    impl ChannelHandle {
        fn sent(&self) -> Vec<Sent> {
            self.sent.lock().clone()
        }

        fn feed_text(&self, text: impl Into<String>) {
            self.feed
                .send(Ok(TransportEvent::Text(text.into())))
                .unwrap();
        }

        fn feed_error(&self, msg: &str) {
            self.feed
                .send(Err(Error::TransportError(msg.to_string())))
                .unwrap();
        }

        fn feed_closed(&self) {
            self.feed
                .send(Ok(TransportEvent::Closed {
                    code: Some(1001),
                    reason: None,
                }))
                .unwrap();
        }

        async fn wait_sent(&self, n: usize) -> Vec<Sent> {
            for _ in 0..500 {
                let sent = self.sent.lock().clone();
                if sent.len() >= n {
                    return sent;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            panic!(
                "timed out waiting for {n} outbound frames, have {:?}",
                self.sent.lock()
            );
        }
    }

    enum ScriptedOutcome {
        Fail(String),
        Channel(TransportParts),
    }

    #[derive(Default)]
    struct ScriptedConnector {
        script: Mutex<VecDeque<ScriptedOutcome>>,
        connects: AtomicUsize,
    }

    impl ScriptedConnector {
        fn push_failure(&self, msg: &str) {
            self.script
                .lock()
                .push_back(ScriptedOutcome::Fail(msg.to_string()));
        }

        fn push_channel(&self) -> ChannelHandle {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let (feed, rx) = mpsc::unbounded_channel();
            self.script
                .lock()
                .push_back(ScriptedOutcome::Channel(TransportParts {
                    sender: Box::new(FakeSender { sent: sent.clone() }),
                    receiver: Box::new(FakeReceiver { rx }),
                }));
            ChannelHandle { sent, feed }
        }

        fn connect_count(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        async fn connect(&self, _url: &str) -> Result<TransportParts> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().pop_front() {
                Some(ScriptedOutcome::Channel(parts)) => Ok(parts),
                Some(ScriptedOutcome::Fail(msg)) => Err(Error::ConnectionFailed(msg)),
                None => Err(Error::ConnectionFailed("script exhausted".to_string())),
            }
        }
    }

    struct StubDevice;

    impl DeviceInfo for StubDevice {
        fn device_identifier(&self) -> String {
            "test-device".to_string()
        }
        fn hardware_id(&self) -> String {
            "hw-1".to_string()
        }
        fn local_address(&self) -> String {
            "10.0.0.2".to_string()
        }
        fn battery_level(&self) -> i32 {
            73
        }
    }

    struct StubHost;

    impl HostServices for StubHost {
        fn launch_application(&self, _package: &str) -> bool {
            true
        }
        fn show_transient_message(&self, _text: &str) {}
    }

    struct NullExecutor;

    impl ActionExecutor for NullExecutor {
        fn execute(&self, _x: f32, _y: f32) -> bool {
            true
        }
    }

    fn new_session(connector: Arc<ScriptedConnector>) -> SessionManager {
        let scheduler = Arc::new(ActionScheduler::new(Arc::new(NullExecutor)));
        let dispatcher = CommandDispatcher::new(Arc::new(StubHost), scheduler);
        SessionManager::new(
            "ws://controller.test/ws",
            connector,
            Arc::new(StubDevice),
            dispatcher,
        )
    }

    fn parse_ack(sent: &Sent) -> Ack {
        let Sent::Text(text) = sent else {
            panic!("expected a text frame, got {sent:?}");
        };
        let Outbound::Ack(ack) = serde_json::from_str(text).unwrap();
        ack
    }

    #[tokio::test]
    async fn snapshot_is_first_outbound_frame() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        let sent = channel.sent();
        let Sent::Text(first) = &sent[0] else {
            panic!("expected a text frame, got {:?}", sent[0]);
        };
        let snapshot: DeviceSnapshot = serde_json::from_str(first).unwrap();
        assert_eq!(snapshot.device_id, "test-device");
        assert_eq!(snapshot.android_id, "hw-1");
        assert_eq!(snapshot.ip, "10.0.0.2");
        assert_eq!(snapshot.battery, 73);
        assert_eq!(session.state(), SessionState::Open);

        session.stop().await;
    }

    #[tokio::test]
    async fn command_is_acked_after_snapshot() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        channel.feed_text(r#"{"action":"launch","package":"com.example.app"}"#);
        let sent = channel.wait_sent(2).await;

        assert_eq!(
            parse_ack(&sent[1]),
            Ack::ok("launch", "launched com.example.app")
        );
        session.stop().await;
    }

    #[tokio::test]
    async fn acks_preserve_dispatch_order() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        for id in ["1", "2", "3"] {
            channel.feed_text(format!(r#"{{"action":"toast","text":"t","id":"{id}"}}"#));
        }
        let sent = channel.wait_sent(4).await;

        let ids: Vec<_> = sent[1..]
            .iter()
            .map(|frame| parse_ack(frame).id.unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
        session.stop().await;
    }

    #[tokio::test]
    async fn malformed_frame_is_dropped_without_ack_or_state_change() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        let rejected = session.wait_for(
            |e| matches!(e, SessionEvent::FrameRejected { .. }),
            Duration::from_secs(5),
        );
        channel.feed_text("!!not a structured payload!!");
        rejected.wait().await.unwrap();

        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(channel.sent().len(), 1, "only the snapshot was sent");

        // The session keeps handling valid frames afterwards.
        channel.feed_text(r#"{"action":"toast","text":"still alive"}"#);
        let sent = channel.wait_sent(2).await;
        assert!(parse_ack(&sent[1]).ok);

        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failure_reconnects_after_fixed_backoff() {
        let connector = Arc::new(ScriptedConnector::default());
        let first = connector.push_channel();
        let second = connector.push_channel();
        let session = new_session(connector.clone());

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(60),
        );
        session.start();
        opened.wait().await.unwrap();

        let failed = session.wait_for(
            |e| matches!(e, SessionEvent::ChannelFailed { .. }),
            Duration::from_secs(60),
        );
        let reopened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(60),
        );

        first.feed_error("socket reset");
        failed.wait().await.unwrap();
        assert_eq!(session.state(), SessionState::Failed);
        let failed_at = tokio::time::Instant::now();

        reopened.wait().await.unwrap();
        let reopened_at = tokio::time::Instant::now();

        assert_eq!(reopened_at - failed_at, RECONNECT_BACKOFF);
        assert_eq!(connector.connect_count(), 2, "exactly one reconnect");
        assert!(matches!(second.sent()[0], Sent::Text(_)));

        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn remote_close_enters_reconnect_path() {
        let connector = Arc::new(ScriptedConnector::default());
        let first = connector.push_channel();
        let _second = connector.push_channel();
        let session = new_session(connector.clone());

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(60),
        );
        session.start();
        opened.wait().await.unwrap();

        let reopened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(60),
        );
        first.feed_closed();
        reopened.wait().await.unwrap();

        assert_eq!(connector.connect_count(), 2);
        session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_backoff_prevents_reconnect() {
        let connector = Arc::new(ScriptedConnector::default());
        connector.push_failure("connection refused");
        let session = new_session(connector.clone());

        let scheduled = session.wait_for(
            |e| matches!(e, SessionEvent::ReconnectScheduled { .. }),
            Duration::from_secs(60),
        );
        session.start();
        scheduled.wait().await.unwrap();
        assert_eq!(session.state(), SessionState::Failed);

        session.stop().await;
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(connector.connect_count(), 1);

        // Well past the backoff interval: still no second attempt.
        tokio::time::sleep(RECONNECT_BACKOFF * 2).await;
        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn stop_closes_channel_with_service_destroyed() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        session.stop().await;

        let sent = channel.sent();
        assert_eq!(
            sent.last(),
            Some(&Sent::Close {
                code: 1000,
                reason: "ServiceDestroyed".to_string(),
            })
        );
        assert_eq!(session.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn send_is_valid_only_while_open() {
        let connector = Arc::new(ScriptedConnector::default());
        let channel = connector.push_channel();
        let session = new_session(connector);

        assert!(session.send("early").unwrap_err().is_not_open());

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(5),
        );
        session.start();
        opened.wait().await.unwrap();

        session.send("ping").unwrap();
        let sent = channel.wait_sent(2).await;
        assert_eq!(sent[1], Sent::Text("ping".to_string()));

        session.stop().await;
        assert!(session.send("late").unwrap_err().is_not_open());
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent_while_running() {
        let connector = Arc::new(ScriptedConnector::default());
        let _channel = connector.push_channel();
        let session = new_session(connector.clone());

        let opened = session.wait_for(
            |e| matches!(e, SessionEvent::Opened),
            Duration::from_secs(60),
        );
        session.start();
        opened.wait().await.unwrap();

        session.start();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(connector.connect_count(), 1);
        assert_eq!(session.state(), SessionState::Open);

        session.stop().await;
    }

    #[tokio::test]
    async fn stop_without_start_is_a_noop() {
        let session = new_session(Arc::new(ScriptedConnector::default()));
        session.stop().await;
        assert_eq!(session.state(), SessionState::Disconnected);
    }
}
