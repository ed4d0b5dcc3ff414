//! # Keyed Sessions
//!
//! A [`SessionHub`] owns one worker task per key. Every event for a key goes
//! through that worker's mailbox, so a key's state has a single writer and its
//! events are handled strictly in arrival order. Different keys run concurrently.
//!
//! The hub records when each key last finished an event. A key with nothing in
//! flight that stays quiet for `idle_timeout` is sent an expiry marker through
//! the same mailbox; the
//! worker runs [`SessionEntity::on_idle`], drops its state and exits. The next
//! event for that key opens a fresh session.
//!
//! ```rust
//! use actor_framework::{SessionEntity, SessionHub};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! struct Tally { count: u32 }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("tally error")]
//! struct TallyError;
//!
//! #[async_trait]
//! impl SessionEntity for Tally {
//!     type Key = u64;
//!     type Event = ();
//!     type Output = u32;
//!     type Context = ();
//!     type Error = TallyError;
//!
//!     fn open(_key: u64) -> Self { Self { count: 0 } }
//!
//!     async fn handle_event(&mut self, _: (), _: &()) -> Result<u32, TallyError> {
//!         self.count += 1;
//!         Ok(self.count)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (hub, client) = SessionHub::<Tally>::new(16, Duration::from_secs(600));
//!     tokio::spawn(hub.run(()));
//!
//!     assert_eq!(client.dispatch(1, ()).await.unwrap(), 1);
//!     assert_eq!(client.dispatch(1, ()).await.unwrap(), 2);
//!     assert_eq!(client.dispatch(2, ()).await.unwrap(), 1);
//! }
//! ```

use crate::error::FrameworkError;
use crate::message::Response;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// State owned by one key of a [`SessionHub`].
#[async_trait]
pub trait SessionEntity: Send + 'static {
    /// Routing key; one worker exists per live key.
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Inbound event for a session.
    type Event: Send + Debug + 'static;

    /// Result handed back to the dispatcher.
    type Output: Send + 'static;

    /// Shared dependencies, handed to every worker.
    type Context: Send + Sync + 'static;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Fresh state for a key that has no live worker.
    fn open(key: Self::Key) -> Self;

    /// Handle one event. Never runs concurrently with another event of the same key.
    async fn handle_event(
        &mut self,
        event: Self::Event,
        ctx: &Self::Context,
    ) -> Result<Self::Output, Self::Error>;

    /// Called once when the key has been idle for the hub's timeout, right before
    /// the state is dropped.
    async fn on_idle(&mut self, _ctx: &Self::Context) {}
}

enum SessionCommand<T: SessionEntity> {
    Event {
        event: T::Event,
        respond_to: Response<T::Output>,
    },
    Expire,
}

/// Request sent to a [`SessionHub`].
pub enum HubRequest<T: SessionEntity> {
    Dispatch {
        key: T::Key,
        event: T::Event,
        respond_to: Response<T::Output>,
    },
    ActiveSessions {
        respond_to: Response<usize>,
    },
}

struct SessionSlot<T: SessionEntity> {
    mailbox: mpsc::UnboundedSender<SessionCommand<T>>,
    last_seen: Instant,
    /// Events routed but not yet answered.
    in_flight: usize,
    handle: JoinHandle<()>,
}

/// Routes events to per-key session workers.
pub struct SessionHub<T: SessionEntity> {
    receiver: mpsc::Receiver<HubRequest<T>>,
    sessions: HashMap<T::Key, SessionSlot<T>>,
    idle_timeout: Duration,
    finished_tx: mpsc::UnboundedSender<T::Key>,
    finished_rx: mpsc::UnboundedReceiver<T::Key>,
}

impl<T: SessionEntity> SessionHub<T> {
    /// Creates the hub and its client. `buffer_size` bounds the hub's request queue.
    pub fn new(buffer_size: usize, idle_timeout: Duration) -> (Self, SessionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let hub = Self {
            receiver,
            sessions: HashMap::new(),
            idle_timeout,
            finished_tx,
            finished_rx,
        };
        (hub, SessionClient { sender })
    }

    /// Runs the hub until every client is dropped, then waits for live workers.
    pub async fn run(mut self, context: T::Context) {
        let session_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let context = Arc::new(context);
        let period = (self.idle_timeout / 4).clamp(Duration::from_millis(5), Duration::from_secs(30));
        let mut sweep = tokio::time::interval(period);
        info!(session_type, idle_timeout = ?self.idle_timeout, "Hub started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        HubRequest::Dispatch { key, event, respond_to } => {
                            debug!(session_type, %key, ?event, "Dispatch");
                            self.route(key, SessionCommand::Event { event, respond_to }, &context);
                        }
                        HubRequest::ActiveSessions { respond_to } => {
                            let _ = respond_to.send(Ok(self.sessions.len()));
                        }
                    }
                }
                Some(key) = self.finished_rx.recv() => self.finish(&key),
                _ = sweep.tick() => self.expire_idle(session_type),
            }
        }

        info!(session_type, active = self.sessions.len(), "Hub shutting down");
        for (key, slot) in self.sessions.drain() {
            drop(slot.mailbox);
            if let Err(e) = slot.handle.await {
                warn!(session_type, %key, error = %e, "Session task failed");
            }
        }
        info!(session_type, "Shutdown");
    }

    fn route(&mut self, key: T::Key, command: SessionCommand<T>, context: &Arc<T::Context>) {
        if let Some(slot) = self.sessions.get_mut(&key) {
            slot.last_seen = Instant::now();
            slot.in_flight += 1;
            match slot.mailbox.send(command) {
                Ok(()) => return,
                Err(mpsc::error::SendError(command)) => {
                    // the worker is gone (it panicked); start over for this key
                    warn!(%key, "Session worker lost, reopening");
                    let slot = self.spawn_session(key.clone(), context);
                    let _ = slot.mailbox.send(command);
                    self.sessions.insert(key, slot);
                    return;
                }
            }
        }
        let slot = self.spawn_session(key.clone(), context);
        let _ = slot.mailbox.send(command);
        self.sessions.insert(key, slot);
    }

    fn spawn_session(&self, key: T::Key, context: &Arc<T::Context>) -> SessionSlot<T> {
        let (mailbox, inbox) = mpsc::unbounded_channel();
        debug!(%key, active = self.sessions.len() + 1, "Session opened");
        let handle = tokio::spawn(drive::<T>(
            key,
            inbox,
            Arc::clone(context),
            self.finished_tx.clone(),
        ));
        SessionSlot {
            mailbox,
            last_seen: Instant::now(),
            in_flight: 1,
            handle,
        }
    }

    /// Idle time counts from the end of a key's last event.
    fn finish(&mut self, key: &T::Key) {
        if let Some(slot) = self.sessions.get_mut(key) {
            slot.in_flight = slot.in_flight.saturating_sub(1);
            slot.last_seen = Instant::now();
        }
    }

    fn expire_idle(&mut self, session_type: &str) {
        let now = Instant::now();
        let expired: Vec<T::Key> = self
            .sessions
            .iter()
            .filter(|(_, slot)| {
                slot.in_flight == 0 && now.duration_since(slot.last_seen) >= self.idle_timeout
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            if let Some(slot) = self.sessions.remove(&key) {
                let _ = slot.mailbox.send(SessionCommand::Expire);
                info!(session_type, %key, active = self.sessions.len(), "Session expired");
            }
        }
    }
}

async fn drive<T: SessionEntity>(
    key: T::Key,
    mut inbox: mpsc::UnboundedReceiver<SessionCommand<T>>,
    context: Arc<T::Context>,
    finished: mpsc::UnboundedSender<T::Key>,
) {
    let mut session = T::open(key.clone());
    while let Some(command) = inbox.recv().await {
        match command {
            SessionCommand::Event { event, respond_to } => {
                let result = session
                    .handle_event(event, &context)
                    .await
                    .map_err(|e| {
                        warn!(%key, error = %e, "Event failed");
                        FrameworkError::EntityError(Box::new(e))
                    });
                let _ = finished.send(key.clone());
                let _ = respond_to.send(result);
            }
            SessionCommand::Expire => {
                session.on_idle(&context).await;
                break;
            }
        }
    }
    debug!(%key, "Session closed");
}

/// Sending half of a [`SessionHub`]. Cheap to clone.
pub struct SessionClient<T: SessionEntity> {
    sender: mpsc::Sender<HubRequest<T>>,
}

impl<T: SessionEntity> Clone for SessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: SessionEntity> SessionClient<T> {
    /// Deliver `event` to the session for `key` and wait for its output.
    pub async fn dispatch(&self, key: T::Key, event: T::Event) -> Result<T::Output, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HubRequest::Dispatch {
                key,
                event,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Number of keys that currently own a worker.
    pub async fn active_sessions(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(HubRequest::ActiveSessions { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<(u32, u32)>>,
        idled: Mutex<Vec<u32>>,
    }

    struct Counter {
        key: u32,
        seen: u32,
    }

    #[derive(Debug)]
    enum Step {
        Bump(u32),
        Slow(u64),
        Fail,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("counter refused")]
    struct CounterError;

    #[async_trait]
    impl SessionEntity for Counter {
        type Key = u32;
        type Event = Step;
        type Output = u32;
        type Context = Arc<Journal>;
        type Error = CounterError;

        fn open(key: u32) -> Self {
            Self { key, seen: 0 }
        }

        async fn handle_event(&mut self, event: Step, ctx: &Arc<Journal>) -> Result<u32, CounterError> {
            match event {
                Step::Bump(tag) => {
                    self.seen += 1;
                    ctx.entries.lock().unwrap().push((self.key, tag));
                }
                Step::Slow(ms) => {
                    let before = self.seen;
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    self.seen = before + 1;
                }
                Step::Fail => return Err(CounterError),
            }
            Ok(self.seen)
        }

        async fn on_idle(&mut self, ctx: &Arc<Journal>) {
            ctx.idled.lock().unwrap().push(self.key);
        }
    }

    fn start(idle: Duration) -> (SessionClient<Counter>, JoinHandle<()>, Arc<Journal>) {
        let (hub, client) = SessionHub::<Counter>::new(32, idle);
        let journal = Arc::new(Journal::default());
        let handle = tokio::spawn(hub.run(Arc::clone(&journal)));
        (client, handle, journal)
    }

    #[tokio::test]
    async fn events_for_one_key_are_serialized() {
        let (client, handle, _) = start(Duration::from_secs(60));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move { client.dispatch(7, Step::Slow(5)).await.unwrap() }));
        }
        let mut outputs = Vec::new();
        for task in tasks {
            outputs.push(task.await.unwrap());
        }
        outputs.sort_unstable();
        // a lost update would repeat a value
        assert_eq!(outputs, (1..=8).collect::<Vec<_>>());

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn keys_keep_independent_state() {
        let (client, handle, journal) = start(Duration::from_secs(60));

        assert_eq!(client.dispatch(1, Step::Bump(0)).await.unwrap(), 1);
        assert_eq!(client.dispatch(1, Step::Bump(1)).await.unwrap(), 2);
        assert_eq!(client.dispatch(2, Step::Bump(0)).await.unwrap(), 1);
        assert_eq!(client.active_sessions().await.unwrap(), 2);
        assert_eq!(journal.entries.lock().unwrap().len(), 3);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn failed_event_keeps_session_alive() {
        let (client, handle, _) = start(Duration::from_secs(60));

        client.dispatch(3, Step::Bump(0)).await.unwrap();
        let err = client.dispatch(3, Step::Fail).await.unwrap_err();
        assert!(matches!(err, FrameworkError::EntityError(_)));
        assert_eq!(client.dispatch(3, Step::Bump(1)).await.unwrap(), 2);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn idle_session_is_discarded() {
        let (client, handle, journal) = start(Duration::from_millis(40));

        assert_eq!(client.dispatch(9, Step::Bump(0)).await.unwrap(), 1);
        assert_eq!(client.dispatch(9, Step::Bump(1)).await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(client.active_sessions().await.unwrap(), 0);
        assert_eq!(*journal.idled.lock().unwrap(), vec![9]);

        // fresh state after expiry
        assert_eq!(client.dispatch(9, Step::Bump(2)).await.unwrap(), 1);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn long_event_does_not_count_as_idle() {
        let (client, handle, journal) = start(Duration::from_millis(40));

        assert_eq!(client.dispatch(5, Step::Bump(0)).await.unwrap(), 1);
        // runs well past the idle timeout
        assert_eq!(client.dispatch(5, Step::Slow(150)).await.unwrap(), 2);
        assert_eq!(client.dispatch(5, Step::Bump(1)).await.unwrap(), 3);
        assert!(journal.idled.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*journal.idled.lock().unwrap(), vec![5]);

        drop(client);
        handle.await.unwrap();
    }
}
