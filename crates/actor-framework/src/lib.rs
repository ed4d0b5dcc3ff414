//! # Actor Framework
//!
//! Building blocks for type-safe, message-passing state owners on top of tokio.
//!
//! Two kinds of owner are provided:
//!
//! 1. **Resource actors** ([`ResourceActor`] / [`ResourceClient`]): one task owns a
//!    whole collection of entities and serves CRUD, `List`, `Upsert` and custom
//!    `Action` requests against it, one at a time. Business rules live in the
//!    [`ActorEntity`] hooks.
//! 2. **Session hubs** ([`SessionHub`] / [`SessionClient`]): one task per key, each
//!    owning a single piece of conversational state. Events for a key are handled
//!    in arrival order by exactly one writer; keys are independent of each other;
//!    idle keys are expired and their state discarded.
//!
//! ## Context Injection
//!
//! Dependencies are passed to `run(context)`, not to `new()`. Owners can therefore
//! be created first and wired afterwards, which keeps construction free of cycles:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = ResourceActor::<CustomerProfile>::new(32);
//! let (hub, sessions) = SessionHub::<ConversationSession>::new(64, idle_timeout);
//!
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(hub.run(services)); // services hold user_client and friends
//! ```
//!
//! ## Concurrency Model
//!
//! - Each resource actor and each live session runs in its own tokio task.
//! - Messages are processed sequentially within a task, so no locks guard the state.
//! - Replies travel back over oneshot channels; a dropped owner surfaces as
//!   [`FrameworkError::ActorClosed`] or [`FrameworkError::ActorDropped`].
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient<T>` from scripted
//! expectations, for testing code that sits around a client without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod session;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use session::{HubRequest, SessionClient, SessionEntity, SessionHub};
