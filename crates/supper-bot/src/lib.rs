//! # Supper Bot
//!
//! Chat-driven ordering for a small supper delivery business, built on the
//! workspace's actor framework.
//!
//! - [`conversation`]: the per-customer ordering state machine, run as keyed
//!   sessions so one customer's events never interleave.
//! - [`model`]: carts, menus, delivery sessions, pickup stores, order records.
//! - [`user_actor`], [`delivery_actor`], [`pickup_actor`], [`order_actor`]:
//!   local resource actors backing the [`repository`] seams.
//! - [`clients`]: typed wrappers over those actors.
//! - [`menu`], [`branding`], [`receipts`], [`notify`], [`transport`]:
//!   collaborators the conversation and staff tools talk to.
//! - [`lifecycle`]: [`BotSystem`](lifecycle::BotSystem), which wires it all up.

pub mod branding;
pub mod clients;
pub mod config;
pub mod conversation;
pub mod delivery_actor;
pub mod lifecycle;
pub mod menu;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod pickup_actor;
pub mod receipts;
pub mod repository;
pub mod transport;
pub mod user_actor;
