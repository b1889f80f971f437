//! Remote rendering.
//!
//! The remote backend mirrors a component tree to a peer process over a
//! WebSocket and routes the peer's UI events back to callbacks.
//!
//! # Outbound
//!
//! Mounting a component enqueues a `create` record, then the kind's
//! follow-up `action` if it has one, then the same for each child,
//! depth-first. `set_attribute` on a mounted component enqueues an `update`
//! with just the changed key. Records go onto an unbounded queue that a
//! single writer task drains in order, so application calls never wait on the
//! socket.
//!
//! # Inbound
//!
//! `on:<event>` attributes are registered under `"{id}:<event>"` before the
//! component's create record is enqueued, so the handler exists before the
//! peer can know the id. The reader task decodes each event and runs the
//! handler with the matching key. Malformed frames are logged and skipped;
//! events without a handler are ignored.
//!
//! # Constraints
//!
//! One peer at a time; see [`connection`] for the lifecycle. Records enqueued
//! from different threads are not ordered relative to each other.

pub mod connection;
mod handlers;
mod kind;
pub mod protocol;
mod renderer;

pub use connection::{ConnectionState, RemoteListener};
pub use handlers::HandlerTable;
pub use kind::RemoteKind;
pub use protocol::{correlation_key, InboundEvent, Method, OutboundMessage};
pub use renderer::{RemoteBackend, RemoteHandle, RemoteRenderer};
