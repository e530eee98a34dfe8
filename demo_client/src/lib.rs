//! `demo_client`
//!
//! Client-side state synchronization:
//! - Inbound frame queueing between the transport and the tick loop
//! - Message dispatch to the player registry
//! - Remote player lifecycle tracking with presentation callbacks
//! - Outbound announcements for the local player
//!
//! Design goals:
//! - Game state mutates only at tick boundaries.
//! - Transport and presentation stay behind trait seams.
//! - No `unsafe`.

pub mod client;
pub mod dispatch;
pub mod outbound;
pub mod presentation;
pub mod queue;
pub mod registry;
pub mod transport;

pub use client::ClientSession;
