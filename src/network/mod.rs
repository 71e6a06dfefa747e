//! Real-time event listener
//!
//! Provides a STOMP-over-WebSocket client for a node's push endpoint.
//!
//! # Features
//! - STOMP frame encoding and a NUL-delimited frame codec
//! - Longest-prefix routing of pushed messages to channels
//! - One handler per channel, replaceable and removable
//! - Account snapshot requests on subscribe

pub mod channel;
pub mod listener;
pub mod message;
pub mod router;

pub use channel::Channel;
pub use listener::{
    Listener, ListenerConfig, ListenerError, Subscription, DEFAULT_PATH, DEFAULT_PORT,
};
pub use message::{StompCodec, StompFrame};
pub use router::{Handler, Registration, Router};
