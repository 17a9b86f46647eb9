//! Transport layer for communicating with Droid daemons
//!
//! This module provides the channel pair used between the controller and a
//! session's detached daemon. See [`fifo`] for the endpoints and their
//! blocking semantics.

pub mod fifo;

pub use fifo::FifoTransport;
