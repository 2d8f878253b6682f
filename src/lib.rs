//! CD+G subchannel graphics encoder.
//!
//! Builds the fixed-rate packet stream of the disc-graphics format:
//! tile draws, palette loads, scrolls, fades and text on a 300×216,
//! 16-color screen, 24 bytes per packet, one packet per 1/150 s slot.
//! The encoder is pure and in-memory — a [`Session`] accumulates
//! packets in emission order and hands back the byte stream; file
//! output and audio synchronization belong to the caller.

pub mod codec;
pub mod config;
pub mod domain;
pub mod error;
pub mod session;
#[cfg(feature = "preview")]
pub mod ui;

pub use error::CdgError;
pub use session::Session;
