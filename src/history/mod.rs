//! Session history packet decoding.
//!
//! This module provides the layout definitions and decoders for the session
//! history telemetry packet: common header, per-car metadata, the
//! fixed-capacity lap history array and the fixed-capacity tyre stint array.

pub mod decoder;
pub mod entries;
pub mod format;

pub use decoder::{DecodedArray, SessionHistoryPacket, TruncatedAt, decode_lap_history, decode_tyre_stints};
pub use entries::{ByteSpan, LapHistoryEntry, LapValidity, TyreStintEntry};
pub use format::{PacketHeader, SessionHistoryMeta};
