//! Bounds-safe decoder for racing-sim session history telemetry packets.
//!
//! Lapbook decodes the packed little-endian "session history" packet — the
//! per-car record of lap times, sector times and tyre stints — into
//! structured, read-only data. Every field read is individually
//! bounds-checked, and array regions that end mid-entry decode to a valid
//! prefix plus an explicit truncation marker instead of failing outright.
//!
//! # Features
//!
//! - **Byte-accurate layout**: offsets derive from shared constants, so the
//!   capacity-reserved lap region and the fixed tyre stint base (1436)
//!   cannot drift apart
//! - **Partial success**: truncated captures keep their decoded prefix
//! - **Pure decoding**: no I/O, no state across calls, safe to run from any
//!   number of threads
//!
//! # Quick Start
//!
//! ```rust
//! use lapbook::SessionHistoryPacket;
//!
//! fn inspect(buffer: &[u8]) -> lapbook::Result<()> {
//!     let packet = SessionHistoryPacket::decode(buffer)?;
//!     for lap in &packet.laps.entries {
//!         println!(
//!             "{:.3}s (valid: {})",
//!             lap.lap_time_seconds(),
//!             lap.validity.lap_valid()
//!         );
//!     }
//!     if let Some(cut) = packet.laps.truncated {
//!         println!("capture ended at lap entry {}", cut.index);
//!     }
//!     Ok(())
//! }
//! ```

mod cursor;
mod error;
pub mod history;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

// Core exports
pub use cursor::ByteCursor;
pub use error::{DecodeError, Result};

// Decoded packet exports
pub use history::{
    ByteSpan, DecodedArray, LapHistoryEntry, LapValidity, PacketHeader, SessionHistoryMeta,
    SessionHistoryPacket, TruncatedAt, TyreStintEntry, decode_lap_history, decode_tyre_stints,
};

// Layout constants
pub use history::format::{
    FULL_PACKET_SIZE, LAP_HISTORY_BASE, LAP_HISTORY_CAPACITY, LAP_HISTORY_ENTRY_SIZE,
    MIN_PACKET_SIZE, PACKET_HEADER_SIZE, SESSION_HISTORY_PACKET_ID, SESSION_META_SIZE,
    TYRE_STINT_BASE, TYRE_STINT_CAPACITY, TYRE_STINT_ENTRY_SIZE,
};
