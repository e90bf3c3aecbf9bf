//! Array decoding and the whole-packet entry point.
//!
//! Arrays in the session history packet follow a partial-success contract:
//! the packet reserves full capacity for both arrays, but a capture may end
//! mid-region. An entry that falls off the end of the buffer stops iteration
//! and is reported as a truncation marker alongside the entries that did
//! decode, instead of discarding the valid prefix.
//!
//! Header and metadata truncation is different: without them nothing in the
//! packet can be trusted, so those failures abort the whole decode.

use super::entries::{ByteSpan, LapHistoryEntry, LapValidity, TyreStintEntry};
use super::format::{
    LAP_HISTORY_BASE, LAP_HISTORY_CAPACITY, LAP_HISTORY_ENTRY_SIZE, PacketHeader,
    SessionHistoryMeta, TYRE_STINT_BASE, TYRE_STINT_CAPACITY, TYRE_STINT_ENTRY_SIZE,
};
use crate::Result;
use crate::cursor::ByteCursor;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Marker for the first array entry that did not fit in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncatedAt {
    /// Index of the entry that failed to decode.
    pub index: usize,
    /// Byte range the entry would have occupied.
    pub span: ByteSpan,
}

/// Outcome of decoding a fixed-capacity array region.
///
/// Holds every entry that decoded in packet order, plus a truncation marker
/// when the buffer ended before the requested count was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedArray<T> {
    pub entries: Vec<T>,
    pub truncated: Option<TruncatedAt>,
}

impl<T> DecodedArray<T> {
    /// Whether every requested entry decoded.
    pub fn is_complete(&self) -> bool {
        self.truncated.is_none()
    }

    /// Number of entries that decoded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries decoded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode up to `requested` lap history entries from the fixed lap region.
///
/// The count is clamped to [`LAP_HISTORY_CAPACITY`]. Entry `i` lives at
/// `36 + i * 14`; the whole 14-byte record is bounds-checked before any
/// field is read, so a truncated buffer yields the decoded prefix plus a
/// marker rather than an error.
pub fn decode_lap_history(buffer: &[u8], requested: usize) -> DecodedArray<LapHistoryEntry> {
    let count = requested.min(LAP_HISTORY_CAPACITY);
    trace!("Decoding {} lap history entries from base {}", count, LAP_HISTORY_BASE);

    let mut entries = Vec::with_capacity(count);
    let mut truncated = None;

    for i in 0..count {
        let span = ByteSpan::new(LAP_HISTORY_BASE + i * LAP_HISTORY_ENTRY_SIZE, LAP_HISTORY_ENTRY_SIZE);
        // Whole-record check: either all 14 bytes are present or the entry
        // is reported as the truncation point.
        if span.end > buffer.len() {
            warn!(
                "Lap history truncated at entry {}: need bytes {}..{}, buffer holds {}",
                i,
                span.start,
                span.end,
                buffer.len()
            );
            truncated = Some(TruncatedAt { index: i, span });
            break;
        }

        let mut cursor = ByteCursor::at(buffer, span.start);
        match decode_lap_entry(&mut cursor, span) {
            Ok(entry) => entries.push(entry),
            // Unreachable after the whole-record check; kept as a second
            // truncation path so field reads can never panic or over-read.
            Err(_) => {
                truncated = Some(TruncatedAt { index: i, span });
                break;
            }
        }
    }

    DecodedArray { entries, truncated }
}

fn decode_lap_entry(cursor: &mut ByteCursor<'_>, span: ByteSpan) -> Result<LapHistoryEntry> {
    Ok(LapHistoryEntry {
        lap_time_ms: cursor.read_u32()?,
        sector1_time_ms: cursor.read_u16()?,
        sector1_minutes: cursor.read_u8()?,
        sector2_time_ms: cursor.read_u16()?,
        sector2_minutes: cursor.read_u8()?,
        sector3_time_ms: cursor.read_u16()?,
        sector3_minutes: cursor.read_u8()?,
        validity: LapValidity::new(cursor.read_u8()?),
        span,
    })
}

/// Decode up to `requested` tyre stint entries from the fixed stint region.
///
/// The base offset is [`TYRE_STINT_BASE`] (1436): the lap array reserves its
/// full capacity on the wire, so the stint region never moves with the
/// reported lap count. Same truncation contract as [`decode_lap_history`].
pub fn decode_tyre_stints(buffer: &[u8], requested: usize) -> DecodedArray<TyreStintEntry> {
    let count = requested.min(TYRE_STINT_CAPACITY);
    trace!("Decoding {} tyre stint entries from base {}", count, TYRE_STINT_BASE);

    let mut entries = Vec::with_capacity(count);
    let mut truncated = None;

    for i in 0..count {
        let span = ByteSpan::new(TYRE_STINT_BASE + i * TYRE_STINT_ENTRY_SIZE, TYRE_STINT_ENTRY_SIZE);
        if span.end > buffer.len() {
            warn!(
                "Tyre stints truncated at entry {}: need bytes {}..{}, buffer holds {}",
                i,
                span.start,
                span.end,
                buffer.len()
            );
            truncated = Some(TruncatedAt { index: i, span });
            break;
        }

        let mut cursor = ByteCursor::at(buffer, span.start);
        match decode_stint_entry(&mut cursor, span) {
            Ok(entry) => entries.push(entry),
            Err(_) => {
                truncated = Some(TruncatedAt { index: i, span });
                break;
            }
        }
    }

    DecodedArray { entries, truncated }
}

fn decode_stint_entry(cursor: &mut ByteCursor<'_>, span: ByteSpan) -> Result<TyreStintEntry> {
    Ok(TyreStintEntry {
        end_lap: cursor.read_u8()?,
        actual_tyre_compound: cursor.read_u8()?,
        visual_tyre_compound: cursor.read_u8()?,
        span,
    })
}

/// A fully decoded session history packet.
///
/// Constructed only by [`SessionHistoryPacket::decode`]; immutable once
/// built and independent of the source buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistoryPacket {
    pub header: PacketHeader,
    pub meta: SessionHistoryMeta,
    pub laps: DecodedArray<LapHistoryEntry>,
    pub tyre_stints: DecodedArray<TyreStintEntry>,
}

impl SessionHistoryPacket {
    /// Decode a whole session history packet from one buffer.
    ///
    /// Header and metadata failures are fatal and propagate; array
    /// truncation is captured in the returned [`DecodedArray`]s.
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(buffer);

        let header = PacketHeader::decode(&mut cursor)?;
        let meta = SessionHistoryMeta::decode(&mut cursor)?;

        let laps = decode_lap_history(buffer, meta.clamped_lap_count());
        let tyre_stints = decode_tyre_stints(buffer, meta.clamped_stint_count());

        debug!(
            "Decoded session history for car {}: {}/{} laps, {}/{} stints",
            meta.car_idx,
            laps.len(),
            meta.clamped_lap_count(),
            tyre_stints.len(),
            meta.clamped_stint_count()
        );

        Ok(Self { header, meta, laps, tyre_stints })
    }
}
