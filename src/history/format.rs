//! Session history packet layout and fixed-region decoding.
//!
//! Defines the binary structures at the front of a session history packet
//! and the layout constants shared by every decoder in this crate.
//!
//! ## Packet Structure
//!
//! Session history packets are packed little-endian with 1-byte alignment:
//!
//! 1. **Packet Header** (29 bytes) - identity, version and timing fields
//! 2. **Session History Metadata** (7 bytes) - per-car counts and best-lap numbers
//! 3. **Lap History Array** (100 x 14 bytes, fixed capacity) - per-lap timing
//! 4. **Tyre Stint Array** (8 x 3 bytes, fixed capacity) - stint compounds
//!
//! The lap array always occupies its full reserved capacity on the wire.
//! The tyre stint array therefore begins at a fixed offset (1436) that does
//! not depend on the reported lap count; every offset constant below is
//! derived from that single layout fact.

use crate::Result;
use crate::cursor::ByteCursor;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Size of the packet header in bytes.
pub const PACKET_HEADER_SIZE: usize = 29;
/// Size of the per-car session history metadata in bytes.
pub const SESSION_META_SIZE: usize = 7;
/// Size of one lap history entry in bytes.
pub const LAP_HISTORY_ENTRY_SIZE: usize = 14;
/// Size of one tyre stint entry in bytes.
pub const TYRE_STINT_ENTRY_SIZE: usize = 3;
/// Reserved capacity of the lap history array, independent of the lap count.
pub const LAP_HISTORY_CAPACITY: usize = 100;
/// Reserved capacity of the tyre stint array.
pub const TYRE_STINT_CAPACITY: usize = 8;

/// Byte offset of the lap history array (header + metadata).
pub const LAP_HISTORY_BASE: usize = PACKET_HEADER_SIZE + SESSION_META_SIZE;
/// Byte offset of the tyre stint array.
///
/// The lap array reserves its full capacity on the wire, so this is fixed at
/// `36 + 100 * 14 = 1436` regardless of how many laps the packet reports.
pub const TYRE_STINT_BASE: usize = LAP_HISTORY_BASE + LAP_HISTORY_CAPACITY * LAP_HISTORY_ENTRY_SIZE;

/// Smallest buffer that can decode without a fatal error (header + metadata).
pub const MIN_PACKET_SIZE: usize = LAP_HISTORY_BASE;
/// Size of a complete packet with both arrays at full capacity.
pub const FULL_PACKET_SIZE: usize = TYRE_STINT_BASE + TYRE_STINT_CAPACITY * TYRE_STINT_ENTRY_SIZE;

/// Packet id carried in [`PacketHeader::packet_id`] for session history packets.
pub const SESSION_HISTORY_PACKET_ID: u8 = 11;

/// Common packet header shared by all telemetry packet types.
///
/// Matches the upstream packed struct:
/// ```text
/// uint16_t m_packetFormat;            // offset 0
/// uint8_t  m_gameYear;                // offset 2
/// uint8_t  m_gameMajorVersion;        // offset 3
/// uint8_t  m_gameMinorVersion;        // offset 4
/// uint8_t  m_packetVersion;           // offset 5
/// uint8_t  m_packetId;                // offset 6
/// uint64_t m_sessionUID;              // offset 7
/// float    m_sessionTime;             // offset 15
/// uint32_t m_frameIdentifier;         // offset 19
/// uint32_t m_overallFrameIdentifier;  // offset 23
/// uint8_t  m_playerCarIndex;          // offset 27
/// uint8_t  m_secondaryPlayerCarIndex; // offset 28
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    pub session_time: f32,
    pub frame_identifier: u32,
    pub overall_frame_identifier: u32,
    pub player_car_index: u8,
    /// 255 when there is no second (splitscreen) player.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Size of the packet header structure in bytes.
    pub const SIZE: usize = PACKET_HEADER_SIZE;

    /// Decode the header from the cursor position.
    ///
    /// On success the cursor sits immediately after the header. A buffer too
    /// short for any field fails with [`crate::DecodeError::OutOfBounds`]
    /// and produces no partial header.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        trace!("Decoding packet header ({} bytes)", PACKET_HEADER_SIZE);

        let packet_format = cursor.read_u16()?;
        let game_year = cursor.read_u8()?;
        let game_major_version = cursor.read_u8()?;
        let game_minor_version = cursor.read_u8()?;
        let packet_version = cursor.read_u8()?;
        let packet_id = cursor.read_u8()?;
        let session_uid = cursor.read_u64()?;
        let session_time = cursor.read_f32()?;
        let frame_identifier = cursor.read_u32()?;
        let overall_frame_identifier = cursor.read_u32()?;
        let player_car_index = cursor.read_u8()?;
        let secondary_player_car_index = cursor.read_u8()?;

        debug!(
            "Decoded packet header: format={}, packet_id={}, session_uid={}, frame={}",
            packet_format, packet_id, session_uid, frame_identifier
        );

        Ok(Self {
            packet_format,
            game_year,
            game_major_version,
            game_minor_version,
            packet_version,
            packet_id,
            session_uid,
            session_time,
            frame_identifier,
            overall_frame_identifier,
            player_car_index,
            secondary_player_car_index,
        })
    }

    /// Whether this header carries the session history packet id.
    ///
    /// Decoding never rejects on packet id; this helper is for callers that
    /// demultiplex a stream of packet types before decoding.
    pub fn is_session_history(&self) -> bool {
        self.packet_id == SESSION_HISTORY_PACKET_ID
    }
}

/// Per-car session history metadata, immediately after the header.
///
/// `num_laps` and `num_tyre_stints` are untrusted counts reported by the
/// sender. They bound how many array slots hold meaningful data but never
/// affect array layout offsets; use the clamped accessors before iterating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHistoryMeta {
    /// Index of the car this history relates to.
    pub car_idx: u8,
    /// Number of laps in the data, including the current partial lap.
    pub num_laps: u8,
    /// Number of tyre stints in the data.
    pub num_tyre_stints: u8,
    /// Lap the best lap time was achieved on.
    pub best_lap_num: u8,
    /// Lap the best sector 1 time was achieved on.
    pub best_sector1_lap_num: u8,
    /// Lap the best sector 2 time was achieved on.
    pub best_sector2_lap_num: u8,
    /// Lap the best sector 3 time was achieved on.
    pub best_sector3_lap_num: u8,
}

impl SessionHistoryMeta {
    /// Size of the metadata structure in bytes.
    pub const SIZE: usize = SESSION_META_SIZE;

    /// Decode the metadata from the cursor position.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let car_idx = cursor.read_u8()?;
        let num_laps = cursor.read_u8()?;
        let num_tyre_stints = cursor.read_u8()?;
        let best_lap_num = cursor.read_u8()?;
        let best_sector1_lap_num = cursor.read_u8()?;
        let best_sector2_lap_num = cursor.read_u8()?;
        let best_sector3_lap_num = cursor.read_u8()?;

        debug!(
            "Decoded session history meta: car={}, laps={}, stints={}",
            car_idx, num_laps, num_tyre_stints
        );

        Ok(Self {
            car_idx,
            num_laps,
            num_tyre_stints,
            best_lap_num,
            best_sector1_lap_num,
            best_sector2_lap_num,
            best_sector3_lap_num,
        })
    }

    /// Reported lap count clamped to the array capacity.
    ///
    /// A count above capacity is a malformed or forward-compatible packet;
    /// the data that is present should still decode, so the excess is
    /// dropped silently rather than treated as an error.
    pub fn clamped_lap_count(&self) -> usize {
        let count = usize::from(self.num_laps);
        if count > LAP_HISTORY_CAPACITY {
            debug!(
                "Clamping reported lap count {} to capacity {}",
                count, LAP_HISTORY_CAPACITY
            );
            LAP_HISTORY_CAPACITY
        } else {
            count
        }
    }

    /// Reported tyre stint count clamped to the array capacity.
    pub fn clamped_stint_count(&self) -> usize {
        let count = usize::from(self.num_tyre_stints);
        if count > TYRE_STINT_CAPACITY {
            debug!(
                "Clamping reported stint count {} to capacity {}",
                count, TYRE_STINT_CAPACITY
            );
            TYRE_STINT_CAPACITY
        } else {
            count
        }
    }
}
