//! Test utilities for building synthetic session history packets.
//!
//! Packets are small enough to construct in memory, so tests and benchmarks
//! share this builder instead of binary fixtures. The builder always emits a
//! full-capacity buffer; tests that exercise truncation slice it down.

#![cfg(any(test, feature = "benchmark"))]

use crate::history::format::{
    FULL_PACKET_SIZE, LAP_HISTORY_BASE, LAP_HISTORY_CAPACITY, LAP_HISTORY_ENTRY_SIZE,
    PACKET_HEADER_SIZE, SESSION_HISTORY_PACKET_ID, TYRE_STINT_BASE, TYRE_STINT_CAPACITY,
    TYRE_STINT_ENTRY_SIZE,
};

/// Header constants every synthetic packet carries.
pub const TEST_PACKET_FORMAT: u16 = 2023;
pub const TEST_SESSION_UID: u64 = 0xDEAD_BEEF_CAFE_F00D;
pub const TEST_SESSION_TIME: f32 = 123.5;
pub const TEST_FRAME_IDENTIFIER: u32 = 4800;

/// Builder for a full-capacity synthetic session history packet.
#[derive(Debug, Clone)]
pub struct SyntheticPacket {
    car_idx: u8,
    num_laps: u8,
    num_tyre_stints: u8,
    laps: Vec<(usize, [u8; LAP_HISTORY_ENTRY_SIZE])>,
    stints: Vec<(usize, [u8; TYRE_STINT_ENTRY_SIZE])>,
}

impl SyntheticPacket {
    pub fn new() -> Self {
        Self { car_idx: 0, num_laps: 0, num_tyre_stints: 0, laps: Vec::new(), stints: Vec::new() }
    }

    pub fn car_idx(mut self, car_idx: u8) -> Self {
        self.car_idx = car_idx;
        self
    }

    /// Reported lap count, written verbatim (may exceed capacity).
    pub fn num_laps(mut self, num_laps: u8) -> Self {
        self.num_laps = num_laps;
        self
    }

    /// Reported stint count, written verbatim (may exceed capacity).
    pub fn num_tyre_stints(mut self, num_tyre_stints: u8) -> Self {
        self.num_tyre_stints = num_tyre_stints;
        self
    }

    /// Place raw lap entry bytes into slot `index` of the lap region.
    pub fn lap(mut self, index: usize, bytes: [u8; LAP_HISTORY_ENTRY_SIZE]) -> Self {
        assert!(index < LAP_HISTORY_CAPACITY, "lap slot {index} exceeds capacity");
        self.laps.push((index, bytes));
        self
    }

    /// Place raw stint entry bytes into slot `index` of the stint region.
    pub fn stint(mut self, index: usize, bytes: [u8; TYRE_STINT_ENTRY_SIZE]) -> Self {
        assert!(index < TYRE_STINT_CAPACITY, "stint slot {index} exceeds capacity");
        self.stints.push((index, bytes));
        self
    }

    /// Emit the full 1460-byte packet. Unwritten slots stay zeroed.
    pub fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8; FULL_PACKET_SIZE];

        // Packet header
        buf[0..2].copy_from_slice(&TEST_PACKET_FORMAT.to_le_bytes());
        buf[2] = 23; // game year
        buf[3] = 1; // game major version
        buf[4] = 18; // game minor version
        buf[5] = 1; // packet version
        buf[6] = SESSION_HISTORY_PACKET_ID;
        buf[7..15].copy_from_slice(&TEST_SESSION_UID.to_le_bytes());
        buf[15..19].copy_from_slice(&TEST_SESSION_TIME.to_le_bytes());
        buf[19..23].copy_from_slice(&TEST_FRAME_IDENTIFIER.to_le_bytes());
        buf[23..27].copy_from_slice(&TEST_FRAME_IDENTIFIER.to_le_bytes());
        buf[27] = 0; // player car index
        buf[28] = 255; // no secondary player

        // Session history metadata
        buf[PACKET_HEADER_SIZE] = self.car_idx;
        buf[PACKET_HEADER_SIZE + 1] = self.num_laps;
        buf[PACKET_HEADER_SIZE + 2] = self.num_tyre_stints;
        buf[PACKET_HEADER_SIZE + 3] = self.num_laps; // best lap num
        buf[PACKET_HEADER_SIZE + 4] = 1;
        buf[PACKET_HEADER_SIZE + 5] = 1;
        buf[PACKET_HEADER_SIZE + 6] = 1;

        for &(index, bytes) in &self.laps {
            let start = LAP_HISTORY_BASE + index * LAP_HISTORY_ENTRY_SIZE;
            buf[start..start + LAP_HISTORY_ENTRY_SIZE].copy_from_slice(&bytes);
        }
        for &(index, bytes) in &self.stints {
            let start = TYRE_STINT_BASE + index * TYRE_STINT_ENTRY_SIZE;
            buf[start..start + TYRE_STINT_ENTRY_SIZE].copy_from_slice(&bytes);
        }

        buf
    }
}

impl Default for SyntheticPacket {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a lap entry with a lap time and validity flags, sectors zeroed.
pub fn lap_entry_bytes(lap_time_ms: u32, flags: u8) -> [u8; LAP_HISTORY_ENTRY_SIZE] {
    lap_entry_with_sectors(lap_time_ms, (0, 0), (0, 0), (0, 0), flags)
}

/// Encode a complete lap entry. Sectors are `(milliseconds, minutes)` pairs.
pub fn lap_entry_with_sectors(
    lap_time_ms: u32,
    sector1: (u16, u8),
    sector2: (u16, u8),
    sector3: (u16, u8),
    flags: u8,
) -> [u8; LAP_HISTORY_ENTRY_SIZE] {
    let mut bytes = [0u8; LAP_HISTORY_ENTRY_SIZE];
    bytes[0..4].copy_from_slice(&lap_time_ms.to_le_bytes());
    bytes[4..6].copy_from_slice(&sector1.0.to_le_bytes());
    bytes[6] = sector1.1;
    bytes[7..9].copy_from_slice(&sector2.0.to_le_bytes());
    bytes[9] = sector2.1;
    bytes[10..12].copy_from_slice(&sector3.0.to_le_bytes());
    bytes[12] = sector3.1;
    bytes[13] = flags;
    bytes
}
