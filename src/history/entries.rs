//! Decoded lap history and tyre stint records.
//!
//! Entries are read-only snapshots of the raw wire fields. Time values in
//! seconds are derived on read rather than stored: the wire carries a
//! milliseconds part plus a whole-minutes part per sector, and the lap time
//! as plain milliseconds.

use serde::{Deserialize, Serialize};

/// Absolute byte range an entry occupied in the source buffer.
///
/// Carried on every decoded array entry so diagnostics can point at the
/// exact bytes that produced a value. `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    /// Span of `len` bytes starting at `start`.
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, end: start + len }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Validity bitmask carried on each lap history entry.
///
/// Bit 0 marks the lap valid, bits 1-3 mark sectors 1-3 valid. Bits 4-7 are
/// reserved and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapValidity(pub u8);

impl LapValidity {
    const LAP_VALID: u8 = 0x01;
    const SECTOR1_VALID: u8 = 0x02;
    const SECTOR2_VALID: u8 = 0x04;
    const SECTOR3_VALID: u8 = 0x08;

    /// Create a LapValidity from the raw flags byte.
    pub fn new(flags: u8) -> Self {
        Self(flags)
    }

    /// Check if a specific flag is set using a bitmask.
    pub fn has_flag(&self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Whether the whole lap counts as valid.
    pub fn lap_valid(&self) -> bool {
        self.has_flag(Self::LAP_VALID)
    }

    /// Whether the sector 1 time counts as valid.
    pub fn sector1_valid(&self) -> bool {
        self.has_flag(Self::SECTOR1_VALID)
    }

    /// Whether the sector 2 time counts as valid.
    pub fn sector2_valid(&self) -> bool {
        self.has_flag(Self::SECTOR2_VALID)
    }

    /// Whether the sector 3 time counts as valid.
    pub fn sector3_valid(&self) -> bool {
        self.has_flag(Self::SECTOR3_VALID)
    }

    /// Get the raw flags byte, reserved bits included.
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// One lap of session history timing data (14 bytes on the wire).
///
/// Matches the upstream packed struct:
/// ```text
/// uint32_t m_lapTimeInMS;        // offset 0
/// uint16_t m_sector1TimeInMS;    // offset 4
/// uint8_t  m_sector1TimeMinutes; // offset 6
/// uint16_t m_sector2TimeInMS;    // offset 7
/// uint8_t  m_sector2TimeMinutes; // offset 9
/// uint16_t m_sector3TimeInMS;    // offset 10
/// uint8_t  m_sector3TimeMinutes; // offset 12
/// uint8_t  m_lapValidBitFlags;   // offset 13
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapHistoryEntry {
    /// Lap time in milliseconds.
    pub lap_time_ms: u32,
    /// Sector 1 milliseconds part (sub-minute remainder).
    pub sector1_time_ms: u16,
    /// Sector 1 whole-minutes part.
    pub sector1_minutes: u8,
    pub sector2_time_ms: u16,
    pub sector2_minutes: u8,
    pub sector3_time_ms: u16,
    pub sector3_minutes: u8,
    /// Per-lap and per-sector validity flags.
    pub validity: LapValidity,
    /// Bytes this entry occupied in the source buffer.
    pub span: ByteSpan,
}

impl LapHistoryEntry {
    /// Lap time in seconds, millisecond-precise.
    pub fn lap_time_seconds(&self) -> f64 {
        f64::from(self.lap_time_ms) / 1000.0
    }

    /// Sector 1 time in seconds: whole minutes plus the milliseconds part.
    pub fn sector1_seconds(&self) -> f64 {
        sector_seconds(self.sector1_minutes, self.sector1_time_ms)
    }

    /// Sector 2 time in seconds.
    pub fn sector2_seconds(&self) -> f64 {
        sector_seconds(self.sector2_minutes, self.sector2_time_ms)
    }

    /// Sector 3 time in seconds.
    pub fn sector3_seconds(&self) -> f64 {
        sector_seconds(self.sector3_minutes, self.sector3_time_ms)
    }
}

/// One tyre stint record (3 bytes on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TyreStintEntry {
    /// Lap the tyre usage ends on (255 for the currently fitted tyre).
    pub end_lap: u8,
    /// Actual tyre compound used.
    pub actual_tyre_compound: u8,
    /// Visual tyre compound used.
    pub visual_tyre_compound: u8,
    /// Bytes this entry occupied in the source buffer.
    pub span: ByteSpan,
}

// f64 keeps the milliseconds fraction exact to 3 decimal digits; going
// through f32 here would lose precision for multi-minute sectors.
fn sector_seconds(minutes: u8, ms: u16) -> f64 {
    f64::from(minutes) * 60.0 + f64::from(ms) / 1000.0
}
