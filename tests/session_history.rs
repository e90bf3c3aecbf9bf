//! End-to-end decoding tests against synthetic session history captures.

use anyhow::{Result, ensure};
use lapbook::{
    FULL_PACKET_SIZE, LAP_HISTORY_CAPACITY, PACKET_HEADER_SIZE, SESSION_HISTORY_PACKET_ID,
    SessionHistoryPacket, TYRE_STINT_BASE, TYRE_STINT_CAPACITY,
};

const SESSION_UID: u64 = 0x0123_4567_89AB_CDEF;

/// Make decode-path tracing output visible under `--nocapture`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// Build a full-capacity packet with the given counts, header fields fixed.
fn build_packet(num_laps: u8, num_tyre_stints: u8) -> Vec<u8> {
    let mut buf = vec![0u8; FULL_PACKET_SIZE];

    buf[0..2].copy_from_slice(&2023u16.to_le_bytes());
    buf[2] = 23; // game year
    buf[3] = 1;
    buf[4] = 18;
    buf[5] = 1; // packet version
    buf[6] = SESSION_HISTORY_PACKET_ID;
    buf[7..15].copy_from_slice(&SESSION_UID.to_le_bytes());
    buf[15..19].copy_from_slice(&321.25f32.to_le_bytes());
    buf[19..23].copy_from_slice(&7700u32.to_le_bytes());
    buf[23..27].copy_from_slice(&7700u32.to_le_bytes());
    buf[27] = 4; // player car index
    buf[28] = 255;

    buf[29] = 4; // car idx
    buf[30] = num_laps;
    buf[31] = num_tyre_stints;
    buf[32] = 1; // best lap num
    buf[33] = 1;
    buf[34] = 1;
    buf[35] = 1;

    buf
}

fn write_lap(buf: &mut [u8], index: usize, lap_time_ms: u32, flags: u8) {
    let base = 36 + index * 14;
    buf[base..base + 4].copy_from_slice(&lap_time_ms.to_le_bytes());
    buf[base + 13] = flags;
}

fn write_sector1(buf: &mut [u8], index: usize, ms: u16, minutes: u8) {
    let base = 36 + index * 14;
    buf[base + 4..base + 6].copy_from_slice(&ms.to_le_bytes());
    buf[base + 6] = minutes;
}

fn write_stint(buf: &mut [u8], index: usize, end_lap: u8, actual: u8, visual: u8) {
    let base = TYRE_STINT_BASE + index * 3;
    buf[base] = end_lap;
    buf[base + 1] = actual;
    buf[base + 2] = visual;
}

#[test]
fn known_packet_decodes_to_exact_values() -> Result<()> {
    init_tracing();
    let mut buf = build_packet(2, 1);
    write_lap(&mut buf, 0, 90_123, 0x0F);
    write_lap(&mut buf, 1, 91_500, 0x0F);
    write_stint(&mut buf, 0, 20, 2, 2);

    let packet = SessionHistoryPacket::decode(&buf)?;

    assert_eq!(packet.header.packet_format, 2023);
    assert_eq!(packet.header.session_uid, SESSION_UID);
    assert_eq!(packet.header.session_time, 321.25);
    assert_eq!(packet.header.frame_identifier, 7700);
    assert_eq!(packet.header.player_car_index, 4);
    assert!(packet.header.is_session_history());

    assert_eq!(packet.meta.car_idx, 4);
    assert_eq!(packet.meta.num_laps, 2);
    assert_eq!(packet.meta.num_tyre_stints, 1);

    assert_eq!(packet.laps.len(), 2);
    assert!(packet.laps.is_complete());
    assert_eq!(packet.laps.entries[0].lap_time_ms, 90_123);
    assert_eq!(packet.laps.entries[0].lap_time_seconds(), 90.123);
    assert_eq!(packet.laps.entries[1].lap_time_ms, 91_500);
    assert_eq!(packet.laps.entries[1].lap_time_seconds(), 91.500);

    assert_eq!(packet.tyre_stints.len(), 1);
    let stint = &packet.tyre_stints.entries[0];
    assert_eq!((stint.end_lap, stint.actual_tyre_compound, stint.visual_tyre_compound), (20, 2, 2));

    Ok(())
}

#[test]
fn full_buffers_decode_totally_for_all_in_range_counts() -> Result<()> {
    for num_laps in [0u8, 1, 50, 100] {
        for num_stints in [0u8, 1, 8] {
            let buf = build_packet(num_laps, num_stints);
            let packet = SessionHistoryPacket::decode(&buf)?;
            ensure!(
                packet.laps.len() == usize::from(num_laps),
                "expected {} laps, decoded {}",
                num_laps,
                packet.laps.len()
            );
            ensure!(packet.tyre_stints.len() == usize::from(num_stints));
            ensure!(packet.laps.is_complete() && packet.tyre_stints.is_complete());
        }
    }
    Ok(())
}

#[test]
fn decoding_twice_yields_identical_output() -> Result<()> {
    let mut buf = build_packet(3, 2);
    write_lap(&mut buf, 0, 88_001, 0x01);
    write_lap(&mut buf, 1, 87_554, 0x0F);
    write_lap(&mut buf, 2, 92_110, 0x00);

    let first = SessionHistoryPacket::decode(&buf)?;
    let second = SessionHistoryPacket::decode(&buf)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn tyre_stint_base_is_independent_of_lap_count() -> Result<()> {
    let mut none = build_packet(0, 1);
    let mut full = build_packet(100, 1);
    write_stint(&mut none, 0, 12, 3, 3);
    write_stint(&mut full, 0, 12, 3, 3);

    let decoded_none = SessionHistoryPacket::decode(&none)?;
    let decoded_full = SessionHistoryPacket::decode(&full)?;

    assert_eq!(decoded_none.tyre_stints.entries[0].span.start, TYRE_STINT_BASE);
    assert_eq!(decoded_full.tyre_stints.entries[0].span.start, TYRE_STINT_BASE);
    assert_eq!(decoded_none.tyre_stints.entries[0], decoded_full.tyre_stints.entries[0]);
    assert_eq!(decoded_full.laps.len(), LAP_HISTORY_CAPACITY);
    Ok(())
}

#[test]
fn buffer_cut_at_1440_decodes_one_stint_with_marker() -> Result<()> {
    init_tracing();
    let mut buf = build_packet(0, 8);
    for i in 0..TYRE_STINT_CAPACITY {
        write_stint(&mut buf, i, 10 + i as u8, 1, 1);
    }
    buf.truncate(1440);

    let packet = SessionHistoryPacket::decode(&buf)?;
    // floor((1440 - 1436) / 3) = 1 complete stint entry
    assert_eq!(packet.tyre_stints.len(), 1);
    assert_eq!(packet.tyre_stints.entries[0].end_lap, 10);

    let marker = packet.tyre_stints.truncated.expect("remaining stints should be marked truncated");
    assert_eq!(marker.index, 1);
    assert_eq!(marker.span.start, 1439);
    assert_eq!(marker.span.end, 1442);
    Ok(())
}

#[test]
fn sector_minutes_fold_into_derived_seconds() -> Result<()> {
    let mut buf = build_packet(1, 0);
    write_lap(&mut buf, 0, 125_500, 0x0F);
    write_sector1(&mut buf, 0, 500, 1);

    let packet = SessionHistoryPacket::decode(&buf)?;
    assert_eq!(packet.laps.entries[0].sector1_seconds(), 60.500);
    Ok(())
}

#[test]
fn validity_bitmask_decodes_to_named_flags() -> Result<()> {
    let mut buf = build_packet(1, 0);
    write_lap(&mut buf, 0, 90_000, 0x05);

    let packet = SessionHistoryPacket::decode(&buf)?;
    let validity = packet.laps.entries[0].validity;
    assert!(validity.lap_valid());
    assert!(!validity.sector1_valid());
    assert!(validity.sector2_valid());
    assert!(!validity.sector3_valid());
    Ok(())
}

#[test]
fn header_truncation_aborts_the_whole_decode() {
    let buf = build_packet(2, 1);
    let result = SessionHistoryPacket::decode(&buf[..PACKET_HEADER_SIZE - 1]);
    assert!(result.is_err());
}
