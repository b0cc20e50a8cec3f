/*!

System real-time and system common messages (message type `0x1`). The MIDI 1.0 status byte
occupies bits 16..23; up to two 7-bit data bytes follow in bits 8..15 and 0..7.

!*/

ump_message_type! {
    /// MIDI Time Code quarter frame (status `0xF1`).
    pub struct MidiTimeCode([u32; 1] = [0x10F1_0000]) {
        group / with_group: u8 => (0, 24, 4);
        time_code / with_time_code: u8 => (0, 8, 7);
    }
}

ump_message_type! {
    /// Song Position Pointer (status `0xF2`).
    pub struct SongPositionPointer([u32; 1] = [0x10F2_0000]) {
        group / with_group: u8 => (0, 24, 4);
        position_lsb / with_position_lsb: u8 => (0, 8, 7);
        position_msb / with_position_msb: u8 => (0, 0, 7);
    }
}

ump_message_type! {
    /// Song Select (status `0xF3`).
    pub struct SongSelect([u32; 1] = [0x10F3_0000]) {
        group / with_group: u8 => (0, 24, 4);
        song / with_song: u8 => (0, 8, 7);
    }
}

ump_message_type! {
    /// Tune Request (status `0xF6`).
    pub struct TuneRequest([u32; 1] = [0x10F6_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// Timing Clock (status `0xF8`).
    pub struct TimingClock([u32; 1] = [0x10F8_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// Start (status `0xFA`).
    pub struct SequenceStart([u32; 1] = [0x10FA_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// Continue (status `0xFB`).
    pub struct SequenceContinue([u32; 1] = [0x10FB_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// Stop (status `0xFC`).
    pub struct SequenceStop([u32; 1] = [0x10FC_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// Active Sensing (status `0xFE`).
    pub struct ActiveSensing([u32; 1] = [0x10FE_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

ump_message_type! {
    /// System Reset (status `0xFF`).
    pub struct Reset([u32; 1] = [0x10FF_0000]) {
        group / with_group: u8 => (0, 24, 4);
    }
}

#[cfg(test)]
mod system_tests {
    use super::*;

    #[test]
    fn timing_clock_word() {
        assert_eq!(TimingClock::new().word(0), 0x10F8_0000);
        assert_eq!(TimingClock::new().with_group(3).word(0), 0x13F8_0000);
    }

    #[test]
    fn song_position_pointer_data_bytes() {
        let m = SongPositionPointer::new()
            .with_position_lsb(0x13)
            .with_position_msb(0x57);
        assert_eq!(m.word(0), 0x10F2_1357);
    }
}
