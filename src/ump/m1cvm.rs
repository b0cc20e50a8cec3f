/*!

MIDI 1.0 channel-voice messages in UMP form (message type `0x2`). A single word: the channel-voice
status nibble sits in bits 20..23, the channel in bits 16..19, and the one or two 7-bit data bytes
in bits 8..14 and 0..6.

!*/

ump_message_type! {
    /// Note Off (status nibble `0x8`).
    pub struct NoteOff([u32; 1] = [0x2080_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        velocity / with_velocity: u8 => (0, 0, 7);
    }
}

ump_message_type! {
    /// Note On (status nibble `0x9`). A velocity of zero is a note-off in disguise; the
    /// translators deal with that, not this type.
    pub struct NoteOn([u32; 1] = [0x2090_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        velocity / with_velocity: u8 => (0, 0, 7);
    }
}

ump_message_type! {
    /// Polyphonic key pressure (status nibble `0xA`).
    pub struct PolyPressure([u32; 1] = [0x20A0_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        pressure / with_pressure: u8 => (0, 0, 7);
    }
}

ump_message_type! {
    /// Control Change (status nibble `0xB`).
    pub struct ControlChange([u32; 1] = [0x20B0_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        controller / with_controller: u8 => (0, 8, 7);
        value / with_value: u8 => (0, 0, 7);
    }
}

ump_message_type! {
    /// Program Change (status nibble `0xC`).
    pub struct ProgramChange([u32; 1] = [0x20C0_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        program / with_program: u8 => (0, 8, 7);
    }
}

ump_message_type! {
    /// Channel pressure (status nibble `0xD`).
    pub struct ChannelPressure([u32; 1] = [0x20D0_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        data / with_data: u8 => (0, 8, 7);
    }
}

ump_message_type! {
    /// Pitch bend (status nibble `0xE`). The 14-bit bend is split across the two data bytes with
    /// the LSB first, exactly as it travels in the byte stream.
    pub struct PitchBend([u32; 1] = [0x20E0_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        lsb_data / with_lsb_data: u8 => (0, 8, 7);
        msb_data / with_msb_data: u8 => (0, 0, 7);
    }
}

#[cfg(test)]
mod m1cvm_tests {
    use super::*;

    #[test]
    fn note_on_word_image() {
        let m = NoteOn::new()
            .with_group(0)
            .with_channel(1)
            .with_note(0x60)
            .with_velocity(0x50);
        assert_eq!(m.word(0), 0x2081_6050);
    }

    #[test]
    fn program_change_word_image() {
        let m = ProgramChange::new().with_channel(6).with_program(0x40);
        assert_eq!(m.word(0), 0x20C6_4000);
    }

    #[test]
    fn pitch_bend_byte_order() {
        let m = PitchBend::new()
            .with_channel(3)
            .with_lsb_data(0x00)
            .with_msb_data(0x40);
        assert_eq!(m.word(0), 0x20E3_0040);
    }

    #[test]
    fn from_words_round_trip() {
        let m = NoteOff::from_words([0x2080_3C40]);
        assert_eq!(m.note(), 0x3C);
        assert_eq!(m.velocity(), 0x40);
        assert_eq!(m.words(), [0x2080_3C40]);
    }
}
