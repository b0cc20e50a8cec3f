/*!

MIDI 2.0 channel-voice messages (message type `0x4`). Two words: the first carries the status
nibble (bits 20..23), channel, and two index bytes whose meaning depends on the status; the second
carries the 16- or 32-bit payload.

!*/

ump_message_type! {
    /// 7.4.1 Note Off (status nibble `0x8`).
    pub struct NoteOff([u32; 2] = [0x4080_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        attribute_type / with_attribute_type: u8 => (0, 0, 8);
        velocity / with_velocity: u16 => (1, 16, 16);
        attribute / with_attribute: u16 => (1, 0, 16);
    }
}

ump_message_type! {
    /// 7.4.2 Note On (status nibble `0x9`). Unlike MIDI 1.0, a velocity of zero means an audible
    /// note at zero velocity, not a note-off.
    pub struct NoteOn([u32; 2] = [0x4090_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        attribute_type / with_attribute_type: u8 => (0, 0, 8);
        velocity / with_velocity: u16 => (1, 16, 16);
        attribute / with_attribute: u16 => (1, 0, 16);
    }
}

ump_message_type! {
    /// 7.4.3 Poly Pressure (status nibble `0xA`).
    pub struct PolyPressure([u32; 2] = [0x40A0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        pressure / with_pressure: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.4 Registered Per-Note Controller (status nibble `0x0`).
    pub struct RpnPerNoteController([u32; 2] = [0x4000_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 8);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.4 Assignable Per-Note Controller (status nibble `0x1`).
    pub struct NrpnPerNoteController([u32; 2] = [0x4010_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 8);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.7 Registered Controller (status nibble `0x2`). The `bank`/`index` pair is the RPN
    /// MSB/LSB of the MIDI 1.0 compound sequence it replaces.
    pub struct RpnController([u32; 2] = [0x4020_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        bank / with_bank: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.7 Assignable Controller (status nibble `0x3`).
    pub struct NrpnController([u32; 2] = [0x4030_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        bank / with_bank: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.8 Relative Registered Controller (status nibble `0x4`). The value is a signed two's
    /// complement delta; read it with [`RpnRelativeController::signed_value`].
    pub struct RpnRelativeController([u32; 2] = [0x4040_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        bank / with_bank: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

impl RpnRelativeController {
    pub fn signed_value(&self) -> i32 {
        self.value() as i32
    }
}

ump_message_type! {
    /// 7.4.8 Relative Assignable Controller (status nibble `0x5`).
    pub struct NrpnRelativeController([u32; 2] = [0x4050_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        bank / with_bank: u8 => (0, 8, 7);
        index / with_index: u8 => (0, 0, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

impl NrpnRelativeController {
    pub fn signed_value(&self) -> i32 {
        self.value() as i32
    }
}

ump_message_type! {
    /// 7.4.5 Per-Note Management (status nibble `0xF`).
    pub struct PerNoteManagement([u32; 2] = [0x40F0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        detach / with_detach: u8 => (0, 1, 1);
        reset / with_reset: u8 => (0, 0, 1);
    }
}

ump_message_type! {
    /// 7.4.6 Control Change (status nibble `0xB`).
    pub struct ControlChange([u32; 2] = [0x40B0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        controller / with_controller: u8 => (0, 8, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.9 Program Change (status nibble `0xC`). When `bank_valid` is set the bank MSB/LSB pair
    /// selects a bank, replacing the MIDI 1.0 bank-select controllers.
    pub struct ProgramChange([u32; 2] = [0x40C0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        option_flags / with_option_flags: u8 => (0, 1, 7);
        bank_valid / with_bank_valid: u8 => (0, 0, 1);
        program / with_program: u8 => (1, 24, 7);
        bank_msb / with_bank_msb: u8 => (1, 8, 7);
        bank_lsb / with_bank_lsb: u8 => (1, 0, 7);
    }
}

ump_message_type! {
    /// 7.4.10 Channel Pressure (status nibble `0xD`).
    pub struct ChannelPressure([u32; 2] = [0x40D0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        data / with_data: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.11 Pitch Bend (status nibble `0xE`). The 32-bit value is centred on `0x8000_0000`.
    pub struct PitchBend([u32; 2] = [0x40E0_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.4.12 Per-Note Pitch Bend (status nibble `0x6`).
    pub struct PerNotePitchBend([u32; 2] = [0x4060_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        channel / with_channel: u8 => (0, 16, 4);
        note / with_note: u8 => (0, 8, 7);
        value / with_value: u32 => (1, 0, 32);
    }
}

#[cfg(test)]
mod m2cvm_tests {
    use super::*;

    #[test]
    fn note_on_word_image() {
        let m = NoteOn::new()
            .with_group(0)
            .with_channel(3)
            .with_note(60)
            .with_velocity(0xC104);
        assert_eq!(m.words(), [0x4093_3C00, 0xC104_0000]);
    }

    #[test]
    fn rpn_controller_word_image() {
        let m = RpnController::new()
            .with_group(1)
            .with_channel(3)
            .with_bank(60)
            .with_index(21)
            .with_value(0x1234_5678);
        assert_eq!(m.words(), [0x4123_3C15, 0x1234_5678]);
    }

    #[test]
    fn program_change_with_bank() {
        let m = ProgramChange::new()
            .with_channel(0xF)
            .with_bank_valid(1)
            .with_program(0x42)
            .with_bank_msb(0x51)
            .with_bank_lsb(0x01);
        assert_eq!(m.words(), [0x40CF_0001, 0x4200_5101]);
    }

    #[test]
    fn relative_controller_sign() {
        let m = RpnRelativeController::new().with_value(-5i32 as u32);
        assert_eq!(m.signed_value(), -5);
    }
}
