/*!

Flex data messages (message type `0xD`): performance-time tempo, time signature, metronome, key
signature and chord information, plus the text messages selected by a non-zero status bank.

!*/

/// `0x00`: the setup-and-performance status bank.
pub const BANK_SETUP_AND_PERFORMANCE: u8 = 0x00;

/// `0x00`: Set Tempo status within the common bank.
pub const STATUS_SET_TEMPO: u8 = 0x00;
/// `0x01`: Set Time Signature status.
pub const STATUS_SET_TIME_SIGNATURE: u8 = 0x01;
/// `0x02`: Set Metronome status.
pub const STATUS_SET_METRONOME: u8 = 0x02;
/// `0x05`: Set Key Signature status.
pub const STATUS_SET_KEY_SIGNATURE: u8 = 0x05;
/// `0x06`: Set Chord Name status.
pub const STATUS_SET_CHORD_NAME: u8 = 0x06;

ump_message_type! {
    /// 7.5.3 Set Tempo: the performance tempo in 10-nanosecond units per quarter note.
    pub struct SetTempo([u32; 4] = [0xD010_0000, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        value / with_value: u32 => (1, 0, 32);
    }
}

ump_message_type! {
    /// 7.5.4 Set Time Signature.
    pub struct SetTimeSignature([u32; 4] = [0xD010_0001, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        numerator / with_numerator: u8 => (1, 24, 8);
        denominator / with_denominator: u8 => (1, 16, 8);
        number_of_32nd_notes / with_number_of_32nd_notes: u8 => (1, 8, 8);
    }
}

ump_message_type! {
    /// 7.5.5 Set Metronome.
    pub struct SetMetronome([u32; 4] = [0xD010_0002, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        clocks_per_primary_click / with_clocks_per_primary_click: u8 => (1, 24, 8);
        bar_accent_1 / with_bar_accent_1: u8 => (1, 16, 8);
        bar_accent_2 / with_bar_accent_2: u8 => (1, 8, 8);
        bar_accent_3 / with_bar_accent_3: u8 => (1, 0, 8);
        subdivision_clicks_1 / with_subdivision_clicks_1: u8 => (2, 24, 8);
        subdivision_clicks_2 / with_subdivision_clicks_2: u8 => (2, 16, 8);
    }
}

ump_message_type! {
    /// 7.5.7 Set Key Signature. `sharps_or_flats` is a signed 4-bit count; read it with
    /// [`SetKeySignature::sharps_or_flats_signed`].
    pub struct SetKeySignature([u32; 4] = [0xD010_0005, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        sharps_or_flats / with_sharps_or_flats: u8 => (1, 28, 4);
        tonic_note / with_tonic_note: u8 => (1, 24, 4);
    }
}

impl SetKeySignature {
    pub fn sharps_or_flats_signed(&self) -> i32 {
        crate::bitfield::get_signed(self.word(1), 28, 4)
    }
}

ump_message_type! {
    /// 7.5.8 Set Chord Name.
    pub struct SetChordName([u32; 4] = [0xD010_0006, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        tonic_sharps_flats / with_tonic_sharps_flats: u8 => (1, 28, 4);
        chord_tonic / with_chord_tonic: u8 => (1, 24, 4);
        chord_type / with_chord_type: u8 => (1, 16, 8);
        alter_1_type / with_alter_1_type: u8 => (1, 12, 4);
        alter_1_degree / with_alter_1_degree: u8 => (1, 8, 4);
        alter_2_type / with_alter_2_type: u8 => (1, 4, 4);
        alter_2_degree / with_alter_2_degree: u8 => (1, 0, 4);
        bass_sharps_flats / with_bass_sharps_flats: u8 => (3, 28, 4);
        bass_note / with_bass_note: u8 => (3, 24, 4);
        bass_chord_type / with_bass_chord_type: u8 => (3, 16, 8);
    }
}

ump_message_type! {
    /// A flex-data text message: any message whose status bank is non-zero. The twelve payload
    /// bytes are raw UTF-8 fragments; assembling them across a form sequence is the caller's
    /// business.
    pub struct TextCommon([u32; 4] = [0xD010_0100, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        form / with_form: u8 => (0, 22, 2);
        addrs / with_addrs: u8 => (0, 20, 2);
        channel / with_channel: u8 => (0, 16, 4);
        status_bank / with_status_bank: u8 => (0, 8, 8);
        status / with_status: u8 => (0, 0, 8);
        text1 / with_text1: u32 => (1, 0, 32);
        text2 / with_text2: u32 => (2, 0, 32);
        text3 / with_text3: u32 => (3, 0, 32);
    }
}
