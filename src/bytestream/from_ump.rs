/*!

The UMP to MIDI 1.0 byte-stream translator: consumes 32-bit words and emits status and data bytes
into a small internal FIFO. The caller drains the FIFO between pushes.

MIDI 2.0 channel-voice messages are down-converted on the way through: velocities and controller
values are truncated to their 7-bit forms, registered and assignable controllers expand to the
MIDI 1.0 compound CC sequences, and a program change with a valid bank grows the two bank-select
CCs. Messages that have no byte-stream form (data-128, flex data, stream) are consumed silently.

An optional group filter drops messages from unwanted groups: the mask has one bit per group and a
zero mask admits everything.

!*/

use crate::adt::Fifo;
use crate::constants::*;
use crate::scale::scale_down;
use crate::ump::MessageType;

/// The UMP to byte-stream translator.
#[derive(Clone, Debug)]
pub struct UmpToBytestream {
    mtype: MessageType,
    /// The first word of a partially received 64-bit message.
    word64_first: u32,
    pos: u8,
    group_filter: u16,
    group: u8,
    output: Fifo<u8, 16>,
}

impl Default for UmpToBytestream {
    fn default() -> Self {
        Self::new()
    }
}

impl UmpToBytestream {
    pub fn new() -> Self {
        Self {
            mtype: MessageType::Utility,
            word64_first: 0,
            pos: 0,
            group_filter: 0,
            group: 0,
            output: Fifo::new(),
        }
    }

    /// Sets the group allow-mask: bit `g` admits group `g`. A zero mask admits all groups.
    pub fn set_group_filter(&mut self, mask: u16) {
        self.group_filter = mask;
    }

    /// The group of the most recently started message.
    pub fn group(&self) -> u8 {
        self.group
    }

    /// True when translated bytes are waiting to be read.
    pub fn available(&self) -> bool {
        !self.output.empty()
    }

    /// Removes and returns the oldest translated byte. There must be one available.
    pub fn read(&mut self) -> u8 {
        self.output.pop_front()
    }

    /// Consumes one UMP word. Drain the output FIFO between pushes: a single word can complete a
    /// message of up to a dozen bytes.
    pub fn push(&mut self, word: u32) {
        match self.pos {
            0 => self.word1(word),
            1 => self.word2(word),
            2 => self.word3(word),
            _ => self.pos = 0,
        }
    }

    fn group_admitted(&self) -> bool {
        self.group_filter == 0 || (self.group_filter >> self.group) & 1 == 1
    }

    fn push_byte(&mut self, byte: u8) {
        let _ = self.output.push_back(byte);
    }

    fn word1(&mut self, word: u32) {
        self.mtype = MessageType::of_word(word);
        self.group = ((word >> 24) & 0xF) as u8;
        match self.mtype {
            MessageType::Utility | MessageType::Reserved32_06 | MessageType::Reserved32_07 => {}
            // 32-bit system real-time and system common messages (except System Exclusive).
            MessageType::System => {
                if !self.group_admitted() {
                    return;
                }
                let status = ((word >> 16) & 0xFF) as u8;
                if matches!(
                    status,
                    STATUS_RESERVED_F4 | STATUS_RESERVED_F5 | STATUS_RESERVED_F9 | STATUS_RESERVED_FD
                ) {
                    return;
                }
                self.push_byte(status);
                if matches!(status, STATUS_TIMING_CODE | STATUS_SPP | STATUS_SONG_SELECT) {
                    self.push_byte(((word >> 8) & 0x7F) as u8);
                    if status == STATUS_SPP {
                        self.push_byte((word & 0x7F) as u8);
                    }
                }
            }
            // 32-bit MIDI 1.0 channel-voice messages.
            MessageType::M1cvm => {
                if !self.group_admitted() {
                    return;
                }
                let status_channel = ((word >> 16) & 0xFF) as u8;
                self.push_byte(status_channel);
                self.push_byte(((word >> 8) & 0x7F) as u8);
                let status = status_channel & STATUS_TYPE_MASK;
                if status != STATUS_PROGRAM_CHANGE && status != STATUS_CHANNEL_PRESSURE {
                    self.push_byte((word & 0x7F) as u8);
                }
            }
            // 64-bit messages wait for their second word.
            MessageType::Data64 | MessageType::M2cvm => {
                self.word64_first = word;
                self.pos += 1;
            }
            _ => self.pos += 1,
        }
    }

    fn word2(&mut self, word: u32) {
        match self.mtype {
            MessageType::Reserved64_08 | MessageType::Reserved64_09 | MessageType::Reserved64_0A => {
                self.pos = 0;
            }
            MessageType::Data64 => {
                self.pos = 0;
                self.data64_to_bytes(word);
            }
            MessageType::M2cvm => {
                self.pos = 0;
                self.m2cvm_to_bytes(word);
            }
            _ => self.pos += 1,
        }
    }

    fn word3(&mut self, _word: u32) {
        match self.mtype {
            MessageType::Reserved96_0B | MessageType::Reserved96_0C => self.pos = 0,
            _ => self.pos += 1,
        }
    }

    /// Re-frames a Data-64 packet as F0..F7 bytes.
    fn data64_to_bytes(&mut self, word: u32) {
        if !self.group_admitted() {
            return;
        }
        let first = self.word64_first;
        let status = ((first >> 20) & 0x0F) as u8;
        let number_of_bytes = ((first >> 16) & 0x0F) as usize;

        if status <= crate::ump::data64::STATUS_SYSEX7_START {
            self.push_byte(STATUS_SYSEX_START);
        }
        let data = [
            ((first >> 8) & 0x7F) as u8,
            (first & 0x7F) as u8,
            ((word >> 24) & 0x7F) as u8,
            ((word >> 16) & 0x7F) as u8,
            ((word >> 8) & 0x7F) as u8,
            (word & 0x7F) as u8,
        ];
        for byte in data.iter().take(number_of_bytes.min(6)) {
            self.push_byte(*byte);
        }
        if status == crate::ump::data64::STATUS_SYSEX7_IN_1
            || status == crate::ump::data64::STATUS_SYSEX7_END
        {
            self.push_byte(STATUS_SYSEX_STOP);
        }
    }

    /// Down-converts a MIDI 2.0 channel-voice message.
    fn m2cvm_to_bytes(&mut self, word: u32) {
        if !self.group_admitted() {
            return;
        }
        let first = self.word64_first;
        let status_channel = ((first >> 16) & 0xFF) as u8;
        let status = status_channel & STATUS_TYPE_MASK;
        let channel = status_channel & STATUS_CHANNEL_MASK;
        let val1 = ((first >> 8) & 0x7F) as u8;
        let val2 = (first & 0x7F) as u8;

        match status {
            STATUS_NOTE_OFF | STATUS_NOTE_ON => {
                let mut velocity = scale_down(word >> 16, 16, 7) as u8;
                // A down-scaled note-on must never come out as an accidental note-off.
                if velocity == 0 && status == STATUS_NOTE_ON {
                    velocity = 1;
                }
                self.push_byte(status_channel);
                self.push_byte(val1);
                self.push_byte(velocity);
            }
            STATUS_KEY_PRESSURE | STATUS_CC => {
                self.push_byte(status_channel);
                self.push_byte(val1);
                self.push_byte(scale_down(word, 32, 7) as u8);
            }
            STATUS_CHANNEL_PRESSURE => {
                self.push_byte(status_channel);
                self.push_byte(scale_down(word, 32, 7) as u8);
            }
            STATUS_PITCH_BEND => {
                self.push_byte(status_channel);
                self.push_byte(((word >> 18) & 0x7F) as u8);
                self.push_byte(((word >> 25) & 0x7F) as u8);
            }
            STATUS_PROGRAM_CHANGE => {
                if first & 0x1 != 0 {
                    self.push_byte(STATUS_CC | channel);
                    self.push_byte(CONTROL_BANK_SELECT);
                    self.push_byte(((word >> 8) & 0x7F) as u8);

                    self.push_byte(STATUS_CC | channel);
                    self.push_byte(CONTROL_BANK_SELECT_LSB);
                    self.push_byte((word & 0x7F) as u8);
                }
                self.push_byte(STATUS_PROGRAM_CHANGE | channel);
                self.push_byte(((word >> 24) & 0x7F) as u8);
            }
            _ => match status_channel & 0xF0 {
                M2STATUS_RPN => {
                    self.pn_to_bytes(channel, CONTROL_RPN_MSB, CONTROL_RPN_LSB, val1, val2, word)
                }
                M2STATUS_NRPN => {
                    self.pn_to_bytes(channel, CONTROL_NRPN_MSB, CONTROL_NRPN_LSB, val1, val2, word)
                }
                // Per-note and relative controllers have no byte-stream form.
                _ => {}
            },
        }
    }

    /// Expands a registered or assignable controller into the six-byte MIDI 1.0 CC sequence.
    fn pn_to_bytes(&mut self, channel: u8, msb_cc: u8, lsb_cc: u8, bank: u8, index: u8, value: u32) {
        self.push_byte(STATUS_CC | channel);
        self.push_byte(msb_cc);
        self.push_byte(bank);

        self.push_byte(STATUS_CC | channel);
        self.push_byte(lsb_cc);
        self.push_byte(index);

        let val14 = scale_down(value, 32, 14) as u16;
        self.push_byte(STATUS_CC | channel);
        self.push_byte(CONTROL_DATA_ENTRY_MSB);
        self.push_byte(((val14 >> 7) & 0x7F) as u8);

        self.push_byte(STATUS_CC | channel);
        self.push_byte(CONTROL_DATA_ENTRY_LSB);
        self.push_byte((val14 & 0x7F) as u8);
    }
}
