/*!

The MIDI 1.0 byte-stream parser: consumes one byte at a time and emits 32- or 64-bit UMP messages
into a small internal FIFO. The caller drains the FIFO between pushes.

Running status is honoured for channel-voice messages. Real-time bytes may arrive anywhere,
including in the middle of another message or a System Exclusive payload, and are emitted
immediately without disturbing the surrounding message. Reserved status bytes cancel running
status so that their data bytes are silently consumed.

In MIDI 2.0 output mode (`output_midi2`), channel-voice messages are up-converted to MT-4 with
min-centre-max scaling, bank-select controllers are folded into the next program change, and the
(N)RPN compound controller sequences are collapsed into single registered/assignable controller
messages.

!*/

use crate::adt::Fifo;
use crate::constants::*;
use crate::scale::scale_up;
use crate::ump::MessageType;
use log::trace;

/// Marks a data byte or per-channel state byte as not yet received.
const UNKNOWN: u8 = 0xFF;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Sysex7State {
    /// A complete sysex message fits in one UMP (or no sysex is in progress).
    SingleUmp,
    Start,
    Continue,
    End,
}

impl Sysex7State {
    fn status(self) -> u8 {
        match self {
            Sysex7State::SingleUmp => crate::ump::data64::STATUS_SYSEX7_IN_1,
            Sysex7State::Start => crate::ump::data64::STATUS_SYSEX7_START,
            Sysex7State::Continue => crate::ump::data64::STATUS_SYSEX7_CONTINUE,
            Sysex7State::End => crate::ump::data64::STATUS_SYSEX7_END,
        }
    }
}

/// System exclusive bytes gathered for the UMP currently being assembled.
#[derive(Clone, Copy, Debug)]
struct Sysex7 {
    state: Sysex7State,
    /// The number of system exclusive bytes in the current UMP, 0..=6.
    pos: u8,
    bytes: [u8; 6],
}

impl Default for Sysex7 {
    fn default() -> Self {
        Self {
            state: Sysex7State::SingleUmp,
            pos: 0,
            bytes: [0; 6],
        }
    }
}

impl Sysex7 {
    fn reset_bytes(&mut self) {
        self.bytes = [0; 6];
    }
}

/// Per-channel bank and parameter-number state.
#[derive(Clone, Copy, Debug)]
struct Channel {
    bank_msb: u8,
    bank_lsb: u8,
    /// True when the selected parameter number is registered (RPN), false for NRPN.
    rpn_mode: bool,
    rpn_msb_value: u8,
    rpn_msb: u8,
    rpn_lsb: u8,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            bank_msb: UNKNOWN,
            bank_lsb: UNKNOWN,
            rpn_mode: true,
            rpn_msb_value: UNKNOWN,
            rpn_msb: UNKNOWN,
            rpn_lsb: UNKNOWN,
        }
    }
}

/// The byte-stream to UMP translator.
#[derive(Clone, Debug)]
pub struct BytestreamToUmp {
    output_midi2: bool,
    default_group: u8,
    /// The running status byte; zero until the first status byte arrives.
    d0: u8,
    /// The first data byte of a two-data-byte message, or [`UNKNOWN`].
    d1: u8,
    sysex7: Sysex7,
    channel: [Channel; 16],
    output: Fifo<u32, 4>,
}

impl Default for BytestreamToUmp {
    fn default() -> Self {
        Self::new()
    }
}

impl BytestreamToUmp {
    /// A translator producing MIDI 1.0 channel-voice messages (MT-2) on group 0.
    pub fn new() -> Self {
        Self::with_options(false, 0)
    }

    /// A translator producing MT-4 messages when `output_midi2` is set, tagging every emitted
    /// message with `default_group`.
    pub fn with_options(output_midi2: bool, default_group: u8) -> Self {
        assert!(default_group <= 0b1111);
        Self {
            output_midi2,
            default_group,
            d0: 0,
            d1: UNKNOWN,
            sysex7: Sysex7::default(),
            channel: [Channel::default(); 16],
            output: Fifo::new(),
        }
    }

    pub fn set_output_midi2(&mut self, enabled: bool) {
        self.output_midi2 = enabled;
    }

    /// True when translated words are waiting to be read.
    pub fn available(&self) -> bool {
        !self.output.empty()
    }

    /// Removes and returns the oldest translated word. There must be one available.
    pub fn read(&mut self) -> u32 {
        self.output.pop_front()
    }

    /// Consumes one byte of the MIDI 1.0 stream. Drain the output FIFO between pushes: a single
    /// byte can complete a message of up to two words.
    pub fn push(&mut self, byte: u8) {
        if is_status_byte(byte) {
            if byte == STATUS_TUNE_REQUEST || is_system_real_time(byte) {
                if byte == STATUS_TUNE_REQUEST {
                    self.d0 = byte;
                }
                self.bs_to_ump(byte, 0, 0);
                return;
            }

            self.d0 = byte;
            self.d1 = UNKNOWN;

            if byte == STATUS_SYSEX_START {
                self.sysex7.state = Sysex7State::Start;
                self.sysex7.pos = 0;
            } else if byte == STATUS_SYSEX_STOP {
                let status = if self.sysex7.state == Sysex7State::Start {
                    Sysex7State::SingleUmp.status()
                } else {
                    Sysex7State::End.status()
                };
                self.push_sysex7(status, self.sysex7.pos);
                self.sysex7.reset_bytes();
                self.sysex7.state = Sysex7State::SingleUmp;
            }
        } else if self.sysex7.state != Sysex7State::SingleUmp {
            if self.sysex7.pos == 6 {
                // The current UMP is full: flush it and open a continuation.
                let status = self.sysex7.state.status();
                self.push_sysex7(status, 6);
                self.sysex7.reset_bytes();
                self.sysex7.state = Sysex7State::Continue;
                self.sysex7.pos = 0;
            }
            self.sysex7.bytes[self.sysex7.pos as usize] = byte;
            self.sysex7.pos += 1;
        } else if self.d1 != UNKNOWN {
            // Second data byte.
            self.bs_to_ump(self.d0, self.d1, byte);
            self.d1 = UNKNOWN;
        } else if self.d0 != 0 {
            if is_one_data_byte_message(self.d0) {
                self.bs_to_ump(self.d0, byte, 0);
            } else if self.d0 < STATUS_SYSEX_START || self.d0 == STATUS_SPP {
                // This is the first of a two data byte message.
                self.d1 = byte;
            }
        }
    }

    fn pack(&self, mt: MessageType, b1: u8, b2: u8, b3: u8) -> u32 {
        (((mt as u32) << 4 | u32::from(self.default_group)) << 24)
            | u32::from(b1) << 16
            | u32::from(b2) << 8
            | u32::from(b3)
    }

    fn push_word(&mut self, word: u32) {
        if !self.output.push_back(word) {
            trace!("output fifo full, dropping word {:#010X}", word);
        }
    }

    fn push_sysex7(&mut self, status: u8, number_of_bytes: u8) {
        let b = &self.sysex7.bytes;
        let w0 = self.pack(
            MessageType::Data64,
            status << 4 | number_of_bytes,
            b[0],
            b[1],
        );
        let w1 = u32::from(b[2]) << 24 | u32::from(b[3]) << 16 | u32::from(b[4]) << 8 | u32::from(b[5]);
        self.push_word(w0);
        self.push_word(w1);
    }

    /// Translates one complete byte-stream message.
    fn bs_to_ump(&mut self, b0: u8, b1: u8, b2: u8) {
        debug_assert!(b1 & 0x80 == 0 && b2 & 0x80 == 0, "data bytes must be 7-bit");
        let channel = b0 & STATUS_CHANNEL_MASK;
        let mut status = b0 & STATUS_TYPE_MASK;

        if b0 >= STATUS_TIMING_CODE {
            self.push_word(self.pack(MessageType::System, b0, b1, b2));
            return;
        }
        if !(STATUS_NOTE_OFF..=STATUS_PITCH_BEND).contains(&status) {
            return;
        }
        if !self.output_midi2 {
            self.push_word(self.pack(MessageType::M1cvm, b0, b1, b2));
            return;
        }

        let mut b2 = b2;
        if status == STATUS_NOTE_ON && b2 == 0 {
            // Map note-on velocity 0 to note-off.
            status = STATUS_NOTE_OFF;
            b2 = 0x40;
        }
        let message = self.pack(MessageType::M2cvm, status | channel, 0, 0);
        match status {
            STATUS_NOTE_ON | STATUS_NOTE_OFF | STATUS_KEY_PRESSURE => {
                self.push_word(message | u32::from(b1) << 8);
                self.push_word(scale_up(u32::from(b2), 7, 16) << 16);
            }
            STATUS_PITCH_BEND => {
                self.push_word(message);
                self.push_word(scale_up(u32::from(b2) << 7 | u32::from(b1), 14, 32));
            }
            STATUS_PROGRAM_CHANGE => {
                let mut message = message;
                let mut bank_msb = 0;
                let mut bank_lsb = 0;
                let c = &self.channel[usize::from(channel)];
                if c.bank_msb != UNKNOWN && c.bank_lsb != UNKNOWN {
                    message |= 0x01; // Set the "bank valid" bit.
                    bank_msb = c.bank_msb;
                    bank_lsb = c.bank_lsb;
                }
                self.push_word(message);
                self.push_word(u32::from(b1) << 24 | u32::from(bank_msb) << 8 | u32::from(bank_lsb));
            }
            STATUS_CHANNEL_PRESSURE => {
                self.push_word(message);
                self.push_word(scale_up(u32::from(b1), 7, 32));
            }
            STATUS_CC => self.controller_to_ump(b0, b1, b2),
            _ => {}
        }
    }

    /// Handles a control change in MT-4 mode: bank select and (N)RPN controllers update state;
    /// everything else becomes a MIDI 2.0 control change.
    fn controller_to_ump(&mut self, b0: u8, b1: u8, b2: u8) {
        let channel = b0 & STATUS_CHANNEL_MASK;
        let c = &mut self.channel[usize::from(channel)];
        match b1 {
            CONTROL_BANK_SELECT => c.bank_msb = b2,
            CONTROL_BANK_SELECT_LSB => c.bank_lsb = b2,

            CONTROL_DATA_ENTRY_MSB => {
                if c.rpn_msb != UNKNOWN && c.rpn_lsb != UNKNOWN {
                    if c.rpn_mode && c.rpn_msb == 0 && (c.rpn_lsb == 0 || c.rpn_lsb == 6) {
                        // RPNs 0,0 and 0,6 act on the MSB alone.
                        let (msb, lsb) = (c.rpn_msb, c.rpn_lsb);
                        let w0 = self.pack(MessageType::M2cvm, M2STATUS_RPN | channel, msb, lsb);
                        self.push_word(w0);
                        self.push_word(scale_up(u32::from(b2) << 7, 14, 32));
                    } else {
                        c.rpn_msb_value = b2;
                    }
                }
            }
            CONTROL_DATA_ENTRY_LSB => {
                if c.rpn_msb != UNKNOWN && c.rpn_lsb != UNKNOWN {
                    let status = if c.rpn_mode { M2STATUS_RPN } else { M2STATUS_NRPN } | channel;
                    let value = u32::from(c.rpn_msb_value) << 7 | u32::from(b2);
                    let (msb, lsb) = (c.rpn_msb, c.rpn_lsb);
                    let w0 = self.pack(MessageType::M2cvm, status, msb, lsb);
                    self.push_word(w0);
                    self.push_word(scale_up(value, 14, 32));
                }
            }

            CONTROL_NRPN_MSB => {
                c.rpn_mode = false;
                c.rpn_msb = b2;
            }
            CONTROL_NRPN_LSB => {
                c.rpn_mode = false;
                c.rpn_lsb = b2;
            }
            CONTROL_RPN_MSB => {
                c.rpn_mode = true;
                c.rpn_msb = b2;
            }
            CONTROL_RPN_LSB => {
                if c.rpn_mode && c.rpn_msb == 0x7F && b2 == 0x7F {
                    // The null parameter number: deselects data entry until a new (N)RPN is
                    // chosen.
                    c.rpn_msb = UNKNOWN;
                    c.rpn_lsb = UNKNOWN;
                } else {
                    c.rpn_mode = true;
                    c.rpn_lsb = b2;
                }
            }

            CONTROL_RESET_ALL_CONTROLLERS => {
                *c = Channel::default();
                let w0 = self.pack(MessageType::M2cvm, b0, b1, 0);
                self.push_word(w0);
                self.push_word(scale_up(u32::from(b2), 7, 32));
            }

            _ => {
                let w0 = self.pack(MessageType::M2cvm, b0, b1, 0);
                self.push_word(w0);
                self.push_word(scale_up(u32::from(b2), 7, 32));
            }
        }
    }
}

fn is_status_byte(byte: u8) -> bool {
    byte & 0x80 != 0
}

fn is_system_real_time(byte: u8) -> bool {
    matches!(
        byte,
        STATUS_TIMING_CLOCK
            | STATUS_SEQ_START
            | STATUS_SEQ_CONTINUE
            | STATUS_SEQ_STOP
            | STATUS_ACTIVE_SENSING
            | STATUS_SYSTEM_RESET
    )
}

/// True if the byte is a MIDI 1.0 status code that is followed by exactly one data byte.
fn is_one_data_byte_message(byte: u8) -> bool {
    let top_nibble = byte & STATUS_TYPE_MASK;
    top_nibble == STATUS_PROGRAM_CHANGE
        || top_nibble == STATUS_CHANNEL_PRESSURE
        || byte == STATUS_TIMING_CODE
        || byte == STATUS_SONG_SELECT
}
