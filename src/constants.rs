/*!

Status bytes, controller numbers and UMP status nibbles shared by the translators and dispatchers.

!*/

/// To extract the channel number from a status byte. The right most (least-significant) four bits
/// of a status byte represent the channel number.
pub(crate) const STATUS_CHANNEL_MASK: u8 = 0b0000_1111;

/// Message type mask. The left most (most-significant) four bits of a status byte represent the
/// message type.
pub(crate) const STATUS_TYPE_MASK: u8 = 0b1111_0000;

/// `0x80`: `Note Off`.
pub(crate) const STATUS_NOTE_OFF: u8 = 0x80;

/// `0x90`: `Note On (a velocity of 0 = Note Off)`.
pub(crate) const STATUS_NOTE_ON: u8 = 0x90;

/// `0xA0`: `Polyphonic key pressure/Aftertouch`.
pub(crate) const STATUS_KEY_PRESSURE: u8 = 0xA0;

/// `0xB0`: `Control change` (or a `Channel Mode` message, distinguished by a first data byte in
/// the range 120 to 127).
pub(crate) const STATUS_CC: u8 = 0xB0;

/// `0xC0`: `Program change`.
pub(crate) const STATUS_PROGRAM_CHANGE: u8 = 0xC0;

/// `0xD0`: `Channel pressure/After touch`.
pub(crate) const STATUS_CHANNEL_PRESSURE: u8 = 0xD0;

/// `0xE0`: `Pitch bend change`.
pub(crate) const STATUS_PITCH_BEND: u8 = 0xE0;

/// `0xF0`: Start of a System Exclusive message.
pub(crate) const STATUS_SYSEX_START: u8 = 0xF0;

/// `0xF1`: MIDI Time Code quarter frame.
pub(crate) const STATUS_TIMING_CODE: u8 = 0xF1;

/// `0xF2`: Song Position Pointer.
pub(crate) const STATUS_SPP: u8 = 0xF2;

/// `0xF3`: Song Select.
pub(crate) const STATUS_SONG_SELECT: u8 = 0xF3;

/// `0xF4`: Reserved, undefined system common status.
pub(crate) const STATUS_RESERVED_F4: u8 = 0xF4;

/// `0xF5`: Reserved, undefined system common status.
pub(crate) const STATUS_RESERVED_F5: u8 = 0xF5;

/// `0xF6`: Tune Request.
pub(crate) const STATUS_TUNE_REQUEST: u8 = 0xF6;

/// `0xF7`: End of a System Exclusive message.
pub(crate) const STATUS_SYSEX_STOP: u8 = 0xF7;

/// `0xF8`: Timing Clock.
pub(crate) const STATUS_TIMING_CLOCK: u8 = 0xF8;

/// `0xF9`: Reserved, undefined system real-time status.
pub(crate) const STATUS_RESERVED_F9: u8 = 0xF9;

/// `0xFA`: Start the current sequence playing.
pub(crate) const STATUS_SEQ_START: u8 = 0xFA;

/// `0xFB`: Continue at the point the sequence was stopped.
pub(crate) const STATUS_SEQ_CONTINUE: u8 = 0xFB;

/// `0xFC`: Stop the current sequence.
pub(crate) const STATUS_SEQ_STOP: u8 = 0xFC;

/// `0xFD`: Reserved, undefined system real-time status.
pub(crate) const STATUS_RESERVED_FD: u8 = 0xFD;

/// `0xFE`: Active Sensing.
pub(crate) const STATUS_ACTIVE_SENSING: u8 = 0xFE;

/// `0xFF`: System Reset.
pub(crate) const STATUS_SYSTEM_RESET: u8 = 0xFF;

// MIDI 2.0 channel-voice status nibbles (shifted into the high nibble position). These exist only
// in MT-4 messages.

/// `0x00`: Registered per-note controller.
pub(crate) const M2STATUS_RPN_PER_NOTE: u8 = 0x00;

/// `0x10`: Assignable (non-registered) per-note controller.
pub(crate) const M2STATUS_NRPN_PER_NOTE: u8 = 0x10;

/// `0x20`: Registered controller (RPN).
pub(crate) const M2STATUS_RPN: u8 = 0x20;

/// `0x30`: Assignable controller (NRPN).
pub(crate) const M2STATUS_NRPN: u8 = 0x30;

/// `0x40`: Relative registered controller.
pub(crate) const M2STATUS_RPN_RELATIVE: u8 = 0x40;

/// `0x50`: Relative assignable controller.
pub(crate) const M2STATUS_NRPN_RELATIVE: u8 = 0x50;

/// `0x60`: Per-note pitch bend.
pub(crate) const M2STATUS_PITCH_BEND_PER_NOTE: u8 = 0x60;

/// `0xF0`: Per-note management.
pub(crate) const M2STATUS_PER_NOTE_MANAGE: u8 = 0xF0;

// The MIDI 1.0 Specification defines Control Change indexes 98, 99, 100, and 101 (0x62, 0x63,
// 0x64, and 0x65) to be used as compound sequences for Non-Registered Parameter Number and
// Registered Parameter Number control messages. These set destinations for Control Change index
// 6/38 (0x06/0x26), Data Entry.

/// `0`: Bank Select MSB.
pub(crate) const CONTROL_BANK_SELECT: u8 = 0x00;

/// `32`: Bank Select LSB.
pub(crate) const CONTROL_BANK_SELECT_LSB: u8 = 0x20;

/// `6`: Data Entry MSB.
pub(crate) const CONTROL_DATA_ENTRY_MSB: u8 = 0x06;

/// `38`: Data Entry LSB.
pub(crate) const CONTROL_DATA_ENTRY_LSB: u8 = 0x26;

/// `98`: NRPN LSB.
pub(crate) const CONTROL_NRPN_LSB: u8 = 0x62;

/// `99`: NRPN MSB.
pub(crate) const CONTROL_NRPN_MSB: u8 = 0x63;

/// `100`: RPN LSB.
pub(crate) const CONTROL_RPN_LSB: u8 = 0x64;

/// `101`: RPN MSB.
pub(crate) const CONTROL_RPN_MSB: u8 = 0x65;

/// `121`: Reset All Controllers channel-mode message.
pub(crate) const CONTROL_RESET_ALL_CONTROLLERS: u8 = 0x79;
