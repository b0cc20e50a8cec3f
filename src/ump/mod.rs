/*!

Typed Universal MIDI Packet messages and the word-accumulating dispatcher that routes them.

Messages are grouped by message type (the top nibble of the first word): `utility`, `system`,
`m1cvm`, `data64`, `m2cvm`, `data128`, `flex_data` and `stream`. Each message is a packed struct
over its 1, 2 or 4 words with typed field accessors.

!*/

use std::convert::TryFrom;

pub mod backend;
pub mod data128;
pub mod data64;
pub mod dispatcher;
pub mod flex_data;
pub mod m1cvm;
pub mod m2cvm;
pub mod stream;
pub mod system;
pub mod utility;

pub use dispatcher::{function_dispatcher, Config, FunctionConfig, UmpDispatcher};

/// The message-type nibble found in bits 28..31 of the first word of every UMP message. See
/// Table 4 "Message Type (MT) Allocation" of the UMP Format specification (v1.1.2). Half of the
/// values are reserved; they still determine how many words the message occupies.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum MessageType {
    /// `0x0`: utility messages (NOOP, jitter-reduction clocks and timestamps).
    Utility = 0x0,
    /// `0x1`: system real-time and system common messages.
    System = 0x1,
    /// `0x2`: MIDI 1.0 channel-voice messages.
    M1cvm = 0x2,
    /// `0x3`: 64-bit data messages (SysEx7 framing).
    Data64 = 0x3,
    /// `0x4`: MIDI 2.0 channel-voice messages.
    M2cvm = 0x4,
    /// `0x5`: 128-bit data messages (SysEx8 and mixed data sets).
    Data128 = 0x5,
    Reserved32_06 = 0x6,
    Reserved32_07 = 0x7,
    Reserved64_08 = 0x8,
    Reserved64_09 = 0x9,
    Reserved64_0A = 0xA,
    Reserved96_0B = 0xB,
    Reserved96_0C = 0xC,
    /// `0xD`: flex data messages.
    FlexData = 0xD,
    Reserved128_0E = 0xE,
    /// `0xF`: UMP stream messages.
    Stream = 0xF,
}

impl MessageType {
    /// The message type carried by a first word.
    pub fn of_word(word: u32) -> Self {
        Self::from_nibble(((word >> 28) & 0xF) as u8)
    }

    pub(crate) fn from_nibble(nibble: u8) -> Self {
        use MessageType::*;
        match nibble & 0xF {
            0x0 => Utility,
            0x1 => System,
            0x2 => M1cvm,
            0x3 => Data64,
            0x4 => M2cvm,
            0x5 => Data128,
            0x6 => Reserved32_06,
            0x7 => Reserved32_07,
            0x8 => Reserved64_08,
            0x9 => Reserved64_09,
            0xA => Reserved64_0A,
            0xB => Reserved96_0B,
            0xC => Reserved96_0C,
            0xD => FlexData,
            0xE => Reserved128_0E,
            _ => Stream,
        }
    }

    /// The number of 32-bit words a message of this type occupies. Reserved types have sizes too;
    /// a dispatcher must consume them in full to keep the stream framed.
    pub fn word_count(self) -> usize {
        use MessageType::*;
        match self {
            Utility | System | M1cvm | Reserved32_06 | Reserved32_07 => 1,
            Data64 | M2cvm | Reserved64_08 | Reserved64_09 | Reserved64_0A => 2,
            Reserved96_0B | Reserved96_0C => 3,
            Data128 | FlexData | Reserved128_0E | Stream => 4,
        }
    }

    /// True for the message types the specification reserves.
    pub fn is_reserved(self) -> bool {
        use MessageType::*;
        matches!(
            self,
            Reserved32_06
                | Reserved32_07
                | Reserved64_08
                | Reserved64_09
                | Reserved64_0A
                | Reserved96_0B
                | Reserved96_0C
                | Reserved128_0E
        )
    }
}

impl TryFrom<u8> for MessageType {
    type Error = crate::Error;

    fn try_from(value: u8) -> crate::Result<Self> {
        if value > 0xF {
            return Err(crate::error::Other { site: site!() }.build().into());
        }
        Ok(Self::from_nibble(value))
    }
}

#[cfg(test)]
mod message_type_tests {
    use super::*;

    #[test]
    fn word_counts_match_the_allocation_table() {
        let expected: [(u8, usize); 16] = [
            (0x0, 1),
            (0x1, 1),
            (0x2, 1),
            (0x3, 2),
            (0x4, 2),
            (0x5, 4),
            (0x6, 1),
            (0x7, 1),
            (0x8, 2),
            (0x9, 2),
            (0xA, 2),
            (0xB, 3),
            (0xC, 3),
            (0xD, 4),
            (0xE, 4),
            (0xF, 4),
        ];
        for (nibble, count) in expected {
            assert_eq!(
                MessageType::from_nibble(nibble).word_count(),
                count,
                "wrong count for MT {:#X}",
                nibble
            );
        }
    }

    #[test]
    fn of_word_reads_the_top_nibble() {
        assert_eq!(MessageType::of_word(0x2081_6050), MessageType::M1cvm);
        assert_eq!(MessageType::of_word(0x4090_0000), MessageType::M2cvm);
        assert_eq!(MessageType::of_word(0xF000_0000), MessageType::Stream);
    }
}
