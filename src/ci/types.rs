/*!

MIDI Capability Inquiry message types.

A CI message travels inside a System Exclusive payload. The 13-byte header — universal sysex id,
device id, the MIDI-CI sub-id, the message kind, the version, and the two MUIDs — is common to
every kind; the body that follows it is kind-specific, and several kinds carry trailing
variable-length sections. Decoded messages borrow their variable-length sections from the
dispatcher's buffer; they are valid until the next message begins.

MUIDs and other multi-byte quantities travel as little-endian strings of 7-bit septets.

!*/

/// `0x7E`: the universal non-realtime System Exclusive id that opens every CI message.
pub const UNIVERSAL_SYSTEM_EXCLUSIVE: u8 = 0x7E;

/// `0x0D`: the universal sysex sub-id 1 assigned to MIDI-CI.
pub const SUB_ID_1_MIDI_CI: u8 = 0x0D;

/// The destination MUID that addresses every receiver.
pub const BROADCAST_MUID: u32 = 0x0FFF_FFFF;

/// The device id addressing the function block rather than a specific channel.
pub const FUNCTION_BLOCK: u8 = 0x7F;

/// The number of bytes in the wire header common to all CI messages.
pub const HEADER_SIZE: usize = 13;

/// Reads a 28-bit quantity from four little-endian septets.
pub(crate) fn from_le7_u28(bytes: [u8; 4]) -> u32 {
    u32::from(bytes[0] & 0x7F)
        | u32::from(bytes[1] & 0x7F) << 7
        | u32::from(bytes[2] & 0x7F) << 14
        | u32::from(bytes[3] & 0x7F) << 21
}

/// Writes a 28-bit quantity as four little-endian septets.
pub(crate) fn to_le7_u28(value: u32) -> [u8; 4] {
    [
        (value & 0x7F) as u8,
        (value >> 7 & 0x7F) as u8,
        (value >> 14 & 0x7F) as u8,
        (value >> 21 & 0x7F) as u8,
    ]
}

/// Reads a 14-bit quantity from two little-endian septets.
pub(crate) fn from_le7_u14(bytes: [u8; 2]) -> u16 {
    u16::from(bytes[0] & 0x7F) | u16::from(bytes[1] & 0x7F) << 7
}

/// Writes a 14-bit quantity as two little-endian septets.
pub(crate) fn to_le7_u14(value: u16) -> [u8; 2] {
    [(value & 0x7F) as u8, (value >> 7 & 0x7F) as u8]
}

/// The decoded CI header. `remote_muid` is the wire's source MUID and `local_muid` its
/// destination MUID, named from the receiver's point of view.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Header {
    pub device_id: u8,
    pub version: u8,
    pub remote_muid: u32,
    pub local_muid: u32,
}

/// The CI message kinds (universal sysex sub-id 2 values).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum MessageId {
    ProfileInquiry = 0x20,
    ProfileInquiryReply = 0x21,
    ProfileSetOn = 0x22,
    ProfileSetOff = 0x23,
    ProfileEnabled = 0x24,
    ProfileDisabled = 0x25,
    ProfileAdded = 0x26,
    ProfileRemoved = 0x27,
    ProfileDetails = 0x28,
    ProfileDetailsReply = 0x29,
    ProfileSpecificData = 0x2F,
    PeCapability = 0x30,
    PeCapabilityReply = 0x31,
    PeGet = 0x34,
    PeGetReply = 0x35,
    PeSet = 0x36,
    PeSetReply = 0x37,
    PeSub = 0x38,
    PeSubReply = 0x39,
    PeNotify = 0x3F,
    PiCapability = 0x40,
    PiCapabilityReply = 0x41,
    PiMmReport = 0x42,
    PiMmReportReply = 0x43,
    PiMmReportEnd = 0x44,
    Discovery = 0x70,
    DiscoveryReply = 0x71,
    EndpointInfo = 0x72,
    EndpointInfoReply = 0x73,
    Ack = 0x7D,
    InvalidateMuid = 0x7E,
    Nak = 0x7F,
}

/// Device discovery (`0x70`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Discovery {
    pub manufacturer: [u8; 3],
    pub family: u16,
    pub model: u16,
    pub version: [u8; 4],
    pub capability: u8,
    pub max_sysex_size: u32,
    /// Version 2 and later; zero in a version 1 message.
    pub output_path_id: u8,
}

/// Reply to device discovery (`0x71`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiscoveryReply {
    pub manufacturer: [u8; 3],
    pub family: u16,
    pub model: u16,
    pub version: [u8; 4],
    pub capability: u8,
    pub max_sysex_size: u32,
    /// Version 2 and later; zero in a version 1 message.
    pub output_path_id: u8,
    /// Version 2 and later; zero in a version 1 message.
    pub function_block: u8,
}

/// Inquiry: endpoint information (`0x72`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EndpointInfo {
    pub status: u8,
}

/// Reply to endpoint information (`0x73`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EndpointInfoReply<'a> {
    pub status: u8,
    pub information: &'a [u8],
}

/// Invalidate MUID (`0x7E`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InvalidateMuid {
    pub target_muid: u32,
}

/// ACK (`0x7D`).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ack<'a> {
    pub original_id: u8,
    pub status_code: u8,
    pub status_data: u8,
    pub details: [u8; 5],
    pub message: &'a [u8],
}

/// NAK (`0x7F`). Version 1 NAK messages carry no body; the fields are zero.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Nak<'a> {
    pub original_id: u8,
    pub status_code: u8,
    pub status_data: u8,
    pub details: [u8; 5],
    pub message: &'a [u8],
}

/// Profile configuration messages.
pub mod profile {
    /// The number of bytes in a profile id.
    pub const ID_SIZE: usize = 5;

    /// Profile inquiry (`0x20`) carries no body.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Inquiry;

    /// Reply to profile inquiry (`0x21`): the enabled and disabled profile id lists, each a
    /// multiple of five bytes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct InquiryReply<'a> {
        pub enabled: &'a [u8],
        pub disabled: &'a [u8],
    }

    impl<'a> InquiryReply<'a> {
        pub fn enabled_profiles(&self) -> impl Iterator<Item = [u8; ID_SIZE]> + 'a {
            profiles(self.enabled)
        }

        pub fn disabled_profiles(&self) -> impl Iterator<Item = [u8; ID_SIZE]> + 'a {
            profiles(self.disabled)
        }
    }

    fn profiles(bytes: &[u8]) -> impl Iterator<Item = [u8; ID_SIZE]> + '_ {
        bytes.chunks_exact(ID_SIZE).map(|chunk| {
            let mut id = [0; ID_SIZE];
            id.copy_from_slice(chunk);
            id
        })
    }

    /// Set profile on (`0x22`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct On {
        pub pid: [u8; ID_SIZE],
        /// Version 2 and later; zero in a version 1 message.
        pub num_channels: u16,
    }

    /// Set profile off (`0x23`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Off {
        pub pid: [u8; ID_SIZE],
    }

    /// Profile enabled report (`0x24`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Enabled {
        pub pid: [u8; ID_SIZE],
        /// Version 2 and later; zero in a version 1 message.
        pub num_channels: u16,
    }

    /// Profile disabled report (`0x25`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Disabled {
        pub pid: [u8; ID_SIZE],
        /// Version 2 and later; zero in a version 1 message.
        pub num_channels: u16,
    }

    /// Profile added report (`0x26`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Added {
        pub pid: [u8; ID_SIZE],
    }

    /// Profile removed report (`0x27`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Removed {
        pub pid: [u8; ID_SIZE],
    }

    /// Profile details inquiry (`0x28`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Details {
        pub pid: [u8; ID_SIZE],
        pub target: u8,
    }

    /// Reply to profile details inquiry (`0x29`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct DetailsReply<'a> {
        pub pid: [u8; ID_SIZE],
        pub target: u8,
        pub data: &'a [u8],
    }

    /// Profile specific data (`0x2F`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct SpecificData<'a> {
        pub pid: [u8; ID_SIZE],
        pub data: &'a [u8],
    }
}

/// Property exchange messages.
pub mod property_exchange {
    /// The chunking state of a multi-chunk property transfer.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ChunkInfo {
        pub number_of_chunks: u16,
        pub chunk_number: u16,
    }

    /// Inquiry: property exchange capabilities (`0x30`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Capabilities {
        pub num_simultaneous: u8,
        /// Version 2 and later; zero in a version 1 message.
        pub major_version: u8,
        /// Version 2 and later; zero in a version 1 message.
        pub minor_version: u8,
    }

    /// Reply to property exchange capabilities (`0x31`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct CapabilitiesReply {
        pub num_simultaneous: u8,
        /// Version 2 and later; zero in a version 1 message.
        pub major_version: u8,
        /// Version 2 and later; zero in a version 1 message.
        pub minor_version: u8,
    }

    /// Inquiry: get property data (`0x34`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Get<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
    }

    /// Reply to get property data (`0x35`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct GetReply<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }

    /// Inquiry: set property data (`0x36`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Set<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }

    /// Reply to set property data (`0x37`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct SetReply<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }

    /// Subscription (`0x38`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Subscription<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }

    /// Reply to subscription (`0x39`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct SubscriptionReply<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }

    /// Notify (`0x3F`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Notify<'a> {
        pub chunk: ChunkInfo,
        pub request: u8,
        pub header: &'a [u8],
        pub data: &'a [u8],
    }
}

/// Process inquiry messages. These exist only from CI version 2 onward.
pub mod process_inquiry {
    /// Inquiry: process inquiry capabilities (`0x40`) carries no body.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Capabilities;

    /// Reply to process inquiry capabilities (`0x41`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct CapabilitiesReply {
        pub features: u8,
    }

    /// Inquiry: MIDI message report (`0x42`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MidiMessageReport {
        pub message_data_control: u8,
        pub system_message_types: u8,
        pub other_message_types: u8,
        pub channel_controller_message_types: u8,
        pub note_data_message_types: u8,
    }

    /// Reply to MIDI message report (`0x43`).
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MidiMessageReportReply {
        pub system_message_types: u8,
        pub other_message_types: u8,
        pub channel_controller_message_types: u8,
        pub note_data_message_types: u8,
    }

    /// End of MIDI message report (`0x44`) carries no body.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MidiMessageReportEnd;
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn le7_round_trips() {
        for value in [0u32, 1, 0x7F, 0x80, 0x0123_4567, BROADCAST_MUID] {
            assert_eq!(from_le7_u28(to_le7_u28(value)), value);
        }
        for value in [0u16, 1, 0x7F, 0x80, 0x3FFF] {
            assert_eq!(from_le7_u14(to_le7_u14(value)), value);
        }
    }

    #[test]
    fn le7_is_little_endian() {
        assert_eq!(to_le7_u28(0x0FFF_FFFF), [0x7F, 0x7F, 0x7F, 0x7F]);
        assert_eq!(from_le7_u28([0x00, 0x02, 0x00, 0x00]), 0x100);
        assert_eq!(to_le7_u14(0x100), [0x00, 0x02]);
    }

    #[test]
    fn profile_list_iteration() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let reply = profile::InquiryReply {
            enabled: &bytes,
            disabled: &[],
        };
        let ids: Vec<[u8; 5]> = reply.enabled_profiles().collect();
        assert_eq!(ids, vec![[1, 2, 3, 4, 5], [6, 7, 8, 9, 10]]);
        assert_eq!(reply.disabled_profiles().count(), 0);
    }
}
