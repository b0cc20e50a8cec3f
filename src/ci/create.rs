/*!

The CI message builder: writes the canonical on-wire byte sequence of a CI message — the 13-byte
header followed by the kind-specific body — into a caller-supplied buffer. The wire layout (v1 or
v2) is selected by `header.version`. Variable-length fields are appended after their count
fields.

Nothing is written unless the whole message fits: a too-small destination is an error, as is a
body that does not exist in the requested version (the process inquiry family is version 2 only).

!*/

use crate::ci::types::{
    process_inquiry, profile, property_exchange, to_le7_u14, to_le7_u28, Ack, Discovery,
    DiscoveryReply, EndpointInfo, EndpointInfoReply, Header, InvalidateMuid, MessageId, Nak,
    HEADER_SIZE, SUB_ID_1_MIDI_CI, UNIVERSAL_SYSTEM_EXCLUSIVE,
};
use crate::error::LibResult;

/// A CI message body that knows its wire image.
pub trait CiMessage {
    /// The sub-id 2 value identifying this kind on the wire.
    fn message_id(&self) -> MessageId;

    /// The number of body bytes for `version`, or `None` when the kind cannot be encoded at that
    /// version.
    fn body_len(&self, version: u8) -> Option<usize>;

    /// Writes the body. `out` is exactly `body_len(version)` bytes.
    fn write_body(&self, version: u8, out: &mut [u8]);
}

/// Writes `header` and `body` to the front of `out` and returns the number of bytes written.
/// Nothing is written on failure.
pub fn create_message<M: CiMessage>(out: &mut [u8], header: Header, body: &M) -> crate::Result<usize> {
    Ok(create_message_inner(out, header, body)?)
}

fn create_message_inner<M: CiMessage>(
    out: &mut [u8],
    header: Header,
    body: &M,
) -> LibResult<usize> {
    let body_len = match body.body_len(header.version) {
        Some(body_len) => body_len,
        None => {
            return crate::error::UnsupportedVersion {
                site: site!(),
                version: header.version,
            }
            .fail()
        }
    };
    let total = HEADER_SIZE + body_len;
    if out.len() < total {
        return crate::error::OutputExhausted {
            site: site!(),
            required: total,
            available: out.len(),
        }
        .fail();
    }

    out[0] = UNIVERSAL_SYSTEM_EXCLUSIVE;
    out[1] = header.device_id & 0x7F;
    out[2] = SUB_ID_1_MIDI_CI;
    out[3] = body.message_id() as u8;
    out[4] = header.version & 0x7F;
    out[5..9].copy_from_slice(&to_le7_u28(header.remote_muid));
    out[9..13].copy_from_slice(&to_le7_u28(header.local_muid));
    body.write_body(header.version, &mut out[HEADER_SIZE..total]);
    Ok(total)
}

/// Writes the 16- or 17/18-byte discovery body shared by the request and the reply.
fn write_discovery_common(d: &Discovery, out: &mut [u8]) {
    out[0..3].copy_from_slice(&d.manufacturer);
    out[3..5].copy_from_slice(&to_le7_u14(d.family));
    out[5..7].copy_from_slice(&to_le7_u14(d.model));
    out[7..11].copy_from_slice(&d.version);
    out[11] = d.capability & 0x7F;
    out[12..16].copy_from_slice(&to_le7_u28(d.max_sysex_size));
}

impl CiMessage for Discovery {
    fn message_id(&self) -> MessageId {
        MessageId::Discovery
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(if version == 1 { 16 } else { 17 })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        write_discovery_common(self, out);
        if out.len() > 16 {
            out[16] = self.output_path_id & 0x7F;
        }
    }
}

impl CiMessage for DiscoveryReply {
    fn message_id(&self) -> MessageId {
        MessageId::DiscoveryReply
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(if version == 1 { 16 } else { 18 })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        let common = Discovery {
            manufacturer: self.manufacturer,
            family: self.family,
            model: self.model,
            version: self.version,
            capability: self.capability,
            max_sysex_size: self.max_sysex_size,
            output_path_id: self.output_path_id,
        };
        write_discovery_common(&common, out);
        if out.len() > 16 {
            out[16] = self.output_path_id & 0x7F;
            out[17] = self.function_block & 0x7F;
        }
    }
}

impl CiMessage for EndpointInfo {
    fn message_id(&self) -> MessageId {
        MessageId::EndpointInfo
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(1)
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0] = self.status & 0x7F;
    }
}

impl CiMessage for EndpointInfoReply<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::EndpointInfoReply
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(3 + self.information.len())
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0] = self.status & 0x7F;
        out[1..3].copy_from_slice(&to_le7_u14(self.information.len() as u16));
        out[3..].copy_from_slice(self.information);
    }
}

impl CiMessage for InvalidateMuid {
    fn message_id(&self) -> MessageId {
        MessageId::InvalidateMuid
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(4)
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..4].copy_from_slice(&to_le7_u28(self.target_muid));
    }
}

fn write_ack_nak(
    original_id: u8,
    status_code: u8,
    status_data: u8,
    details: [u8; 5],
    message: &[u8],
    out: &mut [u8],
) {
    out[0] = original_id & 0x7F;
    out[1] = status_code & 0x7F;
    out[2] = status_data & 0x7F;
    out[3..8].copy_from_slice(&details);
    out[8..10].copy_from_slice(&to_le7_u14(message.len() as u16));
    out[10..].copy_from_slice(message);
}

impl CiMessage for Ack<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::Ack
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(10 + self.message.len())
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        write_ack_nak(
            self.original_id,
            self.status_code,
            self.status_data,
            self.details,
            self.message,
            out,
        );
    }
}

impl CiMessage for Nak<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::Nak
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        // A version 1 NAK is the bare header.
        Some(if version == 1 { 0 } else { 10 + self.message.len() })
    }

    fn write_body(&self, version: u8, out: &mut [u8]) {
        if version == 1 {
            return;
        }
        write_ack_nak(
            self.original_id,
            self.status_code,
            self.status_data,
            self.details,
            self.message,
            out,
        );
    }
}

impl CiMessage for profile::Inquiry {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileInquiry
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(0)
    }

    fn write_body(&self, _version: u8, _out: &mut [u8]) {}
}

impl CiMessage for profile::InquiryReply<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileInquiryReply
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(2 + self.enabled.len() + 2 + self.disabled.len())
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        debug_assert!(self.enabled.len() % profile::ID_SIZE == 0);
        debug_assert!(self.disabled.len() % profile::ID_SIZE == 0);
        let num_enabled = (self.enabled.len() / profile::ID_SIZE) as u16;
        let num_disabled = (self.disabled.len() / profile::ID_SIZE) as u16;
        out[0..2].copy_from_slice(&to_le7_u14(num_enabled));
        let pt2 = 2 + self.enabled.len();
        out[2..pt2].copy_from_slice(self.enabled);
        out[pt2..pt2 + 2].copy_from_slice(&to_le7_u14(num_disabled));
        out[pt2 + 2..].copy_from_slice(self.disabled);
    }
}

impl CiMessage for profile::Added {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileAdded
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(profile::ID_SIZE)
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out.copy_from_slice(&self.pid);
    }
}

impl CiMessage for profile::Removed {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileRemoved
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(profile::ID_SIZE)
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out.copy_from_slice(&self.pid);
    }
}

impl CiMessage for profile::Details {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileDetails
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(profile::ID_SIZE + 1)
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        out[profile::ID_SIZE] = self.target & 0x7F;
    }
}

impl CiMessage for profile::DetailsReply<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileDetailsReply
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(profile::ID_SIZE + 3 + self.data.len())
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        out[5] = self.target & 0x7F;
        out[6..8].copy_from_slice(&to_le7_u14(self.data.len() as u16));
        out[8..].copy_from_slice(self.data);
    }
}

impl CiMessage for profile::On {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileSetOn
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(if version == 1 {
            profile::ID_SIZE
        } else {
            profile::ID_SIZE + 2
        })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        if out.len() > profile::ID_SIZE {
            out[5..7].copy_from_slice(&to_le7_u14(self.num_channels));
        }
    }
}

impl CiMessage for profile::Off {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileSetOff
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        // Version 2 appends two reserved bytes.
        Some(if version == 1 {
            profile::ID_SIZE
        } else {
            profile::ID_SIZE + 2
        })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        if out.len() > profile::ID_SIZE {
            out[5] = 0;
            out[6] = 0;
        }
    }
}

impl CiMessage for profile::Enabled {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileEnabled
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(if version == 1 {
            profile::ID_SIZE
        } else {
            profile::ID_SIZE + 2
        })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        if out.len() > profile::ID_SIZE {
            out[5..7].copy_from_slice(&to_le7_u14(self.num_channels));
        }
    }
}

impl CiMessage for profile::Disabled {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileDisabled
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(if version == 1 {
            profile::ID_SIZE
        } else {
            profile::ID_SIZE + 2
        })
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        if out.len() > profile::ID_SIZE {
            out[5..7].copy_from_slice(&to_le7_u14(self.num_channels));
        }
    }
}

impl CiMessage for profile::SpecificData<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::ProfileSpecificData
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(profile::ID_SIZE + 2 + self.data.len())
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0..profile::ID_SIZE].copy_from_slice(&self.pid);
        out[5..7].copy_from_slice(&to_le7_u14(self.data.len() as u16));
        out[7..].copy_from_slice(self.data);
    }
}

fn pe_capabilities_len(version: u8) -> usize {
    if version == 1 {
        1
    } else {
        3
    }
}

fn write_pe_capabilities(num_simultaneous: u8, major: u8, minor: u8, out: &mut [u8]) {
    out[0] = num_simultaneous & 0x7F;
    if out.len() > 1 {
        out[1] = major & 0x7F;
        out[2] = minor & 0x7F;
    }
}

impl CiMessage for property_exchange::Capabilities {
    fn message_id(&self) -> MessageId {
        MessageId::PeCapability
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(pe_capabilities_len(version))
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        write_pe_capabilities(self.num_simultaneous, self.major_version, self.minor_version, out);
    }
}

impl CiMessage for property_exchange::CapabilitiesReply {
    fn message_id(&self) -> MessageId {
        MessageId::PeCapabilityReply
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        Some(pe_capabilities_len(version))
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        write_pe_capabilities(self.num_simultaneous, self.major_version, self.minor_version, out);
    }
}

fn pe_data_len(header: &[u8], data: &[u8]) -> usize {
    3 + header.len() + 6 + data.len()
}

fn write_pe_data(
    request: u8,
    chunk: property_exchange::ChunkInfo,
    header: &[u8],
    data: &[u8],
    out: &mut [u8],
) {
    out[0] = request & 0x7F;
    out[1..3].copy_from_slice(&to_le7_u14(header.len() as u16));
    let pt2 = 3 + header.len();
    out[3..pt2].copy_from_slice(header);
    out[pt2..pt2 + 2].copy_from_slice(&to_le7_u14(chunk.number_of_chunks));
    out[pt2 + 2..pt2 + 4].copy_from_slice(&to_le7_u14(chunk.chunk_number));
    out[pt2 + 4..pt2 + 6].copy_from_slice(&to_le7_u14(data.len() as u16));
    out[pt2 + 6..].copy_from_slice(data);
}

/// The seven property exchange data messages share one wire shape. `Get` alone has no data span
/// and is written out by hand below.
macro_rules! pe_data_message {
    ($type_:ty, $id:expr) => {
        impl CiMessage for $type_ {
            fn message_id(&self) -> MessageId {
                $id
            }

            fn body_len(&self, _version: u8) -> Option<usize> {
                Some(pe_data_len(self.header, self.data))
            }

            fn write_body(&self, _version: u8, out: &mut [u8]) {
                write_pe_data(self.request, self.chunk, self.header, self.data, out);
            }
        }
    };
}

pe_data_message!(property_exchange::GetReply<'_>, MessageId::PeGetReply);
pe_data_message!(property_exchange::Set<'_>, MessageId::PeSet);
pe_data_message!(property_exchange::SetReply<'_>, MessageId::PeSetReply);
pe_data_message!(property_exchange::Subscription<'_>, MessageId::PeSub);
pe_data_message!(property_exchange::SubscriptionReply<'_>, MessageId::PeSubReply);
pe_data_message!(property_exchange::Notify<'_>, MessageId::PeNotify);

impl CiMessage for property_exchange::Get<'_> {
    fn message_id(&self) -> MessageId {
        MessageId::PeGet
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(pe_data_len(self.header, &[]))
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        write_pe_data(self.request, self.chunk, self.header, &[], out);
    }
}

impl CiMessage for process_inquiry::Capabilities {
    fn message_id(&self) -> MessageId {
        MessageId::PiCapability
    }

    fn body_len(&self, _version: u8) -> Option<usize> {
        Some(0)
    }

    fn write_body(&self, _version: u8, _out: &mut [u8]) {}
}

impl CiMessage for process_inquiry::CapabilitiesReply {
    fn message_id(&self) -> MessageId {
        MessageId::PiCapabilityReply
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        if version == 1 {
            None
        } else {
            Some(1)
        }
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0] = self.features & 0x7F;
    }
}

impl CiMessage for process_inquiry::MidiMessageReport {
    fn message_id(&self) -> MessageId {
        MessageId::PiMmReport
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        if version == 1 {
            None
        } else {
            Some(5)
        }
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0] = self.message_data_control & 0x7F;
        out[1] = self.system_message_types & 0x7F;
        out[2] = self.other_message_types & 0x7F;
        out[3] = self.channel_controller_message_types & 0x7F;
        out[4] = self.note_data_message_types & 0x7F;
    }
}

impl CiMessage for process_inquiry::MidiMessageReportReply {
    fn message_id(&self) -> MessageId {
        MessageId::PiMmReportReply
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        if version == 1 {
            None
        } else {
            Some(4)
        }
    }

    fn write_body(&self, _version: u8, out: &mut [u8]) {
        out[0] = self.system_message_types & 0x7F;
        out[1] = self.other_message_types & 0x7F;
        out[2] = self.channel_controller_message_types & 0x7F;
        out[3] = self.note_data_message_types & 0x7F;
    }
}

impl CiMessage for process_inquiry::MidiMessageReportEnd {
    fn message_id(&self) -> MessageId {
        MessageId::PiMmReportEnd
    }

    fn body_len(&self, version: u8) -> Option<usize> {
        if version == 1 {
            None
        } else {
            Some(0)
        }
    }

    fn write_body(&self, _version: u8, _out: &mut [u8]) {}
}
