/*!

The MIDI Capability Inquiry dispatcher: a byte accumulator over a System Exclusive payload (the
framing F0/F7 bytes excluded).

The machine always knows how many bytes it still needs (`count`) and which stage consumes them
when they have arrived. The first stage is the 13-byte header; classification against a sorted
message table then selects the per-kind stage and its version-dependent body size. Stages for
kinds with trailing variable-length sections read the count field from the fixed prefix and put
the machine back to work for the payload. A message that outgrows the receive buffer surfaces
`buffer_overflow` and the remainder of the sysex is discarded; so is any message whose
destination MUID is neither the broadcast MUID nor one accepted by `check_muid`.

!*/

use crate::ci::backend::{
    ManagementBackend, ManagementFunction, ProcessInquiryBackend, ProcessInquiryFunction,
    ProfileBackend, ProfileFunction, PropertyExchangeBackend, PropertyExchangeFunction,
    SystemBackend, SystemFunction,
};
use crate::ci::types::{
    from_le7_u14, from_le7_u28, process_inquiry, profile, property_exchange, Ack, Discovery,
    DiscoveryReply, EndpointInfo, EndpointInfoReply, Header, InvalidateMuid, MessageId, Nak,
    BROADCAST_MUID, HEADER_SIZE,
};
use log::{debug, trace};

/// The configuration of a [`CiDispatcher`]: a context value shared by every callback plus one
/// backend per handler group.
#[derive(Clone, Debug, Default)]
pub struct Config<Ctx, Sys, Mgmt, Prof, Pe, Pi> {
    pub context: Ctx,
    pub system: Sys,
    pub management: Mgmt,
    pub profile: Prof,
    pub property_exchange: Pe,
    pub process_inquiry: Pi,
}

/// A configuration in which every backend is closure-backed.
pub type FunctionConfig<Ctx> = Config<
    Ctx,
    SystemFunction<Ctx>,
    ManagementFunction<Ctx>,
    ProfileFunction<Ctx>,
    PropertyExchangeFunction<Ctx>,
    ProcessInquiryFunction<Ctx>,
>;

impl<Ctx> FunctionConfig<Ctx> {
    pub fn new(context: Ctx) -> Self {
        Config {
            context,
            system: SystemFunction::new(),
            management: ManagementFunction::new(),
            profile: ProfileFunction::new(),
            property_exchange: PropertyExchangeFunction::new(),
            process_inquiry: ProcessInquiryFunction::new(),
        }
    }
}

/// Builds a dispatcher whose handlers are all closure-backed.
pub fn function_dispatcher<Ctx, const BUFFER_SIZE: usize>(
    context: Ctx,
) -> CiDispatcher<FunctionConfig<Ctx>, BUFFER_SIZE> {
    CiDispatcher::new(FunctionConfig::new(context))
}

/// Which consumer runs when `count` reaches zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Stage {
    Header,
    Discovery,
    DiscoveryReply,
    EndpointInfo,
    EndpointInfoReply,
    InvalidateMuid,
    Ack,
    Nak,
    ProfileInquiry,
    ProfileInquiryReply,
    ProfileAdded,
    ProfileRemoved,
    ProfileDetails,
    ProfileDetailsReply,
    ProfileOn,
    ProfileOff,
    ProfileEnabled,
    ProfileDisabled,
    ProfileSpecificData,
    PeCapabilities,
    PeCapabilitiesReply,
    PropertyExchange,
    PiCapabilities,
    PiCapabilitiesReply,
    PiMmReport,
    PiMmReportReply,
    PiMmReportEnd,
    /// Consume the rest of the sysex without effect.
    Discard,
}

struct DispatchInfo {
    id: MessageId,
    v1_size: u8,
    v2_size: u8,
    stage: Stage,
}

const fn info(id: MessageId, v1_size: u8, v2_size: u8, stage: Stage) -> DispatchInfo {
    DispatchInfo {
        id,
        v1_size,
        v2_size,
        stage,
    }
}

/// The classification table: message kind to wire sizes (fixed prefix for the variable-length
/// kinds) and consuming stage. Sorted by kind for binary search.
static MESSAGES: [DispatchInfo; 32] = [
    info(MessageId::ProfileInquiry, 0, 0, Stage::ProfileInquiry),
    info(MessageId::ProfileInquiryReply, 2, 2, Stage::ProfileInquiryReply),
    info(MessageId::ProfileSetOn, 5, 7, Stage::ProfileOn),
    info(MessageId::ProfileSetOff, 5, 7, Stage::ProfileOff),
    info(MessageId::ProfileEnabled, 5, 7, Stage::ProfileEnabled),
    info(MessageId::ProfileDisabled, 5, 7, Stage::ProfileDisabled),
    info(MessageId::ProfileAdded, 5, 5, Stage::ProfileAdded),
    info(MessageId::ProfileRemoved, 5, 5, Stage::ProfileRemoved),
    info(MessageId::ProfileDetails, 6, 6, Stage::ProfileDetails),
    info(MessageId::ProfileDetailsReply, 8, 8, Stage::ProfileDetailsReply),
    info(MessageId::ProfileSpecificData, 7, 7, Stage::ProfileSpecificData),
    info(MessageId::PeCapability, 1, 3, Stage::PeCapabilities),
    info(MessageId::PeCapabilityReply, 1, 3, Stage::PeCapabilitiesReply),
    info(MessageId::PeGet, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeGetReply, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeSet, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeSetReply, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeSub, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeSubReply, 3, 3, Stage::PropertyExchange),
    info(MessageId::PeNotify, 3, 3, Stage::PropertyExchange),
    info(MessageId::PiCapability, 0, 0, Stage::PiCapabilities),
    info(MessageId::PiCapabilityReply, 0, 1, Stage::PiCapabilitiesReply),
    info(MessageId::PiMmReport, 0, 5, Stage::PiMmReport),
    info(MessageId::PiMmReportReply, 0, 4, Stage::PiMmReportReply),
    info(MessageId::PiMmReportEnd, 0, 0, Stage::PiMmReportEnd),
    info(MessageId::Discovery, 16, 17, Stage::Discovery),
    info(MessageId::DiscoveryReply, 16, 18, Stage::DiscoveryReply),
    info(MessageId::EndpointInfo, 1, 1, Stage::EndpointInfo),
    info(MessageId::EndpointInfoReply, 3, 3, Stage::EndpointInfoReply),
    info(MessageId::Ack, 10, 10, Stage::Ack),
    info(MessageId::InvalidateMuid, 4, 4, Stage::InvalidateMuid),
    info(MessageId::Nak, 0, 10, Stage::Nak),
];

/// The CI dispatcher over a receive buffer of `BUFFER_SIZE` bytes. The buffer bounds the largest
/// message (header plus body) that can be received without an overflow report.
pub struct CiDispatcher<Cfg, const BUFFER_SIZE: usize> {
    pub config: Cfg,
    count: usize,
    message_type: u8,
    group: u8,
    stage: Stage,
    header: Header,
    buffer: [u8; BUFFER_SIZE],
    pos: usize,
}

impl<Ctx, Sys, Mgmt, Prof, Pe, Pi, const BUFFER_SIZE: usize>
    CiDispatcher<Config<Ctx, Sys, Mgmt, Prof, Pe, Pi>, BUFFER_SIZE>
where
    Sys: SystemBackend<Ctx>,
    Mgmt: ManagementBackend<Ctx>,
    Prof: ProfileBackend<Ctx>,
    Pe: PropertyExchangeBackend<Ctx>,
    Pi: ProcessInquiryBackend<Ctx>,
{
    const BUFFER_OK: () = assert!(BUFFER_SIZE >= HEADER_SIZE);

    pub fn new(config: Config<Ctx, Sys, Mgmt, Prof, Pe, Pi>) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::BUFFER_OK;
        Self {
            config,
            count: HEADER_SIZE,
            message_type: 0,
            group: 0,
            stage: Stage::Header,
            header: Header::default(),
            buffer: [0; BUFFER_SIZE],
            pos: 0,
        }
    }

    /// Abandons any message in progress and waits for a fresh header.
    pub fn reset(&mut self) {
        self.header = Header::default();
        self.count = HEADER_SIZE;
        self.pos = 0;
        self.group = 0;
        self.message_type = 0;
        self.stage = Stage::Header;
    }

    /// Begins a new System Exclusive payload arriving on `group` and addressed to `device_id`.
    pub fn start(&mut self, group: u8, device_id: u8) {
        self.reset();
        self.header.device_id = device_id;
        self.group = group;
    }

    /// Ends the payload. A partial message is never delivered.
    pub fn finish(&mut self) {
        // Here for symmetry with start().
    }

    /// Consumes one payload byte (the low seven bits are significant).
    pub fn dispatch(&mut self, byte: u8) {
        if self.count > 0 {
            if self.pos >= BUFFER_SIZE {
                self.overflow();
                return;
            }
            self.buffer[self.pos] = byte;
            self.pos += 1;
            self.count -= 1;
        }
        if self.count == 0 {
            self.run_stage();
        }
    }

    fn run_stage(&mut self) {
        match self.stage {
            Stage::Header => self.header_stage(),
            Stage::Discovery => self.discovery_stage(),
            Stage::DiscoveryReply => self.discovery_reply_stage(),
            Stage::EndpointInfo => self.endpoint_info_stage(),
            Stage::EndpointInfoReply => self.endpoint_info_reply_stage(),
            Stage::InvalidateMuid => self.invalidate_muid_stage(),
            Stage::Ack => self.ack_stage(),
            Stage::Nak => self.nak_stage(),
            Stage::ProfileInquiry => self.profile_inquiry_stage(),
            Stage::ProfileInquiryReply => self.profile_inquiry_reply_stage(),
            Stage::ProfileAdded => self.profile_added_stage(),
            Stage::ProfileRemoved => self.profile_removed_stage(),
            Stage::ProfileDetails => self.profile_details_stage(),
            Stage::ProfileDetailsReply => self.profile_details_reply_stage(),
            Stage::ProfileOn => self.profile_on_stage(),
            Stage::ProfileOff => self.profile_off_stage(),
            Stage::ProfileEnabled => self.profile_enabled_stage(),
            Stage::ProfileDisabled => self.profile_disabled_stage(),
            Stage::ProfileSpecificData => self.profile_specific_data_stage(),
            Stage::PeCapabilities => self.pe_capabilities_stage(),
            Stage::PeCapabilitiesReply => self.pe_capabilities_reply_stage(),
            Stage::PropertyExchange => self.property_exchange_stage(),
            Stage::PiCapabilities => self.pi_capabilities_stage(),
            Stage::PiCapabilitiesReply => self.pi_capabilities_reply_stage(),
            Stage::PiMmReport => self.pi_mm_report_stage(),
            Stage::PiMmReportReply => self.pi_mm_report_reply_stage(),
            Stage::PiMmReportEnd => self.pi_mm_report_end_stage(),
            Stage::Discard => self.discard(),
        }
    }

    fn discard(&mut self) {
        self.pos = 0;
        self.count = BUFFER_SIZE;
    }

    fn overflow(&mut self) {
        debug!("ci receive buffer overflow at {} bytes", BUFFER_SIZE);
        let Config {
            context, system, ..
        } = &mut self.config;
        system.buffer_overflow(context);
        self.count = 0;
        self.pos = 0;
        self.stage = Stage::Discard;
    }

    /// Classifies the completed header and primes the per-kind stage.
    fn header_stage(&mut self) {
        debug_assert!(self.pos == HEADER_SIZE);
        let b = &self.buffer;
        self.message_type = b[3] & 0x7F;
        self.header.version = b[4] & 0x7F;
        self.header.remote_muid = from_le7_u28([b[5], b[6], b[7], b[8]]);
        self.header.local_muid = from_le7_u28([b[9], b[10], b[11], b[12]]);
        trace!(
            "ci header: kind {:#04X} version {} from {:#09X} to {:#09X}",
            self.message_type,
            self.header.version,
            self.header.remote_muid,
            self.header.local_muid
        );

        debug_assert!(MESSAGES.windows(2).all(|w| (w[0].id as u8) < w[1].id as u8));
        match MESSAGES.binary_search_by_key(&self.message_type, |m| m.id as u8) {
            Err(_) => {
                // An unknown message type.
                self.stage = Stage::Discard;
                self.count = 0;
                let Config {
                    context, system, ..
                } = &mut self.config;
                system.unknown_midici(context, self.header);
            }
            Ok(index) => {
                let found = &MESSAGES[index];
                let gate = {
                    let Config {
                        context, system, ..
                    } = &mut self.config;
                    self.header.local_muid == BROADCAST_MUID
                        || system.check_muid(context, self.group, self.header.local_muid)
                };
                if !gate {
                    // The message wasn't intended for us.
                    self.stage = Stage::Discard;
                    self.count = 0;
                } else {
                    self.stage = found.stage;
                    self.count = usize::from(if self.header.version == 1 {
                        found.v1_size
                    } else {
                        found.v2_size
                    });
                    if self.count == 0 {
                        self.run_stage();
                    }
                }
            }
        }
        self.pos = 0;
    }

    fn decode_discovery_fields(&self) -> Discovery {
        let b = &self.buffer;
        Discovery {
            manufacturer: [b[0], b[1], b[2]],
            family: from_le7_u14([b[3], b[4]]),
            model: from_le7_u14([b[5], b[6]]),
            version: [b[7], b[8], b[9], b[10]],
            capability: b[11] & 0x7F,
            max_sysex_size: from_le7_u28([b[12], b[13], b[14], b[15]]),
            output_path_id: if self.pos >= 17 { b[16] & 0x7F } else { 0 },
        }
    }

    fn discovery_stage(&mut self) {
        let message = self.decode_discovery_fields();
        let Config {
            context, management, ..
        } = &mut self.config;
        management.discovery(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn discovery_reply_stage(&mut self) {
        let v1 = self.decode_discovery_fields();
        let message = DiscoveryReply {
            manufacturer: v1.manufacturer,
            family: v1.family,
            model: v1.model,
            version: v1.version,
            capability: v1.capability,
            max_sysex_size: v1.max_sysex_size,
            output_path_id: v1.output_path_id,
            function_block: if self.pos >= 18 {
                self.buffer[17] & 0x7F
            } else {
                0
            },
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.discovery_reply(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn endpoint_info_stage(&mut self) {
        let message = EndpointInfo {
            status: self.buffer[0] & 0x7F,
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.endpoint_info(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn endpoint_info_reply_stage(&mut self) {
        const PREFIX: usize = 3;
        let data_length = usize::from(from_le7_u14([self.buffer[1], self.buffer[2]]));
        if self.pos == PREFIX && data_length > 0 {
            // We have the fixed part; now collect the variable-length information field.
            self.count = data_length;
            return;
        }
        debug_assert!(self.pos == PREFIX + data_length);
        let message = EndpointInfoReply {
            status: self.buffer[0] & 0x7F,
            information: &self.buffer[PREFIX..PREFIX + data_length],
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.endpoint_info_reply(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn invalidate_muid_stage(&mut self) {
        let b = &self.buffer;
        let message = InvalidateMuid {
            target_muid: from_le7_u28([b[0], b[1], b[2], b[3]]),
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.invalidate_muid(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn ack_stage(&mut self) {
        const PREFIX: usize = 10;
        let message_length = usize::from(from_le7_u14([self.buffer[8], self.buffer[9]]));
        if self.pos == PREFIX && message_length > 0 {
            // We've got the fixed-size part of the message. Now wait for the text.
            self.count = message_length;
            return;
        }
        debug_assert!(self.pos == PREFIX + message_length);
        let b = &self.buffer;
        let message = Ack {
            original_id: b[0] & 0x7F,
            status_code: b[1] & 0x7F,
            status_data: b[2] & 0x7F,
            details: [b[3], b[4], b[5], b[6], b[7]],
            message: &b[PREFIX..PREFIX + message_length],
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.ack(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn nak_stage(&mut self) {
        if self.header.version == 1 {
            // A version 1 NAK is the bare header.
            let Config {
                context, management, ..
            } = &mut self.config;
            management.nak(context, self.header, Nak::default());
            self.stage = Stage::Discard;
            return;
        }
        const PREFIX: usize = 10;
        let message_length = usize::from(from_le7_u14([self.buffer[8], self.buffer[9]]));
        if self.pos == PREFIX && message_length > 0 {
            self.count = message_length;
            return;
        }
        debug_assert!(self.pos == PREFIX + message_length);
        let b = &self.buffer;
        let message = Nak {
            original_id: b[0] & 0x7F,
            status_code: b[1] & 0x7F,
            status_data: b[2] & 0x7F,
            details: [b[3], b[4], b[5], b[6], b[7]],
            message: &b[PREFIX..PREFIX + message_length],
        };
        let Config {
            context, management, ..
        } = &mut self.config;
        management.nak(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_inquiry_stage(&mut self) {
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.inquiry(context, self.header);
        self.stage = Stage::Discard;
    }

    fn profile_inquiry_reply_stage(&mut self) {
        const PREFIX: usize = 2;
        let num_enabled = usize::from(from_le7_u14([self.buffer[0], self.buffer[1]]));
        let enabled_size = num_enabled * profile::ID_SIZE;
        if self.pos == PREFIX {
            // Collect the enabled list along with the count that opens the disabled span.
            self.count = enabled_size + 2;
            return;
        }
        let pt2 = PREFIX + enabled_size;
        let num_disabled = usize::from(from_le7_u14([self.buffer[pt2], self.buffer[pt2 + 1]]));
        let disabled_size = num_disabled * profile::ID_SIZE;
        if self.pos == pt2 + 2 && num_disabled > 0 {
            self.count = disabled_size;
            return;
        }
        debug_assert!(self.pos == pt2 + 2 + disabled_size);
        let message = profile::InquiryReply {
            enabled: &self.buffer[PREFIX..pt2],
            disabled: &self.buffer[pt2 + 2..pt2 + 2 + disabled_size],
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.inquiry_reply(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_pid(&self) -> [u8; profile::ID_SIZE] {
        let b = &self.buffer;
        [b[0], b[1], b[2], b[3], b[4]]
    }

    /// The channel count that version 2 appends to the profile on/enabled/disabled messages.
    fn profile_num_channels(&self) -> u16 {
        if self.pos >= profile::ID_SIZE + 2 {
            from_le7_u14([self.buffer[5], self.buffer[6]])
        } else {
            0
        }
    }

    fn profile_added_stage(&mut self) {
        let message = profile::Added {
            pid: self.profile_pid(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.added(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_removed_stage(&mut self) {
        let message = profile::Removed {
            pid: self.profile_pid(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.removed(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_details_stage(&mut self) {
        let message = profile::Details {
            pid: self.profile_pid(),
            target: self.buffer[5] & 0x7F,
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.details(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_details_reply_stage(&mut self) {
        const PREFIX: usize = 8;
        let data_length = usize::from(from_le7_u14([self.buffer[6], self.buffer[7]]));
        if self.pos == PREFIX && data_length > 0 {
            self.count = data_length;
            return;
        }
        debug_assert!(self.pos == PREFIX + data_length);
        let message = profile::DetailsReply {
            pid: self.profile_pid(),
            target: self.buffer[5] & 0x7F,
            data: &self.buffer[PREFIX..PREFIX + data_length],
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.details_reply(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_on_stage(&mut self) {
        let message = profile::On {
            pid: self.profile_pid(),
            num_channels: self.profile_num_channels(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.on(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_off_stage(&mut self) {
        let message = profile::Off {
            pid: self.profile_pid(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.off(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_enabled_stage(&mut self) {
        let message = profile::Enabled {
            pid: self.profile_pid(),
            num_channels: self.profile_num_channels(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.enabled(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_disabled_stage(&mut self) {
        let message = profile::Disabled {
            pid: self.profile_pid(),
            num_channels: self.profile_num_channels(),
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.disabled(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn profile_specific_data_stage(&mut self) {
        const PREFIX: usize = 7;
        let data_length = usize::from(from_le7_u14([self.buffer[5], self.buffer[6]]));
        if self.pos == PREFIX && data_length > 0 {
            self.count = data_length;
            return;
        }
        debug_assert!(self.pos == PREFIX + data_length);
        let message = profile::SpecificData {
            pid: self.profile_pid(),
            data: &self.buffer[PREFIX..PREFIX + data_length],
        };
        let Config {
            context, profile, ..
        } = &mut self.config;
        profile.specific_data(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn decode_pe_capabilities(&self) -> property_exchange::Capabilities {
        let b = &self.buffer;
        property_exchange::Capabilities {
            num_simultaneous: b[0] & 0x7F,
            major_version: if self.pos >= 3 { b[1] & 0x7F } else { 0 },
            minor_version: if self.pos >= 3 { b[2] & 0x7F } else { 0 },
        }
    }

    fn pe_capabilities_stage(&mut self) {
        let message = self.decode_pe_capabilities();
        let Config {
            context,
            property_exchange,
            ..
        } = &mut self.config;
        property_exchange.capabilities(context, self.header, message);
        self.stage = Stage::Discard;
    }

    fn pe_capabilities_reply_stage(&mut self) {
        let v = self.decode_pe_capabilities();
        let message = property_exchange::CapabilitiesReply {
            num_simultaneous: v.num_simultaneous,
            major_version: v.major_version,
            minor_version: v.minor_version,
        };
        let Config {
            context,
            property_exchange,
            ..
        } = &mut self.config;
        property_exchange.capabilities_reply(context, self.header, message);
        self.stage = Stage::Discard;
    }

    /// All seven property exchange data messages share one wire shape: a fixed prefix, a header
    /// span, an inner chunk prefix, and a data span.
    fn property_exchange_stage(&mut self) {
        const PT1_PREFIX: usize = 3;
        const PT2_PREFIX: usize = 6;
        let header_length = usize::from(from_le7_u14([self.buffer[1], self.buffer[2]]));
        if self.pos == PT1_PREFIX && header_length > 0 {
            self.count = header_length;
            return;
        }
        let pt2 = PT1_PREFIX + header_length;
        if self.pos == pt2 {
            self.count = PT2_PREFIX;
            return;
        }
        let b = &self.buffer;
        let data_length = usize::from(from_le7_u14([b[pt2 + 4], b[pt2 + 5]]));
        let data_start = pt2 + PT2_PREFIX;
        if self.pos == data_start && data_length > 0 {
            self.count = data_length;
            return;
        }
        debug_assert!(self.pos == data_start + data_length);

        let chunk = property_exchange::ChunkInfo {
            number_of_chunks: from_le7_u14([b[pt2], b[pt2 + 1]]),
            chunk_number: from_le7_u14([b[pt2 + 2], b[pt2 + 3]]),
        };
        let request = b[0] & 0x7F;
        let pe_header = &b[PT1_PREFIX..PT1_PREFIX + header_length];
        let data = &b[data_start..data_start + data_length];

        let Config {
            context,
            property_exchange,
            ..
        } = &mut self.config;
        let header = self.header;
        match self.message_type {
            x if x == MessageId::PeGet as u8 => property_exchange.get(
                context,
                header,
                property_exchange::Get {
                    chunk,
                    request,
                    header: pe_header,
                },
            ),
            x if x == MessageId::PeGetReply as u8 => property_exchange.get_reply(
                context,
                header,
                property_exchange::GetReply {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            x if x == MessageId::PeSet as u8 => property_exchange.set(
                context,
                header,
                property_exchange::Set {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            x if x == MessageId::PeSetReply as u8 => property_exchange.set_reply(
                context,
                header,
                property_exchange::SetReply {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            x if x == MessageId::PeSub as u8 => property_exchange.subscription(
                context,
                header,
                property_exchange::Subscription {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            x if x == MessageId::PeSubReply as u8 => property_exchange.subscription_reply(
                context,
                header,
                property_exchange::SubscriptionReply {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            x if x == MessageId::PeNotify as u8 => property_exchange.notify(
                context,
                header,
                property_exchange::Notify {
                    chunk,
                    request,
                    header: pe_header,
                    data,
                },
            ),
            _ => debug_assert!(false, "not a property exchange kind"),
        }
        self.stage = Stage::Discard;
    }

    fn pi_capabilities_stage(&mut self) {
        if self.header.version > 1 {
            let Config {
                context,
                process_inquiry,
                ..
            } = &mut self.config;
            process_inquiry.capabilities(context, self.header);
        }
        self.stage = Stage::Discard;
    }

    fn pi_capabilities_reply_stage(&mut self) {
        if self.header.version > 1 {
            let message = process_inquiry::CapabilitiesReply {
                features: self.buffer[0] & 0x7F,
            };
            let Config {
                context,
                process_inquiry,
                ..
            } = &mut self.config;
            process_inquiry.capabilities_reply(context, self.header, message);
        }
        self.stage = Stage::Discard;
    }

    fn pi_mm_report_stage(&mut self) {
        if self.header.version > 1 {
            let b = &self.buffer;
            let message = process_inquiry::MidiMessageReport {
                message_data_control: b[0] & 0x7F,
                system_message_types: b[1] & 0x7F,
                other_message_types: b[2] & 0x7F,
                channel_controller_message_types: b[3] & 0x7F,
                note_data_message_types: b[4] & 0x7F,
            };
            let Config {
                context,
                process_inquiry,
                ..
            } = &mut self.config;
            process_inquiry.midi_message_report(context, self.header, message);
        }
        self.stage = Stage::Discard;
    }

    fn pi_mm_report_reply_stage(&mut self) {
        if self.header.version > 1 {
            let b = &self.buffer;
            let message = process_inquiry::MidiMessageReportReply {
                system_message_types: b[0] & 0x7F,
                other_message_types: b[1] & 0x7F,
                channel_controller_message_types: b[2] & 0x7F,
                note_data_message_types: b[3] & 0x7F,
            };
            let Config {
                context,
                process_inquiry,
                ..
            } = &mut self.config;
            process_inquiry.midi_message_report_reply(context, self.header, message);
        }
        self.stage = Stage::Discard;
    }

    fn pi_mm_report_end_stage(&mut self) {
        if self.header.version > 1 {
            let Config {
                context,
                process_inquiry,
                ..
            } = &mut self.config;
            process_inquiry.midi_message_report_end(context, self.header);
        }
        self.stage = Stage::Discard;
    }
}

#[cfg(test)]
mod dispatcher_tests {
    use super::*;
    use crate::ci::types::to_le7_u28;

    const MY_MUID: u32 = 0x0123_4567;

    #[derive(Debug, Default)]
    struct Log {
        discoveries: Vec<(Header, Discovery)>,
        acks: Vec<(u8, Vec<u8>)>,
        inquiries: usize,
        pe_gets: Vec<Vec<u8>>,
        pi_capabilities: usize,
        unknown: usize,
        overflows: usize,
        muid_checks: Vec<u32>,
    }

    fn dispatcher() -> CiDispatcher<FunctionConfig<Log>, 256> {
        let mut d = function_dispatcher::<Log, 256>(Log::default());
        d.config.system.on_check_muid(|log, _group, muid| {
            log.muid_checks.push(muid);
            muid == MY_MUID
        });
        d.config.system.on_unknown_midici(|log, _| log.unknown += 1);
        d.config.system.on_buffer_overflow(|log| log.overflows += 1);
        d.config
            .management
            .on_discovery(|log, header, m| log.discoveries.push((header, m)));
        d.config
            .management
            .on_ack(|log, _, m| log.acks.push((m.original_id, m.message.to_vec())));
        d.config.profile.on_inquiry(|log, _| log.inquiries += 1);
        d.config
            .property_exchange
            .on_get(|log, _, m| log.pe_gets.push(m.header.to_vec()));
        d.config
            .process_inquiry
            .on_capabilities(|log, _| log.pi_capabilities += 1);
        d
    }

    fn header_bytes(kind: u8, version: u8, source: u32, destination: u32) -> Vec<u8> {
        let mut bytes = vec![0x7E, 0x7F, 0x0D, kind, version];
        bytes.extend_from_slice(&to_le7_u28(source));
        bytes.extend_from_slice(&to_le7_u28(destination));
        bytes
    }

    fn run(d: &mut CiDispatcher<FunctionConfig<Log>, 256>, bytes: &[u8]) {
        d.start(0, 0x7F);
        for byte in bytes {
            d.dispatch(*byte);
        }
        d.finish();
    }

    #[test]
    fn discovery_request_is_decoded() {
        // The body: manufacturer, family, model, version, capability, max sysex size, output
        // path id.
        let mut bytes = header_bytes(0x70, 2, 0x00AC_5D12, BROADCAST_MUID);
        bytes.extend_from_slice(&[
            0x12, 0x23, 0x34, // manufacturer
            0x79, 0x2E, // family
            0x5D, 0x56, // model
            0x01, 0x00, 0x00, 0x00, // version
            0x7F, // capability
            0x00, 0x02, 0x00, 0x00, // max sysex size
            0x00, // output path id
        ]);
        let mut d = dispatcher();
        run(&mut d, &bytes);
        let log = &d.config.context;
        assert_eq!(log.discoveries.len(), 1);
        let (header, message) = &log.discoveries[0];
        assert_eq!(header.version, 2);
        assert_eq!(header.remote_muid, 0x00AC_5D12);
        assert_eq!(header.local_muid, BROADCAST_MUID);
        assert_eq!(header.device_id, 0x7F);
        assert_eq!(message.manufacturer, [0x12, 0x23, 0x34]);
        assert_eq!(message.family, 0x1779);
        assert_eq!(message.capability, 0x7F);
        assert_eq!(message.max_sysex_size, 0x100);
        assert_eq!(message.output_path_id, 0);
    }

    #[test]
    fn broadcast_skips_the_muid_check() {
        let mut d = dispatcher();
        let bytes = header_bytes(0x20, 2, 1, BROADCAST_MUID);
        run(&mut d, &bytes);
        assert_eq!(d.config.context.inquiries, 1);
        assert!(d.config.context.muid_checks.is_empty());
    }

    #[test]
    fn message_for_another_receiver_is_discarded() {
        let mut d = dispatcher();
        let bytes = header_bytes(0x20, 2, 1, 0x0BAD_F00D & 0x0FFF_FFFF);
        run(&mut d, &bytes);
        assert_eq!(d.config.context.inquiries, 0);
        assert_eq!(d.config.context.muid_checks.len(), 1);
    }

    #[test]
    fn message_for_us_is_delivered() {
        let mut d = dispatcher();
        let bytes = header_bytes(0x20, 2, 1, MY_MUID);
        run(&mut d, &bytes);
        assert_eq!(d.config.context.inquiries, 1);
    }

    #[test]
    fn unknown_kind_is_surfaced() {
        let mut d = dispatcher();
        // 0x50 is not a CI message kind.
        let bytes = header_bytes(0x50, 2, 1, BROADCAST_MUID);
        run(&mut d, &bytes);
        assert_eq!(d.config.context.unknown, 1);
    }

    #[test]
    fn ack_with_text_payload() {
        let mut bytes = header_bytes(0x7D, 2, 1, MY_MUID);
        bytes.extend_from_slice(&[
            0x34, // original transaction id
            0x00, // status code
            0x00, // status data
            0, 0, 0, 0, 0, // details
            0x05, 0x00, // message length = 5
            b'h', b'e', b'l', b'l', b'o',
        ]);
        let mut d = dispatcher();
        run(&mut d, &bytes);
        assert_eq!(d.config.context.acks, vec![(0x34, b"hello".to_vec())]);
    }

    #[test]
    fn ack_with_empty_payload() {
        let mut bytes = header_bytes(0x7D, 2, 1, MY_MUID);
        bytes.extend_from_slice(&[0x34, 0, 0, 0, 0, 0, 0, 0, 0x00, 0x00]);
        let mut d = dispatcher();
        run(&mut d, &bytes);
        assert_eq!(d.config.context.acks, vec![(0x34, Vec::new())]);
    }

    #[test]
    fn property_exchange_get_with_header_span() {
        let json = br#"{"resource":"DeviceInfo"}"#;
        let mut bytes = header_bytes(0x34, 2, 1, MY_MUID);
        bytes.push(0x01); // request id
        bytes.extend_from_slice(&crate::ci::types::to_le7_u14(json.len() as u16));
        bytes.extend_from_slice(json);
        bytes.extend_from_slice(&[0x01, 0x00]); // number of chunks
        bytes.extend_from_slice(&[0x01, 0x00]); // chunk number
        bytes.extend_from_slice(&[0x00, 0x00]); // data length = 0
        let mut d = dispatcher();
        run(&mut d, &bytes);
        assert_eq!(d.config.context.pe_gets, vec![json.to_vec()]);
    }

    #[test]
    fn process_inquiry_requires_version_two() {
        let mut d = dispatcher();
        run(&mut d, &header_bytes(0x40, 1, 1, MY_MUID));
        assert_eq!(d.config.context.pi_capabilities, 0);
        run(&mut d, &header_bytes(0x40, 2, 1, MY_MUID));
        assert_eq!(d.config.context.pi_capabilities, 1);
    }

    #[test]
    fn overflow_is_reported_then_discarded() {
        let mut d = function_dispatcher::<Log, 16>(Log::default());
        d.config.system.on_buffer_overflow(|log| log.overflows += 1);
        d.start(0, 0x7F);
        // An ACK addressed to broadcast whose message length exceeds the 16-byte buffer.
        let mut bytes = header_bytes(0x7D, 2, 1, BROADCAST_MUID);
        bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0x40, 0x00]);
        bytes.extend_from_slice(&[0u8; 0x40]);
        for byte in bytes {
            d.dispatch(byte);
        }
        d.finish();
        assert_eq!(d.config.context.overflows, 1);
    }

    #[test]
    fn two_messages_share_one_dispatcher_with_restart() {
        let mut d = dispatcher();
        run(&mut d, &header_bytes(0x20, 2, 1, MY_MUID));
        run(&mut d, &header_bytes(0x20, 2, 1, MY_MUID));
        assert_eq!(d.config.context.inquiries, 2);
    }

    #[test]
    fn trailing_bytes_after_a_message_are_ignored() {
        let mut bytes = header_bytes(0x20, 2, 1, MY_MUID);
        bytes.extend_from_slice(&[0x00, 0x01, 0x02]);
        let mut d = dispatcher();
        run(&mut d, &bytes);
        assert_eq!(d.config.context.inquiries, 1);
        assert_eq!(d.config.context.unknown, 0);
    }
}
