/*!

The UMP dispatcher: a word accumulator that infers each message's length from its message-type
nibble, reassembles multi-word messages, and routes the completed message to the right handler.

Reserved message types still consume their full word count so that the stream stays framed; their
words are handed to the utility backend's `unknown` sink.

!*/

use crate::ump::backend::{
    Data128Backend, Data128Function, Data64Backend, Data64Function, FlexDataBackend,
    FlexDataFunction, M1cvmBackend, M1cvmFunction, M2cvmBackend, M2cvmFunction, StreamBackend,
    StreamFunction, SystemBackend, SystemFunction, UtilityBackend, UtilityFunction,
};
use crate::ump::{data128, data64, flex_data, m1cvm, m2cvm, stream, system, utility, MessageType};
use crate::constants::*;
use log::trace;

/// The configuration of a [`UmpDispatcher`]: a context value shared by every callback plus one
/// backend per message group.
#[derive(Clone, Debug, Default)]
pub struct Config<Ctx, U, S, M1, D64, M2, D128, St, F> {
    pub context: Ctx,
    pub utility: U,
    pub system: S,
    pub m1cvm: M1,
    pub data64: D64,
    pub m2cvm: M2,
    pub data128: D128,
    pub stream: St,
    pub flex: F,
}

/// A configuration in which every backend is closure-backed. This is the simplest possible
/// configuration to use, though rarely the most compact in memory: install only the handlers you
/// need with the `on_*` methods.
pub type FunctionConfig<Ctx> = Config<
    Ctx,
    UtilityFunction<Ctx>,
    SystemFunction<Ctx>,
    M1cvmFunction<Ctx>,
    Data64Function<Ctx>,
    M2cvmFunction<Ctx>,
    Data128Function<Ctx>,
    StreamFunction<Ctx>,
    FlexDataFunction<Ctx>,
>;

impl<Ctx> FunctionConfig<Ctx> {
    pub fn new(context: Ctx) -> Self {
        Config {
            context,
            utility: UtilityFunction::new(),
            system: SystemFunction::new(),
            m1cvm: M1cvmFunction::new(),
            data64: Data64Function::new(),
            m2cvm: M2cvmFunction::new(),
            data128: Data128Function::new(),
            stream: StreamFunction::new(),
            flex: FlexDataFunction::new(),
        }
    }
}

/// Builds a dispatcher whose handlers are all closure-backed.
pub fn function_dispatcher<Ctx>(context: Ctx) -> UmpDispatcher<FunctionConfig<Ctx>> {
    UmpDispatcher::new(FunctionConfig::new(context))
}

/// The word-accumulating dispatcher. It holds at most four words: the words of the message
/// currently being assembled.
#[derive(Clone, Debug, Default)]
pub struct UmpDispatcher<Cfg> {
    message: [u32; 4],
    pos: usize,
    pub config: Cfg,
}

impl<Ctx, U, S, M1, D64, M2, D128, St, F>
    UmpDispatcher<Config<Ctx, U, S, M1, D64, M2, D128, St, F>>
where
    U: UtilityBackend<Ctx>,
    S: SystemBackend<Ctx>,
    M1: M1cvmBackend<Ctx>,
    D64: Data64Backend<Ctx>,
    M2: M2cvmBackend<Ctx>,
    D128: Data128Backend<Ctx>,
    St: StreamBackend<Ctx>,
    F: FlexDataBackend<Ctx>,
{
    pub fn new(config: Config<Ctx, U, S, M1, D64, M2, D128, St, F>) -> Self {
        Self {
            message: [0; 4],
            pos: 0,
            config,
        }
    }

    /// Discards any partially assembled message.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.message = [0; 4];
    }

    /// Consumes one word. When the word completes a message, the message is decoded and the
    /// corresponding handler runs before this call returns.
    pub fn dispatch(&mut self, word: u32) {
        debug_assert!(self.pos < self.message.len());
        self.message[self.pos] = word;
        self.pos += 1;
        let mt = MessageType::of_word(self.message[0]);
        if self.pos < mt.word_count() {
            return;
        }
        trace!("dispatching {:?} message, {} words", mt, self.pos);
        match mt {
            MessageType::Utility => self.utility_message(),
            MessageType::System => self.system_message(),
            MessageType::M1cvm => self.m1cvm_message(),
            MessageType::Data64 => self.data64_message(),
            MessageType::M2cvm => self.m2cvm_message(),
            MessageType::Data128 => self.data128_message(),
            MessageType::FlexData => self.flex_data_message(),
            MessageType::Stream => self.stream_message(),
            _ => self.unknown(),
        }
        self.pos = 0;
    }

    fn unknown(&mut self) {
        let Config {
            context, utility, ..
        } = &mut self.config;
        utility.unknown(context, &self.message[..self.pos]);
    }

    fn utility_message(&mut self) {
        let w = [self.message[0]];
        let Config {
            context, utility, ..
        } = &mut self.config;
        match ((w[0] >> 20) & 0xF) as u8 {
            utility::STATUS_NOOP => utility.noop(context),
            utility::STATUS_JR_CLOCK => utility.jr_clock(context, utility::JrClock::from_words(w)),
            utility::STATUS_JR_TIMESTAMP => {
                utility.jr_timestamp(context, utility::JrTimestamp::from_words(w))
            }
            utility::STATUS_DELTA_CLOCKSTAMP_TPQN => {
                utility.delta_clockstamp_tpqn(context, utility::DeltaClockstampTpqn::from_words(w))
            }
            utility::STATUS_DELTA_CLOCKSTAMP => {
                utility.delta_clockstamp(context, utility::DeltaClockstamp::from_words(w))
            }
            _ => utility.unknown(context, &w),
        }
    }

    fn system_message(&mut self) {
        let w = [self.message[0]];
        let Config {
            context,
            utility,
            system,
            ..
        } = &mut self.config;
        match ((w[0] >> 16) & 0xFF) as u8 {
            STATUS_TIMING_CODE => {
                system.midi_time_code(context, system::MidiTimeCode::from_words(w))
            }
            STATUS_SPP => {
                system.song_position_pointer(context, system::SongPositionPointer::from_words(w))
            }
            STATUS_SONG_SELECT => system.song_select(context, system::SongSelect::from_words(w)),
            STATUS_TUNE_REQUEST => system.tune_request(context, system::TuneRequest::from_words(w)),
            STATUS_TIMING_CLOCK => system.timing_clock(context, system::TimingClock::from_words(w)),
            STATUS_SEQ_START => system.seq_start(context, system::SequenceStart::from_words(w)),
            STATUS_SEQ_CONTINUE => {
                system.seq_continue(context, system::SequenceContinue::from_words(w))
            }
            STATUS_SEQ_STOP => system.seq_stop(context, system::SequenceStop::from_words(w)),
            STATUS_ACTIVE_SENSING => {
                system.active_sensing(context, system::ActiveSensing::from_words(w))
            }
            STATUS_SYSTEM_RESET => system.reset(context, system::Reset::from_words(w)),
            _ => utility.unknown(context, &w),
        }
    }

    fn m1cvm_message(&mut self) {
        let w = [self.message[0]];
        let Config {
            context,
            utility,
            m1cvm,
            ..
        } = &mut self.config;
        match (((w[0] >> 20) & 0xF) as u8) << 4 {
            STATUS_NOTE_OFF => m1cvm.note_off(context, m1cvm::NoteOff::from_words(w)),
            STATUS_NOTE_ON => m1cvm.note_on(context, m1cvm::NoteOn::from_words(w)),
            STATUS_KEY_PRESSURE => m1cvm.poly_pressure(context, m1cvm::PolyPressure::from_words(w)),
            STATUS_CC => m1cvm.control_change(context, m1cvm::ControlChange::from_words(w)),
            STATUS_PROGRAM_CHANGE => {
                m1cvm.program_change(context, m1cvm::ProgramChange::from_words(w))
            }
            STATUS_CHANNEL_PRESSURE => {
                m1cvm.channel_pressure(context, m1cvm::ChannelPressure::from_words(w))
            }
            STATUS_PITCH_BEND => m1cvm.pitch_bend(context, m1cvm::PitchBend::from_words(w)),
            _ => utility.unknown(context, &w),
        }
    }

    fn data64_message(&mut self) {
        let w = [self.message[0], self.message[1]];
        let Config {
            context,
            utility,
            data64,
            ..
        } = &mut self.config;
        let message = data64::Sysex7::from_words(w);
        match ((w[0] >> 20) & 0xF) as u8 {
            data64::STATUS_SYSEX7_IN_1 => data64.sysex7_in_1(context, message),
            data64::STATUS_SYSEX7_START => data64.sysex7_start(context, message),
            data64::STATUS_SYSEX7_CONTINUE => data64.sysex7_continue(context, message),
            data64::STATUS_SYSEX7_END => data64.sysex7_end(context, message),
            _ => utility.unknown(context, &w),
        }
    }

    fn m2cvm_message(&mut self) {
        let w = [self.message[0], self.message[1]];
        let Config {
            context,
            utility,
            m2cvm,
            ..
        } = &mut self.config;
        match (((w[0] >> 20) & 0xF) as u8) << 4 {
            // 7.4.4 Registered/Assignable Per-Note Controller
            M2STATUS_RPN_PER_NOTE => {
                m2cvm.rpn_per_note_controller(context, m2cvm::RpnPerNoteController::from_words(w))
            }
            M2STATUS_NRPN_PER_NOTE => {
                m2cvm.nrpn_per_note_controller(context, m2cvm::NrpnPerNoteController::from_words(w))
            }
            // 7.4.7 Registered (RPN) and Assignable (NRPN) Controller
            M2STATUS_RPN => m2cvm.rpn_controller(context, m2cvm::RpnController::from_words(w)),
            M2STATUS_NRPN => m2cvm.nrpn_controller(context, m2cvm::NrpnController::from_words(w)),
            // 7.4.8 Relative Registered and Assignable Controller
            M2STATUS_RPN_RELATIVE => {
                m2cvm.rpn_relative_controller(context, m2cvm::RpnRelativeController::from_words(w))
            }
            M2STATUS_NRPN_RELATIVE => m2cvm
                .nrpn_relative_controller(context, m2cvm::NrpnRelativeController::from_words(w)),
            // 7.4.12 Per-Note Pitch Bend
            M2STATUS_PITCH_BEND_PER_NOTE => {
                m2cvm.per_note_pitch_bend(context, m2cvm::PerNotePitchBend::from_words(w))
            }
            // 7.4.5 Per-Note Management
            M2STATUS_PER_NOTE_MANAGE => {
                m2cvm.per_note_management(context, m2cvm::PerNoteManagement::from_words(w))
            }
            STATUS_NOTE_OFF => m2cvm.note_off(context, m2cvm::NoteOff::from_words(w)),
            STATUS_NOTE_ON => m2cvm.note_on(context, m2cvm::NoteOn::from_words(w)),
            STATUS_KEY_PRESSURE => m2cvm.poly_pressure(context, m2cvm::PolyPressure::from_words(w)),
            STATUS_CC => m2cvm.control_change(context, m2cvm::ControlChange::from_words(w)),
            STATUS_PROGRAM_CHANGE => {
                m2cvm.program_change(context, m2cvm::ProgramChange::from_words(w))
            }
            STATUS_CHANNEL_PRESSURE => {
                m2cvm.channel_pressure(context, m2cvm::ChannelPressure::from_words(w))
            }
            STATUS_PITCH_BEND => m2cvm.pitch_bend(context, m2cvm::PitchBend::from_words(w)),
            _ => utility.unknown(context, &w),
        }
    }

    fn data128_message(&mut self) {
        let w = self.message;
        let Config {
            context,
            utility,
            data128,
            ..
        } = &mut self.config;
        match ((w[0] >> 20) & 0xF) as u8 {
            data128::STATUS_SYSEX8_IN_1 => {
                data128.sysex8_in_1(context, data128::Sysex8::from_words(w))
            }
            data128::STATUS_SYSEX8_START => {
                data128.sysex8_start(context, data128::Sysex8::from_words(w))
            }
            data128::STATUS_SYSEX8_CONTINUE => {
                data128.sysex8_continue(context, data128::Sysex8::from_words(w))
            }
            data128::STATUS_SYSEX8_END => {
                data128.sysex8_end(context, data128::Sysex8::from_words(w))
            }
            data128::STATUS_MDS_HEADER => {
                data128.mds_header(context, data128::MdsHeader::from_words(w))
            }
            data128::STATUS_MDS_PAYLOAD => {
                data128.mds_payload(context, data128::MdsPayload::from_words(w))
            }
            _ => utility.unknown(context, &w),
        }
    }

    fn stream_message(&mut self) {
        let w = self.message;
        let Config {
            context,
            utility,
            stream,
            ..
        } = &mut self.config;
        match ((w[0] >> 16) & 0x3FF) as u16 {
            stream::STATUS_ENDPOINT_DISCOVERY => {
                stream.endpoint_discovery(context, stream::EndpointDiscovery::from_words(w))
            }
            stream::STATUS_ENDPOINT_INFO_NOTIFICATION => stream
                .endpoint_info_notification(context, stream::EndpointInfoNotification::from_words(w)),
            stream::STATUS_DEVICE_IDENTITY_NOTIFICATION => stream.device_identity_notification(
                context,
                stream::DeviceIdentityNotification::from_words(w),
            ),
            stream::STATUS_ENDPOINT_NAME_NOTIFICATION => stream
                .endpoint_name_notification(context, stream::EndpointNameNotification::from_words(w)),
            stream::STATUS_PRODUCT_INSTANCE_ID_NOTIFICATION => stream
                .product_instance_id_notification(
                    context,
                    stream::ProductInstanceIdNotification::from_words(w),
                ),
            stream::STATUS_JR_CONFIGURATION_REQUEST => stream
                .jr_configuration_request(context, stream::JrConfigurationRequest::from_words(w)),
            stream::STATUS_JR_CONFIGURATION_NOTIFICATION => stream.jr_configuration_notification(
                context,
                stream::JrConfigurationNotification::from_words(w),
            ),
            stream::STATUS_FUNCTION_BLOCK_DISCOVERY => stream
                .function_block_discovery(context, stream::FunctionBlockDiscovery::from_words(w)),
            stream::STATUS_FUNCTION_BLOCK_INFO_NOTIFICATION => stream
                .function_block_info_notification(
                    context,
                    stream::FunctionBlockInfoNotification::from_words(w),
                ),
            stream::STATUS_FUNCTION_BLOCK_NAME_NOTIFICATION => stream
                .function_block_name_notification(
                    context,
                    stream::FunctionBlockNameNotification::from_words(w),
                ),
            stream::STATUS_START_OF_CLIP => {
                stream.start_of_clip(context, stream::StartOfClip::from_words(w))
            }
            stream::STATUS_END_OF_CLIP => {
                stream.end_of_clip(context, stream::EndOfClip::from_words(w))
            }
            _ => utility.unknown(context, &w),
        }
    }

    fn flex_data_message(&mut self) {
        let w = self.message;
        let Config {
            context,
            utility,
            flex,
            ..
        } = &mut self.config;
        let status_bank = ((w[0] >> 8) & 0xFF) as u8;
        if status_bank != flex_data::BANK_SETUP_AND_PERFORMANCE {
            flex.text(context, flex_data::TextCommon::from_words(w));
            return;
        }
        match (w[0] & 0xFF) as u8 {
            flex_data::STATUS_SET_TEMPO => {
                flex.set_tempo(context, flex_data::SetTempo::from_words(w))
            }
            flex_data::STATUS_SET_TIME_SIGNATURE => {
                flex.set_time_signature(context, flex_data::SetTimeSignature::from_words(w))
            }
            flex_data::STATUS_SET_METRONOME => {
                flex.set_metronome(context, flex_data::SetMetronome::from_words(w))
            }
            flex_data::STATUS_SET_KEY_SIGNATURE => {
                flex.set_key_signature(context, flex_data::SetKeySignature::from_words(w))
            }
            flex_data::STATUS_SET_CHORD_NAME => {
                flex.set_chord_name(context, flex_data::SetChordName::from_words(w))
            }
            _ => utility.unknown(context, &w),
        }
    }
}

#[cfg(test)]
mod dispatcher_tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counts {
        note_on: usize,
        note_off: usize,
        unknown_words: Vec<u32>,
        sysex_bytes: usize,
        noop: usize,
    }

    fn dispatcher() -> UmpDispatcher<FunctionConfig<Counts>> {
        let mut d = function_dispatcher(Counts::default());
        d.config.m1cvm.on_note_on(|c, _| c.note_on += 1);
        d.config.m1cvm.on_note_off(|c, _| c.note_off += 1);
        d.config.m2cvm.on_note_on(|c, _| c.note_on += 1);
        d.config
            .utility
            .on_unknown(|c, words| c.unknown_words.extend_from_slice(words));
        d.config
            .data64
            .on_sysex7_in_1(|c, m| c.sysex_bytes += m.number_of_bytes() as usize);
        d.config.utility.on_noop(|c| c.noop += 1);
        d
    }

    #[test]
    fn one_word_message_dispatches_immediately() {
        let mut d = dispatcher();
        d.dispatch(0x2081_6050);
        assert_eq!(d.config.context.note_on, 1);
    }

    #[test]
    fn two_word_message_waits_for_the_second_word() {
        let mut d = dispatcher();
        d.dispatch(0x4093_3C00);
        assert_eq!(d.config.context.note_on, 0);
        d.dispatch(0xC104_0000);
        assert_eq!(d.config.context.note_on, 1);
    }

    #[test]
    fn reserved_message_types_consume_their_words() {
        let mut d = dispatcher();
        // MT 0xB is a reserved 3-word type; the note-on afterwards must still decode.
        d.dispatch(0xB000_0001);
        d.dispatch(0x0000_0002);
        d.dispatch(0x0000_0003);
        assert_eq!(
            d.config.context.unknown_words,
            vec![0xB000_0001, 0x0000_0002, 0x0000_0003]
        );
        d.dispatch(0x2081_6050);
        assert_eq!(d.config.context.note_on, 1);
    }

    #[test]
    fn unknown_status_in_known_type_goes_to_unknown() {
        let mut d = dispatcher();
        // M2 CVM with the reserved status nibble 0x7.
        d.dispatch(0x4070_0000);
        d.dispatch(0x0000_0000);
        assert_eq!(d.config.context.unknown_words, vec![0x4070_0000, 0x0000_0000]);
    }

    #[test]
    fn noop_has_its_own_callback() {
        let mut d = dispatcher();
        d.dispatch(0x0000_0000);
        assert_eq!(d.config.context.noop, 1);
    }

    #[test]
    fn sysex_in_one_carries_byte_count() {
        let mut d = dispatcher();
        d.dispatch(0x3005_0102);
        d.dispatch(0x0304_0500);
        assert_eq!(d.config.context.sysex_bytes, 5);
    }

    #[test]
    fn reset_discards_partial_message() {
        let mut d = dispatcher();
        d.dispatch(0x4093_3C00);
        d.reset();
        // The next word starts a fresh message rather than completing the note-on.
        d.dispatch(0x2081_6050);
        assert_eq!(d.config.context.note_on, 1);
        assert!(d.config.context.unknown_words.is_empty());
    }
}
