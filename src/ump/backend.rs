/*!

Handler bundles for the UMP dispatcher.

There is one backend trait per message group. Every method has a default empty body, so a backend
implements exactly the messages it cares about; the `*Null` unit structs implement nothing at all
and the `*Function` structs forward each message to an optionally installed closure.

All methods receive the shared context by mutable reference ahead of the decoded message.

!*/

use crate::ump::{data128, data64, flex_data, m1cvm, m2cvm, stream, system, utility};

/// Handlers for utility messages (MT `0x0`), plus the `unknown` sink that receives the raw words
/// of any message the dispatcher cannot classify, whatever its message type.
pub trait UtilityBackend<C> {
    /// 7.2.1 NOOP.
    fn noop(&mut self, _context: &mut C) {}
    /// 7.2.2.1 JR Clock.
    fn jr_clock(&mut self, _context: &mut C, _message: utility::JrClock) {}
    /// 7.2.2.2 JR Timestamp.
    fn jr_timestamp(&mut self, _context: &mut C, _message: utility::JrTimestamp) {}
    /// 7.2.3.1 Delta Clockstamp Ticks Per Quarter Note.
    fn delta_clockstamp_tpqn(&mut self, _context: &mut C, _message: utility::DeltaClockstampTpqn) {}
    /// 7.2.3.2 Delta Clockstamp.
    fn delta_clockstamp(&mut self, _context: &mut C, _message: utility::DeltaClockstamp) {}
    /// Any message with a reserved message type or an unrecognized status, delivered verbatim.
    fn unknown(&mut self, _context: &mut C, _words: &[u32]) {}
}

/// Handlers for system common and real-time messages (MT `0x1`).
pub trait SystemBackend<C> {
    fn midi_time_code(&mut self, _context: &mut C, _message: system::MidiTimeCode) {}
    fn song_position_pointer(&mut self, _context: &mut C, _message: system::SongPositionPointer) {}
    fn song_select(&mut self, _context: &mut C, _message: system::SongSelect) {}
    fn tune_request(&mut self, _context: &mut C, _message: system::TuneRequest) {}
    fn timing_clock(&mut self, _context: &mut C, _message: system::TimingClock) {}
    fn seq_start(&mut self, _context: &mut C, _message: system::SequenceStart) {}
    fn seq_continue(&mut self, _context: &mut C, _message: system::SequenceContinue) {}
    fn seq_stop(&mut self, _context: &mut C, _message: system::SequenceStop) {}
    fn active_sensing(&mut self, _context: &mut C, _message: system::ActiveSensing) {}
    fn reset(&mut self, _context: &mut C, _message: system::Reset) {}
}

/// Handlers for MIDI 1.0 channel-voice messages (MT `0x2`).
pub trait M1cvmBackend<C> {
    fn note_off(&mut self, _context: &mut C, _message: m1cvm::NoteOff) {}
    fn note_on(&mut self, _context: &mut C, _message: m1cvm::NoteOn) {}
    fn poly_pressure(&mut self, _context: &mut C, _message: m1cvm::PolyPressure) {}
    fn control_change(&mut self, _context: &mut C, _message: m1cvm::ControlChange) {}
    fn program_change(&mut self, _context: &mut C, _message: m1cvm::ProgramChange) {}
    fn channel_pressure(&mut self, _context: &mut C, _message: m1cvm::ChannelPressure) {}
    fn pitch_bend(&mut self, _context: &mut C, _message: m1cvm::PitchBend) {}
}

/// Handlers for 64-bit data messages (MT `0x3`).
pub trait Data64Backend<C> {
    fn sysex7_in_1(&mut self, _context: &mut C, _message: data64::Sysex7) {}
    fn sysex7_start(&mut self, _context: &mut C, _message: data64::Sysex7) {}
    fn sysex7_continue(&mut self, _context: &mut C, _message: data64::Sysex7) {}
    fn sysex7_end(&mut self, _context: &mut C, _message: data64::Sysex7) {}
}

/// Handlers for MIDI 2.0 channel-voice messages (MT `0x4`).
pub trait M2cvmBackend<C> {
    fn note_off(&mut self, _context: &mut C, _message: m2cvm::NoteOff) {}
    fn note_on(&mut self, _context: &mut C, _message: m2cvm::NoteOn) {}
    fn poly_pressure(&mut self, _context: &mut C, _message: m2cvm::PolyPressure) {}
    fn rpn_per_note_controller(
        &mut self,
        _context: &mut C,
        _message: m2cvm::RpnPerNoteController,
    ) {
    }
    fn nrpn_per_note_controller(
        &mut self,
        _context: &mut C,
        _message: m2cvm::NrpnPerNoteController,
    ) {
    }
    fn rpn_controller(&mut self, _context: &mut C, _message: m2cvm::RpnController) {}
    fn nrpn_controller(&mut self, _context: &mut C, _message: m2cvm::NrpnController) {}
    fn rpn_relative_controller(
        &mut self,
        _context: &mut C,
        _message: m2cvm::RpnRelativeController,
    ) {
    }
    fn nrpn_relative_controller(
        &mut self,
        _context: &mut C,
        _message: m2cvm::NrpnRelativeController,
    ) {
    }
    fn per_note_management(&mut self, _context: &mut C, _message: m2cvm::PerNoteManagement) {}
    fn control_change(&mut self, _context: &mut C, _message: m2cvm::ControlChange) {}
    fn program_change(&mut self, _context: &mut C, _message: m2cvm::ProgramChange) {}
    fn channel_pressure(&mut self, _context: &mut C, _message: m2cvm::ChannelPressure) {}
    fn pitch_bend(&mut self, _context: &mut C, _message: m2cvm::PitchBend) {}
    fn per_note_pitch_bend(&mut self, _context: &mut C, _message: m2cvm::PerNotePitchBend) {}
}

/// Handlers for 128-bit data messages (MT `0x5`).
pub trait Data128Backend<C> {
    fn sysex8_in_1(&mut self, _context: &mut C, _message: data128::Sysex8) {}
    fn sysex8_start(&mut self, _context: &mut C, _message: data128::Sysex8) {}
    fn sysex8_continue(&mut self, _context: &mut C, _message: data128::Sysex8) {}
    fn sysex8_end(&mut self, _context: &mut C, _message: data128::Sysex8) {}
    fn mds_header(&mut self, _context: &mut C, _message: data128::MdsHeader) {}
    fn mds_payload(&mut self, _context: &mut C, _message: data128::MdsPayload) {}
}

/// Handlers for UMP stream messages (MT `0xF`).
pub trait StreamBackend<C> {
    fn endpoint_discovery(&mut self, _context: &mut C, _message: stream::EndpointDiscovery) {}
    fn endpoint_info_notification(
        &mut self,
        _context: &mut C,
        _message: stream::EndpointInfoNotification,
    ) {
    }
    fn device_identity_notification(
        &mut self,
        _context: &mut C,
        _message: stream::DeviceIdentityNotification,
    ) {
    }
    fn endpoint_name_notification(
        &mut self,
        _context: &mut C,
        _message: stream::EndpointNameNotification,
    ) {
    }
    fn product_instance_id_notification(
        &mut self,
        _context: &mut C,
        _message: stream::ProductInstanceIdNotification,
    ) {
    }
    fn jr_configuration_request(
        &mut self,
        _context: &mut C,
        _message: stream::JrConfigurationRequest,
    ) {
    }
    fn jr_configuration_notification(
        &mut self,
        _context: &mut C,
        _message: stream::JrConfigurationNotification,
    ) {
    }
    fn function_block_discovery(
        &mut self,
        _context: &mut C,
        _message: stream::FunctionBlockDiscovery,
    ) {
    }
    fn function_block_info_notification(
        &mut self,
        _context: &mut C,
        _message: stream::FunctionBlockInfoNotification,
    ) {
    }
    fn function_block_name_notification(
        &mut self,
        _context: &mut C,
        _message: stream::FunctionBlockNameNotification,
    ) {
    }
    fn start_of_clip(&mut self, _context: &mut C, _message: stream::StartOfClip) {}
    fn end_of_clip(&mut self, _context: &mut C, _message: stream::EndOfClip) {}
}

/// Handlers for flex data messages (MT `0xD`).
pub trait FlexDataBackend<C> {
    fn set_tempo(&mut self, _context: &mut C, _message: flex_data::SetTempo) {}
    fn set_time_signature(&mut self, _context: &mut C, _message: flex_data::SetTimeSignature) {}
    fn set_metronome(&mut self, _context: &mut C, _message: flex_data::SetMetronome) {}
    fn set_key_signature(&mut self, _context: &mut C, _message: flex_data::SetKeySignature) {}
    fn set_chord_name(&mut self, _context: &mut C, _message: flex_data::SetChordName) {}
    fn text(&mut self, _context: &mut C, _message: flex_data::TextCommon) {}
}

/// A backend that ignores every utility message.
#[derive(Clone, Copy, Debug, Default)]
pub struct UtilityNull;
impl<C> UtilityBackend<C> for UtilityNull {}

/// A backend that ignores every system message.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemNull;
impl<C> SystemBackend<C> for SystemNull {}

/// A backend that ignores every MIDI 1.0 channel-voice message.
#[derive(Clone, Copy, Debug, Default)]
pub struct M1cvmNull;
impl<C> M1cvmBackend<C> for M1cvmNull {}

/// A backend that ignores every 64-bit data message.
#[derive(Clone, Copy, Debug, Default)]
pub struct Data64Null;
impl<C> Data64Backend<C> for Data64Null {}

/// A backend that ignores every MIDI 2.0 channel-voice message.
#[derive(Clone, Copy, Debug, Default)]
pub struct M2cvmNull;
impl<C> M2cvmBackend<C> for M2cvmNull {}

/// A backend that ignores every 128-bit data message.
#[derive(Clone, Copy, Debug, Default)]
pub struct Data128Null;
impl<C> Data128Backend<C> for Data128Null {}

/// A backend that ignores every stream message.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamNull;
impl<C> StreamBackend<C> for StreamNull {}

/// A backend that ignores every flex data message.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlexDataNull;
impl<C> FlexDataBackend<C> for FlexDataNull {}

function_backend! {
    /// Closure-backed utility handlers.
    pub struct UtilityFunction implements UtilityBackend {
        noop / on_noop ();
        jr_clock / on_jr_clock (message: utility::JrClock);
        jr_timestamp / on_jr_timestamp (message: utility::JrTimestamp);
        delta_clockstamp_tpqn / on_delta_clockstamp_tpqn (message: utility::DeltaClockstampTpqn);
        delta_clockstamp / on_delta_clockstamp (message: utility::DeltaClockstamp);
        unknown / on_unknown (words: &[u32]);
    }
}

function_backend! {
    /// Closure-backed system handlers.
    pub struct SystemFunction implements SystemBackend {
        midi_time_code / on_midi_time_code (message: system::MidiTimeCode);
        song_position_pointer / on_song_position_pointer (message: system::SongPositionPointer);
        song_select / on_song_select (message: system::SongSelect);
        tune_request / on_tune_request (message: system::TuneRequest);
        timing_clock / on_timing_clock (message: system::TimingClock);
        seq_start / on_seq_start (message: system::SequenceStart);
        seq_continue / on_seq_continue (message: system::SequenceContinue);
        seq_stop / on_seq_stop (message: system::SequenceStop);
        active_sensing / on_active_sensing (message: system::ActiveSensing);
        reset / on_reset (message: system::Reset);
    }
}

function_backend! {
    /// Closure-backed MIDI 1.0 channel-voice handlers.
    pub struct M1cvmFunction implements M1cvmBackend {
        note_off / on_note_off (message: m1cvm::NoteOff);
        note_on / on_note_on (message: m1cvm::NoteOn);
        poly_pressure / on_poly_pressure (message: m1cvm::PolyPressure);
        control_change / on_control_change (message: m1cvm::ControlChange);
        program_change / on_program_change (message: m1cvm::ProgramChange);
        channel_pressure / on_channel_pressure (message: m1cvm::ChannelPressure);
        pitch_bend / on_pitch_bend (message: m1cvm::PitchBend);
    }
}

function_backend! {
    /// Closure-backed 64-bit data handlers.
    pub struct Data64Function implements Data64Backend {
        sysex7_in_1 / on_sysex7_in_1 (message: data64::Sysex7);
        sysex7_start / on_sysex7_start (message: data64::Sysex7);
        sysex7_continue / on_sysex7_continue (message: data64::Sysex7);
        sysex7_end / on_sysex7_end (message: data64::Sysex7);
    }
}

function_backend! {
    /// Closure-backed MIDI 2.0 channel-voice handlers.
    pub struct M2cvmFunction implements M2cvmBackend {
        note_off / on_note_off (message: m2cvm::NoteOff);
        note_on / on_note_on (message: m2cvm::NoteOn);
        poly_pressure / on_poly_pressure (message: m2cvm::PolyPressure);
        rpn_per_note_controller / on_rpn_per_note_controller (message: m2cvm::RpnPerNoteController);
        nrpn_per_note_controller / on_nrpn_per_note_controller (message: m2cvm::NrpnPerNoteController);
        rpn_controller / on_rpn_controller (message: m2cvm::RpnController);
        nrpn_controller / on_nrpn_controller (message: m2cvm::NrpnController);
        rpn_relative_controller / on_rpn_relative_controller (message: m2cvm::RpnRelativeController);
        nrpn_relative_controller / on_nrpn_relative_controller (message: m2cvm::NrpnRelativeController);
        per_note_management / on_per_note_management (message: m2cvm::PerNoteManagement);
        control_change / on_control_change (message: m2cvm::ControlChange);
        program_change / on_program_change (message: m2cvm::ProgramChange);
        channel_pressure / on_channel_pressure (message: m2cvm::ChannelPressure);
        pitch_bend / on_pitch_bend (message: m2cvm::PitchBend);
        per_note_pitch_bend / on_per_note_pitch_bend (message: m2cvm::PerNotePitchBend);
    }
}

function_backend! {
    /// Closure-backed 128-bit data handlers.
    pub struct Data128Function implements Data128Backend {
        sysex8_in_1 / on_sysex8_in_1 (message: data128::Sysex8);
        sysex8_start / on_sysex8_start (message: data128::Sysex8);
        sysex8_continue / on_sysex8_continue (message: data128::Sysex8);
        sysex8_end / on_sysex8_end (message: data128::Sysex8);
        mds_header / on_mds_header (message: data128::MdsHeader);
        mds_payload / on_mds_payload (message: data128::MdsPayload);
    }
}

function_backend! {
    /// Closure-backed stream handlers.
    pub struct StreamFunction implements StreamBackend {
        endpoint_discovery / on_endpoint_discovery (message: stream::EndpointDiscovery);
        endpoint_info_notification / on_endpoint_info_notification (message: stream::EndpointInfoNotification);
        device_identity_notification / on_device_identity_notification (message: stream::DeviceIdentityNotification);
        endpoint_name_notification / on_endpoint_name_notification (message: stream::EndpointNameNotification);
        product_instance_id_notification / on_product_instance_id_notification (message: stream::ProductInstanceIdNotification);
        jr_configuration_request / on_jr_configuration_request (message: stream::JrConfigurationRequest);
        jr_configuration_notification / on_jr_configuration_notification (message: stream::JrConfigurationNotification);
        function_block_discovery / on_function_block_discovery (message: stream::FunctionBlockDiscovery);
        function_block_info_notification / on_function_block_info_notification (message: stream::FunctionBlockInfoNotification);
        function_block_name_notification / on_function_block_name_notification (message: stream::FunctionBlockNameNotification);
        start_of_clip / on_start_of_clip (message: stream::StartOfClip);
        end_of_clip / on_end_of_clip (message: stream::EndOfClip);
    }
}

function_backend! {
    /// Closure-backed flex data handlers.
    pub struct FlexDataFunction implements FlexDataBackend {
        set_tempo / on_set_tempo (message: flex_data::SetTempo);
        set_time_signature / on_set_time_signature (message: flex_data::SetTimeSignature);
        set_metronome / on_set_metronome (message: flex_data::SetMetronome);
        set_key_signature / on_set_key_signature (message: flex_data::SetKeySignature);
        set_chord_name / on_set_chord_name (message: flex_data::SetChordName);
        text / on_text (message: flex_data::TextCommon);
    }
}

#[cfg(test)]
mod backend_tests {
    use super::*;

    #[test]
    fn function_backend_without_handler_is_silent() {
        let mut backend = M1cvmFunction::<u32>::new();
        let mut context = 0u32;
        backend.note_on(&mut context, m1cvm::NoteOn::new());
        assert_eq!(context, 0);
    }

    #[test]
    fn function_backend_calls_installed_handler() {
        let mut backend = M1cvmFunction::<u32>::new();
        backend.on_note_on(|context, message| *context += u32::from(message.note()));
        let mut context = 0u32;
        backend.note_on(&mut context, m1cvm::NoteOn::new().with_note(60));
        backend.note_on(&mut context, m1cvm::NoteOn::new().with_note(7));
        assert_eq!(context, 67);
    }

    #[test]
    fn unknown_receives_raw_words() {
        let mut backend = UtilityFunction::<Vec<u32>>::new();
        backend.on_unknown(|context, words| context.extend_from_slice(words));
        let mut context = Vec::new();
        backend.unknown(&mut context, &[0x6000_0000]);
        assert_eq!(context, vec![0x6000_0000]);
    }
}
