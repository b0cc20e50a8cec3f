/*!

Up-conversion from MIDI 1.0 UMP to MIDI 2.0 UMP.

MIDI 1.0 channel-voice messages become their MT-4 forms with min-centre-max widening. The
translator aggregates the MIDI 1.0 compound controller sequences: bank-select MSB/LSB pairs fold
into the next program change, and the (N)RPN number plus data-entry sequence collapses into a
single registered/assignable controller message emitted when the data-entry LSB arrives.

A note-on with velocity zero stays a note-on with velocity zero here; rewriting it to a note-off
is the byte-stream parser's business, where the MIDI 1.0 convention actually applies.

Everything that is already MIDI 2.0 ready (utility, system, data, MT-4 channel voice, stream and
flex data) passes through unchanged.

!*/

use crate::adt::Fifo;
use crate::constants::*;
use crate::scale::scale_up;
use crate::ump::backend::{
    Data128Backend, Data64Backend, FlexDataBackend, M1cvmBackend, M2cvmBackend, StreamBackend,
    SystemBackend, UtilityBackend,
};
use crate::ump::{
    data128, data64, flex_data, m1cvm, m2cvm, stream, system, utility, Config, UmpDispatcher,
};

/// Bank-select state for one (group, channel).
#[derive(Clone, Copy, Debug, Default)]
struct Bank {
    msb_valid: bool,
    /// Set by the bank-select controller (CC 0).
    msb: u8,
    lsb_valid: bool,
    /// Set by the bank-select LSB controller (CC 32).
    lsb: u8,
}

impl Bank {
    fn set_msb(&mut self, value: u8) {
        debug_assert!(value < 0x80);
        self.msb = value;
        self.msb_valid = true;
    }

    fn set_lsb(&mut self, value: u8) {
        debug_assert!(value < 0x80);
        self.lsb = value;
        self.lsb_valid = true;
    }

    fn is_valid(&self) -> bool {
        self.lsb_valid && self.msb_valid
    }
}

/// The status of registered (RPN) or non-registered/assignable (NRPN) parameters for one
/// (group, channel).
#[derive(Clone, Copy, Debug, Default)]
struct ParameterNumber {
    /// Is this RPN or NRPN?
    is_rpn: bool,
    number_msb_valid: bool,
    /// Set by the RPN/NRPN MSB controller (CC 101/99).
    number_msb: u8,
    number_lsb_valid: bool,
    /// Set by the RPN/NRPN LSB controller (CC 100/98).
    number_lsb: u8,
    value_msb_valid: bool,
    /// Set by the data-entry MSB controller (CC 6).
    value_msb: u8,
}

impl ParameterNumber {
    fn set_number_msb(&mut self, value: u8) {
        debug_assert!(value < 0x80);
        self.number_msb = value;
        self.number_msb_valid = true;
    }

    fn set_number_lsb(&mut self, value: u8) {
        debug_assert!(value < 0x80);
        self.number_lsb = value;
        self.number_lsb_valid = true;
    }

    fn reset_number(&mut self) {
        self.number_msb_valid = false;
        self.number_msb = 0;
        self.number_lsb_valid = false;
        self.number_lsb = 0;
    }

    fn set_value_msb(&mut self, value: u8) {
        debug_assert!(value < 0x80);
        self.value_msb = value;
        self.value_msb_valid = true;
    }
}

#[derive(Debug)]
struct Context {
    bank: [[Bank; 16]; 16],
    parameter_number: [[ParameterNumber; 16]; 16],
    output: Fifo<u32, 4>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            bank: [[Bank::default(); 16]; 16],
            parameter_number: [[ParameterNumber::default(); 16]; 16],
            output: Fifo::new(),
        }
    }
}

impl Context {
    fn push1(&mut self, word: u32) {
        let _ = self.output.push_back(word);
    }

    fn push2(&mut self, words: [u32; 2]) {
        let _ = self.output.push_back(words[0]);
        let _ = self.output.push_back(words[1]);
    }

    fn push4(&mut self, words: [u32; 4]) {
        for word in words {
            let _ = self.output.push_back(word);
        }
    }
}

/// Utility messages pass straight through (a NOOP is consumed, bad messages are dropped).
#[derive(Debug, Default)]
struct Utility;

impl UtilityBackend<Context> for Utility {
    fn jr_clock(&mut self, context: &mut Context, message: utility::JrClock) {
        context.push1(message.word(0));
    }
    fn jr_timestamp(&mut self, context: &mut Context, message: utility::JrTimestamp) {
        context.push1(message.word(0));
    }
    fn delta_clockstamp_tpqn(&mut self, context: &mut Context, message: utility::DeltaClockstampTpqn) {
        context.push1(message.word(0));
    }
    fn delta_clockstamp(&mut self, context: &mut Context, message: utility::DeltaClockstamp) {
        context.push1(message.word(0));
    }
}

/// System messages pass straight through.
#[derive(Debug, Default)]
struct System;

impl SystemBackend<Context> for System {
    fn midi_time_code(&mut self, context: &mut Context, message: system::MidiTimeCode) {
        context.push1(message.word(0));
    }
    fn song_position_pointer(&mut self, context: &mut Context, message: system::SongPositionPointer) {
        context.push1(message.word(0));
    }
    fn song_select(&mut self, context: &mut Context, message: system::SongSelect) {
        context.push1(message.word(0));
    }
    fn tune_request(&mut self, context: &mut Context, message: system::TuneRequest) {
        context.push1(message.word(0));
    }
    fn timing_clock(&mut self, context: &mut Context, message: system::TimingClock) {
        context.push1(message.word(0));
    }
    fn seq_start(&mut self, context: &mut Context, message: system::SequenceStart) {
        context.push1(message.word(0));
    }
    fn seq_continue(&mut self, context: &mut Context, message: system::SequenceContinue) {
        context.push1(message.word(0));
    }
    fn seq_stop(&mut self, context: &mut Context, message: system::SequenceStop) {
        context.push1(message.word(0));
    }
    fn active_sensing(&mut self, context: &mut Context, message: system::ActiveSensing) {
        context.push1(message.word(0));
    }
    fn reset(&mut self, context: &mut Context, message: system::Reset) {
        context.push1(message.word(0));
    }
}

/// Data-64 messages pass straight through.
#[derive(Debug, Default)]
struct Data64;

impl Data64Backend<Context> for Data64 {
    fn sysex7_in_1(&mut self, context: &mut Context, message: data64::Sysex7) {
        context.push2(message.words());
    }
    fn sysex7_start(&mut self, context: &mut Context, message: data64::Sysex7) {
        context.push2(message.words());
    }
    fn sysex7_continue(&mut self, context: &mut Context, message: data64::Sysex7) {
        context.push2(message.words());
    }
    fn sysex7_end(&mut self, context: &mut Context, message: data64::Sysex7) {
        context.push2(message.words());
    }
}

/// MIDI 1.0 channel-voice messages are converted to MIDI 2.0.
#[derive(Debug, Default)]
struct M1cvm;

impl M1cvm {
    /// Emits the single MIDI 2.0 controller message for a completed (N)RPN sequence.
    fn pn_control_message(
        context: &mut Context,
        pn: ParameterNumber,
        group: u8,
        channel: u8,
        value_lsb: u8,
    ) {
        let value = scale_up(
            u32::from(pn.value_msb) << 7 | u32::from(value_lsb),
            14,
            32,
        );
        let words = if pn.is_rpn {
            m2cvm::RpnController::new()
                .with_group(group)
                .with_channel(channel)
                .with_bank(pn.number_msb)
                .with_index(pn.number_lsb)
                .with_value(value)
                .words()
        } else {
            m2cvm::NrpnController::new()
                .with_group(group)
                .with_channel(channel)
                .with_bank(pn.number_msb)
                .with_index(pn.number_lsb)
                .with_value(value)
                .words()
        };
        context.push2(words);
    }
}

impl M1cvmBackend<Context> for M1cvm {
    fn note_off(&mut self, context: &mut Context, message: m1cvm::NoteOff) {
        let out = m2cvm::NoteOff::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_attribute_type(0)
            .with_velocity(scale_up(u32::from(message.velocity()), 7, 16) as u16)
            .with_attribute(0);
        context.push2(out.words());
    }

    fn note_on(&mut self, context: &mut Context, message: m1cvm::NoteOn) {
        // A zero velocity stays zero: the byte-stream parser owns the velocity-0-is-note-off
        // rewrite.
        let out = m2cvm::NoteOn::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_attribute_type(0)
            .with_velocity(scale_up(u32::from(message.velocity()), 7, 16) as u16)
            .with_attribute(0);
        context.push2(out.words());
    }

    fn poly_pressure(&mut self, context: &mut Context, message: m1cvm::PolyPressure) {
        let out = m2cvm::PolyPressure::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_pressure(scale_up(u32::from(message.pressure()), 7, 32));
        context.push2(out.words());
    }

    fn control_change(&mut self, context: &mut Context, message: m1cvm::ControlChange) {
        let group = message.group();
        let channel = message.channel();
        let controller = message.controller();
        let value = message.value();

        let pn = &mut context.parameter_number[usize::from(group)][usize::from(channel)];
        match controller {
            CONTROL_BANK_SELECT => {
                context.bank[usize::from(group)][usize::from(channel)].set_msb(value)
            }
            CONTROL_BANK_SELECT_LSB => {
                context.bank[usize::from(group)][usize::from(channel)].set_lsb(value)
            }

            CONTROL_NRPN_MSB => {
                pn.is_rpn = false;
                pn.set_number_msb(value);
            }
            CONTROL_NRPN_LSB => {
                pn.is_rpn = false;
                pn.set_number_lsb(value);
            }

            CONTROL_RPN_MSB => {
                pn.is_rpn = true;
                pn.set_number_msb(value);
            }
            CONTROL_RPN_LSB => {
                // Setting RPN to 7FH,7FH will disable the data entry, data increment, and data
                // decrement controllers until a new RPN or NRPN is selected. (MIDI 1.0 Approved
                // Protocol JMSC-0011)
                if pn.is_rpn && pn.number_msb_valid && pn.number_msb == 0x7F && value == 0x7F {
                    pn.reset_number();
                } else {
                    pn.is_rpn = true;
                    pn.set_number_lsb(value);
                }
            }

            CONTROL_DATA_ENTRY_MSB => pn.set_value_msb(value),

            CONTROL_DATA_ENTRY_LSB => {
                if pn.number_msb_valid && pn.number_lsb_valid && pn.value_msb_valid {
                    let pn = *pn;
                    Self::pn_control_message(context, pn, group, channel, value);
                }
            }

            CONTROL_RESET_ALL_CONTROLLERS => {
                pn.reset_number();
                let out = m2cvm::ControlChange::new()
                    .with_group(group)
                    .with_channel(channel)
                    .with_controller(controller)
                    .with_value(scale_up(u32::from(value), 7, 32));
                context.push2(out.words());
            }

            _ => {
                let out = m2cvm::ControlChange::new()
                    .with_group(group)
                    .with_channel(channel)
                    .with_controller(controller)
                    .with_value(scale_up(u32::from(value), 7, 32));
                context.push2(out.words());
            }
        }
    }

    fn program_change(&mut self, context: &mut Context, message: m1cvm::ProgramChange) {
        let group = message.group();
        let channel = message.channel();
        let mut out = m2cvm::ProgramChange::new()
            .with_group(group)
            .with_channel(channel)
            .with_program(message.program());
        let bank = context.bank[usize::from(group)][usize::from(channel)];
        if bank.is_valid() {
            out = out
                .with_bank_valid(1)
                .with_bank_msb(bank.msb)
                .with_bank_lsb(bank.lsb);
        }
        context.push2(out.words());
    }

    fn channel_pressure(&mut self, context: &mut Context, message: m1cvm::ChannelPressure) {
        let out = m2cvm::ChannelPressure::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_data(scale_up(u32::from(message.data()), 7, 32));
        context.push2(out.words());
    }

    fn pitch_bend(&mut self, context: &mut Context, message: m1cvm::PitchBend) {
        let bend14 = u32::from(message.msb_data()) << 7 | u32::from(message.lsb_data());
        let out = m2cvm::PitchBend::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_value(scale_up(bend14, 14, 32));
        context.push2(out.words());
    }
}

/// MIDI 2.0 channel-voice messages pass straight through.
#[derive(Debug, Default)]
struct M2cvm;

impl M2cvmBackend<Context> for M2cvm {
    fn note_off(&mut self, context: &mut Context, message: m2cvm::NoteOff) {
        context.push2(message.words());
    }
    fn note_on(&mut self, context: &mut Context, message: m2cvm::NoteOn) {
        context.push2(message.words());
    }
    fn poly_pressure(&mut self, context: &mut Context, message: m2cvm::PolyPressure) {
        context.push2(message.words());
    }
    fn rpn_per_note_controller(&mut self, context: &mut Context, message: m2cvm::RpnPerNoteController) {
        context.push2(message.words());
    }
    fn nrpn_per_note_controller(&mut self, context: &mut Context, message: m2cvm::NrpnPerNoteController) {
        context.push2(message.words());
    }
    fn rpn_controller(&mut self, context: &mut Context, message: m2cvm::RpnController) {
        context.push2(message.words());
    }
    fn nrpn_controller(&mut self, context: &mut Context, message: m2cvm::NrpnController) {
        context.push2(message.words());
    }
    fn rpn_relative_controller(&mut self, context: &mut Context, message: m2cvm::RpnRelativeController) {
        context.push2(message.words());
    }
    fn nrpn_relative_controller(&mut self, context: &mut Context, message: m2cvm::NrpnRelativeController) {
        context.push2(message.words());
    }
    fn per_note_management(&mut self, context: &mut Context, message: m2cvm::PerNoteManagement) {
        context.push2(message.words());
    }
    fn control_change(&mut self, context: &mut Context, message: m2cvm::ControlChange) {
        context.push2(message.words());
    }
    fn program_change(&mut self, context: &mut Context, message: m2cvm::ProgramChange) {
        context.push2(message.words());
    }
    fn channel_pressure(&mut self, context: &mut Context, message: m2cvm::ChannelPressure) {
        context.push2(message.words());
    }
    fn pitch_bend(&mut self, context: &mut Context, message: m2cvm::PitchBend) {
        context.push2(message.words());
    }
    fn per_note_pitch_bend(&mut self, context: &mut Context, message: m2cvm::PerNotePitchBend) {
        context.push2(message.words());
    }
}

/// Data-128 messages pass straight through.
#[derive(Debug, Default)]
struct Data128;

impl Data128Backend<Context> for Data128 {
    fn sysex8_in_1(&mut self, context: &mut Context, message: data128::Sysex8) {
        context.push4(message.words());
    }
    fn sysex8_start(&mut self, context: &mut Context, message: data128::Sysex8) {
        context.push4(message.words());
    }
    fn sysex8_continue(&mut self, context: &mut Context, message: data128::Sysex8) {
        context.push4(message.words());
    }
    fn sysex8_end(&mut self, context: &mut Context, message: data128::Sysex8) {
        context.push4(message.words());
    }
    fn mds_header(&mut self, context: &mut Context, message: data128::MdsHeader) {
        context.push4(message.words());
    }
    fn mds_payload(&mut self, context: &mut Context, message: data128::MdsPayload) {
        context.push4(message.words());
    }
}

/// Stream messages pass straight through.
#[derive(Debug, Default)]
struct Stream;

impl StreamBackend<Context> for Stream {
    fn endpoint_discovery(&mut self, context: &mut Context, message: stream::EndpointDiscovery) {
        context.push4(message.words());
    }
    fn endpoint_info_notification(&mut self, context: &mut Context, message: stream::EndpointInfoNotification) {
        context.push4(message.words());
    }
    fn device_identity_notification(&mut self, context: &mut Context, message: stream::DeviceIdentityNotification) {
        context.push4(message.words());
    }
    fn endpoint_name_notification(&mut self, context: &mut Context, message: stream::EndpointNameNotification) {
        context.push4(message.words());
    }
    fn product_instance_id_notification(&mut self, context: &mut Context, message: stream::ProductInstanceIdNotification) {
        context.push4(message.words());
    }
    fn jr_configuration_request(&mut self, context: &mut Context, message: stream::JrConfigurationRequest) {
        context.push4(message.words());
    }
    fn jr_configuration_notification(&mut self, context: &mut Context, message: stream::JrConfigurationNotification) {
        context.push4(message.words());
    }
    fn function_block_discovery(&mut self, context: &mut Context, message: stream::FunctionBlockDiscovery) {
        context.push4(message.words());
    }
    fn function_block_info_notification(&mut self, context: &mut Context, message: stream::FunctionBlockInfoNotification) {
        context.push4(message.words());
    }
    fn function_block_name_notification(&mut self, context: &mut Context, message: stream::FunctionBlockNameNotification) {
        context.push4(message.words());
    }
    fn start_of_clip(&mut self, context: &mut Context, message: stream::StartOfClip) {
        context.push4(message.words());
    }
    fn end_of_clip(&mut self, context: &mut Context, message: stream::EndOfClip) {
        context.push4(message.words());
    }
}

/// Flex data messages pass straight through.
#[derive(Debug, Default)]
struct FlexData;

impl FlexDataBackend<Context> for FlexData {
    fn set_tempo(&mut self, context: &mut Context, message: flex_data::SetTempo) {
        context.push4(message.words());
    }
    fn set_time_signature(&mut self, context: &mut Context, message: flex_data::SetTimeSignature) {
        context.push4(message.words());
    }
    fn set_metronome(&mut self, context: &mut Context, message: flex_data::SetMetronome) {
        context.push4(message.words());
    }
    fn set_key_signature(&mut self, context: &mut Context, message: flex_data::SetKeySignature) {
        context.push4(message.words());
    }
    fn set_chord_name(&mut self, context: &mut Context, message: flex_data::SetChordName) {
        context.push4(message.words());
    }
    fn text(&mut self, context: &mut Context, message: flex_data::TextCommon) {
        context.push4(message.words());
    }
}

type Midi2Config =
    Config<Context, Utility, System, M1cvm, Data64, M2cvm, Data128, Stream, FlexData>;

/// The UMP to MIDI-2-in-UMP transcoder.
#[derive(Debug, Default)]
pub struct UmpToMidi2 {
    dispatcher: UmpDispatcher<Midi2Config>,
}

impl UmpToMidi2 {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when translated words are waiting to be read.
    pub fn available(&self) -> bool {
        !self.dispatcher.config.context.output.empty()
    }

    /// Removes and returns the oldest translated word. There must be one available.
    pub fn read(&mut self) -> u32 {
        self.dispatcher.config.context.output.pop_front()
    }

    /// Consumes one UMP word. Drain the output between pushes.
    pub fn push(&mut self, word: u32) {
        self.dispatcher.dispatch(word);
    }
}

#[cfg(test)]
mod to_midi2_tests {
    use super::*;
    use crate::scale::scale_up;

    fn convert(words: &[u32]) -> Vec<u32> {
        let mut translator = UmpToMidi2::new();
        let mut output = Vec::new();
        for word in words {
            translator.push(*word);
            while translator.available() {
                output.push(translator.read());
            }
        }
        output
    }

    #[test]
    fn note_on_scales_velocity_up() {
        let actual = convert(&[0x2081_6050]);
        assert_eq!(actual, vec![0x4081_6000, scale_up(0x50, 7, 16) << 16]);
    }

    #[test]
    fn note_on_velocity_zero_is_preserved() {
        let actual = convert(&[0x2093_3C00]);
        assert_eq!(actual, vec![0x4093_3C00, 0x0000_0000]);
    }

    #[test]
    fn note_off_scales_velocity_up() {
        let actual = convert(&[0x2081_607F]);
        assert_eq!(actual, vec![0x4081_6000, 0xFFFF_0000]);
    }

    #[test]
    fn poly_pressure_scales_up() {
        let actual = convert(&[0x20A1_3C40]);
        assert_eq!(actual, vec![0x40A1_3C00, scale_up(0x40, 7, 32)]);
    }

    #[test]
    fn channel_pressure_scales_up() {
        let actual = convert(&[0x20D5_3900]);
        assert_eq!(actual, vec![0x40D5_0000, scale_up(57, 7, 32)]);
    }

    #[test]
    fn pitch_bend_concatenates_then_scales() {
        let actual = convert(&[0x20E3_0040]);
        assert_eq!(actual, vec![0x40E3_0000, 0x8000_0000]);
    }

    #[test]
    fn plain_control_change_scales_up() {
        let actual = convert(&[0x20B1_0764]);
        assert_eq!(actual, vec![0x40B1_0700, scale_up(100, 7, 32)]);
    }

    #[test]
    fn bank_select_folds_into_program_change() {
        let actual = convert(&[0x20BF_0051, 0x20BF_2001, 0x20CF_4200]);
        assert_eq!(actual, vec![0x40CF_0001, 0x4200_5101]);
    }

    #[test]
    fn program_change_without_bank() {
        let actual = convert(&[0x20C6_4000]);
        assert_eq!(actual, vec![0x40C6_0000, 0x4000_0000]);
    }

    #[test]
    fn bank_msb_alone_is_not_enough() {
        let actual = convert(&[0x20BF_0051, 0x20CF_4200]);
        assert_eq!(actual, vec![0x40CF_0000, 0x4200_0000]);
    }

    #[test]
    fn rpn_sequence_collapses_to_one_message() {
        // CC 101=0, CC 100=6, CC 6=0x12, CC 38=0x34.
        let actual = convert(&[0x20B0_6500, 0x20B0_6406, 0x20B0_0612, 0x20B0_2634]);
        assert_eq!(
            actual,
            vec![0x4020_0006, scale_up(0x12 << 7 | 0x34, 14, 32)]
        );
    }

    #[test]
    fn nrpn_sequence_collapses_to_one_message() {
        let actual = convert(&[0x20B0_6300, 0x20B0_6206, 0x20B0_0612, 0x20B0_2634]);
        assert_eq!(
            actual,
            vec![0x4030_0006, scale_up(0x12 << 7 | 0x34, 14, 32)]
        );
    }

    #[test]
    fn data_entry_without_a_selected_number_is_silent() {
        let actual = convert(&[0x20B0_0612, 0x20B0_2634]);
        assert_eq!(actual, vec![]);
    }

    #[test]
    fn data_entry_lsb_without_value_msb_is_silent() {
        let actual = convert(&[0x20B0_6500, 0x20B0_6406, 0x20B0_2634]);
        assert_eq!(actual, vec![]);
    }

    #[test]
    fn null_rpn_clears_the_selected_number() {
        // Select RPN 0x7F/0x7F (the null parameter), then try a data entry.
        let actual = convert(&[0x20B0_657F, 0x20B0_647F, 0x20B0_0612, 0x20B0_2634]);
        assert_eq!(actual, vec![]);
    }

    #[test]
    fn reset_all_controllers_clears_parameter_state_and_passes_through() {
        let actual = convert(&[
            0x20B0_6500, // RPN MSB 0
            0x20B0_6406, // RPN LSB 6
            0x20B0_7900, // reset all controllers
            0x20B0_0612, // data entry MSB
            0x20B0_2634, // data entry LSB: number was cleared, nothing comes out
        ]);
        assert_eq!(actual, vec![0x40B0_7900, 0x0000_0000]);
    }

    #[test]
    fn m2cvm_passes_through() {
        let input = [0x4093_3C00, 0xC104_0000];
        assert_eq!(convert(&input), input.to_vec());
    }

    #[test]
    fn sysex_passes_through() {
        let input = [0x3016_7E7F, 0x0D70_024B];
        assert_eq!(convert(&input), input.to_vec());
    }

    #[test]
    fn system_passes_through() {
        assert_eq!(convert(&[0x10FA_0000]), vec![0x10FA_0000]);
    }

    #[test]
    fn stream_passes_through() {
        let input = [0xF000_0101, 0x0000_001F, 0, 0];
        assert_eq!(convert(&input), input.to_vec());
    }

    #[test]
    fn per_group_state_is_independent() {
        // Bank select on group 0 must not affect a program change on group 1.
        let actual = convert(&[0x20BF_0051, 0x20BF_2001, 0x21CF_4200]);
        assert_eq!(actual, vec![0x41CF_0000, 0x4200_0000]);
    }
}
