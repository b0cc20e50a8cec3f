/*!

Down-conversion from MIDI 2.0 UMP to MIDI 1.0 UMP.

Every MIDI 2.0 channel-voice message with a MIDI 1.0 equivalent is rewritten as its MT-2 form;
per-note controllers, per-note pitch bend, per-note management and relative controllers have no
equivalent and are dropped silently. Utility, system, data-64 and MT-2 messages pass through
unchanged.

Registered and assignable controller messages expand to the MIDI 1.0 four-CC compound sequence.
A small PLRU cache remembers the last parameter number selected per (group, channel, kind); when
consecutive messages address the same parameter, the two number-select CCs are elided and only the
data-entry pair is re-sent. A cache miss at worst re-sends two CCs that are harmless on the wire.

!*/

use crate::adt::{Fifo, PlruCache};
use crate::constants::*;
use crate::scale::scale_down;
use crate::ump::backend::{
    Data128Null, Data64Backend, FlexDataNull, M1cvmBackend, M2cvmBackend, StreamNull,
    SystemBackend, UtilityBackend,
};
use crate::ump::{data64, m1cvm, m2cvm, system, utility, Config, UmpDispatcher};

/// The last parameter number per (group, channel, registered?) lives in a 4-set, 4-way cache
/// keyed on 9 significant bits.
type PnCache = PlruCache<u16, (u8, u8), 4, 4>;

fn pn_cache_key(group: u8, channel: u8, is_rpn: bool) -> u16 {
    u16::from(group) << 5 | u16::from(channel) << 1 | u16::from(is_rpn)
}

#[derive(Debug, Default)]
struct Context {
    pn_cache: PnCache,
    output: Fifo<u32, 4>,
}

impl Context {
    fn push1(&mut self, word: u32) {
        let _ = self.output.push_back(word);
    }

    fn push2(&mut self, words: [u32; 2]) {
        let _ = self.output.push_back(words[0]);
        let _ = self.output.push_back(words[1]);
    }
}

/// Utility messages pass straight through (a NOOP is consumed).
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

/// MIDI 1.0 channel-voice messages pass straight through.
#[derive(Debug, Default)]
struct M1cvm;

impl M1cvmBackend<Context> for M1cvm {
    fn note_off(&mut self, context: &mut Context, message: m1cvm::NoteOff) {
        context.push1(message.word(0));
    }
    fn note_on(&mut self, context: &mut Context, message: m1cvm::NoteOn) {
        context.push1(message.word(0));
    }
    fn poly_pressure(&mut self, context: &mut Context, message: m1cvm::PolyPressure) {
        context.push1(message.word(0));
    }
    fn control_change(&mut self, context: &mut Context, message: m1cvm::ControlChange) {
        context.push1(message.word(0));
    }
    fn program_change(&mut self, context: &mut Context, message: m1cvm::ProgramChange) {
        context.push1(message.word(0));
    }
    fn channel_pressure(&mut self, context: &mut Context, message: m1cvm::ChannelPressure) {
        context.push1(message.word(0));
    }
    fn pitch_bend(&mut self, context: &mut Context, message: m1cvm::PitchBend) {
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

/// MIDI 2.0 channel-voice messages are translated to their MIDI 1.0 forms. The messages with no
/// MIDI 1.0 equivalent keep their default (empty) handlers and vanish.
#[derive(Debug, Default)]
struct M2cvm;

impl M2cvm {
    fn cc(group: u8, channel: u8, controller: u8, value: u8) -> u32 {
        m1cvm::ControlChange::new()
            .with_group(group)
            .with_channel(channel)
            .with_controller(controller)
            .with_value(value)
            .word(0)
    }

    /// Emits the MIDI 1.0 compound CC sequence for a registered or assignable controller. The
    /// number-select pair goes out only when the cached parameter number differs.
    fn pn_message(
        context: &mut Context,
        group: u8,
        channel: u8,
        is_rpn: bool,
        number: (u8, u8),
        value: u32,
    ) {
        let key = pn_cache_key(group, channel, is_rpn);
        let mut send_number = false;
        {
            let cached = context.pn_cache.access(key, || {
                send_number = true;
                number
            });
            if *cached != number {
                *cached = number;
                send_number = true;
            }
        }

        let (msb_cc, lsb_cc) = if is_rpn {
            (CONTROL_RPN_MSB, CONTROL_RPN_LSB)
        } else {
            (CONTROL_NRPN_MSB, CONTROL_NRPN_LSB)
        };
        if send_number {
            context.push1(Self::cc(group, channel, msb_cc, number.0));
            context.push1(Self::cc(group, channel, lsb_cc, number.1));
        }

        let val14 = scale_down(value, 32, 14) as u16;
        context.push1(Self::cc(group, channel, CONTROL_DATA_ENTRY_MSB, (val14 >> 7) as u8 & 0x7F));
        context.push1(Self::cc(group, channel, CONTROL_DATA_ENTRY_LSB, (val14 & 0x7F) as u8));
    }
}

impl M2cvmBackend<Context> for M2cvm {
    fn note_off(&mut self, context: &mut Context, message: m2cvm::NoteOff) {
        let out = m1cvm::NoteOff::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_velocity(scale_down(u32::from(message.velocity()), 16, 7) as u8);
        context.push1(out.word(0));
    }

    fn note_on(&mut self, context: &mut Context, message: m2cvm::NoteOn) {
        let out = m1cvm::NoteOn::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_velocity(scale_down(u32::from(message.velocity()), 16, 7) as u8);
        context.push1(out.word(0));
    }

    fn poly_pressure(&mut self, context: &mut Context, message: m2cvm::PolyPressure) {
        let out = m1cvm::PolyPressure::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_note(message.note())
            .with_pressure(scale_down(message.pressure(), 32, 7) as u8);
        context.push1(out.word(0));
    }

    fn rpn_controller(&mut self, context: &mut Context, message: m2cvm::RpnController) {
        Self::pn_message(
            context,
            message.group(),
            message.channel(),
            true,
            (message.bank(), message.index()),
            message.value(),
        );
    }

    fn nrpn_controller(&mut self, context: &mut Context, message: m2cvm::NrpnController) {
        Self::pn_message(
            context,
            message.group(),
            message.channel(),
            false,
            (message.bank(), message.index()),
            message.value(),
        );
    }

    fn control_change(&mut self, context: &mut Context, message: m2cvm::ControlChange) {
        context.push1(Self::cc(
            message.group(),
            message.channel(),
            message.controller(),
            scale_down(message.value(), 32, 7) as u8,
        ));
    }

    fn program_change(&mut self, context: &mut Context, message: m2cvm::ProgramChange) {
        let group = message.group();
        let channel = message.channel();
        if message.bank_valid() != 0 {
            // Control Change numbers 00H and 20H are defined as the Bank Select message. 00H is
            // the MSB and 20H is the LSB for a total of 14 bits.
            context.push1(Self::cc(group, channel, CONTROL_BANK_SELECT, message.bank_msb()));
            context.push1(Self::cc(group, channel, CONTROL_BANK_SELECT_LSB, message.bank_lsb()));
        }
        let out = m1cvm::ProgramChange::new()
            .with_group(group)
            .with_channel(channel)
            .with_program(message.program());
        context.push1(out.word(0));
    }

    fn channel_pressure(&mut self, context: &mut Context, message: m2cvm::ChannelPressure) {
        let out = m1cvm::ChannelPressure::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_data(scale_down(message.data(), 32, 7) as u8);
        context.push1(out.word(0));
    }

    fn pitch_bend(&mut self, context: &mut Context, message: m2cvm::PitchBend) {
        let val14 = scale_down(message.value(), 32, 14);
        let out = m1cvm::PitchBend::new()
            .with_group(message.group())
            .with_channel(message.channel())
            .with_lsb_data((val14 & 0x7F) as u8)
            .with_msb_data((val14 >> 7) as u8 & 0x7F);
        context.push1(out.word(0));
    }
}

type Midi1Config = Config<Context, Utility, System, M1cvm, Data64, M2cvm, Data128Null, StreamNull, FlexDataNull>;

/// The UMP to MIDI-1-in-UMP transcoder.
#[derive(Debug, Default)]
pub struct UmpToMidi1 {
    dispatcher: UmpDispatcher<Midi1Config>,
}

impl UmpToMidi1 {
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
mod to_midi1_tests {
    use super::*;
    use crate::scale::scale_down;

    fn convert(words: &[u32]) -> Vec<u32> {
        let mut translator = UmpToMidi1::new();
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
    fn m1cvm_passes_through() {
        let input = [0x2081_6050, 0x2081_7070];
        assert_eq!(convert(&input), input.to_vec());
    }

    #[test]
    fn sysex_passes_through() {
        let input = [
            0x3016_7E7F, 0x0D70_024B, 0x3026_607A, 0x737F_7F7F, 0x3036_0000, 0x1000_0000,
        ];
        assert_eq!(convert(&input), input.to_vec());
    }

    #[test]
    fn system_passes_through() {
        assert_eq!(convert(&[0x10F8_0000]), vec![0x10F8_0000]);
    }

    #[test]
    fn m2_note_on_scales_velocity() {
        let input = [0x4090_4000, 0xC104_0000];
        assert_eq!(convert(&input), vec![0x2090_4060]);
    }

    #[test]
    fn m2_note_off_scales_velocity() {
        let input = [0x4080_4000, 0xC104_0000];
        assert_eq!(convert(&input), vec![0x2080_4060]);
    }

    #[test]
    fn m2_poly_pressure() {
        let input = [0x40A0_3C00, 0xF000_F000];
        assert_eq!(convert(&input), vec![0x20A0_3C78]);
    }

    #[test]
    fn m2_channel_pressure() {
        let input = [0x40D0_0000, 0xF000_F000];
        assert_eq!(convert(&input), vec![0x20D0_7800]);
    }

    #[test]
    fn m2_program_change_without_bank() {
        let input = [0x40C0_0000, 0x3C00_0000];
        assert_eq!(convert(&input), vec![0x20C0_3C00]);
    }

    #[test]
    fn m2_program_change_with_bank() {
        let input = [0x41C2_0001, 0x3C00_550F];
        assert_eq!(
            convert(&input),
            vec![0x21B2_0055, 0x21B2_200F, 0x21C2_3C00]
        );
    }

    #[test]
    fn per_note_pitch_bend_is_dropped() {
        let input = [0x4060_3C00, 0x8000_0000];
        assert_eq!(convert(&input), vec![]);
    }

    #[test]
    fn relative_controllers_are_dropped() {
        assert_eq!(convert(&[0x4040_3C00, 0x8000_0000]), vec![]);
        assert_eq!(convert(&[0x4050_3C00, 0x8000_0000]), vec![]);
    }

    #[test]
    fn rpn_controller_expands_to_four_ccs() {
        let value = 0x1234_5678u32;
        let input = [0x4123_3C15, value];
        let val14 = scale_down(value, 32, 14) as u32;
        let expected = vec![
            0x21B3_0000 | 101 << 8 | 0x3C,
            0x21B3_0000 | 100 << 8 | 0x15,
            0x21B3_0000 | 6 << 8 | (val14 >> 7 & 0x7F),
            0x21B3_0000 | 38 << 8 | (val14 & 0x7F),
        ];
        assert_eq!(convert(&input), expected);
    }

    #[test]
    fn nrpn_controller_uses_assignable_ccs() {
        let value = 0x8765_4321u32;
        let input = [0x4133_3C15, value];
        let out = convert(&input);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0] >> 8 & 0x7F, 99);
        assert_eq!(out[1] >> 8 & 0x7F, 98);
        assert_eq!(out[2] >> 8 & 0x7F, 6);
        assert_eq!(out[3] >> 8 & 0x7F, 38);
    }

    #[test]
    fn repeated_rpn_updates_elide_the_number_select_ccs() {
        // The same parameter twice: numbers are selected once, data entry goes out twice.
        let input = [
            0x4123_3C15, 0x1234_5678, //
            0x4123_3C15, 0x8765_4321,
        ];
        let out = convert(&input);
        assert_eq!(out.len(), 4 + 2);
        let controllers: Vec<u32> = out.iter().map(|w| w >> 8 & 0x7F).collect();
        assert_eq!(controllers, vec![101, 100, 6, 38, 6, 38]);
    }

    #[test]
    fn changing_the_parameter_number_resends_the_select_ccs() {
        let input = [
            0x4123_3C15, 0x1234_5678, //
            0x4123_3C16, 0x1234_5678,
        ];
        let out = convert(&input);
        let controllers: Vec<u32> = out.iter().map(|w| w >> 8 & 0x7F).collect();
        assert_eq!(controllers, vec![101, 100, 6, 38, 101, 100, 6, 38]);
    }

    #[test]
    fn rpn_and_nrpn_caches_are_distinct() {
        // Same group/channel/number but different kinds must not share a cache entry.
        let input = [
            0x4123_3C15, 0x1234_5678, //
            0x4133_3C15, 0x1234_5678, //
            0x4123_3C15, 0x1234_5678,
        ];
        let out = convert(&input);
        let controllers: Vec<u32> = out.iter().map(|w| w >> 8 & 0x7F).collect();
        assert_eq!(
            controllers,
            vec![101, 100, 6, 38, 99, 98, 6, 38, 6, 38]
        );
    }

    #[test]
    fn m2_pitch_bend() {
        let input = [0x41E3_0000, 0xFFFF_0000];
        let val14 = 0xFFFF_0000u32 >> 18;
        let expected = 0x21E3_0000 | (val14 & 0x7F) << 8 | (val14 >> 7 & 0x7F);
        assert_eq!(convert(&input), vec![expected]);
    }

    #[test]
    fn m2_control_change() {
        let input = [0x40B1_0700, 0xFFFF_FFFF];
        assert_eq!(convert(&input), vec![0x20B1_077F]);
    }
}
