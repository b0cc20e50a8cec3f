//! End-to-end translator scenarios, each driving a whole pipeline the way an application would:
//! push input, drain output, compare whole word or byte sequences.

use midi_ump::bytestream::{BytestreamToUmp, UmpToBytestream};
use midi_ump::translate::{UmpToMidi1, UmpToMidi2};
use midi_ump::{scale_down, scale_up};

/// Pipes the library's tracing into the test output. `RUST_LOG=trace` shows the per-byte state
/// machine decisions.
fn enable_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn bytes_to_ump(translator: &mut BytestreamToUmp, input: &[u8]) -> Vec<u32> {
    let mut output = Vec::new();
    for byte in input {
        translator.push(*byte);
        while translator.available() {
            output.push(translator.read());
        }
    }
    output
}

fn ump_to_bytes(translator: &mut UmpToBytestream, input: &[u32]) -> Vec<u8> {
    let mut output = Vec::new();
    for word in input {
        translator.push(*word);
        while translator.available() {
            output.push(translator.read());
        }
    }
    output
}

fn ump_to_midi1(input: &[u32]) -> Vec<u32> {
    let mut translator = UmpToMidi1::new();
    let mut output = Vec::new();
    for word in input {
        translator.push(*word);
        while translator.available() {
            output.push(translator.read());
        }
    }
    output
}

fn ump_to_midi2(input: &[u32]) -> Vec<u32> {
    let mut translator = UmpToMidi2::new();
    let mut output = Vec::new();
    for word in input {
        translator.push(*word);
        while translator.available() {
            output.push(translator.read());
        }
    }
    output
}

/// Note-on with running status to MIDI 1.0 UMP.
#[test]
fn note_on_with_running_status_to_midi1_ump() {
    let mut translator = BytestreamToUmp::new();
    let actual = bytes_to_ump(&mut translator, &[0x81, 0x60, 0x50, 0x70, 0x70]);
    assert_eq!(actual, vec![0x2081_6050, 0x2081_7070]);
}

/// A channel-voice message to MIDI 2.0 UMP: the velocity lands upscaled in the high half of the
/// second word.
#[test]
fn channel_voice_to_midi2_ump_upscales_velocity() {
    let mut translator = BytestreamToUmp::with_options(true, 0);
    let actual = bytes_to_ump(&mut translator, &[0x81, 0x60, 0x50]);
    let word0 = (4u32 << 28) | (0x8 << 20) | (1 << 16) | (0x60 << 8);
    let word1 = scale_up(0x50, 7, 16) << 16;
    assert_eq!(actual, vec![word0, word1]);
}

/// Bank select MSB and LSB fold into the following program change.
#[test]
fn program_change_with_bank_to_mt4() {
    let mut translator = BytestreamToUmp::with_options(true, 0);
    let actual = bytes_to_ump(
        &mut translator,
        &[0xBF, 0x00, 0x51, 0xBF, 0x20, 0x01, 0xCF, 0x42],
    );
    // A single MT-4 program change with bank-valid set and the bank bytes captured.
    assert_eq!(actual, vec![0x40CF_0001, 0x4200_5101]);
}

/// A thirty-byte SysEx is framed as five Data-64 packets: start, three continues, end.
#[test]
fn thirty_byte_sysex_framing() {
    let mut input = vec![0xF0u8];
    for i in 0..30u8 {
        input.push(i % 0x60);
    }
    input.push(0xF7);
    let mut translator = BytestreamToUmp::new();
    let actual = bytes_to_ump(&mut translator, &input);
    assert_eq!(actual.len(), 10);
    let statuses: Vec<u32> = actual.iter().step_by(2).map(|w| (w >> 20) & 0xF).collect();
    assert_eq!(statuses, vec![1, 2, 2, 2, 3]);
    for first_word in actual.iter().step_by(2) {
        assert_eq!((first_word >> 16) & 0xF, 6, "every packet carries six bytes");
    }
}

/// An MT-4 RPN controller message becomes the four-CC MIDI 1.0 compound sequence.
#[test]
fn mt4_rpn_to_midi1_compound_sequence() {
    let value = 0x1234_5678u32;
    let input = [
        (4u32 << 28) | (1 << 24) | (0x2 << 20) | (3 << 16) | (60 << 8) | 21,
        value,
    ];
    let actual = ump_to_midi1(&input);
    let val14 = scale_down(value, 32, 14);
    let cc = |controller: u32, v: u32| (2u32 << 28) | (1 << 24) | (0xB << 20) | (3 << 16) | (controller << 8) | v;
    assert_eq!(
        actual,
        vec![
            cc(101, 60),
            cc(100, 21),
            cc(6, (val14 >> 7) & 0x7F),
            cc(38, val14 & 0x7F),
        ]
    );
}

/// Two updates to the same parameter send the number-select CCs only once.
#[test]
fn back_to_back_rpn_updates_share_the_number_select() {
    let word0 = (4u32 << 28) | (1 << 24) | (0x2 << 20) | (3 << 16) | (60 << 8) | 21;
    let actual = ump_to_midi1(&[word0, 0x1111_1111, word0, 0x2222_2222]);
    let controllers: Vec<u32> = actual.iter().map(|w| (w >> 8) & 0x7F).collect();
    assert_eq!(controllers, vec![101, 100, 6, 38, 6, 38]);
}

/// A reserved status byte and its data bytes vanish without disturbing the stream.
#[test]
fn reserved_status_byte_is_swallowed() {
    let mut translator = BytestreamToUmp::new();
    let actual = bytes_to_ump(
        &mut translator,
        &[0x91, 0x3C, 0x7F, 0xF4, 0x01, 0x02, 0x81, 0x3C, 0x7F],
    );
    assert_eq!(actual, vec![0x2091_3C7F, 0x2081_3C7F]);
}

/// Byte stream to UMP and back reproduces the input, running status expanded.
#[test]
fn bytestream_round_trip() {
    enable_logging();
    let input: Vec<u8> = vec![
        0x91, 0x3C, 0x7F, // note on
        0xB2, 0x07, 0x64, // volume
        0xE3, 0x00, 0x40, // pitch bend centre
        0xC4, 0x15, // program change
        0xD5, 0x39, // channel pressure
        0xA6, 0x3C, 0x21, // poly pressure
        0xF8, // timing clock
        0xF0, 0x0A, 0x0B, 0x0C, 0xF7, // short sysex
        0x81, 0x3C, 0x40, // note off
    ];
    let mut to_ump = BytestreamToUmp::new();
    let words = bytes_to_ump(&mut to_ump, &input);
    let mut from_ump = UmpToBytestream::new();
    let actual = ump_to_bytes(&mut from_ump, &words);
    assert_eq!(actual, input);
}

/// MIDI 1 to MIDI 2 and back is the identity for messages with equivalents both ways.
#[test]
fn midi2_round_trip_via_midi1() {
    // Build MIDI-2 messages whose scaled values survive the down/up conversion: values produced
    // by scale_up always do.
    let note_on = [
        (4u32 << 28) | (0x9 << 20) | (2 << 16) | (0x3C << 8),
        scale_up(0x50, 7, 16) << 16,
    ];
    let cc = [
        (4u32 << 28) | (0xB << 20) | (2 << 16) | (0x07 << 8),
        scale_up(0x64, 7, 32),
    ];
    let mut input = Vec::new();
    input.extend_from_slice(&note_on);
    input.extend_from_slice(&cc);
    let midi1 = ump_to_midi1(&input);
    let actual = ump_to_midi2(&midi1);
    assert_eq!(actual, input);
}
