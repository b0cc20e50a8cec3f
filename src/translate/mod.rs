/*!

Protocol transcoders between the MIDI 1.0 and MIDI 2.0 channel-voice protocols, both carried in
UMP. Each transcoder is a UMP dispatcher whose handlers rewrite messages into an output FIFO.

!*/

pub mod to_midi1;
pub mod to_midi2;

pub use to_midi1::UmpToMidi1;
pub use to_midi2::UmpToMidi2;
