/*!

Codec and dispatch machinery for the MIDI 2.0 family of protocols.

This crate is an embeddable library: it performs no I/O, owns no threads, and allocates nothing at
steady state (callback storage excepted). It provides

- a streaming [`ump::UmpDispatcher`] that reassembles Universal MIDI Packet messages from 32-bit
  words and routes each one to a typed handler,
- bidirectional translation between the MIDI 1.0 byte stream and UMP words
  ([`bytestream::BytestreamToUmp`], [`bytestream::UmpToBytestream`]),
- protocol transcoders between MIDI 1.0 and MIDI 2.0 channel voice messages carried in UMP
  ([`translate::UmpToMidi1`], [`translate::UmpToMidi2`]),
- a streaming MIDI Capability Inquiry dispatcher and message builder ([`ci`]),
- and the fixed-capacity containers these depend on ([`adt`]).

References: the UMP Format and MIDI 2.0 Protocol specification v1.1.2 and the MIDI-CI
specification v1.2.

!*/

#![allow(dead_code)]

#[macro_use]
mod error;
#[macro_use]
mod macros;

pub mod adt;
pub mod bitfield;
pub mod bytestream;
pub mod ci;
pub(crate) mod constants;
pub mod scale;
pub mod translate;
pub mod ump;

pub use error::{Error, Result};
pub use scale::{scale_down, scale_up};
