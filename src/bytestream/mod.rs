/*!

Translation between the legacy MIDI 1.0 byte stream and UMP words, in both directions.

!*/

pub mod from_ump;
pub mod to_ump;

pub use from_ump::UmpToBytestream;
pub use to_ump::BytestreamToUmp;
