/*!

MIDI Capability Inquiry: message types, a streaming dispatcher over System Exclusive payloads,
and a builder that writes canonical on-wire message bytes.

!*/

pub mod backend;
pub mod create;
pub mod dispatcher;
pub mod types;

pub use create::{create_message, CiMessage};
pub use dispatcher::{function_dispatcher, CiDispatcher, Config, FunctionConfig};
pub use types::{
    Ack, Discovery, DiscoveryReply, EndpointInfo, EndpointInfoReply, Header, InvalidateMuid,
    MessageId, Nak, BROADCAST_MUID, FUNCTION_BLOCK, HEADER_SIZE,
};
pub use types::{process_inquiry, profile, property_exchange};
