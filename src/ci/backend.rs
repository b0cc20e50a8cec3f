/*!

Handler bundles for the CI dispatcher, split into the five groups of the MIDI-CI specification:
system concerns (addressing and error surfacing), management, profile configuration, property
exchange and process inquiry.

As with the UMP backends, each trait method has a default empty body, the `*Null` structs handle
nothing, and the `*Function` structs forward to optionally installed closures.

!*/

use crate::ci::types::{
    process_inquiry, profile, property_exchange, Ack, Discovery, DiscoveryReply, EndpointInfo,
    EndpointInfoReply, Header, InvalidateMuid, Nak,
};

/// Addressing and error callbacks.
pub trait SystemBackend<C> {
    /// Decides whether `muid` addresses this receiver. Until a handler answers `true`, every
    /// message that is not sent to the broadcast MUID is discarded.
    fn check_muid(&mut self, _context: &mut C, _group: u8, _muid: u32) -> bool {
        false
    }
    /// A syntactically complete header whose message kind is not in the classification table.
    fn unknown_midici(&mut self, _context: &mut C, _header: Header) {}
    /// A message outgrew the receive buffer; the remainder of the sysex is discarded.
    fn buffer_overflow(&mut self, _context: &mut C) {}
}

/// Management messages: discovery, endpoint information, MUID retirement, ACK and NAK.
pub trait ManagementBackend<C> {
    fn discovery(&mut self, _context: &mut C, _header: Header, _message: Discovery) {}
    fn discovery_reply(&mut self, _context: &mut C, _header: Header, _message: DiscoveryReply) {}
    fn endpoint_info(&mut self, _context: &mut C, _header: Header, _message: EndpointInfo) {}
    fn endpoint_info_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: EndpointInfoReply<'_>,
    ) {
    }
    fn invalidate_muid(&mut self, _context: &mut C, _header: Header, _message: InvalidateMuid) {}
    fn ack(&mut self, _context: &mut C, _header: Header, _message: Ack<'_>) {}
    fn nak(&mut self, _context: &mut C, _header: Header, _message: Nak<'_>) {}
}

/// Profile configuration messages.
pub trait ProfileBackend<C> {
    fn inquiry(&mut self, _context: &mut C, _header: Header) {}
    fn inquiry_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: profile::InquiryReply<'_>,
    ) {
    }
    fn added(&mut self, _context: &mut C, _header: Header, _message: profile::Added) {}
    fn removed(&mut self, _context: &mut C, _header: Header, _message: profile::Removed) {}
    fn details(&mut self, _context: &mut C, _header: Header, _message: profile::Details) {}
    fn details_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: profile::DetailsReply<'_>,
    ) {
    }
    fn on(&mut self, _context: &mut C, _header: Header, _message: profile::On) {}
    fn off(&mut self, _context: &mut C, _header: Header, _message: profile::Off) {}
    fn enabled(&mut self, _context: &mut C, _header: Header, _message: profile::Enabled) {}
    fn disabled(&mut self, _context: &mut C, _header: Header, _message: profile::Disabled) {}
    fn specific_data(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: profile::SpecificData<'_>,
    ) {
    }
}

/// Property exchange messages.
pub trait PropertyExchangeBackend<C> {
    fn capabilities(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::Capabilities,
    ) {
    }
    fn capabilities_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::CapabilitiesReply,
    ) {
    }
    fn get(&mut self, _context: &mut C, _header: Header, _message: property_exchange::Get<'_>) {}
    fn get_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::GetReply<'_>,
    ) {
    }
    fn set(&mut self, _context: &mut C, _header: Header, _message: property_exchange::Set<'_>) {}
    fn set_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::SetReply<'_>,
    ) {
    }
    fn subscription(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::Subscription<'_>,
    ) {
    }
    fn subscription_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::SubscriptionReply<'_>,
    ) {
    }
    fn notify(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: property_exchange::Notify<'_>,
    ) {
    }
}

/// Process inquiry messages. The dispatcher delivers these only for CI version 2 and later.
pub trait ProcessInquiryBackend<C> {
    fn capabilities(&mut self, _context: &mut C, _header: Header) {}
    fn capabilities_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: process_inquiry::CapabilitiesReply,
    ) {
    }
    fn midi_message_report(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: process_inquiry::MidiMessageReport,
    ) {
    }
    fn midi_message_report_reply(
        &mut self,
        _context: &mut C,
        _header: Header,
        _message: process_inquiry::MidiMessageReportReply,
    ) {
    }
    fn midi_message_report_end(&mut self, _context: &mut C, _header: Header) {}
}

/// A backend that discards everything addressed to it (and claims no MUID).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemNull;
impl<C> SystemBackend<C> for SystemNull {}

/// A backend that ignores every management message.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManagementNull;
impl<C> ManagementBackend<C> for ManagementNull {}

/// A backend that ignores every profile message.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileNull;
impl<C> ProfileBackend<C> for ProfileNull {}

/// A backend that ignores every property exchange message.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyExchangeNull;
impl<C> PropertyExchangeBackend<C> for PropertyExchangeNull {}

/// A backend that ignores every process inquiry message.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessInquiryNull;
impl<C> ProcessInquiryBackend<C> for ProcessInquiryNull {}

/// Closure-backed system handlers. `check_muid` returns a value, so this one is written by hand
/// rather than generated.
#[allow(clippy::type_complexity)]
pub struct SystemFunction<C> {
    check_muid: Option<Box<dyn FnMut(&mut C, u8, u32) -> bool>>,
    unknown_midici: Option<Box<dyn FnMut(&mut C, Header)>>,
    buffer_overflow: Option<Box<dyn FnMut(&mut C)>>,
}

impl<C> Default for SystemFunction<C> {
    fn default() -> Self {
        Self {
            check_muid: None,
            unknown_midici: None,
            buffer_overflow: None,
        }
    }
}

impl<C> SystemFunction<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the MUID predicate. Without one, only broadcast messages get through.
    pub fn on_check_muid(
        &mut self,
        handler: impl FnMut(&mut C, u8, u32) -> bool + 'static,
    ) -> &mut Self {
        self.check_muid = Some(Box::new(handler));
        self
    }

    /// Installs the handler for unclassifiable messages.
    pub fn on_unknown_midici(&mut self, handler: impl FnMut(&mut C, Header) + 'static) -> &mut Self {
        self.unknown_midici = Some(Box::new(handler));
        self
    }

    /// Installs the handler for receive-buffer overflow.
    pub fn on_buffer_overflow(&mut self, handler: impl FnMut(&mut C) + 'static) -> &mut Self {
        self.buffer_overflow = Some(Box::new(handler));
        self
    }
}

impl<C> SystemBackend<C> for SystemFunction<C> {
    fn check_muid(&mut self, context: &mut C, group: u8, muid: u32) -> bool {
        match self.check_muid.as_mut() {
            Some(handler) => handler(context, group, muid),
            None => false,
        }
    }

    fn unknown_midici(&mut self, context: &mut C, header: Header) {
        if let Some(handler) = self.unknown_midici.as_mut() {
            handler(context, header)
        }
    }

    fn buffer_overflow(&mut self, context: &mut C) {
        if let Some(handler) = self.buffer_overflow.as_mut() {
            handler(context)
        }
    }
}

function_backend! {
    /// Closure-backed management handlers.
    pub struct ManagementFunction implements ManagementBackend {
        discovery / on_discovery (header: Header, message: Discovery);
        discovery_reply / on_discovery_reply (header: Header, message: DiscoveryReply);
        endpoint_info / on_endpoint_info (header: Header, message: EndpointInfo);
        endpoint_info_reply / on_endpoint_info_reply (header: Header, message: EndpointInfoReply<'_>);
        invalidate_muid / on_invalidate_muid (header: Header, message: InvalidateMuid);
        ack / on_ack (header: Header, message: Ack<'_>);
        nak / on_nak (header: Header, message: Nak<'_>);
    }
}

function_backend! {
    /// Closure-backed profile handlers.
    pub struct ProfileFunction implements ProfileBackend {
        inquiry / on_inquiry (header: Header);
        inquiry_reply / on_inquiry_reply (header: Header, message: profile::InquiryReply<'_>);
        added / on_added (header: Header, message: profile::Added);
        removed / on_removed (header: Header, message: profile::Removed);
        details / on_details (header: Header, message: profile::Details);
        details_reply / on_details_reply (header: Header, message: profile::DetailsReply<'_>);
        on / on_on (header: Header, message: profile::On);
        off / on_off (header: Header, message: profile::Off);
        enabled / on_enabled (header: Header, message: profile::Enabled);
        disabled / on_disabled (header: Header, message: profile::Disabled);
        specific_data / on_specific_data (header: Header, message: profile::SpecificData<'_>);
    }
}

function_backend! {
    /// Closure-backed property exchange handlers.
    pub struct PropertyExchangeFunction implements PropertyExchangeBackend {
        capabilities / on_capabilities (header: Header, message: property_exchange::Capabilities);
        capabilities_reply / on_capabilities_reply (header: Header, message: property_exchange::CapabilitiesReply);
        get / on_get (header: Header, message: property_exchange::Get<'_>);
        get_reply / on_get_reply (header: Header, message: property_exchange::GetReply<'_>);
        set / on_set (header: Header, message: property_exchange::Set<'_>);
        set_reply / on_set_reply (header: Header, message: property_exchange::SetReply<'_>);
        subscription / on_subscription (header: Header, message: property_exchange::Subscription<'_>);
        subscription_reply / on_subscription_reply (header: Header, message: property_exchange::SubscriptionReply<'_>);
        notify / on_notify (header: Header, message: property_exchange::Notify<'_>);
    }
}

function_backend! {
    /// Closure-backed process inquiry handlers.
    pub struct ProcessInquiryFunction implements ProcessInquiryBackend {
        capabilities / on_capabilities (header: Header);
        capabilities_reply / on_capabilities_reply (header: Header, message: process_inquiry::CapabilitiesReply);
        midi_message_report / on_midi_message_report (header: Header, message: process_inquiry::MidiMessageReport);
        midi_message_report_reply / on_midi_message_report_reply (header: Header, message: process_inquiry::MidiMessageReportReply);
        midi_message_report_end / on_midi_message_report_end (header: Header);
    }
}

#[cfg(test)]
mod backend_tests {
    use super::*;

    #[test]
    fn check_muid_defaults_to_false() {
        let mut backend = SystemFunction::<()>::new();
        assert!(!backend.check_muid(&mut (), 0, 0x0123_4567));
        backend.on_check_muid(|_, _, muid| muid == 0x0123_4567);
        assert!(backend.check_muid(&mut (), 0, 0x0123_4567));
        assert!(!backend.check_muid(&mut (), 0, 0x0123_4568));
    }

    #[test]
    fn management_function_forwards_discovery() {
        let mut backend = ManagementFunction::<Vec<u32>>::new();
        backend.on_discovery(|calls, header, _| calls.push(header.remote_muid));
        let mut calls = Vec::new();
        let header = Header {
            remote_muid: 42,
            ..Header::default()
        };
        backend.discovery(&mut calls, header, Discovery::default());
        assert_eq!(calls, vec![42]);
    }

    #[test]
    fn null_backends_do_nothing() {
        let mut sys = SystemNull;
        assert!(!SystemBackend::<()>::check_muid(&mut sys, &mut (), 0, 1));
        let mut profile_backend = ProfileNull;
        ProfileBackend::<()>::inquiry(&mut profile_backend, &mut (), Header::default());
    }
}
