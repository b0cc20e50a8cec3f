//! Capability Inquiry: builder-to-dispatcher loops and the MUID gating property.

use midi_ump::ci::{
    self, create_message, profile, property_exchange, Ack, Discovery, Header, BROADCAST_MUID,
};

const LOCAL_MUID: u32 = 0x0123_4567;
const REMOTE_MUID: u32 = 0x00AC_5D12;

#[derive(Debug, Default)]
struct Log {
    delivered: Vec<&'static str>,
    discoveries: Vec<Discovery>,
    acks: Vec<Vec<u8>>,
    subscriptions: Vec<(Vec<u8>, Vec<u8>)>,
    profile_replies: Vec<(Vec<[u8; 5]>, Vec<[u8; 5]>)>,
    muid_checks: usize,
}

fn dispatcher() -> ci::CiDispatcher<ci::FunctionConfig<Log>, 512> {
    let mut d = ci::function_dispatcher::<Log, 512>(Log::default());
    d.config.system.on_check_muid(|log, _group, muid| {
        log.muid_checks += 1;
        muid == LOCAL_MUID
    });
    d.config.management.on_discovery(|log, _, m| {
        log.delivered.push("discovery");
        log.discoveries.push(m);
    });
    d.config.management.on_ack(|log, _, m| {
        log.delivered.push("ack");
        log.acks.push(m.message.to_vec());
    });
    d.config.profile.on_inquiry_reply(|log, _, m| {
        log.delivered.push("profile_inquiry_reply");
        log.profile_replies.push((
            m.enabled_profiles().collect(),
            m.disabled_profiles().collect(),
        ));
    });
    d.config.property_exchange.on_subscription(|log, _, m| {
        log.delivered.push("subscription");
        log.subscriptions.push((m.header.to_vec(), m.data.to_vec()));
    });
    d.config
        .process_inquiry
        .on_capabilities(|log, _| log.delivered.push("pi_capabilities"));
    d
}

fn header(version: u8, destination: u32) -> Header {
    Header {
        device_id: ci::FUNCTION_BLOCK,
        version,
        remote_muid: REMOTE_MUID,
        local_muid: destination,
    }
}

fn feed(d: &mut ci::CiDispatcher<ci::FunctionConfig<Log>, 512>, bytes: &[u8]) {
    d.start(0, ci::FUNCTION_BLOCK);
    for byte in bytes {
        d.dispatch(*byte);
    }
    d.finish();
}

#[test]
fn built_discovery_is_decoded_identically() {
    let message = Discovery {
        manufacturer: [0x12, 0x23, 0x34],
        family: 0x1779,
        model: 0x2B5D,
        version: [1, 0, 0, 0],
        capability: 0x0E,
        max_sysex_size: 512,
        output_path_id: 3,
    };
    let mut wire = [0u8; 64];
    let written = create_message(&mut wire, header(2, BROADCAST_MUID), &message).unwrap();

    let mut d = dispatcher();
    feed(&mut d, &wire[..written]);
    assert_eq!(d.config.context.discoveries, vec![message]);
}

#[test]
fn built_ack_with_text_round_trips() {
    let ack = Ack {
        original_id: 0x70,
        status_code: 0,
        status_data: 0,
        details: [0; 5],
        message: b"all good",
    };
    let mut wire = [0u8; 64];
    let written = create_message(&mut wire, header(2, LOCAL_MUID), &ack).unwrap();

    let mut d = dispatcher();
    feed(&mut d, &wire[..written]);
    assert_eq!(d.config.context.acks, vec![b"all good".to_vec()]);
}

#[test]
fn built_profile_inquiry_reply_round_trips() {
    let enabled = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let disabled = [11u8, 12, 13, 14, 15];
    let reply = profile::InquiryReply {
        enabled: &enabled,
        disabled: &disabled,
    };
    let mut wire = [0u8; 64];
    let written = create_message(&mut wire, header(1, LOCAL_MUID), &reply).unwrap();

    let mut d = dispatcher();
    feed(&mut d, &wire[..written]);
    assert_eq!(
        d.config.context.profile_replies,
        vec![(
            vec![[1, 2, 3, 4, 5], [6, 7, 8, 9, 10]],
            vec![[11, 12, 13, 14, 15]]
        )]
    );
}

#[test]
fn built_subscription_round_trips_both_spans() {
    let subscription = property_exchange::Subscription {
        chunk: property_exchange::ChunkInfo {
            number_of_chunks: 1,
            chunk_number: 1,
        },
        request: 7,
        header: br#"{"command":"start"}"#,
        data: br#"{"resource":"X-CustomThing"}"#,
    };
    let mut wire = [0u8; 128];
    let written = create_message(&mut wire, header(2, LOCAL_MUID), &subscription).unwrap();

    let mut d = dispatcher();
    feed(&mut d, &wire[..written]);
    assert_eq!(
        d.config.context.subscriptions,
        vec![(
            subscription.header.to_vec(),
            subscription.data.to_vec()
        )]
    );
}

/// Gating property: a message addressed to neither the broadcast MUID nor the local MUID invokes
/// no handler besides `check_muid` itself.
#[test]
fn messages_for_other_receivers_reach_no_handler() {
    let mut wire = [0u8; 64];
    let kinds: Vec<Vec<u8>> = vec![
        {
            let n = create_message(&mut wire, header(2, 0x0765_4321), &Discovery::default())
                .unwrap();
            wire[..n].to_vec()
        },
        {
            let n = create_message(&mut wire, header(2, 0x0765_4321), &profile::Inquiry).unwrap();
            wire[..n].to_vec()
        },
        {
            let n = create_message(&mut wire, header(2, 0x0765_4321), &Ack::default()).unwrap();
            wire[..n].to_vec()
        },
    ];
    let mut d = dispatcher();
    for bytes in kinds {
        feed(&mut d, &bytes);
    }
    assert!(d.config.context.delivered.is_empty());
    assert_eq!(d.config.context.muid_checks, 3);
}

#[test]
fn broadcast_reaches_handlers_without_a_muid_check() {
    let mut wire = [0u8; 64];
    let n = create_message(&mut wire, header(2, BROADCAST_MUID), &Discovery::default()).unwrap();
    let mut d = dispatcher();
    feed(&mut d, &wire[..n]);
    assert_eq!(d.config.context.delivered, vec!["discovery"]);
    assert_eq!(d.config.context.muid_checks, 0);
}

#[test]
fn process_inquiry_version_gate_spans_build_and_dispatch() {
    let mut wire = [0u8; 64];
    // Version 1 cannot even be built for the reply kinds; the bare capabilities inquiry can, but
    // the dispatcher keeps it from version 1 receivers.
    assert!(create_message(
        &mut wire,
        header(1, LOCAL_MUID),
        &ci::process_inquiry::MidiMessageReportEnd
    )
    .is_err());
    let n = create_message(&mut wire, header(1, LOCAL_MUID), &ci::process_inquiry::Capabilities)
        .unwrap();
    let mut d = dispatcher();
    feed(&mut d, &wire[..n]);
    assert!(d.config.context.delivered.is_empty());

    let n = create_message(&mut wire, header(2, LOCAL_MUID), &ci::process_inquiry::Capabilities)
        .unwrap();
    feed(&mut d, &wire[..n]);
    assert_eq!(d.config.context.delivered, vec!["pi_capabilities"]);
}

#[test]
fn a_discovery_conversation() {
    // A discovery request goes out broadcast; the reply comes back addressed to the requester.
    let request = Discovery {
        manufacturer: [0x12, 0x23, 0x34],
        family: 5,
        model: 6,
        version: [1, 0, 0, 0],
        capability: 0x0E,
        max_sysex_size: 4096,
        output_path_id: 0,
    };
    let mut wire = [0u8; 64];
    let n = create_message(&mut wire, header(2, BROADCAST_MUID), &request).unwrap();
    let mut d = dispatcher();
    feed(&mut d, &wire[..n]);
    let received = d.config.context.discoveries[0];
    assert_eq!(received.max_sysex_size, 4096);

    let reply = ci::DiscoveryReply {
        manufacturer: [0x77, 0x66, 0x55],
        family: 1,
        model: 2,
        version: [2, 0, 0, 0],
        capability: 0x0E,
        max_sysex_size: 512,
        output_path_id: 0,
        function_block: 1,
    };
    let reply_header = Header {
        device_id: ci::FUNCTION_BLOCK,
        version: 2,
        remote_muid: LOCAL_MUID,
        local_muid: REMOTE_MUID,
    };
    let n = create_message(&mut wire, reply_header, &reply).unwrap();
    // The reply is addressed to REMOTE_MUID, which is not ours, so it is ignored here.
    feed(&mut d, &wire[..n]);
    assert_eq!(d.config.context.delivered, vec!["discovery"]);
}
