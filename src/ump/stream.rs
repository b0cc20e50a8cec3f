/*!

UMP stream messages (message type `0xF`): endpoint and function-block discovery and their
notifications. The status occupies the ten bits 16..25 and the two bits above it select the packet
form for multi-packet notifications.

!*/

/// `0x00`: Endpoint Discovery status.
pub const STATUS_ENDPOINT_DISCOVERY: u16 = 0x00;
/// `0x01`: Endpoint Info Notification status.
pub const STATUS_ENDPOINT_INFO_NOTIFICATION: u16 = 0x01;
/// `0x02`: Device Identity Notification status.
pub const STATUS_DEVICE_IDENTITY_NOTIFICATION: u16 = 0x02;
/// `0x03`: Endpoint Name Notification status.
pub const STATUS_ENDPOINT_NAME_NOTIFICATION: u16 = 0x03;
/// `0x04`: Product Instance Id Notification status.
pub const STATUS_PRODUCT_INSTANCE_ID_NOTIFICATION: u16 = 0x04;
/// `0x05`: Stream Configuration Request status.
pub const STATUS_JR_CONFIGURATION_REQUEST: u16 = 0x05;
/// `0x06`: Stream Configuration Notification status.
pub const STATUS_JR_CONFIGURATION_NOTIFICATION: u16 = 0x06;
/// `0x10`: Function Block Discovery status.
pub const STATUS_FUNCTION_BLOCK_DISCOVERY: u16 = 0x10;
/// `0x11`: Function Block Info Notification status.
pub const STATUS_FUNCTION_BLOCK_INFO_NOTIFICATION: u16 = 0x11;
/// `0x12`: Function Block Name Notification status.
pub const STATUS_FUNCTION_BLOCK_NAME_NOTIFICATION: u16 = 0x12;
/// `0x20`: Start of Clip status.
pub const STATUS_START_OF_CLIP: u16 = 0x20;
/// `0x21`: End of Clip status.
pub const STATUS_END_OF_CLIP: u16 = 0x21;

ump_message_type! {
    /// 7.1.1 Endpoint Discovery.
    pub struct EndpointDiscovery([u32; 4] = [0xF000_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        version_major / with_version_major: u8 => (0, 8, 8);
        version_minor / with_version_minor: u8 => (0, 0, 8);
        filter / with_filter: u8 => (1, 0, 8);
    }
}

ump_message_type! {
    /// 7.1.2 Endpoint Info Notification.
    pub struct EndpointInfoNotification([u32; 4] = [0xF001_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        version_major / with_version_major: u8 => (0, 8, 8);
        version_minor / with_version_minor: u8 => (0, 0, 8);
        static_function_blocks / with_static_function_blocks: u8 => (1, 31, 1);
        number_function_blocks / with_number_function_blocks: u8 => (1, 24, 7);
        midi2_protocol_capable / with_midi2_protocol_capable: u8 => (1, 9, 1);
        midi1_protocol_capable / with_midi1_protocol_capable: u8 => (1, 8, 1);
        receive_jr_timestamp_capable / with_receive_jr_timestamp_capable: u8 => (1, 1, 1);
        transmit_jr_timestamp_capable / with_transmit_jr_timestamp_capable: u8 => (1, 0, 1);
    }
}

ump_message_type! {
    /// 7.1.3 Device Identity Notification.
    pub struct DeviceIdentityNotification([u32; 4] = [0xF002_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        dev_manuf_sysex_id_1 / with_dev_manuf_sysex_id_1: u8 => (1, 16, 7);
        dev_manuf_sysex_id_2 / with_dev_manuf_sysex_id_2: u8 => (1, 8, 7);
        dev_manuf_sysex_id_3 / with_dev_manuf_sysex_id_3: u8 => (1, 0, 7);
        device_family_lsb / with_device_family_lsb: u8 => (2, 24, 7);
        device_family_msb / with_device_family_msb: u8 => (2, 16, 7);
        device_family_model_lsb / with_device_family_model_lsb: u8 => (2, 8, 7);
        device_family_model_msb / with_device_family_model_msb: u8 => (2, 0, 7);
        software_revision_1 / with_software_revision_1: u8 => (3, 24, 7);
        software_revision_2 / with_software_revision_2: u8 => (3, 16, 7);
        software_revision_3 / with_software_revision_3: u8 => (3, 8, 7);
        software_revision_4 / with_software_revision_4: u8 => (3, 0, 7);
    }
}

ump_message_type! {
    /// 7.1.4 Endpoint Name Notification. The fourteen bytes carry a UTF-8 name fragment.
    pub struct EndpointNameNotification([u32; 4] = [0xF003_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        name1 / with_name1: u16 => (0, 0, 16);
        name2 / with_name2: u32 => (1, 0, 32);
        name3 / with_name3: u32 => (2, 0, 32);
        name4 / with_name4: u32 => (3, 0, 32);
    }
}

ump_message_type! {
    /// 7.1.5 Product Instance Id Notification.
    pub struct ProductInstanceIdNotification([u32; 4] = [0xF004_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        id1 / with_id1: u16 => (0, 0, 16);
        id2 / with_id2: u32 => (1, 0, 32);
        id3 / with_id3: u32 => (2, 0, 32);
        id4 / with_id4: u32 => (3, 0, 32);
    }
}

ump_message_type! {
    /// 7.1.6.2 Stream Configuration Request.
    pub struct JrConfigurationRequest([u32; 4] = [0xF005_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        protocol / with_protocol: u8 => (0, 8, 8);
        rxjr / with_rxjr: u8 => (0, 1, 1);
        txjr / with_txjr: u8 => (0, 0, 1);
    }
}

ump_message_type! {
    /// 7.1.6.3 Stream Configuration Notification.
    pub struct JrConfigurationNotification([u32; 4] = [0xF006_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        protocol / with_protocol: u8 => (0, 8, 8);
        rxjr / with_rxjr: u8 => (0, 1, 1);
        txjr / with_txjr: u8 => (0, 0, 1);
    }
}

ump_message_type! {
    /// 7.1.7 Function Block Discovery.
    pub struct FunctionBlockDiscovery([u32; 4] = [0xF010_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        block_num / with_block_num: u8 => (0, 8, 8);
        filter / with_filter: u8 => (0, 0, 8);
    }
}

ump_message_type! {
    /// 7.1.8 Function Block Info Notification.
    pub struct FunctionBlockInfoNotification([u32; 4] = [0xF011_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        block_active / with_block_active: u8 => (0, 15, 1);
        block_num / with_block_num: u8 => (0, 8, 7);
        ui_hint / with_ui_hint: u8 => (0, 4, 2);
        midi1 / with_midi1: u8 => (0, 2, 2);
        direction / with_direction: u8 => (0, 0, 2);
        first_group / with_first_group: u8 => (1, 24, 8);
        num_spanned_groups / with_num_spanned_groups: u8 => (1, 16, 8);
        ci_message_version / with_ci_message_version: u8 => (1, 8, 8);
        max_sys8_streams / with_max_sys8_streams: u8 => (1, 0, 8);
    }
}

ump_message_type! {
    /// 7.1.9 Function Block Name Notification.
    pub struct FunctionBlockNameNotification([u32; 4] = [0xF012_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
        block_num / with_block_num: u8 => (0, 8, 8);
        name0 / with_name0: u8 => (0, 0, 8);
        name1 / with_name1: u32 => (1, 0, 32);
        name2 / with_name2: u32 => (2, 0, 32);
        name3 / with_name3: u32 => (3, 0, 32);
    }
}

ump_message_type! {
    /// 7.1.10 Start of Clip.
    pub struct StartOfClip([u32; 4] = [0xF020_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
    }
}

ump_message_type! {
    /// 7.1.11 End of Clip.
    pub struct EndOfClip([u32; 4] = [0xF021_0000, 0, 0, 0]) {
        format / with_format: u8 => (0, 26, 2);
    }
}

#[cfg(test)]
mod stream_tests {
    use super::*;

    #[test]
    fn endpoint_discovery_word_image() {
        let m = EndpointDiscovery::new()
            .with_version_major(1)
            .with_version_minor(1)
            .with_filter(0x1F);
        assert_eq!(m.words(), [0xF000_0101, 0x0000_001F, 0, 0]);
    }

    #[test]
    fn function_block_statuses_do_not_collide() {
        assert_eq!(FunctionBlockDiscovery::new().word(0) >> 16 & 0x3FF, 0x10);
        assert_eq!(StartOfClip::new().word(0) >> 16 & 0x3FF, 0x20);
    }
}
