/*!

128-bit data messages (message type `0x5`): System Exclusive 8 (full 8-bit bytes, prefixed by a
stream id) and the Mixed Data Set header/payload pair.

!*/

/// `0x0`: a complete SysEx8 message in one packet.
pub const STATUS_SYSEX8_IN_1: u8 = 0x0;
/// `0x1`: SysEx8 start.
pub const STATUS_SYSEX8_START: u8 = 0x1;
/// `0x2`: SysEx8 continue.
pub const STATUS_SYSEX8_CONTINUE: u8 = 0x2;
/// `0x3`: SysEx8 end.
pub const STATUS_SYSEX8_END: u8 = 0x3;
/// `0x8`: Mixed Data Set header.
pub const STATUS_MDS_HEADER: u8 = 0x8;
/// `0x9`: Mixed Data Set payload.
pub const STATUS_MDS_PAYLOAD: u8 = 0x9;

ump_message_type! {
    /// 7.8 A SysEx8 packet. All four statuses share this layout: the byte count (which includes
    /// the stream id) in bits 16..19, the stream id, and up to thirteen 8-bit data bytes.
    pub struct Sysex8([u32; 4] = [0x5000_0000, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        status / with_status: u8 => (0, 20, 4);
        number_of_bytes / with_number_of_bytes: u8 => (0, 16, 4);
        stream_id / with_stream_id: u8 => (0, 8, 8);
        data00 / with_data00: u8 => (0, 0, 8);
        data01 / with_data01: u8 => (1, 24, 8);
        data02 / with_data02: u8 => (1, 16, 8);
        data03 / with_data03: u8 => (1, 8, 8);
        data04 / with_data04: u8 => (1, 0, 8);
        data05 / with_data05: u8 => (2, 24, 8);
        data06 / with_data06: u8 => (2, 16, 8);
        data07 / with_data07: u8 => (2, 8, 8);
        data08 / with_data08: u8 => (2, 0, 8);
        data09 / with_data09: u8 => (3, 24, 8);
        data10 / with_data10: u8 => (3, 16, 8);
        data11 / with_data11: u8 => (3, 8, 8);
        data12 / with_data12: u8 => (3, 0, 8);
    }
}

ump_message_type! {
    /// 7.9 Mixed Data Set header (status `0x8`).
    pub struct MdsHeader([u32; 4] = [0x5080_0000, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        mds_id / with_mds_id: u8 => (0, 16, 4);
        bytes_in_chunk / with_bytes_in_chunk: u16 => (0, 0, 16);
        chunks_in_mds / with_chunks_in_mds: u16 => (1, 16, 16);
        chunk_num / with_chunk_num: u16 => (1, 0, 16);
        manufacturer_id / with_manufacturer_id: u16 => (2, 16, 16);
        device_id / with_device_id: u16 => (2, 0, 16);
        sub_id_1 / with_sub_id_1: u16 => (3, 16, 16);
        sub_id_2 / with_sub_id_2: u16 => (3, 0, 16);
    }
}

ump_message_type! {
    /// 7.9 Mixed Data Set payload (status `0x9`). Fourteen raw payload bytes follow the id.
    pub struct MdsPayload([u32; 4] = [0x5090_0000, 0, 0, 0]) {
        group / with_group: u8 => (0, 24, 4);
        mds_id / with_mds_id: u8 => (0, 16, 4);
        data0 / with_data0: u16 => (0, 0, 16);
        data1 / with_data1: u32 => (1, 0, 32);
        data2 / with_data2: u32 => (2, 0, 32);
        data3 / with_data3: u32 => (3, 0, 32);
    }
}

#[cfg(test)]
mod data128_tests {
    use super::*;

    #[test]
    fn sysex8_word_image() {
        let m = Sysex8::new()
            .with_status(STATUS_SYSEX8_START)
            .with_number_of_bytes(4)
            .with_stream_id(0x2A)
            .with_data00(0x01)
            .with_data01(0x02)
            .with_data02(0x03);
        assert_eq!(m.words(), [0x5014_2A01, 0x0203_0000, 0, 0]);
    }

    #[test]
    fn mds_header_fields() {
        let m = MdsHeader::new()
            .with_mds_id(2)
            .with_bytes_in_chunk(512)
            .with_chunks_in_mds(4)
            .with_chunk_num(1);
        assert_eq!(m.word(0), 0x5082_0200);
        assert_eq!(m.word(1), 0x0004_0001);
    }
}
