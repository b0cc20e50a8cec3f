/*!

64-bit data messages (message type `0x3`): System Exclusive payloads carried six 7-bit bytes at a
time. The status nibble distinguishes a complete-in-one-packet message from start, continue and
end packets.

!*/

/// `0x0`: a complete SysEx message in one packet.
pub const STATUS_SYSEX7_IN_1: u8 = 0x0;
/// `0x1`: SysEx start.
pub const STATUS_SYSEX7_START: u8 = 0x1;
/// `0x2`: SysEx continue. There may be several continue packets in one message.
pub const STATUS_SYSEX7_CONTINUE: u8 = 0x2;
/// `0x3`: SysEx end.
pub const STATUS_SYSEX7_END: u8 = 0x3;

ump_message_type! {
    /// A SysEx7 packet. All four statuses share this layout: a byte count in bits 16..19 and up
    /// to six data bytes packed high-to-low across the remainder of the two words.
    pub struct Sysex7([u32; 2] = [0x3000_0000, 0x0000_0000]) {
        group / with_group: u8 => (0, 24, 4);
        status / with_status: u8 => (0, 20, 4);
        number_of_bytes / with_number_of_bytes: u8 => (0, 16, 4);
        data0 / with_data0: u8 => (0, 8, 7);
        data1 / with_data1: u8 => (0, 0, 7);
        data2 / with_data2: u8 => (1, 24, 7);
        data3 / with_data3: u8 => (1, 16, 7);
        data4 / with_data4: u8 => (1, 8, 7);
        data5 / with_data5: u8 => (1, 0, 7);
    }
}

impl Sysex7 {
    /// The payload byte at `index` (0..6).
    pub fn data(&self, index: usize) -> u8 {
        match index {
            0 => self.data0(),
            1 => self.data1(),
            2 => self.data2(),
            3 => self.data3(),
            4 => self.data4(),
            5 => self.data5(),
            _ => panic!("a sysex7 packet holds at most six bytes"),
        }
    }

    /// Returns the packet with the payload byte at `index` (0..6) replaced.
    pub fn with_data(self, index: usize, value: u8) -> Self {
        match index {
            0 => self.with_data0(value),
            1 => self.with_data1(value),
            2 => self.with_data2(value),
            3 => self.with_data3(value),
            4 => self.with_data4(value),
            5 => self.with_data5(value),
            _ => panic!("a sysex7 packet holds at most six bytes"),
        }
    }
}

#[cfg(test)]
mod data64_tests {
    use super::*;

    #[test]
    fn start_packet_word_image() {
        let m = Sysex7::new()
            .with_status(STATUS_SYSEX7_START)
            .with_number_of_bytes(6)
            .with_data0(0x7E)
            .with_data1(0x7F)
            .with_data2(0x0D)
            .with_data3(0x70)
            .with_data4(0x02)
            .with_data5(0x4B);
        assert_eq!(m.words(), [0x3016_7E7F, 0x0D70_024B]);
    }

    #[test]
    fn indexed_data_access() {
        let mut m = Sysex7::new().with_number_of_bytes(6);
        for i in 0..6 {
            m = m.with_data(i, 0x10 + i as u8);
        }
        for i in 0..6 {
            assert_eq!(m.data(i), 0x10 + i as u8);
        }
    }
}
