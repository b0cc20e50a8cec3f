//! Property-style tests: round trips and container invariants exercised over generated inputs.

use midi_ump::adt::{Fifo, Iumap, PlruCache};
use midi_ump::bytestream::{BytestreamToUmp, UmpToBytestream};
use midi_ump::{scale_down, scale_up};

/// A deterministic xorshift generator keeps the exercised sequences stable across runs.
struct XorShift(u32);

impl XorShift {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: u32) -> u32 {
        self.next() % bound
    }
}

fn round_trip(input: &[u8]) -> Vec<u8> {
    let mut to_ump = BytestreamToUmp::new();
    let mut from_ump = UmpToBytestream::new();
    let mut words = Vec::new();
    for byte in input {
        to_ump.push(*byte);
        while to_ump.available() {
            words.push(to_ump.read());
        }
    }
    let mut output = Vec::new();
    for word in words {
        from_ump.push(word);
        while from_ump.available() {
            output.push(from_ump.read());
        }
    }
    output
}

/// Round-trip property: any well-formed byte stream without reserved statuses survives the
/// conversion to UMP and back, modulo running-status expansion.
#[test]
fn bytestream_round_trip_over_generated_messages() {
    let mut rng = XorShift(0x2B5D_1779);
    let mut input = Vec::new();
    for _ in 0..200 {
        let channel = rng.below(16) as u8;
        let d1 = rng.below(128) as u8;
        let d2 = rng.below(128) as u8;
        match rng.below(7) {
            0 => input.extend_from_slice(&[0x80 | channel, d1, d2]),
            1 => input.extend_from_slice(&[0x90 | channel, d1, d2.max(1)]),
            2 => input.extend_from_slice(&[0xA0 | channel, d1, d2]),
            3 => input.extend_from_slice(&[0xB0 | channel, d1.min(119), d2]),
            4 => input.extend_from_slice(&[0xC0 | channel, d1]),
            5 => input.extend_from_slice(&[0xD0 | channel, d1]),
            _ => input.extend_from_slice(&[0xE0 | channel, d1, d2]),
        }
    }
    assert_eq!(round_trip(&input), input);
}

#[test]
fn sysex_round_trip_over_many_lengths() {
    for length in 0..40usize {
        let mut input = vec![0xF0u8];
        for i in 0..length {
            input.push((i % 0x7F) as u8);
        }
        input.push(0xF7);
        assert_eq!(round_trip(&input), input, "sysex of {} bytes", length);
    }
}

/// Scaling property: all widening conversions are monotone and preserve the end points.
#[test]
fn scalers_are_monotone_and_preserve_endpoints() {
    let cases: [(u32, u32); 3] = [(7, 16), (7, 32), (14, 32)];
    for (src, dst) in cases {
        let max_in = (1u32 << src) - 1;
        let max_out = if dst == 32 { u32::MAX } else { (1u32 << dst) - 1 };
        assert_eq!(scale_up(0, src, dst), 0);
        assert_eq!(scale_up(max_in, src, dst), max_out);
        let mut previous = 0u32;
        for v in 0..=max_in {
            let scaled = scale_up(v, src, dst);
            assert!(scaled >= previous, "{}→{} bit scaling regressed at {}", src, dst, v);
            assert_eq!(scale_down(scaled, dst, src), v);
            previous = scaled;
        }
    }
}

/// PLRU property: the values returned on hits are the values most recently stored, and a set
/// never holds more than its way count.
#[test]
fn plru_hits_return_most_recent_values() {
    let mut cache = PlruCache::<u16, u32, 4, 4>::new();
    let mut shadow = std::collections::HashMap::<u16, u32>::new();
    let mut rng = XorShift(0xA5A5_0001);
    for round in 0..2000u32 {
        let key = (rng.below(64)) as u16;
        let fresh = round;
        let mut was_miss = false;
        let value = *cache.access(key, || {
            was_miss = true;
            fresh
        });
        if !was_miss {
            // A hit must produce exactly what was last stored for this key.
            assert_eq!(value, shadow[&key], "stale value for key {}", key);
        } else {
            shadow.insert(key, fresh);
        }
        assert!(cache.len() <= cache.max_len());
    }
}

/// IUMAP property: `find` always reflects the latest insert/erase, and erasing makes room.
#[test]
fn iumap_reflects_latest_writes() {
    let mut map = Iumap::<u32, u32, 16>::new();
    let mut shadow = std::collections::HashMap::<u32, u32>::new();
    let mut rng = XorShift(0x1357_9BDF);
    for round in 0..4000u32 {
        let key = rng.below(24);
        match rng.below(3) {
            0 => {
                let inserted = map.insert_or_assign(key, round);
                if inserted.is_some() {
                    shadow.insert(key, round);
                } else {
                    assert!(!shadow.contains_key(&key));
                    assert_eq!(shadow.len(), 16, "a full map must actually be full");
                }
            }
            1 => {
                assert_eq!(map.erase(&key), shadow.remove(&key).is_some());
            }
            _ => {
                assert_eq!(map.find(&key).copied(), shadow.get(&key).copied());
            }
        }
        assert_eq!(map.len(), shadow.len());
    }
}

/// FIFO property: rejected pushes change nothing and elements emerge in order.
#[test]
fn fifo_order_and_rejection() {
    let mut fifo = Fifo::<u32, 8>::new();
    let mut shadow = std::collections::VecDeque::<u32>::new();
    let mut rng = XorShift(0x0F0F_1234);
    for round in 0..4000u32 {
        if rng.below(2) == 0 {
            let accepted = fifo.push_back(round);
            assert_eq!(accepted, shadow.len() < 8);
            if accepted {
                shadow.push_back(round);
            }
        } else if !shadow.is_empty() {
            assert_eq!(fifo.pop_front(), shadow.pop_front().unwrap());
        }
        assert_eq!(fifo.len(), shadow.len());
        assert_eq!(fifo.empty(), shadow.is_empty());
        assert_eq!(fifo.full(), shadow.len() == 8);
    }
}
