//! Manchester line code
//!
//! Each logical bit is sent as two physical bits: `01` for 0, `10` for 1. The
//! decoder skips the first physical bit, which in captured streams is the tail of
//! the preamble, and drops any pair that is neither `01` nor `10`.

use alloc::vec::Vec;

use super::{pack_bits, unpack_bits};

/// Decodes physical bits into logical bits
pub fn decode_bits(physical: &[u8]) -> Vec<u8> {
    physical
        .get(1..)
        .unwrap_or_default()
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (0, 1) => Some(0),
            (1, 0) => Some(1),
            _ => None,
        })
        .collect()
}

/// Decodes physical bits into bytes, MSB first.
///
/// A trailing partial byte is dropped.
pub fn decode(physical: &[u8]) -> Vec<u8> {
    pack_bits(&decode_bits(physical))
}

/// Decodes a byte stream as read from the RX FIFO
pub fn decode_bytes(raw: &[u8]) -> Vec<u8> {
    decode(&unpack_bits(raw))
}

/// Encodes `data` MSB first.
///
/// The output has no leading filler bit; prepend one before handing the result
/// to [`decode`].
pub fn encode(data: &[u8]) -> Vec<u8> {
    unpack_bits(data)
        .into_iter()
        .flat_map(|bit| if bit == 1 { [1, 0] } else { [0, 1] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::Level;
    use crate::signal::bitstream;
    use crate::signal::tests::edges_from_pulses;

    #[test]
    fn pairs() {
        assert_eq!(decode_bits(&[1, 0, 1, 1, 0, 0, 1]), [0, 1, 0]);
        assert_eq!(decode_bits(&[0, 1, 0, 1]), [1]);
        // 11 and 00 are slips, not errors
        assert_eq!(decode_bits(&[0, 1, 1, 0, 0, 1, 0]), [1]);
        assert!(decode_bits(&[]).is_empty());
        assert!(decode_bits(&[1]).is_empty());
    }

    #[test]
    fn partial_byte_is_dropped() {
        let mut physical = vec![0];
        physical.extend(encode(&[0x5A]));
        physical.extend([1, 0, 0, 1]);
        assert_eq!(decode(&physical), [0x5A]);
    }

    #[test]
    fn fifo_bytes() {
        // filler bit 0, then 0x12 Manchester encoded, then 7 padding bits
        let mut physical = vec![0];
        physical.extend(encode(&[0x12]));
        physical.extend([0; 7]);
        let raw = pack_bits(&physical);
        assert_eq!(decode_bytes(&raw), [0x12]);
    }

    #[test]
    fn captured_edges_to_bytes() {
        let payload = [0xC3, 0x5A, 0x0F];
        let mut physical = vec![1];
        physical.extend(encode(&payload));

        // merge runs of equal bits into pulses of 400 us per bit
        let mut pulses: Vec<(Level, u64)> = Vec::new();
        for &bit in &physical {
            let level = Level::from(bit == 1);
            match pulses.last_mut() {
                Some((last, duration)) if *last == level => *duration += 400,
                _ => pulses.push((level, 400)),
            }
        }

        let edges = edges_from_pulses(&pulses);
        let bits = bitstream(&edges).unwrap();
        assert_eq!(bits, physical);
        assert_eq!(decode(&bits), payload);
    }
}
