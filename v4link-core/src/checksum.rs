//! V4-link frame checksum
//!
//! CRC-8 with polynomial 0x07, initial value 0x00, no reflection and no
//! final XOR. The checksum covers every frame byte after the start marker:
//! `[len_lo, len_hi, command/status, payload...]`.

use tracing::trace;

use crate::constants::MAX_PAYLOAD_SIZE;

/// Generator polynomial (x^8 + x^2 + x + 1)
pub const POLYNOMIAL: u8 = 0x07;

/// Calculate the CRC-8 of `data`
///
/// # Algorithm
///
/// ```text
/// 1. crc = 0
/// 2. For each byte: crc ^= byte
/// 3.   Repeat 8 times: if crc & 0x80 { crc = (crc << 1) ^ 0x07 } else { crc <<= 1 }
/// 4. Return crc (8 bits)
/// ```
///
/// # Examples
///
/// ```
/// use v4link_core::checksum;
///
/// assert_eq!(checksum::calculate(b"123456789"), 0xF4);
/// ```
pub fn calculate(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc ^= byte;

        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }

    trace!(
        len = data.len(),
        checksum = format!("0x{:02X}", crc),
        "Calculated checksum"
    );

    crc
}

/// Checksum of the frame body `[len_lo, len_hi, code, payload...]`
///
/// The length is taken from `payload`, which callers keep within
/// `MAX_PAYLOAD_SIZE`.
pub(crate) fn for_frame(code: u8, payload: &[u8]) -> u8 {
    debug_assert!(payload.len() <= MAX_PAYLOAD_SIZE);

    let mut body = Vec::with_capacity(3 + payload.len());
    body.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    body.push(code);
    body.extend_from_slice(payload);

    calculate(&body)
}

/// Verify checksum
pub fn verify(data: &[u8], expected: u8) -> bool {
    calculate(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_reference_vectors() {
        assert_eq!(calculate(b""), 0x00);
        assert_eq!(calculate(&[0x00]), 0x00);
        assert_eq!(calculate(&[0x01]), 0x07);
        assert_eq!(calculate(&[0xFF]), 0xF3);
        assert_eq!(calculate(b"123456789"), 0xF4);
    }

    #[test]
    fn test_checksum_command_frames() {
        // PING and RESET request bodies
        assert_eq!(calculate(&[0x00, 0x00, 0x20]), 0xE0);
        assert_eq!(calculate(&[0x00, 0x00, 0xFF]), 0xF3);
    }

    #[test]
    fn test_checksum_status_frames() {
        assert_eq!(calculate(&[0x01, 0x00, 0x00]), 0x6B);
        assert_eq!(calculate(&[0x01, 0x00, 0x01]), 0x6C);
        assert_eq!(calculate(&[0x01, 0x00, 0x04]), 0x77);
        assert_eq!(calculate(&[0x01, 0x00, 0x09]), 0x54);
    }

    #[test]
    fn test_for_frame_matches_calculate() {
        let program = [0x00, 0x2A, 0x00, 0x00, 0x00, 0x51];
        assert_eq!(for_frame(0x10, &program), 0xCB);
        assert_eq!(
            for_frame(0x10, &program),
            calculate(&[0x06, 0x00, 0x10, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x51])
        );
        assert_eq!(for_frame(0x20, &[]), 0xE0);
    }

    #[test]
    fn test_checksum_verify() {
        let data = [0xAB, 0xCD];
        let checksum = calculate(&data);

        assert!(verify(&data, checksum));
        assert!(!verify(&data, checksum.wrapping_add(1)));
    }

    proptest! {
        #[test]
        fn appending_checksum_yields_zero_remainder(data in proptest::collection::vec(any::<u8>(), 0..600)) {
            let mut framed = data.clone();
            framed.push(calculate(&data));
            prop_assert_eq!(calculate(&framed), 0);
        }

        #[test]
        fn single_bit_flip_is_detected(
            data in proptest::collection::vec(any::<u8>(), 1..128),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut corrupted = data.clone();
            let i = index.index(corrupted.len());
            corrupted[i] ^= 1 << bit;
            prop_assert_ne!(calculate(&data), calculate(&corrupted));
        }
    }
}
