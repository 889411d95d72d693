//! The 6-and-2 GCR nibblization scheme used for data fields, and the
//! odd-even encoding used for address field bytes. Both exist to guarantee
//! every byte written to the disk surface has its high bit set and never
//! contains two consecutive zero bits — the alphabet the Disk II's
//! self-clocking read circuit requires.

/// The 64-entry disk-byte alphabet: GCR_TABLE[v] is the on-disk byte for
/// 6-bit value `v`. Every entry has bit 7 set and no adjacent zero bits.
pub const GCR_TABLE: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6, 0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3,
    0xB4, 0xB5, 0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC, 0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3,
    0xD6, 0xD7, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE, 0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC,
    0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
];

/// Inverse of [`GCR_TABLE`], built once at first use: disk byte -> 6-bit
/// value. Entries for bytes that never appear in the alphabet are `0xFF`.
pub fn reverse_table() -> [u8; 256] {
    let mut table = [0xFFu8; 256];
    for (value, &byte) in GCR_TABLE.iter().enumerate() {
        table[byte as usize] = value as u8;
    }
    table
}

/// Encode one 256-byte sector into the 343 on-disk bytes of its data
/// field (342 translated six-bit values followed by a checksum byte).
/// This is the inverse of [`decode_sector`].
pub fn encode_sector(data: &[u8; 256]) -> [u8; 343] {
    let mut secondary = [0u8; 86];
    for (i, &byte) in data.iter().enumerate() {
        let pos = i % 86;
        let group = i / 86; // 0, 1, or (for i in 172..256) 2
        let bit0 = byte & 0x01;
        let bit1 = (byte >> 1) & 0x01;
        // Bit-reversed scatter: source bit1 lands in the lower of the
        // band's two positions, source bit0 in the upper.
        secondary[pos] |= bit1 << (group * 2);
        secondary[pos] |= bit0 << (group * 2 + 1);
    }

    let mut sixes = [0u8; 256];
    for (i, &byte) in data.iter().enumerate() {
        sixes[i] = byte >> 2;
    }

    let mut out = [0u8; 343];
    let mut prev = 0u8;
    for (i, &value) in secondary.iter().chain(sixes.iter()).enumerate() {
        let encoded = value ^ prev;
        out[i] = GCR_TABLE[encoded as usize];
        prev = value;
    }
    out[342] = GCR_TABLE[prev as usize];
    out
}

/// Decode a 343-byte on-disk data field back into its 256-byte sector.
/// Returns `None` if any byte falls outside the GCR alphabet or the
/// trailing checksum doesn't match (a corrupt or mis-synced read).
pub fn decode_sector(bytes: &[u8; 343]) -> Option<[u8; 256]> {
    let reverse = reverse_table();
    let mut values = [0u8; 342];
    let mut prev = 0u8;
    for i in 0..342 {
        let decoded = reverse[bytes[i] as usize];
        if decoded == 0xFF {
            return None;
        }
        let value = decoded ^ prev;
        values[i] = value;
        prev = value;
    }
    let checksum = reverse[bytes[342] as usize];
    if checksum == 0xFF || checksum != prev {
        return None;
    }

    let (secondary, sixes) = values.split_at(86);
    let mut data = [0u8; 256];
    for (i, slot) in data.iter_mut().enumerate() {
        let pos = i % 86;
        let group = i / 86;
        let bit1 = (secondary[pos] >> (group * 2)) & 0x01;
        let bit0 = (secondary[pos] >> (group * 2 + 1)) & 0x01;
        *slot = (sixes[i] << 2) | (bit1 << 1) | bit0;
    }
    Some(data)
}

/// Encode one byte as the (odd, even) pair the address field uses for
/// volume/track/sector/checksum. Each output byte has bit 7 forced on and
/// its odd bits sourced from alternating halves of `value`.
pub fn odd_even_encode(value: u8) -> (u8, u8) {
    let odd = (value >> 1) | 0xAA;
    let even = value | 0xAA;
    (odd, even)
}

/// Inverse of [`odd_even_encode`].
pub fn odd_even_decode(odd: u8, even: u8) -> u8 {
    ((odd << 1) | 0x01) & even
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_has_high_bit_set() {
        for &b in GCR_TABLE.iter() {
            assert!(b & 0x80 != 0);
        }
    }

    #[test]
    fn sector_round_trips() {
        let mut data = [0u8; 256];
        for (i, b) in data.iter_mut().enumerate() {
            *b = (i * 37 + 11) as u8;
        }
        let encoded = encode_sector(&data);
        let decoded = decode_sector(&encoded).expect("valid GCR stream");
        assert_eq!(decoded, data);
    }

    #[test]
    fn odd_even_round_trips_every_byte() {
        for value in 0u8..=255 {
            let (odd, even) = odd_even_encode(value);
            assert_eq!(odd & 0xAA, 0xAA);
            assert_eq!(even & 0xAA, 0xAA);
            assert_eq!(odd_even_decode(odd, even), value);
        }
    }

    #[test]
    fn byte_outside_alphabet_is_rejected() {
        let data = [0xAAu8; 256];
        let mut encoded = encode_sector(&data);
        encoded[0] = 0x00; // never appears in GCR_TABLE (bit 7 clear)
        assert_eq!(decode_sector(&encoded), None);
    }

    #[test]
    fn tampered_stream_fails_checksum() {
        let data = [0x00u8; 256];
        let mut encoded = encode_sector(&data);
        // Swap two in-alphabet bytes that decode to different 6-bit
        // values; the rolling XOR checksum no longer matches.
        encoded[5] = GCR_TABLE[1];
        encoded[6] = GCR_TABLE[2];
        assert_eq!(decode_sector(&encoded), None);
    }
}
