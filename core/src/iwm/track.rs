//! Assembles a 5,808-byte GCR track image from a track's worth of plain
//! sector data: 16 back-to-back (address field, data field) pairs with no
//! inter-field sync gap, matching this core's choice not to model the
//! disk's analog timing.

use super::gcr::{decode_sector, encode_sector, odd_even_decode, odd_even_encode};
use super::interleave::Interleave;

pub const SECTORS_PER_TRACK: usize = 16;
pub const SECTOR_SIZE: usize = 256;
pub const TRACK_DATA_SIZE: usize = SECTORS_PER_TRACK * SECTOR_SIZE; // 4096
const ADDRESS_FIELD_LEN: usize = 14;
const DATA_FIELD_LEN: usize = 349;
pub const TRACK_NIBBLE_SIZE: usize = SECTORS_PER_TRACK * (ADDRESS_FIELD_LEN + DATA_FIELD_LEN); // 5808

const ADDRESS_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0x96];
const DATA_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0xAD];
const EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];

/// Build one track's nibblized image. `track_data` holds the track's 16
/// sectors in file order (file sector `n` at `track_data[n*256..n*256+256]`);
/// `interleave` maps each physical slot on the track to the file sector
/// whose data lives there. Address fields are numbered sequentially by
/// physical slot — the interleave only ever reorders which sector's
/// *data* appears at each slot, never the slot's own address-field number.
pub fn encode_track(track_data: &[u8; TRACK_DATA_SIZE], track: u8, volume: u8, interleave: Interleave) -> Vec<u8> {
    let mut out = Vec::with_capacity(TRACK_NIBBLE_SIZE);
    let order = interleave.table();
    for physical_sector in 0..SECTORS_PER_TRACK {
        encode_address_field(&mut out, volume, track, physical_sector as u8);
        let file_sector = order[physical_sector];
        let start = file_sector * SECTOR_SIZE;
        let mut sector = [0u8; SECTOR_SIZE];
        sector.copy_from_slice(&track_data[start..start + SECTOR_SIZE]);
        encode_data_field(&mut out, &sector);
    }
    debug_assert_eq!(out.len(), TRACK_NIBBLE_SIZE);
    out
}

fn encode_address_field(out: &mut Vec<u8>, volume: u8, track: u8, sector: u8) {
    out.extend_from_slice(&ADDRESS_PROLOGUE);
    let checksum = volume ^ track ^ sector;
    for value in [volume, track, sector, checksum] {
        let (odd, even) = odd_even_encode(value);
        out.push(odd);
        out.push(even);
    }
    out.extend_from_slice(&EPILOGUE);
}

fn encode_data_field(out: &mut Vec<u8>, sector: &[u8; SECTOR_SIZE]) {
    out.extend_from_slice(&DATA_PROLOGUE);
    out.extend_from_slice(&encode_sector(sector));
    out.extend_from_slice(&EPILOGUE);
}
