//! A single 5.25" disk slot: the raw 143,360-byte image the user loaded,
//! the interleave/volume derived from it, and the materialized GCR track
//! buffer the IWM's read head rotates through.

use super::interleave::{self, Interleave};
use super::track::{self, TRACK_DATA_SIZE, TRACK_NIBBLE_SIZE};
use crate::error::CoreError;

pub const TRACKS_PER_DISK: usize = 35;
pub const DISK_IMAGE_SIZE: usize = TRACKS_PER_DISK * track::SECTORS_PER_TRACK * track::SECTOR_SIZE;

pub struct Disk {
    pub loaded: bool,
    pub image: Vec<u8>,
    pub volume: u8,
    pub interleave: Interleave,
    pub track_buf: Vec<u8>,
    pub index: usize,
    materialized_track: Option<u8>,
}

impl Default for Disk {
    fn default() -> Self {
        Self::empty()
    }
}

impl Disk {
    pub fn empty() -> Self {
        Disk {
            loaded: false,
            image: Vec::new(),
            volume: interleave::DEFAULT_VOLUME,
            interleave: Interleave::Raw,
            track_buf: vec![0xFF; TRACK_NIBBLE_SIZE],
            index: 0,
            materialized_track: None,
        }
    }

    /// Load a flat 143,360-byte disk image. `path` only informs interleave
    /// auto-detection (by extension) — the bytes themselves aren't read
    /// from disk here; the caller owns I/O.
    pub fn load(
        &mut self,
        path: &str,
        image: Vec<u8>,
        interleave_override: Option<Interleave>,
    ) -> Result<(), CoreError> {
        if image.len() != DISK_IMAGE_SIZE {
            return Err(CoreError::IoLoadFailed(format!(
                "disk image must be exactly {DISK_IMAGE_SIZE} bytes, got {}",
                image.len()
            )));
        }
        let interleave = interleave_override.unwrap_or_else(|| interleave::detect(path, &image));
        self.volume = interleave::detect_volume(&image, interleave);
        self.interleave = interleave;
        self.image = image;
        self.loaded = true;
        self.materialized_track = None;
        self.track_buf = vec![0xFF; TRACK_NIBBLE_SIZE];
        self.index = 0;
        Ok(())
    }

    /// The 16 sectors belonging to `track`, in file order (the order
    /// `encode_track`'s `interleave` argument maps into physical slots).
    fn track_data(&self, track: u8) -> [u8; TRACK_DATA_SIZE] {
        let start = track as usize * TRACK_DATA_SIZE;
        let mut data = [0u8; TRACK_DATA_SIZE];
        data.copy_from_slice(&self.image[start..start + TRACK_DATA_SIZE]);
        data
    }

    /// Regenerate the encoded track buffer for `track`, if it isn't
    /// already the one resident. A no-op when no disk is loaded.
    pub fn materialize(&mut self, track: u8) {
        if !self.loaded {
            return;
        }
        if self.materialized_track == Some(track) {
            return;
        }
        let data = self.track_data(track);
        self.track_buf = track::encode_track(&data, track, self.volume, self.interleave);
        self.index = 0;
        self.materialized_track = Some(track);
    }

    /// Read the next GCR byte under the rotating head and advance it.
    pub fn next_byte(&mut self) -> u8 {
        let byte = self.track_buf[self.index];
        self.index = (self.index + 1) % TRACK_NIBBLE_SIZE;
        byte
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prodos_image() -> Vec<u8> {
        let mut image = vec![0u8; DISK_IMAGE_SIZE];
        image[0..5].copy_from_slice(&[0x01, 0x38, 0xB0, 0x03, 0x4C]);
        image
    }

    #[test]
    fn rejects_wrong_sized_image() {
        let mut disk = Disk::empty();
        let err = disk.load("x.po", vec![0u8; 100], None).unwrap_err();
        assert!(matches!(err, CoreError::IoLoadFailed(_)));
    }

    #[test]
    fn load_detects_interleave_and_materializes_track() {
        let mut disk = Disk::empty();
        disk.load("game.po", prodos_image(), None).unwrap();
        assert_eq!(disk.interleave, Interleave::ProDos);
        disk.materialize(0);
        assert_eq!(disk.track_buf.len(), TRACK_NIBBLE_SIZE);
        assert_eq!(&disk.track_buf[0..3], &[0xD5, 0xAA, 0x96]);
    }

    #[test]
    fn next_byte_wraps_around_the_track() {
        let mut disk = Disk::empty();
        disk.load("game.po", prodos_image(), None).unwrap();
        disk.materialize(0);
        disk.index = TRACK_NIBBLE_SIZE - 1;
        let _ = disk.next_byte();
        assert_eq!(disk.index, 0);
    }

    #[test]
    fn rematerializing_the_same_track_is_a_no_op() {
        let mut disk = Disk::empty();
        disk.load("game.po", prodos_image(), None).unwrap();
        disk.materialize(5);
        disk.index = 42;
        disk.materialize(5);
        assert_eq!(disk.index, 42);
    }
}
