//! Sector-order tables mapping a sector's physical position on a GCR track
//! to its logical sector number within a linear disk image. Which table
//! applies depends on how the image file orders its sectors.

/// DOS 3.3 order (`.dsk`/`.do`): physical slot N on the track holds
/// logical sector `DOS_ORDER[N]`.
pub const DOS_ORDER: [usize; 16] = [
    0x0, 0x7, 0xE, 0x6, 0xD, 0x5, 0xC, 0x4, 0xB, 0x3, 0xA, 0x2, 0x9, 0x1, 0x8, 0xF,
];

/// ProDOS order (`.po`): physical slot N on the track holds logical
/// sector `PRODOS_ORDER[N]`.
pub const PRODOS_ORDER: [usize; 16] = [
    0x0, 0x8, 0x1, 0x9, 0x2, 0xA, 0x3, 0xB, 0x4, 0xC, 0x5, 0xD, 0x6, 0xE, 0x7, 0xF,
];

/// A raw image with no sector translation: physical slot N holds logical
/// sector N.
pub const RAW_ORDER: [usize; 16] = [
    0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7, 0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xE, 0xF,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interleave {
    Dos33,
    ProDos,
    Raw,
}

impl Interleave {
    pub fn table(self) -> &'static [usize; 16] {
        match self {
            Interleave::Dos33 => &DOS_ORDER,
            Interleave::ProDos => &PRODOS_ORDER,
            Interleave::Raw => &RAW_ORDER,
        }
    }
}

/// Guess a disk image's sector order from its file extension alone.
/// Returns `None` for extensions that don't identify an interleave, so
/// [`detect`] can fall back to signature sniffing.
fn detect_from_extension(path: &str) -> Option<Interleave> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".do") {
        Some(Interleave::Dos33)
    } else if lower.ends_with(".po") {
        Some(Interleave::ProDos)
    } else {
        None
    }
}

const DOS_BOOT_SIGNATURE: [u8; 5] = [0x01, 0xA5, 0x27, 0xC9, 0x09];
const PRODOS_BOOT_SIGNATURE: [u8; 5] = [0x01, 0x38, 0xB0, 0x03, 0x4C];

/// Guess a disk image's sector order from the boot-loader bytes at file
/// offset 0, falling back to raw (identity) order when neither known
/// signature matches.
fn detect_from_signature(image: &[u8]) -> Interleave {
    if image.starts_with(&DOS_BOOT_SIGNATURE) {
        Interleave::Dos33
    } else if image.starts_with(&PRODOS_BOOT_SIGNATURE) {
        Interleave::ProDos
    } else {
        Interleave::Raw
    }
}

/// Auto-detect a disk image's sector order: file extension first, then
/// boot-sector signature, then raw as the final fallback.
pub fn detect(path: &str, image: &[u8]) -> Interleave {
    detect_from_extension(path).unwrap_or_else(|| detect_from_signature(image))
}

/// File offset of the DOS 3.3 VTOC (track 17, sector 0).
pub const VTOC_OFFSET: usize = 0x11006;

/// Volume number DOS 3.3 uses when a disk image doesn't override it via
/// its VTOC.
pub const DEFAULT_VOLUME: u8 = 254;

/// Read the volume number out of a DOS-interleaved image's VTOC; any
/// other interleave (or an image too short to hold a VTOC) keeps the
/// DOS 3.3 default.
pub fn detect_volume(image: &[u8], interleave: Interleave) -> u8 {
    if interleave == Interleave::Dos33 {
        if let Some(&byte) = image.get(VTOC_OFFSET) {
            return byte;
        }
    }
    DEFAULT_VOLUME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_permutations_of_0_through_15() {
        for table in [&DOS_ORDER, &PRODOS_ORDER, &RAW_ORDER] {
            let mut sorted = table.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn extension_detection() {
        assert_eq!(detect("game.do", &[]), Interleave::Dos33);
        assert_eq!(detect("game.po", &[]), Interleave::ProDos);
    }

    #[test]
    fn signature_detection_without_a_recognized_extension() {
        let mut dos_image = vec![0u8; 32];
        dos_image[0..5].copy_from_slice(&DOS_BOOT_SIGNATURE);
        assert_eq!(detect("game.dsk", &dos_image), Interleave::Dos33);

        let mut prodos_image = vec![0u8; 32];
        prodos_image[0..5].copy_from_slice(&PRODOS_BOOT_SIGNATURE);
        assert_eq!(detect("game.dsk", &prodos_image), Interleave::ProDos);

        assert_eq!(detect("game.dsk", &[0u8; 32]), Interleave::Raw);
    }

    #[test]
    fn volume_defaults_to_254_unless_dos_vtoc_overrides_it() {
        assert_eq!(detect_volume(&[0u8; 32], Interleave::ProDos), 254);
        assert_eq!(detect_volume(&[0u8; 32], Interleave::Raw), 254);

        let mut dos_image = vec![0u8; VTOC_OFFSET + 1];
        dos_image[VTOC_OFFSET] = 17;
        assert_eq!(detect_volume(&dos_image, Interleave::Dos33), 17);
    }
}
