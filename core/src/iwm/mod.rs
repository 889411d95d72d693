//! The Integrated Woz Machine: the Disk II controller's soft switches
//! ($C0E0-$C0EF), a stepper-motor model that turns coil-phase energy into
//! half-track motion, and the two drive slots it serves. `Iwm` owns no
//! reference to [`Memory`](crate::memory::Memory) — like the CPU, it is a
//! plain struct the composing machine addresses directly once it
//! recognizes an access falls in the disk controller's I/O sub-range.

pub mod disk;
pub mod gcr;
pub mod interleave;
pub mod track;

use crate::error::CoreError;
use disk::Disk;
use interleave::Interleave;

pub const DRIVE_COUNT: usize = 2;
/// Half-tracks 0..=69 (tracks 0..=34); the stepper never goes further.
pub const MAX_HALF_TRACK: usize = 69;
const STEP_ENERGY_THRESHOLD: u32 = 1000;

pub struct Iwm {
    pub ph0: bool,
    pub ph1: bool,
    pub ph2: bool,
    pub ph3: bool,
    ph_energy: [u32; 4],

    pub motor_on: bool,
    pub drive_select: usize,
    pub l6: bool,
    pub l7: bool,

    pub stepper_pos: usize,
    pub mode: u8,
    pub data: u8,
    pub status: u8,
    pub handshake: u8,

    drives: [Disk; DRIVE_COUNT],
}

impl Default for Iwm {
    fn default() -> Self {
        Self::new()
    }
}

impl Iwm {
    pub fn new() -> Self {
        Iwm {
            ph0: false,
            ph1: false,
            ph2: false,
            ph3: false,
            ph_energy: [0; 4],
            motor_on: false,
            drive_select: 0,
            l6: false,
            l7: false,
            stepper_pos: 0,
            mode: 0,
            data: 0,
            status: 0,
            handshake: 0,
            drives: [Disk::empty(), Disk::empty()],
        }
    }

    /// Load a flat disk image into `drive` (0 or 1). The currently
    /// selected drive's track buffer is regenerated lazily on its next
    /// read, not here.
    pub fn load_disk(
        &mut self,
        drive: usize,
        path: &str,
        image: Vec<u8>,
        interleave_override: Option<Interleave>,
    ) -> Result<(), CoreError> {
        let slot = self
            .drives
            .get_mut(drive)
            .ok_or(CoreError::DisksError { drive })?;
        slot.load(path, image, interleave_override)
    }

    pub fn disk(&self, drive: usize) -> Option<&Disk> {
        self.drives.get(drive)
    }

    fn current_track(&self) -> u8 {
        (self.stepper_pos / 2) as u8
    }

    fn apply_switch(&mut self, address: u16) {
        let n = (address - 0xC0E0) as u8;
        let set = n % 2 == 1;
        match n / 2 {
            0 => self.ph0 = set,
            1 => self.ph1 = set,
            2 => self.ph2 = set,
            3 => self.ph3 = set,
            4 => self.motor_on = set,
            5 => self.drive_select = set as usize,
            6 => self.l6 = set,
            7 => self.l7 = set,
            _ => unreachable!("$C0E0-$C0EF only has 16 switch addresses"),
        }
    }

    /// Handle a read of $C0E0-$C0EF: apply the address's switch effect,
    /// then return the byte the current l6/l7/motor_on state selects.
    pub fn read(&mut self, address: u16) -> u8 {
        self.apply_switch(address);
        match (self.l6, self.l7) {
            (false, false) => {
                if self.motor_on {
                    self.drives[self.drive_select].materialize(self.current_track());
                    self.drives[self.drive_select].next_byte()
                } else {
                    0xFF
                }
            }
            (false, true) => self.handshake,
            (true, false) => (self.mode & 0x1F) | ((self.motor_on as u8) << 5),
            (true, true) => 0,
        }
    }

    /// Handle a write to $C0E0-$C0EF: apply the address's switch effect,
    /// then — if l6/l7 now both read 1 — treat `value` as a mode or data
    /// register write per the IWM's Q6/Q7=1,1 write cycle.
    pub fn write(&mut self, address: u16, value: u8) {
        self.apply_switch(address);
        if self.l6 && self.l7 {
            if !self.motor_on {
                self.mode = value;
            } else {
                // Writes to media aren't supported; the byte is accepted
                // (so software polling `handshake` doesn't wedge) and
                // discarded.
                self.data = value;
            }
        }
    }

    /// Advance the stepper-motor energy model by one cycle. Call this
    /// once per CPU cycle consumed, the same cadence as every other
    /// per-cycle collaborator.
    ///
    /// Each coil's energy counter climbs while its phase is held on and
    /// resets the instant it's released. A half-track step fires when the
    /// coil at the current position has been released and a neighboring
    /// coil has built up enough energy — the quadrature-stepping sequence
    /// real Disk II software drives the phases through. Once the step
    /// lands, the new position's coil is the one now energized, which
    /// stops the check from re-firing every subsequent tick.
    pub fn tick(&mut self) {
        let phases = [self.ph0, self.ph1, self.ph2, self.ph3];
        for i in 0..4 {
            if phases[i] {
                self.ph_energy[i] = self.ph_energy[i].saturating_add(1);
            } else {
                self.ph_energy[i] = 0;
            }
        }

        let cur = self.stepper_pos % 4;
        if !phases[cur] {
            let next = (cur + 1) % 4;
            let prev = (cur + 3) % 4;
            if self.ph_energy[next] > STEP_ENERGY_THRESHOLD {
                self.step(1);
            } else if self.ph_energy[prev] > STEP_ENERGY_THRESHOLD {
                self.step(-1);
            }
        }
    }

    /// A one-line snapshot of controller state, for the debugger's `i`
    /// command.
    pub fn dump(&self) -> String {
        format!(
            "drive={} motor_on={} half_track={} (track {}) l6={} l7={} mode={:02x} status={:02x} handshake={:02x}",
            self.drive_select,
            self.motor_on,
            self.stepper_pos,
            self.current_track(),
            self.l6,
            self.l7,
            self.mode,
            self.status,
            self.handshake,
        )
    }

    fn step(&mut self, direction: i32) {
        let new_pos = if direction > 0 {
            self.stepper_pos.saturating_add(1).min(MAX_HALF_TRACK)
        } else {
            self.stepper_pos.saturating_sub(1)
        };
        if new_pos != self.stepper_pos {
            self.stepper_pos = new_pos;
            self.drives[self.drive_select].materialize(self.current_track());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prodos_image() -> Vec<u8> {
        let mut image = vec![0u8; disk::DISK_IMAGE_SIZE];
        image[0..5].copy_from_slice(&[0x01, 0x38, 0xB0, 0x03, 0x4C]);
        image
    }

    #[test]
    fn reading_with_motor_off_returns_ff() {
        let mut iwm = Iwm::new();
        iwm.write(0xC0E8, 0); // motor off (even)
        iwm.write(0xC0EC, 0); // l6 clear
        iwm.write(0xC0EE, 0); // l7 clear
        let value = iwm.read(0xC0EC);
        assert_eq!(value, 0xFF);
    }

    #[test]
    fn disk_read_prologue_appears_sixteen_times() {
        let mut iwm = Iwm::new();
        iwm.load_disk(0, "game.po", prodos_image(), None).unwrap();
        iwm.write(0xC0E9, 0); // motor on (odd)
        iwm.write(0xC0EC, 0); // l6 clear
        iwm.write(0xC0EE, 0); // l7 clear

        let mut bytes = Vec::with_capacity(track::TRACK_NIBBLE_SIZE);
        for _ in 0..track::TRACK_NIBBLE_SIZE {
            bytes.push(iwm.read(0xC0EC));
        }
        let address_hits = bytes.windows(3).filter(|w| w == &[0xD5, 0xAA, 0x96]).count();
        let data_hits = bytes.windows(3).filter(|w| w == &[0xD5, 0xAA, 0xAD]).count();
        assert!(address_hits >= 16, "expected >=16 address prologues, got {address_hits}");
        assert!(data_hits >= 16, "expected >=16 data prologues, got {data_hits}");
    }

    #[test]
    fn mode_register_write_only_takes_effect_with_motor_off() {
        let mut iwm = Iwm::new();
        iwm.write(0xC0E8, 0); // motor off
        iwm.write(0xC0ED, 0); // l6 set
        iwm.write(0xC0EF, 0x15); // l7 set, and this write IS the mode write
        assert_eq!(iwm.mode, 0x15);

        iwm.write(0xC0E9, 0); // motor on
        iwm.write(0xC0EF, 0x3F); // l7 still set; motor on now -> data write, not mode
        assert_eq!(iwm.mode, 0x15);
    }

    #[test]
    fn status_read_combines_mode_low_bits_and_motor_bit() {
        let mut iwm = Iwm::new();
        iwm.write(0xC0E8, 0); // motor off
        iwm.write(0xC0ED, 0); // l6 set
        iwm.write(0xC0EF, 0xFF); // l7 set, mode write (masked to 0x1F on read)
        iwm.write(0xC0E9, 0); // motor on
        iwm.write(0xC0EE, 0); // l7 clear -> (l6=true, l7=false): status branch
        let status = iwm.read(0xC0ED); // l6 stays set (odd address)
        assert_eq!(status, 0x1F | (1 << 5));
    }

    #[test]
    fn half_track_steps_exactly_once_after_sustained_energy() {
        let mut iwm = Iwm::new();
        iwm.write(0xC0E9, 0); // motor on
        iwm.write(0xC0E2, 0); // ph1 on ($C0E2 is even = clear; use odd for set)
        iwm.write(0xC0E3, 0); // ph1 set
        for _ in 0..1500 {
            iwm.tick();
        }
        assert_eq!(iwm.stepper_pos, 1);
    }

    #[test]
    fn stepper_position_clamps_at_zero() {
        let iwm = Iwm::new();
        assert_eq!(iwm.stepper_pos, 0);
    }
}
