//! A 6551-style ACIA register model: the four memory-mapped bytes
//! (data, status, command, control) software pokes to talk to a serial
//! line, plus the transmit/receive FIFOs that drain into and fill from a
//! host TTY. The host transport itself is a collaborator behind
//! [`HostTty`] — this module only owns the register-level state machine,
//! kept separate from whatever drives the physical pins the way other
//! hardware register models in this workspace are.

use std::collections::VecDeque;

use phosphor_core::prelude::AciaPort;

/// Baud rates the 6551's control register selects, mapped to their POSIX
/// termios constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaudRate {
    B300,
    B600,
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
}

impl BaudRate {
    /// Decode the control register's low nibble (bits 0-3) into a baud
    /// rate. Unrecognized codes fall back to 9600, this ACIA's power-on
    /// default.
    pub fn from_control_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x01 => BaudRate::B300,
            0x02 => BaudRate::B600,
            0x03 => BaudRate::B1200,
            0x05 => BaudRate::B2400,
            0x07 => BaudRate::B4800,
            0x0E => BaudRate::B9600,
            0x0F => BaudRate::B19200,
            _ => BaudRate::B9600,
        }
    }

    /// The termios `Bxxxxx` symbolic name this rate corresponds to.
    pub fn termios_name(self) -> &'static str {
        match self {
            BaudRate::B300 => "B300",
            BaudRate::B600 => "B600",
            BaudRate::B1200 => "B1200",
            BaudRate::B2400 => "B2400",
            BaudRate::B4800 => "B4800",
            BaudRate::B9600 => "B9600",
            BaudRate::B19200 => "B19200",
        }
    }
}

/// Word length the control register's bits 5-6 select, named after the
/// termios `CSn` constants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WordLength {
    Cs5,
    Cs6,
    Cs7,
    Cs8,
}

impl WordLength {
    pub fn from_control_bits(bits: u8) -> Self {
        match (bits >> 5) & 0x03 {
            0b11 => WordLength::Cs8,
            0b10 => WordLength::Cs7,
            0b01 => WordLength::Cs6,
            _ => WordLength::Cs5,
        }
    }
}

const STATUS_RX_FULL: u8 = 0x01;
const STATUS_TX_EMPTY: u8 = 0x02;
const STATUS_OVERRUN: u8 = 0x04;
const STATUS_FRAMING_ERROR: u8 = 0x08;
const STATUS_IRQ: u8 = 0x80;

/// A non-blocking transport the ACIA's FIFOs drain into and fill from.
/// The register model polls it; it never suspends the caller.
pub trait HostTty {
    /// Pull at most one byte from the host if one is waiting.
    fn poll_read(&mut self) -> Option<u8>;
    /// Push one byte to the host. Never blocks.
    fn write_byte(&mut self, byte: u8);
}

/// A transport with nothing on the other end: reads never produce a
/// byte, writes are discarded. The default when no TTY device path was
/// given at startup.
#[derive(Default)]
pub struct NullTty;

impl HostTty for NullTty {
    fn poll_read(&mut self) -> Option<u8> {
        None
    }
    fn write_byte(&mut self, _byte: u8) {}
}

pub struct Acia<T: HostTty = NullTty> {
    pub control: u8,
    pub command: u8,
    status: u8,
    rx: VecDeque<u8>,
    tx: VecDeque<u8>,
    tty: T,
}

impl Default for Acia<NullTty> {
    fn default() -> Self {
        Self::new(NullTty)
    }
}

impl<T: HostTty> Acia<T> {
    pub fn new(tty: T) -> Self {
        Acia {
            control: 0,
            command: 0,
            status: STATUS_TX_EMPTY,
            rx: VecDeque::new(),
            tx: VecDeque::new(),
            tty,
        }
    }

    pub fn baud_rate(&self) -> BaudRate {
        BaudRate::from_control_bits(self.control)
    }

    pub fn word_length(&self) -> WordLength {
        WordLength::from_control_bits(self.control)
    }

    /// Read one of the four memory-mapped registers at `offset` (0..=3
    /// relative to the ACIA's base address: data, status, command,
    /// control).
    pub fn read(&mut self, offset: u16) -> u8 {
        match offset & 0x03 {
            0 => {
                let byte = self.rx.pop_front().unwrap_or(0);
                if self.rx.is_empty() {
                    self.status &= !STATUS_RX_FULL;
                }
                byte
            }
            1 => self.status,
            2 => self.command,
            3 => self.control,
            _ => unreachable!(),
        }
    }

    /// Write one of the four memory-mapped registers.
    pub fn write(&mut self, offset: u16, value: u8) {
        match offset & 0x03 {
            0 => {
                self.tx.push_back(value);
                self.status &= !STATUS_TX_EMPTY;
            }
            1 => {
                // Any write to the status register offset resets the
                // ACIA, per the 6551: clears the overrun/framing flags.
                self.status &= !(STATUS_OVERRUN | STATUS_FRAMING_ERROR);
            }
            2 => self.command = value,
            3 => self.control = value,
            _ => unreachable!(),
        }
    }

    /// Drain one queued transmit byte to the host and pull one received
    /// byte from the host into the receive FIFO, if either is ready.
    /// Call this from the outer driver's per-N-cycle poll, not once per
    /// CPU cycle.
    pub fn poll(&mut self) {
        if let Some(byte) = self.tx.pop_front() {
            self.tty.write_byte(byte);
        }
        if self.tx.is_empty() {
            self.status |= STATUS_TX_EMPTY;
        }

        if let Some(byte) = self.tty.poll_read() {
            if self.rx.len() >= 1 && self.status & STATUS_RX_FULL != 0 {
                self.status |= STATUS_OVERRUN;
            }
            self.rx.push_back(byte);
            self.status |= STATUS_RX_FULL;
        }
    }

    pub fn irq_pending(&self) -> bool {
        self.status & STATUS_IRQ != 0
    }
}

impl<T: HostTty> AciaPort for Acia<T> {
    fn read(&mut self, offset: u16) -> u8 {
        Acia::read(self, offset)
    }

    fn write(&mut self, offset: u16, value: u8) {
        Acia::write(self, offset, value)
    }

    fn poll(&mut self) {
        Acia::poll(self)
    }

    fn irq_pending(&self) -> bool {
        Acia::irq_pending(self)
    }

    fn debug_dump(&self) -> String {
        format!(
            "status={:02x} command={:02x} control={:02x} baud={} rx_pending={} tx_pending={}",
            self.status,
            self.command,
            self.control,
            self.baud_rate().termios_name(),
            self.rx.len(),
            self.tx.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LoopbackTty {
        inbox: VecDeque<u8>,
        outbox: Vec<u8>,
    }

    impl HostTty for LoopbackTty {
        fn poll_read(&mut self) -> Option<u8> {
            self.inbox.pop_front()
        }
        fn write_byte(&mut self, byte: u8) {
            self.outbox.push(byte);
        }
    }

    #[test]
    fn baud_rate_decodes_control_bits() {
        assert_eq!(BaudRate::from_control_bits(0x0E), BaudRate::B9600);
        assert_eq!(BaudRate::from_control_bits(0x0F), BaudRate::B19200);
        assert_eq!(BaudRate::from_control_bits(0x01), BaudRate::B300);
    }

    #[test]
    fn word_length_decodes_control_bits() {
        assert_eq!(WordLength::from_control_bits(0b0110_0000), WordLength::Cs8);
        assert_eq!(WordLength::from_control_bits(0b0000_0000), WordLength::Cs5);
    }

    #[test]
    fn data_write_queues_for_transmit_and_clears_tx_empty() {
        let mut acia = Acia::new(NullTty);
        acia.write(0, 0x41);
        assert_eq!(acia.read(1) & STATUS_TX_EMPTY, 0);
    }

    #[test]
    fn poll_drains_transmit_and_fills_receive_from_host() {
        let tty = LoopbackTty {
            inbox: VecDeque::from([0x58]),
            outbox: Vec::new(),
        };
        let mut acia = Acia::new(tty);
        acia.write(0, 0x41);
        acia.poll();
        assert_eq!(acia.read(0), 0x58);
        assert_eq!(acia.status & STATUS_TX_EMPTY, STATUS_TX_EMPTY);
    }

    #[test]
    fn receive_fifo_empties_clear_rx_full_flag() {
        let tty = LoopbackTty {
            inbox: VecDeque::from([0x01]),
            outbox: Vec::new(),
        };
        let mut acia = Acia::new(tty);
        acia.poll();
        assert_ne!(acia.read(1) & STATUS_RX_FULL, 0);
        let _ = acia.read(0);
        assert_eq!(acia.read(1) & STATUS_RX_FULL, 0);
    }
}
