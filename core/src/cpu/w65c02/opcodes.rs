//! The 256-entry W65C02 opcode table: mnemonic, addressing mode, and base
//! cycle count per opcode. Shared between the interpreter (for base cycle
//! counts) and the instruction trace's disassembler (for pretty-printing).

/// One of the 16 addressing modes the W65C02 encodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddrMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP (abs): a two-byte absolute pointer, dereferenced once.
    Indirect,
    IndirectX,
    IndirectY,
    IndirectAbsX,
    Relative,
    /// BBRn/BBSn: a zero-page operand followed by a relative branch offset.
    ZeroPageRelative,
    /// The 65C02 addition (zp): a one-byte zero-page pointer, no index —
    /// distinct from JMP's two-byte `Indirect`.
    ZeroPageIndirect,
}

impl AddrMode {
    /// Number of operand bytes following the opcode byte.
    pub fn operand_len(self) -> u8 {
        use AddrMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndirectX | IndirectY
            | ZeroPageIndirect | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | IndirectAbsX | ZeroPageRelative | Indirect => 2,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct OpInfo {
    pub mnemonic: &'static str,
    pub mode: AddrMode,
    pub cycles: u8,
}

const fn op(mnemonic: &'static str, mode: AddrMode, cycles: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        mode,
        cycles,
    }
}

use AddrMode::*;

/// The canonical W65C02 opcode matrix (WDC/Rockwell numbering). Every one of
/// the 256 encodings is legal: opcodes the NMOS 6502 left undefined either
/// gained a documented Rockwell/WDC instruction (BRA, PHX/PHY/PLX/PLY, STZ,
/// TRB/TSB, RMBn/SMBn, BBRn/BBSn, the extra BIT/(zp) forms) or became a
/// multi-byte NOP that still consumes its operand bytes.
pub static OPCODES: [OpInfo; 256] = [
    /* 0x00 */ op("BRK", Implied, 7),
    /* 0x01 */ op("ORA", IndirectX, 6),
    /* 0x02 */ op("NOP", Immediate, 2),
    /* 0x03 */ op("NOP", Implied, 1),
    /* 0x04 */ op("TSB", ZeroPage, 5),
    /* 0x05 */ op("ORA", ZeroPage, 3),
    /* 0x06 */ op("ASL", ZeroPage, 5),
    /* 0x07 */ op("RMB0", ZeroPage, 5),
    /* 0x08 */ op("PHP", Implied, 3),
    /* 0x09 */ op("ORA", Immediate, 2),
    /* 0x0A */ op("ASL", Accumulator, 2),
    /* 0x0B */ op("NOP", Implied, 1),
    /* 0x0C */ op("TSB", Absolute, 6),
    /* 0x0D */ op("ORA", Absolute, 4),
    /* 0x0E */ op("ASL", Absolute, 6),
    /* 0x0F */ op("BBR0", ZeroPageRelative, 5),
    /* 0x10 */ op("BPL", Relative, 2),
    /* 0x11 */ op("ORA", IndirectY, 5),
    /* 0x12 */ op("ORA", ZeroPageIndirect, 5),
    /* 0x13 */ op("NOP", Implied, 1),
    /* 0x14 */ op("TRB", ZeroPage, 5),
    /* 0x15 */ op("ORA", ZeroPageX, 4),
    /* 0x16 */ op("ASL", ZeroPageX, 6),
    /* 0x17 */ op("RMB1", ZeroPage, 5),
    /* 0x18 */ op("CLC", Implied, 2),
    /* 0x19 */ op("ORA", AbsoluteY, 4),
    /* 0x1A */ op("INC", Accumulator, 2),
    /* 0x1B */ op("NOP", Implied, 1),
    /* 0x1C */ op("TRB", Absolute, 6),
    /* 0x1D */ op("ORA", AbsoluteX, 4),
    /* 0x1E */ op("ASL", AbsoluteX, 6),
    /* 0x1F */ op("BBR1", ZeroPageRelative, 5),
    /* 0x20 */ op("JSR", Absolute, 6),
    /* 0x21 */ op("AND", IndirectX, 6),
    /* 0x22 */ op("NOP", Immediate, 2),
    /* 0x23 */ op("NOP", Implied, 1),
    /* 0x24 */ op("BIT", ZeroPage, 3),
    /* 0x25 */ op("AND", ZeroPage, 3),
    /* 0x26 */ op("ROL", ZeroPage, 5),
    /* 0x27 */ op("RMB2", ZeroPage, 5),
    /* 0x28 */ op("PLP", Implied, 4),
    /* 0x29 */ op("AND", Immediate, 2),
    /* 0x2A */ op("ROL", Accumulator, 2),
    /* 0x2B */ op("NOP", Implied, 1),
    /* 0x2C */ op("BIT", Absolute, 4),
    /* 0x2D */ op("AND", Absolute, 4),
    /* 0x2E */ op("ROL", Absolute, 6),
    /* 0x2F */ op("BBR2", ZeroPageRelative, 5),
    /* 0x30 */ op("BMI", Relative, 2),
    /* 0x31 */ op("AND", IndirectY, 5),
    /* 0x32 */ op("AND", ZeroPageIndirect, 5),
    /* 0x33 */ op("NOP", Implied, 1),
    /* 0x34 */ op("BIT", ZeroPageX, 4),
    /* 0x35 */ op("AND", ZeroPageX, 4),
    /* 0x36 */ op("ROL", ZeroPageX, 6),
    /* 0x37 */ op("RMB3", ZeroPage, 5),
    /* 0x38 */ op("SEC", Implied, 2),
    /* 0x39 */ op("AND", AbsoluteY, 4),
    /* 0x3A */ op("DEC", Accumulator, 2),
    /* 0x3B */ op("NOP", Implied, 1),
    /* 0x3C */ op("BIT", AbsoluteX, 4),
    /* 0x3D */ op("AND", AbsoluteX, 4),
    /* 0x3E */ op("ROL", AbsoluteX, 6),
    /* 0x3F */ op("BBR3", ZeroPageRelative, 5),
    /* 0x40 */ op("RTI", Implied, 6),
    /* 0x41 */ op("EOR", IndirectX, 6),
    /* 0x42 */ op("NOP", Immediate, 2),
    /* 0x43 */ op("NOP", Implied, 1),
    /* 0x44 */ op("NOP", ZeroPage, 3),
    /* 0x45 */ op("EOR", ZeroPage, 3),
    /* 0x46 */ op("LSR", ZeroPage, 5),
    /* 0x47 */ op("RMB4", ZeroPage, 5),
    /* 0x48 */ op("PHA", Implied, 3),
    /* 0x49 */ op("EOR", Immediate, 2),
    /* 0x4A */ op("LSR", Accumulator, 2),
    /* 0x4B */ op("NOP", Implied, 1),
    /* 0x4C */ op("JMP", Absolute, 3),
    /* 0x4D */ op("EOR", Absolute, 4),
    /* 0x4E */ op("LSR", Absolute, 6),
    /* 0x4F */ op("BBR4", ZeroPageRelative, 5),
    /* 0x50 */ op("BVC", Relative, 2),
    /* 0x51 */ op("EOR", IndirectY, 5),
    /* 0x52 */ op("EOR", ZeroPageIndirect, 5),
    /* 0x53 */ op("NOP", Implied, 1),
    /* 0x54 */ op("NOP", ZeroPageX, 4),
    /* 0x55 */ op("EOR", ZeroPageX, 4),
    /* 0x56 */ op("LSR", ZeroPageX, 6),
    /* 0x57 */ op("RMB5", ZeroPage, 5),
    /* 0x58 */ op("CLI", Implied, 2),
    /* 0x59 */ op("EOR", AbsoluteY, 4),
    /* 0x5A */ op("PHY", Implied, 3),
    /* 0x5B */ op("NOP", Implied, 1),
    /* 0x5C */ op("NOP", Absolute, 4),
    /* 0x5D */ op("EOR", AbsoluteX, 4),
    /* 0x5E */ op("LSR", AbsoluteX, 6),
    /* 0x5F */ op("BBR5", ZeroPageRelative, 5),
    /* 0x60 */ op("RTS", Implied, 6),
    /* 0x61 */ op("ADC", IndirectX, 6),
    /* 0x62 */ op("NOP", Immediate, 2),
    /* 0x63 */ op("NOP", Implied, 1),
    /* 0x64 */ op("STZ", ZeroPage, 3),
    /* 0x65 */ op("ADC", ZeroPage, 3),
    /* 0x66 */ op("ROR", ZeroPage, 5),
    /* 0x67 */ op("RMB6", ZeroPage, 5),
    /* 0x68 */ op("PLA", Implied, 4),
    /* 0x69 */ op("ADC", Immediate, 2),
    /* 0x6A */ op("ROR", Accumulator, 2),
    /* 0x6B */ op("NOP", Implied, 1),
    /* 0x6C */ op("JMP", Indirect, 6),
    /* 0x6D */ op("ADC", Absolute, 4),
    /* 0x6E */ op("ROR", Absolute, 6),
    /* 0x6F */ op("BBR6", ZeroPageRelative, 5),
    /* 0x70 */ op("BVS", Relative, 2),
    /* 0x71 */ op("ADC", IndirectY, 5),
    /* 0x72 */ op("ADC", ZeroPageIndirect, 5),
    /* 0x73 */ op("NOP", Implied, 1),
    /* 0x74 */ op("STZ", ZeroPageX, 4),
    /* 0x75 */ op("ADC", ZeroPageX, 4),
    /* 0x76 */ op("ROR", ZeroPageX, 6),
    /* 0x77 */ op("RMB7", ZeroPage, 5),
    /* 0x78 */ op("SEI", Implied, 2),
    /* 0x79 */ op("ADC", AbsoluteY, 4),
    /* 0x7A */ op("PLY", Implied, 4),
    /* 0x7B */ op("NOP", Implied, 1),
    /* 0x7C */ op("JMP", IndirectAbsX, 6),
    /* 0x7D */ op("ADC", AbsoluteX, 4),
    /* 0x7E */ op("ROR", AbsoluteX, 6),
    /* 0x7F */ op("BBR7", ZeroPageRelative, 5),
    /* 0x80 */ op("BRA", Relative, 2),
    /* 0x81 */ op("STA", IndirectX, 6),
    /* 0x82 */ op("NOP", Immediate, 2),
    /* 0x83 */ op("NOP", Implied, 1),
    /* 0x84 */ op("STY", ZeroPage, 3),
    /* 0x85 */ op("STA", ZeroPage, 3),
    /* 0x86 */ op("STX", ZeroPage, 3),
    /* 0x87 */ op("SMB0", ZeroPage, 5),
    /* 0x88 */ op("DEY", Implied, 2),
    /* 0x89 */ op("BIT", Immediate, 2),
    /* 0x8A */ op("TXA", Implied, 2),
    /* 0x8B */ op("NOP", Implied, 1),
    /* 0x8C */ op("STY", Absolute, 4),
    /* 0x8D */ op("STA", Absolute, 4),
    /* 0x8E */ op("STX", Absolute, 4),
    /* 0x8F */ op("BBS0", ZeroPageRelative, 5),
    /* 0x90 */ op("BCC", Relative, 2),
    /* 0x91 */ op("STA", IndirectY, 6),
    /* 0x92 */ op("STA", ZeroPageIndirect, 5),
    /* 0x93 */ op("NOP", Implied, 1),
    /* 0x94 */ op("STY", ZeroPageX, 4),
    /* 0x95 */ op("STA", ZeroPageX, 4),
    /* 0x96 */ op("STX", ZeroPageY, 4),
    /* 0x97 */ op("SMB1", ZeroPage, 5),
    /* 0x98 */ op("TYA", Implied, 2),
    /* 0x99 */ op("STA", AbsoluteY, 5),
    /* 0x9A */ op("TXS", Implied, 2),
    /* 0x9B */ op("NOP", Implied, 1),
    /* 0x9C */ op("STZ", Absolute, 4),
    /* 0x9D */ op("STA", AbsoluteX, 5),
    /* 0x9E */ op("STZ", AbsoluteX, 5),
    /* 0x9F */ op("BBS1", ZeroPageRelative, 5),
    /* 0xA0 */ op("LDY", Immediate, 2),
    /* 0xA1 */ op("LDA", IndirectX, 6),
    /* 0xA2 */ op("LDX", Immediate, 2),
    /* 0xA3 */ op("NOP", Implied, 1),
    /* 0xA4 */ op("LDY", ZeroPage, 3),
    /* 0xA5 */ op("LDA", ZeroPage, 3),
    /* 0xA6 */ op("LDX", ZeroPage, 3),
    /* 0xA7 */ op("SMB2", ZeroPage, 5),
    /* 0xA8 */ op("TAY", Implied, 2),
    /* 0xA9 */ op("LDA", Immediate, 2),
    /* 0xAA */ op("TAX", Implied, 2),
    /* 0xAB */ op("NOP", Implied, 1),
    /* 0xAC */ op("LDY", Absolute, 4),
    /* 0xAD */ op("LDA", Absolute, 4),
    /* 0xAE */ op("LDX", Absolute, 4),
    /* 0xAF */ op("BBS2", ZeroPageRelative, 5),
    /* 0xB0 */ op("BCS", Relative, 2),
    /* 0xB1 */ op("LDA", IndirectY, 5),
    /* 0xB2 */ op("LDA", ZeroPageIndirect, 5),
    /* 0xB3 */ op("NOP", Implied, 1),
    /* 0xB4 */ op("LDY", ZeroPageX, 4),
    /* 0xB5 */ op("LDA", ZeroPageX, 4),
    /* 0xB6 */ op("LDX", ZeroPageY, 4),
    /* 0xB7 */ op("SMB3", ZeroPage, 5),
    /* 0xB8 */ op("CLV", Implied, 2),
    /* 0xB9 */ op("LDA", AbsoluteY, 4),
    /* 0xBA */ op("TSX", Implied, 2),
    /* 0xBB */ op("NOP", Implied, 1),
    /* 0xBC */ op("LDY", AbsoluteX, 4),
    /* 0xBD */ op("LDA", AbsoluteX, 4),
    /* 0xBE */ op("LDX", AbsoluteY, 4),
    /* 0xBF */ op("BBS3", ZeroPageRelative, 5),
    /* 0xC0 */ op("CPY", Immediate, 2),
    /* 0xC1 */ op("CMP", IndirectX, 6),
    /* 0xC2 */ op("NOP", Immediate, 2),
    /* 0xC3 */ op("NOP", Implied, 1),
    /* 0xC4 */ op("CPY", ZeroPage, 3),
    /* 0xC5 */ op("CMP", ZeroPage, 3),
    /* 0xC6 */ op("DEC", ZeroPage, 5),
    /* 0xC7 */ op("SMB4", ZeroPage, 5),
    /* 0xC8 */ op("INY", Implied, 2),
    /* 0xC9 */ op("CMP", Immediate, 2),
    /* 0xCA */ op("DEX", Implied, 2),
    /* 0xCB */ op("WAI", Implied, 3),
    /* 0xCC */ op("CPY", Absolute, 4),
    /* 0xCD */ op("CMP", Absolute, 4),
    /* 0xCE */ op("DEC", Absolute, 6),
    /* 0xCF */ op("BBS4", ZeroPageRelative, 5),
    /* 0xD0 */ op("BNE", Relative, 2),
    /* 0xD1 */ op("CMP", IndirectY, 5),
    /* 0xD2 */ op("CMP", ZeroPageIndirect, 5),
    /* 0xD3 */ op("NOP", Implied, 1),
    /* 0xD4 */ op("NOP", ZeroPageX, 4),
    /* 0xD5 */ op("CMP", ZeroPageX, 4),
    /* 0xD6 */ op("DEC", ZeroPageX, 6),
    /* 0xD7 */ op("SMB5", ZeroPage, 5),
    /* 0xD8 */ op("CLD", Implied, 2),
    /* 0xD9 */ op("CMP", AbsoluteY, 4),
    /* 0xDA */ op("PHX", Implied, 3),
    /* 0xDB */ op("STP", Implied, 3),
    /* 0xDC */ op("NOP", Absolute, 4),
    /* 0xDD */ op("CMP", AbsoluteX, 4),
    /* 0xDE */ op("DEC", AbsoluteX, 7),
    /* 0xDF */ op("BBS5", ZeroPageRelative, 5),
    /* 0xE0 */ op("CPX", Immediate, 2),
    /* 0xE1 */ op("SBC", IndirectX, 6),
    /* 0xE2 */ op("NOP", Immediate, 2),
    /* 0xE3 */ op("NOP", Implied, 1),
    /* 0xE4 */ op("CPX", ZeroPage, 3),
    /* 0xE5 */ op("SBC", ZeroPage, 3),
    /* 0xE6 */ op("INC", ZeroPage, 5),
    /* 0xE7 */ op("SMB6", ZeroPage, 5),
    /* 0xE8 */ op("INX", Implied, 2),
    /* 0xE9 */ op("SBC", Immediate, 2),
    /* 0xEA */ op("NOP", Implied, 2),
    /* 0xEB */ op("NOP", Implied, 1),
    /* 0xEC */ op("CPX", Absolute, 4),
    /* 0xED */ op("SBC", Absolute, 4),
    /* 0xEE */ op("INC", Absolute, 6),
    /* 0xEF */ op("BBS6", ZeroPageRelative, 5),
    /* 0xF0 */ op("BEQ", Relative, 2),
    /* 0xF1 */ op("SBC", IndirectY, 5),
    /* 0xF2 */ op("SBC", ZeroPageIndirect, 5),
    /* 0xF3 */ op("NOP", Implied, 1),
    /* 0xF4 */ op("NOP", ZeroPageX, 4),
    /* 0xF5 */ op("SBC", ZeroPageX, 4),
    /* 0xF6 */ op("INC", ZeroPageX, 6),
    /* 0xF7 */ op("SMB7", ZeroPage, 5),
    /* 0xF8 */ op("SED", Implied, 2),
    /* 0xF9 */ op("SBC", AbsoluteY, 4),
    /* 0xFA */ op("PLX", Implied, 4),
    /* 0xFB */ op("NOP", Implied, 1),
    /* 0xFC */ op("NOP", Absolute, 4),
    /* 0xFD */ op("SBC", AbsoluteX, 4),
    /* 0xFE */ op("INC", AbsoluteX, 7),
    /* 0xFF */ op("BBS7", ZeroPageRelative, 5),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_opcode() {
        assert_eq!(OPCODES.len(), 256);
    }

    #[test]
    fn bra_is_relative() {
        assert_eq!(OPCODES[0x80].mnemonic, "BRA");
        assert_eq!(OPCODES[0x80].mode, Relative);
    }

    #[test]
    fn stp_and_wai_present() {
        assert_eq!(OPCODES[0xDB].mnemonic, "STP");
        assert_eq!(OPCODES[0xCB].mnemonic, "WAI");
    }
}
