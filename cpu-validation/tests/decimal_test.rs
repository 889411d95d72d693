//! Exhaustive BCD round-trip property test: for every two-digit BCD pair
//! and both initial carry states, ADC followed by SBC of the same operand
//! (carrying the intermediate carry/borrow flag across) returns the
//! original accumulator value. Adapted from Bruce Clark's "Decimal Mode"
//! 6502 test, scoped down from the full byte range to valid two-digit BCD
//! since the CMOS core's decimal ADC/SBC only define behavior for legal
//! BCD operands.

use phosphor_core::cpu::w65c02::W65C02;
use phosphor_core::memory::Memory;

const FLAG_CARRY: u8 = 0x01;
const FLAG_DECIMAL: u8 = 0x08;

fn bcd(n: u8) -> u8 {
    ((n / 10) << 4) | (n % 10)
}

fn adc_immediate(cpu: &mut W65C02, mem: &mut Memory, operand: u8) {
    cpu.pc = 0x0200;
    mem.write(0x0200, 0x69).unwrap();
    mem.write(0x0201, operand).unwrap();
    cpu.step(mem).unwrap();
}

fn sbc_immediate(cpu: &mut W65C02, mem: &mut Memory, operand: u8) {
    cpu.pc = 0x0200;
    mem.write(0x0200, 0xE9).unwrap();
    mem.write(0x0201, operand).unwrap();
    cpu.step(mem).unwrap();
}

#[test]
fn decimal_adc_then_sbc_round_trips_for_all_bcd_pairs() {
    let mut mem = Memory::new();

    for a in 0u8..100 {
        for m in 0u8..100 {
            for &carry_in in &[false, true] {
                let mut cpu = W65C02::new();
                cpu.a = bcd(a);
                cpu.p = FLAG_DECIMAL | if carry_in { FLAG_CARRY } else { 0 };
                adc_immediate(&mut cpu, &mut mem, bcd(m));

                let carry_after_adc = cpu.p & FLAG_CARRY != 0;
                cpu.p = FLAG_DECIMAL | if carry_after_adc { FLAG_CARRY } else { 0 };
                sbc_immediate(&mut cpu, &mut mem, bcd(m));

                assert_eq!(
                    cpu.a,
                    bcd(a),
                    "a={a} m={m} carry_in={carry_in}: ADC then SBC did not round-trip"
                );
            }
        }
    }
}
