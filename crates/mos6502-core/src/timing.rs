//! Cycle accounting rules layered on top of the per-opcode base costs.

use crate::encoding::InstructionDescriptor;
use crate::memory::crosses_page;

pub use crate::encoding::UNIMPLEMENTED_CYCLES;

/// Cycles consumed entering an IRQ or NMI handler.
pub const INTERRUPT_SERVICE_CYCLES: u8 = 7;

/// Extra cycle when a read instruction's indexed address crosses a page.
pub const PAGE_CROSS_PENALTY: u8 = 1;

/// Extra cycle for a taken branch.
pub const BRANCH_TAKEN_PENALTY: u8 = 1;

/// Further extra cycle when a taken branch lands on a different page.
pub const BRANCH_PAGE_CROSS_PENALTY: u8 = 1;

/// Penalty applied when resolution reported a page crossing.
///
/// Only read-class operations pay it; stores and read-modify-write forms
/// already include the fix-up cycle in their base cost.
#[must_use]
pub const fn page_cross_penalty(descriptor: &InstructionDescriptor, page_crossed: bool) -> u8 {
    if page_crossed && descriptor.operation.is_read() && descriptor.mode.is_indexed_absolute() {
        PAGE_CROSS_PENALTY
    } else {
        0
    }
}

/// Extra cycles for a branch: none when not taken, one when taken, two when
/// the target lies on a different page than the instruction after the branch.
#[must_use]
pub const fn branch_penalty(taken: bool, next_pc: u16, target: u16) -> u8 {
    if !taken {
        0
    } else if crosses_page(next_pc, target) {
        BRANCH_TAKEN_PENALTY + BRANCH_PAGE_CROSS_PENALTY
    } else {
        BRANCH_TAKEN_PENALTY
    }
}

/// Total cycle cost of an instruction.
#[must_use]
pub const fn instruction_cycles(
    descriptor: &InstructionDescriptor,
    page_penalty: u8,
    branch: u8,
) -> u8 {
    descriptor.base_cycles + page_penalty + branch
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{branch_penalty, instruction_cycles, page_cross_penalty};
    use crate::encoding::instruction;

    #[rstest]
    #[case(0xBD, true, 1)] // LDA abs,X
    #[case(0xB1, true, 1)] // LDA (zp),Y
    #[case(0x7D, true, 1)] // ADC abs,X
    #[case(0xBD, false, 0)]
    #[case(0x9D, true, 0)] // STA abs,X
    #[case(0x91, true, 0)] // STA (zp),Y
    #[case(0xFE, true, 0)] // INC abs,X
    #[case(0x1E, true, 0)] // ASL abs,X
    fn page_cross_penalty_applies_to_reads_only(
        #[case] opcode: u8,
        #[case] crossed: bool,
        #[case] expected: u8,
    ) {
        assert_eq!(page_cross_penalty(instruction(opcode), crossed), expected);
    }

    #[rstest]
    #[case(false, 0x0602, 0x0610, 0)]
    #[case(true, 0x0602, 0x0610, 1)]
    #[case(true, 0x06F0, 0x0710, 2)]
    #[case(true, 0x0602, 0x05F0, 2)]
    fn branch_penalties(
        #[case] taken: bool,
        #[case] next_pc: u16,
        #[case] target: u16,
        #[case] expected: u8,
    ) {
        assert_eq!(branch_penalty(taken, next_pc, target), expected);
    }

    #[test]
    fn total_cost_adds_penalties_to_base() {
        assert_eq!(instruction_cycles(instruction(0xB9), 1, 0), 5);
        assert_eq!(instruction_cycles(instruction(0xD0), 0, 2), 4);
        assert_eq!(instruction_cycles(instruction(0x00), 0, 0), 7);
    }
}
