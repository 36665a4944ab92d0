//! Fixed architectural addresses of the 6502 memory map.

/// First address of the zero page.
pub const ZERO_PAGE_START: u16 = 0x0000;
/// Last address of the zero page.
pub const ZERO_PAGE_END: u16 = 0x00FF;
/// Base address of the hardware stack page (`0x0100 | SP`).
pub const STACK_PAGE: u16 = 0x0100;
/// Non-maskable interrupt vector (little-endian word).
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector (little-endian word).
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector (little-endian word).
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Returns the stack address addressed by an 8-bit stack pointer.
#[must_use]
pub const fn stack_address(sp: u8) -> u16 {
    STACK_PAGE | sp as u16
}

/// Returns the zero-page address formed by an 8-bit operand.
#[must_use]
pub const fn zero_page_address(offset: u8) -> u16 {
    ZERO_PAGE_START | offset as u16
}

/// Returns `true` when `a` and `b` lie on different 256-byte pages.
#[must_use]
pub const fn crosses_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}
