//! Flat byte-addressed memory image with wraparound addressing.

/// Fixed architectural addresses (zero page, stack page, vectors).
pub mod map;

pub use map::{
    crosses_page, stack_address, zero_page_address, IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR,
    STACK_PAGE, ZERO_PAGE_END, ZERO_PAGE_START,
};

use crate::fault::ConfigError;

/// Size in bytes of the full 16-bit address space (64 KiB).
pub const ADDRESS_SPACE_BYTES: usize = u16::MAX as usize + 1;

/// Owned, fixed-length memory image.
///
/// Every access is reduced modulo the image length, so no address is ever out
/// of range. The image is never resized after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: Box<[u8]>,
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self {
            bytes: vec![0; ADDRESS_SPACE_BYTES].into_boxed_slice(),
        }
    }
}

impl MemoryImage {
    /// Allocates a zero-filled image of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMemory`] for a zero length and
    /// [`ConfigError::MemoryTooLarge`] when `len` exceeds the 16-bit address
    /// space.
    pub fn with_len(len: usize) -> Result<Self, ConfigError> {
        validate_len(len)?;
        Ok(Self {
            bytes: vec![0; len].into_boxed_slice(),
        })
    }

    /// Number of bytes in the image.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: construction rejects empty images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn index(&self, addr: u16) -> usize {
        usize::from(addr) % self.bytes.len()
    }

    /// Reads one byte.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[self.index(addr)]
    }

    /// Writes one byte.
    pub fn write(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.bytes[index] = value;
    }

    /// Reads a little-endian word from `addr` and `addr + 1`.
    #[must_use]
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Copies `image` into memory starting at `start`, wrapping at the top of
    /// the address space.
    pub fn load(&mut self, start: u16, image: &[u8]) {
        let mut addr = start;
        for byte in image {
            self.write(addr, *byte);
            addr = addr.wrapping_add(1);
        }
    }

    /// Zero-fills the whole image.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }

    /// Read-only view of the backing store.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

pub(crate) const fn validate_len(len: usize) -> Result<(), ConfigError> {
    if len == 0 {
        Err(ConfigError::EmptyMemory)
    } else if len > ADDRESS_SPACE_BYTES {
        Err(ConfigError::MemoryTooLarge { len })
    } else {
        Ok(())
    }
}
