//! Utility functions for ELF decoding

use crate::formats::elf::types::{ElfClass, ElfData, ElfError, Result};

/// Trait for reading values with endianness support
pub trait EndianRead {
    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]>;
    fn read_u16(&self, offset: usize, data: ElfData) -> Result<u16>;
    fn read_u32(&self, offset: usize, data: ElfData) -> Result<u32>;
    fn read_u64(&self, offset: usize, data: ElfData) -> Result<u64>;
}

impl EndianRead for [u8] {
    fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        offset
            .checked_add(N)
            .and_then(|end| self.get(offset..end))
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(ElfError::Truncated { offset, needed: N })
    }

    fn read_u16(&self, offset: usize, data: ElfData) -> Result<u16> {
        let bytes = self.read_array::<2>(offset)?;
        Ok(match data {
            ElfData::Little => u16::from_le_bytes(bytes),
            ElfData::Big => u16::from_be_bytes(bytes),
        })
    }

    fn read_u32(&self, offset: usize, data: ElfData) -> Result<u32> {
        let bytes = self.read_array::<4>(offset)?;
        Ok(match data {
            ElfData::Little => u32::from_le_bytes(bytes),
            ElfData::Big => u32::from_be_bytes(bytes),
        })
    }

    fn read_u64(&self, offset: usize, data: ElfData) -> Result<u64> {
        let bytes = self.read_array::<8>(offset)?;
        Ok(match data {
            ElfData::Little => u64::from_le_bytes(bytes),
            ElfData::Big => u64::from_be_bytes(bytes),
        })
    }
}

/// Read an address-sized word based on ELF class
pub fn read_word(data: &[u8], offset: usize, class: ElfClass, endian: ElfData) -> Result<u64> {
    match class {
        ElfClass::Elf32 => data.read_u32(offset, endian).map(u64::from),
        ElfClass::Elf64 => data.read_u64(offset, endian),
    }
}

/// Locate the null-terminated byte string at `offset`
pub fn cstring_bytes(data: &[u8], offset: usize) -> Result<&[u8]> {
    let slice = data
        .get(offset..)
        .filter(|s| !s.is_empty())
        .ok_or(ElfError::InvalidOffset { offset })?;
    let end = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
    Ok(&slice[..end])
}

/// Read a null-terminated UTF-8 string from data
pub fn read_cstring(data: &[u8], offset: usize) -> Result<&str> {
    std::str::from_utf8(cstring_bytes(data, offset)?).map_err(|_| ElfError::InvalidString)
}

/// Borrow `size` bytes at `offset`, checking bounds without overflow
pub fn slice_at(data: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let start = usize::try_from(offset).map_err(|_| ElfError::InvalidOffset { offset: usize::MAX })?;
    let len = usize::try_from(size).map_err(|_| ElfError::InvalidOffset { offset: start })?;
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or(ElfError::Truncated {
            offset: start,
            needed: len,
        })
}
