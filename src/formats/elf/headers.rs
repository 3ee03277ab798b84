//! ELF header parsing

use crate::formats::elf::types::*;
use crate::formats::elf::utils::{read_word, EndianRead};

/// Parse ELF identification bytes
///
/// The magic is checked before anything else so that non-ELF input is
/// rejected without touching the rest of the buffer.
pub fn parse_ident(data: &[u8]) -> Result<ElfIdent> {
    if data.get(0..4) != Some(&ELF_MAGIC[..]) {
        return Err(ElfError::InvalidMagic);
    }

    if data.len() < 16 {
        return Err(ElfError::Truncated {
            offset: 0,
            needed: 16,
        });
    }

    Ok(ElfIdent {
        class: ElfClass::from_u8(data[4])?,
        data: ElfData::from_u8(data[5])?,
        version: data[6],
        osabi: data[7],
        abiversion: data[8],
    })
}

/// Parse ELF header
pub fn parse_header(data: &[u8]) -> Result<ElfHeader> {
    let ident = parse_ident(data)?;

    let header_size = match ident.class {
        ElfClass::Elf32 => 52,
        ElfClass::Elf64 => 64,
    };

    if data.len() < header_size {
        return Err(ElfError::Truncated {
            offset: 0,
            needed: header_size,
        });
    }

    let class = ident.class;
    let endian = ident.data;

    // Offsets of the fields that follow the three class-sized words
    // (e_entry, e_phoff, e_shoff).
    let (shoff_at, flags_at) = match class {
        ElfClass::Elf32 => (32, 36),
        ElfClass::Elf64 => (40, 48),
    };

    let e_type = data.read_u16(16, endian)?;
    let e_machine = data.read_u16(18, endian)?;
    let e_version = data.read_u32(20, endian)?;
    let e_entry = read_word(data, 24, class, endian)?;
    let e_shoff = read_word(data, shoff_at, class, endian)?;
    let e_flags = data.read_u32(flags_at, endian)?;
    // e_ehsize, e_phentsize, e_phnum precede the section header fields
    let e_shentsize = data.read_u16(flags_at + 10, endian)?;
    let e_shnum = data.read_u16(flags_at + 12, endian)?;
    let e_shstrndx = data.read_u16(flags_at + 14, endian)?;

    let expected_shentsize = class.section_header_size();
    if (e_shnum > 0 || e_shoff != 0) && (e_shentsize as usize) < expected_shentsize {
        return Err(ElfError::MalformedHeader(format!(
            "Invalid e_shentsize: expected {}, got {}",
            expected_shentsize, e_shentsize
        )));
    }

    Ok(ElfHeader {
        ident,
        e_type,
        e_machine,
        e_version,
        e_entry,
        e_shoff,
        e_flags,
        e_shentsize,
        e_shnum,
        e_shstrndx,
    })
}
