//! Symbolic names for ELF enumerations.
//!
//! Every table covers the full value space of its field, including the OS
//! and processor reserved ranges, so no raw value is left without a name.

use bitflags::bitflags;

use crate::formats::elf::types::*;

bitflags! {
    /// `sh_flags` bits with a symbolic name
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionFlags: u64 {
        const WRITE = SHF_WRITE;
        const ALLOC = SHF_ALLOC;
        const EXECINSTR = SHF_EXECINSTR;
        const MERGE = SHF_MERGE;
        const STRINGS = SHF_STRINGS;
        const INFO_LINK = SHF_INFO_LINK;
        const LINK_ORDER = SHF_LINK_ORDER;
        const OS_NONCONFORMING = SHF_OS_NONCONFORMING;
        const GROUP = SHF_GROUP;
        const TLS = SHF_TLS;
        const COMPRESSED = SHF_COMPRESSED;
    }
}

/// Render `sh_flags` as `ALLOC|EXECINSTR`; unnamed bits are appended as a
/// single hex literal. No flags renders as an empty string.
pub fn section_flags(raw: u64) -> String {
    let known = SectionFlags::from_bits_truncate(raw);
    let mut parts: Vec<String> = known.iter_names().map(|(name, _)| name.to_string()).collect();
    let unknown = raw & !SectionFlags::all().bits();
    if unknown != 0 {
        parts.push(format!("{:#x}", unknown));
    }
    parts.join("|")
}

const SECTION_TYPES: [&str; 19] = [
    "NULL",
    "PROGBITS",
    "SYMTAB",
    "STRTAB",
    "RELA",
    "HASH",
    "DYNAMIC",
    "NOTE",
    "NOBITS",
    "REL",
    "SHLIB",
    "DYNSYM",
    "0xc",
    "0xd",
    "INIT_ARRAY",
    "FINI_ARRAY",
    "PREINIT_ARRAY",
    "GROUP",
    "SYMTAB_SHNDX",
];

/// Render `sh_type` as its symbolic name
pub fn section_type(raw: u32) -> String {
    if let Some(name) = SECTION_TYPES.get(raw as usize) {
        return (*name).to_string();
    }
    match raw {
        SHT_GNU_ATTRIBUTES => "GNU_ATTRIBUTES".to_string(),
        SHT_GNU_HASH => "GNU_HASH".to_string(),
        SHT_GNU_LIBLIST => "GNU_LIBLIST".to_string(),
        SHT_CHECKSUM => "CHECKSUM".to_string(),
        SHT_GNU_VERDEF => "GNU_VERDEF".to_string(),
        SHT_GNU_VERNEED => "GNU_VERNEED".to_string(),
        SHT_GNU_VERSYM => "GNU_VERSYM".to_string(),
        SHT_LOOS..=SHT_HIOS => format!("LOOS+{:#x}", raw - SHT_LOOS),
        SHT_LOPROC..=SHT_HIPROC => format!("LOPROC+{:#x}", raw - SHT_LOPROC),
        SHT_LOUSER..=SHT_HIUSER => format!("LOUSER+{:#x}", raw - SHT_LOUSER),
        _ => format!("{:#x}", raw),
    }
}

const SYMBOL_TYPES: [&str; 16] = [
    "NOTYPE",
    "OBJECT",
    "FUNC",
    "SECTION",
    "FILE",
    "COMMON",
    "TLS",
    "RESERVED7",
    "RESERVED8",
    "RESERVED9",
    "LOOS",
    "LOOS+1",
    "HIOS",
    "LOPROC",
    "LOPROC+1",
    "HIPROC",
];

const SYMBOL_BINDINGS: [&str; 16] = [
    "LOCAL",
    "GLOBAL",
    "WEAK",
    "RESERVED3",
    "RESERVED4",
    "RESERVED5",
    "RESERVED6",
    "RESERVED7",
    "RESERVED8",
    "RESERVED9",
    "LOOS",
    "LOOS+1",
    "HIOS",
    "LOPROC",
    "LOPROC+1",
    "HIPROC",
];

const SYMBOL_VISIBILITIES: [&str; 8] = [
    "DEFAULT",
    "INTERNAL",
    "HIDDEN",
    "PROTECTED",
    "EXPORTED",
    "SINGLETON",
    "ELIMINATE",
    "RESERVED7",
];

/// Symbol type from the low nibble of `st_info`
pub fn symbol_type(st_type: u8) -> &'static str {
    SYMBOL_TYPES[(st_type & 0xf) as usize]
}

/// Symbol binding from the high nibble of `st_info`
pub fn symbol_binding(st_bind: u8) -> &'static str {
    SYMBOL_BINDINGS[(st_bind & 0xf) as usize]
}

/// Symbol visibility from the low three bits of `st_other`
pub fn symbol_visibility(st_visibility: u8) -> &'static str {
    SYMBOL_VISIBILITIES[(st_visibility & 0x7) as usize]
}
