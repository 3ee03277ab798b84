//! Projection of decoded ELF structures into the `sections` and `symbols`
//! relations.
//!
//! Sections are emitted in header-table order with their positional index as
//! identifier. Symbols follow, grouped by the symbol table that defines them
//! (low section index first) and in file order within a table. Symbol
//! identifiers are not assigned here; the store numbers them on insert.

pub mod names;
pub mod size;

use std::fmt;
use tracing::{debug, info_span, warn};

use crate::formats::elf::types::{ElfError, SectionHeader, SHN_LORESERVE};
use crate::formats::elf::ElfFile;
pub use size::{SizeClass, SizeSummary};

/// Placeholder for names that could not be decoded
pub const NULL_NAME: &str = "<NULL>";
/// Resolved section name for reserved pseudo-indices (ABS, COMMON, ...)
pub const UNKNOWN_SECTION: &str = "<Unknown>";

/// One row of the `sections` relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub id: u32,
    pub name: String,
    pub section_type: String,
    pub flags: String,
    pub address: u64,
    pub offset: u64,
    pub size: u64,
    pub linked_index: u32,
    pub info: u32,
    pub alignment: u64,
    pub entry_size: u64,
}

impl SectionRecord {
    fn new(id: u32, name: String, header: &SectionHeader) -> Self {
        Self {
            id,
            name,
            section_type: names::section_type(header.sh_type),
            flags: names::section_flags(header.sh_flags),
            address: header.sh_addr,
            offset: header.sh_offset,
            size: header.sh_size,
            linked_index: header.sh_link,
            info: header.sh_info,
            alignment: header.sh_addralign,
            entry_size: header.sh_entsize,
        }
    }
}

/// One row of the `symbols` relation, minus the store-assigned `ID`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub value: u64,
    pub size: u64,
    pub symbol_type: &'static str,
    pub binding: &'static str,
    pub visibility: &'static str,
    pub section_index: u16,
    pub name: String,
    pub section: String,
}

/// Recoverable decode failure recorded during projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    /// Section header unreadable; a placeholder row was emitted
    SectionDecode { index: usize, error: ElfError },
    /// Section name unreadable; the row is named `<NULL>`
    SectionName { index: usize, error: ElfError },
    /// Symbol table unreadable; its symbols were skipped
    SymbolDecode { section: usize, error: ElfError },
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SectionDecode { index, error } => {
                write!(f, "section {}: header not decoded: {}", index, error)
            }
            Self::SectionName { index, error } => {
                write!(f, "section {}: name not decoded: {}", index, error)
            }
            Self::SymbolDecode { section, error } => {
                write!(f, "section {}: symbols not decoded: {}", section, error)
            }
        }
    }
}

/// Both relations plus derived facts for one ELF file
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub sections: Vec<SectionRecord>,
    pub symbols: Vec<SymbolRecord>,
    pub sizes: SizeSummary,
    pub diagnostics: Vec<DecodeIssue>,
}

/// Project a decoded ELF file into its two relations
pub fn project(elf: &ElfFile) -> Projection {
    let span = info_span!("project", sections = elf.section_count());
    let _guard = span.enter();

    let mut out = Projection::default();
    let count = elf.section_count();

    for index in 0..count {
        let name = match elf.section_name(index) {
            Ok(name) => name.to_string(),
            Err(error) => {
                out.issue(DecodeIssue::SectionName { index, error });
                NULL_NAME.to_string()
            }
        };

        let header = match elf.section_header(index) {
            Ok(header) => header,
            Err(error) => {
                out.issue(DecodeIssue::SectionDecode { index, error });
                SectionHeader::default()
            }
        };

        out.sizes.add(&header);
        out.sections.push(SectionRecord::new(index as u32, name, &header));
    }

    for index in 0..count {
        let table = match elf.symbols(index) {
            Ok(Some(table)) => table,
            Ok(None) => continue,
            Err(error) => {
                out.issue(DecodeIssue::SymbolDecode {
                    section: index,
                    error,
                });
                continue;
            }
        };

        debug!(section = index, symbols = table.count(), "Projecting symbol table");
        for named in table {
            let sym = named.symbol;
            out.symbols.push(SymbolRecord {
                value: sym.st_value,
                size: sym.st_size,
                symbol_type: names::symbol_type(sym.st_type()),
                binding: names::symbol_binding(sym.st_bind()),
                visibility: names::symbol_visibility(sym.st_visibility()),
                section_index: sym.st_shndx,
                name: named.name,
                section: resolve_section(elf, sym.st_shndx),
            });
        }
    }

    debug!(
        sections = out.sections.len(),
        symbols = out.symbols.len(),
        issues = out.diagnostics.len(),
        "Projection complete"
    );
    out
}

/// Resolve a symbol's section index to a section name
pub fn resolve_section(elf: &ElfFile, index: u16) -> String {
    if index >= SHN_LORESERVE {
        return UNKNOWN_SECTION.to_string();
    }
    elf.section_name(index as usize)
        .map(str::to_string)
        .unwrap_or_else(|_| NULL_NAME.to_string())
}

impl Projection {
    fn issue(&mut self, issue: DecodeIssue) {
        warn!(issue = %issue, "Recoverable decode failure");
        self.diagnostics.push(issue);
    }
}
