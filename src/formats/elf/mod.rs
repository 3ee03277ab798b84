//! ELF (Executable and Linkable Format) decoder
//!
//! Read-only decoding of the ELF header, section header table and symbol
//! tables. Enumerated fields are left numeric here; symbolic rendering lives
//! in [`crate::project`].

#[cfg(test)]
pub(crate) mod fixtures;
pub mod headers;
pub mod sections;
pub mod symbols;
pub mod types;
pub mod utils;

use headers::parse_header;
use sections::SectionTable;
use symbols::SymbolTable;
use tracing::debug;
pub use types::*;

/// Decoded ELF file
pub struct ElfFile<'data> {
    header: ElfHeader,
    sections: SectionTable<'data>,
}

impl<'data> ElfFile<'data> {
    /// Parse ELF from raw data.
    ///
    /// Only a bad magic or an unusable file header fails here; problems with
    /// individual sections surface through the per-section accessors.
    pub fn parse(data: &'data [u8]) -> Result<Self> {
        let header = parse_header(data)?;
        let sections = SectionTable::parse(data, &header);
        debug!(
            class = header.ident.class.bits(),
            little_endian = header.ident.data.is_little_endian(),
            sections = sections.count(),
            "Parsed ELF header"
        );

        Ok(Self {
            header,
            sections,
        })
    }

    /// Get ELF header
    pub fn header(&self) -> &ElfHeader {
        &self.header
    }

    /// Number of entries in the section header table
    pub fn section_count(&self) -> usize {
        self.sections.count()
    }

    /// Header fields of section `index`
    pub fn section_header(&self, index: usize) -> Result<SectionHeader> {
        self.sections.header(index)
    }

    /// Declared name of section `index`
    pub fn section_name(&self, index: usize) -> Result<&'data str> {
        self.sections.name(index)
    }

    /// Symbols defined by section `index`, if it is a symbol table
    pub fn symbols(&self, index: usize) -> Result<Option<SymbolTable>> {
        self.sections.symbols(index)
    }
}
