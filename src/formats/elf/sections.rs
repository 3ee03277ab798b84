//! Section header table

use crate::formats::elf::symbols::SymbolTable;
use crate::formats::elf::types::*;
use crate::formats::elf::utils::{read_cstring, read_word, slice_at, EndianRead};
use tracing::{debug, warn};

/// Section header table with per-entry decode results.
///
/// A header that cannot be decoded is kept as an `Err` at its index so the
/// remaining sections stay reachable.
pub struct SectionTable<'a> {
    data: &'a [u8],
    headers: Vec<Result<SectionHeader>>,
    strings: Result<&'a [u8]>,
    class: ElfClass,
    endian: ElfData,
}

impl<'a> SectionTable<'a> {
    /// Decode the section header table described by `header`
    pub fn parse(data: &'a [u8], header: &ElfHeader) -> Self {
        let class = header.ident.class;
        let endian = header.ident.data;
        let sh_offset = header.e_shoff;
        let sh_entsize = header.e_shentsize as u64;

        if sh_offset == 0 {
            return Self {
                data,
                headers: Vec::new(),
                strings: Err(ElfError::InvalidSectionIndex(header.e_shstrndx as usize)),
                class,
                endian,
            };
        }

        let entry_offset = |i: u64| -> Result<usize> {
            i.checked_mul(sh_entsize)
                .and_then(|rel| rel.checked_add(sh_offset))
                .and_then(|off| usize::try_from(off).ok())
                .ok_or(ElfError::InvalidOffset { offset: usize::MAX })
        };
        let read_at = |i: u64| entry_offset(i).and_then(|off| parse_section_header(data, off, class, endian));

        // Section 0 carries the real count and string table index when they
        // overflow the 16-bit header fields.
        let first = read_at(0);
        let count = if header.e_shnum == 0 {
            let declared = first.as_ref().map(|h| h.sh_size).unwrap_or(0);
            let available = (data.len() as u64).saturating_sub(sh_offset) / sh_entsize.max(1);
            if declared > available {
                warn!(
                    declared,
                    available, "Extended section count exceeds file size, clamping"
                );
            }
            declared.min(available)
        } else {
            header.e_shnum as u64
        };
        let shstrndx = if header.e_shstrndx == SHN_XINDEX {
            first.as_ref().map(|h| h.sh_link as usize).unwrap_or(0)
        } else {
            header.e_shstrndx as usize
        };

        let mut headers = Vec::with_capacity(count as usize);
        headers.push(first);
        for i in 1..count {
            let parsed = read_at(i);
            if let Err(e) = &parsed {
                debug!(index = i, error = %e, "Section header decode failed");
            }
            headers.push(parsed);
        }
        headers.truncate(count as usize);

        let strings = match headers.get(shstrndx) {
            Some(Ok(sh)) if sh.sh_type != SHT_NOBITS => slice_at(data, sh.sh_offset, sh.sh_size),
            Some(Ok(_)) => Err(ElfError::InvalidSectionIndex(shstrndx)),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ElfError::InvalidSectionIndex(shstrndx)),
        };
        if let Err(e) = &strings {
            warn!(index = shstrndx, error = %e, "Section name string table unavailable");
        }

        Self {
            data,
            headers,
            strings,
            class,
            endian,
        }
    }

    /// Count sections
    pub fn count(&self) -> usize {
        self.headers.len()
    }

    /// Get the header of section `index`
    pub fn header(&self, index: usize) -> Result<SectionHeader> {
        match self.headers.get(index) {
            Some(result) => result.clone(),
            None => Err(ElfError::InvalidSectionIndex(index)),
        }
    }

    /// Get the declared name of section `index`
    pub fn name(&self, index: usize) -> Result<&'a str> {
        let header = self.header(index)?;
        let strings = self.strings.clone()?;
        read_cstring(strings, header.sh_name as usize)
    }

    /// Get the on-disk contents of section `index` (empty for NOBITS)
    pub fn data(&self, index: usize) -> Result<&'a [u8]> {
        let header = self.header(index)?;
        if header.is_nobits() {
            return Ok(&[]);
        }
        slice_at(self.data, header.sh_offset, header.sh_size)
    }

    /// Decode the symbols defined by section `index`.
    ///
    /// Returns `Ok(None)` when the section is not a symbol table.
    pub fn symbols(&self, index: usize) -> Result<Option<SymbolTable>> {
        let header = self.header(index)?;
        if !header.is_symbol_table() {
            return Ok(None);
        }

        // Entries must hold at least one symbol and fit inside the section
        let expected = self.class.symbol_size() as u64;
        let stride = match header.sh_entsize {
            0 => expected,
            n if n < expected || (header.sh_size > 0 && n > header.sh_size) => {
                return Err(ElfError::BadEntrySize {
                    section: index,
                    found: n,
                    expected,
                })
            }
            n => n,
        };
        let stride = usize::try_from(stride).map_err(|_| ElfError::BadEntrySize {
            section: index,
            found: stride,
            expected,
        })?;

        let link = header.sh_link;
        let strings = match self.header(link as usize) {
            Ok(sh) if sh.sh_type == SHT_STRTAB => self.data(link as usize)?,
            _ => return Err(ElfError::InvalidLink { section: index, link }),
        };

        let table = SymbolTable::parse(
            self.data(index)?,
            strings,
            self.class,
            self.endian,
            stride,
        )?;
        Ok(Some(table))
    }
}

/// Parse a single section header
fn parse_section_header(
    data: &[u8],
    offset: usize,
    class: ElfClass,
    endian: ElfData,
) -> Result<SectionHeader> {
    let needed = class.section_header_size();
    if offset.checked_add(needed).map_or(true, |end| end > data.len()) {
        return Err(ElfError::Truncated { offset, needed });
    }

    // sh_name and sh_type are 32-bit in both classes; the rest alternate
    // between words and 32-bit fields.
    let w = match class {
        ElfClass::Elf32 => 4,
        ElfClass::Elf64 => 8,
    };
    let flags = offset + 8;
    let addr = flags + w;
    let file_offset = addr + w;
    let size = file_offset + w;
    let link = size + w;
    let info = link + 4;
    let align = info + 4;
    let entsize = align + w;

    Ok(SectionHeader {
        sh_name: data.read_u32(offset, endian)?,
        sh_type: data.read_u32(offset + 4, endian)?,
        sh_flags: read_word(data, flags, class, endian)?,
        sh_addr: read_word(data, addr, class, endian)?,
        sh_offset: read_word(data, file_offset, class, endian)?,
        sh_size: read_word(data, size, class, endian)?,
        sh_link: data.read_u32(link, endian)?,
        sh_info: data.read_u32(info, endian)?,
        sh_addralign: read_word(data, align, class, endian)?,
        sh_entsize: read_word(data, entsize, class, endian)?,
    })
}
