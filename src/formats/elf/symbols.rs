//! Symbol table parsing

use crate::formats::elf::types::*;
use crate::formats::elf::utils::{cstring_bytes, EndianRead};

/// Decoded symbol table, entries kept in file order
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<NamedSymbol>,
}

impl SymbolTable {
    /// Parse symbol table from section data.
    ///
    /// `stride` is the distance between entries (`sh_entsize`), which may be
    /// larger than the class entry size. Trailing bytes that do not form a
    /// whole entry are ignored.
    pub fn parse(
        symbol_data: &[u8],
        string_data: &[u8],
        class: ElfClass,
        endian: ElfData,
        stride: usize,
    ) -> Result<Self> {
        let entry_size = class.symbol_size();
        let stride = stride.max(entry_size);

        let mut symbols = Vec::with_capacity(symbol_data.len() / stride);
        let mut offset: usize = 0;
        while offset
            .checked_add(entry_size)
            .map_or(false, |end| end <= symbol_data.len())
        {
            let symbol = parse_symbol(&symbol_data[offset..], class, endian)?;
            let name = if symbol.st_name == 0 {
                String::new()
            } else {
                String::from_utf8_lossy(cstring_bytes(string_data, symbol.st_name as usize)?)
                    .into_owned()
            };
            symbols.push(NamedSymbol { symbol, name });
            offset = match offset.checked_add(stride) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(Self { symbols })
    }

    #[cfg(test)]
    fn by_index(&self, index: usize) -> Option<&NamedSymbol> {
        self.symbols.get(index)
    }

    #[cfg(test)]
    pub(crate) fn has_symbol(&self, name: &str) -> bool {
        self.symbols.iter().any(|s| s.name == name)
    }

    /// Iterate symbols in file order
    pub fn iter(&self) -> impl Iterator<Item = &NamedSymbol> {
        self.symbols.iter()
    }

    /// Count total symbols
    pub fn count(&self) -> usize {
        self.symbols.len()
    }
}

impl IntoIterator for SymbolTable {
    type Item = NamedSymbol;
    type IntoIter = std::vec::IntoIter<NamedSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

/// Parse a single symbol entry
fn parse_symbol(data: &[u8], class: ElfClass, endian: ElfData) -> Result<Symbol> {
    match class {
        ElfClass::Elf32 => Ok(Symbol {
            st_name: data.read_u32(0, endian)?,
            st_value: data.read_u32(4, endian)? as u64,
            st_size: data.read_u32(8, endian)? as u64,
            st_info: data.read_array::<1>(12)?[0],
            st_other: data.read_array::<1>(13)?[0],
            st_shndx: data.read_u16(14, endian)?,
        }),
        ElfClass::Elf64 => Ok(Symbol {
            st_name: data.read_u32(0, endian)?,
            st_info: data.read_array::<1>(4)?[0],
            st_other: data.read_array::<1>(5)?[0],
            st_shndx: data.read_u16(6, endian)?,
            st_value: data.read_u64(8, endian)?,
            st_size: data.read_u64(16, endian)?,
        }),
    }
}
