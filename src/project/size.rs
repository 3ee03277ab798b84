//! Berkeley-style size accounting (`text`, `data`, `bss`).

use std::fmt;

use crate::formats::elf::types::SectionHeader;

/// Bucket an allocated section is counted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Text,
    Data,
    Bss,
}

impl SizeClass {
    /// Classify a section the way `size(1)` does.
    ///
    /// Executable sections are text even when writable; read-only allocated
    /// sections are text too. Unallocated sections are not counted.
    pub fn of(header: &SectionHeader) -> Option<Self> {
        if !header.is_allocated() {
            return None;
        }
        if header.is_executable() || !header.is_writable() {
            Some(SizeClass::Text)
        } else if header.is_nobits() {
            Some(SizeClass::Bss)
        } else {
            Some(SizeClass::Data)
        }
    }
}

/// Totals per size class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeSummary {
    pub text: u64,
    pub data: u64,
    pub bss: u64,
}

impl SizeSummary {
    pub fn add(&mut self, header: &SectionHeader) -> Option<SizeClass> {
        let class = SizeClass::of(header)?;
        let bucket = match class {
            SizeClass::Text => &mut self.text,
            SizeClass::Data => &mut self.data,
            SizeClass::Bss => &mut self.bss,
        };
        *bucket = bucket.saturating_add(header.sh_size);
        Some(class)
    }

    pub fn total(&self) -> u64 {
        self.text
            .saturating_add(self.data)
            .saturating_add(self.bss)
    }
}

impl fmt::Display for SizeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text={} data={} bss={} dec={} hex={:x}",
            self.text,
            self.data,
            self.bss,
            self.total(),
            self.total()
        )
    }
}
