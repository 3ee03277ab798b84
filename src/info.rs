//! File summary for the `info` command.

use crate::error::Result;
use crate::formats::elf::ElfFile;
use crate::project::{self, Projection, SizeSummary};
use crate::store::{Column, ResultSet, Value};

/// ELF machine types to architecture name mapping.
pub fn machine_name(machine: u16) -> &'static str {
    match machine {
        0x02 => "SPARC",
        0x03 => "x86",
        0x08 => "MIPS",
        0x14 => "PowerPC",
        0x15 => "PowerPC64",
        0x16 => "S390",
        0x28 => "ARM",
        0x2A => "SuperH",
        0x32 => "IA-64",
        0x3E => "x86-64",
        0x5E => "Xtensa",
        0x69 => "MSP430",
        0xB7 => "AArch64",
        0xF3 => "RISC-V",
        0x102 => "LoongArch",
        _ => "unknown",
    }
}

/// Header facts and derived totals of one ELF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub class: u8,
    pub little_endian: bool,
    pub file_type: &'static str,
    pub machine: u16,
    pub entry: u64,
    pub sections: usize,
    pub symbols: usize,
    pub sizes: SizeSummary,
    pub issues: usize,
}

impl FileInfo {
    pub fn new(elf: &ElfFile, projection: &Projection) -> Self {
        let header = elf.header();
        Self {
            class: header.ident.class.bits(),
            little_endian: header.ident.data.is_little_endian(),
            file_type: header.file_type(),
            machine: header.e_machine,
            entry: header.entry_point(),
            sections: projection.sections.len(),
            symbols: projection.symbols.len(),
            sizes: projection.sizes,
            issues: projection.diagnostics.len(),
        }
    }

    /// Decode and summarise `data`
    pub fn load(data: &[u8]) -> Result<Self> {
        let elf = ElfFile::parse(data)?;
        let projection = project::project(&elf);
        Ok(Self::new(&elf, &projection))
    }

    /// Two-column `Property`/`Value` table for the renderer
    pub fn to_result_set(&self) -> ResultSet {
        let int = |v: u64| Value::Integer(v as i64);
        let rows = vec![
            ("Class", Value::Text(format!("ELF{}", self.class))),
            (
                "Data",
                Value::Text(if self.little_endian { "little-endian" } else { "big-endian" }.into()),
            ),
            ("Type", Value::Text(self.file_type.into())),
            (
                "Machine",
                Value::Text(format!("{} ({})", machine_name(self.machine), self.machine)),
            ),
            ("Entry", Value::Text(format!("{:#x}", self.entry))),
            ("Sections", int(self.sections as u64)),
            ("Symbols", int(self.symbols as u64)),
            ("text", int(self.sizes.text)),
            ("data", int(self.sizes.data)),
            ("bss", int(self.sizes.bss)),
            ("dec", int(self.sizes.total())),
            ("hex", Value::Text(format!("{:x}", self.sizes.total()))),
            ("Decode issues", int(self.issues as u64)),
        ];

        ResultSet::new(
            vec![Column::new("Property", Some("text")), Column::new("Value", None)],
            rows.into_iter()
                .map(|(name, value)| vec![Value::Text(name.into()), value])
                .collect(),
        )
    }
}
