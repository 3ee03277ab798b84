//! In-memory ELF image builder used by unit and integration tests.
//!
//! Only depends on `std` so the integration tests can include it with
//! `#[path]` and build the same images the unit tests use.

#![allow(dead_code)]

pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_NOBITS: u32 = 8;
pub const SHT_DYNSYM: u32 = 11;

pub const SHF_WRITE: u64 = 0x1;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_EXECINSTR: u64 = 0x4;

/// Section description handed to [`ElfBuilder::section`]
#[derive(Debug, Clone, Default)]
pub struct SectionSpec {
    pub name: String,
    pub sh_type: u32,
    pub flags: u64,
    pub addr: u64,
    pub size: u64,
    pub link: u32,
    pub info: u32,
    pub align: u64,
    pub entsize: u64,
    pub data: Vec<u8>,
}

impl SectionSpec {
    pub fn new(name: &str, sh_type: u32, flags: u64, addr: u64, size: u64) -> Self {
        Self {
            name: name.to_string(),
            sh_type,
            flags,
            addr,
            size,
            align: 4,
            ..Default::default()
        }
    }
}

/// Symbol description handed to [`ElfBuilder::symtab`]
#[derive(Debug, Clone)]
pub struct SymbolSpec {
    pub name: String,
    pub value: u64,
    pub size: u64,
    pub info: u8,
    pub other: u8,
    pub shndx: u16,
}

impl SymbolSpec {
    /// `bind` and `kind` are packed into `st_info` the way the file stores them
    pub fn new(name: &str, value: u64, size: u64, bind: u8, kind: u8, shndx: u16) -> Self {
        Self {
            name: name.to_string(),
            value,
            size,
            info: (bind << 4) | (kind & 0xf),
            other: 0,
            shndx,
        }
    }

    pub fn with_visibility(mut self, other: u8) -> Self {
        self.other = other;
        self
    }
}

/// Assembles a minimal but well-formed ELF image: header, section
/// contents, then the section header table.
#[derive(Debug, Clone)]
pub struct ElfBuilder {
    is_64: bool,
    is_le: bool,
    extended_numbering: bool,
    sections: Vec<SectionSpec>,
}

impl ElfBuilder {
    pub fn new(is_64: bool, is_le: bool) -> Self {
        Self {
            is_64,
            is_le,
            extended_numbering: false,
            sections: vec![SectionSpec::default()],
        }
    }

    /// Store the section count and string table index in section 0
    /// (`e_shnum == 0`, `e_shstrndx == SHN_XINDEX`).
    pub fn extended_numbering(mut self) -> Self {
        self.extended_numbering = true;
        self
    }

    /// Append a section; returns its index
    pub fn section(&mut self, spec: SectionSpec) -> u16 {
        self.sections.push(spec);
        (self.sections.len() - 1) as u16
    }

    /// Append a symbol table of `sh_type` and its string table. The null
    /// symbol is emitted first, as linkers do. Returns the table's index.
    pub fn symbol_table(&mut self, name: &str, sh_type: u32, symbols: &[SymbolSpec]) -> u16 {
        let symtab_index = self.sections.len() as u16;
        let strtab_index = symtab_index + 1;

        let mut strings = vec![0u8];
        let mut entries = Vec::new();
        self.put_symbol(&mut entries, 0, 0, 0, 0, 0, 0);
        for sym in symbols {
            let name_off = if sym.name.is_empty() {
                0
            } else {
                let off = strings.len() as u32;
                strings.extend_from_slice(sym.name.as_bytes());
                strings.push(0);
                off
            };
            self.put_symbol(
                &mut entries,
                name_off,
                sym.value,
                sym.size,
                sym.info,
                sym.other,
                sym.shndx,
            );
        }

        let entsize = if self.is_64 { 24 } else { 16 };
        self.sections.push(SectionSpec {
            name: name.to_string(),
            sh_type,
            size: entries.len() as u64,
            link: strtab_index as u32,
            info: 1,
            align: 8,
            entsize,
            data: entries,
            ..Default::default()
        });
        let strtab_name = if sh_type == SHT_DYNSYM { ".dynstr" } else { ".strtab" };
        self.sections.push(SectionSpec {
            name: strtab_name.to_string(),
            sh_type: SHT_STRTAB,
            size: strings.len() as u64,
            align: 1,
            data: strings,
            ..Default::default()
        });
        symtab_index
    }

    pub fn symtab(&mut self, symbols: &[SymbolSpec]) -> u16 {
        self.symbol_table(".symtab", SHT_SYMTAB, symbols)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut sections = self.sections.clone();

        // Section name string table goes last
        let mut shstrtab = vec![0u8];
        let mut name_offsets = Vec::with_capacity(sections.len() + 1);
        for s in &sections {
            name_offsets.push(Self::intern(&mut shstrtab, &s.name));
        }
        name_offsets.push(Self::intern(&mut shstrtab, ".shstrtab"));
        sections.push(SectionSpec {
            name: ".shstrtab".to_string(),
            sh_type: SHT_STRTAB,
            size: shstrtab.len() as u64,
            align: 1,
            data: shstrtab,
            ..Default::default()
        });

        let ehsize = if self.is_64 { 64 } else { 52 };
        let shentsize = if self.is_64 { 64 } else { 40 };
        let mut out = vec![0u8; ehsize];

        let mut offsets = vec![0u64; sections.len()];
        for (i, s) in sections.iter().enumerate().skip(1) {
            Self::align(&mut out, 8);
            offsets[i] = out.len() as u64;
            if s.sh_type != SHT_NOBITS {
                out.extend_from_slice(&s.data);
            }
        }

        Self::align(&mut out, 8);
        let shoff = out.len() as u64;
        let count = sections.len();
        let shstrndx = (count - 1) as u16;
        for (i, s) in sections.iter().enumerate() {
            let (size, link) = if i == 0 && self.extended_numbering {
                (count as u64, shstrndx as u32)
            } else {
                (s.size, s.link)
            };
            self.put_u32(&mut out, name_offsets[i]);
            self.put_u32(&mut out, s.sh_type);
            self.put_word(&mut out, s.flags);
            self.put_word(&mut out, s.addr);
            self.put_word(&mut out, offsets[i]);
            self.put_word(&mut out, size);
            self.put_u32(&mut out, link);
            self.put_u32(&mut out, s.info);
            self.put_word(&mut out, s.align);
            self.put_word(&mut out, s.entsize);
        }

        let mut header = Vec::with_capacity(ehsize);
        header.extend_from_slice(b"\x7fELF");
        header.push(if self.is_64 { 2 } else { 1 });
        header.push(if self.is_le { 1 } else { 2 });
        header.push(1);
        header.resize(16, 0);
        self.put_u16(&mut header, 2); // ET_EXEC
        self.put_u16(&mut header, if self.is_64 { 62 } else { 40 });
        self.put_u32(&mut header, 1);
        self.put_word(&mut header, 0); // e_entry
        self.put_word(&mut header, 0); // e_phoff
        self.put_word(&mut header, shoff);
        self.put_u32(&mut header, 0); // e_flags
        self.put_u16(&mut header, ehsize as u16);
        self.put_u16(&mut header, 0); // e_phentsize
        self.put_u16(&mut header, 0); // e_phnum
        self.put_u16(&mut header, shentsize);
        if self.extended_numbering {
            self.put_u16(&mut header, 0);
            self.put_u16(&mut header, 0xffff);
        } else {
            self.put_u16(&mut header, count as u16);
            self.put_u16(&mut header, shstrndx);
        }
        out[..ehsize].copy_from_slice(&header);
        out
    }

    fn intern(table: &mut Vec<u8>, name: &str) -> u32 {
        if name.is_empty() {
            return 0;
        }
        let off = table.len() as u32;
        table.extend_from_slice(name.as_bytes());
        table.push(0);
        off
    }

    fn align(out: &mut Vec<u8>, to: usize) {
        while out.len() % to != 0 {
            out.push(0);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn put_symbol(
        &self,
        out: &mut Vec<u8>,
        name: u32,
        value: u64,
        size: u64,
        info: u8,
        other: u8,
        shndx: u16,
    ) {
        self.put_u32(out, name);
        if self.is_64 {
            out.push(info);
            out.push(other);
            self.put_u16(out, shndx);
            self.put_u64(out, value);
            self.put_u64(out, size);
        } else {
            self.put_u32(out, value as u32);
            self.put_u32(out, size as u32);
            out.push(info);
            out.push(other);
            self.put_u16(out, shndx);
        }
    }

    fn put_u16(&self, out: &mut Vec<u8>, v: u16) {
        if self.is_le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn put_u32(&self, out: &mut Vec<u8>, v: u32) {
        if self.is_le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn put_u64(&self, out: &mut Vec<u8>, v: u64) {
        if self.is_le {
            out.extend_from_slice(&v.to_le_bytes());
        } else {
            out.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn put_word(&self, out: &mut Vec<u8>, v: u64) {
        if self.is_64 {
            self.put_u64(out, v);
        } else {
            self.put_u32(out, v as u32);
        }
    }
}

/// File offset of section header `index` inside an image produced by
/// [`ElfBuilder::build`].
pub fn section_header_offset(image: &[u8], index: usize) -> usize {
    let is_64 = image[4] == 2;
    let is_le = image[5] == 1;
    let shoff = if is_64 {
        let b: [u8; 8] = image[40..48].try_into().unwrap();
        if is_le {
            u64::from_le_bytes(b)
        } else {
            u64::from_be_bytes(b)
        }
    } else {
        let b: [u8; 4] = image[32..36].try_into().unwrap();
        if is_le {
            u32::from_le_bytes(b) as u64
        } else {
            u32::from_be_bytes(b) as u64
        }
    };
    let entsize = if is_64 { 64 } else { 40 };
    shoff as usize + index * entsize
}

/// A Zephyr-style firmware image: sections without leading dots, a
/// `.symtab` spanning code, data, bss and absolute symbols.
pub fn firmware_image(is_64: bool, is_le: bool) -> Vec<u8> {
    let mut b = ElfBuilder::new(is_64, is_le);
    let text = b.section(SectionSpec::new(
        "text",
        SHT_PROGBITS,
        SHF_ALLOC | SHF_EXECINSTR,
        0x1000,
        0x400,
    ));
    let rodata = b.section(SectionSpec::new("rodata", SHT_PROGBITS, SHF_ALLOC, 0x1400, 0x80));
    let datas = b.section(SectionSpec::new(
        "datas",
        SHT_PROGBITS,
        SHF_ALLOC | SHF_WRITE,
        0x2000,
        0x40,
    ));
    let bss = b.section(SectionSpec::new(
        "bss",
        SHT_NOBITS,
        SHF_ALLOC | SHF_WRITE,
        0x2040,
        0x200,
    ));
    b.section(SectionSpec::new(".comment", SHT_PROGBITS, 0, 0, 0x20));
    b.symtab(&[
        SymbolSpec::new("main.c", 0, 0, 0, 4, 0xfff1),
        SymbolSpec::new("main", 0x1000, 0x40, 1, 2, text),
        SymbolSpec::new("k_sys_init", 0x1040, 0x100, 1, 2, text),
        SymbolSpec::new("z_impl_weak", 0x1140, 0x10, 2, 2, text).with_visibility(2),
        SymbolSpec::new("version_str", 0x1400, 0x20, 0, 1, rodata),
        SymbolSpec::new("counter", 0x2000, 0x4, 1, 1, datas),
        SymbolSpec::new("rx_buf", 0x2040, 0x100, 1, 1, bss),
        SymbolSpec::new("tx_buf", 0x2140, 0x80, 1, 1, bss),
        SymbolSpec::new("z_idle_stack", 0x21c0, 0x40, 0, 1, bss),
        SymbolSpec::new("heap_ptr", 0x2200, 0x8, 1, 1, bss),
        SymbolSpec::new("__bss_size", 0x200, 0, 1, 0, 0xfff1),
    ]);
    b.build()
}

/// Number of symbol table entries in [`firmware_image`], null entry included
pub const FIRMWARE_SYMBOLS: usize = 12;
/// Number of sections in [`firmware_image`], null and `.shstrtab` included
pub const FIRMWARE_SECTIONS: usize = 9;
