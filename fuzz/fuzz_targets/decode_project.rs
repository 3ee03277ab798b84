#![no_main]
use libfuzzer_sys::fuzz_target;

use elfquery::formats::elf::ElfFile;
use elfquery::project::project;

fuzz_target!(|data: &[u8]| {
    if let Ok(elf) = ElfFile::parse(data) {
        let projection = project(&elf);
        assert_eq!(projection.sections.len(), elf.section_count());
    }
});
