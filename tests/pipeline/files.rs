use crate::common::{fixtures, write_temp_elf};
use elfquery::info::FileInfo;
use elfquery::io::error::IoError;
use elfquery::io::{MappedFile, DEFAULT_MAX_FILE_SIZE};
use elfquery::store::{Store, Value};
use elfquery::ElfQueryError;

#[test]
fn load_from_mapped_file() {
    let file = write_temp_elf(&fixtures::firmware_image(true, true));
    let mapped = MappedFile::open(file.path(), DEFAULT_MAX_FILE_SIZE).unwrap();
    let store = Store::load(mapped.bytes()).unwrap();
    let rs = store.query("SELECT count(*) FROM sections").unwrap();
    assert_eq!(rs.rows[0][0], Value::Integer(fixtures::FIRMWARE_SECTIONS as i64));
}

#[test]
fn size_cap_is_enforced() {
    let image = fixtures::firmware_image(true, true);
    let file = write_temp_elf(&image);
    let result = MappedFile::open(file.path(), image.len() as u64 - 1);
    assert!(matches!(result, Err(IoError::FileTooLarge { .. })));
}

#[test]
fn empty_file_is_not_elf() {
    let file = write_temp_elf(b"");
    let mapped = MappedFile::open(file.path(), DEFAULT_MAX_FILE_SIZE).unwrap();
    assert!(matches!(
        Store::load(mapped.bytes()),
        Err(ElfQueryError::MagicMismatch)
    ));
}

#[test]
fn info_summary_matches_store() {
    let image = fixtures::firmware_image(false, false);
    let info = FileInfo::load(&image).unwrap();
    let store = Store::load(&image).unwrap();
    assert_eq!(info.sections, store.section_count());
    assert_eq!(info.symbols, store.symbol_count());
    assert_eq!(info.sizes, store.sizes());
    assert_eq!(info.sizes.to_string(), "text=1152 data=64 bss=512 dec=1728 hex=6c0");
}
