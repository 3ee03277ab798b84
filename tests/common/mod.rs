//! Common test utilities and helpers.
//!
//! ELF images are built in memory with the same builder the unit tests use,
//! so no sample binaries need to be checked in.

#![allow(dead_code)]

#[path = "../../src/formats/elf/fixtures.rs"]
pub mod fixtures;

use elfquery::store::{ResultSet, Store, Value};
use std::io::Write;
use tempfile::NamedTempFile;

/// Store loaded from the 64-bit little-endian firmware image
pub fn firmware_store() -> Store {
    Store::load(&fixtures::firmware_image(true, true)).expect("firmware image loads")
}

/// Write `data` to a temporary file that lives as long as the handle
pub fn write_temp_elf(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(data).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Cells of column `name` as text, nulls as empty strings
pub fn column_text(rs: &ResultSet, name: &str) -> Vec<String> {
    let index = rs.column_index(name).expect("column present");
    rs.rows.iter().map(|row| row[index].to_string()).collect()
}

/// Integer cells of column `name`
pub fn column_ints(rs: &ResultSet, name: &str) -> Vec<i64> {
    let index = rs.column_index(name).expect("column present");
    rs.rows
        .iter()
        .map(|row| match row[index] {
            Value::Integer(v) => v,
            ref other => panic!("expected integer in {}, got {:?}", name, other),
        })
        .collect()
}
