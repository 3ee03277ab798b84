#![no_main]
use libfuzzer_sys::fuzz_target;

use elfquery::render::{render, OutputFormat};
use elfquery::store::Store;

fuzz_target!(|data: &[u8]| {
    if let Ok(store) = Store::load(data) {
        if let Ok(rs) = store.query("SELECT * FROM symbols ORDER BY ID ASC") {
            let _ = render(&rs, OutputFormat::Json);
        }
    }
});
