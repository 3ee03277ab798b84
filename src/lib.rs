//! Query ELF section and symbol metadata with SQL.
//!
//! An ELF file is decoded ([`formats::elf`]), projected into two relations,
//! `sections` and `symbols` ([`project`]), loaded into an in-memory
//! [`store::Store`] and queried; results are rendered by [`render`].
//!
//! ```no_run
//! use elfquery::render::{render, OutputFormat};
//! use elfquery::store::Store;
//!
//! let data = std::fs::read("zephyr.elf")?;
//! let store = Store::load(&data)?;
//! let rs = store.query("SELECT Name, Size FROM symbols WHERE Section = 'bss' ORDER BY Size DESC LIMIT 10")?;
//! print!("{}", render(&rs, OutputFormat::PrettyUnicode)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod demangle;
pub mod error;
pub mod formats;
pub mod info;
pub mod io;
pub mod logging;
pub mod project;
pub mod render;
pub mod store;

pub use error::{ElfQueryError, Result};
pub use render::{render, OutputFormat, RenderError};
pub use store::{Column, ResultSet, Store, Value};
