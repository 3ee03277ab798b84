//! In-memory query store holding the `sections` and `symbols` relations.
//!
//! A [`Store`] is built once per loaded file and owns its own SQLite
//! connection. Queries are passed through to the engine unchanged; a failed
//! query leaves the store usable.

pub mod result;

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection};
use tracing::{debug, info_span, warn};

use crate::demangle;
use crate::error::{ElfQueryError, Relation, Result};
use crate::formats::elf::ElfFile;
use crate::project::{self, DecodeIssue, Projection, SectionRecord, SizeSummary, SymbolRecord};
pub use result::{Column, ResultSet, Value};

const CREATE_SECTIONS: &str = "create table sections(\
    ID integer primary key, Name text, Type text, Flags text, \
    Address integer, Offset integer, Size integer, LinkedIndex integer, \
    Info integer, Alignment integer, EntrySize integer)";

const CREATE_SYMBOLS: &str = "create table symbols(\
    ID integer primary key autoincrement, Value integer, Size integer, \
    Type text, Binding text, Visibility text, SectionIndex integer, \
    Name text, Section text)";

const INSERT_SECTION: &str = "insert into sections(\
    ID, Name, Type, Flags, Address, Offset, Size, LinkedIndex, Info, Alignment, EntrySize) \
    values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

const INSERT_SYMBOL: &str = "insert into symbols(\
    Value, Size, Type, Binding, Visibility, SectionIndex, Name, Section) \
    values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Queryable relations for one ELF file
pub struct Store {
    conn: Connection,
    section_count: usize,
    symbol_count: usize,
    sizes: SizeSummary,
    diagnostics: Vec<DecodeIssue>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("section_count", &self.section_count)
            .field("symbol_count", &self.symbol_count)
            .field("sizes", &self.sizes)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Decode `data`, project it and load both relations.
    pub fn load(data: &[u8]) -> Result<Self> {
        let elf = ElfFile::parse(data)?;
        Self::from_projection(project::project(&elf))
    }

    /// Load an already projected file.
    ///
    /// Either every record is inserted or an error is returned and the
    /// partially filled connection is dropped.
    pub fn from_projection(projection: Projection) -> Result<Self> {
        let span = info_span!(
            "store_load",
            sections = projection.sections.len(),
            symbols = projection.symbols.len()
        );
        let _guard = span.enter();

        let conn = open_connection()?;

        for (record, section) in projection.sections.iter().enumerate() {
            insert_section(&conn, section).map_err(|source| {
                warn!(record, error = %source, "Section insert failed");
                ElfQueryError::Load {
                    relation: Relation::Sections,
                    record,
                    source,
                }
            })?;
        }

        for (record, symbol) in projection.symbols.iter().enumerate() {
            insert_symbol(&conn, symbol).map_err(|source| {
                warn!(record, error = %source, "Symbol insert failed");
                ElfQueryError::Load {
                    relation: Relation::Symbols,
                    record,
                    source,
                }
            })?;
        }

        debug!("Store loaded");
        Ok(Self {
            conn,
            section_count: projection.sections.len(),
            symbol_count: projection.symbols.len(),
            sizes: projection.sizes,
            diagnostics: projection.diagnostics,
        })
    }

    /// Run `text` against the loaded relations.
    pub fn query(&self, text: &str) -> Result<ResultSet> {
        debug!(query = text, "Executing query");
        let mut stmt = self.conn.prepare(text).map_err(ElfQueryError::Query)?;

        let columns: Vec<Column> = stmt
            .columns()
            .iter()
            .map(|c| Column::new(c.name(), c.decl_type()))
            .collect();
        let width = columns.len();

        let mut rows = stmt.query([]).map_err(ElfQueryError::Query)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(ElfQueryError::Query)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(Value::from(row.get_ref(i).map_err(ElfQueryError::Query)?));
            }
            out.push(values);
        }

        debug!(columns = width, rows = out.len(), "Query complete");
        Ok(ResultSet::new(columns, out))
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    /// Berkeley size totals of the loaded file
    pub fn sizes(&self) -> SizeSummary {
        self.sizes
    }

    /// Recoverable decode failures met while loading
    pub fn diagnostics(&self) -> &[DecodeIssue] {
        &self.diagnostics
    }
}

fn open_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(ElfQueryError::StoreInit)?;
    conn.execute_batch(&format!("{};\n{};", CREATE_SECTIONS, CREATE_SYMBOLS))
        .map_err(ElfQueryError::StoreInit)?;
    conn.create_scalar_function(
        "demangle",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let name: Option<String> = ctx.get(0)?;
            Ok(name.map(|n| demangle::demangle_or_original(&n)))
        },
    )
    .map_err(ElfQueryError::StoreInit)?;
    Ok(conn)
}

// Unsigned fields keep their bit pattern in SQLite's signed integers.
fn insert_section(conn: &Connection, s: &SectionRecord) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_SECTION)?;
    stmt.execute(params![
        s.id,
        s.name,
        s.section_type,
        s.flags,
        s.address as i64,
        s.offset as i64,
        s.size as i64,
        s.linked_index,
        s.info,
        s.alignment as i64,
        s.entry_size as i64,
    ])?;
    Ok(())
}

fn insert_symbol(conn: &Connection, s: &SymbolRecord) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare_cached(INSERT_SYMBOL)?;
    stmt.execute(params![
        s.value as i64,
        s.size as i64,
        s.symbol_type,
        s.binding,
        s.visibility,
        s.section_index,
        s.name,
        s.section,
    ])?;
    Ok(())
}
