//! Result set rendering.
//!
//! [`render`] turns a [`ResultSet`] into one string in the requested
//! [`OutputFormat`]. Rendering is a pure function of its inputs; nothing is
//! cached between calls.

mod markup;
mod structured;
mod table;
mod text;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::store::{Column, ResultSet, Value};

/// `id` of the HTML `<tbody>` element holding the result rows
pub const HTML_BODY_ID: &str = "elfquery-rows";

/// Joins a repeated column name and its occurrence number in JSON keys.
///
/// JSON objects need unique keys, so the second `Name` column of a join is
/// keyed `Name:1`, the third `Name:2`, and so on. The first occurrence keeps
/// its plain name.
pub const JSON_DUPLICATE_SEPARATOR: char = ':';

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rendered output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Comma separated cells, header first
    #[default]
    Text,
    /// ASCII-bordered table
    PrettyAscii,
    /// Box-drawing table
    PrettyUnicode,
    /// Box-drawing table with ANSI styling
    PrettyColor,
    Markdown,
    Html,
    Csv,
    /// JSON array of row objects
    Json,
}

impl OutputFormat {
    /// Every accepted spelling, canonical names first
    pub const NAMES: &'static [&'static str] = &[
        "text",
        "pretty",
        "unicode",
        "color",
        "markdown",
        "html",
        "csv",
        "json",
        "pretty-ascii",
        "ascii",
        "pretty-unicode",
        "pretty-unicode-color",
        "md",
        "structured",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::PrettyAscii => "pretty",
            OutputFormat::PrettyUnicode => "unicode",
            OutputFormat::PrettyColor => "color",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "text" => OutputFormat::Text,
            "pretty" | "pretty-ascii" | "ascii" => OutputFormat::PrettyAscii,
            "unicode" | "pretty-unicode" => OutputFormat::PrettyUnicode,
            "color" | "pretty-unicode-color" => OutputFormat::PrettyColor,
            "md" | "markdown" => OutputFormat::Markdown,
            "html" => OutputFormat::Html,
            "csv" => OutputFormat::Csv,
            "json" | "structured" => OutputFormat::Json,
            _ => return Err(RenderError::UnsupportedFormat(s.to_string())),
        };
        Ok(format)
    }
}

/// Render `rs` in `format`.
pub fn render(rs: &ResultSet, format: OutputFormat) -> Result<String, RenderError> {
    let out = match format {
        OutputFormat::Text => text::render(rs),
        OutputFormat::PrettyAscii => table::render(rs, &table::ASCII),
        OutputFormat::PrettyUnicode => table::render(rs, &table::UNICODE),
        OutputFormat::PrettyColor => table::render(rs, &table::COLOR),
        OutputFormat::Markdown => markup::markdown(rs),
        OutputFormat::Html => markup::html(rs),
        OutputFormat::Csv => structured::csv(rs)?,
        OutputFormat::Json => structured::json(rs)?,
    };
    Ok(out)
}

/// Parse `format` and render `rs` with it
pub fn render_named(rs: &ResultSet, format: &str) -> Result<String, RenderError> {
    render(rs, format.parse()?)
}

/// Type family of a declared column type, using SQLite's affinity rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclaredKind {
    Integer,
    Boolean,
    Text,
}

impl DeclaredKind {
    pub(crate) fn of(column: &Column) -> Option<Self> {
        let decl = column.decl_type.as_deref()?.to_ascii_uppercase();
        if decl.contains("INT") {
            Some(DeclaredKind::Integer)
        } else if decl.contains("BOOL") {
            Some(DeclaredKind::Boolean)
        } else if decl.contains("CHAR") || decl.contains("CLOB") || decl.contains("TEXT") {
            Some(DeclaredKind::Text)
        } else {
            None
        }
    }
}

/// Whether column `index` holds numbers and should be right-aligned.
///
/// Declared integer columns always are; expression columns are when every
/// non-null cell is an integer.
pub(crate) fn is_integer_column(rs: &ResultSet, index: usize) -> bool {
    if let Some(column) = rs.columns.get(index) {
        if let Some(kind) = DeclaredKind::of(column) {
            return kind == DeclaredKind::Integer;
        }
    }
    let mut cells = rs.rows.iter().filter_map(|row| row.get(index)).filter(|v| !v.is_null());
    let mut any = false;
    let all = cells.all(|v| {
        any = true;
        matches!(v, Value::Integer(_))
    });
    any && all
}

/// Cell text; rows shorter than the header read as null
pub(crate) fn cell(row: &[Value], index: usize) -> String {
    row.get(index).map(Value::to_string).unwrap_or_default()
}
