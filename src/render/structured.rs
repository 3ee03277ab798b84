//! Machine-readable output: CSV and JSON.

use serde_json::{Map, Number, Value as Json};
use std::collections::HashSet;

use super::{cell, DeclaredKind, RenderError, JSON_DUPLICATE_SEPARATOR};
use crate::store::{ResultSet, Value};

pub(super) fn csv(rs: &ResultSet) -> Result<String, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let ncols = rs.columns.len();
    if ncols > 0 {
        writer.write_record(rs.column_names())?;
        for row in &rs.rows {
            writer.write_record((0..ncols).map(|i| cell(row, i)))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Rows as an array of objects in column order
pub(super) fn json(rs: &ResultSet) -> Result<String, RenderError> {
    let kinds: Vec<Option<DeclaredKind>> = rs.columns.iter().map(DeclaredKind::of).collect();
    let keys = object_keys(rs);
    let rows: Vec<Json> = rs
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::with_capacity(keys.len());
            for (i, key) in keys.iter().enumerate() {
                let value = row.get(i).unwrap_or(&Value::Null);
                object.insert(key.clone(), typed(value, kinds[i]));
            }
            Json::Object(object)
        })
        .collect();

    let mut out = serde_json::to_string(&rows)?;
    out.push('\n');
    Ok(out)
}

/// One unique key per column; repeats get `name:N` suffixes
fn object_keys(rs: &ResultSet) -> Vec<String> {
    let mut taken: HashSet<String> = rs.column_names().map(str::to_string).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    rs.column_names()
        .map(|name| {
            if seen.insert(name) {
                return name.to_string();
            }
            // A later column may already be literally named `Name:1`
            let mut n = 1;
            loop {
                let key = format!("{}{}{}", name, JSON_DUPLICATE_SEPARATOR, n);
                if taken.insert(key.clone()) {
                    return key;
                }
                n += 1;
            }
        })
        .collect()
}

/// JSON value for one cell, typed by its column's declared kind.
///
/// Cells that do not fit the declared kind (SQLite stores whatever it is
/// given) and expression columns fall back to the cell's own kind.
fn typed(value: &Value, kind: Option<DeclaredKind>) -> Json {
    match (value, kind) {
        (Value::Null, _) => Json::Null,
        (Value::Integer(v), Some(DeclaredKind::Boolean)) => Json::Bool(*v != 0),
        (Value::Text(s), Some(DeclaredKind::Boolean)) => match s.to_ascii_lowercase().as_str() {
            "true" | "1" => Json::Bool(true),
            "false" | "0" => Json::Bool(false),
            _ => Json::String(s.clone()),
        },
        (Value::Integer(v), Some(DeclaredKind::Text)) => Json::String(v.to_string()),
        (Value::Text(s), Some(DeclaredKind::Integer)) => match s.parse::<i64>() {
            Ok(v) => Json::Number(Number::from(v)),
            Err(_) => Json::String(s.clone()),
        },
        (Value::Integer(v), _) => Json::Number(Number::from(*v)),
        (Value::Text(s), _) => Json::String(s.clone()),
    }
}
