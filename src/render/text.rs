//! Plain text output: `col, col, ` header, a blank line, then one line of
//! `value, ` cells per row.

use super::cell;
use crate::store::ResultSet;

pub(super) fn render(rs: &ResultSet) -> String {
    let mut out = String::new();
    for name in rs.column_names() {
        out.push_str(name);
        out.push_str(", ");
    }
    out.push_str("\n\n");

    for row in &rs.rows {
        for i in 0..rs.columns.len() {
            out.push_str(&cell(row, i));
            out.push_str(", ");
        }
        out.push('\n');
    }
    out
}
