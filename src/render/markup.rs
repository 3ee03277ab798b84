//! Markdown and HTML tables.

use super::{cell, is_integer_column, HTML_BODY_ID};
use crate::store::ResultSet;

fn escape_markdown(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

/// Escape HTML entities
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// GitHub-flavoured Markdown table
pub(super) fn markdown(rs: &ResultSet) -> String {
    let ncols = rs.columns.len();
    let mut out = String::from("|");
    for name in rs.column_names() {
        out.push_str(&format!(" {} |", escape_markdown(name)));
    }
    out.push_str("\n|");
    for i in 0..ncols {
        out.push_str(if is_integer_column(rs, i) { " ---: |" } else { " --- |" });
    }
    out.push('\n');

    for row in &rs.rows {
        out.push('|');
        for i in 0..ncols {
            out.push_str(&format!(" {} |", escape_markdown(&cell(row, i))));
        }
        out.push('\n');
    }
    out
}

/// HTML table; rows live under `<tbody id="elfquery-rows">`
pub(super) fn html(rs: &ResultSet) -> String {
    let ncols = rs.columns.len();
    let align: Vec<&str> = (0..ncols)
        .map(|i| if is_integer_column(rs, i) { " align=\"right\"" } else { "" })
        .collect();

    let mut out = String::from("<table class=\"table\">\n  <thead>\n  <tr>\n");
    for (name, align) in rs.column_names().zip(&align) {
        out.push_str(&format!("    <th{}>{}</th>\n", align, escape_html(name)));
    }
    out.push_str("  </tr>\n  </thead>\n");
    out.push_str(&format!("  <tbody id=\"{}\">\n", HTML_BODY_ID));
    for row in &rs.rows {
        out.push_str("  <tr>\n");
        for (i, align) in align.iter().enumerate() {
            out.push_str(&format!("    <td{}>{}</td>\n", align, escape_html(&cell(row, i))));
        }
        out.push_str("  </tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}
