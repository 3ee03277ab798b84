//! Bordered tables for terminals.

use super::{cell, is_integer_column};
use crate::store::ResultSet;

const RESET: &str = "\x1b[0m";

/// Border characters for one horizontal rule: left, fill, cross, right
type Rule = [char; 4];

pub(super) struct Style {
    top: Rule,
    middle: Rule,
    bottom: Rule,
    vertical: char,
    /// ANSI prefix for header cells
    header: Option<&'static str>,
    /// ANSI prefix for every second data row
    stripe: Option<&'static str>,
}

pub(super) const ASCII: Style = Style {
    top: ['+', '-', '+', '+'],
    middle: ['+', '-', '+', '+'],
    bottom: ['+', '-', '+', '+'],
    vertical: '|',
    header: None,
    stripe: None,
};

pub(super) const UNICODE: Style = Style {
    top: ['┌', '─', '┬', '┐'],
    middle: ['├', '─', '┼', '┤'],
    bottom: ['└', '─', '┴', '┘'],
    vertical: '│',
    header: None,
    stripe: None,
};

pub(super) const COLOR: Style = Style {
    header: Some("\x1b[1;97;44m"),
    stripe: Some("\x1b[48;5;236m"),
    ..UNICODE
};

/// Display width; every char counts as one column
fn width(s: &str) -> usize {
    s.chars().count()
}

/// Control characters as escapes so each cell stays on one line
fn escape_cell(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

pub(super) fn render(rs: &ResultSet, style: &Style) -> String {
    let ncols = rs.columns.len();
    if ncols == 0 {
        return String::new();
    }

    let header: Vec<String> = rs.column_names().map(escape_cell).collect();
    let rows: Vec<Vec<String>> = rs
        .rows
        .iter()
        .map(|row| (0..ncols).map(|i| escape_cell(&cell(row, i))).collect())
        .collect();
    let right: Vec<bool> = (0..ncols).map(|i| is_integer_column(rs, i)).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| width(h)).collect();
    for row in &rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(width(c));
        }
    }

    let mut out = String::new();
    rule(&mut out, &widths, style.top);
    line(&mut out, &widths, &header, &vec![false; ncols], style.vertical, style.header);
    rule(&mut out, &widths, style.middle);
    for (n, row) in rows.iter().enumerate() {
        let shade = if n % 2 == 1 { style.stripe } else { None };
        line(&mut out, &widths, row, &right, style.vertical, shade);
    }
    rule(&mut out, &widths, style.bottom);
    out
}

fn rule(out: &mut String, widths: &[usize], [left, fill, cross, right]: Rule) {
    out.push(left);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            out.push(cross);
        }
        out.extend(std::iter::repeat(fill).take(w + 2));
    }
    out.push(right);
    out.push('\n');
}

fn line(
    out: &mut String,
    widths: &[usize],
    cells: &[String],
    right: &[bool],
    vertical: char,
    ansi: Option<&str>,
) {
    out.push(vertical);
    for ((text, w), right) in cells.iter().zip(widths).zip(right) {
        let fill = " ".repeat(w.saturating_sub(width(text)));
        let padded = if *right {
            format!(" {}{} ", fill, text)
        } else {
            format!(" {}{} ", text, fill)
        };
        match ansi {
            Some(code) => {
                out.push_str(code);
                out.push_str(&padded);
                out.push_str(RESET);
            }
            None => out.push_str(&padded),
        }
        out.push(vertical);
    }
    out.push('\n');
}
