//! Usage text built from the help strings of an option table.
//!
//! Help strings are printed in table order, one line per `\n`. Inside a
//! line, `\t` separates columns; consecutive lines that use tabs are laid
//! out as one table with aligned columns, and the last column is wrapped to
//! the requested width.

use std::io::Write;

use crate::descriptor::{self, Descriptor};

/// Narrowest last column worth wrapping into.
const MIN_TEXT_WIDTH: usize = 10;

pub fn print_usage<W: Write>(out: &mut W, table: &[Descriptor], columns: usize) -> std::io::Result<()> {
    let lines: Vec<&str> = descriptor::rows(table)
        .iter()
        .filter(|d| !d.help.is_empty())
        .flat_map(|d| d.help.split('\n'))
        .collect();

    let mut start = 0;
    while start < lines.len() {
        if !lines[start].contains('\t') {
            write_wrapped_text(out, lines[start], 0, columns)?;
            start += 1;
            continue;
        }
        let end = lines[start..]
            .iter()
            .position(|l| !l.contains('\t'))
            .map_or(lines.len(), |n| start + n);
        write_table(out, &lines[start..end], columns)?;
        start = end;
    }
    Ok(())
}

pub fn usage_string(table: &[Descriptor], columns: usize) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = print_usage(&mut buf, table, columns);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_table<W: Write>(out: &mut W, lines: &[&str], columns: usize) -> std::io::Result<()> {
    let rows: Vec<Vec<&str>> = lines.iter().map(|l| l.split('\t').collect()).collect();
    let ncols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; ncols];
    for row in &rows {
        for (i, cell) in row.iter().enumerate().take(row.len() - 1) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for row in &rows {
        let (last, cells) = match row.split_last() {
            Some(split) => split,
            None => continue,
        };
        let mut indent = 0;
        for (i, cell) in cells.iter().enumerate() {
            write!(out, "{:width$}", cell, width = widths[i])?;
            indent += widths[i];
        }
        write_wrapped_text(out, last, indent, columns)?;
    }
    Ok(())
}

/// Word-wrap `text` so no line passes `columns`, continuation lines
/// indented by `indent`. The first line is assumed to start at `indent`.
fn write_wrapped_text<W: Write>(
    out: &mut W,
    text: &str,
    indent: usize,
    columns: usize,
) -> std::io::Result<()> {
    let line_length = columns.saturating_sub(indent);
    if line_length < MIN_TEXT_WIDTH {
        return write!(out, "{}\n", text);
    }

    let mut help = text;
    while help.chars().count() > line_length {
        // a space right at the limit is still a valid break
        let end = match help.char_indices().nth(line_length) {
            Some((i, c)) => i + c.len_utf8(),
            None => break,
        };
        let break_pos = match help[..end].rfind(' ') {
            Some(pos) if pos > 0 => pos,
            _ => break, // no space to break at
        };
        write!(out, "{}\n{:indent$}", &help[..break_pos], "", indent = indent)?;
        help = help[break_pos..].trim_start_matches(' ');
    }
    write!(out, "{}\n", help)
}
