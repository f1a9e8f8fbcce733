// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-width tables and JSON output.

use serde::Serialize;

/// Column-aligned text table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self { headers: headers.iter().map(|h| (*h).to_owned()).collect(), rows: Vec::new() }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        let line = |cells: &[String]| {
            let mut out = String::new();
            for (i, cell) in cells.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let width = widths.get(i).copied().unwrap_or(0);
                out.push_str(&format!("{cell:<width$}"));
            }
            out.trim_end().to_owned()
        };

        let mut out = line(&self.headers);
        out.push('\n');
        let total = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&line(row));
        }
        out
    }
}

/// Pretty JSON for `value`.
pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print `value` as JSON, or the table built by `table` otherwise.
pub fn emit<T, F>(as_json: bool, value: &T, empty: &str, table: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Table,
{
    if as_json {
        println!("{}", json(value)?);
        return Ok(());
    }
    let table = table();
    if table.is_empty() {
        println!("{empty}");
    } else {
        println!("{}", table.render());
    }
    Ok(())
}

/// Cell text for an optional value.
pub fn cell(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => "-".to_owned(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
