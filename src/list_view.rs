//! Generic table rendering for list views.
//!
//! [`ListView::render`] knows nothing about filters or fetching: it takes the
//! column layout, the rows, a key function and a row renderer, and produces a
//! [`RenderedTable`] that can be printed or inspected.

use std::collections::HashSet;
use std::fmt;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use crate::error::{AdminError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub header: String,
    pub align: Align,
}

impl ColumnDescriptor {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            align: Align::Left,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Output of [`ListView::render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    columns: Vec<ColumnDescriptor>,
    keys: Vec<String>,
    cells: Vec<Vec<String>>,
}

impl RenderedTable {
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Row keys in display order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Rendered cells of the row with `key`
    pub fn row(&self, key: &str) -> Option<&[String]> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(&self.cells[index])
    }

    /// Cell of the row with `key` under the column titled `header`
    pub fn cell(&self, key: &str, header: &str) -> Option<&str> {
        let column = self.columns.iter().position(|c| c.header == header)?;
        self.row(key).map(|cells| cells[column].as_str())
    }
}

impl fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header.clone()));
        for row in &self.cells {
            builder.push_record(row.iter().cloned());
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        for (index, column) in self.columns.iter().enumerate() {
            let alignment = match column.align {
                Align::Left => continue,
                Align::Center => Alignment::center(),
                Align::Right => Alignment::right(),
            };
            table.modify(Columns::new(index..index + 1), alignment);
        }

        write!(f, "{table}")
    }
}

pub struct ListView;

impl ListView {
    /// Render `rows` under `columns`.
    ///
    /// Fails if two rows share a key or if a rendered row does not have one
    /// cell per column.
    pub fn render<R, K, F>(
        columns: &[ColumnDescriptor],
        rows: &[R],
        row_key: K,
        row_renderer: F,
    ) -> Result<RenderedTable>
    where
        K: Fn(&R) -> String,
        F: Fn(&R) -> Vec<String>,
    {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut keys = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());

        for row in rows {
            let key = row_key(row);
            if !seen.insert(key.clone()) {
                return Err(AdminError::DuplicateRowKey(key));
            }

            let rendered = row_renderer(row);
            if rendered.len() != columns.len() {
                return Err(AdminError::ColumnMismatch {
                    key,
                    expected: columns.len(),
                    actual: rendered.len(),
                });
            }

            keys.push(key);
            cells.push(rendered);
        }

        Ok(RenderedTable {
            columns: columns.to_vec(),
            keys,
            cells,
        })
    }
}
