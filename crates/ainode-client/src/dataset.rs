//! Typed result tables assembled from fetched pages

use crate::{Error, Result};
use ainode_protocol::{RawRow, TypeTag};
use std::collections::HashMap;

/// A decoded cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Text(String),
}

impl Value {
    /// Decode a big-endian cell according to its declared column type
    pub fn decode(tag: TypeTag, bytes: &[u8]) -> Result<Self> {
        if let Some(width) = tag.fixed_width() {
            if bytes.len() != width {
                return Err(Error::Decode(format!(
                    "{} cell must be {} bytes, got {}",
                    tag,
                    width,
                    bytes.len()
                )));
            }
        }

        let value = match tag {
            TypeTag::Boolean => Value::Boolean(bytes[0] != 0),
            TypeTag::Int32 => Value::Int32(i32::from_be_bytes(fixed(bytes))),
            TypeTag::Int64 => Value::Int64(i64::from_be_bytes(fixed(bytes))),
            TypeTag::Float => Value::Float(f32::from_be_bytes(fixed(bytes))),
            TypeTag::Double => Value::Double(f64::from_be_bytes(fixed(bytes))),
            TypeTag::Text => Value::Text(
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| Error::Decode(format!("TEXT cell is not UTF-8: {}", e)))?,
            ),
        };
        Ok(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Copy a slice whose length was already checked into an array
fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// A decoded row: timestamp plus one value per column, in column order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub timestamp: i64,
    pub values: Vec<Value>,
}

/// Column names, declared types and cell positions of a query result
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    names: Vec<String>,
    types: Vec<TypeTag>,
    positions: Vec<usize>,
    index: HashMap<String, usize>,
}

impl ColumnLayout {
    /// Check that every named column has a type and a cell position
    pub fn new(
        names: Vec<String>,
        types: Vec<TypeTag>,
        index: HashMap<String, usize>,
    ) -> Result<Self> {
        if names.len() != types.len() {
            return Err(Error::Decode(format!(
                "{} column names but {} column types",
                names.len(),
                types.len()
            )));
        }
        let positions = names
            .iter()
            .map(|name| {
                index
                    .get(name)
                    .copied()
                    .ok_or_else(|| Error::Decode(format!("column '{}' missing from index", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            names,
            types,
            positions,
            index,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[TypeTag] {
        &self.types
    }

    /// Column name to cell position, as sent by the server
    pub fn index(&self) -> &HashMap<String, usize> {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn decode_row(&self, raw: &RawRow) -> Result<Row> {
        let values = self
            .positions
            .iter()
            .zip(&self.types)
            .zip(&self.names)
            .map(|((&position, &tag), name)| match raw.cells.get(position) {
                Some(Some(bytes)) => Value::decode(tag, bytes),
                Some(None) => Ok(Value::Null),
                None => Err(Error::Decode(format!(
                    "row at {} has no cell {} for column '{}'",
                    raw.timestamp, position, name
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Row {
            timestamp: raw.timestamp,
            values,
        })
    }

    pub fn decode_rows(&self, raw: &[RawRow]) -> Result<Vec<Row>> {
        raw.iter().map(|row| self.decode_row(row)).collect()
    }
}

/// Rows of one query, concatenated in page-arrival order
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    layout: ColumnLayout,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn column_names(&self) -> &[String] {
        self.layout.names()
    }

    pub fn column_types(&self) -> &[TypeTag] {
        self.layout.types()
    }

    /// Position of a column in [`Row::values`]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.layout.names().iter().position(|n| n == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let column = self.column(column)?;
        self.rows.get(row).and_then(|r| r.values.get(column))
    }

    /// Decode a page and append it after the rows already held
    pub fn append_page(&mut self, raw: &[RawRow]) -> Result<usize> {
        let rows = self.layout.decode_rows(raw)?;
        let added = rows.len();
        self.rows.extend(rows);
        Ok(added)
    }
}
