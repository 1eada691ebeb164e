//! [`RawRow`]: one loosely-typed input row keyed by column header.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// A scalar cell value as delivered by a spreadsheet or JSON decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Text(String),
  Number(f64),
}

impl Cell {
  /// The cell rendered as trimmed text. Integral numbers print without a
  /// fractional part, so `2024.0` reads back as `"2024"`.
  pub fn to_text(&self) -> String {
    match self {
      Cell::Text(s) => s.trim().to_owned(),
      Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
      Cell::Number(n) => n.to_string(),
    }
  }

  pub fn as_number(&self) -> Option<f64> {
    let n = match self {
      Cell::Number(n) => Some(*n),
      Cell::Text(s) => s.trim().parse::<f64>().ok(),
    };
    n.filter(|n| n.is_finite())
  }
}

impl From<&str> for Cell {
  fn from(s: &str) -> Self { Cell::Text(s.to_owned()) }
}

impl From<f64> for Cell {
  fn from(n: f64) -> Self { Cell::Number(n) }
}

/// An ordered mapping from column header to cell.
///
/// Header text is kept exactly as authored; lookups are exact-match. Rows
/// decoded from JSON may also carry structured entries: arrays of objects
/// kept whole under their key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
  cells:   Vec<(String, Cell)>,
  entries: Vec<(String, Vec<Value>)>,
}

impl RawRow {
  pub fn new() -> Self { Self::default() }

  /// Append a cell. A later cell with the same header shadows nothing;
  /// [`RawRow::get`] returns the first.
  pub fn push(&mut self, header: impl Into<String>, cell: impl Into<Cell>) {
    self.cells.push((header.into(), cell.into()));
  }

  pub fn with(mut self, header: impl Into<String>, cell: impl Into<Cell>) -> Self {
    self.push(header, cell);
    self
  }

  pub fn get(&self, header: &str) -> Option<&Cell> {
    self
      .cells
      .iter()
      .find(|(h, _)| h == header)
      .map(|(_, cell)| cell)
  }

  pub fn headers(&self) -> impl Iterator<Item = &str> {
    self.cells.iter().map(|(h, _)| h.as_str())
  }

  /// Number of scalar cells.
  pub fn len(&self) -> usize { self.cells.len() }

  pub fn is_empty(&self) -> bool { self.cells.is_empty() && self.entries.is_empty() }

  pub fn push_entries(&mut self, key: impl Into<String>, items: Vec<Value>) {
    self.entries.push((key.into(), items));
  }

  /// Structured entries under the first of `aliases` that has any.
  pub fn entries(&self, aliases: &[&str]) -> Option<&[Value]> {
    aliases.iter().find_map(|alias| {
      self
        .entries
        .iter()
        .find(|(key, items)| key.as_str() == *alias && !items.is_empty())
        .map(|(_, items)| items.as_slice())
    })
  }

  /// The first header in `aliases` whose cell is present and non-blank.
  pub fn first(&self, aliases: &[&str]) -> Option<&Cell> {
    aliases
      .iter()
      .filter_map(|alias| self.get(alias))
      .find(|cell| !cell.to_text().is_empty())
  }

  /// Trimmed text of [`RawRow::first`], or the empty string.
  pub fn text(&self, aliases: &[&str]) -> String {
    self.first(aliases).map(Cell::to_text).unwrap_or_default()
  }
}

// ─── JSON rows ───────────────────────────────────────────────────────────────

/// Convert a JSON bulk payload into rows.
///
/// Strings and numbers are kept, booleans become `"true"`/`"false"` and
/// arrays of scalars are joined with `", "`. Nested objects are flattened
/// into dotted keys, so `{"contact": {"email": ..}}` yields a `contact.email`
/// cell. Arrays of objects are kept whole as structured entries. Nulls are
/// dropped. Any element that is not an object fails the whole call.
pub fn rows_from_json(values: Vec<Value>) -> Result<Vec<RawRow>> {
  values
    .into_iter()
    .enumerate()
    .map(|(index, value)| {
      let Value::Object(map) = value else {
        return Err(Error::NotAnObject { index });
      };
      let mut row = RawRow::new();
      flatten_into(&mut row, None, map);
      Ok(row)
    })
    .collect()
}

fn flatten_into(row: &mut RawRow, prefix: Option<&str>, map: Map<String, Value>) {
  for (key, value) in map {
    let key = match prefix {
      Some(prefix) => format!("{prefix}.{key}"),
      None => key,
    };
    match value {
      Value::Object(inner) => flatten_into(row, Some(key.as_str()), inner),
      Value::Array(items) if items.iter().any(Value::is_object) => {
        let items = items.into_iter().filter(Value::is_object).collect();
        row.push_entries(key, items);
      }
      other => {
        if let Some(cell) = json_cell(other) {
          row.push(key, cell);
        }
      }
    }
  }
}

fn json_cell(value: Value) -> Option<Cell> {
  match value {
    Value::String(s) => Some(Cell::Text(s)),
    Value::Number(n) => n.as_f64().map(Cell::Number),
    Value::Bool(b) => Some(Cell::Text(b.to_string())),
    Value::Array(items) => {
      let parts: Vec<String> = items
        .into_iter()
        .filter_map(json_cell)
        .map(|cell| cell.to_text())
        .filter(|s| !s.is_empty())
        .collect();
      Some(Cell::Text(parts.join(", ")))
    }
    Value::Null | Value::Object(_) => None,
  }
}
