use crate::dates;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Cell: One spreadsheet cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    pub fn text<S: Into<String>>(s: S) -> Self {
        Cell::Text(s.into())
    }

    /// Numeric cell from an API value.
    ///
    /// Decimal strings (the API encodes big numbers that way) become numbers;
    /// strings that don't parse stay text; everything missing is `Null`.
    pub fn number(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Cell::Number(n),
                _ => Cell::Text(s.clone()),
            },
            Some(Value::Bool(b)) => Cell::Text(b.to_string()),
            _ => Cell::Null,
        }
    }

    /// Text cell from an API value. Numbers stay numbers.
    pub fn text_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
            Some(Value::Bool(b)) => Cell::Text(b.to_string()),
            _ => Cell::Null,
        }
    }

    /// Date cell in canonical `YYYY-MM-DD` form.
    ///
    /// Unparseable strings are passed through untouched.
    pub fn date(value: Option<&Value>) -> Self {
        Cell::date_str(value.and_then(Value::as_str))
    }

    pub fn date_str(value: Option<&str>) -> Self {
        match value {
            Some(s) => Cell::Text(dates::canonical_date(s).unwrap_or_else(|| s.to_string())),
            None => Cell::Null,
        }
    }

    pub fn from_opt_f64(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Null)
    }

    pub fn from_opt_string(value: Option<&String>) -> Self {
        value.map(|s| Cell::Text(s.clone())).unwrap_or(Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

// ---------------------------------------------------------------------------
// Table: Header row plus body rows
// ---------------------------------------------------------------------------

/// Formatted result of an exposed function.
///
/// Serializes as `[headers, rows]`, the shape a spreadsheet host renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Empty table with the given header row.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(headers: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(headers);
        table.rows = rows;
        table
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, by header name.
    pub fn column(&self, header: &str) -> Option<Vec<&Cell>> {
        let idx = self.headers.iter().position(|h| h == header)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }

    /// Header row followed by the body, as one grid.
    pub fn to_grid(&self) -> Vec<Vec<Cell>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.headers.iter().map(|h| Cell::Text(h.clone())).collect());
        grid.extend(self.rows.iter().cloned());
        grid
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.headers)?;
        tup.serialize_element(&self.rows)?;
        tup.end()
    }
}
