use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Number, Value};
use std::io::Read;

/// One record, keyed by column name
pub type Row = Map<String, Value>;

/// The row set handed to the compiler alongside a ChartSpec. Read-only.
#[derive(Debug, Clone, Default)]
pub struct PlotData {
    pub rows: Vec<Row>,
}

impl PlotData {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Create PlotData from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(||
            anyhow!("Input data must be a JSON array of objects")
        )?;

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item.as_object().ok_or_else(||
                anyhow!("Item {} in data array is not an object", idx)
            )?;
            rows.push(obj.clone());
        }

        Ok(Self { rows })
    }

    /// Read CSV with a header row. Cells that parse as numbers become JSON numbers,
    /// empty cells become null, everything else stays a string.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                row.insert(header.clone(), csv_cell_value(cell));
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }
}

fn csv_cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(Number::from(i));
    }
    match cell.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(cell.to_string()),
    }
}

/// Category label for a cell. Null and missing cells have no label.
pub fn cell_label(row: &Row, field: &str) -> Option<String> {
    match row.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Numeric value for a cell; numeric strings are accepted.
pub fn cell_number(row: &Row, field: &str) -> Option<f64> {
    match row.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}
