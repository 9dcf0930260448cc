use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;
use std::io::Read;

/// A single typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Number(Vec<f64>),
    Text(Vec<String>),
    Time(Vec<NaiveDateTime>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Number(v) => v.len(),
            Column::Text(v) => v.len(),
            Column::Time(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column. Time values project to seconds since
    /// midnight so time-of-day columns can be binned and averaged.
    pub fn as_numeric(&self, name: &str) -> Result<Vec<f64>> {
        match self {
            Column::Number(v) => Ok(v.clone()),
            Column::Time(v) => Ok(v
                .iter()
                .map(|dt| dt.time().num_seconds_from_midnight() as f64)
                .collect()),
            Column::Text(_) => bail!("Column '{}' is not numeric", name),
        }
    }

    /// Text view of the column; always succeeds.
    pub fn as_text(&self) -> Vec<String> {
        match self {
            Column::Number(v) => v.iter().map(|n| n.to_string()).collect(),
            Column::Text(v) => v.clone(),
            Column::Time(v) => v
                .iter()
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .collect(),
        }
    }
}

/// An in-memory tabular dataset with named, typed columns.
///
/// Owned entirely by the caller; the renderers only borrow it.
#[derive(Debug, Clone)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(pairs: Vec<(String, Column)>) -> Result<Self> {
        if pairs.is_empty() {
            bail!("Table requires at least one column");
        }
        let len = pairs[0].1.len();
        for (name, col) in &pairs {
            if col.len() != len {
                bail!(
                    "All columns must have the same length (column '{}' has {}, expected {})",
                    name,
                    col.len(),
                    len
                );
            }
        }
        let (names, columns) = pairs.into_iter().unzip();
        Ok(Self { names, columns })
    }

    /// Parse CSV text into a table, inferring each column's type.
    ///
    /// A column where every value parses as a float becomes `Number`; where
    /// every value parses as a date or datetime it becomes `Time`; anything
    /// else stays `Text`.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record.context("Failed to read CSV record")?;
            if record.len() != headers.len() {
                bail!(
                    "CSV row {} has {} fields, expected {}",
                    row_idx + 1,
                    record.len(),
                    headers.len()
                );
            }
            for (col_idx, field) in record.iter().enumerate() {
                raw_columns[col_idx].push(field.to_string());
            }
        }

        if raw_columns.first().map(|c| c.is_empty()).unwrap_or(true) {
            bail!("CSV input must contain at least one data row");
        }

        let pairs = headers
            .into_iter()
            .zip(raw_columns.into_iter())
            .map(|(name, values)| (name, infer_column(values)))
            .collect();

        Table::new(pairs)
    }

    /// Build a table from a JSON array of objects. Every object must carry
    /// the keys of the first one.
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            bail!("Input data array is empty");
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let names: Vec<String> = first_obj.keys().cloned().collect();

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            for (col_idx, name) in names.iter().enumerate() {
                let val_str = match obj.get(name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => bail!("Unsupported value type for field '{}'", name),
                };
                raw_columns[col_idx].push(val_str);
            }
        }

        let pairs = names
            .into_iter()
            .zip(raw_columns.into_iter())
            .map(|(name, values)| (name, infer_column(values)))
            .collect();

        Table::new(pairs)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self
            .names
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("Column '{}' not found", name))?;
        Ok(&self.columns[idx])
    }

    /// Numeric view of a named column (time columns → seconds of day).
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?.as_numeric(name)
    }

    /// Text view of a named column.
    pub fn text(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.column(name)?.as_text())
    }

    pub fn is_time(&self, name: &str) -> Result<bool> {
        Ok(matches!(self.column(name)?, Column::Time(_)))
    }
}

/// Type inference for a raw string column: float, then datetime, then text.
fn infer_column(values: Vec<String>) -> Column {
    if values.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        return Column::Number(
            values
                .iter()
                .map(|s| s.trim().parse::<f64>().unwrap())
                .collect(),
        );
    }

    let parsed: Option<Vec<NaiveDateTime>> = values.iter().map(|s| parse_datetime(s)).collect();
    match parsed {
        Some(times) => Column::Time(times),
        None => Column::Text(values),
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, bare dates
/// (midnight) and bare times (anchored to 1970-01-01).
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(t) = chrono::NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Table::new(vec![
            ("a".to_string(), Column::Number(vec![1.0, 2.0])),
            ("b".to_string(), Column::Number(vec![1.0])),
        ]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("same length"));
    }

    #[test]
    fn test_from_csv_type_inference() {
        let csv = "delay,airline,dep\n12.5,AA,2024-03-01 08:15:00\n-3,UA,2024-03-01 09:30:00\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column("delay").unwrap(),
            &Column::Number(vec![12.5, -3.0])
        );
        assert!(matches!(table.column("airline").unwrap(), Column::Text(_)));
        assert!(table.is_time("dep").unwrap());
    }

    #[test]
    fn test_from_csv_empty_rows() {
        let result = Table::from_csv("x,y\n".as_bytes());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one data row"));
    }

    #[test]
    fn test_from_json() {
        let value: Value =
            serde_json::from_str(r#"[{"x": 1, "label": "A"}, {"x": 2, "label": "B"}]"#).unwrap();
        let table = Table::from_json(&value).unwrap();
        assert_eq!(table.numeric("x").unwrap(), vec![1.0, 2.0]);
        assert_eq!(table.text("label").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_column_not_found() {
        let table = Table::new(vec![("x".to_string(), Column::Number(vec![1.0]))]).unwrap();
        let result = table.column("y");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_column_lookup_case_insensitive() {
        let table = Table::new(vec![("DepTime".to_string(), Column::Number(vec![1.0]))]).unwrap();
        assert!(table.column("deptime").is_ok());
    }

    #[test]
    fn test_time_column_numeric_is_seconds_of_day() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 30)
            .unwrap();
        let table = Table::new(vec![("dep".to_string(), Column::Time(vec![dt]))]).unwrap();
        assert_eq!(
            table.numeric("dep").unwrap(),
            vec![(8 * 3600 + 15 * 60 + 30) as f64]
        );
    }

    #[test]
    fn test_text_column_not_numeric() {
        let table = Table::new(vec![(
            "airline".to_string(),
            Column::Text(vec!["AA".to_string()]),
        )])
        .unwrap();
        let result = table.numeric("airline");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not numeric"));
    }

    #[test]
    fn test_bare_time_parsing() {
        let csv = "dep\n08:15:00\n23:59:59\n";
        let table = Table::from_csv(csv.as_bytes()).unwrap();
        assert!(table.is_time("dep").unwrap());
        assert_eq!(
            table.numeric("dep").unwrap(),
            vec![(8 * 3600 + 15 * 60) as f64, 86_399.0]
        );
    }
}
