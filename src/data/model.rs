use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single parsed cell before its column type is known
// ---------------------------------------------------------------------------

/// Spellings treated as a missing value, mirroring the usual Pandas defaults.
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
];

/// A dynamically-typed cell as read from a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Guess the type of a raw text cell.
    ///
    /// Booleans count as numbers (`true` = 1, `false` = 0) so that flag
    /// columns take part in correlation, as they do in a DataFrame.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if MISSING_MARKERS.contains(&s) {
            return CellValue::Missing;
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Number(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Number(1.0),
            "false" | "False" | "FALSE" => CellValue::Number(0.0),
            _ => CellValue::Text(s.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named measurement channel
// ---------------------------------------------------------------------------

/// Column storage. Missing numeric cells are NaN, missing text cells are empty.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Column {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Settle the column type: numeric when every present cell is a number.
    /// A column with nothing but missing cells is numeric (all NaN).
    pub fn from_cells(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let all_numeric = cells
            .iter()
            .all(|c| matches!(c, CellValue::Number(_) | CellValue::Missing));

        if all_numeric {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Number(v) => v,
                    _ => f64::NAN,
                })
                .collect();
            Column::numeric(name, values)
        } else {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Missing => String::new(),
                    other => other.to_string(),
                })
                .collect();
            Column::text(name, values)
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// First `rows` cells (fewer if the column is shorter).
    pub fn head(&self, rows: usize) -> Self {
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(v.iter().take(rows).copied().collect()),
            ColumnData::Text(v) => ColumnData::Text(v.iter().take(rows).cloned().collect()),
        };
        Column {
            name: self.name.clone(),
            data,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A named table of equally long columns, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Dataset {
            name: name.into(),
            columns,
        }
    }

    /// Number of rows (observations).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns, numeric or not.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Numeric columns in source order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .filter_map(|c| c.as_numeric().map(|v| (c.name.as_str(), v)))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_guesses_cell_types() {
        assert_eq!(CellValue::parse("1.5"), CellValue::Number(1.5));
        assert_eq!(CellValue::parse(" -3 "), CellValue::Number(-3.0));
        assert_eq!(CellValue::parse("True"), CellValue::Number(1.0));
        assert_eq!(CellValue::parse("NaN"), CellValue::Missing);
        assert_eq!(CellValue::parse(""), CellValue::Missing);
        assert_eq!(CellValue::parse("HP-01"), CellValue::Text("HP-01".into()));
    }

    #[test]
    fn missing_cells_keep_column_numeric() {
        let col = Column::from_cells(
            "a",
            vec![CellValue::Number(1.0), CellValue::Missing, CellValue::Number(3.0)],
        );
        let values = col.as_numeric().unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[1].is_nan());
    }

    #[test]
    fn one_text_cell_makes_column_text() {
        let col = Column::from_cells(
            "date",
            vec![CellValue::Number(1.0), CellValue::Text("x".into()), CellValue::Missing],
        );
        assert_eq!(
            col.data,
            ColumnData::Text(vec!["1".into(), "x".into(), String::new()])
        );
    }

    #[test]
    fn numeric_columns_skip_text() {
        let ds = Dataset::new(
            "t",
            vec![
                Column::text("id", vec!["a".into(), "b".into()]),
                Column::numeric("x", vec![1.0, 2.0]),
                Column::numeric("y", vec![3.0, 4.0]),
            ],
        );
        let names: Vec<&str> = ds.numeric_columns().map(|(n, _)| n).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.n_columns(), 3);
    }
}
