//! Minimal columnar dataframe.
//!
//! Frames are what partitions carry to workers and what the forecasting
//! procedure returns, so they stay small: typed column vectors plus a few
//! row-level operations (selection, concatenation, schema conformance).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::schema::{DataType, Schema};

/// Typed storage of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Utf8(Vec<String>),
    Datetime(Vec<NaiveDateTime>),
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Boolean(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Utf8(v) => v.len(),
            ColumnData::Datetime(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::Utf8(_) => DataType::String,
            ColumnData::Datetime(_) => DataType::Datetime,
            ColumnData::Float64(_) => DataType::Double,
            ColumnData::Int64(_) => DataType::Long,
            ColumnData::Boolean(_) => DataType::Bool,
        }
    }

    /// Gather the given rows, in the given order.
    ///
    /// Panics if an index is out of bounds.
    pub fn take(&self, indices: &[usize]) -> ColumnData {
        fn gather<T: Clone>(v: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| v[i].clone()).collect()
        }

        match self {
            ColumnData::Utf8(v) => ColumnData::Utf8(gather(v, indices)),
            ColumnData::Datetime(v) => ColumnData::Datetime(gather(v, indices)),
            ColumnData::Float64(v) => ColumnData::Float64(gather(v, indices)),
            ColumnData::Int64(v) => ColumnData::Int64(gather(v, indices)),
            ColumnData::Boolean(v) => ColumnData::Boolean(gather(v, indices)),
        }
    }

    fn append(&mut self, other: ColumnData) -> Result<(), ColumnData> {
        match (self, other) {
            (ColumnData::Utf8(a), ColumnData::Utf8(b)) => a.extend(b),
            (ColumnData::Datetime(a), ColumnData::Datetime(b)) => a.extend(b),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => a.extend(b),
            (ColumnData::Int64(a), ColumnData::Int64(b)) => a.extend(b),
            (ColumnData::Boolean(a), ColumnData::Boolean(b)) => a.extend(b),
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Convert to `dtype`, allowing only the lossless-enough `long -> double` widening.
    fn cast(&self, dtype: DataType) -> Option<ColumnData> {
        match (self, dtype) {
            (data, wanted) if data.dtype() == wanted => Some(data.clone()),
            (ColumnData::Int64(v), DataType::Double) => {
                Some(ColumnData::Float64(v.iter().map(|&x| x as f64).collect()))
            }
            _ => None,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn utf8<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, ColumnData::Utf8(values.into_iter().map(Into::into).collect()))
    }

    pub fn datetime(name: impl Into<String>, values: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        Self::new(name, ColumnData::Datetime(values.into_iter().collect()))
    }

    pub fn float64(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, ColumnData::Float64(values.into_iter().collect()))
    }

    pub fn int64(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(name, ColumnData::Int64(values.into_iter().collect()))
    }

    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }
}

/// Columnar table with equal-length columns.
///
/// Duplicate column names are permitted; lookups by name return the first match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Build a frame, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> FrameResult<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(FrameError::LengthMismatch {
                column: bad.name.clone(),
                expected: rows,
                found: bad.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Zero-row frame carrying the columns of `schema`.
    pub fn empty_like(schema: &Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|f| {
                let data = match f.dtype {
                    DataType::String => ColumnData::Utf8(Vec::new()),
                    DataType::Datetime => ColumnData::Datetime(Vec::new()),
                    DataType::Double => ColumnData::Float64(Vec::new()),
                    DataType::Long => ColumnData::Int64(Vec::new()),
                    DataType::Bool => ColumnData::Boolean(Vec::new()),
                };
                Column::new(f.name.clone(), data)
            })
            .collect();
        Self { columns, rows: 0 }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Frame::column`], but a missing column is an error.
    pub fn require(&self, name: &str) -> FrameResult<&Column> {
        self.column(name).ok_or_else(|| FrameError::not_found(name))
    }

    /// New frame holding the given rows, in the given order.
    ///
    /// Panics if an index is out of bounds.
    pub fn take(&self, indices: &[usize]) -> Frame {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
                .collect(),
            rows: indices.len(),
        }
    }

    /// Stack frames vertically.
    ///
    /// The first frame fixes the column order; the others must carry the same
    /// column names with the same types (in any order).
    pub fn concat(frames: impl IntoIterator<Item = Frame>) -> FrameResult<Frame> {
        let mut frames = frames.into_iter();
        let Some(mut out) = frames.next() else {
            return Ok(Frame::empty());
        };

        for next in frames {
            if next.num_columns() != out.num_columns() {
                return Err(FrameError::incompatible(format!(
                    "expected {} columns, found {}",
                    out.num_columns(),
                    next.num_columns()
                )));
            }

            let mut next_columns = next.columns;
            for target in out.columns.iter_mut() {
                let pos = next_columns
                    .iter()
                    .position(|c| c.name == target.name)
                    .ok_or_else(|| {
                        FrameError::incompatible(format!("column `{}` missing", target.name))
                    })?;
                let source = next_columns.swap_remove(pos);
                let expected = target.dtype();
                target.data.append(source.data).map_err(|found| {
                    FrameError::type_mismatch(&target.name, expected, found.dtype())
                })?;
            }
            out.rows += next.rows;
        }

        Ok(out)
    }

    /// Project this frame onto `schema`.
    ///
    /// Columns are selected by name in schema order (extra columns are
    /// dropped); types must match, except that `long` widens to `double`.
    pub fn conform(&self, schema: &Schema) -> FrameResult<Frame> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                let column = self.require(&field.name)?;
                let data = column.data.cast(field.dtype).ok_or_else(|| {
                    FrameError::type_mismatch(&field.name, field.dtype, column.dtype())
                })?;
                Ok(Column::new(field.name.clone(), data))
            })
            .collect::<FrameResult<Vec<_>>>()?;

        Ok(Frame {
            columns,
            rows: self.rows,
        })
    }
}

impl TryFrom<Vec<Column>> for Frame {
    type Error = FrameError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Frame::new(columns)
    }
}

impl From<Frame> for Vec<Column> {
    fn from(frame: Frame) -> Self {
        frame.columns
    }
}
