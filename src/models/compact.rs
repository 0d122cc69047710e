use chrono::NaiveDateTime;
use half::f16;
use serde::{Deserialize, Serialize};

/// Physical storage widths available to the compactor, narrowest first within each family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericWidth {
    Int8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
}

impl NumericWidth {
    pub const INTEGER_WIDTHS: [NumericWidth; 4] = [
        NumericWidth::Int8,
        NumericWidth::Int16,
        NumericWidth::Int32,
        NumericWidth::Int64,
    ];

    pub const FLOAT_WIDTHS: [NumericWidth; 3] = [
        NumericWidth::Float16,
        NumericWidth::Float32,
        NumericWidth::Float64,
    ];

    pub fn bytes(&self) -> usize {
        match self {
            NumericWidth::Int8 => 1,
            NumericWidth::Int16 | NumericWidth::Float16 => 2,
            NumericWidth::Int32 | NumericWidth::Float32 => 4,
            NumericWidth::Int64 | NumericWidth::Float64 => 8,
        }
    }

    /// Representable value range, as f64 bounds
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            NumericWidth::Int8 => (i8::MIN as f64, i8::MAX as f64),
            NumericWidth::Int16 => (i16::MIN as f64, i16::MAX as f64),
            NumericWidth::Int32 => (i32::MIN as f64, i32::MAX as f64),
            NumericWidth::Int64 => (i64::MIN as f64, i64::MAX as f64),
            NumericWidth::Float16 => (f16::MIN.to_f64(), f16::MAX.to_f64()),
            NumericWidth::Float32 => (f32::MIN as f64, f32::MAX as f64),
            NumericWidth::Float64 => (f64::MIN, f64::MAX),
        }
    }

    pub fn is_integer(&self) -> bool {
        Self::INTEGER_WIDTHS.contains(self)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NumericWidth::Int8 => "int8",
            NumericWidth::Int16 => "int16",
            NumericWidth::Int32 => "int32",
            NumericWidth::Int64 => "int64",
            NumericWidth::Float16 => "float16",
            NumericWidth::Float32 => "float32",
            NumericWidth::Float64 => "float64",
        }
    }
}

impl std::fmt::Display for NumericWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.type_name())
    }
}

/// Column storage after compaction. Missing floats are NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Timestamp(Vec<NaiveDateTime>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int8(v) => v.len(),
            ColumnData::Int16(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float16(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// None for the timestamp column
    pub fn width(&self) -> Option<NumericWidth> {
        match self {
            ColumnData::Int8(_) => Some(NumericWidth::Int8),
            ColumnData::Int16(_) => Some(NumericWidth::Int16),
            ColumnData::Int32(_) => Some(NumericWidth::Int32),
            ColumnData::Int64(_) => Some(NumericWidth::Int64),
            ColumnData::Float16(_) => Some(NumericWidth::Float16),
            ColumnData::Float32(_) => Some(NumericWidth::Float32),
            ColumnData::Float64(_) => Some(NumericWidth::Float64),
            ColumnData::Timestamp(_) => None,
        }
    }

    pub fn memory_footprint(&self) -> usize {
        // NaiveDateTime is held as a 64-bit instant, same as the loaded table
        let row_bytes = self.width().map_or(8, |w| w.bytes());
        self.len() * row_bytes
    }

    /// Integer values widened back to i64; None for float and timestamp columns
    pub fn decode_integers(&self) -> Option<Vec<i64>> {
        match self {
            ColumnData::Int8(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int16(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int32(v) => Some(v.iter().map(|&x| x as i64).collect()),
            ColumnData::Int64(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Numeric values widened to f64 with NaN mapped to None
    pub fn decode_floats(&self) -> Option<Vec<Option<f64>>> {
        fn present(x: f64) -> Option<f64> {
            (!x.is_nan()).then_some(x)
        }

        match self {
            ColumnData::Float16(v) => Some(v.iter().map(|x| present(x.to_f64())).collect()),
            ColumnData::Float32(v) => Some(v.iter().map(|&x| present(x as f64)).collect()),
            ColumnData::Float64(v) => Some(v.iter().map(|&x| present(x)).collect()),
            ColumnData::Timestamp(_) => None,
            integers => integers
                .decode_integers()
                .map(|v| v.into_iter().map(|x| Some(x as f64)).collect()),
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Float16(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnData::Float32(v) => v.iter().filter(|x| x.is_nan()).count(),
            ColumnData::Float64(v) => v.iter().filter(|x| x.is_nan()).count(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompactColumn {
    pub name: String,
    pub data: ColumnData,
}

impl CompactColumn {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Column-oriented weather table holding narrowed numeric columns
#[derive(Debug, Clone, PartialEq)]
pub struct CompactTable {
    pub name: String,
    pub columns: Vec<CompactColumn>,
}

impl CompactTable {
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn column(&self, name: &str) -> Option<&CompactColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn memory_footprint(&self) -> usize {
        self.columns.iter().map(|c| c.data.memory_footprint()).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.data.missing_count()).sum()
    }

    pub fn timestamps(&self) -> Option<&[NaiveDateTime]> {
        self.columns.iter().find_map(|c| match &c.data {
            ColumnData::Timestamp(v) => Some(v.as_slice()),
            _ => None,
        })
    }
}
