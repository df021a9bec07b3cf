//! Column schemas and the forecast output schema builder.
//!
//! A schema is an ordered list of `(name, type)` pairs. Order is part of the
//! contract: consumers bind output columns by position as well as by name.
//! Schemas render to (and parse from) the compact expression form
//! `unique_id:string,ds:datetime,TimeGPT:double`.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::params::Level;

/// Name of the point-forecast column.
pub const POINT_FORECAST_COL: &str = "TimeGPT";

/// Logical column type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Datetime,
    Double,
    Long,
    Bool,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Datetime => "datetime",
            DataType::Double => "double",
            DataType::Long => "long",
            DataType::Bool => "bool",
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(DataType::String),
            "datetime" => Ok(DataType::Datetime),
            "double" | "float64" => Ok(DataType::Double),
            "long" | "int64" => Ok(DataType::Long),
            "bool" | "boolean" => Ok(DataType::Bool),
            other => Err(FrameError::invalid_schema(format!("unknown type `{other}`"))),
        }
    }
}

/// A named, typed column slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Ordered column schema.
///
/// Names are not required to be unique (see [`forecast_schema`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// First field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

impl core::fmt::Display for Schema {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.name, field.dtype)?;
        }
        Ok(())
    }
}

impl FromStr for Schema {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Schema::default());
        }

        let fields = s
            .split(',')
            .map(|part| {
                let (name, dtype) = part
                    .rsplit_once(':')
                    .ok_or_else(|| FrameError::invalid_schema(format!("missing type in `{part}`")))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(FrameError::invalid_schema(format!("missing name in `{part}`")));
                }
                Ok(Field::new(name, dtype.trim().parse()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Schema::new(fields))
    }
}

/// Build the output schema of a forecast from its runtime parameters.
///
/// Layout: `{id_col}:string`, `{time_col}:datetime`, `TimeGPT:double`, then
/// for non-empty `levels` one `TimeGPT-lo-{level}` column per level in
/// descending order followed by one `TimeGPT-hi-{level}` column per level in
/// ascending order.
///
/// Duplicate levels are kept and produce duplicate column names.
pub fn forecast_schema(id_col: &str, time_col: &str, levels: Option<&[Level]>) -> Schema {
    let mut fields = vec![
        Field::new(id_col, DataType::String),
        Field::new(time_col, DataType::Datetime),
        Field::new(POINT_FORECAST_COL, DataType::Double),
    ];

    if let Some(levels) = levels.filter(|l| !l.is_empty()) {
        let mut sorted = levels.to_vec();
        sorted.sort_by(Level::total_cmp);

        fields.extend(
            sorted
                .iter()
                .rev()
                .map(|lv| Field::new(format!("{POINT_FORECAST_COL}-lo-{lv}"), DataType::Double)),
        );
        fields.extend(
            sorted
                .iter()
                .map(|lv| Field::new(format!("{POINT_FORECAST_COL}-hi-{lv}"), DataType::Double)),
        );
    }

    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels(values: &[i64]) -> Vec<Level> {
        values.iter().copied().map(Level::Int).collect()
    }

    #[test]
    fn base_schema_without_levels() {
        let schema = forecast_schema("unique_id", "ds", None);
        assert_eq!(schema.to_string(), "unique_id:string,ds:datetime,TimeGPT:double");
    }

    #[test]
    fn empty_levels_behave_like_none() {
        let schema = forecast_schema("unique_id", "ds", Some(&[]));
        assert_eq!(schema, forecast_schema("unique_id", "ds", None));
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn interval_columns_are_ordered_around_the_point_forecast() {
        let schema = forecast_schema("id", "ds", Some(&levels(&[95, 80])));
        assert_eq!(
            schema.to_string(),
            "id:string,ds:datetime,TimeGPT:double,\
             TimeGPT-lo-95:double,TimeGPT-lo-80:double,\
             TimeGPT-hi-80:double,TimeGPT-hi-95:double"
        );
    }

    #[test]
    fn duplicate_levels_produce_duplicate_columns() {
        let schema = forecast_schema("id", "ds", Some(&levels(&[80, 80])));
        assert_eq!(
            schema.names(),
            vec![
                "id",
                "ds",
                "TimeGPT",
                "TimeGPT-lo-80",
                "TimeGPT-lo-80",
                "TimeGPT-hi-80",
                "TimeGPT-hi-80",
            ]
        );
    }

    #[test]
    fn mixed_int_and_float_levels_sort_numerically() {
        let schema = forecast_schema("id", "ds", Some(&[Level::Float(97.5), Level::Int(90)]));
        assert_eq!(
            &schema.names()[3..],
            &["TimeGPT-lo-97.5", "TimeGPT-lo-90", "TimeGPT-hi-90", "TimeGPT-hi-97.5"]
        );
    }

    #[test]
    fn custom_column_names_are_respected() {
        let schema = forecast_schema("store", "timestamp", None);
        assert_eq!(schema.fields()[0], Field::new("store", DataType::String));
        assert_eq!(schema.fields()[1], Field::new("timestamp", DataType::Datetime));
    }

    #[test]
    fn schema_expression_parses_back() {
        let schema = forecast_schema("id", "ds", Some(&levels(&[50, 90])));
        let parsed: Schema = schema.to_string().parse().unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn schema_expression_rejects_unknown_types() {
        let err = "a:string,b:decimal".parse::<Schema>().unwrap_err();
        assert!(matches!(err, FrameError::InvalidSchema(msg) if msg.contains("decimal")));
    }

    #[test]
    fn schema_expression_rejects_missing_type() {
        assert!("a:string,b".parse::<Schema>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: lower bounds descend and upper bounds ascend, and the
        /// schema holds exactly 3 + 2 * |levels| columns.
        #[test]
        fn interval_layout_holds_for_any_level_set(
            raw in prop::collection::vec(1i64..100i64, 1..8)
        ) {
            let input = levels(&raw);
            let schema = forecast_schema("unique_id", "ds", Some(&input));
            prop_assert_eq!(schema.len(), 3 + 2 * raw.len());

            let mut sorted = raw.clone();
            sorted.sort();
            let n = raw.len();
            let names = schema.names();

            for (i, lv) in sorted.iter().rev().enumerate() {
                prop_assert_eq!(names[3 + i], format!("TimeGPT-lo-{lv}"));
            }
            for (i, lv) in sorted.iter().enumerate() {
                prop_assert_eq!(names[3 + n + i], format!("TimeGPT-hi-{lv}"));
            }
            prop_assert!(schema.fields()[2..].iter().all(|f| f.dtype == DataType::Double));
        }
    }
}
