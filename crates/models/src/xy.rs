//! XY chart models and their normalizers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tsp_serialization::{
    array, assert_number, to_big_int, Normalizer, Path, Schema, ValidationError,
};

/// Description of an axis for an XY chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XyAxis {
    /// Label of the axis.
    pub label: String,
    /// Units used for the axis, appended to the numbers.
    pub unit: String,
    /// Type of data for this axis, a hint for number formatting.
    pub data_type: String,
}

/// One XY series and its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XySeries {
    /// Name of the series.
    pub series_name: String,
    /// Id of the series. A plain wire number; the normalizer only asserts
    /// numeric, it never narrows.
    pub series_id: f64,
    /// Description of the X axis.
    pub x_axis: XyAxis,
    /// Description of the Y axis.
    pub y_axis: XyAxis,
    /// Series' X values. 64-bit on the wire (strings or numbers), exact
    /// integers after normalization.
    pub x_values: Vec<i64>,
    /// Series' Y values.
    pub y_values: Vec<f64>,
    /// Tags for each XY value, set when a value passes a filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<f64>>,
}

/// Model of an XY chart, contains at least one XY series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XyModel {
    /// Title of the model.
    pub title: String,
    /// Whether all the Y values share the same X axis.
    pub common_x_axis: bool,
    /// XY series of the chart.
    pub series: Vec<XySeries>,
}

/// Normalizer for one XY series: asserts ids and Y values are numeric and
/// converts X values to exact 64-bit integers. `tags` is optional and stays
/// absent when the payload omits it.
pub fn xy_series_normalizer() -> Normalizer {
    Normalizer::new(
        Schema::new()
            .field("seriesId", assert_number())
            .field("xValues", array(to_big_int()))
            .field("yValues", array(assert_number()))
            .field("tags", array(assert_number())),
    )
}

/// Normalizer for a whole XY chart model; each element of `series` is
/// normalized recursively through the series normalizer.
pub fn xy_model_normalizer() -> Normalizer {
    Normalizer::new(Schema::new().field("series", array(xy_series_normalizer().coercer())))
}

impl XySeries {
    /// Normalizes a raw payload and reads it as a typed series.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let normalized = xy_series_normalizer().normalize(raw)?;
        serde_json::from_value(normalized)
            .map_err(|err| ValidationError::decode(&Path::root(), "XY series object", err))
    }
}

impl XyModel {
    /// Normalizes a raw payload and reads it as a typed chart model.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let normalized = xy_model_normalizer().normalize(raw)?;
        serde_json::from_value(normalized)
            .map_err(|err| ValidationError::decode(&Path::root(), "XY model object", err))
    }
}
