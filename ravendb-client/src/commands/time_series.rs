//! Time-series operations.

use chrono::{DateTime, Utc};
use ravendb_core::{RavenError, Result};
use serde_json::{json, Map, Value};

use super::{require_non_blank, CommandType, SerializeCommand, FIELD_ID, FIELD_TYPE};
use crate::conventions::SerializationConventions;

/// Separates a raw series name from its rollup policy (`"HeartRate@ByHour"`).
pub const TIME_SERIES_ROLLUP_SEPARATOR: char = '@';

/// Date format of time-series timestamps on the wire, without the fraction.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Seven fractional digits (100ns ticks); chrono has no `%.7f`.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{}.{:07}Z",
        timestamp.format(TIMESTAMP_FORMAT),
        timestamp.timestamp_subsec_nanos() / 100
    )
}

/// Appends one entry to a series.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesAppend {
    timestamp: DateTime<Utc>,
    values: Vec<f64>,
    tag: Option<String>,
}

impl TimeSeriesAppend {
    /// Creates an append of `values` at `timestamp`.
    pub fn new(timestamp: DateTime<Utc>, values: Vec<f64>) -> Self {
        Self {
            timestamp,
            values,
            tag: None,
        }
    }

    /// Tags the entry (usually with the id of the document that produced it).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    // [epoch-millis, value-count, values..., tag?]
    fn to_json(&self) -> Value {
        let mut entry = Vec::with_capacity(self.values.len() + 3);
        entry.push(json!(self.timestamp.timestamp_millis()));
        entry.push(json!(self.values.len()));
        entry.extend(self.values.iter().map(|v| json!(v)));
        if let Some(tag) = &self.tag {
            entry.push(Value::String(tag.clone()));
        }
        Value::Array(entry)
    }
}

/// Deletes the entries of a series within a range. Open ends delete to the
/// start or end of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSeriesDelete {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl TimeSeriesDelete {
    /// Creates a range delete.
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    fn to_json(&self) -> Value {
        json!({
            "From": self.from.as_ref().map(format_timestamp),
            "To": self.to.as_ref().map(format_timestamp),
        })
    }
}

/// Appends and deletes on one series of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBatchCommandData {
    id: String,
    name: String,
    appends: Vec<TimeSeriesAppend>,
    deletes: Vec<TimeSeriesDelete>,
}

impl TimeSeriesBatchCommandData {
    /// Creates operations on series `name` of document `id`.
    ///
    /// Rollup series (names containing `@`) are maintained by the server and
    /// cannot be appended to.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        appends: Vec<TimeSeriesAppend>,
        deletes: Vec<TimeSeriesDelete>,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into();
        require_non_blank(&id, "Document id")?;
        require_non_blank(&name, "Time series name")?;
        if !appends.is_empty() && name.contains(TIME_SERIES_ROLLUP_SEPARATOR) {
            return Err(RavenError::IllegalArgument(format!(
                "Time series '{name}' is a rollup and cannot be appended to"
            )));
        }
        if let Some(append) = appends
            .iter()
            .find(|a| a.values.iter().any(|v| !v.is_finite()))
        {
            return Err(RavenError::IllegalArgument(format!(
                "Time series '{name}' append at {} has a non-finite value",
                append.timestamp.timestamp_millis()
            )));
        }
        Ok(Self {
            id,
            name,
            appends,
            deletes,
        })
    }

    /// Returns the document id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the series name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SerializeCommand for TimeSeriesBatchCommandData {
    fn serialize(
        &self,
        _conventions: &dyn SerializationConventions,
    ) -> Result<Map<String, Value>> {
        let mut series = Map::new();
        series.insert("Name".into(), Value::String(self.name.clone()));
        if !self.appends.is_empty() {
            series.insert(
                "Appends".into(),
                Value::Array(self.appends.iter().map(TimeSeriesAppend::to_json).collect()),
            );
        }
        if !self.deletes.is_empty() {
            series.insert(
                "Deletes".into(),
                Value::Array(self.deletes.iter().map(TimeSeriesDelete::to_json).collect()),
            );
        }

        let mut fragment = Map::new();
        fragment.insert(FIELD_ID.into(), Value::String(self.id.clone()));
        fragment.insert("TimeSeries".into(), Value::Object(series));
        fragment.insert(FIELD_TYPE.into(), json!(CommandType::TimeSeries.as_str()));
        Ok(fragment)
    }
}
