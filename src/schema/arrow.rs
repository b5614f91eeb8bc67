//! Conversion of structural schemas to Arrow schemas.
//!
//! Timestamps are mapped to microsecond precision, which is what Spark
//! compatible engines store.

use std::collections::HashMap;
use std::sync::Arc;

use arrow_schema::{DataType as ArrowType, Field, Fields, Schema, SchemaRef, TimeUnit};
use serde_json::Value;

use super::{DataType, StructField, StructType};

/// Name of the list item field.
const LIST_ITEM: &str = "element";
/// Name of the map entries struct.
const MAP_ENTRIES: &str = "entries";

impl StructType {
    /// Convert to an Arrow schema.
    pub fn to_arrow_schema(&self) -> SchemaRef {
        Arc::new(Schema::new(to_arrow_fields(&self.fields)))
    }
}

impl StructField {
    /// Convert to an Arrow field. Metadata values that are not strings are
    /// stored as their JSON text.
    pub fn to_arrow_field(&self) -> Field {
        let metadata: HashMap<String, String> = self
            .metadata
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect();

        Field::new(&self.name, self.data_type.to_arrow_type(), self.nullable).with_metadata(metadata)
    }
}

impl DataType {
    /// Convert to the equivalent Arrow data type.
    pub fn to_arrow_type(&self) -> ArrowType {
        match self {
            DataType::String => ArrowType::Utf8,
            DataType::Binary => ArrowType::Binary,
            DataType::Boolean => ArrowType::Boolean,
            DataType::Byte => ArrowType::Int8,
            DataType::Short => ArrowType::Int16,
            DataType::Integer => ArrowType::Int32,
            DataType::Long => ArrowType::Int64,
            DataType::Float => ArrowType::Float32,
            DataType::Double => ArrowType::Float64,
            DataType::Date => ArrowType::Date32,
            DataType::Timestamp => ArrowType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            DataType::TimestampNtz => ArrowType::Timestamp(TimeUnit::Microsecond, None),
            DataType::Null => ArrowType::Null,
            DataType::Decimal { precision, scale } => ArrowType::Decimal128(*precision, *scale),
            DataType::Array {
                element_type,
                contains_null,
            } => ArrowType::List(Arc::new(Field::new(
                LIST_ITEM,
                element_type.to_arrow_type(),
                *contains_null,
            ))),
            DataType::Map {
                key_type,
                value_type,
                value_contains_null,
            } => {
                let entries: Fields = vec![
                    Field::new("key", key_type.to_arrow_type(), false),
                    Field::new("value", value_type.to_arrow_type(), *value_contains_null),
                ]
                .into();
                ArrowType::Map(
                    Arc::new(Field::new(MAP_ENTRIES, ArrowType::Struct(entries), false)),
                    false,
                )
            }
            DataType::Struct(schema) => ArrowType::Struct(to_arrow_fields(&schema.fields).into()),
        }
    }
}

fn to_arrow_fields(fields: &[StructField]) -> Vec<Field> {
    fields.iter().map(StructField::to_arrow_field).collect()
}
