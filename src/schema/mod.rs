//! Structural schema model.
//!
//! A [`StructType`] describes column names, types and nesting independently of
//! any data source. It uses the JSON encoding understood by Spark-compatible
//! streaming engines:
//!
//! ```json
//! {"type":"struct","fields":[{"name":"id","type":"long","nullable":false,"metadata":{}}]}
//! ```

mod arrow;
pub mod resolve;

pub use resolve::{SchemaSpec, resolve_schema};

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::de::value::MapAccessDeserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Type name of a struct schema.
const STRUCT_TYPE: &str = "struct";

/// Default decimal precision when none is given (`decimal` alone).
const DEFAULT_DECIMAL_PRECISION: u8 = 10;

/// Largest precision a decimal column can hold.
const MAX_DECIMAL_PRECISION: u8 = 38;

/// A struct schema: an ordered list of named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStructType", into = "RawStructType")]
pub struct StructType {
    pub fields: Vec<StructField>,
}

impl StructType {
    pub fn new(fields: Vec<StructField>) -> Self {
        Self { fields }
    }

    /// Parse a schema from its JSON encoding.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the schema to its JSON encoding.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Wire form of a struct schema, carrying the `type` discriminator.
#[derive(Serialize, Deserialize)]
struct RawStructType {
    #[serde(rename = "type", default = "default_struct_type")]
    kind: String,
    fields: Vec<StructField>,
}

fn default_struct_type() -> String {
    STRUCT_TYPE.to_string()
}

impl TryFrom<RawStructType> for StructType {
    type Error = String;

    fn try_from(raw: RawStructType) -> Result<Self, Self::Error> {
        if raw.kind != STRUCT_TYPE {
            return Err(format!(
                "expected schema of type '{STRUCT_TYPE}', found '{}'",
                raw.kind
            ));
        }
        Ok(Self { fields: raw.fields })
    }
}

impl From<StructType> for RawStructType {
    fn from(schema: StructType) -> Self {
        Self {
            kind: default_struct_type(),
            fields: schema.fields,
        }
    }
}

/// A single named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl StructField {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

fn default_true() -> bool {
    true
}

/// Column data types.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    String,
    Binary,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Date,
    /// Timestamp with session time zone.
    Timestamp,
    /// Timestamp without time zone.
    TimestampNtz,
    Null,
    Decimal {
        precision: u8,
        scale: i8,
    },
    Array {
        element_type: Box<DataType>,
        contains_null: bool,
    },
    Map {
        key_type: Box<DataType>,
        value_type: Box<DataType>,
        value_contains_null: bool,
    },
    Struct(StructType),
}

impl DataType {
    pub fn array(element_type: DataType, contains_null: bool) -> Self {
        DataType::Array {
            element_type: Box::new(element_type),
            contains_null,
        }
    }

    pub fn map(key_type: DataType, value_type: DataType, value_contains_null: bool) -> Self {
        DataType::Map {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
            value_contains_null,
        }
    }

    /// Name of a primitive type, `None` for parameterized or nested types.
    fn primitive_name(&self) -> Option<&'static str> {
        let name = match self {
            DataType::String => "string",
            DataType::Binary => "binary",
            DataType::Boolean => "boolean",
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::TimestampNtz => "timestamp_ntz",
            DataType::Null => "void",
            _ => return None,
        };
        Some(name)
    }

    /// Parse a type given by name, such as `long` or `decimal(10,2)`.
    fn from_name(name: &str) -> Result<Self, String> {
        let data_type = match name {
            "string" => DataType::String,
            "binary" => DataType::Binary,
            "boolean" => DataType::Boolean,
            "byte" => DataType::Byte,
            "short" => DataType::Short,
            "integer" => DataType::Integer,
            "long" => DataType::Long,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "date" => DataType::Date,
            "timestamp" => DataType::Timestamp,
            "timestamp_ntz" => DataType::TimestampNtz,
            "null" | "void" => DataType::Null,
            "decimal" => DataType::Decimal {
                precision: DEFAULT_DECIMAL_PRECISION,
                scale: 0,
            },
            other => return parse_decimal(other),
        };
        Ok(data_type)
    }
}

/// Parse `decimal(precision,scale)`.
fn parse_decimal(name: &str) -> Result<DataType, String> {
    let invalid = || format!("unsupported data type '{name}'");

    let args = name
        .strip_prefix("decimal(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (precision, scale) = args.split_once(',').ok_or_else(invalid)?;
    let precision: u8 = precision.trim().parse().map_err(|_| invalid())?;
    let scale: i8 = scale.trim().parse().map_err(|_| invalid())?;

    if !(1..=MAX_DECIMAL_PRECISION).contains(&precision)
        || scale < 0
        || scale as u8 > precision
    {
        return Err(invalid());
    }

    Ok(DataType::Decimal { precision, scale })
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            DataType::Array { element_type, .. } => write!(f, "array<{element_type}>"),
            DataType::Map {
                key_type,
                value_type,
                ..
            } => write!(f, "map<{key_type},{value_type}>"),
            DataType::Struct(schema) => {
                write!(f, "struct<")?;
                for (i, field) in schema.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", field.name, field.data_type)?;
                }
                write!(f, ">")
            }
            primitive => f.write_str(primitive.primitive_name().unwrap_or_default()),
        }
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DataType::Decimal { .. } => serializer.collect_str(self),
            DataType::Array {
                element_type,
                contains_null,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("elementType", element_type)?;
                map.serialize_entry("containsNull", contains_null)?;
                map.end()
            }
            DataType::Map {
                key_type,
                value_type,
                value_contains_null,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("keyType", key_type)?;
                map.serialize_entry("valueType", value_type)?;
                map.serialize_entry("valueContainsNull", value_contains_null)?;
                map.end()
            }
            DataType::Struct(schema) => schema.serialize(serializer),
            primitive => serializer.serialize_str(primitive.primitive_name().unwrap_or_default()),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NestedType {
    Struct {
        fields: Vec<StructField>,
    },
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<DataType>,
        #[serde(rename = "containsNull", default = "default_true")]
        contains_null: bool,
    },
    Map {
        #[serde(rename = "keyType")]
        key_type: Box<DataType>,
        #[serde(rename = "valueType")]
        value_type: Box<DataType>,
        #[serde(rename = "valueContainsNull", default = "default_true")]
        value_contains_null: bool,
    },
}

impl From<NestedType> for DataType {
    fn from(nested: NestedType) -> Self {
        match nested {
            NestedType::Struct { fields } => DataType::Struct(StructType { fields }),
            NestedType::Array {
                element_type,
                contains_null,
            } => DataType::Array {
                element_type,
                contains_null,
            },
            NestedType::Map {
                key_type,
                value_type,
                value_contains_null,
            } => DataType::Map {
                key_type,
                value_type,
                value_contains_null,
            },
        }
    }
}

/// A data type on the wire is either a bare name or a tagged nested object.
struct DataTypeVisitor;

impl<'de> Visitor<'de> for DataTypeVisitor {
    type Value = DataType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a type name or a nested type object")
    }

    fn visit_str<E: de::Error>(self, name: &str) -> Result<DataType, E> {
        DataType::from_name(name).map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<DataType, A::Error> {
        NestedType::deserialize(MapAccessDeserializer::new(map)).map(DataType::from)
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DataTypeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_SCHEMA: &str = r#"{
        "type": "struct",
        "fields": [
            {"name": "id", "type": "long", "nullable": false, "metadata": {}},
            {"name": "amount", "type": "decimal(12,2)", "nullable": true, "metadata": {"comment": "EUR"}},
            {"name": "tags", "type": {"type": "array", "elementType": "string", "containsNull": true}, "nullable": true, "metadata": {}},
            {"name": "attrs", "type": {"type": "map", "keyType": "string", "valueType": "integer", "valueContainsNull": false}, "nullable": true, "metadata": {}},
            {"name": "meta", "type": {"type": "struct", "fields": [
                {"name": "created_at", "type": "timestamp", "nullable": true, "metadata": {}}
            ]}, "nullable": true, "metadata": {}}
        ]
    }"#;

    #[test]
    fn test_empty_struct() {
        let schema = StructType::from_json(r#"{"fields":[],"type":"struct"}"#).unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema, StructType::default());
    }

    #[test]
    fn test_nested_schema() {
        let schema = StructType::from_json(NESTED_SCHEMA).unwrap();

        assert_eq!(
            schema.field_names(),
            vec!["id", "amount", "tags", "attrs", "meta"]
        );
        assert_eq!(schema.field("id").unwrap().data_type, DataType::Long);
        assert!(!schema.field("id").unwrap().nullable);
        assert_eq!(
            schema.field("amount").unwrap().data_type,
            DataType::Decimal {
                precision: 12,
                scale: 2
            }
        );
        assert_eq!(
            schema.field("amount").unwrap().metadata.get("comment"),
            Some(&Value::String("EUR".to_string()))
        );
        assert_eq!(
            schema.field("tags").unwrap().data_type,
            DataType::array(DataType::String, true)
        );
        assert_eq!(
            schema.field("attrs").unwrap().data_type,
            DataType::map(DataType::String, DataType::Integer, false)
        );
        match &schema.field("meta").unwrap().data_type {
            DataType::Struct(inner) => {
                assert_eq!(inner.fields[0].data_type, DataType::Timestamp);
            }
            other => panic!("Expected Struct type, got {other:?}"),
        }
    }

    #[test]
    fn test_json_round_trip_preserves_schema() {
        let schema = StructType::from_json(NESTED_SCHEMA).unwrap();
        let reparsed = StructType::from_json(&schema.to_json().unwrap()).unwrap();
        assert_eq!(schema, reparsed);
    }

    #[test]
    fn test_field_defaults() {
        let schema =
            StructType::from_json(r#"{"type":"struct","fields":[{"name":"v","type":"string"}]}"#)
                .unwrap();
        let field = &schema.fields[0];
        assert!(field.nullable);
        assert!(field.metadata.is_empty());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = StructType::from_json(
            r#"{"type":"struct","fields":[{"name":"v","type":"uuid","nullable":true,"metadata":{}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("uuid"), "{err}");
    }

    fn decimal_field(type_name: &str) -> Result<StructType, serde_json::Error> {
        StructType::from_json(&format!(
            r#"{{"type":"struct","fields":[{{"name":"v","type":"{type_name}"}}]}}"#
        ))
    }

    #[test]
    fn test_decimal_bounds() {
        assert_eq!(
            decimal_field("decimal(38,38)").unwrap().fields[0].data_type,
            DataType::Decimal {
                precision: 38,
                scale: 38
            }
        );
        assert_eq!(
            decimal_field("decimal").unwrap().fields[0].data_type,
            DataType::Decimal {
                precision: DEFAULT_DECIMAL_PRECISION,
                scale: 0
            }
        );

        for name in [
            "decimal(50,2)",
            "decimal(2,5)",
            "decimal(10,-2)",
            "decimal(0,0)",
        ] {
            let err = decimal_field(name).unwrap_err();
            assert!(
                err.to_string().contains("unsupported data type"),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_nested_type_error_not_masked() {
        let err = StructType::from_json(
            r#"{"type":"struct","fields":[{"name":"tags","type":{"type":"array","elementType":"uuid"}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("uuid"), "{err}");
    }

    #[test]
    fn test_non_struct_top_level_rejected() {
        let err = StructType::from_json(r#"{"type":"array","fields":[]}"#).unwrap_err();
        assert!(err.to_string().contains("struct"), "{err}");
    }

    #[test]
    fn test_display() {
        let schema = StructType::from_json(NESTED_SCHEMA).unwrap();
        assert_eq!(
            DataType::Struct(schema).to_string(),
            "struct<id:long,amount:decimal(12,2),tags:array<string>,attrs:map<string,integer>,meta:struct<created_at:timestamp>>"
        );
    }
}
