//! Resolution of the configured schema into a structured schema.
//!
//! A schema is either given inline, loaded from a JSON file, or left out so
//! that the streaming engine infers it and persists it at the schema location.

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::StructType;
use crate::error::{
    ReadSchemaFileSnafu, SchemaDeserializeSnafu, SchemaError, SchemaFileNotFoundSnafu,
};
use crate::emit;
use crate::metrics::events::{SchemaResolved, SchemaSource};
use crate::storage::SchemaFileSystem;

/// A configured schema.
///
/// In YAML a mapping is an inline schema and a string is a file path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaSpec {
    /// Explicit structured schema.
    Struct(StructType),
    /// Path to a JSON-encoded structured schema.
    Path(PathBuf),
}

struct SchemaSpecVisitor;

impl<'de> Visitor<'de> for SchemaSpecVisitor {
    type Value = SchemaSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a schema file path or an inline struct schema")
    }

    fn visit_str<E: de::Error>(self, path: &str) -> Result<SchemaSpec, E> {
        Ok(SchemaSpec::Path(PathBuf::from(path)))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<SchemaSpec, A::Error> {
        StructType::deserialize(MapAccessDeserializer::new(map)).map(SchemaSpec::Struct)
    }
}

impl<'de> Deserialize<'de> for SchemaSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SchemaSpecVisitor)
    }
}

impl From<StructType> for SchemaSpec {
    fn from(schema: StructType) -> Self {
        SchemaSpec::Struct(schema)
    }
}

impl From<PathBuf> for SchemaSpec {
    fn from(path: PathBuf) -> Self {
        SchemaSpec::Path(path)
    }
}

impl From<&Path> for SchemaSpec {
    fn from(path: &Path) -> Self {
        SchemaSpec::Path(path.to_path_buf())
    }
}

impl From<&str> for SchemaSpec {
    fn from(path: &str) -> Self {
        SchemaSpec::Path(PathBuf::from(path))
    }
}

/// Resolve a schema descriptor into a structured schema.
///
/// Returns `None` when no schema is configured, without touching the
/// filesystem. An empty path counts as no schema. A path that does not exist
/// fails with [`SchemaError::SchemaFileNotFound`]; a file that is not a valid
/// structured schema fails with [`SchemaError::SchemaDeserialize`].
pub fn resolve_schema(
    spec: Option<&SchemaSpec>,
    fs: &dyn SchemaFileSystem,
) -> Result<Option<StructType>, SchemaError> {
    let resolved = match spec {
        Some(SchemaSpec::Struct(schema)) => {
            emit!(SchemaResolved {
                source: SchemaSource::Explicit,
            });
            Some(schema.clone())
        }
        Some(SchemaSpec::Path(path)) if !path.as_os_str().is_empty() => {
            let schema = load_schema_file(path, fs)?;
            emit!(SchemaResolved {
                source: SchemaSource::File,
            });
            Some(schema)
        }
        Some(SchemaSpec::Path(_)) | None => {
            emit!(SchemaResolved {
                source: SchemaSource::Inferred,
            });
            None
        }
    };

    Ok(resolved)
}

fn load_schema_file(path: &Path, fs: &dyn SchemaFileSystem) -> Result<StructType, SchemaError> {
    ensure!(fs.exists(path), SchemaFileNotFoundSnafu { path });

    let text = fs
        .read_to_string(path)
        .context(ReadSchemaFileSnafu { path })?;
    let schema = StructType::from_json(&text).context(SchemaDeserializeSnafu { path })?;

    debug!(
        "Loaded schema with {} fields from {}",
        schema.fields.len(),
        path.display()
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, StructField};
    use crate::storage::LocalFileSystem;
    use std::cell::Cell;
    use std::io::{self, Write};

    /// Filesystem that records every access.
    #[derive(Default)]
    struct CountingFs {
        calls: Cell<usize>,
    }

    impl SchemaFileSystem for CountingFs {
        fn exists(&self, _path: &Path) -> bool {
            self.calls.set(self.calls.get() + 1);
            false
        }

        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            self.calls.set(self.calls.get() + 1);
            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn schema_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_absent_schema_skips_filesystem() {
        let fs = CountingFs::default();
        let resolved = resolve_schema(None, &fs).unwrap();
        assert!(resolved.is_none());
        assert_eq!(fs.calls.get(), 0);
    }

    #[test]
    fn test_empty_path_is_absent() {
        let fs = CountingFs::default();
        let spec = SchemaSpec::from("");
        assert!(resolve_schema(Some(&spec), &fs).unwrap().is_none());
        assert_eq!(fs.calls.get(), 0);
    }

    #[test]
    fn test_explicit_schema_returned_unchanged() {
        let schema = StructType::new(vec![StructField::new("id", DataType::Long, false)]);
        let fs = CountingFs::default();

        let resolved = resolve_schema(Some(&schema.clone().into()), &fs).unwrap();

        assert_eq!(resolved, Some(schema));
        assert_eq!(fs.calls.get(), 0);
    }

    #[test]
    fn test_schema_file_matches_direct_deserialization() {
        let json = r#"{"type":"struct","fields":[{"name":"id","type":"long","nullable":false,"metadata":{}},{"name":"payload","type":"string","nullable":true,"metadata":{}}]}"#;
        let file = schema_file(json);

        let resolved = resolve_schema(Some(&file.path().into()), &LocalFileSystem).unwrap();

        assert_eq!(resolved, Some(StructType::from_json(json).unwrap()));
    }

    #[test]
    fn test_empty_struct_schema_file() {
        let file = schema_file(r#"{"fields":[],"type":"struct"}"#);

        let resolved = resolve_schema(Some(&file.path().into()), &LocalFileSystem)
            .unwrap()
            .unwrap();

        assert!(resolved.is_empty());
    }

    #[test]
    fn test_missing_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("schema.json");

        let err = resolve_schema(Some(&missing.as_path().into()), &LocalFileSystem).unwrap_err();

        assert!(err.is_not_found());
        match err {
            SchemaError::SchemaFileNotFound { path } => assert_eq!(path, missing),
            other => panic!("Expected SchemaFileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_schema_file_propagates() {
        let file = schema_file("{not json");

        let err = resolve_schema(Some(&file.path().into()), &LocalFileSystem).unwrap_err();

        assert!(matches!(err, SchemaError::SchemaDeserialize { .. }), "{err:?}");
    }

    #[test]
    fn test_spec_from_yaml() {
        let spec: SchemaSpec = serde_yaml::from_str("/schemas/events.json").unwrap();
        assert_eq!(spec, SchemaSpec::Path(PathBuf::from("/schemas/events.json")));

        let spec: SchemaSpec = serde_yaml::from_str(
            r#"
type: struct
fields:
  - name: id
    type: long
    nullable: false
"#,
        )
        .unwrap();
        match spec {
            SchemaSpec::Struct(schema) => assert_eq!(schema.field_names(), vec!["id"]),
            other => panic!("Expected inline schema, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_inline_schema_keeps_cause() {
        let err = serde_yaml::from_str::<SchemaSpec>(
            r#"
type: struct
fields:
  - name: total
    type: decimal(50,2)
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("decimal(50,2)"), "{err}");

        let err = serde_yaml::from_str::<SchemaSpec>("42").unwrap_err();
        assert!(err.to_string().contains("schema file path"), "{err}");
    }
}
