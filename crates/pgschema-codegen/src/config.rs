use crate::codegen::Layout;
use pgschema::{AttrType, Attribute, RegistryBuilder, SchemaRegistry, TableSchema};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A schema file loaded from disk.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    pub config_dir: PathBuf,
    pub file: SchemaFile,
}

impl SchemaConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_dir = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read schema file {}: {e}", path.display()))?;

        let file: SchemaFile = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse schema file {}: {e}", path.display()))?;

        Ok(Self { config_dir, file })
    }

    /// Output directory from `[output]`, relative to the schema file.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.file.output.as_ref()?.dir.as_ref()?;
        let dir = Path::new(dir);
        Some(if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.config_dir.join(dir)
        })
    }

    pub fn layout(&self) -> Option<Layout> {
        self.file.output.as_ref()?.layout
    }
}

/// Declarative table definitions.
///
/// ```toml
/// [output]
/// dir = "src/generated"
/// layout = "modules"
///
/// [[tables]]
/// name = "users"
///
/// [[tables.attributes]]
/// name = "email"
/// type = "text"
/// constraints = ["NOT NULL", "UNIQUE"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default)]
    pub output: Option<OutputConfig>,
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<String>,
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttrType,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl SchemaFile {
    /// Build and validate the registry in file order.
    pub fn into_registry(self) -> anyhow::Result<SchemaRegistry> {
        if self.tables.is_empty() {
            tracing::warn!("schema file declares no tables");
        }

        let mut builder = RegistryBuilder::new();
        for table in self.tables {
            let mut schema = TableSchema::new(table.name);
            for attr in table.attributes {
                let mut attribute = Attribute::new(attr.name, attr.ty);
                for token in attr.constraints {
                    attribute = attribute.constraint(token);
                }
                schema = schema.with_attribute(attribute);
            }
            builder = builder.register(schema);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgschema::SchemaError;

    const USERS: &str = r#"
[output]
dir = "gen"
layout = "bundle"

[[tables]]
name = "users"

[[tables.attributes]]
name = "name"
type = "text"
constraints = ["NOT NULL"]

[[tables.attributes]]
name = "age"
type = "integer"

[[tables]]
name = "posts"
"#;

    #[test]
    fn parses_tables_in_order() {
        let file: SchemaFile = toml::from_str(USERS).unwrap();
        let output = file.output.clone().unwrap();
        assert_eq!(output.layout, Some(Layout::Bundle));

        let registry = file.into_registry().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["users", "posts"]);

        let users = registry.get("users").unwrap();
        assert_eq!(users.column_names(), vec!["id", "name", "age"]);
        assert!(users.attribute("name").unwrap().is_required());
        assert!(users.attribute("age").unwrap().is_nullable());
    }

    #[test]
    fn output_dir_is_relative_to_schema_file() {
        let config = SchemaConfig {
            config_dir: PathBuf::from("project"),
            file: toml::from_str(USERS).unwrap(),
        };
        assert_eq!(config.output_dir(), Some(PathBuf::from("project/gen")));
        assert_eq!(config.layout(), Some(Layout::Bundle));
    }

    #[test]
    fn reserved_id_is_rejected() {
        let file: SchemaFile = toml::from_str(
            r#"
[[tables]]
name = "users"

[[tables.attributes]]
name = "id"
type = "integer"
"#,
        )
        .unwrap();
        let err = file.into_registry().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::ReservedColumn {
                table: "users".to_string()
            })
        );
    }

    #[test]
    fn second_primary_key_is_rejected() {
        let file: SchemaFile = toml::from_str(
            r#"
[[tables]]
name = "users"

[[tables.attributes]]
name = "email"
type = "text"
constraints = ["PRIMARY KEY"]
"#,
        )
        .unwrap();
        let err = file.into_registry().unwrap_err();
        assert_eq!(
            err.downcast_ref::<SchemaError>(),
            Some(&SchemaError::ExtraPrimaryKey {
                table: "users".to_string(),
                column: "email".to_string()
            })
        );
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let res = toml::from_str::<SchemaFile>(
            r#"
[[tables]]
name = "users"

[[tables.attributes]]
name = "born"
type = "date"
"#,
        );
        assert!(res.is_err());
    }
}
