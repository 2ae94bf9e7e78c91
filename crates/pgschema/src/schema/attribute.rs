use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrType {
    Text,
    Integer,
    Float,
    Boolean,
}

impl AttrType {
    /// PostgreSQL column type. `identity` selects `SERIAL` for the auto-increment key.
    pub fn sql_type(self, identity: bool) -> &'static str {
        match self {
            AttrType::Text => "VARCHAR(255)",
            AttrType::Integer if identity => "SERIAL",
            AttrType::Integer => "INTEGER",
            AttrType::Float => "FLOAT",
            AttrType::Boolean => "BOOLEAN",
        }
    }
}

/// A column constraint token, rendered verbatim after the column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Constraint {
    PrimaryKey,
    NotNull,
    Unique,
    /// Free-form token such as `DEFAULT 0` or `CHECK (revenue >= 0)`.
    Custom(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::PrimaryKey => f.write_str("PRIMARY KEY"),
            Constraint::NotNull => f.write_str("NOT NULL"),
            Constraint::Unique => f.write_str("UNIQUE"),
            Constraint::Custom(token) => f.write_str(token),
        }
    }
}

impl From<String> for Constraint {
    fn from(token: String) -> Self {
        let normalized = token.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "PRIMARY KEY" => Constraint::PrimaryKey,
            "NOT NULL" => Constraint::NotNull,
            "UNIQUE" => Constraint::Unique,
            _ => Constraint::Custom(token),
        }
    }
}

impl From<&str> for Constraint {
    fn from(token: &str) -> Self {
        Constraint::from(token.to_string())
    }
}

impl From<Constraint> for String {
    fn from(c: Constraint) -> Self {
        c.to_string()
    }
}

/// One column definition.
///
/// Attributes are built with chained calls and become read-only once attached to
/// a [`TableSchema`](super::TableSchema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    #[serde(rename = "type")]
    ty: AttrType,
    constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    identity: bool,
}

impl Attribute {
    /// Create a detached attribute with no constraints.
    pub fn new(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
            constraints: Vec::new(),
            identity: false,
        }
    }

    /// The `id SERIAL PRIMARY KEY` column every table starts with.
    pub(crate) fn identity() -> Self {
        Self {
            name: "id".to_string(),
            ty: AttrType::Integer,
            constraints: vec![Constraint::PrimaryKey],
            identity: true,
        }
    }

    pub fn not_null(self) -> Self {
        self.constraint(Constraint::NotNull)
    }

    pub fn unique(self) -> Self {
        self.constraint(Constraint::Unique)
    }

    /// Append a constraint token. A token already present is not repeated.
    pub fn constraint(mut self, constraint: impl Into<Constraint>) -> Self {
        let constraint = constraint.into();
        if !self.constraints.contains(&constraint) {
            self.constraints.push(constraint);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> AttrType {
        self.ty
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Whether this is the table's auto-increment primary key.
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Whether an insert must set this column (`NOT NULL`, not the identity).
    pub fn is_required(&self) -> bool {
        !self.identity && self.constraints.contains(&Constraint::NotNull)
    }

    /// Whether the column can hold NULL.
    pub fn is_nullable(&self) -> bool {
        !self.identity
            && !self.constraints.contains(&Constraint::NotNull)
            && !self.constraints.contains(&Constraint::PrimaryKey)
    }

    pub fn is_unique(&self) -> bool {
        self.constraints.contains(&Constraint::Unique)
    }

    /// Column definition as used inside `CREATE TABLE`.
    pub fn sql_definition(&self) -> String {
        let mut def = format!(
            "{} {}",
            crate::ident::quote(&self.name),
            self.ty.sql_type(self.identity)
        );
        for c in &self.constraints {
            def.push(' ');
            def.push_str(&c.to_string());
        }
        def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_types() {
        assert_eq!(AttrType::Text.sql_type(false), "VARCHAR(255)");
        assert_eq!(AttrType::Integer.sql_type(false), "INTEGER");
        assert_eq!(AttrType::Integer.sql_type(true), "SERIAL");
        assert_eq!(AttrType::Float.sql_type(false), "FLOAT");
        assert_eq!(AttrType::Boolean.sql_type(false), "BOOLEAN");
    }

    #[test]
    fn constraints_keep_insertion_order() {
        let attr = Attribute::new("email", AttrType::Text)
            .unique()
            .not_null()
            .constraint("DEFAULT ''");
        assert_eq!(
            attr.sql_definition(),
            "\"email\" VARCHAR(255) UNIQUE NOT NULL DEFAULT ''"
        );
    }

    #[test]
    fn repeated_constraint_is_rendered_once() {
        let attr = Attribute::new("name", AttrType::Text).not_null().not_null();
        assert_eq!(attr.constraints(), &[Constraint::NotNull]);
        assert_eq!(attr.sql_definition(), "\"name\" VARCHAR(255) NOT NULL");
    }

    #[test]
    fn parses_known_tokens() {
        assert_eq!(Constraint::from("not  null"), Constraint::NotNull);
        assert_eq!(Constraint::from("UNIQUE"), Constraint::Unique);
        assert_eq!(Constraint::from("Primary Key"), Constraint::PrimaryKey);
        assert_eq!(
            Constraint::from("CHECK (revenue >= 0)"),
            Constraint::Custom("CHECK (revenue >= 0)".to_string())
        );
    }

    #[test]
    fn identity_is_not_required() {
        let id = Attribute::identity();
        assert!(!id.is_required());
        assert!(!id.is_nullable());
        assert_eq!(id.sql_definition(), "\"id\" SERIAL PRIMARY KEY");

        let plain = Attribute::new("content", AttrType::Text);
        assert!(plain.is_nullable());
        assert!(!plain.is_required());
    }
}
