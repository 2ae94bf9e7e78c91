use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

/// Identifiers derived from one table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// Module ident, possibly raw (`r#type`).
    pub module: String,
    /// File stem for the module (`users`).
    pub file_stem: String,
    /// Row struct (`User`).
    pub row: String,
    /// Builder prefix (`Users`): `UsersTable`, `UsersInsert`, ...
    pub prefix: String,
    /// Singleton const (`USERS`).
    pub handle: String,
}

impl TableNames {
    pub fn new(table: &str) -> Self {
        let module = sanitize_field_ident(table);
        let file_stem = module.trim_start_matches("r#").to_string();
        let prefix = sanitize_type_ident(&table.to_upper_camel_case());
        let row = sanitize_type_ident(&singular(&prefix));
        let handle = sanitize_type_ident(&table.to_shouty_snake_case());
        Self {
            module,
            file_stem,
            row,
            prefix,
            handle,
        }
    }

    pub fn table_type(&self) -> String {
        format!("{}Table", self.prefix)
    }

    pub fn insert_type(&self) -> String {
        format!("{}Insert", self.prefix)
    }

    pub fn update_type(&self) -> String {
        format!("{}Update", self.prefix)
    }

    pub fn delete_type(&self) -> String {
        format!("{}Delete", self.prefix)
    }

    pub fn select_type(&self) -> String {
        format!("{}Select", self.prefix)
    }

    pub fn selection_type(&self) -> String {
        format!("{}Selection", self.prefix)
    }
}

/// Identifiers derived from one column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Struct field ident, possibly raw (`r#type`).
    pub field: String,
    /// Field ident without the raw prefix, used to build method names.
    pub bare: String,
    /// Type-state flag (`EMAIL`).
    pub flag: String,
}

impl ColumnNames {
    pub fn new(column: &str) -> Self {
        let field = sanitize_field_ident(column);
        let bare = field.trim_start_matches("r#").to_string();
        let flag = bare.to_shouty_snake_case();
        Self { field, bare, flag }
    }
}

/// Singular form of an UpperCamelCase plural: `Companies` → `Company`.
pub fn singular(name: &str) -> String {
    if let Some(base) = name.strip_suffix("ies").filter(|b| !b.is_empty()) {
        return format!("{base}y");
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    match name.strip_suffix('s') {
        Some(base) if !base.is_empty() && !base.ends_with('s') && !base.ends_with('u') => {
            base.to_string()
        }
        _ => name.to_string(),
    }
}

pub fn sanitize_type_ident(name: &str) -> String {
    let mut s = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();

    if s.is_empty() {
        s.push('_');
    }

    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }

    s
}

pub fn sanitize_field_ident(column: &str) -> String {
    let mut s = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    s = s.to_snake_case();
    if s.is_empty() {
        s.push('_');
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    if matches!(s.as_str(), "self" | "super" | "crate") {
        // Cannot be raw identifiers.
        s.push('_');
        return s;
    }
    if is_rust_keyword(&s) {
        format!("r#{s}")
    } else {
        s
    }
}

fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break"
            | "const"
            | "continue"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "static"
            | "struct"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
            | "async"
            | "await"
            | "dyn"
            | "gen"
    )
}
