//! SQL identifier helpers.

/// Quote an identifier for PostgreSQL: wrap in `"` and double embedded quotes.
///
/// ```
/// assert_eq!(pgschema::ident::quote("users"), "\"users\"");
/// assert_eq!(pgschema::ident::quote("we\"ird"), "\"we\"\"ird\"");
/// ```
pub fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Whether `s` is a plain identifier: `[a-z_][a-z0-9_]*`.
///
/// Statement builders emit names unquoted, and PostgreSQL folds unquoted names to
/// lower case, so uppercase letters are rejected along with anything that would
/// need quoting.
pub fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// PostgreSQL key words that cannot name a table or column without quotes.
const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is",
    "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "references", "returning",
    "right", "select", "session_user", "similar", "some", "symmetric", "system_user",
    "table", "tablesample", "then", "to", "trailing", "true", "union", "unique", "user",
    "using", "variadic", "verbose", "when", "where", "window", "with",
];

/// Whether `s` is a reserved PostgreSQL key word (case-insensitive).
pub fn is_reserved(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    RESERVED.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_idents() {
        assert!(is_plain_ident("users"));
        assert!(is_plain_ident("_tmp1"));
        assert!(is_plain_ident("employee_count"));
        assert!(!is_plain_ident(""));
        assert!(!is_plain_ident("1abc"));
        assert!(!is_plain_ident("first name"));
        assert!(!is_plain_ident("a-b"));
        assert!(!is_plain_ident("isPublic"));
        assert!(!is_plain_ident("Users"));
    }

    #[test]
    fn reserved_words() {
        assert!(is_reserved("user"));
        assert!(is_reserved("ORDER"));
        assert!(is_reserved("all"));
        assert!(!is_reserved("users"));
        assert!(!is_reserved("type"));
        assert!(!is_reserved("name"));
    }

    #[test]
    fn quote_escapes_double_quotes() {
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote(""), "\"\"");
    }
}
