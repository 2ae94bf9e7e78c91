use crate::value::Value;
use std::fmt;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("ASC"),
            Order::Desc => f.write_str("DESC"),
        }
    }
}

/// One WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    /// Literal text, rendered verbatim.
    Raw(String),
    /// Template whose single `?` (byte offset `at`) becomes the next `$n` at
    /// render time.
    Bound {
        template: String,
        at: usize,
        value: Value,
    },
}

/// Clauses shared by UPDATE, DELETE and SELECT.
///
/// Conditions and their bound values live in one ordered list, so placeholder
/// numbering follows condition order no matter how literal and bound
/// conditions are interleaved.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Clauses {
    conditions: Vec<Condition>,
    order_by: Vec<(String, Order)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Clauses {
    pub(crate) fn push_raw(&mut self, condition: String) {
        self.conditions.push(Condition::Raw(condition));
    }

    /// # Panics
    ///
    /// If `template` does not contain exactly one `?` outside quoted text.
    pub(crate) fn push_bound(&mut self, template: String, value: Value) {
        let Some(at) = placeholder_offset(&template) else {
            panic!("bound condition {template:?} must contain exactly one `?` outside quotes");
        };
        self.conditions.push(Condition::Bound {
            template,
            at,
            value,
        });
    }

    pub(crate) fn push_order(&mut self, column: String, order: Order) {
        self.order_by.push((column, order));
    }

    pub(crate) fn set_limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    pub(crate) fn set_offset(&mut self, offset: i64) {
        self.offset = Some(offset);
    }

    pub(crate) fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Values of bound conditions, in condition order.
    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        self.conditions.iter().filter_map(|c| match c {
            Condition::Bound { value, .. } => Some(value),
            Condition::Raw(_) => None,
        })
    }

    /// Render the non-empty clauses, space separated.
    ///
    /// `preceding` is the number of positional values already emitted by the
    /// statement head (SET values for UPDATE), so bound conditions continue the
    /// numbering from `$preceding + 1`.
    pub(crate) fn render(&self, preceding: usize) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut idx = preceding;

        if !self.conditions.is_empty() {
            let conditions: Vec<String> = self
                .conditions
                .iter()
                .map(|c| match c {
                    Condition::Raw(text) => text.clone(),
                    Condition::Bound { template, at, .. } => {
                        idx += 1;
                        format!("{}${idx}{}", &template[..*at], &template[*at + 1..])
                    }
                })
                .collect();
            parts.push(format!("WHERE {}", conditions.join(" AND ")));
        }

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(col, dir)| format!("{col} {dir}"))
                .collect();
            parts.push(format!("ORDER BY {}", order.join(", ")));
        }

        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("OFFSET {offset}"));
        }

        parts.join(" ")
    }
}

/// Byte offset of the only `?` outside single- or double-quoted text.
///
/// `None` when there is no such `?` or more than one.
fn placeholder_offset(template: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut found = None;
    for (i, c) in template.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '?' => {
                if found.replace(i).is_some() {
                    return None;
                }
            }
            None => {}
        }
    }
    found
}

/// Append `tail` to `sql` with a single separating space, if non-empty.
pub(crate) fn push_tail(sql: &mut String, tail: &str) {
    if !tail.is_empty() {
        sql.push(' ');
        sql.push_str(tail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clauses_render_nothing() {
        assert_eq!(Clauses::default().render(0), "");
    }

    #[test]
    fn fixed_clause_order() {
        let mut c = Clauses::default();
        c.set_offset(20);
        c.set_limit(10);
        c.push_order("name".into(), Order::Asc);
        c.push_raw("active = TRUE".into());
        c.push_order("id".into(), Order::Desc);
        assert_eq!(
            c.render(0),
            "WHERE active = TRUE ORDER BY name ASC, id DESC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn bound_conditions_number_after_preceding_values() {
        let mut c = Clauses::default();
        c.push_bound("name = ?".into(), Value::from("Ann"));
        c.push_raw("deleted = FALSE".into());
        c.push_bound("age > ?".into(), Value::from(30));
        assert_eq!(
            c.render(2),
            "WHERE name = $3 AND deleted = FALSE AND age > $4"
        );
        assert_eq!(
            c.values().collect::<Vec<_>>(),
            vec![&Value::from("Ann"), &Value::from(30)]
        );
    }

    #[test]
    fn quoted_question_marks_are_not_placeholders() {
        let mut c = Clauses::default();
        c.push_bound("note = '?' AND name = ?".into(), Value::from("Ann"));
        c.push_bound("\"why?\" = ?".into(), Value::from(1));
        c.push_bound("tag = 'it''s ?' OR tag = ?".into(), Value::from("x"));
        assert_eq!(
            c.render(0),
            "WHERE note = '?' AND name = $1 AND \"why?\" = $2 AND tag = 'it''s ?' OR tag = $3"
        );
    }

    #[test]
    fn placeholder_offsets() {
        assert_eq!(placeholder_offset("id = ?"), Some(5));
        assert_eq!(placeholder_offset("id = 1"), None);
        assert_eq!(placeholder_offset("a = ? AND b = ?"), None);
        assert_eq!(placeholder_offset("note = '?'"), None);
    }

    #[test]
    #[should_panic(expected = "must contain exactly one `?`")]
    fn template_without_placeholder_panics() {
        Clauses::default().push_bound("id = 1".into(), Value::from(5));
    }

    #[test]
    #[should_panic(expected = "must contain exactly one `?`")]
    fn template_with_only_quoted_placeholder_panics() {
        Clauses::default().push_bound("note = '?'".into(), Value::from("x"));
    }

    #[test]
    #[should_panic(expected = "must contain exactly one `?`")]
    fn template_with_two_placeholders_panics() {
        Clauses::default().push_bound("a = ? AND b = ?".into(), Value::from(1));
    }

    #[test]
    fn literal_text_is_not_rewritten() {
        let mut c = Clauses::default();
        c.push_raw("note = '?'".into());
        assert_eq!(c.render(0), "WHERE note = '?'");
    }
}
