use crate::naming::{ColumnNames, TableNames};
use crate::type_mapper::{field_type, param_type, value_expr};
use pgschema::{Attribute, TableSchema};
use std::collections::HashSet;

struct Column<'a> {
    attr: &'a Attribute,
    names: ColumnNames,
}

impl Column<'_> {
    fn sql_name(&self) -> &str {
        self.attr.name()
    }
}

/// Const generic flags of a type-state builder, one per writable column.
struct Flags(Vec<String>);

impl Flags {
    /// `<const A: bool = false, ...>` for the struct declaration.
    fn declare(&self) -> String {
        angle(self.0.iter().map(|f| format!("const {f}: bool = false")).collect())
    }

    /// `<const A: bool, ...>` for an impl header, optionally leaving one flag out.
    fn generics(&self, skip: Option<usize>) -> String {
        angle(
            self.0
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != skip)
                .map(|(_, f)| format!("const {f}: bool"))
                .collect(),
        )
    }

    /// `<A, B, ...>`, optionally pinning one flag to a literal.
    fn args(&self, pinned: Option<(usize, bool)>) -> String {
        angle(
            self.0
                .iter()
                .enumerate()
                .map(|(i, f)| match pinned {
                    Some((j, v)) if j == i => v.to_string(),
                    _ => f.clone(),
                })
                .collect(),
        )
    }
}

fn angle(items: Vec<String>) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("<{}>", items.join(", "))
    }
}

/// Render the source unit of one table (without the `@generated` header).
pub fn generate_table_unit(table: &TableSchema) -> anyhow::Result<String> {
    let names = TableNames::new(table.name());

    let mut seen_fields: HashSet<String> = HashSet::new();
    let mut columns: Vec<Column<'_>> = Vec::new();
    for attr in table.attributes() {
        let col_names = ColumnNames::new(attr.name());
        if !seen_fields.insert(col_names.field.clone()) {
            anyhow::bail!(
                "duplicate field name after sanitization in {}: {}",
                table.name(),
                col_names.field
            );
        }
        columns.push(Column {
            attr,
            names: col_names,
        });
    }
    let writable: Vec<&Column<'_>> = columns.iter().filter(|c| !c.attr.is_identity()).collect();

    check_method_names(table.name(), &names, &columns, &writable)?;

    let flags = Flags(writable.iter().map(|c| c.names.flag.clone()).collect());

    let mut out = String::new();
    out.push_str("use super::types::{DeleteBuilder, InsertBuilder, UpdateBuilder};\n");
    out.push_str("use pgschema::query::{DeleteQuery, InsertQuery, Order, SelectQuery, UpdateQuery};\n");
    out.push_str("use pgschema::tokio_postgres::Row;\n");
    out.push_str("use pgschema::{DbError, DbResult, FromRow, GenericClient, RowExt, Value};\n");

    emit_row(&mut out, table, &names, &columns);
    emit_table_handle(&mut out, table, &names, &columns);
    emit_insert(&mut out, table.name(), &names, &writable, &flags);
    emit_update(&mut out, table.name(), &names, &columns, &writable, &flags);
    emit_delete(&mut out, table.name(), &names, &columns);
    emit_select(&mut out, table.name(), &names, &columns);

    Ok(out)
}

fn check_method_names(
    table: &str,
    names: &TableNames,
    columns: &[Column<'_>],
    writable: &[&Column<'_>],
) -> anyhow::Result<()> {
    let wheres = columns.iter().map(|c| format!("where_{}", c.names.bare));
    let selects = columns.iter().map(|c| format!("select_{}", c.names.bare));

    let mut update: Vec<String> = vec![
        "and_where".into(),
        "build".into(),
        "values".into(),
        "execute".into(),
    ];
    for c in writable {
        update.push(format!("set_{}", c.names.bare));
        if c.attr.is_nullable() {
            update.push(format!("set_{}_null", c.names.bare));
        }
    }
    update.extend(wheres);

    let mut select: Vec<String> = vec!["select_all".into(), "select_columns".into()];
    select.extend(selects);

    for (builder, methods) in [(names.update_type(), update), (names.select_type(), select)] {
        let mut seen = HashSet::new();
        for m in methods {
            if !seen.insert(m.clone()) {
                anyhow::bail!(
                    "table {table}: generated method {builder}::{m} would be defined twice"
                );
            }
        }
    }
    Ok(())
}

fn emit_row(out: &mut String, table: &TableSchema, names: &TableNames, columns: &[Column<'_>]) {
    let row = &names.row;

    out.push_str(&format!("\n/// Row of the `{}` table.\n", table.name()));
    out.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
    out.push_str(&format!("pub struct {row} {{\n"));
    for c in columns {
        out.push_str(&format!("    pub {}: {},\n", c.names.field, field_type(c.attr)));
    }
    out.push_str("}\n");

    out.push_str(&format!("\nimpl FromRow for {row} {{\n"));
    out.push_str("    fn from_row(row: &Row) -> DbResult<Self> {\n");
    out.push_str("        Ok(Self {\n");
    for c in columns {
        out.push_str(&format!(
            "            {}: row.try_get_column({:?})?,\n",
            c.names.field,
            c.sql_name()
        ));
    }
    out.push_str("        })\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl {row} {{\n"));
    out.push_str("    /// Scan only `columns`; other fields keep their default value.\n");
    out.push_str("    pub fn from_selected(row: &Row, columns: &[String]) -> DbResult<Self> {\n");
    out.push_str("        let mut out = Self::default();\n");
    out.push_str("        for column in columns {\n");
    out.push_str("            match column.as_str() {\n");
    for c in columns {
        out.push_str(&format!(
            "                {:?} => out.{} = row.try_get_column({:?})?,\n",
            c.sql_name(),
            c.names.field,
            c.sql_name()
        ));
    }
    out.push_str(&format!(
        "                other => return Err(DbError::decode(other, {:?})),\n",
        format!("not a column of {}", table.name())
    ));
    out.push_str("            }\n");
    out.push_str("        }\n");
    out.push_str("        Ok(out)\n");
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn emit_table_handle(
    out: &mut String,
    table: &TableSchema,
    names: &TableNames,
    columns: &[Column<'_>],
) {
    let handle_ty = names.table_type();
    let column_list: Vec<String> = columns.iter().map(|c| format!("{:?}", c.sql_name())).collect();

    out.push_str(&format!("\n/// Handle for the `{}` table.\n", table.name()));
    out.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
    out.push_str(&format!("pub struct {handle_ty};\n"));
    out.push_str(&format!("\npub const {}: {handle_ty} = {handle_ty};\n", names.handle));

    out.push_str(&format!("\nimpl {handle_ty} {{\n"));
    out.push_str(&format!("    pub const NAME: &'static str = {:?};\n", table.name()));
    out.push_str(&format!(
        "    pub const COLUMNS: &'static [&'static str] = &[{}];\n",
        column_list.join(", ")
    ));

    for (method, ty, query) in [
        ("insert", names.insert_type(), "InsertQuery"),
        ("update", names.update_type(), "UpdateQuery"),
        ("delete", names.delete_type(), "DeleteQuery"),
        ("select", names.select_type(), "SelectQuery"),
    ] {
        out.push_str(&format!("\n    pub fn {method}(&self) -> {ty} {{\n"));
        out.push_str(&format!("        {ty} {{\n"));
        out.push_str(&format!("            query: {query}::new(Self::NAME),\n"));
        out.push_str("        }\n");
        out.push_str("    }\n");
    }

    out.push_str("\n    /// `CREATE TABLE IF NOT EXISTS` statement for this table.\n");
    out.push_str("    pub fn create_sql(&self) -> &'static str {\n");
    out.push_str(&format!("        {:?}\n", table.build_sql()));
    out.push_str("    }\n");
    out.push_str("}\n");
}

/// One `set_<column>` per writable column, each only on builders whose flag is unset.
fn emit_setters(
    out: &mut String,
    ty: &str,
    writable: &[&Column<'_>],
    flags: &Flags,
    with_null: bool,
) {
    for (i, c) in writable.iter().enumerate() {
        let unset = format!("{ty}{}", flags.args(Some((i, false))));
        let set = format!("{ty}{}", flags.args(Some((i, true))));
        let col = c.sql_name();
        let bare = &c.names.bare;

        out.push_str(&format!("\nimpl{} {unset} {{\n", flags.generics(Some(i))));
        out.push_str(&format!(
            "    pub fn set_{bare}(mut self, value: {}) -> {set} {{\n",
            param_type(c.attr.ty())
        ));
        out.push_str(&format!(
            "        self.query.set({col:?}, {});\n",
            value_expr(c.attr.ty())
        ));
        out.push_str(&format!("        {ty} {{ query: self.query }}\n"));
        out.push_str("    }\n");

        if with_null && c.attr.is_nullable() {
            out.push_str(&format!("\n    pub fn set_{bare}_null(mut self) -> {set} {{\n"));
            out.push_str(&format!("        self.query.set({col:?}, Value::Null);\n"));
            out.push_str(&format!("        {ty} {{ query: self.query }}\n"));
            out.push_str("    }\n");
        }
        out.push_str("}\n");
    }
}

/// Typed `where_<column>` conditions, numbered through `?` templates.
fn emit_typed_wheres(out: &mut String, columns: &[Column<'_>]) {
    out.push_str("\n    pub fn and_where(mut self, condition: impl Into<String>) -> Self {\n");
    out.push_str("        self.query.and_where(condition);\n");
    out.push_str("        self\n");
    out.push_str("    }\n");

    for c in columns {
        let col = c.sql_name();
        out.push_str(&format!(
            "\n    pub fn where_{}(mut self, value: {}) -> Self {{\n",
            c.names.bare,
            param_type(c.attr.ty())
        ));
        out.push_str(&format!(
            "        self.query.where_with_value({:?}, {});\n",
            format!("{col} = ?"),
            value_expr(c.attr.ty())
        ));
        out.push_str("        self\n");
        out.push_str("    }\n");
    }
}

fn emit_build_values(out: &mut String) {
    out.push_str("\n    pub fn build(&self) -> String {\n");
    out.push_str("        self.query.build()\n");
    out.push_str("    }\n");
    out.push_str("\n    pub fn values(&self) -> Vec<&Value> {\n");
    out.push_str("        self.query.values()\n");
    out.push_str("    }\n");
}

fn emit_insert(
    out: &mut String,
    table: &str,
    names: &TableNames,
    writable: &[&Column<'_>],
    flags: &Flags,
) {
    let ty = names.insert_type();
    let table_ty = names.table_type();
    let full = format!("{ty}{}", flags.args(None));
    let generics = flags.generics(None);

    out.push_str(&format!("\n/// INSERT into `{}`.\n", table));
    out.push_str("///\n");
    out.push_str("/// Each `set_*` method is available until it has been called once.\n");
    out.push_str("/// `execute` reports the first NOT NULL column left unset.\n");
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!("pub struct {ty}{} {{\n", flags.declare()));
    out.push_str("    query: InsertQuery,\n");
    out.push_str("}\n");

    emit_setters(out, &ty, writable, flags, false);

    out.push_str(&format!("\nimpl{generics} {full} {{"));
    emit_build_values(out);

    out.push_str("\n    /// Fail on the first required column that was not set.\n");
    out.push_str("    pub fn check_required(&self) -> DbResult<()> {\n");
    for c in writable.iter().filter(|c| c.attr.is_required()) {
        out.push_str(&format!("        if !{} {{\n", c.names.flag));
        out.push_str(&format!(
            "            return Err(DbError::missing_column({table_ty}::NAME, {:?}));\n",
            c.sql_name()
        ));
        out.push_str("        }\n");
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");

    out.push_str("\n    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {\n");
    out.push_str("        self.check_required()?;\n");
    out.push_str("        self.query.execute(conn).await\n");
    out.push_str("    }\n");

    out.push_str("\n    /// Execute with `RETURNING` every column and map the inserted row.\n");
    out.push_str(&format!(
        "    pub async fn execute_returning(&self, conn: &impl GenericClient) -> DbResult<{}> {{\n",
        names.row
    ));
    out.push_str("        self.check_required()?;\n");
    out.push_str("        let mut query = self.query.clone();\n");
    out.push_str(&format!("        query.returning({table_ty}::COLUMNS);\n"));
    out.push_str("        let row = query.fetch_one(conn).await?;\n");
    out.push_str(&format!("        {}::from_row(&row)\n", names.row));
    out.push_str("    }\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl{generics} InsertBuilder for {full} {{\n"));
    emit_trait_body(out, &table_ty, true);
    out.push_str("}\n");
}

fn emit_trait_body(out: &mut String, table_ty: &str, check_required: bool) {
    out.push_str("    fn table(&self) -> &'static str {\n");
    out.push_str(&format!("        {table_ty}::NAME\n"));
    out.push_str("    }\n");
    out.push_str("\n    fn build(&self) -> String {\n");
    out.push_str("        self.query.build()\n");
    out.push_str("    }\n");
    out.push_str("\n    async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {\n");
    if check_required {
        out.push_str("        self.check_required()?;\n");
    }
    out.push_str("        self.query.execute(conn).await\n");
    out.push_str("    }\n");
}

fn emit_update(
    out: &mut String,
    table: &str,
    names: &TableNames,
    columns: &[Column<'_>],
    writable: &[&Column<'_>],
    flags: &Flags,
) {
    let ty = names.update_type();
    let table_ty = names.table_type();
    let full = format!("{ty}{}", flags.args(None));
    let generics = flags.generics(None);

    out.push_str(&format!("\n/// UPDATE of `{}`.\n", table));
    out.push_str("///\n");
    out.push_str("/// Each `set_*` method is available until it has been called once.\n");
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!("pub struct {ty}{} {{\n", flags.declare()));
    out.push_str("    query: UpdateQuery,\n");
    out.push_str("}\n");

    emit_setters(out, &ty, writable, flags, true);

    out.push_str(&format!("\nimpl{generics} {full} {{"));
    emit_typed_wheres(out, columns);
    emit_build_values(out);
    out.push_str("\n    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {\n");
    out.push_str("        self.query.execute(conn).await\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl{generics} UpdateBuilder for {full} {{\n"));
    emit_trait_body(out, &table_ty, false);
    out.push_str("}\n");
}

fn emit_delete(out: &mut String, table: &str, names: &TableNames, columns: &[Column<'_>]) {
    let ty = names.delete_type();
    let table_ty = names.table_type();

    out.push_str(&format!(
        "\n/// DELETE from `{table}`. Without a condition every row is deleted.\n"
    ));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!("pub struct {ty} {{\n"));
    out.push_str("    query: DeleteQuery,\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl {ty} {{"));
    emit_typed_wheres(out, columns);
    emit_build_values(out);
    out.push_str("\n    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {\n");
    out.push_str("        self.query.execute(conn).await\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl DeleteBuilder for {ty} {{\n"));
    emit_trait_body(out, &table_ty, false);
    out.push_str("}\n");
}

fn emit_select(out: &mut String, table: &str, names: &TableNames, columns: &[Column<'_>]) {
    let ty = names.select_type();
    let selection = names.selection_type();
    let row = &names.row;

    out.push_str(&format!("\n/// SELECT from `{}`; pick the projection first.\n", table));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!("pub struct {ty} {{\n"));
    out.push_str("    query: SelectQuery,\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl {ty} {{\n"));
    out.push_str(&format!("    pub fn select_all(self) -> {selection} {{\n"));
    out.push_str(&format!("        {selection} {{ query: self.query }}\n"));
    out.push_str("    }\n");
    for c in columns {
        out.push_str(&format!(
            "\n    pub fn select_{}(self) -> {selection} {{\n",
            c.names.bare
        ));
        out.push_str(&format!("        self.select_all().select_{}()\n", c.names.bare));
        out.push_str("    }\n");
    }
    out.push_str("\n    /// Select the given columns, in order.\n");
    out.push_str(&format!(
        "    pub fn select_columns(self, columns: &[&str]) -> {selection} {{\n"
    ));
    out.push_str("        let mut query = self.query;\n");
    out.push_str("        for column in columns {\n");
    out.push_str("            query.add_column(*column);\n");
    out.push_str("        }\n");
    out.push_str(&format!("        {selection} {{ query }}\n"));
    out.push_str("    }\n");
    out.push_str("}\n");

    out.push_str(&format!(
        "\n/// A `{}` query with its projection chosen. No column selected means all.\n",
        table
    ));
    out.push_str("#[derive(Debug, Clone)]\n");
    out.push_str("#[must_use]\n");
    out.push_str(&format!("pub struct {selection} {{\n"));
    out.push_str("    query: SelectQuery,\n");
    out.push_str("}\n");

    out.push_str(&format!("\nimpl {selection} {{"));
    for c in columns {
        out.push_str(&format!("\n    pub fn select_{}(mut self) -> Self {{\n", c.names.bare));
        out.push_str(&format!("        self.query.add_column({:?});\n", c.sql_name()));
        out.push_str("        self\n");
        out.push_str("    }\n");
    }
    emit_typed_wheres(out, columns);

    out.push_str("\n    pub fn order_by(mut self, column: &str, order: Order) -> Self {\n");
    out.push_str("        self.query.order_by(column, order);\n");
    out.push_str("        self\n");
    out.push_str("    }\n");
    out.push_str("\n    pub fn limit(mut self, limit: i64) -> Self {\n");
    out.push_str("        self.query.limit(limit);\n");
    out.push_str("        self\n");
    out.push_str("    }\n");
    out.push_str("\n    pub fn offset(mut self, offset: i64) -> Self {\n");
    out.push_str("        self.query.offset(offset);\n");
    out.push_str("        self\n");
    out.push_str("    }\n");

    emit_build_values(out);

    out.push_str(&format!(
        "\n    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<Vec<{row}>> {{\n"
    ));
    out.push_str("        let rows = self.query.execute(conn).await?;\n");
    out.push_str("        rows.iter().map(|row| self.scan(row)).collect()\n");
    out.push_str("    }\n");

    out.push_str("\n    /// First matching row, or `DbError::NotFound`.\n");
    out.push_str(&format!(
        "    pub async fn execute_one(&self, conn: &impl GenericClient) -> DbResult<{row}> {{\n"
    ));
    out.push_str("        let row = self.query.fetch_one(conn).await?;\n");
    out.push_str("        self.scan(&row)\n");
    out.push_str("    }\n");

    out.push_str(&format!("\n    fn scan(&self, row: &Row) -> DbResult<{row}> {{\n"));
    out.push_str("        let columns = self.query.columns();\n");
    out.push_str("        if columns.is_empty() {\n");
    out.push_str(&format!("            {row}::from_row(row)\n"));
    out.push_str("        } else {\n");
    out.push_str(&format!("            {row}::from_selected(row, columns)\n"));
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");
}
