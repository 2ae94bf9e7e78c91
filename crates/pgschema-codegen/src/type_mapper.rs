use pgschema::{AttrType, Attribute};

/// Rust type stored for a column value.
pub fn rust_type(ty: AttrType) -> &'static str {
    match ty {
        AttrType::Text => "String",
        AttrType::Integer => "i32",
        AttrType::Float => "f64",
        AttrType::Boolean => "bool",
    }
}

/// Row struct field type: nullable columns are wrapped in `Option`.
pub fn field_type(attr: &Attribute) -> String {
    let ty = rust_type(attr.ty());
    if attr.is_nullable() {
        format!("Option<{ty}>")
    } else {
        ty.to_string()
    }
}

/// Parameter type accepted by setters and typed conditions.
pub fn param_type(ty: AttrType) -> &'static str {
    match ty {
        AttrType::Text => "impl Into<String>",
        other => rust_type(other),
    }
}

/// Expression turning the parameter `value` into a `Value`.
pub fn value_expr(ty: AttrType) -> &'static str {
    match ty {
        AttrType::Text => "Value::Text(value.into())",
        AttrType::Integer => "Value::Integer(value)",
        AttrType::Float => "Value::Float(value)",
        AttrType::Boolean => "Value::Boolean(value)",
    }
}
