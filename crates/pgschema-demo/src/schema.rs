//! Tables of the demo application.

use pgschema::{AttrType, RegistryBuilder, SchemaError, SchemaRegistry, TableSchema};

pub fn users() -> TableSchema {
    TableSchema::new("users")
        .add_attribute("name", AttrType::Text)
        .not_null()
        .build()
        .add_attribute("email", AttrType::Text)
        .not_null()
        .unique()
        .build()
        .add_attribute("password", AttrType::Text)
        .not_null()
        .build()
}

pub fn companies() -> TableSchema {
    TableSchema::new("companies")
        .add_attribute("name", AttrType::Text)
        .not_null()
        .unique()
        .build()
        .add_attribute("description", AttrType::Text)
        .build()
        .add_attribute("employee_count", AttrType::Integer)
        .build()
        .add_attribute("revenue", AttrType::Float)
        .build()
        .add_attribute("is_public", AttrType::Boolean)
        .not_null()
        .build()
}

pub fn posts() -> TableSchema {
    TableSchema::new("posts")
        .add_attribute("title", AttrType::Text)
        .not_null()
        .build()
        .add_attribute("content", AttrType::Text)
        .build()
        .add_attribute("published", AttrType::Boolean)
        .build()
}

pub fn categories() -> TableSchema {
    TableSchema::new("categories")
        .add_attribute("slug", AttrType::Text)
        .not_null()
        .unique()
        .build()
        .add_attribute("display_name", AttrType::Text)
        .not_null()
        .build()
}

/// Every demo table, in creation order.
pub fn registry() -> Result<SchemaRegistry, SchemaError> {
    RegistryBuilder::new()
        .register(users())
        .register(companies())
        .register(posts())
        .register(categories())
        .build()
}
