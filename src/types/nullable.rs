//! Optional and nullable wrappers. Pure composition, no coercion of their own.

use crate::schema::Schema;

pub(crate) fn nullable(schema: Schema) -> Schema {
    Schema::union(vec![schema, Schema::null()])
}

/// Missing, null, or present and valid
pub(crate) fn maybe_empty(schema: Schema) -> Schema {
    Schema::union(vec![schema, Schema::null(), Schema::undefined()])
}

pub(crate) fn optional(schema: Schema) -> Schema {
    Schema::union(vec![schema, Schema::undefined()])
}
