//! Shape compatibility between an inferred and a declared schema.

use crate::schema::Schema;

/// `general` is `Any`, or both are objects with the same field names in the
/// same order and matching `required` flags. Field schemas are not compared.
pub fn schema_is_compatible(general: &Schema, detailed: &Schema) -> bool {
    match (general, detailed) {
        (Schema::Any, _) => true,
        (Schema::Object(g), Schema::Object(d)) => {
            g.len() == d.len()
                && g
                    .fields()
                    .iter()
                    .zip(d.fields())
                    .all(|(gf, df)| gf.name == df.name && gf.required == df.required)
        }
        _ => false,
    }
}
