mod postgres;
#[cfg(test)]
pub mod sqlite;

use anyhow::Result;

use crate::supplier::Supplier;

pub use self::postgres::{create_database, remove_database, Postgres};

/// Row-level operations the supplier inserter needs from a database.
pub trait SupplierStore {
    fn insert_supplier(&mut self, supplier_id: i16, supplier: &Supplier) -> Result<()>;
    /// `(product_id, product_name)` of every product whose name is in `names`,
    /// duplicates included.
    fn products_by_name(&mut self, names: &[String]) -> Result<Vec<(i16, String)>>;
    fn link_product(&mut self, supplier_id: i16, product_id: i16) -> Result<()>;
}

/// Double-quote an identifier for interpolation into DDL.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
