use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::db::SupplierStore;

/// One entry of the suppliers JSON document. The id is not part of the source
/// data; it is the 1-based position in the file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Supplier {
    pub company_name: String,
    pub contact: String,
    pub address: String,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub homepage: String,
    #[serde(default)]
    pub products: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsertSummary {
    pub suppliers: usize,
    pub links: usize,
    /// Declared product names that matched no row in `products`.
    pub unmatched: usize,
}

pub fn parse_suppliers(json: &str) -> Result<Vec<Supplier>> {
    let list = serde_json::from_str(json)?;
    Ok(list)
}

pub fn load_suppliers(path: &Path) -> Result<Vec<Supplier>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_suppliers(&data).with_context(|| format!("failed to parse JSON at {}", path.display()))
}

pub fn supplier_id(index: usize) -> Result<i16> {
    index
        .checked_add(1)
        .and_then(|id| i16::try_from(id).ok())
        .ok_or_else(|| anyhow::anyhow!("supplier #{index} does not fit a smallint id"))
}

/// Distinct declared names with no row among `found`.
fn unmatched_names(declared: &[String], found: &[(i16, String)]) -> usize {
    let found: HashSet<&str> = found.iter().map(|(_, name)| name.as_str()).collect();
    declared
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|name| !found.contains(name))
        .count()
}

/// Insert every supplier in order and link it to the products it names.
pub fn insert_suppliers<S: SupplierStore>(store: &mut S, suppliers: &[Supplier]) -> Result<InsertSummary> {
    let mut summary = InsertSummary::default();

    for (index, supplier) in suppliers.iter().enumerate() {
        let id = supplier_id(index)?;
        store
            .insert_supplier(id, supplier)
            .with_context(|| format!("failed to insert supplier {} ({})", id, supplier.company_name))?;
        summary.suppliers += 1;

        if supplier.products.is_empty() {
            continue;
        }
        let products = store
            .products_by_name(&supplier.products)
            .with_context(|| format!("failed to look up products of supplier {id}"))?;
        for (product_id, _) in &products {
            store.link_product(id, *product_id)?;
        }
        summary.links += products.len();

        let unmatched = unmatched_names(&supplier.products, &products);
        if unmatched > 0 {
            warn!(supplier_id = id, company = %supplier.company_name, unmatched, "product names without a match");
            summary.unmatched += unmatched;
        }
        debug!(supplier_id = id, linked = products.len(), "supplier inserted");
    }

    Ok(summary)
}
