//! In-memory SQLite store used by the inserter tests.

use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection};

use super::SupplierStore;
use crate::supplier::Supplier;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn with_products(products: &[(i16, &str)]) -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE products (
                product_id INTEGER PRIMARY KEY,
                product_name TEXT NOT NULL
            );
            CREATE TABLE suppliers (
                supplier_id INTEGER PRIMARY KEY NOT NULL,
                company_name TEXT NOT NULL,
                contact TEXT NOT NULL,
                address TEXT NOT NULL,
                phone TEXT,
                fax TEXT,
                homepage TEXT NOT NULL
            );
            CREATE TABLE supplier_product (
                supplier_id INTEGER,
                product_id INTEGER,
                sup_prod_id INTEGER PRIMARY KEY AUTOINCREMENT
            );
            "#,
        )
        .unwrap();
        for (id, name) in products {
            conn.execute(
                "INSERT INTO products (product_id, product_name) VALUES (?1, ?2)",
                params![id, name],
            )
            .unwrap();
        }
        Self { conn }
    }

    pub fn suppliers(&self) -> Vec<(i16, String)> {
        let mut stmt = self
            .conn
            .prepare("SELECT supplier_id, company_name FROM suppliers ORDER BY supplier_id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i16>(0)?, row.get(1)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        rows
    }

    pub fn links(&self) -> Vec<(i16, i16)> {
        let mut stmt = self
            .conn
            .prepare("SELECT supplier_id, product_id FROM supplier_product ORDER BY supplier_id, product_id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i16>(0)?, row.get(1)?)))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        rows
    }
}

impl SupplierStore for SqliteStore {
    fn insert_supplier(&mut self, supplier_id: i16, supplier: &Supplier) -> Result<()> {
        self.conn.execute(
            "INSERT INTO suppliers (supplier_id, company_name, contact, address, phone, fax, homepage)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                supplier_id,
                supplier.company_name,
                supplier.contact,
                supplier.address,
                supplier.phone,
                supplier.fax,
                supplier.homepage,
            ],
        )?;
        Ok(())
    }

    fn products_by_name(&mut self, names: &[String]) -> Result<Vec<(i16, String)>> {
        // One placeholder per name; SQLite has no array binding.
        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "SELECT product_id, product_name FROM products WHERE product_name IN ({placeholders}) ORDER BY product_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let products = stmt
            .query_map(params_from_iter(names.iter()), |row| {
                Ok((row.get::<_, i16>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    fn link_product(&mut self, supplier_id: i16, product_id: i16) -> Result<()> {
        self.conn.execute(
            "INSERT INTO supplier_product (supplier_id, product_id) VALUES (?1, ?2)",
            params![supplier_id, product_id],
        )?;
        Ok(())
    }
}
