use std::path::Path;

use anyhow::{Context, Result};
use postgres::{Client, NoTls};
use tracing::debug;

use super::{quote_ident, SupplierStore};
use crate::connection::Connection;
use crate::supplier::Supplier;

const CREATE_SUPPLIERS: &str = "CREATE TABLE suppliers(
    supplier_id smallint PRIMARY KEY NOT NULL,
    company_name varchar(50) NOT NULL,
    contact varchar(50) NOT NULL,
    address varchar(100) NOT NULL,
    phone varchar(15),
    fax varchar(15),
    homepage varchar(150) NOT NULL
)";

const CREATE_SUPPLIER_PRODUCT: &str = "CREATE TABLE supplier_product(
    supplier_id smallint,
    product_id smallint,
    sup_prod_id serial PRIMARY KEY NOT NULL
)";

const FOREIGN_KEYS: [&str; 2] = [
    "ALTER TABLE ONLY supplier_product \
     ADD CONSTRAINT fk_supplier_supprod FOREIGN KEY (supplier_id) REFERENCES suppliers",
    "ALTER TABLE ONLY supplier_product \
     ADD CONSTRAINT fk_products_supprod FOREIGN KEY (product_id) REFERENCES products",
];

fn connect(conn: &Connection) -> Result<Client> {
    debug!(target_db = %conn.describe(), "postgres: connecting");
    let client = conn
        .pg_config()?
        .connect(NoTls)
        .with_context(|| format!("failed to connect to {}", conn.describe()))?;
    Ok(client)
}

/// Run database-level DDL on a short-lived administrative connection.
///
/// No transaction is opened, so every statement commits on its own; the
/// server refuses `CREATE/DROP DATABASE` inside a transaction block.
fn with_admin_client(conn: &Connection, statements: &[String]) -> Result<()> {
    let mut client = connect(conn)?;
    for sql in statements {
        debug!(sql = %sql, "postgres: admin statement");
        client.batch_execute(sql)?;
    }
    client.close()?;
    Ok(())
}

fn drop_database_sql(name: &str) -> String {
    format!("DROP DATABASE {} WITH (FORCE)", quote_ident(name))
}

fn create_database_sql(name: &str, user: &str) -> [String; 2] {
    [
        format!("CREATE DATABASE {}", quote_ident(name)),
        format!("ALTER ROLE {} SET client_encoding TO 'utf8'", quote_ident(user)),
    ]
}

/// Force-drop `name`, terminating its sessions. Fails when it does not exist.
pub fn remove_database(conn: &Connection, name: &str) -> Result<()> {
    with_admin_client(conn, &[drop_database_sql(name)])
}

pub fn create_database(conn: &Connection, name: &str) -> Result<()> {
    conn.user()
        .and_then(|user| with_admin_client(conn, &create_database_sql(name, user)))
        .with_context(|| format!("failed to create database {name}"))
}

/// Main connection to the seeded database.
pub struct Postgres {
    client: Client,
}

impl Postgres {
    pub fn connect(conn: &Connection) -> Result<Self> {
        Ok(Self { client: connect(conn)? })
    }

    pub fn execute_script(&mut self, path: &Path) -> Result<()> {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.client
            .batch_execute(&script)
            .with_context(|| format!("failed to execute {}", path.display()))?;
        Ok(())
    }

    pub fn create_supplier_tables(&mut self) -> Result<()> {
        self.client
            .batch_execute(CREATE_SUPPLIERS)
            .context("failed to create table suppliers")?;
        self.client
            .batch_execute(CREATE_SUPPLIER_PRODUCT)
            .context("failed to create table supplier_product")?;
        Ok(())
    }

    pub fn add_foreign_keys(&mut self) -> Result<()> {
        for sql in FOREIGN_KEYS {
            self.client
                .batch_execute(sql)
                .with_context(|| format!("failed to run: {sql}"))?;
        }
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.client.close()?;
        Ok(())
    }
}

impl SupplierStore for Postgres {
    fn insert_supplier(&mut self, supplier_id: i16, supplier: &Supplier) -> Result<()> {
        self.client.execute(
            "INSERT INTO suppliers(supplier_id, company_name, contact, address, phone, fax, homepage)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                &supplier_id,
                &supplier.company_name,
                &supplier.contact,
                &supplier.address,
                &supplier.phone,
                &supplier.fax,
                &supplier.homepage,
            ],
        )?;
        Ok(())
    }

    fn products_by_name(&mut self, names: &[String]) -> Result<Vec<(i16, String)>> {
        let rows = self.client.query(
            "SELECT product_id::smallint, product_name::text FROM products
             WHERE product_name = ANY($1::text[])
             ORDER BY product_id",
            &[&names],
        )?;
        Ok(rows
            .into_iter()
            .map(|r| (r.get::<_, i16>(0), r.get::<_, String>(1)))
            .collect())
    }

    fn link_product(&mut self, supplier_id: i16, product_id: i16) -> Result<()> {
        self.client.execute(
            "INSERT INTO supplier_product(supplier_id, product_id) VALUES ($1, $2)",
            &[&supplier_id, &product_id],
        )?;
        Ok(())
    }
}
