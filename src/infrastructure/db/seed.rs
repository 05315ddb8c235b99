//! Demo database provisioning.
//!
//! Recreates the small e-commerce schema the default prompt context describes and loads
//! a fixed set of rows. The correction loop never calls this; it exists for the `seed`
//! command and for tests.

use crate::domain::error::{AppError, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tracing::info;

const DEMO_SCHEMA: [&str; 6] = [
    "DROP TABLE IF EXISTS orders",
    "DROP TABLE IF EXISTS products",
    "DROP TABLE IF EXISTS users",
    "CREATE TABLE users (
        user_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        region TEXT,
        signup_date DATE
    )",
    "CREATE TABLE products (
        product_id INTEGER PRIMARY KEY,
        product_name TEXT NOT NULL,
        category TEXT,
        price DECIMAL(10, 2)
    )",
    "CREATE TABLE orders (
        order_id INTEGER PRIMARY KEY,
        user_id INTEGER,
        product_id INTEGER,
        quantity INTEGER,
        order_date DATE,
        FOREIGN KEY (user_id) REFERENCES users(user_id),
        FOREIGN KEY (product_id) REFERENCES products(product_id)
    )",
];

const USERS: [(i64, &str, &str, &str, &str); 3] = [
    (1, "Alice Johnson", "alice@example.com", "North", "2023-01-15"),
    (2, "Bob Smith", "bob@example.com", "South", "2023-02-20"),
    (3, "Charlie Brown", "charlie@example.com", "North", "2023-03-10"),
];

const PRODUCTS: [(i64, &str, &str, f64); 4] = [
    (101, "Laptop", "Electronics", 1200.00),
    (102, "Mouse", "Electronics", 25.00),
    (103, "Coffee Maker", "Home", 80.00),
    (104, "Desk Chair", "Furniture", 150.00),
];

const ORDERS: [(i64, i64, i64, i64, &str); 5] = [
    (1001, 1, 101, 1, "2023-04-01"),
    (1002, 1, 102, 2, "2023-04-01"),
    (1003, 2, 103, 1, "2023-04-05"),
    (1004, 3, 104, 1, "2023-04-06"),
    (1005, 1, 103, 1, "2023-05-10"),
];

/// Drop and recreate the demo tables at `database_url`, then load the seed rows.
pub async fn provision_demo_database(database_url: &str) -> Result<()> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse connection string: {}", e)))?
        .create_if_missing(true);

    let mut conn = options
        .connect()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

    let mut tx = conn
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

    for statement in DEMO_SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create schema: {}", e)))?;
    }

    for (user_id, name, email, region, signup_date) in USERS {
        sqlx::query("INSERT INTO users VALUES (?, ?, ?, ?, ?)")
            .bind(user_id)
            .bind(name)
            .bind(email)
            .bind(region)
            .bind(signup_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to seed users: {}", e)))?;
    }

    for (product_id, product_name, category, price) in PRODUCTS {
        sqlx::query("INSERT INTO products VALUES (?, ?, ?, ?)")
            .bind(product_id)
            .bind(product_name)
            .bind(category)
            .bind(price)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to seed products: {}", e)))?;
    }

    for (order_id, user_id, product_id, quantity, order_date) in ORDERS {
        sqlx::query("INSERT INTO orders VALUES (?, ?, ?, ?, ?)")
            .bind(order_id)
            .bind(user_id)
            .bind(product_id)
            .bind(quantity)
            .bind(order_date)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to seed orders: {}", e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit seed data: {}", e)))?;

    conn.close()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to close connection: {}", e)))?;

    info!(
        "Demo database '{}' provisioned ({} users, {} products, {} orders)",
        database_url,
        USERS.len(),
        PRODUCTS.len(),
        ORDERS.len()
    );

    Ok(())
}

/// Seeded database file in the temp directory, removed on drop.
#[cfg(test)]
pub(crate) struct TestDatabase {
    pub url: String,
    path: std::path::PathBuf,
}

#[cfg(test)]
impl TestDatabase {
    pub async fn seeded() -> Self {
        let path = std::env::temp_dir().join(format!("querygate-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        provision_demo_database(&url).await.unwrap();
        Self { url, path }
    }
}

#[cfg(test)]
impl Drop for TestDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
