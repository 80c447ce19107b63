use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::errors::ShopError;
use crate::types::{CartLine, Order, Product, ShopUser};

static SHOP_DB: LazyLock<SqlitePool> = LazyLock::new(|| {
    let url = std::env::var("SHOP_DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://shop.sqlite".to_string());

    tracing::info!("Initializing shop database at {}", url);

    let opts = SqliteConnectOptions::from_str(&url)
        .expect("Failed to parse SQLite connection string")
        .create_if_missing(true);

    SqlitePool::connect_lazy_with(opts)
});

pub(crate) struct ShopStore;

impl ShopStore {
    /// Create the shop tables if they do not exist yet.
    pub(crate) async fn init() -> Result<(), ShopError> {
        let pool = &*SHOP_DB;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS shop_users (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price_cents INTEGER NOT NULL,
                image_url TEXT,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cart_items (
                user_id TEXT NOT NULL,
                product_id TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                PRIMARY KEY (user_id, product_id)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                total_cents INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(())
    }

    // Products

    pub(crate) async fn list_products() -> Result<Vec<Product>, ShopError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))
    }

    pub(crate) async fn get_product(id: &str) -> Result<Option<Product>, ShopError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))
    }

    pub(crate) async fn create_product(
        name: &str,
        description: &str,
        price_cents: i64,
        image_url: Option<&str>,
    ) -> Result<Product, ShopError> {
        let now = Utc::now();
        let product = Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price_cents,
            image_url: image_url.map(|s| s.to_string()),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(product)
    }

    pub(crate) async fn update_product(
        id: &str,
        name: &str,
        description: &str,
        price_cents: i64,
        image_url: Option<&str>,
    ) -> Result<bool, ShopError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price_cents = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price_cents)
        .bind(image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn delete_product(id: &str) -> Result<(), ShopError> {
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    // Users

    pub(crate) async fn get_user_by_email(email: &str) -> Result<Option<ShopUser>, ShopError> {
        sqlx::query_as::<_, ShopUser>("SELECT * FROM shop_users WHERE email = ?")
            .bind(email)
            .fetch_optional(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))
    }

    pub(crate) async fn create_user(
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<ShopUser, ShopError> {
        let user = ShopUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO shop_users (id, email, name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(user)
    }

    // Cart

    pub(crate) async fn cart_lines(user_id: &str) -> Result<Vec<CartLine>, ShopError> {
        sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.product_id, p.name, p.price_cents, c.quantity
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = ?
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))
    }

    /// One row per (user, product); adding an item already in the cart bumps
    /// its quantity.
    pub(crate) async fn add_to_cart(user_id: &str, product_id: &str) -> Result<(), ShopError> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES (?, ?, 1)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = quantity + 1
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    pub(crate) async fn set_cart_quantity(
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), ShopError> {
        if quantity <= 0 {
            return Self::remove_from_cart(user_id, product_id).await;
        }

        sqlx::query(
            r#"
            UPDATE cart_items SET quantity = ?
            WHERE user_id = ? AND product_id = ?
            "#,
        )
        .bind(quantity)
        .bind(user_id)
        .bind(product_id)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    pub(crate) async fn remove_from_cart(user_id: &str, product_id: &str) -> Result<(), ShopError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
            .bind(user_id)
            .bind(product_id)
            .execute(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    pub(crate) async fn clear_cart(user_id: &str) -> Result<(), ShopError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(())
    }

    // Orders

    pub(crate) async fn create_order(user_id: &str, total_cents: i64) -> Result<Order, ShopError> {
        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total_cents,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, total_cents, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.total_cents)
        .bind(&order.status)
        .bind(order.created_at)
        .execute(&*SHOP_DB)
        .await
        .map_err(|e| ShopError::Storage(e.to_string()))?;

        Ok(order)
    }

    pub(crate) async fn get_order(id: &str) -> Result<Option<Order>, ShopError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))
    }

    pub(crate) async fn mark_order_paid(id: &str) -> Result<(), ShopError> {
        let result = sqlx::query("UPDATE orders SET status = 'paid' WHERE id = ?")
            .bind(id)
            .execute(&*SHOP_DB)
            .await
            .map_err(|e| ShopError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ShopError::ResourceNotFound {
                resource_type: "Order".to_string(),
                resource_id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;

    #[tokio::test]
    #[serial_test::serial]
    async fn test_product_crud_roundtrip() {
        init_test_environment().await;

        // Given a created product
        let product = ShopStore::create_product("Teapot", "Stoneware teapot", 2450, None)
            .await
            .expect("create");

        // When reading it back
        let loaded = ShopStore::get_product(&product.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.name, "Teapot");
        assert_eq!(loaded.price_cents, 2450);

        // And updating it
        let updated = ShopStore::update_product(&product.id, "Teapot", "Glazed", 2600, None)
            .await
            .expect("update");
        assert!(updated);
        let loaded = ShopStore::get_product(&product.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.description, "Glazed");

        // Then deleting removes it
        ShopStore::delete_product(&product.id).await.expect("delete");
        assert!(
            ShopStore::get_product(&product.id)
                .await
                .expect("get")
                .is_none()
        );
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_update_missing_product_reports_false() {
        init_test_environment().await;
        let updated = ShopStore::update_product("no-such-id", "X", "Y", 1, None)
            .await
            .expect("update");
        assert!(!updated);
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_cart_quantity_upserts() {
        init_test_environment().await;

        let product = ShopStore::create_product("Mug", "Ceramic mug", 900, None)
            .await
            .expect("create");

        // Adding the same product twice bumps the quantity instead of
        // duplicating the row
        ShopStore::add_to_cart("u1", &product.id).await.expect("add");
        ShopStore::add_to_cart("u1", &product.id).await.expect("add");

        let lines = ShopStore::cart_lines("u1").await.expect("lines");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].line_total_cents(), 1800);

        // Setting quantity to zero drops the line
        ShopStore::set_cart_quantity("u1", &product.id, 0)
            .await
            .expect("set");
        assert!(ShopStore::cart_lines("u1").await.expect("lines").is_empty());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_order_lifecycle() {
        init_test_environment().await;

        let order = ShopStore::create_order("u1", 5000).await.expect("create");
        assert_eq!(order.status, "pending");

        ShopStore::mark_order_paid(&order.id).await.expect("paid");
        let loaded = ShopStore::get_order(&order.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.status, "paid");
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_mark_unknown_order_is_not_found() {
        init_test_environment().await;
        let err = ShopStore::mark_order_paid("no-such-order")
            .await
            .expect_err("unknown order");
        assert!(matches!(err, ShopError::ResourceNotFound { .. }));
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_duplicate_email_rejected() {
        init_test_environment().await;

        ShopStore::create_user("dup@example.com", "First", "hash")
            .await
            .expect("create");
        let err = ShopStore::create_user("dup@example.com", "Second", "hash").await;
        assert!(err.is_err());
    }
}
