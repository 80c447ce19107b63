use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn price_display(&self) -> String {
        format!("${}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ShopUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One cart row joined with its product, as rendered on the cart page.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * self.quantity
    }

    pub fn line_total_display(&self) -> String {
        let total = self.line_total_cents();
        format!("${}.{:02}", total / 100, total % 100)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub total_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        let product = Product {
            id: "p1".to_string(),
            name: "Widget".to_string(),
            description: String::new(),
            price_cents: 1999,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(product.price_display(), "$19.99");
    }

    #[test]
    fn test_line_total() {
        let line = CartLine {
            product_id: "p1".to_string(),
            name: "Widget".to_string(),
            price_cents: 250,
            quantity: 3,
        };
        assert_eq!(line.line_total_cents(), 750);
        assert_eq!(line.line_total_display(), "$7.50");
    }
}
