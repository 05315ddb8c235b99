use serde::{Deserialize, Serialize};
use validator::Validate;

/// A table as it is presented to the model: a name and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TableSchema {
    #[validate(length(min = 1))]
    pub name: String,
    pub columns: Vec<String>,
}

impl TableSchema {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Ordered list of tables. Only rendered into prompts, never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SchemaDescriptor {
    #[validate(nested)]
    pub tables: Vec<TableSchema>,
}

impl SchemaDescriptor {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self::new(vec![
            TableSchema::new(
                "users",
                &["user_id", "name", "email", "region", "signup_date"],
            ),
            TableSchema::new(
                "products",
                &["product_id", "product_name", "category", "price"],
            ),
            TableSchema::new(
                "orders",
                &["order_id", "user_id", "product_id", "quantity", "order_date"],
            ),
        ])
    }
}

/// A worked question/query pair shown to the model ahead of every prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FewShotExample {
    #[validate(length(min = 1))]
    pub question: String,
    #[validate(length(min = 1))]
    pub sql: String,
}

pub fn default_examples() -> Vec<FewShotExample> {
    vec![
        FewShotExample {
            question: "Show all users from the North region".to_string(),
            sql: "SELECT * FROM users WHERE region = 'North';".to_string(),
        },
        FewShotExample {
            question: "Get total quantity sold for each product".to_string(),
            sql: "SELECT p.product_name, SUM(o.quantity) as total_sold FROM products p JOIN orders o ON p.product_id = o.product_id GROUP BY p.product_id, p.product_name;".to_string(),
        },
    ]
}
