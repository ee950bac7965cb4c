//! Sample restaurant data for the console to query.
//!
//! Seeding is repeatable: menu items and users are skipped when their unique
//! key already exists, and orders are only created while the orders table is
//! empty.

use sqlx::postgres::PgPool;
use tracing::info;

use crate::error::{PlaygroundError, Result};

struct SeedDish {
    name: &'static str,
    description: &'static str,
    price: f64,
    category: &'static str,
    prep_time: i32,
}

struct SeedUser {
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    city: &'static str,
}

struct SeedOrder {
    customer_name: &'static str,
    /// Email of the ordering user, when the customer has an account.
    user_email: Option<&'static str>,
    table_number: i32,
    status: &'static str,
    total_price: f64,
    notes: Option<&'static str>,
    /// Dish names with quantities.
    lines: &'static [(&'static str, i32)],
}

const MENU: &[SeedDish] = &[
    SeedDish {
        name: "Buffalo Wings",
        description: "Crispy chicken wings tossed in spicy buffalo sauce",
        price: 12.99,
        category: "Appetizers",
        prep_time: 15,
    },
    SeedDish {
        name: "Mozzarella Sticks",
        description: "Golden fried mozzarella with marinara sauce",
        price: 9.99,
        category: "Appetizers",
        prep_time: 10,
    },
    SeedDish {
        name: "Caesar Salad",
        description: "Fresh romaine lettuce with Caesar dressing and croutons",
        price: 11.99,
        category: "Appetizers",
        prep_time: 8,
    },
    SeedDish {
        name: "Grilled Salmon",
        description: "Atlantic salmon grilled to perfection with lemon herb butter",
        price: 24.99,
        category: "Main Courses",
        prep_time: 25,
    },
    SeedDish {
        name: "BBQ Burger",
        description: "Juicy beef patty with BBQ sauce, bacon, and cheddar cheese",
        price: 16.99,
        category: "Main Courses",
        prep_time: 20,
    },
    SeedDish {
        name: "Chicken Alfredo",
        description: "Creamy alfredo pasta with grilled chicken breast",
        price: 18.99,
        category: "Main Courses",
        prep_time: 22,
    },
    SeedDish {
        name: "Vegetable Stir Fry",
        description: "Fresh seasonal vegetables in garlic soy sauce",
        price: 14.99,
        category: "Main Courses",
        prep_time: 15,
    },
    SeedDish {
        name: "Chocolate Lava Cake",
        description: "Warm chocolate cake with molten center and vanilla ice cream",
        price: 8.99,
        category: "Desserts",
        prep_time: 12,
    },
    SeedDish {
        name: "Cheesecake",
        description: "New York style cheesecake with berry compote",
        price: 7.99,
        category: "Desserts",
        prep_time: 5,
    },
    SeedDish {
        name: "Fresh Lemonade",
        description: "House-made lemonade with fresh lemons",
        price: 3.99,
        category: "Beverages",
        prep_time: 3,
    },
    SeedDish {
        name: "Iced Coffee",
        description: "Cold brew coffee served over ice",
        price: 4.99,
        category: "Beverages",
        prep_time: 2,
    },
];

const USERS: &[SeedUser] = &[
    SeedUser {
        email: "john.smith@email.com",
        first_name: "John",
        last_name: "Smith",
        city: "New York",
    },
    SeedUser {
        email: "sarah.johnson@email.com",
        first_name: "Sarah",
        last_name: "Johnson",
        city: "Los Angeles",
    },
    SeedUser {
        email: "michael.chen@email.com",
        first_name: "Michael",
        last_name: "Chen",
        city: "San Francisco",
    },
    SeedUser {
        email: "emily.davis@email.com",
        first_name: "Emily",
        last_name: "Davis",
        city: "Chicago",
    },
    SeedUser {
        email: "david.wilson@email.com",
        first_name: "David",
        last_name: "Wilson",
        city: "Miami",
    },
    SeedUser {
        email: "lisa.brown@email.com",
        first_name: "Lisa",
        last_name: "Brown",
        city: "Seattle",
    },
];

const ORDERS: &[SeedOrder] = &[
    SeedOrder {
        customer_name: "John Smith",
        user_email: Some("john.smith@email.com"),
        table_number: 5,
        status: "CONFIRMED",
        total_price: 45.97,
        notes: Some("No onions please"),
        lines: &[("Grilled Salmon", 1), ("Caesar Salad", 1), ("Fresh Lemonade", 2)],
    },
    SeedOrder {
        customer_name: "Sarah Johnson",
        user_email: Some("sarah.johnson@email.com"),
        table_number: 12,
        status: "PREPARING",
        total_price: 33.98,
        notes: None,
        lines: &[("BBQ Burger", 2), ("Buffalo Wings", 1)],
    },
    SeedOrder {
        customer_name: "Michael Chen",
        user_email: Some("michael.chen@email.com"),
        table_number: 8,
        status: "READY",
        total_price: 27.98,
        notes: None,
        lines: &[("Chicken Alfredo", 1), ("Chocolate Lava Cake", 1)],
    },
    SeedOrder {
        customer_name: "Emily Davis",
        user_email: Some("emily.davis@email.com"),
        table_number: 3,
        status: "DELIVERED",
        total_price: 52.96,
        notes: None,
        lines: &[("Grilled Salmon", 2), ("Caesar Salad", 1)],
    },
    SeedOrder {
        customer_name: "David Wilson",
        user_email: None,
        table_number: 15,
        status: "PENDING",
        total_price: 16.99,
        notes: None,
        lines: &[("BBQ Burger", 1)],
    },
    SeedOrder {
        customer_name: "Lisa Brown",
        user_email: Some("lisa.brown@email.com"),
        table_number: 7,
        status: "CONFIRMED",
        total_price: 41.97,
        notes: Some("Extra sauce on the side"),
        lines: &[("Buffalo Wings", 2), ("Caesar Salad", 1), ("Fresh Lemonade", 1)],
    },
];

/// Inserts the sample menu, users and orders.
pub async fn seed_database(pool: &PgPool) -> Result<()> {
    info!("Seeding the database");

    let mut tx = pool.begin().await?;

    for dish in MENU {
        sqlx::query(
            r#"
            INSERT INTO menu_items (name, description, price, category, "prepTime")
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(dish.name)
        .bind(dish.description)
        .bind(dish.price)
        .bind(dish.category)
        .bind(dish.prep_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| PlaygroundError::database(format!("Failed to seed menu item: {e}")))?;
    }

    for user in USERS {
        sqlx::query(
            r#"
            INSERT INTO users (email, "firstName", "lastName", city, country)
            VALUES ($1, $2, $3, $4, 'USA')
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(user.email)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.city)
        .execute(&mut *tx)
        .await
        .map_err(|e| PlaygroundError::database(format!("Failed to seed user: {e}")))?;
    }

    let existing_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(&mut *tx)
        .await?;

    if existing_orders == 0 {
        for order in ORDERS {
            let order_id: String = sqlx::query_scalar(
                r#"
                INSERT INTO orders ("customerName", "userId", "tableNumber", status, "totalPrice", notes)
                VALUES ($1, (SELECT id FROM users WHERE email = $2), $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(order.customer_name)
            .bind(order.user_email)
            .bind(order.table_number)
            .bind(order.status)
            .bind(order.total_price)
            .bind(order.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| PlaygroundError::database(format!("Failed to seed order: {e}")))?;

            for (dish, quantity) in order.lines {
                sqlx::query(
                    r#"
                    INSERT INTO order_items ("orderId", "menuItemId", quantity)
                    SELECT $1, id, $3 FROM menu_items WHERE name = $2
                    "#,
                )
                .bind(&order_id)
                .bind(*dish)
                .bind(*quantity)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    PlaygroundError::database(format!("Failed to seed order item: {e}"))
                })?;
            }
        }
    } else {
        info!("Orders already present, skipping sample orders");
    }

    tx.commit().await?;

    info!(
        "Seeded {} menu items, {} users and {} orders",
        MENU.len(),
        USERS.len(),
        ORDERS.len()
    );
    Ok(())
}
