//! CRUD store integration tests.
//!
//! Exercises the Lego and restaurant tables through the store functions.

use super::{get_test_client, unique_name};
use pretty_assertions::assert_eq;
use serde_json::json;
use sql_playground::store::bricks::{self, BrickFilter, BrickInput};
use sql_playground::store::menu::{self, MenuFilter};
use sql_playground::store::orders::{self, OrderFilter, OrderInput, OrderItemInput, OrderUpdate};
use sql_playground::store::sets::{self, SetFilter, SetInput};
use sql_playground::store::{migrations, seed};

#[tokio::test]
async fn test_migrations_and_seed_are_repeatable() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let pool = client.pool();

    migrations::run_migrations(pool).await.unwrap();
    seed::seed_database(pool).await.unwrap();

    assert_eq!(migrations::get_current_version(pool).await.unwrap(), 1);
    let menu = menu::list_menu_items(pool, &MenuFilter::default())
        .await
        .unwrap();
    let names: Vec<&str> = menu.iter().map(|m| m.name.as_str()).collect();
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(names.len(), unique.len());
    assert!(names.contains(&"Buffalo Wings"));
}

#[tokio::test]
async fn test_brick_lifecycle() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let pool = client.pool();
    let color = unique_name("teal");

    let new_brick = BrickInput {
        name: Some("Classic".to_string()),
        color: Some(color.clone()),
        size: Some("2x4".to_string()),
        shape: Some("rectangle".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let created = bricks::create_brick(pool, &new_brick).await.unwrap();
    assert_eq!(created.quantity, 1);

    let filter = BrickFilter {
        color: Some(color.clone()),
        ..Default::default()
    };
    let listed = bricks::list_bricks(pool, &filter).await.unwrap();
    assert_eq!(listed.len(), 1);

    let changes = BrickInput {
        name: Some(String::new()),
        quantity: Some(12),
        ..Default::default()
    };
    let updated = bricks::update_brick(pool, &created.id, &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Classic");
    assert_eq!(updated.quantity, 12);
    assert!(updated.updated_at >= created.updated_at);

    let removed = bricks::delete_brick(pool, &created.id).await.unwrap();
    assert_eq!(removed.map(|b| b.id), Some(created.id.clone()));
    assert!(bricks::get_brick(pool, &created.id).await.unwrap().is_none());
    assert!(bricks::delete_brick(pool, &created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_update_validates_piece_count() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let pool = client.pool();
    let theme = unique_name("Space");

    let new_set = SetInput {
        name: Some("Rocket".to_string()),
        theme: Some(theme.clone()),
        piece_count: Some(json!(120)),
        difficulty: Some("Medium".to_string()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let created = sets::create_set(pool, &new_set).await.unwrap();

    let bad = SetInput {
        piece_count: Some(json!(-4)),
        ..Default::default()
    };
    assert!(sets::update_set(pool, &created.id, &bad).await.is_err());

    let missing = SetInput {
        piece_count: Some(json!(-4)),
        ..Default::default()
    };
    assert!(sets::update_set(pool, "no-such-set", &missing)
        .await
        .unwrap()
        .is_none());

    let filter = SetFilter {
        theme: Some(theme),
        ..Default::default()
    };
    assert_eq!(sets::list_sets(pool, &filter).await.unwrap().len(), 1);

    sets::delete_set(pool, &created.id).await.unwrap();
}

#[tokio::test]
async fn test_order_lifecycle() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let pool = client.pool();

    let menu = menu::list_menu_items(pool, &MenuFilter::default())
        .await
        .unwrap();
    let first = &menu[0];
    let second = &menu[1];

    let order = OrderInput {
        customer_name: Some(unique_name("Guest")),
        table_number: Some(json!(9)),
        items: Some(vec![
            OrderItemInput {
                menu_item_id: first.id.clone(),
                quantity: Some(2),
                special_requests: None,
            },
            OrderItemInput {
                menu_item_id: second.id.clone(),
                quantity: None,
                special_requests: Some("No onions".to_string()),
            },
        ]),
        notes: None,
    }
    .validate()
    .unwrap();

    let created = orders::create_order(pool, &order).await.unwrap();
    let expected = first.price * 2.0 + second.price;
    assert!((created.order.total_price - expected).abs() < 1e-9);
    assert_eq!(created.order.status, "PENDING");
    assert_eq!(created.items.len(), 2);
    assert!(created.items.iter().all(|line| line.menu_item.is_some()));

    let update = OrderUpdate {
        status: Some("READY".to_string()),
        notes: None,
    };
    let updated = orders::update_order(pool, &created.order.id, &update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.order.status, "READY");

    let invalid = OrderUpdate {
        status: Some("ready".to_string()),
        notes: None,
    };
    assert!(orders::update_order(pool, &created.order.id, &invalid)
        .await
        .is_err());

    let filter = OrderFilter {
        status: Some("ready".to_string()),
        table_number: Some("9".to_string()),
    };
    let ready = orders::list_orders(pool, &filter).await.unwrap();
    assert!(ready.iter().any(|o| o.order.id == created.order.id));

    let removed = orders::delete_order(pool, &created.order.id).await.unwrap();
    assert!(removed.is_some());
    assert!(orders::get_order(pool, &created.order.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_order_with_unknown_dish_is_rejected() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let pool = client.pool();

    let order = OrderInput {
        customer_name: Some("Ghost".to_string()),
        table_number: Some(json!(1)),
        items: Some(vec![OrderItemInput {
            menu_item_id: "no-such-dish".to_string(),
            quantity: Some(1),
            special_requests: None,
        }]),
        notes: None,
    }
    .validate()
    .unwrap();

    assert!(orders::create_order(pool, &order).await.is_err());
}
