//! Integration tests for constraint handling in the entity repositories.

#![allow(clippy::unwrap_used)]

use order_desk_core::ItemId;
use order_desk_integration_tests::{add_customer, add_item, rows, test_pool};
use order_desk_server::db::{CustomerRepository, ItemRepository, RepositoryError, Table};
use order_desk_server::models::{CustomerInput, NewOrder};
use order_desk_server::services::OrderService;

#[tokio::test]
async fn test_duplicate_phone_conflicts() {
    let pool = test_pool().await;
    add_customer(&pool, "Ada", "5550000001").await;

    let before = rows(&pool, Table::Customers).await;
    let err = CustomerRepository::new(&pool)
        .create(CustomerInput {
            name: "Imposter".to_string(),
            phone: "5550000001".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict(ref msg) if msg == "Mobile Number already exists"));
    assert_eq!(rows(&pool, Table::Customers).await, before);
}

#[tokio::test]
async fn test_customer_with_orders_cannot_be_deleted() {
    let pool = test_pool().await;
    let customer = add_customer(&pool, "Ada", "111").await;
    OrderService::new(&pool)
        .create(&NewOrder {
            customer_id: customer,
            notes: String::new(),
            items: Vec::new(),
        })
        .await
        .unwrap();

    let err = CustomerRepository::new(&pool)
        .delete(customer)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict(_)));
    assert_eq!(rows(&pool, Table::Customers).await, 1);
    assert_eq!(rows(&pool, Table::Orders).await, 1);
}

#[tokio::test]
async fn test_item_on_an_order_cannot_be_deleted() {
    let pool = test_pool().await;
    let customer = add_customer(&pool, "Ada", "111").await;
    let tea = add_item(&pool, "Tea", 200).await;
    OrderService::new(&pool)
        .create(&NewOrder {
            customer_id: customer,
            notes: String::new(),
            items: vec![tea],
        })
        .await
        .unwrap();

    let err = ItemRepository::new(&pool).delete(tea).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
async fn test_unused_item_deletes() {
    let pool = test_pool().await;
    let tea = add_item(&pool, "Tea", 200).await;
    let repo = ItemRepository::new(&pool);

    assert_eq!(repo.delete(tea).await.unwrap(), 1);
    assert!(matches!(
        repo.delete(tea).await.unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
    assert!(matches!(
        repo.get(ItemId::new(1)).await.unwrap_err(),
        RepositoryError::NotFound { .. }
    ));
}
