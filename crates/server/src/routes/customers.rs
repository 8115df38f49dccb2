//! Customer route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use order_desk_core::CustomerId;

use super::RowsAffected;
use crate::db::CustomerRepository;
use crate::error::{AppError, Result};
use crate::models::{Customer, CustomerInput};
use crate::state::AppState;

/// Build the customer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer))
        .route("/customers/", post(create_customer))
        .route(
            "/customers/{customer_id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

/// Customer request body. The ID is server-generated.
#[derive(Debug, Deserialize)]
pub struct CustomerBody {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub name: String,
    pub phone: String,
}

impl CustomerBody {
    fn into_input(self) -> CustomerInput {
        CustomerInput {
            name: self.name,
            phone: self.phone,
        }
    }
}

/// Create a customer.
///
/// POST /customers/
#[instrument(skip(state, body))]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CustomerBody>,
) -> Result<Json<Customer>> {
    if body.customer_id.is_some() {
        return Err(AppError::BadRequest(
            "Customer ID should not be passed!".to_string(),
        ));
    }

    let customer = CustomerRepository::new(state.pool())
        .create(body.into_input())
        .await?;
    tracing::info!(customer_id = %customer.customer_id, "Customer created");
    Ok(Json(customer))
}

/// Get a customer.
///
/// GET /customers/{customer_id}
#[instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Customer>> {
    let customer = CustomerRepository::new(state.pool())
        .get(CustomerId::new(customer_id))
        .await?;
    Ok(Json(customer))
}

/// Replace a customer. The body must carry the same ID as the path.
///
/// PUT /customers/{customer_id}
#[instrument(skip(state, body))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
    Json(body): Json<CustomerBody>,
) -> Result<Json<Customer>> {
    let customer_id = CustomerId::new(customer_id);
    if body.customer_id != Some(customer_id) {
        return Err(AppError::BadRequest("Invalid Customer ID!".to_string()));
    }

    let customer = CustomerRepository::new(state.pool())
        .update(customer_id, body.into_input())
        .await?;
    tracing::info!("Customer updated");
    Ok(Json(customer))
}

/// Delete a customer.
///
/// DELETE /customers/{customer_id}
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<RowsAffected>> {
    let rows = CustomerRepository::new(state.pool())
        .delete(CustomerId::new(customer_id))
        .await?;
    tracing::info!(rows, "Customer deleted");
    Ok(Json(RowsAffected::new(rows)))
}
