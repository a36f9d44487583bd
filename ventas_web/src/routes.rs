use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use ventas::{
    domain::{
        customer::{Customer, Purchase},
        query::CustomerQueryService,
    },
    infrastructure::JsonFileCustomerRepository,
};

use crate::error::ApiError;

pub type QueryState = Arc<CustomerQueryService<JsonFileCustomerRepository>>;

pub fn routes(service: QueryState) -> Router {
    Router::new()
        .route("/api", get(list_customers))
        .route("/api/tienda/:ciudad", get(customers_by_store))
        .route(
            "/api/apellido_nombre/:apellido/:nombre",
            get(customers_by_name),
        )
        .route("/api/apellido/:apellido", get(customers_by_name_prefix))
        .route("/api/marca/:marca", get(purchases_by_brand))
        .with_state(service)
}

async fn list_customers(
    State(service): State<QueryState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(service.list_customers().await?))
}

async fn customers_by_store(
    State(service): State<QueryState>,
    ciudad: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Path(ciudad) = ciudad?;
    Ok(Json(service.find_by_store(&ciudad).await?))
}

async fn customers_by_name(
    State(service): State<QueryState>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Path((apellido, nombre)) = params?;
    Ok(Json(service.find_by_name(&apellido, &nombre).await?))
}

#[derive(Debug, Deserialize)]
struct NamePrefix {
    nombre: Option<String>,
}

async fn customers_by_name_prefix(
    State(service): State<QueryState>,
    apellido: Result<Path<String>, PathRejection>,
    query: Result<Query<NamePrefix>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Path(apellido) = apellido?;
    // 解釈できないクエリは `nombre` なしと同じ扱い
    let nombre = query.ok().and_then(|Query(query)| query.nombre);
    Ok(Json(
        service
            .find_by_name_prefix(&apellido, nombre.as_deref())
            .await?,
    ))
}

async fn purchases_by_brand(
    State(service): State<QueryState>,
    marca: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Purchase>>, ApiError> {
    let Path(marca) = marca?;
    Ok(Json(service.find_purchases_by_brand(&marca).await?))
}
