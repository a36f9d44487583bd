use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;
use ventas::domain::{
    query::{NotFound, QueryError},
    DataAccessError,
};

/// 照会エラーのHTTPレスポンス表現
///
/// 500系の詳細はクライアントへ返さない（ログのみ）。
#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    /// パスパラメータを取り出せない（不正なUTF-8など）
    InvalidPath(PathRejection),
}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        debug!("パスパラメータ不正: {}", value);
        Self::InvalidPath(value)
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, Value) {
        let error = match self {
            Self::Query(error) => error,
            Self::InvalidPath(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    json!({ "message": "Parámetro de ruta no válido." }),
                )
            }
        };
        match error {
            QueryError::DataAccess(DataAccessError::ReadError(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "No se pudo cargar los datos." }),
            ),
            QueryError::DataAccess(DataAccessError::ParseError(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Error al parsear los datos." }),
            ),
            QueryError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": format!("Falta el parámetro {}", name) }),
            ),
            QueryError::NotFound(NotFound::Store) => (
                StatusCode::NOT_FOUND,
                json!({ "message": "No se encontraron compras en esta tienda." }),
            ),
            QueryError::NotFound(NotFound::Customer) => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Cliente no encontrado." }),
            ),
            QueryError::NotFound(NotFound::Brand) => (
                StatusCode::NOT_FOUND,
                json!({ "message": "No se encontraron productos de esta marca." }),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
