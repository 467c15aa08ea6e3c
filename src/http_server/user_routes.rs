//! User HTTP Routes
//!
//! CRUD endpoints for the `usuarios` collection, mounted under `/usuario`.
//! Passwords are hashed before they reach the store and are never
//! returned.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::response::MessageResponse;
use crate::credentials::CredentialError;
use crate::model::{User, UserFields};
use crate::schema::validate_into;
use crate::store::{Collection, DocumentStore};

const CREATED: &str = "Usuário criado com sucesso.";
const UPDATED: &str = "Usuário atualizado com sucesso!";
const REMOVED: &str = "Usuário removido com sucesso!";
const NOT_FOUND: &str = "Usuário não encontrado";

const CREATE_FAILED: &str = "Erro ao adicionar um novo usuário";
const UPDATE_FAILED: &str = "Erro ao atualizar o usuário";
const REMOVE_FAILED: &str = "Erro ao remover o usuário";
const LIST_FAILED: &str = "Erro ao listar os usuários";
const FETCH_FAILED: &str = "Erro ao buscar o usuário";

/// User state shared across handlers
pub struct UserState {
    pub users: Collection<User>,
}

impl UserState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Collection::new(store),
        }
    }
}

/// User routes with shared state
pub fn user_routes(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/usuario", get(list_users_handler).post(create_user_handler))
        .route(
            "/usuario/:id",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}

/// Validate a user payload and hash its password on the blocking pool
async fn user_fields(input: &Value, failure: &'static str) -> ApiResult<UserFields> {
    let fields: UserFields = validate_into(UserFields::schema(), input)?;
    tokio::task::spawn_blocking(move || fields.with_hashed_password())
        .await
        .map_err(|e| CredentialError::HashingFailed(e.to_string()))
        .and_then(|hashed| hashed)
        .map_err(ApiError::credentials(failure))
}

async fn list_users_handler(State(state): State<Arc<UserState>>) -> ApiResult<Json<Vec<User>>> {
    let users = state
        .users
        .list_all()
        .await
        .map_err(ApiError::store(LIST_FAILED))?;

    Ok(Json(users))
}

async fn get_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get_by_id(&id)
        .await
        .map_err(ApiError::store(FETCH_FAILED))?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

async fn create_user_handler(
    State(state): State<Arc<UserState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = body?;
    let fields = user_fields(&input, CREATE_FAILED).await?;

    state
        .users
        .create(&fields)
        .await
        .map_err(ApiError::store(CREATE_FAILED))?;

    Ok(Json(MessageResponse::new(CREATED)))
}

async fn update_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = body?;
    let fields = user_fields(&input, UPDATE_FAILED).await?;

    state
        .users
        .update_by_id(&id, &fields)
        .await
        .map_err(ApiError::store(UPDATE_FAILED))?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(MessageResponse::new(UPDATED)))
}

async fn delete_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .users
        .delete_by_id(&id)
        .await
        .map_err(ApiError::store(REMOVE_FAILED))?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(MessageResponse::new(REMOVED)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::verify_password;
    use serde_json::json;

    #[tokio::test]
    async fn test_user_fields_hashes_password() {
        let input = json!({ "nome": "Ana", "email": "ana@x.com", "senha": "123456" });
        let fields = user_fields(&input, CREATE_FAILED).await.unwrap();

        assert_eq!(fields.nome, "Ana");
        assert_ne!(fields.senha, "123456");
        assert!(verify_password("123456", &fields.senha).unwrap());
    }

    #[tokio::test]
    async fn test_user_fields_rejects_before_hashing() {
        let err = user_fields(&json!({ "senha": "123" }), CREATE_FAILED)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
