//! Contact HTTP Routes
//!
//! CRUD endpoints for the `contatos` collection.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::response::MessageResponse;
use crate::model::{Contact, ContactFields};
use crate::schema::validate_into;
use crate::store::{Collection, DocumentStore};

const CREATED: &str = "Contato criado com sucesso.";
const UPDATED: &str = "Contato atualizado com sucesso!";
const REMOVED: &str = "Contato removido com sucesso!";
const NOT_FOUND: &str = "Contato não encontrado";

const CREATE_FAILED: &str = "Erro ao adicionar um novo contato";
const UPDATE_FAILED: &str = "Erro ao atualizar o contato";
const REMOVE_FAILED: &str = "Erro ao remover o contato";
const LIST_FAILED: &str = "Erro ao listar os contatos";
const FETCH_FAILED: &str = "Erro ao buscar o contato";

// ==================
// Shared State
// ==================

/// Contact state shared across handlers
pub struct ContactState {
    pub contacts: Collection<Contact>,
}

impl ContactState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            contacts: Collection::new(store),
        }
    }
}

/// Contact routes with shared state
pub fn contact_routes(state: Arc<ContactState>) -> Router {
    Router::new()
        .route("/contatos", get(list_contacts_handler).post(create_contact_handler))
        .route(
            "/contatos/:id",
            get(get_contact_handler)
                .put(update_contact_handler)
                .delete(delete_contact_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn create_contact_handler(
    State(state): State<Arc<ContactState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = body?;
    let fields: ContactFields = validate_into(ContactFields::schema(), &input)?;

    state
        .contacts
        .create(&fields)
        .await
        .map_err(ApiError::store(CREATE_FAILED))?;

    Ok(Json(MessageResponse::new(CREATED)))
}

async fn list_contacts_handler(
    State(state): State<Arc<ContactState>>,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = state
        .contacts
        .list_all()
        .await
        .map_err(ApiError::store(LIST_FAILED))?;

    Ok(Json(contacts))
}

async fn get_contact_handler(
    State(state): State<Arc<ContactState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Contact>> {
    state
        .contacts
        .get_by_id(&id)
        .await
        .map_err(ApiError::store(FETCH_FAILED))?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

async fn update_contact_handler(
    State(state): State<Arc<ContactState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(input) = body?;
    let fields: ContactFields = validate_into(ContactFields::schema(), &input)?;

    state
        .contacts
        .update_by_id(&id, &fields)
        .await
        .map_err(ApiError::store(UPDATE_FAILED))?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(MessageResponse::new(UPDATED)))
}

async fn delete_contact_handler(
    State(state): State<Arc<ContactState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .contacts
        .delete_by_id(&id)
        .await
        .map_err(ApiError::store(REMOVE_FAILED))?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    Ok(Json(MessageResponse::new(REMOVED)))
}
