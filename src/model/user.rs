//! User records
//!
//! `senha` arrives as plaintext, is validated for length, and is replaced
//! by its Argon2id hash before it is written. Stored users never
//! serialize the hash.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::credentials::{hash_password, CredentialResult};
use crate::schema::{FieldRule, Schema};
use crate::store::Entity;

/// Writable user fields, as accepted on POST and PUT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFields {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

impl UserFields {
    /// Rule set for user payloads
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(
                "usuario",
                vec![
                    FieldRule::string("nome").required().max(150),
                    FieldRule::string("email").required().email(),
                    FieldRule::string("senha").required().min(6),
                ],
            )
        })
    }

    /// Replace the plaintext password with its hash
    pub fn with_hashed_password(self) -> CredentialResult<Self> {
        let senha = hash_password(&self.senha)?;
        Ok(Self { senha, ..self })
    }
}

/// A stored user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub nome: String,
    pub email: String,
    /// Argon2id hash (never serialized)
    #[serde(default, skip_serializing)]
    pub senha: String,
}

impl Entity for User {
    type Fields = UserFields;
    const COLLECTION: &'static str = "usuarios";

    fn id(&self) -> &str {
        &self.id
    }
}
