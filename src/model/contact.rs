//! Contact records

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRule, Schema};
use crate::store::Entity;

/// Writable contact fields, as accepted on POST and PUT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFields {
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sobrenome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub telefone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorito: Option<bool>,
}

impl ContactFields {
    /// Rule set for contact payloads
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(
                "contato",
                vec![
                    FieldRule::string("nome").required().max(150),
                    FieldRule::string("sobrenome").max(150),
                    FieldRule::string("email").email(),
                    FieldRule::string("telefone").required(),
                    FieldRule::string("observacoes").max(200),
                    FieldRule::boolean("favorito"),
                ],
            )
        })
    }
}

/// A stored contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: ContactFields,
}

impl Entity for Contact {
    type Fields = ContactFields;
    const COLLECTION: &'static str = "contatos";

    fn id(&self) -> &str {
        &self.id
    }
}
