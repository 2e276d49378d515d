use crate::catalog::patch::{Patchable, decode_field, unknown_field};
use crate::catalog::validation::{self, FieldViolation};
use crate::entities::actors;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub birth_date: NaiveDate,
    pub photo: Option<String>,
}

impl From<actors::Model> for Actor {
    fn from(model: actors::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            birth_date: model.birth_date,
            photo: model.photo,
        }
    }
}

/// Scalar fields supplied on create and full update.
#[derive(Debug, Clone)]
pub struct ActorInput {
    pub name: String,
    pub birth_date: NaiveDate,
}

impl ActorInput {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldViolation> {
        validation::actor_name(&self.name)
    }
}

/// Patchable projection of an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorPatch {
    pub name: String,
    pub birth_date: NaiveDate,
}

impl From<&Actor> for ActorPatch {
    fn from(actor: &Actor) -> Self {
        Self {
            name: actor.name.clone(),
            birth_date: actor.birth_date,
        }
    }
}

impl Patchable for ActorPatch {
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldViolation> {
        match field {
            "name" => self.name = decode_field(field, value)?,
            "birth_date" => self.birth_date = decode_field(field, value)?,
            _ => return Err(unknown_field(field)),
        }
        Ok(())
    }

    fn validate(&self) -> Vec<FieldViolation> {
        validation::actor_name(&self.name)
    }
}
