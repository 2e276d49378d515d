use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreInput {
    pub name: String,
}

impl From<crate::entities::genres::Model> for Genre {
    fn from(model: crate::entities::genres::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}
