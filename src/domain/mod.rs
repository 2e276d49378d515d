//! Vocabulary shared by the service and API layers.

use std::fmt;

/// Which kind of catalog entity an error or log line is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Movie,
    Actor,
    Genre,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Actor => "actor",
            Self::Genre => "genre",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_display() {
        assert_eq!(EntityKind::Genre.to_string(), "genre");
        assert_eq!(EntityKind::Movie.as_str(), "movie");
        assert_eq!(format!("{} not found", EntityKind::Actor), "actor not found");
    }
}
