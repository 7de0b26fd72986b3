//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs carry these wrappers instead of raw primitives so that
//! identifiers and text constraints are enforced at the boundary, when rows
//! and form payloads are converted into domain values.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Macro to generate newtypes for trimmed, non-empty text values.
macro_rules! text_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Trims whitespace and rejects empty inputs.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper returning the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ProjectId, "Identifier of a project.", "project id");
id_newtype!(CommentId, "Identifier of a comment.", "comment id");

text_newtype!(
    UserId,
    "Subject identifier issued by the external auth service.",
    "user id"
);
text_newtype!(DisplayName, "Public display name of a profile.", "display name");
text_newtype!(ProjectTitle, "Title of a project.", "project title");
text_newtype!(CommentBody, "Body text of a comment.", "comment body");
text_newtype!(
    Subcategory,
    "Free-form subcategory label attached to a project or profile.",
    "subcategory"
);
text_newtype!(Tag, "A single project tag.", "tag");
text_newtype!(CourseSlug, "URL slug of a course landing page.", "course slug");

/// Closed set of top-level project categories.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Web,
    App,
    Game,
    Design,
    Data,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Web,
        Category::App,
        Category::Game,
        Category::Design,
        Category::Data,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::App => "app",
            Category::Game => "game",
            Category::Design => "design",
            Category::Data => "data",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "web" => Ok(Category::Web),
            "app" => Ok(Category::App),
            "game" => Ok(Category::Game),
            "design" => Ok(Category::Design),
            "data" => Ok(Category::Data),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown category: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_newtype_rejects_non_positive() {
        assert!(ProjectId::new(1).is_ok());
        assert!(ProjectId::new(0).is_err());
        assert!(CommentId::new(-5).is_err());
    }

    #[test]
    fn text_newtype_trims_and_rejects_empty() {
        let title = ProjectTitle::new("  Chess engine  ").unwrap();
        assert_eq!(title.as_str(), "Chess engine");
        assert!(ProjectTitle::new("   ").is_err());
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("robotics".parse::<Category>().is_err());
    }
}
