//! Failures and warnings produced while loading a body description.

use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Fatal problems with a body description. Nothing built before the failure is kept.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("description is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("description must be a list of bodies or an object holding \"Astronomical Objects\"")]
    NotAList,

    #[error("declaration #{index} is not an object")]
    NotARecord { index: usize },

    #[error("declaration #{index}{}: field `{field}` is invalid ({reason})", display_name(.name))]
    InvalidField {
        index: usize,
        name: Option<String>,
        field: &'static str,
        reason: &'static str,
    },

    #[error("declaration #{index}: body name \"{name}\" is already taken")]
    DuplicateName { index: usize, name: String },
}

fn display_name(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" (\"{name}\")"),
        None => String::new(),
    }
}

/// Recoverable conditions. Loading carries on with degraded visuals.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadWarning {
    #[error("{body} has an orbital period of 0 and will stay put on its orbit, was this intentional?")]
    ZeroOrbitalPeriod { body: String },

    #[error("{body} has a self rotation period of 0 and will not spin, was this intentional?")]
    ZeroRotationPeriod { body: String },

    #[error("{parent} was declared as the parent of {body} but is not declared above it; {body} orbits the origin instead")]
    UnresolvedParent { body: String, parent: String },

    #[error("texture \"{source_ref}\" for {body} could not be registered; falling back to its color")]
    TextureUnavailable { body: String, source_ref: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_names_declaration_and_field() {
        let err = LoadError::InvalidField {
            index: 3,
            name: Some("Moon".to_string()),
            field: "parent_distance",
            reason: "required when a parent is declared",
        };
        let message = err.to_string();
        assert!(message.contains("#3"));
        assert!(message.contains("\"Moon\""));
        assert!(message.contains("`parent_distance`"));
    }

    #[test]
    fn invalid_field_without_name() {
        let err = LoadError::InvalidField {
            index: 0,
            name: None,
            field: "name",
            reason: "expected a string",
        };
        assert_eq!(err.to_string(), "declaration #0: field `name` is invalid (expected a string)");
    }
}
