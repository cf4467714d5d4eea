//! Category domain errors

use super::validation::FieldError;
use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Category operation error
///
/// Every variant except `Store` is detected before a write is issued.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("Category slug '{0}' already exists")]
    SlugConflict(String),

    #[error("Category {id} cannot be placed under {parent}: circular reference")]
    Cycle { id: i64, parent: i64, chain: Vec<i64> },

    #[error("Category {id} has {children} child categories")]
    HasChildren { id: i64, children: u64 },

    #[error("Category {0} not found")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] RepoError),
}

pub type CategoryResult<T> = Result<T, CategoryError>;

impl CategoryError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(id: i64) -> Self {
        Self::NotFound(id.to_string())
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        let message = err.to_string();
        match err {
            CategoryError::Validation(errors) => {
                AppError::with_message(ErrorCode::ValidationFailed, message).with_detail(
                    "fields",
                    serde_json::to_value(&errors).unwrap_or_default(),
                )
            }
            CategoryError::SlugConflict(slug) => {
                AppError::with_message(ErrorCode::CategorySlugExists, message)
                    .with_detail("slug", slug)
            }
            CategoryError::Cycle { id, parent, chain } => {
                AppError::with_message(ErrorCode::CategoryCircularReference, message)
                    .with_detail("id", id)
                    .with_detail("parent", parent)
                    .with_detail("chain", chain)
            }
            CategoryError::HasChildren { id, children } => {
                AppError::with_message(ErrorCode::CategoryHasChildren, message)
                    .with_detail("id", id)
                    .with_detail("children", children)
            }
            CategoryError::NotFound(key) => {
                AppError::with_message(ErrorCode::CategoryNotFound, message)
                    .with_detail("resource", key)
            }
            CategoryError::Store(RepoError::NotFound(msg)) => {
                AppError::with_message(ErrorCode::CategoryNotFound, msg)
            }
            CategoryError::Store(RepoError::Duplicate(msg)) => AppError::conflict(msg),
            CategoryError::Store(RepoError::Database(msg)) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_taxonomy_maps_to_codes() {
        let cases = [
            (
                CategoryError::field("name", "name must not be empty"),
                ErrorCode::ValidationFailed,
                StatusCode::BAD_REQUEST,
            ),
            (
                CategoryError::SlugConflict("oak".into()),
                ErrorCode::CategorySlugExists,
                StatusCode::CONFLICT,
            ),
            (
                CategoryError::Cycle {
                    id: 1,
                    parent: 3,
                    chain: vec![3, 2, 1],
                },
                ErrorCode::CategoryCircularReference,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CategoryError::HasChildren { id: 1, children: 1 },
                ErrorCode::CategoryHasChildren,
                StatusCode::CONFLICT,
            ),
            (
                CategoryError::not_found(9),
                ErrorCode::CategoryNotFound,
                StatusCode::NOT_FOUND,
            ),
            (
                CategoryError::Store(RepoError::Database("down".into())),
                ErrorCode::DatabaseError,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, code, status) in cases {
            let app: AppError = err.into();
            assert_eq!(app.code, code);
            assert_eq!(app.http_status(), status);
        }
    }

    #[test]
    fn test_details_carry_structure() {
        let app: AppError = CategoryError::Cycle {
            id: 1,
            parent: 3,
            chain: vec![3, 2, 1],
        }
        .into();
        let details = app.details.unwrap();
        assert_eq!(details["chain"], serde_json::json!([3, 2, 1]));

        let app: AppError = CategoryError::Validation(vec![FieldError::new("slug", "bad")]).into();
        let details = app.details.unwrap();
        assert_eq!(details["fields"][0]["field"], "slug");
        assert_eq!(app.message, "Validation failed: bad");
    }
}
