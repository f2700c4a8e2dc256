use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::Response,
};

use farmstock_core::FarmId;

use crate::app::errors;

/// Farm scope of a request.
///
/// Built from the `:farm_id` path segment and passed explicitly to every
/// service call; nothing reads the farm from ambient state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FarmContext {
    farm_id: FarmId,
}

impl FarmContext {
    pub fn new(farm_id: FarmId) -> Self {
        Self { farm_id }
    }

    pub fn farm_id(&self) -> FarmId {
        self.farm_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for FarmContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                errors::json_error(StatusCode::BAD_REQUEST, "invalid_path", e.body_text())
            })?;

        let raw = params.get("farm_id").ok_or_else(|| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_path", "missing farm id")
        })?;

        let farm_id: FarmId = raw.parse().map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid farm id")
        })?;

        Ok(Self::new(farm_id))
    }
}
