//! Coordinated write DTOs.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::GatewayError;

/// Request body for `POST /`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WriteRequest {
    /// Pet nickname; the message becomes `"Hello, " + name`.
    #[serde(default)]
    pub name: Option<String>,
}

impl WriteRequest {
    /// Returns the required `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `name` is absent.
    pub fn name(&self) -> Result<&str, GatewayError> {
        self.name
            .as_deref()
            .ok_or_else(|| GatewayError::InvalidRequest("missing required field `name`".to_string()))
    }
}

/// Query parameters for `POST /`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WriteParams {
    /// Stage both inserts, then roll them back. Defaults to `false`.
    #[serde(default)]
    pub rollback: Option<bool>,
}
