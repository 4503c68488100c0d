use reqwest::Method;

use super::client::{decode, ApiGateway};
use super::errors::{ApiError, ApiResult};
use super::types::{LoginRequest, LoginResponse, RegisterRequest};

/// `/Auth` endpoints. These run without a session.
pub struct AuthApi<'a> {
    gateway: &'a dyn ApiGateway,
}

impl<'a> AuthApi<'a> {
    pub fn new(gateway: &'a dyn ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        let path = "/Auth/login";
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::decode(path, e))?;
        let response = self.gateway.request(None, Method::POST, path, Some(body)).await?;
        decode(path, response)
    }

    pub async fn register(&self, registration: &RegisterRequest) -> ApiResult<()> {
        let path = "/Auth/register";
        let body = serde_json::to_value(registration).map_err(|e| ApiError::decode(path, e))?;
        self.gateway.request(None, Method::POST, path, Some(body)).await?;
        Ok(())
    }
}
