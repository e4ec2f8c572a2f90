//! Admin sign-in and registration requests.

use shared::{
    error::ErrorKind,
    protocol::{AdminLoginRequest, AdminLoginResponse, AdminSignupRequest},
};
use tracing::info;

use crate::api::AdminApi;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const REGISTERED: &str = "Registration successful. Please login.";

pub async fn login(
    api: &dyn AdminApi,
    username: &str,
    password: &str,
) -> Result<AdminLoginResponse, ErrorKind> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ErrorKind::validation("Please enter username and password"));
    }

    let response = api
        .login(&AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;
    info!(username, token = response.token.is_some(), "admin: signed in");
    Ok(response)
}

pub async fn register(
    api: &dyn AdminApi,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), ErrorKind> {
    let request = AdminSignupRequest {
        username: username.trim().to_string(),
        email: email.trim().to_string(),
        password: password.trim().to_string(),
    };
    if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ErrorKind::validation("Please fill all fields"));
    }

    api.register(&request).await?;
    info!(username = %request.username, "admin: registered");
    Ok(())
}
