//! Seams to the remote store. The controllers only ever talk to these traits.

use async_trait::async_trait;
use shared::{
    domain::{SettingsDocument, SettingsPatch},
    error::ErrorKind,
    protocol::{AdminLoginRequest, AdminLoginResponse, AdminSignupRequest},
};

use crate::resource::Resource;

#[async_trait]
pub trait ApiClient<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, ErrorKind>;
    async fn create(&self, payload: &R::Payload) -> Result<R, ErrorKind>;
    async fn update(&self, id: &R::Id, payload: &R::Payload) -> Result<R, ErrorKind>;
    async fn delete(&self, id: &R::Id) -> Result<(), ErrorKind>;
}

#[async_trait]
pub trait SettingsApi: Send + Sync {
    /// `Ok(None)` when no settings document has been stored yet.
    async fn fetch(&self) -> Result<Option<SettingsPatch>, ErrorKind>;
    async fn update(&self, settings: &SettingsDocument) -> Result<(), ErrorKind>;
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn login(&self, request: &AdminLoginRequest) -> Result<AdminLoginResponse, ErrorKind>;
    async fn register(&self, request: &AdminSignupRequest) -> Result<(), ErrorKind>;
}

/// Yes/no prompt shown before destructive operations.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}
