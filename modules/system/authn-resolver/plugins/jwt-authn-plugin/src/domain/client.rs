//! Client implementation for the JWT `AuthN` plugin.

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverClient, AuthNResolverError, AuthenticationResult};

use super::service::Service;

#[async_trait]
impl AuthNResolverClient for Service {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        self.validate(bearer_token)
    }
}
