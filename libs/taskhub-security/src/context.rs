use chrono::{DateTime, Utc};
use secrecy::SecretString;
use uuid::Uuid;

/// `IdentityContext` carries the authenticated caller for one request.
///
/// Built by an `AuthN` authenticator after the bearer token is validated and
/// handed to the guard chain, which decides whether the protected operation
/// may run. It holds no mutable state and lives for a single request.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IdentityContext {
    /// Subject ID of the authenticated user.
    subject_id: Uuid,
    /// E-mail asserted by the token, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_email: Option<String>,
    /// Organization (tenant) the subject belongs to.
    organization_id: Uuid,
    /// Raw role token as issued. Interpreted case-insensitively by the
    /// permission matrix; unknown tokens grant nothing.
    role: String,
    /// Token issue time.
    issued_at: DateTime<Utc>,
    /// Token expiry. The identity is no longer valid at or after this instant.
    expires_at: DateTime<Utc>,
    /// Original bearer token. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    bearer_token: Option<SecretString>,
}

impl IdentityContext {
    /// Create a new `IdentityContext` builder
    #[must_use]
    pub fn builder() -> IdentityContextBuilder {
        IdentityContextBuilder::default()
    }

    #[must_use]
    pub fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    #[must_use]
    pub fn subject_email(&self) -> Option<&str> {
        self.subject_email.as_deref()
    }

    #[must_use]
    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    /// Role token exactly as the authenticator produced it.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Get the original bearer token.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.bearer_token.as_ref()
    }

    /// Whether the identity has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Builder for [`IdentityContext`].
///
/// Missing fields fall back to values that fail closed: nil ids, an empty
/// role token (grants nothing) and an expiry in the distant past.
#[derive(Default)]
pub struct IdentityContextBuilder {
    subject_id: Option<Uuid>,
    subject_email: Option<String>,
    organization_id: Option<Uuid>,
    role: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    bearer_token: Option<SecretString>,
}

impl IdentityContextBuilder {
    #[must_use]
    pub fn subject_id(mut self, subject_id: Uuid) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn subject_email(mut self, email: &str) -> Self {
        self.subject_email = Some(email.to_owned());
        self
    }

    #[must_use]
    pub fn organization_id(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    #[must_use]
    pub fn issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    #[must_use]
    pub fn expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> IdentityContext {
        IdentityContext {
            subject_id: self.subject_id.unwrap_or_default(),
            subject_email: self.subject_email,
            organization_id: self.organization_id.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            issued_at: self.issued_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
            expires_at: self.expires_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
            bearer_token: self.bearer_token,
        }
    }
}
