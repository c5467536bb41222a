use std::fmt;

/// Basic-auth credentials for the media host.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaCredentials {
    pub username: String,
    pub password: String,
}

impl MediaCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for MediaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Locator for one remote audio asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    url: String,
    credentials: Option<MediaCredentials>,
    declared_content_type: Option<String>,
}

impl MediaReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            declared_content_type: None,
        }
    }

    pub fn with_credentials(mut self, credentials: MediaCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_declared_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.declared_content_type = Some(content_type.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn credentials(&self) -> Option<&MediaCredentials> {
        self.credentials.as_ref()
    }

    pub fn declared_content_type(&self) -> Option<&str> {
        self.declared_content_type.as_deref()
    }
}
