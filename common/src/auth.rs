use base64::{engine::general_purpose, Engine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Parses an `Authorization: Basic <base64(user:password)>` header value.
    pub fn from_authorization(header: &str) -> Option<Self> {
        let encoded = header.strip_prefix("Basic ")?;
        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let credentials = String::from_utf8(decoded).ok()?;
        let (username, password) = credentials.split_once(':')?;
        Some(BasicCredentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

pub trait IAdminAuth: Send + Sync {
    fn verify(&self, credentials: &BasicCredentials) -> bool;
}

/// Checks the password against a single configured admin password. The username is not checked.
pub struct PasswordAdminAuth {
    password: Option<String>,
}

impl PasswordAdminAuth {
    pub fn new(password: Option<String>) -> Self {
        PasswordAdminAuth {
            password: password.filter(|password| !password.is_empty()),
        }
    }
}

impl IAdminAuth for PasswordAdminAuth {
    fn verify(&self, credentials: &BasicCredentials) -> bool {
        match &self.password {
            Some(password) => constant_time_eq(credentials.password.as_bytes(), password.as_bytes()),
            None => false,
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
