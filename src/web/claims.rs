//! Identity claims attached by an upstream authorizer.
//!
//! The claims are trusted as is: API Gateway only invokes the function once
//! the authorizer accepted the token, so no verification happens here.

use crate::web::request::Request;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};

pub const CLAIM_USERNAME: &str = "username";
pub const CLAIM_COGNITO_USERNAME: &str = "cognito:username";
pub const CLAIM_EMAIL: &str = "email";
pub const CLAIM_SUB: &str = "sub";

/// Used when no username claim is present.
pub const DEFAULT_USERNAME: &str = "User";

#[derive(Clone, Default)]
pub struct Claims {
    claims: Map<String, Value>,
}

impl Claims {
    /// Extracts the claims of the request. Requests without an authorizer
    /// yield empty claims.
    pub fn from_request(request: &Request) -> Self {
        Claims {
            claims: request.claims().cloned().unwrap_or_default(),
        }
    }

    fn non_empty_str(&self, claim: &str) -> Option<&str> {
        self.claims
            .get(claim)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Returns the username, falling back to the Cognito specific claim and
    /// finally to [`DEFAULT_USERNAME`].
    pub fn username(&self) -> &str {
        self.non_empty_str(CLAIM_USERNAME)
            .or_else(|| self.non_empty_str(CLAIM_COGNITO_USERNAME))
            .unwrap_or(DEFAULT_USERNAME)
    }

    /// Returns the email address or an empty string.
    pub fn email(&self) -> &str {
        self.non_empty_str(CLAIM_EMAIL).unwrap_or_default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.non_empty_str(CLAIM_SUB)
    }
}

// Only identifying claims end up in logs.
impl Debug for Claims {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{\"sub\": \"{}\", \"username\": \"{}\" }}",
            self.subject().unwrap_or("?"),
            self.username()
        )
    }
}
