//! Request parameter construction for the two auth modes

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::{AuthMode, RequestParams};
use std::collections::HashMap;

/// Build the request-parameter bundle shared by every HTTP call in a run.
///
/// Always sets `Content-Type: application/json`. An empty token selects
/// basic auth from the username/password pair; a non-empty token replaces
/// the Authorization header with a bearer token. The two modes are mutually
/// exclusive.
pub fn build_request_params(username: &str, password: &str, token: &str) -> RequestParams {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    if token.is_empty() {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
        return RequestParams {
            headers,
            auth_mode: AuthMode::Basic,
        };
    }

    headers.insert("Authorization".to_string(), format!("Bearer {token}"));
    RequestParams {
        headers,
        auth_mode: AuthMode::Bearer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_selects_basic_auth() {
        let params = build_request_params("admin", "admin", "");
        assert_eq!(params.auth_mode, AuthMode::Basic);
        assert_eq!(params.headers["Content-Type"], "application/json");
        // base64("admin:admin")
        assert_eq!(params.headers["Authorization"], "Basic YWRtaW46YWRtaW4=");
    }

    #[test]
    fn token_selects_bearer_and_drops_basic_marker() {
        let params = build_request_params("admin", "admin", "glsa_token");
        assert_eq!(params.auth_mode, AuthMode::Bearer);
        assert_eq!(params.headers["Authorization"], "Bearer glsa_token");
        assert!(!params.headers["Authorization"].contains("Basic"));
    }

    #[test]
    fn exactly_one_authorization_header() {
        for token in ["", "glsa_token"] {
            let params = build_request_params("user", "pass", token);
            let count = params.headers.keys().filter(|k| *k == "Authorization").count();
            assert_eq!(count, 1);
        }
    }
}
