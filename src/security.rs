// ABOUTME: Security response header policy for every HTTP response
// ABOUTME: Environment-specific header sets with HSTS reserved for production
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Security Headers
//!
//! The header set is built once at startup and copied onto each response by
//! [`crate::middleware::security_headers_middleware`].

use crate::config::environment::Environment;
use http::header::{
    CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use http::{HeaderMap, HeaderValue};
use tracing::warn;

/// Security headers configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Content-Security-Policy header value
    pub csp: String,
    /// X-Frame-Options header value
    pub frame_options: String,
    /// X-Content-Type-Options header value
    pub content_type_options: String,
    /// X-XSS-Protection header value
    pub xss_protection: String,
    /// Referrer-Policy header value
    pub referrer_policy: String,
    /// Strict-Transport-Security header value; production only
    pub hsts: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl SecurityConfig {
    /// Configuration for `environment`
    #[must_use]
    pub fn from_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Plain-HTTP friendly configuration without HSTS
    #[must_use]
    pub fn development() -> Self {
        Self {
            csp: "default-src 'self'".to_owned(),
            frame_options: "DENY".to_owned(),
            content_type_options: "nosniff".to_owned(),
            xss_protection: "1; mode=block".to_owned(),
            referrer_policy: "strict-origin-when-cross-origin".to_owned(),
            hsts: None,
        }
    }

    /// Production configuration with a one-year HSTS policy
    #[must_use]
    pub fn production() -> Self {
        Self {
            hsts: Some("max-age=31536000; includeSubDomains".to_owned()),
            ..Self::development()
        }
    }

    /// Headers to stamp onto every response
    ///
    /// Values that are not valid header text are skipped with a warning.
    #[must_use]
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let entries = [
            (CONTENT_SECURITY_POLICY, Some(&self.csp)),
            (X_FRAME_OPTIONS, Some(&self.frame_options)),
            (X_CONTENT_TYPE_OPTIONS, Some(&self.content_type_options)),
            (X_XSS_PROTECTION, Some(&self.xss_protection)),
            (REFERRER_POLICY, Some(&self.referrer_policy)),
            (STRICT_TRANSPORT_SECURITY, self.hsts.as_ref()),
        ];

        for (name, value) in entries {
            let Some(value) = value else { continue };
            match HeaderValue::from_str(value) {
                Ok(header_value) => {
                    headers.insert(name, header_value);
                }
                Err(e) => warn!(header = %name, "invalid security header value: {e}"),
            }
        }

        headers
    }
}
