//! CORS policy built from `[server.cors]`.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use sw_domain::config::CorsConfig;

const METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Configured origins split into exact matches and `scheme://host:` prefixes
/// taken from `scheme://host:*` entries.
#[derive(Debug, Default, Clone)]
struct OriginRules {
    exact: Vec<HeaderValue>,
    port_wildcards: Vec<String>,
}

impl OriginRules {
    fn parse(origins: &[String]) -> Self {
        let mut rules = Self::default();
        for origin in origins {
            if let Some(prefix) = origin.strip_suffix('*').filter(|p| p.ends_with(':')) {
                rules.port_wildcards.push(prefix.to_owned());
            } else if let Ok(hv) = origin.parse::<HeaderValue>() {
                rules.exact.push(hv);
            } else {
                tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
            }
        }
        rules
    }

    fn allows(&self, origin: &HeaderValue) -> bool {
        if self.exact.iter().any(|e| e.as_bytes() == origin.as_bytes()) {
            return true;
        }
        let Ok(origin) = origin.to_str() else {
            return false;
        };
        self.port_wildcards.iter().any(|prefix| {
            origin
                .strip_prefix(prefix.as_str())
                .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
        })
    }
}

/// Build a [`CorsLayer`] from the configured allowed origins.
///
/// `http://localhost:*` matches any numeric port on that host. A lone `"*"`
/// allows every origin without credentials.
pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allowed_origins.len() == 1 && cors.allowed_origins[0] == "*" {
        tracing::warn!("CORS configured with wildcard \"*\", all origins allowed");
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(METHODS)
            .allow_headers([header::CONTENT_TYPE]);
    }

    let rules = OriginRules::parse(&cors.allowed_origins);
    let allow_origin = if rules.port_wildcards.is_empty() {
        AllowOrigin::list(rules.exact)
    } else {
        AllowOrigin::predicate(move |origin, _| rules.allows(origin))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(METHODS)
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
