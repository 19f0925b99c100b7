//! Cross-origin policy built from configuration.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Config;

/// Build the CORS layer.
///
/// `*` mirrors the request's origin, method and headers back instead of
/// sending a literal wildcard, which browsers refuse alongside credentials.
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = if config.allows_any_origin() {
        if config.cors_allow_credentials {
            warn!("CORS allows any origin with credentials; set CORS_ALLOWED_ORIGINS to restrict");
        }
        CorsLayer::new().allow_origin(AllowOrigin::mirror_request())
    } else {
        let origins: Vec<HeaderValue> = config
            .origins()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    layer
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.cors_allow_credentials)
}
