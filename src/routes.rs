use crate::{
    api::attendance,
    config::{Config, MAX_RATE_PER_MIN},
    error::PresensiError,
    models::ApiResponse,
};
use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, web};
use anyhow::{anyhow, bail};
use std::fmt::Display;

/// Extractor failures answer with the error envelope and HTTP 200, the same
/// way handler errors do.
fn envelope_error<E>(err: E) -> actix_web::Error
where
    E: Display + std::fmt::Debug + 'static,
{
    let message = PresensiError::Validation(err.to_string()).to_string();
    tracing::debug!(error = %message, "rejected request input");
    InternalError::from_response(err, HttpResponse::Ok().json(ApiResponse::<()>::error(message)))
        .into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| envelope_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| envelope_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| envelope_error(err)));

    cfg.service(
        web::scope(&format!("{}/presensi", config.api_prefix.trim_end_matches('/')))
            // /presensi
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_presensi))
                    .route(web::post().to(attendance::create_presensi)),
            )
            // /presensi/{item_id}
            .service(
                web::resource("/{item_id}")
                    .route(web::put().to(attendance::update_presensi))
                    .route(web::delete().to(attendance::delete_presensi)),
            ),
    );
}

/// Per-peer-IP limiter allowing `requests_per_min` requests per minute.
/// The refill period is whole milliseconds, so the rate is capped at
/// `MAX_RATE_PER_MIN`.
pub fn build_limiter(
    requests_per_min: u32,
) -> anyhow::Result<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    if requests_per_min > MAX_RATE_PER_MIN {
        bail!(
            "rate limit of {} requests per minute exceeds the maximum of {}",
            requests_per_min,
            MAX_RATE_PER_MIN
        );
    }
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {} requests per minute", requests_per_min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_accepts_configured_rates() {
        assert!(build_limiter(600).is_ok());
        assert!(build_limiter(1).is_ok());
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(MAX_RATE_PER_MIN).is_ok());
    }

    #[test]
    fn limiter_rejects_rates_below_one_ms() {
        let err = build_limiter(MAX_RATE_PER_MIN + 1).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
        assert!(build_limiter(120_000).is_err());
    }
}
