use crate::errors::ServiceError;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError,
};
use dashmap::DashMap;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);
const IDLE_EXPIRY: Duration = Duration::from_secs(3600);

#[derive(Clone)]
pub struct RateLimiterEntry {
    pub limiter: Arc<DefaultDirectRateLimiter>,
    pub last_used: Instant,
}

/// Per-client rate limiting middleware
pub struct ClientRateLimiterMiddleware<S> {
    service: S,
    quota: Quota,
    rate_limiters: Arc<DashMap<String, RateLimiterEntry>>,
}

/// Rate limiter initializer, keyed by client IP.
///
/// Every middleware produced by one initializer shares a single map of
/// buckets, so a client's budget holds across all server workers.
#[derive(Clone)]
pub struct ClientRateLimiter {
    quota: Quota,
    rate_limiters: Arc<DashMap<String, RateLimiterEntry>>,
    cleanup_started: Arc<AtomicBool>,
}

impl ClientRateLimiter {
    pub fn new(requests_per_minute: NonZeroU32, burst_size: NonZeroU32) -> Self {
        ClientRateLimiter {
            quota: Quota::per_minute(requests_per_minute).allow_burst(burst_size),
            rate_limiters: Arc::new(DashMap::new()),
            cleanup_started: Arc::new(AtomicBool::new(false)),
        }
    }

    // Runs inside the server runtime, once per initializer.
    fn spawn_cleanup(&self) {
        if self.cleanup_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let rate_limiters = self.rate_limiters.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                perform_cleanup(&rate_limiters, Instant::now());
            }
        });
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClientRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = ClientRateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        self.spawn_cleanup();
        ok(ClientRateLimiterMiddleware {
            service,
            quota: self.quota,
            rate_limiters: self.rate_limiters.clone(),
        })
    }
}

impl<S, B> Service<ServiceRequest> for ClientRateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut entry = self
            .rate_limiters
            .entry(client.clone())
            .or_insert_with(|| RateLimiterEntry {
                limiter: Arc::new(RateLimiter::direct(self.quota)),
                last_used: Instant::now(),
            });

        entry.value_mut().last_used = Instant::now();
        let limiter = entry.value().limiter.clone();
        // release the shard lock before awaiting anything
        drop(entry);

        if limiter.check().is_err() {
            log::warn!("Rate limit exceeded for {}", client);
            return Box::pin(async move { Err(ServiceError::RateLimit.into()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

fn perform_cleanup(rate_limiters: &DashMap<String, RateLimiterEntry>, now: Instant) {
    let initial_count = rate_limiters.len();

    rate_limiters.retain(|_, entry| now.duration_since(entry.last_used) < IDLE_EXPIRY);

    let current_count = rate_limiters.len();
    let removed = initial_count - current_count;

    if removed > 0 {
        log::info!(
            "Cleaned up rate limiters. Removed: {}, Remaining: {}",
            removed,
            current_count
        );
    }
}
