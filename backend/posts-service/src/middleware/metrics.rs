use crate::metrics::RequestMetrics;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, Ready};
use std::sync::Arc;

/// Counts every inbound request before it is routed.
///
/// Wrapped around the whole `App`, so unmatched paths, method mismatches and
/// `/metrics` itself are all counted under the raw request path.
pub struct RequestCounter {
    metrics: Arc<RequestMetrics>,
}

impl RequestCounter {
    pub fn new(metrics: Arc<RequestMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestCounter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestCounterService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestCounterService {
            service,
            metrics: Arc::clone(&self.metrics),
        }))
    }
}

pub struct RequestCounterService<S> {
    service: S,
    metrics: Arc<RequestMetrics>,
}

impl<S, B> Service<ServiceRequest> for RequestCounterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        self.metrics
            .observe_request(req.method().as_str(), req.path());

        self.service.call(req)
    }
}
