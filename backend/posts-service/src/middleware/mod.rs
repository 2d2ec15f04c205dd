/// HTTP middleware for posts-service
pub mod metrics;

pub use metrics::RequestCounter;
