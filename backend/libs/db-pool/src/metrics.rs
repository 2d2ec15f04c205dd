//! Prometheus metrics for database connection pool
//!
//! Tracks pool size by state. Gauges are registered on a caller-owned
//! registry and refreshed on demand (typically right before a scrape).

use prometheus::{IntGaugeVec, Opts, Registry};
use sqlx::SqlitePool;

/// Pool gauges for one service
#[derive(Clone)]
pub struct PoolMetrics {
    service: String,
    connections: IntGaugeVec,
}

impl PoolMetrics {
    /// Create the gauges and register them on `registry`.
    pub fn register(registry: &Registry, service: &str) -> Result<Self, prometheus::Error> {
        let connections = IntGaugeVec::new(
            Opts::new(
                "db_pool_connections",
                "Database pool connection count by state",
            ),
            &["service", "state"],
        )?;
        registry.register(Box::new(connections.clone()))?;

        Ok(Self {
            service: service.to_string(),
            connections,
        })
    }

    /// Refresh idle/active/max gauges from the pool's current state
    pub fn update(&self, pool: &SqlitePool) {
        let size = pool.size() as i64;
        let idle = pool.num_idle() as i64;
        let active = size - idle;

        self.connections
            .with_label_values(&[&self.service, "idle"])
            .set(idle);

        self.connections
            .with_label_values(&[&self.service, "active"])
            .set(active);

        self.connections
            .with_label_values(&[&self.service, "max"])
            .set(pool.options().get_max_connections() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_on_same_registry_fails() {
        let registry = Registry::new();
        assert!(PoolMetrics::register(&registry, "svc").is_ok());
        assert!(PoolMetrics::register(&registry, "svc").is_err());
    }
}
