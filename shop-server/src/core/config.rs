/// Server configuration
///
/// # Environment variables
///
/// Every setting can be overridden via environment variable:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | SHIPPING_FEE | 30000 | Flat shipping fee (currency units) |
/// | PAYMENT_GATEWAY_URL | (empty) | Payment initiation endpoint; empty selects the mock provider |
/// | PAYMENT_TIMEOUT_MS | 10000 | Gateway request timeout (milliseconds) |
/// | BROADCAST_CAPACITY | 1024 | Buffered status events per channel |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 SHIPPING_FEE=25000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Flat shipping fee quoted on every order (currency units)
    pub shipping_fee: f64,
    /// Payment provider initiation endpoint; empty selects the mock
    pub payment_gateway_url: String,
    /// Gateway request timeout (milliseconds)
    pub payment_timeout_ms: u64,
    /// Buffered status events per broadcast channel
    pub broadcast_capacity: usize,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            shipping_fee: std::env::var("SHIPPING_FEE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30_000.0),
            payment_gateway_url: std::env::var("PAYMENT_GATEWAY_URL").unwrap_or_default(),
            payment_timeout_ms: std::env::var("PAYMENT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            broadcast_capacity: std::env::var("BROADCAST_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override selected settings
    ///
    /// Mostly used by tests
    pub fn with_overrides(http_port: u16, shipping_fee: f64, broadcast_capacity: usize) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.shipping_fee = shipping_fee;
        config.broadcast_capacity = broadcast_capacity;
        config
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
