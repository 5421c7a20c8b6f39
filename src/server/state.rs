use crate::pipeline::Pipeline;

/// State shared by all request handlers. The pipeline is stateless, so a
/// single instance serves concurrent requests without locking.
pub struct AppState {
    pub pipeline: Pipeline,
    pub api_key: String,
    /// Operator-supplied IP override; skips per-request client detection.
    pub ip_override: Option<String>,
}

impl AppState {
    pub fn new(api_key: String, ip_override: Option<String>) -> Self {
        Self {
            pipeline: Pipeline::new(),
            api_key,
            ip_override,
        }
    }
}
