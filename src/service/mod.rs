pub mod audit;
pub mod detection;
pub mod gamification;
pub mod llm;
pub mod rate_limit;

pub use audit::AuditService;
pub use llm::LlmClient;
pub use rate_limit::RateLimiter;
