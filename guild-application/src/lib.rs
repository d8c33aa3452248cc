// Guild Application Layer

pub mod commands;
pub mod context;
pub mod error;
pub mod metrics;
pub mod pricing;
pub mod queries;
pub mod state;

pub use context::RequestContext;
pub use error::AppError;
pub use metrics::Metrics;
pub use state::AppState;
