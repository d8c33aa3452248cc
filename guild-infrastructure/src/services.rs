pub mod health_service;
pub mod market_service;
pub mod report_service;

pub use health_service::*;
pub use market_service::*;
pub use report_service::*;
