// Domain entities
pub mod activity;
pub mod challenge;
pub mod daily_log;
pub mod member;
pub mod model;
pub mod requirement;
pub mod settings;

pub use activity::*;
pub use challenge::*;
pub use daily_log::*;
pub use member::*;
pub use model::*;
pub use requirement::*;
pub use settings::*;
