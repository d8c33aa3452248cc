// Domain value objects
pub mod identifiers;
pub mod leaderboard_sort;
pub mod role;
pub mod status_action;

pub use identifiers::*;
pub use leaderboard_sort::*;
pub use role::*;
pub use status_action::*;
