pub mod activity_handlers;
pub mod challenge_handlers;
pub mod member_handlers;
pub mod ops_handlers;
pub mod report_handlers;
pub mod settings_handlers;
