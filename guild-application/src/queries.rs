pub mod challenge_queries;
pub mod daily_log_queries;
pub mod member_queries;
pub mod report_queries;
pub mod settings_queries;
