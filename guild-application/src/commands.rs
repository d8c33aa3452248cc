pub mod activity_log_commands;
pub mod daily_log_commands;
pub mod member_commands;
pub mod settings_commands;
