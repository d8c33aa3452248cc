use guild_domain::Role;

use crate::AppError;

/// Caller identity resolved once per request and passed to every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: String,
    pub guild_id: String,
    pub role: Role,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>, guild_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            guild_id: guild_id.into(),
            role,
        }
    }

    pub fn require(&self, role: Role) -> Result<(), AppError> {
        if self.role.allows(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(role.as_str()))
        }
    }
}
