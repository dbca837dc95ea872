pub mod db_const {
    pub const USER_TABLE: &str = "users";
    pub const AUTH_PASSWORD_TABLE: &str = "auth_passwords";
    pub const EVENT_TABLE: &str = "events";
    pub const EVENT_MEMBER_TABLE: &str = "event_members";
    pub const DEPARTMENT_TABLE: &str = "departments";
    pub const TASK_TABLE: &str = "tasks";
    pub const MILESTONE_TABLE: &str = "milestones";
}

/// Attempts made at drawing a join code before giving up with
/// `Error::JoinCodeExhausted`.
pub const JOIN_CODE_ATTEMPTS: usize = 5;
