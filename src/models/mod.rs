pub mod department;
pub mod event;
pub mod event_member;
pub mod milestone;
pub mod permission;
pub mod task;
pub mod user;
