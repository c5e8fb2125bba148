pub mod admin;
pub mod attendance;
pub mod certificate;
pub mod employee;
pub mod task;
