pub mod course;
pub mod permission;
pub mod roster;
