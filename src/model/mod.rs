pub mod employee;
pub mod holiday;
pub mod project;
pub mod status;
