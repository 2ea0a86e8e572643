pub mod complete;
pub mod detail;
pub mod list;
pub mod register;
