pub mod error;
pub mod partnership;
pub mod response;
pub mod withdrawal;
