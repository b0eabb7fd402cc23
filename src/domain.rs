pub mod entities;
pub mod use_cases;
pub mod dirty;
pub mod password;
pub mod publish_state;
