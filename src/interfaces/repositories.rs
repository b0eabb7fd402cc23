pub mod plant;
pub mod project;
pub mod settings;
pub mod sqlx_repo;
pub mod storage;
pub mod token;
pub mod user;
