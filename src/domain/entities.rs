pub mod plant;
pub mod project;
pub mod settings;
pub mod token;
pub mod user;
