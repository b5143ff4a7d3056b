pub mod auth;
pub mod friends;
pub mod posts;
pub mod profile;
pub mod session;
