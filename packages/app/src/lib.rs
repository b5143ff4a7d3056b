//! Hike social client.
//!
//! UI-agnostic state and workflows behind the Hike front ends: the post
//! composer and its image-upload orchestration, the post feed, friends,
//! profile settings and the signed-in session.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::Config;
pub use kernel::AppKernel;
