//! Kernel module - client infrastructure and dependencies.

pub mod app_kernel;
pub mod http_backend;
pub mod test_dependencies;
pub mod traits;

pub use app_kernel::AppKernel;
pub use http_backend::HttpBackend;
pub use test_dependencies::TestDependencies;
pub use traits::*;
