//! Backend function clients.

mod http_client;
mod mock;

pub use http_client::HttpBackendFunctions;
pub use mock::MockBackendFunctions;
