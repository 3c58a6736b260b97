//! HTTP connectivity: the transport seam and the request executor.

mod executor;
mod transport;

pub use executor::{RavenCommand, RequestExecutor};
pub use transport::{HttpTransport, ReqwestTransport};
