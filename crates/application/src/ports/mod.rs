//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and the network.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod transport;

pub use transport::{
    HttpTransport, RawResponse, TransportError, TransportFuture, TransportProvider,
};
