//! HttpTransport implementations
//!
//! Contains ReqwestTransport and MockTransport.

mod http;
mod mock;

pub use self::http::ReqwestTransport;
pub use self::mock::{MockBehavior, MockTransport};
