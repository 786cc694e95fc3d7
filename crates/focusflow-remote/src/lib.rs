pub mod http;
pub mod mock;

pub use http::HttpRemote;
pub use mock::{MockCrud, MockSearch};
