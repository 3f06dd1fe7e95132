//! [`Error`] and [`ErrorKind`].

mod http_error;

pub use http_error::{Error, ErrorKind};
