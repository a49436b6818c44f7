pub mod byte_range;
pub mod entities;
pub mod errors;
pub mod init_data;
pub mod ports;

// Re-export the domain boundary types and ports.
pub use byte_range::ByteRange;
pub use entities::{Session, VerifiedIdentity};
pub use errors::{AuthError, RangeError, StreamError};
pub use ports::{Clock, SessionStore, UserStore};
