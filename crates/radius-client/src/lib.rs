//! RADIUS Client Implementation
//!
//! Blocking authentication and accounting sessions built on top of the
//! `radius-proto` protocol implementation.
//!
//! # Features
//!
//! - One UDP exchange per `send`, bounded by a timeout
//! - Reply verification (source, identifier, response authenticator,
//!   Message-Authenticator)
//! - JSON configuration
//! - Packet dumps for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use radius_client::{AuthSession, Session};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = AuthSession::new()?;
//!     session.set_server("127.0.0.1", 1812, b"testing123")?;
//!     session.set_username("bob")?;
//!     session.set_password("hello")?;
//!
//!     match session.send() {
//!         Ok(()) => {
//!             let message = session.get_attribute("Reply-Message")?;
//!             println!("{}", message.value);
//!         }
//!         Err(_) => eprintln!("{}", session.last_error()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod transport;

pub use config::{ClientConfig, ConfigError, RequestAttribute};
pub use error::{ClientError, ErrorKind};
pub use session::{
    AcctSession, AuthSession, ReplyAttribute, RequestKind, Session, SessionCore, SessionState,
};
pub use transport::AddressFamily;
