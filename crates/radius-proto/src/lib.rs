//! RADIUS Protocol Implementation
//!
//! Wire-level building blocks for a RADIUS client as defined in RFC 2865,
//! 2866, 2869 and 5176.
//!
//! # Features
//!
//! - FreeRADIUS-format attribute dictionary
//! - Typed value pairs with lenient or strict conversion
//! - Packet signing, parsing and reply verification
//! - MD5-based password hiding and Message-Authenticator support
//!
//! # Example
//!
//! ```rust
//! use radius_proto::{Code, Codec, CodecMode, Dictionary, Operator, Packet};
//! use radius_proto::auth::{generate_identifier, generate_request_authenticator};
//!
//! let dict = Dictionary::builtin().unwrap();
//! let codec = Codec::new(&dict, CodecMode::Strict);
//!
//! let mut packet = Packet::new(
//!     Code::AccessRequest,
//!     generate_identifier(),
//!     generate_request_authenticator(),
//! );
//! packet.add_pair(codec.encode("User-Name", Operator::Eq, "alice").unwrap().unwrap());
//! packet.add_pair(codec.encode("User-Password", Operator::Eq, "password").unwrap().unwrap());
//!
//! let bytes = packet.sign(b"secret").unwrap();
//! assert_eq!(bytes.len(), 20 + 7 + 18);
//! ```

pub mod attributes;
pub mod auth;
pub mod codec;
pub mod dictionary;
pub mod dump;
pub mod message_auth;
pub mod packet;

pub use attributes::{Attribute, Attributes};
pub use auth::{
    calculate_accounting_request_authenticator, calculate_response_authenticator,
    decrypt_user_password, encrypt_user_password, generate_identifier,
    generate_request_authenticator, verify_response_authenticator,
};
pub use codec::{token_for, Codec, CodecError, CodecMode, Operator, Value, ValuePair};
pub use dictionary::{AttributeDef, DataType, Dictionary, DictionaryError, Encryption};
pub use message_auth::{calculate_message_authenticator, verify_message_authenticator};
pub use packet::{Code, Packet, PacketError};
