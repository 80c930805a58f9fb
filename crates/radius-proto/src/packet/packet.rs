use super::Code;
use crate::attributes::{Attribute, Attributes};
use crate::auth::{
    calculate_accounting_request_authenticator, calculate_response_authenticator,
    encrypt_user_password, AUTHENTICATOR_LENGTH, AUTHENTICATOR_OFFSET,
};
use crate::codec::{Codec, CodecError, ValuePair};
use crate::dictionary::Encryption;
use crate::message_auth::{
    calculate_message_authenticator, verify_reply_message_authenticator, MESSAGE_AUTHENTICATOR,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    #[error("Invalid packet length: {0}")]
    InvalidLength(usize),
    #[error("Invalid packet code: {0}")]
    InvalidCode(u8),
    #[error("Attribute error: {0}")]
    AttributeError(String),
    #[error("Packet too large: {0} bytes")]
    PacketTooLarge(usize),
    #[error("Packet has not been encoded")]
    NotEncoded,
    #[error("Identifier mismatch: expected {expected}, got {actual}")]
    IdentifierMismatch { expected: u8, actual: u8 },
    #[error("Response authenticator mismatch")]
    AuthenticatorMismatch,
    #[error("Message-Authenticator mismatch")]
    MessageAuthenticatorMismatch,
}

/// RADIUS Packet structure as defined in RFC 2865 Section 3
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Code      |  Identifier   |            Length             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                         Authenticator                         |
/// |                                                               |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  Attributes ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-
/// ```
///
/// A packet keeps its typed pairs and, once signed or parsed, the exact
/// bytes that went over the wire. Changing any header field or pair drops
/// the stored bytes.
#[derive(Debug, Clone)]
pub struct Packet {
    code: Code,
    identifier: u8,
    authenticator: [u8; 16],
    pairs: Vec<ValuePair>,
    raw: Option<Vec<u8>>,
}

impl Packet {
    /// Minimum RADIUS packet size (20 bytes: 1 code + 1 id + 2 length + 16 authenticator)
    pub const MIN_PACKET_SIZE: usize = 20;
    /// Maximum RADIUS packet size (4096 bytes as per RFC 2865)
    pub const MAX_PACKET_SIZE: usize = 4096;

    pub fn new(code: Code, identifier: u8, authenticator: [u8; 16]) -> Self {
        Packet {
            code,
            identifier,
            authenticator,
            pairs: Vec::new(),
            raw: None,
        }
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn set_code(&mut self, code: Code) {
        self.code = code;
        self.raw = None;
    }

    pub fn identifier(&self) -> u8 {
        self.identifier
    }

    pub fn set_identifier(&mut self, identifier: u8) {
        self.identifier = identifier;
        self.raw = None;
    }

    pub fn authenticator(&self) -> &[u8; 16] {
        &self.authenticator
    }

    pub fn set_authenticator(&mut self, authenticator: [u8; 16]) {
        self.authenticator = authenticator;
        self.raw = None;
    }

    pub fn pairs(&self) -> &[ValuePair] {
        &self.pairs
    }

    pub fn add_pair(&mut self, pair: ValuePair) {
        self.pairs.push(pair);
        self.raw = None;
    }

    /// First pair with attribute type `code`
    pub fn find_pair(&self, code: u8) -> Option<&ValuePair> {
        self.pairs.iter().find(|p| p.code() == code)
    }

    /// Wire bytes from the last [`sign`](Self::sign) or [`parse`](Self::parse)
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Raw attributes of the stored wire bytes
    pub fn attributes(&self) -> Result<Attributes<'_>, PacketError> {
        let raw = self.raw.as_deref().ok_or(PacketError::NotEncoded)?;
        Ok(Attributes::new(raw, Self::MIN_PACKET_SIZE))
    }

    /// Encode the header and pairs.
    ///
    /// User-Password values are hidden with the current authenticator and
    /// a Message-Authenticator is zero-filled. Returns the buffer and the
    /// value offset of the Message-Authenticator, if any.
    fn encode(&self, secret: &[u8]) -> Result<(Vec<u8>, Option<usize>), PacketError> {
        let mut buffer = Vec::with_capacity(Self::MIN_PACKET_SIZE + self.pairs.len() * 8);
        buffer.push(self.code.as_u8());
        buffer.push(self.identifier);
        buffer.extend_from_slice(&[0, 0]);
        buffer.extend_from_slice(&self.authenticator);

        let mut message_auth_offset = None;
        for pair in &self.pairs {
            let value = if pair.code() == MESSAGE_AUTHENTICATOR {
                message_auth_offset = Some(buffer.len() + Attribute::MIN_LENGTH);
                vec![0u8; 16]
            } else if pair.definition().encryption == Encryption::UserPassword {
                encrypt_user_password(&pair.value().to_wire(), secret, &self.authenticator)
            } else {
                pair.value().to_wire()
            };
            Attribute::new(pair.code(), value)?.encode_into(&mut buffer);
        }

        let total_length = buffer.len();
        if total_length > Self::MAX_PACKET_SIZE {
            return Err(PacketError::PacketTooLarge(total_length));
        }
        buffer[2..4].copy_from_slice(&(total_length as u16).to_be_bytes());

        Ok((buffer, message_auth_offset))
    }

    /// Produce the wire form of a request.
    ///
    /// Accounting, CoA and Disconnect requests get their computed
    /// authenticator, which also replaces the one held by the packet.
    pub fn sign(&mut self, secret: &[u8]) -> Result<&[u8], PacketError> {
        let (mut buffer, message_auth_offset) = self.encode(secret)?;
        let computed = self.code.has_computed_authenticator();
        let header = AUTHENTICATOR_OFFSET..AUTHENTICATOR_OFFSET + AUTHENTICATOR_LENGTH;

        if computed {
            buffer[header.clone()].fill(0);
        }
        if let Some(offset) = message_auth_offset {
            let mac = calculate_message_authenticator(&buffer, secret);
            buffer[offset..offset + 16].copy_from_slice(&mac);
        }
        if computed {
            let authenticator = calculate_accounting_request_authenticator(&buffer, secret);
            buffer[header].copy_from_slice(&authenticator);
            self.authenticator = authenticator;
        }

        Ok(self.raw.insert(buffer))
    }

    /// Produce the wire form of a reply to a request carrying
    /// `request_authenticator`.
    pub fn sign_reply(
        &mut self,
        request_authenticator: &[u8; 16],
        secret: &[u8],
    ) -> Result<&[u8], PacketError> {
        self.authenticator = *request_authenticator;
        let (mut buffer, message_auth_offset) = self.encode(secret)?;

        if let Some(offset) = message_auth_offset {
            let mac = calculate_message_authenticator(&buffer, secret);
            buffer[offset..offset + 16].copy_from_slice(&mac);
        }

        let authenticator = calculate_response_authenticator(&buffer, request_authenticator, secret);
        buffer[AUTHENTICATOR_OFFSET..AUTHENTICATOR_OFFSET + AUTHENTICATOR_LENGTH]
            .copy_from_slice(&authenticator);
        self.authenticator = authenticator;

        Ok(self.raw.insert(buffer))
    }

    /// Parse a received datagram.
    ///
    /// Only framing is checked here: the declared length must match the
    /// datagram exactly and the attributes must tile the remainder.
    /// Pairs are filled in by [`decode_pairs`](Self::decode_pairs).
    pub fn parse(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < Self::MIN_PACKET_SIZE {
            return Err(PacketError::InvalidLength(data.len()));
        }

        let code = Code::from_u8(data[0]).ok_or(PacketError::InvalidCode(data[0]))?;
        let identifier = data[1];

        let length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if length < Self::MIN_PACKET_SIZE || length > Self::MAX_PACKET_SIZE {
            return Err(PacketError::InvalidLength(length));
        }
        if data.len() != length {
            return Err(PacketError::InvalidLength(data.len()));
        }

        let mut authenticator = [0u8; 16];
        authenticator.copy_from_slice(&data[AUTHENTICATOR_OFFSET..Self::MIN_PACKET_SIZE]);

        for attribute in Attributes::new(data, Self::MIN_PACKET_SIZE) {
            attribute?;
        }

        Ok(Packet {
            code,
            identifier,
            authenticator,
            pairs: Vec::new(),
            raw: Some(data.to_vec()),
        })
    }

    /// Decode the stored attributes into typed pairs, replacing any
    /// pairs already held.
    pub fn decode_pairs(&mut self, codec: &Codec<'_>) -> Result<(), CodecError> {
        let Some(raw) = self.raw.as_deref() else {
            return Ok(());
        };

        // framing was checked when the bytes were produced
        let mut pairs = Vec::new();
        for (_, attribute) in Attributes::new(raw, Self::MIN_PACKET_SIZE).flatten() {
            pairs.push(codec.decode(attribute.attr_type, &attribute.value)?);
        }
        self.pairs = pairs;
        Ok(())
    }

    /// Check that this parsed packet is a genuine reply to `request`.
    pub fn verify_reply(&self, request: &Packet, secret: &[u8]) -> Result<(), PacketError> {
        let raw = self.raw.as_deref().ok_or(PacketError::NotEncoded)?;

        if self.identifier != request.identifier {
            return Err(PacketError::IdentifierMismatch {
                expected: request.identifier,
                actual: self.identifier,
            });
        }

        let expected = calculate_response_authenticator(raw, &request.authenticator, secret);
        if expected != self.authenticator {
            return Err(PacketError::AuthenticatorMismatch);
        }

        for attribute in Attributes::new(raw, Self::MIN_PACKET_SIZE) {
            let (offset, attribute) = attribute?;
            if attribute.attr_type != MESSAGE_AUTHENTICATOR {
                continue;
            }
            let value_offset = offset + Attribute::MIN_LENGTH;
            if attribute.value.len() != 16
                || !verify_reply_message_authenticator(
                    raw,
                    &request.authenticator,
                    secret,
                    value_offset,
                )
            {
                return Err(PacketError::MessageAuthenticatorMismatch);
            }
        }

        Ok(())
    }
}
