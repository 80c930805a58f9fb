//! Client error types

use radius_proto::{Code, CodecError, DictionaryError, PacketError};
use thiserror::Error;

/// Message reported by a session that has not failed yet
pub const NO_ERRORS: &str = "No errors";

/// Coarse classification of [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidAddress,
    UnknownAttribute,
    NoReply,
    AttributeNotFound,
    ValueRender,
    Socket,
    Send,
    TimeoutOrSocket,
    InvalidReplyPacket,
    VerificationFailed,
    DecodeFailed,
    ProtocolRejected,
    FatalInit,
}

/// Session operation errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing caller-supplied string
    #[error("Invalid arguments")]
    InvalidArgument,

    /// Value does not convert under strict value handling
    #[error("Invalid arguments: {0}")]
    InvalidValue(String),

    /// Server cannot be resolved, or no server is configured
    #[error("Invalid hostname or IP")]
    InvalidAddress(String),

    #[error("Invalid attribute")]
    UnknownAttribute(String),

    #[error("No reply")]
    NoReply,

    #[error("Attribute not found")]
    AttributeNotFound(String),

    #[error("Could not get value")]
    ValueRender(String),

    #[error("Could not create new socket")]
    Socket(#[source] std::io::Error),

    #[error("Failed to send packet: {0}")]
    Send(String),

    #[error("Socket error or timeout")]
    TimeoutOrSocket(#[source] Option<std::io::Error>),

    #[error("Reply packet is invalid")]
    InvalidReplyPacket(#[source] PacketError),

    #[error("Failed to verify reply packet")]
    VerificationFailed(String),

    #[error("Failed to decode reply packet")]
    DecodeFailed(#[source] CodecError),

    /// Verified reply with a code other than a success acknowledgement
    #[error("Request rejected: {}", .0.name())]
    ProtocolRejected(Code),

    #[error("Initializing dictionary failed")]
    FatalInit(#[source] DictionaryError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidArgument | ClientError::InvalidValue(_) => ErrorKind::InvalidArgument,
            ClientError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            ClientError::UnknownAttribute(_) => ErrorKind::UnknownAttribute,
            ClientError::NoReply => ErrorKind::NoReply,
            ClientError::AttributeNotFound(_) => ErrorKind::AttributeNotFound,
            ClientError::ValueRender(_) => ErrorKind::ValueRender,
            ClientError::Socket(_) => ErrorKind::Socket,
            ClientError::Send(_) => ErrorKind::Send,
            ClientError::TimeoutOrSocket(_) => ErrorKind::TimeoutOrSocket,
            ClientError::InvalidReplyPacket(_) => ErrorKind::InvalidReplyPacket,
            ClientError::VerificationFailed(_) => ErrorKind::VerificationFailed,
            ClientError::DecodeFailed(_) => ErrorKind::DecodeFailed,
            ClientError::ProtocolRejected(_) => ErrorKind::ProtocolRejected,
            ClientError::FatalInit(_) => ErrorKind::FatalInit,
        }
    }
}

impl From<CodecError> for ClientError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::UnknownAttribute(name) => ClientError::UnknownAttribute(name),
            CodecError::UnknownCode(code) => ClientError::UnknownAttribute(code.to_string()),
            e @ CodecError::InvalidValue { .. } => ClientError::InvalidValue(e.to_string()),
        }
    }
}

impl From<DictionaryError> for ClientError {
    fn from(e: DictionaryError) -> Self {
        ClientError::FatalInit(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_kinds() {
        assert_eq!(ClientError::NoReply.to_string(), "No reply");
        assert_eq!(
            ClientError::Send("Network is unreachable".into()).to_string(),
            "Failed to send packet: Network is unreachable"
        );
        assert_eq!(
            ClientError::ProtocolRejected(Code::AccessReject).to_string(),
            "Request rejected: Access-Reject"
        );
        assert_eq!(
            ClientError::TimeoutOrSocket(None).kind(),
            ErrorKind::TimeoutOrSocket
        );
    }

    #[test]
    fn test_codec_errors_map_to_kinds() {
        let err: ClientError = CodecError::UnknownAttribute("Foo".into()).into();
        assert_eq!(err.kind(), ErrorKind::UnknownAttribute);
        assert_eq!(err.to_string(), "Invalid attribute");

        let err: ClientError = CodecError::InvalidValue {
            attribute: "NAS-Port".into(),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
