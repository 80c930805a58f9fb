/// RADIUS packet codes (RFC 2865 Section 3, RFC 2866, RFC 5176)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Code {
    /// Access-Request (1)
    AccessRequest = 1,
    /// Access-Accept (2)
    AccessAccept = 2,
    /// Access-Reject (3)
    AccessReject = 3,
    /// Accounting-Request (4) - RFC 2866
    AccountingRequest = 4,
    /// Accounting-Response (5) - RFC 2866
    AccountingResponse = 5,
    /// Access-Challenge (11)
    AccessChallenge = 11,
    /// Status-Server (12) - RFC 5997
    StatusServer = 12,
    /// Status-Client (13) - RFC 5997
    StatusClient = 13,
    /// Disconnect-Request (40) - RFC 5176
    DisconnectRequest = 40,
    /// Disconnect-ACK (41) - RFC 5176
    DisconnectAck = 41,
    /// Disconnect-NAK (42) - RFC 5176
    DisconnectNak = 42,
    /// CoA-Request (43) - RFC 5176
    CoaRequest = 43,
    /// CoA-ACK (44) - RFC 5176
    CoaAck = 44,
    /// CoA-NAK (45) - RFC 5176
    CoaNak = 45,
}

impl Code {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Code::AccessRequest),
            2 => Some(Code::AccessAccept),
            3 => Some(Code::AccessReject),
            4 => Some(Code::AccountingRequest),
            5 => Some(Code::AccountingResponse),
            11 => Some(Code::AccessChallenge),
            12 => Some(Code::StatusServer),
            13 => Some(Code::StatusClient),
            40 => Some(Code::DisconnectRequest),
            41 => Some(Code::DisconnectAck),
            42 => Some(Code::DisconnectNak),
            43 => Some(Code::CoaRequest),
            44 => Some(Code::CoaAck),
            45 => Some(Code::CoaNak),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Code::AccessRequest => "Access-Request",
            Code::AccessAccept => "Access-Accept",
            Code::AccessReject => "Access-Reject",
            Code::AccountingRequest => "Accounting-Request",
            Code::AccountingResponse => "Accounting-Response",
            Code::AccessChallenge => "Access-Challenge",
            Code::StatusServer => "Status-Server",
            Code::StatusClient => "Status-Client",
            Code::DisconnectRequest => "Disconnect-Request",
            Code::DisconnectAck => "Disconnect-ACK",
            Code::DisconnectNak => "Disconnect-NAK",
            Code::CoaRequest => "CoA-Request",
            Code::CoaAck => "CoA-ACK",
            Code::CoaNak => "CoA-NAK",
        }
    }

    /// Replies that mean the server accepted the request
    pub fn is_success_reply(self) -> bool {
        matches!(
            self,
            Code::AccessAccept | Code::AccountingResponse | Code::CoaAck | Code::DisconnectAck
        )
    }

    /// Requests whose authenticator is an MD5 over the packet rather than
    /// a random nonce (RFC 2866 Section 3, RFC 5176 Section 2.3)
    pub fn has_computed_authenticator(self) -> bool {
        matches!(
            self,
            Code::AccountingRequest | Code::CoaRequest | Code::DisconnectRequest
        )
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
