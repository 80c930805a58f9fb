//! In-process RADIUS responder for session tests

#![allow(dead_code)]

use radius_proto::auth::{
    calculate_accounting_request_authenticator, calculate_response_authenticator,
    decrypt_user_password,
};
use radius_proto::{Attribute, Code, Codec, CodecMode, Dictionary, Operator, Packet};
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

pub const SECRET: &[u8] = b"testing123";

pub const USER_NAME: u8 = 1;
pub const USER_PASSWORD: u8 = 2;
pub const REPLY_MESSAGE: u8 = 18;

/// How the responder answers one datagram
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Accept when User-Name/User-Password match, reject otherwise
    Credentials {
        user: &'static str,
        password: &'static str,
        message: &'static str,
    },
    /// Access-Accept carrying the given attributes
    Accept(Vec<(u8, Vec<u8>)>),
    /// Access-Reject with a Reply-Message
    Reject(&'static str),
    /// Access-Accept with Reply-Message and a Message-Authenticator
    AcceptSigned(&'static str),
    /// Correct packet signed with another secret
    WrongSecret,
    /// Correct packet with the identifier off by one
    WrongIdentifier,
    /// Bytes that are not a RADIUS packet
    Garbage,
    /// Access-Accept carrying attribute 250, unknown to the dictionary
    UnknownAttribute,
    /// Accounting-Response after checking the request authenticator
    AccountingResponse,
    /// Correct reply sent from a different socket
    OtherSource,
    /// Never answer
    Silent,
}

/// Raw request as seen by the responder
#[derive(Debug, Clone)]
pub struct Received {
    pub code: Code,
    pub identifier: u8,
    pub authenticator: [u8; 16],
    pub attributes: Vec<Attribute>,
}

impl Received {
    pub fn attribute(&self, attr_type: u8) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|a| a.attr_type == attr_type)
            .map(|a| a.value.as_slice())
    }
}

/// Reply bytes laid out by hand and signed with `secret`
pub fn literal_reply(
    code: Code,
    identifier: u8,
    request_authenticator: &[u8; 16],
    attributes: &[(u8, Vec<u8>)],
    secret: &[u8],
) -> Vec<u8> {
    let mut bytes = vec![code.as_u8(), identifier, 0, 0];
    bytes.extend_from_slice(&[0u8; 16]);
    for (attr_type, value) in attributes {
        bytes.push(*attr_type);
        bytes.push((value.len() + 2) as u8);
        bytes.extend_from_slice(value);
    }
    let len = bytes.len() as u16;
    bytes[2..4].copy_from_slice(&len.to_be_bytes());

    let authenticator = calculate_response_authenticator(&bytes, request_authenticator, secret);
    bytes[4..20].copy_from_slice(&authenticator);
    bytes
}

fn answer(behaviour: &Behaviour, request: &Received) -> Option<Vec<u8>> {
    let id = request.identifier;
    let auth = &request.authenticator;

    let bytes = match behaviour {
        Behaviour::Credentials {
            user,
            password,
            message,
        } => {
            let name_ok = request.attribute(USER_NAME) == Some(user.as_bytes());
            let password_ok = request
                .attribute(USER_PASSWORD)
                .and_then(|hidden| decrypt_user_password(hidden, SECRET, auth).ok())
                .is_some_and(|clear| clear == password.as_bytes());
            let code = if name_ok && password_ok {
                Code::AccessAccept
            } else {
                Code::AccessReject
            };
            literal_reply(code, id, auth, &[(REPLY_MESSAGE, message.as_bytes().to_vec())], SECRET)
        }
        Behaviour::Accept(attributes) => literal_reply(Code::AccessAccept, id, auth, attributes, SECRET),
        Behaviour::Reject(message) => literal_reply(
            Code::AccessReject,
            id,
            auth,
            &[(REPLY_MESSAGE, message.as_bytes().to_vec())],
            SECRET,
        ),
        Behaviour::AcceptSigned(message) => {
            let dict = Dictionary::builtin().ok()?;
            let codec = Codec::new(&dict, CodecMode::Strict);
            let mut reply = Packet::new(Code::AccessAccept, id, [0u8; 16]);
            reply.add_pair(codec.encode("Reply-Message", Operator::Eq, message).ok()??);
            reply.add_pair(codec.encode("Message-Authenticator", Operator::Eq, "0x00").ok()??);
            reply.sign_reply(auth, SECRET).ok()?.to_vec()
        }
        Behaviour::WrongSecret => literal_reply(Code::AccessAccept, id, auth, &[], b"not-the-secret"),
        Behaviour::WrongIdentifier => {
            literal_reply(Code::AccessAccept, id.wrapping_add(1), auth, &[], SECRET)
        }
        Behaviour::Garbage => b"definitely not radius".to_vec(),
        Behaviour::UnknownAttribute => {
            literal_reply(Code::AccessAccept, id, auth, &[(250, b"??".to_vec())], SECRET)
        }
        Behaviour::AccountingResponse => {
            let mut zeroed = encode_received(request);
            zeroed[4..20].fill(0);
            if calculate_accounting_request_authenticator(&zeroed, SECRET) != *auth {
                return None;
            }
            literal_reply(Code::AccountingResponse, id, auth, &[], SECRET)
        }
        Behaviour::OtherSource => literal_reply(Code::AccessAccept, id, auth, &[], SECRET),
        Behaviour::Silent => return None,
    };
    Some(bytes)
}

fn encode_received(request: &Received) -> Vec<u8> {
    let mut bytes = vec![request.code.as_u8(), request.identifier, 0, 0];
    bytes.extend_from_slice(&request.authenticator);
    for attr in &request.attributes {
        attr.encode_into(&mut bytes);
    }
    let len = bytes.len() as u16;
    bytes[2..4].copy_from_slice(&len.to_be_bytes());
    bytes
}

fn parse_request(data: &[u8]) -> Option<Received> {
    let packet = Packet::parse(data).ok()?;
    let attributes = packet
        .attributes()
        .ok()?
        .map(|a| a.map(|(_, attr)| attr))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    Some(Received {
        code: packet.code(),
        identifier: packet.identifier(),
        authenticator: *packet.authenticator(),
        attributes,
    })
}

/// Answer one datagram per behaviour, in order. The task yields every
/// request it saw.
pub async fn spawn_responder(behaviours: Vec<Behaviour>) -> (SocketAddr, JoinHandle<Vec<Received>>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        let mut buf = vec![0u8; 4096];
        for behaviour in behaviours {
            let (len, from) = socket.recv_from(&mut buf).await.unwrap();
            let request = parse_request(&buf[..len]).expect("responder got a malformed request");

            if let Some(reply) = answer(&behaviour, &request) {
                if let Behaviour::OtherSource = behaviour {
                    let other = UdpSocket::bind("127.0.0.1:0").await.unwrap();
                    other.send_to(&reply, from).await.unwrap();
                } else {
                    socket.send_to(&reply, from).await.unwrap();
                }
            }
            seen.push(request);
        }
        seen
    });

    (addr, handle)
}
