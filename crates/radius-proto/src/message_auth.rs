//! Message-Authenticator Support (RFC 2869 Section 5.14, RFC 3579 Section 3.2)
//!
//! Message-Authenticator provides integrity protection using HMAC-MD5:
//! - Computed as HMAC-MD5(shared_secret, packet)
//! - Always 16 bytes (128 bits)
//!
//! The Message-Authenticator is computed over the entire RADIUS packet with:
//! - the Request Authenticator in the header, for requests and replies alike
//! - Message-Authenticator field set to all zeros during calculation
//!
//! Accounting, CoA and Disconnect requests put 16 zero octets in the header
//! while computing it.

use crate::auth::{AUTHENTICATOR_LENGTH, AUTHENTICATOR_OFFSET};
use hmac::{Hmac, Mac};
use md5_digest::Md5;

type HmacMd5 = Hmac<Md5>;

/// Attribute type of Message-Authenticator
pub const MESSAGE_AUTHENTICATOR: u8 = 80;

/// Calculate Message-Authenticator for a RADIUS packet
///
/// # Arguments
/// * `packet_bytes` - The complete RADIUS packet bytes with Message-Authenticator set to zeros
/// * `secret` - The shared secret
///
/// # Returns
/// 16-byte HMAC-MD5 hash
pub fn calculate_message_authenticator(packet_bytes: &[u8], secret: &[u8]) -> [u8; 16] {
    let mut mac = HmacMd5::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(packet_bytes);

    let mut output = [0u8; 16];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Verify Message-Authenticator in a RADIUS packet
///
/// # Arguments
/// * `packet_bytes` - The complete RADIUS packet bytes
/// * `secret` - The shared secret
/// * `message_auth_offset` - Byte offset where Message-Authenticator value starts (after type+length)
///
/// # Returns
/// true if Message-Authenticator is valid, false otherwise
pub fn verify_message_authenticator(
    packet_bytes: &[u8],
    secret: &[u8],
    message_auth_offset: usize,
) -> bool {
    if message_auth_offset + 16 > packet_bytes.len() {
        return false;
    }

    let received_auth = &packet_bytes[message_auth_offset..message_auth_offset + 16];

    let mut packet_copy = packet_bytes.to_vec();
    packet_copy[message_auth_offset..message_auth_offset + 16].fill(0);

    let expected_auth = calculate_message_authenticator(&packet_copy, secret);
    received_auth == expected_auth
}

/// Verify the Message-Authenticator of a reply.
///
/// The HMAC of a reply covers the request's authenticator, so it is swapped
/// into the header before checking.
pub fn verify_reply_message_authenticator(
    reply_bytes: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
    message_auth_offset: usize,
) -> bool {
    let header_end = AUTHENTICATOR_OFFSET + AUTHENTICATOR_LENGTH;
    if reply_bytes.len() < header_end {
        return false;
    }

    let mut packet_copy = reply_bytes.to_vec();
    packet_copy[AUTHENTICATOR_OFFSET..header_end].copy_from_slice(request_authenticator);
    verify_message_authenticator(&packet_copy, secret, message_auth_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_message_authenticator() {
        let packet = vec![0u8; 20];
        let secret = b"testing123";

        // Should be deterministic
        let auth = calculate_message_authenticator(&packet, secret);
        assert_eq!(auth, calculate_message_authenticator(&packet, secret));
        assert_ne!(auth, calculate_message_authenticator(&packet, b"other"));
    }

    #[test]
    fn test_verify_message_authenticator_valid() {
        let mut packet = vec![0u8; 40];
        let secret = b"testing123";
        let msg_auth_offset = 22;

        let auth = calculate_message_authenticator(&packet, secret);
        packet[msg_auth_offset..msg_auth_offset + 16].copy_from_slice(&auth);

        assert!(verify_message_authenticator(&packet, secret, msg_auth_offset));
        assert!(!verify_message_authenticator(&packet, b"wrong", msg_auth_offset));
    }

    #[test]
    fn test_verify_message_authenticator_invalid() {
        let mut packet = vec![0u8; 40];
        packet[22..38].fill(0xFF);
        assert!(!verify_message_authenticator(&packet, b"testing123", 22));
    }

    #[test]
    fn test_verify_message_authenticator_out_of_bounds() {
        let packet = vec![0u8; 20];
        assert!(!verify_message_authenticator(&packet, b"testing123", 100));
    }

    #[test]
    fn test_reply_uses_request_authenticator() {
        let secret = b"testing123";
        let request_auth = [7u8; 16];

        let mut reply = vec![2u8, 1, 0, 38];
        reply.extend_from_slice(&request_auth);
        reply.extend_from_slice(&[MESSAGE_AUTHENTICATOR, 18]);
        reply.extend_from_slice(&[0u8; 16]);
        let mac = calculate_message_authenticator(&reply, secret);
        reply[22..38].copy_from_slice(&mac);

        // the header now carries the response authenticator
        reply[4..20].fill(0x55);
        assert!(!verify_message_authenticator(&reply, secret, 22));
        assert!(verify_reply_message_authenticator(&reply, &request_auth, secret, 22));
    }
}
