use rand::Rng;

/// Offset of the authenticator inside the packet header
pub const AUTHENTICATOR_OFFSET: usize = 4;
/// Length of request and response authenticators
pub const AUTHENTICATOR_LENGTH: usize = 16;

const HEADER_LENGTH: usize = AUTHENTICATOR_OFFSET + AUTHENTICATOR_LENGTH;

/// Generate a random Request Authenticator (16 bytes) per RFC 2865 Section 3
pub fn generate_request_authenticator() -> [u8; 16] {
    let mut rng = rand::rng();
    let mut authenticator = [0u8; 16];
    rng.fill(&mut authenticator);
    authenticator
}

/// Random packet identifier
pub fn generate_identifier() -> u8 {
    rand::rng().random()
}

/// MD5 over the encoded packet with `authenticator` in place of the
/// header authenticator, followed by the secret.
fn digest_with_authenticator(packet: &[u8], authenticator: &[u8; 16], secret: &[u8]) -> [u8; 16] {
    let header_end = HEADER_LENGTH.min(packet.len());
    let mut context = md5::Context::new();
    context.consume(&packet[..AUTHENTICATOR_OFFSET.min(packet.len())]);
    context.consume(authenticator);
    context.consume(&packet[header_end..]);
    context.consume(secret);
    context.compute().0
}

/// Calculate Response Authenticator per RFC 2865 Section 3
///
/// Response Authenticator = MD5(Code + ID + Length + Request Authenticator + Attributes + Secret)
///
/// `reply` is the encoded reply; whatever sits in its authenticator field is
/// ignored.
pub fn calculate_response_authenticator(
    reply: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> [u8; 16] {
    digest_with_authenticator(reply, request_authenticator, secret)
}

/// Verify the Response Authenticator of an encoded reply
pub fn verify_response_authenticator(
    reply: &[u8],
    request_authenticator: &[u8; 16],
    secret: &[u8],
) -> bool {
    if reply.len() < HEADER_LENGTH {
        return false;
    }
    let calculated = calculate_response_authenticator(reply, request_authenticator, secret);
    reply[AUTHENTICATOR_OFFSET..HEADER_LENGTH] == calculated
}

/// Calculate the Request Authenticator of an Accounting-Request
/// (RFC 2866 Section 3). CoA and Disconnect requests use the same rule.
///
/// Request Authenticator = MD5(Code + ID + Length + 16 zero octets + Attributes + Secret)
pub fn calculate_accounting_request_authenticator(packet: &[u8], secret: &[u8]) -> [u8; 16] {
    digest_with_authenticator(packet, &[0u8; 16], secret)
}

/// Encrypt User-Password attribute per RFC 2865 Section 5.2
///
/// The password is first padded to a multiple of 16 bytes, then XORed with
/// MD5(secret + request_authenticator) for the first 16 bytes, and
/// MD5(secret + previous_block) for subsequent blocks.
pub fn encrypt_user_password(password: &[u8], secret: &[u8], authenticator: &[u8; 16]) -> Vec<u8> {
    let mut padded = password.to_vec();
    let blocks = padded.len().div_ceil(16).max(1);
    padded.resize(blocks * 16, 0);

    let mut result = Vec::with_capacity(padded.len());
    let mut previous_block = authenticator.to_vec();

    for chunk in padded.chunks(16) {
        let mut context = md5::Context::new();
        context.consume(secret);
        context.consume(&previous_block);
        let hash = context.compute();

        let encrypted_block: Vec<u8> = chunk.iter().zip(hash.0.iter()).map(|(p, h)| p ^ h).collect();
        result.extend_from_slice(&encrypted_block);
        previous_block = encrypted_block;
    }

    result
}

/// Decrypt User-Password attribute per RFC 2865 Section 5.2
pub fn decrypt_user_password(
    encrypted: &[u8],
    secret: &[u8],
    authenticator: &[u8; 16],
) -> Result<Vec<u8>, String> {
    if encrypted.len() % 16 != 0 || encrypted.is_empty() {
        return Err("Invalid encrypted password length".to_string());
    }

    let mut result = Vec::with_capacity(encrypted.len());
    let mut previous_block: &[u8] = authenticator;

    for chunk in encrypted.chunks(16) {
        let mut context = md5::Context::new();
        context.consume(secret);
        context.consume(previous_block);
        let hash = context.compute();

        result.extend(chunk.iter().zip(hash.0.iter()).map(|(c, h)| c ^ h));
        previous_block = chunk;
    }

    // Remove padding (null bytes at the end)
    while result.last() == Some(&0) {
        result.pop();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(text: &str) -> Vec<u8> {
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&text[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn test_generate_authenticator() {
        let auth1 = generate_request_authenticator();
        let auth2 = generate_request_authenticator();
        // Should be random
        assert_ne!(auth1, auth2);
    }

    #[test]
    fn test_password_encryption_rfc_example() {
        // RFC 2865 Section 7.1
        let authenticator: [u8; 16] = hex("0f403f9473978057bd83d5cb98f4227a").try_into().unwrap();
        let encrypted = encrypt_user_password(b"arctangent", b"xyzzy5461", &authenticator);
        assert_eq!(encrypted, hex("0dbe708d93d413ce3196e43f782a0aee"));
    }

    #[test]
    fn test_password_encryption_decryption() {
        let password = b"a password longer than sixteen bytes";
        let secret = b"sharedsecret";
        let authenticator = [1u8; 16];

        let encrypted = encrypt_user_password(password, secret, &authenticator);
        assert_eq!(encrypted.len(), 48);
        let decrypted = decrypt_user_password(&encrypted, secret, &authenticator).unwrap();
        assert_eq!(decrypted, password);
    }

    #[test]
    fn test_password_encryption_empty() {
        let encrypted = encrypt_user_password(b"", b"sharedsecret", &[1u8; 16]);
        assert_eq!(encrypted.len(), 16); // Should be padded to 16 bytes
    }

    #[test]
    fn test_response_authenticator_rfc_example() {
        let request_auth: [u8; 16] = hex("0f403f9473978057bd83d5cb98f4227a").try_into().unwrap();
        let reply = hex(concat!(
            "02000026",
            "86fe220e7624ba2a1005f6bf9b55e0b2",
            "060600000001",
            "0f0600000000",
            "0e06c0a80103"
        ));

        assert!(verify_response_authenticator(&reply, &request_auth, b"xyzzy5461"));
        assert!(!verify_response_authenticator(&reply, &request_auth, b"wrong"));
        assert!(!verify_response_authenticator(&reply[..10], &request_auth, b"xyzzy5461"));
    }

    #[test]
    fn test_accounting_authenticator_ignores_header_field() {
        let mut packet = vec![4u8, 7, 0, 26];
        packet.extend_from_slice(&[0xaa; 16]);
        packet.extend_from_slice(&[40, 6, 0, 0, 0, 1]);

        let first = calculate_accounting_request_authenticator(&packet, b"secret");
        packet[4..20].fill(0);
        let second = calculate_accounting_request_authenticator(&packet, b"secret");
        assert_eq!(first, second);

        let mut data = packet.clone();
        data.extend_from_slice(b"secret");
        assert_eq!(first, md5::compute(&data).0);
    }
}
