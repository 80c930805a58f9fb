use crate::packet::PacketError;

/// RADIUS Attribute as it appears on the wire (RFC 2865 Section 5)
///
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Type      |    Length     |  Value ...
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The value is opaque here; typing happens in [`crate::codec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type (1 byte)
    pub attr_type: u8,
    /// Attribute value (0-253 bytes)
    pub value: Vec<u8>,
}

impl Attribute {
    /// Minimum attribute length (type + length fields = 2 bytes)
    pub const MIN_LENGTH: usize = 2;
    /// Maximum attribute length (255 bytes including type and length)
    pub const MAX_LENGTH: usize = 255;
    /// Maximum value length (253 bytes)
    pub const MAX_VALUE_LENGTH: usize = 253;

    pub fn new(attr_type: u8, value: Vec<u8>) -> Result<Self, PacketError> {
        if value.len() > Self::MAX_VALUE_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Attribute {} value too long: {} bytes (max {})",
                attr_type,
                value.len(),
                Self::MAX_VALUE_LENGTH
            )));
        }
        Ok(Attribute { attr_type, value })
    }

    /// Append the encoded attribute to `buffer`
    pub fn encode_into(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.attr_type);
        buffer.push(self.encoded_length() as u8);
        buffer.extend_from_slice(&self.value);
    }

    /// Decode the attribute at the start of `data`
    pub fn decode(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < Self::MIN_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Attribute data too short: {} bytes",
                data.len()
            )));
        }

        let attr_type = data[0];
        let length = data[1] as usize;

        if length < Self::MIN_LENGTH {
            return Err(PacketError::AttributeError(format!(
                "Invalid length {} for attribute {}",
                length, attr_type
            )));
        }

        if data.len() < length {
            return Err(PacketError::AttributeError(format!(
                "Attribute {} overruns packet: needs {} bytes, {} left",
                attr_type,
                length,
                data.len()
            )));
        }

        Ok(Attribute {
            attr_type,
            value: data[Self::MIN_LENGTH..length].to_vec(),
        })
    }

    /// Get the encoded length of this attribute
    pub fn encoded_length(&self) -> usize {
        Self::MIN_LENGTH + self.value.len()
    }
}

/// Iterator over the attribute section of an encoded packet.
///
/// Yields each attribute together with its byte offset inside the packet.
/// Stops after the first framing error.
pub struct Attributes<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Attributes<'a> {
    /// `packet` is a complete encoded packet; iteration starts after the header
    pub fn new(packet: &'a [u8], header_len: usize) -> Self {
        Attributes {
            data: packet,
            offset: header_len.min(packet.len()),
            failed: false,
        }
    }
}

impl Iterator for Attributes<'_> {
    type Item = Result<(usize, Attribute), PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match Attribute::decode(&self.data[self.offset..]) {
            Ok(attr) => {
                let at = self.offset;
                self.offset += attr.encoded_length();
                Some(Ok((at, attr)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
