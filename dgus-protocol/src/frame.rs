//! Frame encoding for the DGUS serial protocol.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x5A 0xA5
//! - LENGTH (1 byte): number of bytes that follow (command + payload)
//! - COMMAND (1 byte): register or variable read/write
//! - PAYLOAD (0-249 bytes): command-specific data, big endian

use heapless::Vec;

/// Frame synchronization header
pub const FRAME_HEADER: [u8; 2] = [0x5A, 0xA5];

/// Largest value accepted in the LENGTH byte
pub const MAX_LENGTH: u8 = 250;

/// Maximum payload size in bytes (LENGTH minus the command byte)
pub const MAX_PAYLOAD_SIZE: usize = MAX_LENGTH as usize - 1;

/// Maximum complete frame size (HEADER + LENGTH + COMMAND + MAX_PAYLOAD)
pub const MAX_FRAME_SIZE: usize = 2 + 1 + 1 + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// The two header bytes were not 5A A5
    InvalidHeader,
    /// LENGTH byte is zero or above [`MAX_LENGTH`]
    InvalidLength,
    /// Command byte is not one of the four DGUS commands
    UnknownCommand,
    /// Frame body did not arrive in time
    Timeout,
    /// Invalid frame structure
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// The serial port reported an error
    Serial,
}

/// DGUS command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    WriteRegister = 0x80,
    ReadRegister = 0x81,
    WriteVariable = 0x82,
    ReadVariable = 0x83,
}

impl Command {
    /// Decode a command byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x80 => Some(Self::WriteRegister),
            0x81 => Some(Self::ReadRegister),
            0x82 => Some(Self::WriteVariable),
            0x83 => Some(Self::ReadVariable),
            _ => None,
        }
    }

    /// Wire value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command byte
    pub command: Command,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given command and payload
    pub fn new(command: Command, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            command,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(command: Command) -> Self {
        Self {
            command,
            payload: Vec::new(),
        }
    }

    /// Value of the LENGTH byte for this frame
    pub fn length(&self) -> u8 {
        // payload is bounded by MAX_PAYLOAD_SIZE so this cannot overflow
        (self.payload.len() + 1) as u8
    }

    /// Number of bytes [`Frame::encode`] produces
    pub fn encoded_len(&self) -> usize {
        FRAME_HEADER.len() + 1 + 1 + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[..2].copy_from_slice(&FRAME_HEADER);
        buffer[2] = self.length();
        buffer[3] = self.command.as_u8();
        buffer[4..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Decode a complete frame from a byte slice
    ///
    /// The slice must hold exactly one frame. Used to inspect queued output;
    /// the serial side goes through [`crate::FrameReceiver`].
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < 4 {
            return Err(FrameError::InvalidFrame);
        }
        if bytes[..2] != FRAME_HEADER {
            return Err(FrameError::InvalidHeader);
        }
        let length = bytes[2];
        if length == 0 || length > MAX_LENGTH {
            return Err(FrameError::InvalidLength);
        }
        if bytes.len() != 3 + length as usize {
            return Err(FrameError::InvalidFrame);
        }
        let command = Command::from_u8(bytes[3]).ok_or(FrameError::UnknownCommand)?;
        Self::new(command, &bytes[4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_page_switch() {
        // Switch to page 2: write register 0x03 with 00 02
        let frame = Frame::new(Command::WriteRegister, &[0x03, 0x00, 0x02]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(&encoded[..], &[0x5A, 0xA5, 0x04, 0x80, 0x03, 0x00, 0x02]);
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::empty(Command::ReadRegister);
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(&encoded[..], &[0x5A, 0xA5, 0x01, 0x81]);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(Command::WriteVariable, &[0; 10]).unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(Command::WriteVariable, &payload),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_max_payload_length_byte() {
        let frame = Frame::new(Command::WriteVariable, &[0; MAX_PAYLOAD_SIZE]).unwrap();
        assert_eq!(frame.length(), MAX_LENGTH);
        assert_eq!(frame.encode_to_vec().unwrap().len(), MAX_FRAME_SIZE);
    }

    #[test]
    fn test_command_from_u8() {
        assert_eq!(Command::from_u8(0x83), Some(Command::ReadVariable));
        assert_eq!(Command::from_u8(0x84), None);
        assert_eq!(Command::from_u8(0x00), None);
    }

    #[test]
    fn test_decode_rejects_bad_header() {
        assert_eq!(
            Frame::decode(&[0x5A, 0x5A, 0x01, 0x81]),
            Err(FrameError::InvalidHeader)
        );
    }

    #[test]
    fn test_decode_rejects_length_mismatch() {
        assert_eq!(
            Frame::decode(&[0x5A, 0xA5, 0x03, 0x81, 0x00]),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_decode_encoded_frame() {
        let frame = Frame::new(Command::ReadVariable, &[0x04, 0x00, 0x01, 0x00, 0x02]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(Frame::decode(&encoded), Ok(frame));
    }
}
