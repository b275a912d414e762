//! Outbound frame construction
//!
//! A [`FrameWriter`] accumulates typed values for one register or variable
//! write and hands the finished frame to a [`FrameSink`] in a single call, so
//! a sink only ever sees complete frames.
//!
//! Numbers are big endian on the wire. [`Uint8`] and [`Uint16`] fix the byte
//! order when they are built; the writer copies bytes as they are.

use heapless::Vec;

use crate::frame::{Command, Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::messages::{Register, Variable};
use crate::text::FixedText;

/// Destination of encoded frames
pub trait FrameSink {
    /// Accept one complete encoded frame
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), FrameError>;
}

/// One byte value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uint8(u8);

impl Uint8 {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }
}

/// Two byte value, stored big endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uint16([u8; 2]);

impl Uint16 {
    pub const fn new(value: u16) -> Self {
        Self(value.to_be_bytes())
    }

    /// Signed values keep their two's complement bits
    pub const fn from_i16(value: i16) -> Self {
        Self(value.to_be_bytes())
    }

    pub const fn bytes(self) -> [u8; 2] {
        self.0
    }
}

/// A value that can be appended to a frame payload
pub trait Field {
    fn append_to(&self, payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>) -> Result<(), FrameError>;
}

impl Field for Uint8 {
    fn append_to(&self, payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>) -> Result<(), FrameError> {
        payload.push(self.0).map_err(|_| FrameError::PayloadTooLarge)
    }
}

impl Field for Uint16 {
    fn append_to(&self, payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>) -> Result<(), FrameError> {
        payload
            .extend_from_slice(&self.0)
            .map_err(|_| FrameError::PayloadTooLarge)
    }
}

impl Field for &[u8] {
    fn append_to(&self, payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>) -> Result<(), FrameError> {
        payload
            .extend_from_slice(self)
            .map_err(|_| FrameError::PayloadTooLarge)
    }
}

/// Text goes out null padded to its full capacity
impl<const N: usize> Field for &FixedText<N> {
    fn append_to(&self, payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>) -> Result<(), FrameError> {
        let text = self.as_bytes();
        if payload.len() + N > payload.capacity() {
            return Err(FrameError::PayloadTooLarge);
        }
        // Both fit, checked above
        let _ = payload.extend_from_slice(text);
        let _ = payload.resize(payload.len() + N - text.len(), 0);
        Ok(())
    }
}

/// Builder for one outbound frame
#[derive(Debug, Clone)]
pub struct FrameWriter {
    command: Command,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// Position of the word count byte of a variable write
    word_count_at: Option<usize>,
}

impl FrameWriter {
    fn with_header(command: Command, header: &[u8], word_count_at: Option<usize>) -> Self {
        let mut payload = Vec::new();
        // Headers are at most three bytes
        let _ = payload.extend_from_slice(header);
        Self {
            command,
            payload,
            word_count_at,
        }
    }

    /// Start a register write
    pub fn register_write(register: Register) -> Self {
        Self::with_header(Command::WriteRegister, &[register.address()], None)
    }

    /// Start a variable write
    pub fn variable_write(variable: Variable) -> Self {
        Self::variable_write_at(variable.address())
    }

    /// Start a variable write at a raw address
    pub fn variable_write_at(address: u16) -> Self {
        let [high, low] = address.to_be_bytes();
        Self::with_header(Command::WriteVariable, &[high, low, 0], Some(2))
    }

    /// Request `count` bytes of registers starting at `register`
    pub fn register_read(register: Register, count: u8) -> Self {
        Self::with_header(Command::ReadRegister, &[register.address(), count], None)
    }

    /// Request `words` words of variables starting at `variable`
    pub fn variable_read(variable: Variable, words: u8) -> Self {
        let [high, low] = variable.address().to_be_bytes();
        Self::with_header(Command::ReadVariable, &[high, low, words], None)
    }

    /// Append one value
    pub fn write<F: Field>(&mut self, field: F) -> Result<&mut Self, FrameError> {
        field.append_to(&mut self.payload)?;
        Ok(self)
    }

    /// Payload accumulated so far, header fields included
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Finish the frame
    pub fn finish(&mut self) -> Result<Frame, FrameError> {
        if let Some(at) = self.word_count_at {
            let values = self.payload.len() - (at + 1);
            self.payload[at] = values.div_ceil(2).min(u8::MAX as usize) as u8;
        }
        Frame::new(self.command, &self.payload)
    }

    /// Finish the frame and hand it to `sink`
    pub fn send<S: FrameSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), FrameError> {
        let bytes = self.finish()?.encode_to_vec()?;

        #[cfg(feature = "log-frames")]
        trace!("> {:?}", &bytes[..]);

        sink.send_frame(&bytes)
    }
}

/// Capacity of the [`Outbox`] in bytes
pub const OUTBOX_CAPACITY: usize = 1024;

/// In-memory sink holding complete frames until they are flushed
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    bytes: Vec<u8, OUTBOX_CAPACITY>,
}

impl Outbox {
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Queued bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Iterate over the queued frames
    pub fn frames(&self) -> Frames<'_> {
        Frames { rest: &self.bytes }
    }

    /// Write everything queued in one blocking call and empty the outbox
    ///
    /// The outbox is emptied even when the write fails so a broken link does
    /// not grow the backlog.
    pub fn flush<T: dgus_hal::UartTx>(&mut self, tx: &mut T) -> Result<(), T::Error> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        let result = tx.write_blocking(&self.bytes);
        self.bytes.clear();
        result
    }
}

impl FrameSink for Outbox {
    fn send_frame(&mut self, frame: &[u8]) -> Result<(), FrameError> {
        if self.bytes.len() + frame.len() > OUTBOX_CAPACITY {
            return Err(FrameError::BufferTooSmall);
        }
        self.bytes
            .extend_from_slice(frame)
            .map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Iterator over the frames of an [`Outbox`]
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.len() < 3 {
            return None;
        }
        let end = (3 + self.rest[2] as usize).min(self.rest.len());
        let (frame, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MAX_LENGTH;
    use crate::page::Page;

    struct Recorder {
        frames: std::vec::Vec<std::vec::Vec<u8>>,
    }

    impl FrameSink for Recorder {
        fn send_frame(&mut self, frame: &[u8]) -> Result<(), FrameError> {
            self.frames.push(frame.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_page_switch_frame() {
        let mut sink = Recorder { frames: vec![] };
        FrameWriter::register_write(Register::PictureId)
            .write(Uint8::new(0))
            .unwrap()
            .write(Uint8::new(Page::Preheat.id()))
            .unwrap()
            .send(&mut sink)
            .unwrap();
        assert_eq!(
            sink.frames,
            vec![vec![0x5A, 0xA5, 0x04, 0x80, 0x03, 0x00, 17]]
        );
    }

    #[test]
    fn test_variable_write_word_count() {
        let mut sink = Recorder { frames: vec![] };
        FrameWriter::variable_write(Variable::Value0)
            .write(Uint16::new(0x1234))
            .unwrap()
            .write(Uint16::new(0x00FF))
            .unwrap()
            .send(&mut sink)
            .unwrap();
        assert_eq!(
            sink.frames[0],
            vec![0x5A, 0xA5, 0x08, 0x82, 0x03, 0x00, 0x02, 0x12, 0x34, 0x00, 0xFF]
        );
    }

    #[test]
    fn test_text_is_null_padded() {
        let mut sink = Recorder { frames: vec![] };
        let text = FixedText::<6>::from_text("abc");
        FrameWriter::variable_write(Variable::ShortText0)
            .write(&text)
            .unwrap()
            .send(&mut sink)
            .unwrap();
        assert_eq!(
            &sink.frames[0][4..],
            &[0x01, 0x00, 0x03, b'a', b'b', b'c', 0, 0, 0]
        );
    }

    #[test]
    fn test_odd_bytes_round_word_count_up() {
        let mut writer = FrameWriter::variable_write_at(0x0010);
        writer.write(&[1u8, 2, 3][..]).unwrap();
        let frame = writer.finish().unwrap();
        assert_eq!(&frame.payload[..], &[0x00, 0x10, 0x02, 1, 2, 3]);
    }

    #[test]
    fn test_signed_value_bytes() {
        assert_eq!(Uint16::from_i16(-2).bytes(), [0xFF, 0xFE]);
    }

    #[test]
    fn test_read_requests() {
        let frame = FrameWriter::register_read(Register::TouchPanelFlag, 1)
            .finish()
            .unwrap();
        assert_eq!(frame.command, Command::ReadRegister);
        assert_eq!(&frame.payload[..], &[0x05, 0x01]);

        let frame = FrameWriter::variable_read(Variable::Value0, 2).finish().unwrap();
        assert_eq!(&frame.payload[..], &[0x03, 0x00, 0x02]);
    }

    #[test]
    fn test_write_overflow_is_reported() {
        let mut writer = FrameWriter::variable_write(Variable::LongText0);
        let big = [0u8; MAX_LENGTH as usize];
        assert_eq!(
            writer.write(&big[..]).err(),
            Some(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_outbox_keeps_whole_frames() {
        let mut outbox = Outbox::new();
        let frame = [0x5A, 0xA5, 0x01, 0x81];
        for _ in 0..(OUTBOX_CAPACITY / frame.len()) {
            outbox.send_frame(&frame).unwrap();
        }
        assert_eq!(outbox.send_frame(&frame), Err(FrameError::BufferTooSmall));
        assert_eq!(outbox.len(), OUTBOX_CAPACITY);
        assert_eq!(outbox.frames().count(), OUTBOX_CAPACITY / frame.len());
    }

    #[test]
    fn test_outbox_flush() {
        struct Tx(std::vec::Vec<std::vec::Vec<u8>>);
        impl dgus_hal::UartTx for Tx {
            type Error = ();
            fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
                self.0.push(data.to_vec());
                Ok(())
            }
            fn flush(&mut self) -> Result<(), ()> {
                Ok(())
            }
        }

        let mut outbox = Outbox::new();
        let mut tx = Tx(vec![]);
        outbox.flush(&mut tx).unwrap();
        assert!(tx.0.is_empty());

        outbox.send_frame(&[0x5A, 0xA5, 0x01, 0x81]).unwrap();
        outbox.send_frame(&[0x5A, 0xA5, 0x01, 0x83]).unwrap();
        outbox.flush(&mut tx).unwrap();
        assert_eq!(tx.0.len(), 1);
        assert_eq!(tx.0[0].len(), 8);
        assert!(outbox.is_empty());
    }
}
