//! Non-blocking frame reception
//!
//! The panel sends whole frames back to back. The receiver never blocks the
//! printer loop: it reads the header as soon as three bytes are buffered,
//! then leaves the body in the UART until it has arrived completely.

use dgus_hal::UartRx;

use crate::frame::{Command, Frame, FrameError, FRAME_HEADER, MAX_LENGTH};

/// Time allowed for a frame body to arrive once its header was read
pub const FRAME_TIMEOUT_MS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReceiveState {
    /// Waiting for a header
    Idle,
    /// Header read, waiting for `length` more bytes
    Body { length: u8, started_ms: u32 },
}

/// Pulls frames out of a [`UartRx`] one at a time
#[derive(Debug, Clone)]
pub struct FrameReceiver {
    state: ReceiveState,
    timeout_ms: u32,
}

impl Default for FrameReceiver {
    fn default() -> Self {
        Self::new(FRAME_TIMEOUT_MS)
    }
}

impl FrameReceiver {
    /// Create a receiver with the given body timeout
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            state: ReceiveState::Idle,
            timeout_ms,
        }
    }

    /// True while a header has been consumed and its body is pending
    pub fn is_receiving(&self) -> bool {
        matches!(self.state, ReceiveState::Body { .. })
    }

    /// Forget any partially received frame
    pub fn reset(&mut self) {
        self.state = ReceiveState::Idle;
    }

    /// Try to receive one frame
    ///
    /// Returns `Ok(Some(frame))` when a complete frame was read, `Ok(None)`
    /// when fewer bytes than needed are buffered, or `Err` on a malformed
    /// header, an unknown command or a body that timed out. After an error
    /// the receiver is idle again and the next call resynchronizes on the
    /// following bytes.
    pub fn try_receive<R: UartRx>(
        &mut self,
        rx: &mut R,
        now_ms: u32,
    ) -> Result<Option<Frame>, FrameError> {
        if self.state == ReceiveState::Idle {
            if rx.available() < 3 {
                return Ok(None);
            }

            // Byte by byte so a bad first byte only costs that one byte
            if read_one(rx)? != FRAME_HEADER[0] {
                return Err(FrameError::InvalidHeader);
            }
            if read_one(rx)? != FRAME_HEADER[1] {
                return Err(FrameError::InvalidHeader);
            }
            let length = read_one(rx)?;
            if length == 0 || length > MAX_LENGTH {
                return Err(FrameError::InvalidLength);
            }

            self.state = ReceiveState::Body {
                length,
                started_ms: now_ms,
            };
        }

        let ReceiveState::Body { length, started_ms } = self.state else {
            return Ok(None);
        };

        if rx.available() < length as usize {
            if now_ms.wrapping_sub(started_ms) > self.timeout_ms {
                self.state = ReceiveState::Idle;
                return Err(FrameError::Timeout);
            }
            return Ok(None);
        }

        self.state = ReceiveState::Idle;

        let mut buffer = [0u8; MAX_LENGTH as usize];
        let body = &mut buffer[..length as usize];
        read_exact(rx, body)?;

        #[cfg(feature = "log-frames")]
        trace!("< {:?}", &body[..]);

        let command = Command::from_u8(body[0]).ok_or(FrameError::UnknownCommand)?;
        Frame::new(command, &body[1..]).map(Some)
    }
}

fn read_one<R: UartRx>(rx: &mut R) -> Result<u8, FrameError> {
    match rx.read_byte() {
        Ok(Some(byte)) => Ok(byte),
        Ok(None) => Err(FrameError::InvalidFrame),
        Err(_) => Err(FrameError::Serial),
    }
}

fn read_exact<R: UartRx>(rx: &mut R, mut buf: &mut [u8]) -> Result<(), FrameError> {
    while !buf.is_empty() {
        match rx.read(buf) {
            Ok(0) => return Err(FrameError::InvalidFrame),
            Ok(n) => buf = &mut buf[n..],
            Err(_) => return Err(FrameError::Serial),
        }
    }
    Ok(())
}
