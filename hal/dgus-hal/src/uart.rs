//! UART serial communication abstractions
//!
//! The panel loop is cooperative: reads never wait for data, they report what
//! is already buffered. Writes may block until the bytes are queued.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error: core::fmt::Debug;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until every queued byte has left the transmitter
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
///
/// Non-blocking: callers check [`UartRx::available`] before reading.
pub trait UartRx {
    /// Error type for receive operations
    type Error: core::fmt::Debug;

    /// Number of bytes already received and waiting to be read
    fn available(&self) -> usize;

    /// Read up to `buf.len()` buffered bytes
    ///
    /// Never waits: returns the number of bytes copied, which may be less
    /// than requested.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte, if one is buffered
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }
}

/// Serial port whose speed can be changed at runtime
pub trait SetBaudrate {
    /// Error type for reconfiguration
    type Error: core::fmt::Debug;

    /// Reconfigure the port
    ///
    /// Implementations may drop bytes still in flight; callers flush first.
    fn set_baudrate(&mut self, baudrate: u32) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8N1 at the given speed
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        // DGUS panels ship configured for 115200 8N1
        Self::with_baudrate(115200)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bytes<'a>(&'a [u8]);

    impl UartRx for Bytes<'_> {
        type Error = ();

        fn available(&self) -> usize {
            self.0.len()
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_byte_drains_one_at_a_time() {
        let mut rx = Bytes(&[0x5A, 0xA5]);
        assert_eq!(rx.read_byte(), Ok(Some(0x5A)));
        assert_eq!(rx.available(), 1);
        assert_eq!(rx.read_byte(), Ok(Some(0xA5)));
        assert_eq!(rx.read_byte(), Ok(None));
    }

    #[test]
    fn test_default_config_is_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 115200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
