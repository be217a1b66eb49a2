//! Fixed-length command encoding
//!
//! Every command the driver sends is a [`CommandSeq`]: a byte array whose
//! length is checked at compile time. Transmission is a single
//! [`DsiLink::write_buffer`] call with no retry; the transport's error is
//! returned unchanged.

use platform::DsiLink;

/// Longest command the driver ever sends (`BD` + 15 frame-rate bytes).
pub const MAX_COMMAND_LEN: usize = 16;

/// A validated command: opcode followed by its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSeq<const N: usize>([u8; N]);

impl<const N: usize> CommandSeq<N> {
    const VALID_LEN: () = assert!(
        N > 0 && N <= MAX_COMMAND_LEN,
        "command sequences must be 1..=16 bytes"
    );

    /// Wrap `bytes`. Fails to compile when `N` is 0 or larger than
    /// [`MAX_COMMAND_LEN`].
    pub const fn new(bytes: [u8; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_LEN;
        Self(bytes)
    }

    /// Raw bytes.
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Command opcode (first byte).
    pub const fn opcode(&self) -> u8 {
        match self.0.first() {
            Some(b) => *b,
            None => 0,
        }
    }
}

/// Write `bytes` to `link` as one packet.
pub fn write<L: DsiLink>(link: &mut L, bytes: &[u8]) -> Result<usize, L::Error> {
    trace!(
        "dsi write cmd {:#x} len {}",
        bytes.first().copied().unwrap_or(0),
        bytes.len()
    );
    link.write_buffer(bytes)
}

/// Send a validated command to `link`.
pub fn send<L: DsiLink, const N: usize>(
    link: &mut L,
    cmd: &CommandSeq<N>,
) -> Result<usize, L::Error> {
    write(link, cmd.as_bytes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{MockDsiLink, Recorder};

    #[test]
    fn send_writes_exact_bytes_once() {
        let rec = Recorder::new();
        let mut link = MockDsiLink::new(0, &rec);
        let cmd = CommandSeq::new([0xD4, 0x88, 0x88]);
        assert_eq!(send(&mut link, &cmd).unwrap(), 3);
        assert_eq!(rec.writes_on(0), vec![vec![0xD4, 0x88, 0x88]]);
    }

    #[test]
    fn longest_command_fits() {
        let cmd = CommandSeq::new([0u8; MAX_COMMAND_LEN]);
        assert_eq!(cmd.as_bytes().len(), MAX_COMMAND_LEN);
    }

    #[test]
    fn opcode_is_first_byte() {
        assert_eq!(CommandSeq::new([0x58, 0x01]).opcode(), 0x58);
    }

    #[test]
    fn transport_error_is_returned_unchanged() {
        let rec = Recorder::new();
        let mut link = MockDsiLink::new(0, &rec).fail_at_write(0);
        let err = send(&mut link, &CommandSeq::new([0x11])).unwrap_err();
        assert_eq!(err, platform::mocks::MockError::Injected);
        assert!(rec.writes().is_empty());
    }
}
