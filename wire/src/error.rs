/// Failures raised by send-side frame validation.
///
/// The receive-side codec never raises on partial input - it withholds a
/// unit until enough bytes have arrived. A block that violates the frame
/// contract is only ever rejected before it goes on the wire.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Declared payload length exceeds what a frame can carry.
    #[error("data unit length {length} exceeds the maximum payload of {max} bytes")]
    Oversize { length: u32, max: usize },

    /// Declared payload length disagrees with the bytes actually present.
    #[error("data unit length {declared} does not match payload size {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    /// A supposedly-complete block does not decode to a data unit.
    #[error("block of {size} bytes does not hold a complete frame")]
    Malformed { size: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
