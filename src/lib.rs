
// Error type shared by every layer
pub mod error;

// Line-terminated command/reply framing over a raw TCP socket (port 5555)
pub mod transport;

// IEEE 488.2 definite-length blocks carrying comma separated ASCII samples
pub mod block;

// Oscilloscope drivers built on the transport
pub mod devices;

// Background capture loop publishing the most recent waveform
pub mod monitor;

pub mod utils;

pub use error::{Error, Result};
