
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	// Fatal, the socket could never be established
	#[error("Unable to connect to instrument at {addr}: {source}")]
	Connection { addr: String, source: io::Error },

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("Timed out waiting for a complete reply to {command}")]
	Timeout { command: String },

	#[error("No data received in reply to {command}")]
	EmptyResponse { command: String },

	#[error("Malformed definite-length block: {0}")]
	MalformedBlock(String),

	#[error("Unable to parse reply to {command} as a number: {reply:?}")]
	InvalidNumber { command: String, reply: String },

	#[error("Screenshot does not start with BM6, found {0:02x?}")]
	InvalidImageMagic(Vec<u8>),

	#[error("Reply to {command} is not valid UTF-8")]
	Utf8 { command: String },

	#[error("Unknown channel {0:?}, expected CHAN1 or CHAN2")]
	InvalidChannel(String),

	#[error("Image error: {0}")]
	Image(#[from] image::ImageError),
}
