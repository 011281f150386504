
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use image::ImageFormat;
use log::{debug, warn};

use crate::error::{Error, Result};

// "BM" followed by the low byte of the file size, 0x36 for the 800x480 24-bit display dump
pub const BITMAP_MAGIC:[u8; 3] = *b"BM6";

pub const DEFAULT_OUTPUT:&str = "out.png";

#[derive(Debug, Clone)]
pub struct Screenshot {
	bytes: Vec<u8>,
}

impl Screenshot {

	pub fn from_bytes(bytes:Vec<u8>) -> Result<Self> {
		if !bytes.starts_with(&BITMAP_MAGIC) {
			let found:Vec<u8> = bytes.iter().take(BITMAP_MAGIC.len()).cloned().collect();
			return Err(Error::InvalidImageMagic(found));
		}

		let shot = Self{ bytes };
		match shot.declared_size() {
			Some(n) if n != shot.bytes.len() => warn!("bitmap header declares {} bytes, received {}", n, shot.bytes.len()),
			_ => debug!("received {} byte bitmap", shot.bytes.len()),
		}

		Ok(shot)
	}

	pub fn as_bytes(&self) -> &[u8] { &self.bytes }

	pub fn into_bytes(self) -> Vec<u8> { self.bytes }

	// File size field of the BITMAPFILEHEADER
	pub fn declared_size(&self) -> Option<usize> {
		let mut rdr = Cursor::new(self.bytes.get(2..6)?);
		rdr.read_u32::<LittleEndian>().ok().map(|n| n as usize)
	}

	pub fn save_png<P: AsRef<Path>>(&self, path:P) -> Result<()> {
		let img = image::load_from_memory_with_format(&self.bytes, ImageFormat::Bmp)?;
		img.save_with_format(path.as_ref(), ImageFormat::Png)?;
		debug!("saved {}x{} screenshot to {}", img.width(), img.height(), path.as_ref().display());
		Ok(())
	}
}
