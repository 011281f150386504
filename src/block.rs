
// IEEE 488.2 definite-length block, ASCII flavour: #<N><N length digits><comma separated values>

use std::str;

use log::debug;

use crate::error::{Error, Result};

pub const BLOCK_MARKER:u8 = b'#';

fn malformed(msg:String) -> Error { Error::MalformedBlock(msg) }

pub fn decode(buf:&[u8]) -> Result<Vec<f64>> {
	match buf.first() {
		Some(&BLOCK_MARKER) => (),
		Some(b) => return Err(malformed(format!("expected '#' but block starts with {:#04x}", b))),
		None    => return Err(malformed("empty block".to_owned())),
	}

	let n_digits:usize = match buf.get(1) {
		Some(d) if d.is_ascii_digit() => (d - b'0') as usize,
		Some(d) => return Err(malformed(format!("header length {:#04x} is not a digit", d))),
		None    => return Err(malformed("block ends after the marker".to_owned())),
	};

	let payload_start:usize = 2 + n_digits;
	if buf.len() < payload_start {
		return Err(malformed(format!("block ends inside its {}-digit length header", n_digits)));
	}

	// The declared length is informational only, the values are delimited by commas
	let header:&[u8] = &buf[2..payload_start];
	let payload:&[u8] = &buf[payload_start..];
	if let Some(declared) = str::from_utf8(header).ok().and_then(|s| s.parse::<usize>().ok()) {
		if declared != payload.len() {
			debug!("block header declares {} bytes, payload has {}", declared, payload.len());
		}
	}

	let text:&str = str::from_utf8(payload).map_err(|_| malformed("payload is not valid UTF-8".to_owned()))?;
	if text.trim().is_empty() {
		return Ok(vec![]);
	}

	let mut tokens:Vec<&str> = text.split(',').collect();

	// Tolerate a dangling comma before the terminator
	if tokens.len() > 1 && tokens.last().map(|t| t.trim().is_empty()) == Some(true) {
		tokens.pop();
	}

	tokens.iter()
		.map(|t| t.trim().parse::<f64>().map_err(|_| malformed(format!("invalid sample {:?}", t))))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trailing_terminator_is_tolerated() {
		assert_eq!(decode(b"#91234567895.5,6.6\n").unwrap(), vec![5.5, 6.6]);
	}

	#[test]
	fn exponential_without_terminator() {
		assert_eq!(decode(b"#90000155992.219998e+00,9.999949e-02").unwrap(), vec![2.219998, 0.09999949]);
	}

	#[test]
	fn terminator_does_not_change_result() {
		let blocks:[&[u8]; 4] = [
			b"#90000000151.0,-2.5e-01,3",
			b"#15-1e-3",
			b"#2114.000000e+00,4.200000e+00,",
			b"#0  7.25 , 8",
		];
		for blk in blocks.iter() {
			let mut with_lf:Vec<u8> = blk.to_vec();
			with_lf.push(b'\n');
			assert_eq!(decode(blk).unwrap(), decode(&with_lf).unwrap());
		}
	}

	#[test]
	fn header_length_is_not_used_to_bound_payload() {
		assert_eq!(decode(b"#2021.0,2.0,3.0").unwrap(), vec![1.0, 2.0, 3.0]);
	}

	#[test]
	fn missing_marker_is_malformed() {
		let bad_blocks:[&[u8]; 4] = [b"91234567895.5", b"BM6", b"\n", b" #15.5"];
		for bad in bad_blocks.iter() {
			match decode(bad) {
				Err(Error::MalformedBlock(_)) => (),
				other => panic!("{:?} decoded to {:?}", bad, other),
			}
		}
	}

	#[test]
	fn truncated_header_is_malformed() {
		assert!(decode(b"#").is_err());
		assert!(decode(b"#x12").is_err());
		assert!(decode(b"#9123").is_err());
	}

	#[test]
	fn empty_payload_has_no_samples() {
		assert_eq!(decode(b"#9000000000\n").unwrap(), Vec::<f64>::new());
	}

	#[test]
	fn garbage_sample_is_malformed() {
		assert!(decode(b"#9000000011.0,abc,2.0\n").is_err());
	}
}
