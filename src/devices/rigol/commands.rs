
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::Error;

pub const IDN:&str                 = "*IDN?";
pub const SCREENSHOT:&str          = ":DISP:DATA?";
pub const SCREENSHOT_SLOW_PNG:&str = ":DISP:DATA? ON,0,PNG";
pub const WAV_MODE_NORM:&str       = ":WAV:MODE NORM";
pub const WAV_FORM_ASCII:&str      = ":WAV:FORM ASC";
pub const WAV_DATA:&str            = ":WAV:DATA?";
pub const TIME_SCALE:&str          = "TIM:SCAL?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
	#[serde(rename = "CHAN1")]
	Chan1,
	#[serde(rename = "CHAN2")]
	Chan2,
}

impl Channel {
	pub fn mnemonic(self) -> &'static str {
		match self {
			Channel::Chan1 => "CHAN1",
			Channel::Chan2 => "CHAN2",
		}
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result { f.write_str(self.mnemonic()) }
}

impl FromStr for Channel {
	type Err = Error;

	fn from_str(s:&str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_uppercase().as_str() {
			"CHAN1" | "1" => Ok(Channel::Chan1),
			"CHAN2" | "2" => Ok(Channel::Chan2),
			_ => Err(Error::InvalidChannel(s.to_owned())),
		}
	}
}

// Per-channel and parameterised mnemonics
pub fn channel_display(chan:Channel) -> String { format!("{}:DISP?", chan) }
pub fn channel_scale(chan:Channel) -> String   { format!("{}:SCAL?", chan) }
pub fn wav_source(chan:Channel) -> String      { format!(":WAV:SOUR {}", chan) }
pub fn wav_start(idx:usize) -> String          { format!(":WAV:STAR {}", idx) }
pub fn wav_stop(idx:usize) -> String           { format!(":WAV:STOP {}", idx) }
