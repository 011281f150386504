
use std::path::Path;
use std::str;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Serialize, Deserialize};

use crate::block;
use crate::error::{Error, Result};
use crate::transport::{Command, Endpoint, Reply, Session, SessionConfig};

pub mod commands;
pub mod screenshot;
pub mod waveform;

pub use commands::Channel;
pub use screenshot::Screenshot;
pub use waveform::{Waveform, SAMPLE_COUNT, XTICK_COUNT, YTICK_COUNT};

lazy_static! {
	static ref IDN_RE: Regex = Regex::new("^([^,]+),([^,]+),([^,]+),([^,\\s]+)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub manufacturer: String,
	pub model: String,
	pub serial_num: String,
	pub fw_version: String,
}

impl Identity {
	pub fn parse(idn:&str) -> Option<Self> {
		let caps = IDN_RE.captures(idn.trim())?;
		let field = |i:usize| caps.get(i).map(|m| m.as_str().trim().to_owned());

		Some(Self {
			manufacturer: field(1)?,
			model: field(2)?,
			serial_num: field(3)?,
			fw_version: field(4)?,
		})
	}
}

pub struct Rigol {
	session: Session,
}

impl Rigol {

	pub fn connect(endpoint:Endpoint, config:SessionConfig) -> Result<Self> {
		let session = Session::connect(endpoint, config)?;
		info!("connected to {}", endpoint);
		Ok(Self::from_session(session))
	}

	pub fn from_session(session:Session) -> Self { Self{ session } }

	pub fn send<C: Into<Command>>(&mut self, command:C) -> Result<Reply> { self.session.send(command) }

	pub fn get_version(&mut self) -> Result<String> {
		let reply:Reply = self.session.send(commands::IDN)?;
		let info:&str = str::from_utf8(reply.data()).map_err(|_| Error::Utf8{ command: commands::IDN.to_owned() })?;
		Ok(info.trim().to_owned())
	}

	pub fn take_screenshot(&mut self) -> Result<Screenshot> {
		let reply:Reply = self.session.send(commands::SCREENSHOT)?;
		let data:Vec<u8> = match reply {
			Reply::Data(d) => d,
			_ => vec![],
		};
		Screenshot::from_bytes(data)
	}

	pub fn save_screenshot<P: AsRef<Path>>(&mut self, path:P) -> Result<Screenshot> {
		let shot = self.take_screenshot()?;
		shot.save_png(path)?;
		Ok(shot)
	}

	pub fn setup_channel(&mut self, chan:Channel) -> Result<()> {
		let steps:[String; 6] = [
			commands::channel_display(chan),
			commands::WAV_MODE_NORM.to_owned(),
			commands::wav_source(chan),
			commands::WAV_FORM_ASCII.to_owned(),
			commands::wav_start(1),
			commands::wav_stop(SAMPLE_COUNT),
		];

		for cmd in steps.iter() {
			let reply:Reply = self.session.send(cmd.as_str())?;
			debug!("{} -> {:?}", cmd, String::from_utf8_lossy(reply.data()));
		}

		Ok(())
	}

	pub fn capture_channel(&mut self, chan:Channel) -> Result<Waveform> {
		let y_scale:f64 = self.session.query_f64(commands::channel_scale(chan))?;
		let x_scale:f64 = self.session.query_f64(commands::TIME_SCALE)?;

		// An empty or incomplete block means no data this cycle, not a failure
		let raw:Reply = self.session.send(commands::WAV_DATA)?;
		let samples:Vec<f64> = if raw.is_empty() { vec![] } else { block::decode(raw.data())? };

		debug!("captured {} samples on {} ({} s/div, {} V/div)", samples.len(), chan, x_scale, y_scale);
		Ok(Waveform::new(chan, x_scale, y_scale, samples))
	}

	pub fn close(self) -> Result<()> { self.session.close() }
}
