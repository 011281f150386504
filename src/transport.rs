
use std::fmt;
use std::io::{self, Read, Write, ErrorKind};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_PORT:u16 = 5555;
pub const TERMINATOR:u8 = b'\n';
pub const QUERY_MARKER:u8 = b'?';

pub const DEFAULT_TIMEOUT_SEC:f32 = 0.5;
pub const DEFAULT_SETTLE_DURATION_SEC:f32 = 0.02;
pub const DEFAULT_RECV_CHUNK:usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
	addr: SocketAddr,
}

impl Endpoint {
	pub fn new(ip:IpAddr) -> Self { Self::with_port(ip, DEFAULT_PORT) }

	pub fn with_port(ip:IpAddr, port:u16) -> Self { Self{ addr: SocketAddr::new(ip, port) } }

	pub fn addr(&self) -> SocketAddr { self.addr }
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.addr) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	pub timeout: Duration,
	pub settle_delay: Duration,
	pub recv_chunk: usize,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			timeout: Duration::from_secs_f32(DEFAULT_TIMEOUT_SEC),
			settle_delay: Duration::from_secs_f32(DEFAULT_SETTLE_DURATION_SEC),
			recv_chunk: DEFAULT_RECV_CHUNK,
		}
	}
}

impl SessionConfig {
	pub fn with_timeout(timeout:Duration) -> Self { Self{ timeout, ..Self::default() } }
}

// A single outgoing command; whether a reply is expected is decided only by the presence of '?'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
	payload: Vec<u8>,
}

impl Command {
	pub fn new<B: Into<Vec<u8>>>(payload:B) -> Self { Self{ payload: payload.into() } }

	pub fn is_query(&self) -> bool { self.payload.contains(&QUERY_MARKER) }

	pub fn as_bytes(&self) -> &[u8] { &self.payload }

	fn framed(&self) -> Vec<u8> {
		let mut bytes:Vec<u8> = Vec::with_capacity(self.payload.len() + 1);
		bytes.extend_from_slice(&self.payload);
		bytes.push(TERMINATOR);
		bytes
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f:&mut fmt::Formatter) -> fmt::Result { write!(f, "{}", String::from_utf8_lossy(&self.payload)) }
}

impl From<&str> for Command    { fn from(s:&str) -> Self    { Self::new(s) } }
impl From<String> for Command  { fn from(s:String) -> Self  { Self::new(s) } }
impl From<&[u8]> for Command   { fn from(b:&[u8]) -> Self   { Self::new(b) } }
impl From<Vec<u8>> for Command { fn from(b:Vec<u8>) -> Self { Self::new(b) } }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
	// Complete reply with the terminator stripped
	Data(Vec<u8>),
	// Write-only command, nothing was read
	NoReplyExpected,
	// Query, but nothing at all arrived before the deadline
	Empty,
	// Query, some bytes arrived but the terminator never did
	Incomplete(Vec<u8>),
}

impl Reply {
	// Only a terminated reply is usable; anything else reads as empty
	pub fn data(&self) -> &[u8] {
		match self {
			Reply::Data(d) => d,
			_ => &[],
		}
	}

	pub fn is_empty(&self) -> bool { self.data().is_empty() }

	pub fn into_data(self, command:&Command) -> Result<Vec<u8>> {
		match self {
			Reply::Data(d) => Ok(d),
			Reply::Incomplete(_) => Err(Error::Timeout{ command: command.to_string() }),
			Reply::Empty | Reply::NoReplyExpected => Err(Error::EmptyResponse{ command: command.to_string() }),
		}
	}
}

pub struct Session {
	stream: TcpStream,
	endpoint: Endpoint,
	config: SessionConfig,
	open: bool,
}

impl Session {

	pub fn connect(endpoint:Endpoint, config:SessionConfig) -> Result<Self> {
		let stream = TcpStream::connect(endpoint.addr())
			.map_err(|source| Error::Connection{ addr: endpoint.to_string(), source })?;

		// A zero duration is rejected by set_read_timeout, treat it as blocking forever
		let timeout:Option<Duration> = Some(config.timeout).filter(|t| !t.is_zero());
		stream.set_read_timeout(timeout)?;
		stream.set_nodelay(true)?;

		debug!("connected to {} with timeout {:?}", endpoint, config.timeout);
		Ok(Self{ stream, endpoint, config, open: true })
	}

	pub fn endpoint(&self) -> Endpoint { self.endpoint }

	pub fn config(&self) -> &SessionConfig { &self.config }

	pub fn send<C: Into<Command>>(&mut self, command:C) -> Result<Reply> {
		let command:Command = command.into();
		debug!("sending {}", command);

		let start = Instant::now();
		self.stream.write_all(&command.framed())?;

		if !command.is_query() {
			thread::sleep(self.config.settle_delay);
			return Ok(Reply::NoReplyExpected);
		}

		let (buf, terminated) = self.recv_terminated()?;

		if buf.is_empty() {
			error!("did not get any data in reply to {}", command);
			return Ok(Reply::Empty);
		}

		if !terminated {
			warn!("discarding {} bytes of incomplete reply to {}", buf.len(), command);
			return Ok(Reply::Incomplete(buf));
		}

		debug!("reply to {} took {:?} ({} bytes)", command, start.elapsed(), buf.len());

		let mut buf = buf;
		buf.pop();
		Ok(Reply::Data(buf))
	}

	// Send a query and require a complete reply
	pub fn query<C: Into<Command>>(&mut self, command:C) -> Result<Vec<u8>> {
		let command:Command = command.into();
		self.send(command.clone())?.into_data(&command)
	}

	pub fn query_str<C: Into<Command>>(&mut self, command:C) -> Result<String> {
		let command:Command = command.into();
		let data:Vec<u8> = self.query(command.clone())?;
		String::from_utf8(data).map_err(|_| Error::Utf8{ command: command.to_string() })
	}

	pub fn query_f64<C: Into<Command>>(&mut self, command:C) -> Result<f64> {
		let command:Command = command.into();
		let reply:String = self.query_str(command.clone())?;
		reply.trim().parse::<f64>().map_err(|_| Error::InvalidNumber{ command: command.to_string(), reply })
	}

	// Accumulate until the buffer ends with the terminator, the read times out or the peer closes
	fn recv_terminated(&mut self) -> Result<(Vec<u8>, bool)> {
		let mut buf:Vec<u8> = vec![];
		let mut chunk:Vec<u8> = vec![0; self.config.recv_chunk.max(1)];

		loop {
			match self.stream.read(&mut chunk) {
				Ok(0) => {
					warn!("connection to {} closed by instrument", self.endpoint);
					return Ok((buf, false));
				},
				Ok(n) => {
					buf.extend_from_slice(&chunk[..n]);
					if buf.last() == Some(&TERMINATOR) {
						return Ok((buf, true));
					}
				},
				Err(ref e) if is_timeout(e) => {
					warn!("timeout after {} bytes", buf.len());
					return Ok((buf, false));
				},
				Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}
	}

	pub fn close(mut self) -> Result<()> { self.shutdown().map_err(Error::from) }

	fn shutdown(&mut self) -> io::Result<()> {
		if !self.open { return Ok(()); }
		self.open = false;

		debug!("closing connection to {}", self.endpoint);
		match self.stream.shutdown(Shutdown::Both) {
			Err(ref e) if e.kind() == ErrorKind::NotConnected => Ok(()),
			other => other,
		}
	}
}

impl Drop for Session {

	fn drop(&mut self) {
		if let Err(e) = self.shutdown() {
			warn!("unable to close connection to {}: {}", self.endpoint, e);
		}
	}

}

fn is_timeout(e:&io::Error) -> bool {
	// Unix reports an expired read timeout as WouldBlock, Windows as TimedOut
	e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_marker_decides_reply() {
		assert!(Command::from("*IDN?").is_query());
		assert!(Command::from(":DISP:DATA? ON,0,PNG").is_query());
		assert!(!Command::from(":WAV:MODE NORM").is_query());
		assert_eq!(Command::from(":WAV:STAR 1").framed(), b":WAV:STAR 1\n".to_vec());
	}

	#[test]
	fn only_terminated_replies_carry_data() {
		assert_eq!(Reply::Data(b"1.0e-03".to_vec()).data(), b"1.0e-03");
		assert!(Reply::Incomplete(b"#9000".to_vec()).is_empty());
		assert!(Reply::Empty.is_empty());
		assert!(Reply::NoReplyExpected.is_empty());
	}

	#[test]
	fn missing_data_becomes_typed_error() {
		let cmd = Command::from("TIM:SCAL?");
		match Reply::Incomplete(b"5.0".to_vec()).into_data(&cmd) {
			Err(Error::Timeout{ command }) => assert_eq!(command, "TIM:SCAL?"),
			other => panic!("unexpected {:?}", other),
		}
		match Reply::Empty.into_data(&cmd) {
			Err(Error::EmptyResponse{ .. }) => (),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn endpoint_defaults_to_instrument_port() {
		let ep = Endpoint::new("192.168.1.10".parse().unwrap());
		assert_eq!(ep.addr().port(), 5555);
		assert_eq!(ep.to_string(), "192.168.1.10:5555");
	}
}
