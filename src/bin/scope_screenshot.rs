
use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use log::info;

use rigol_capture::devices::rigol::{Identity, Rigol};
use rigol_capture::devices::rigol::screenshot::DEFAULT_OUTPUT;
use rigol_capture::transport::{Endpoint, SessionConfig, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(about = "Print the oscilloscope identity and save its display as PNG")]
struct Args {
	/// Instrument IP address
	host: IpAddr,

	#[arg(long, default_value_t = DEFAULT_PORT)]
	port: u16,

	// The bitmap is large, give it longer than a scale query
	#[arg(long, default_value_t = 5000)]
	timeout_ms: u64,

	#[arg(long, default_value = DEFAULT_OUTPUT)]
	output: String,
}

fn main() -> rigol_capture::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let endpoint = Endpoint::with_port(args.host, args.port);
	let mut scope = Rigol::connect(endpoint, SessionConfig::with_timeout(Duration::from_millis(args.timeout_ms)))?;

	let version:String = scope.get_version()?;
	match Identity::parse(&version) {
		Some(idn) => println!("{}", serde_json::to_string_pretty(&idn).map_err(std::io::Error::from)?),
		None      => println!("{}", version),
	}

	let shot = scope.save_screenshot(&args.output)?;
	info!("saved {} byte screenshot to {}", shot.as_bytes().len(), args.output);

	scope.close()
}
