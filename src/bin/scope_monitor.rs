
use std::fs::File;
use std::io;
use std::net::IpAddr;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};

use rigol_capture::devices::rigol::{Channel, Rigol};
use rigol_capture::monitor::CaptureWorker;
use rigol_capture::transport::{Endpoint, SessionConfig, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(about = "Continuously capture one oscilloscope channel and report the latest waveform")]
struct Args {
	/// Instrument IP address
	host: IpAddr,

	#[arg(long, default_value_t = DEFAULT_PORT)]
	port: u16,

	/// CHAN1 or CHAN2
	#[arg(long, default_value = "CHAN2", value_parser = parse_channel)]
	channel: Channel,

	/// Read timeout for each reply
	#[arg(long, default_value_t = 500)]
	timeout_ms: u64,

	/// Delay between captures
	#[arg(long, default_value_t = 500)]
	interval_ms: u64,

	/// How often the latest waveform is read back
	#[arg(long, default_value_t = 500)]
	poll_ms: u64,

	/// Stop after this many polls (runs forever when omitted)
	#[arg(long)]
	polls: Option<u64>,

	/// Rewrite the latest waveform as JSON here on every poll
	#[arg(long)]
	output: Option<String>,
}

fn parse_channel(s:&str) -> Result<Channel, String> { s.parse::<Channel>().map_err(|e| e.to_string()) }

fn main() -> rigol_capture::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let endpoint = Endpoint::with_port(args.host, args.port);
	let config = SessionConfig::with_timeout(Duration::from_millis(args.timeout_ms));

	let mut scope = Rigol::connect(endpoint, config)?;
	info!("{}", scope.get_version()?);

	let worker = CaptureWorker::spawn(scope, args.channel, Duration::from_millis(args.interval_ms));
	let latest = worker.latest();

	let mut polls:u64 = 0;
	while args.polls.map_or(true, |n| polls < n) && worker.is_running() {
		thread::sleep(Duration::from_millis(args.poll_ms));
		polls += 1;

		let wf = match latest.latest() {
			Some(wf) => wf,
			None => { info!("no capture yet"); continue; },
		};

		if wf.is_empty() {
			warn!("{}: no data", wf.channel);
		} else {
			let lo = wf.samples.iter().cloned().fold(f64::INFINITY, f64::min);
			let hi = wf.samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
			let span = wf.x_ticks().last().map(|(_, label)| label.clone()).unwrap_or_default();
			info!("{}: {} samples, {:.3} V .. {:.3} V, {} V/div, last tick {}", wf.channel, wf.samples.len(), lo, hi, wf.y_scale, span);
		}

		if let Some(path) = &args.output {
			let f = File::create(path)?;
			serde_json::to_writer_pretty(f, &*wf).map_err(io::Error::from)?;
		}
	}

	worker.stop()
}
