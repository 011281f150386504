
// One thread owns the instrument and keeps publishing the newest capture; any number of readers
// poll the slot on their own schedule.

use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::devices::rigol::{Channel, Rigol, Waveform};
use crate::error::Result;

pub const DEFAULT_CAPTURE_INTERVAL_SEC:f32 = 0.5;

#[derive(Clone, Default)]
pub struct LatestWaveform {
	slot: Arc<Mutex<Option<Arc<Waveform>>>>,
}

impl LatestWaveform {
	pub fn new() -> Self { Self::default() }

	pub fn publish(&self, wf:Waveform) { *self.lock() = Some(Arc::new(wf)); }

	// None until the first capture completes
	pub fn latest(&self) -> Option<Arc<Waveform>> { self.lock().clone() }

	fn lock(&self) -> MutexGuard<Option<Arc<Waveform>>> {
		// The slot only ever holds a complete snapshot, so a poisoned lock is still consistent
		self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}
}

pub struct CaptureWorker {
	stop: Arc<AtomicBool>,
	handle: JoinHandle<Result<()>>,
	latest: LatestWaveform,
}

impl CaptureWorker {

	pub fn spawn(mut scope:Rigol, chan:Channel, interval:Duration) -> Self {
		let stop = Arc::new(AtomicBool::new(false));
		let latest = LatestWaveform::new();

		let (stop_rx, latest_tx) = (stop.clone(), latest.clone());
		let handle = thread::spawn(move || {
			info!("capture worker started on {}", chan);
			scope.setup_channel(chan)?;

			while !stop_rx.load(Ordering::Relaxed) {
				let start = Instant::now();
				match scope.capture_channel(chan) {
					Ok(wf) => latest_tx.publish(wf),
					Err(e) => error!("capture on {} failed: {}", chan, e),
				}
				debug!("capture cycle took {:?}", start.elapsed());
				thread::sleep(interval);
			}

			info!("capture worker on {} stopping", chan);
			scope.close()
		});

		Self{ stop, handle, latest }
	}

	pub fn latest(&self) -> LatestWaveform { self.latest.clone() }

	pub fn is_running(&self) -> bool { !self.handle.is_finished() }

	// Finishes the in-flight cycle, then closes the connection
	pub fn stop(self) -> Result<()> {
		self.stop.store(true, Ordering::Relaxed);
		match self.handle.join() {
			Ok(res) => res,
			Err(panic) => std::panic::resume_unwind(panic),
		}
	}
}
