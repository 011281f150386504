
use serde::{Serialize, Deserialize};

use crate::utils::format_time_tick;

use super::commands::Channel;

// The display grid is fixed by the instrument, not queried
pub const XTICK_COUNT:usize  = 12;
pub const YTICK_COUNT:usize  = 8;
pub const SAMPLE_COUNT:usize = 100 * XTICK_COUNT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveform {
	pub channel: Channel,
	pub xtick_count: usize,
	pub ytick_count: usize,
	pub sample_count: usize,
	pub x_scale: f64,	// [sec/div]
	pub y_scale: f64,	// [V/div]
	pub samples: Vec<f64>,
}

impl Waveform {

	pub fn new(channel:Channel, x_scale:f64, y_scale:f64, samples:Vec<f64>) -> Self {
		Self {
			channel,
			xtick_count: XTICK_COUNT,
			ytick_count: YTICK_COUNT,
			sample_count: SAMPLE_COUNT,
			x_scale,
			y_scale,
			samples,
		}
	}

	pub fn is_empty(&self) -> bool { self.samples.is_empty() }

	// Sample index of each vertical grid line paired with its time label
	pub fn x_ticks(&self) -> Vec<(usize, String)> {
		let step:usize = (self.sample_count / self.xtick_count).max(1);
		(0..self.xtick_count)
			.map(|i| (i * step, format_time_tick(i, self.x_scale)))
			.collect()
	}

	pub fn duration(&self) -> f64 { self.x_scale * (self.xtick_count as f64) }
}
