
// Human readable time labels for the horizontal grid, e.g. "500ns" or "1.5μs"

const TIME_UNITS:[&str; 4] = ["ns", "μs", "ms", "s"];

// Just below 1000 so that accumulated rounding like 2 * 499.99999999999994 still rolls over
const UNIT_ROLLOVER:f64 = 999.9999999999999;

pub fn format_time_tick(idx:usize, x_scale:f64) -> String {
	let mut per_div:f64 = x_scale / 1e-9;
	let idx_f:f64 = idx as f64;

	let mut unit_idx:usize = 0;
	while idx_f * per_div >= UNIT_ROLLOVER && unit_idx < TIME_UNITS.len() - 1 {
		per_div /= 1000.0;
		unit_idx += 1;
	}

	let value:String = format!("{:.1}", per_div * idx_f);
	let value:&str = value.strip_suffix(".0").unwrap_or(&value);
	format!("{}{}", value, TIME_UNITS[unit_idx])
}
