//! Year axis scale.

/// Linear mapping from publication year to screen x, padded by a year on
/// each side so the oldest and newest documents sit inside the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YearScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl YearScale {
	/// `None` for an empty year set.
	pub fn from_years<I>(years: I, range: (f64, f64)) -> Option<Self>
	where
		I: IntoIterator<Item = i32>,
	{
		let mut years = years.into_iter();
		let first = years.next()?;
		let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
		Some(Self {
			domain: (f64::from(min) - 1.0, f64::from(max) + 1.0),
			range,
		})
	}

	/// Padded year range.
	pub fn domain(&self) -> (f64, f64) {
		self.domain
	}

	/// Screen x range.
	pub fn range(&self) -> (f64, f64) {
		self.range
	}

	/// Screen x of `year`.
	pub fn scale(&self, year: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		r0 + (year - d0) / (d1 - d0) * (r1 - r0)
	}

	/// Roughly `count` whole-year ticks on 1-2-5 steps inside the domain.
	pub fn ticks(&self, count: usize) -> Vec<i32> {
		let (start, stop) = self.domain;
		let step = tick_step(start, stop, count.max(1)).max(1.0);
		let first = (start / step).ceil() as i64;
		let last = (stop / step).floor() as i64;
		(first..=last).map(|i| (i as f64 * step) as i32).collect()
	}
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
	let raw = (stop - start) / count as f64;
	let power = raw.log10().floor();
	let error = raw / 10f64.powf(power);
	let factor = if error >= 50f64.sqrt() {
		10.0
	} else if error >= 10f64.sqrt() {
		5.0
	} else if error >= 2f64.sqrt() {
		2.0
	} else {
		1.0
	};
	factor * 10f64.powf(power)
}
