//! Tunables for node sizing and the force layout.

/// Space kept free around the plot; the bottom margin holds the year axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
	/// Top margin.
	pub top: f64,
	/// Right margin.
	pub right: f64,
	/// Room for the year axis.
	pub bottom: f64,
	/// Room for the first year.
	pub left: f64,
}

impl Default for Margins {
	fn default() -> Self {
		Self {
			top: 20.0,
			right: 20.0,
			bottom: 70.0,
			left: 50.0,
		}
	}
}

/// Degree-to-radius mapping: `sqrt(degree) * scale + base`, or `min_size`
/// for degree 0 and 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeConfig {
	/// Radius of nodes with degree 0 or 1.
	pub min_size: f64,
	/// Multiplier on the square root of the degree.
	pub scale: f64,
	/// Added to the scaled root.
	pub base: f64,
}

impl SizeConfig {
	/// Visual radius for a raw citation degree.
	pub fn size_for(&self, degree: usize) -> f64 {
		if degree <= 1 {
			self.min_size
		} else {
			(degree as f64).sqrt() * self.scale + self.base
		}
	}
}

impl Default for SizeConfig {
	fn default() -> Self {
		Self {
			min_size: 4.0,
			scale: 5.0,
			base: 10.0,
		}
	}
}

/// Force layout parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Pull toward the node's year on the x axis.
	pub x_strength: f64,
	/// Pull toward the vertical mid-line.
	pub y_strength: f64,
	/// Added to the node size to get the collision radius.
	pub collision_padding: f64,
	/// Ticks run synchronously before the first paint.
	pub pre_ticks: usize,
	/// Plot margins.
	pub margins: Margins,
	/// The clock stops below this temperature.
	pub alpha_min: f64,
	/// Fraction of the remaining temperature lost per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001_f64;
		Self {
			link_distance: 100.0,
			charge_strength: -300.0,
			x_strength: 0.5,
			y_strength: 0.1,
			collision_padding: 5.0,
			pre_ticks: 100,
			margins: Margins::default(),
			alpha_min,
			// Cools from 1 to alpha_min in about 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_size_floor_and_growth() {
		let sizing = SizeConfig::default();
		assert_eq!(sizing.size_for(0), 4.0);
		assert_eq!(sizing.size_for(1), 4.0);
		assert_eq!(sizing.size_for(4), 20.0);
		assert!(sizing.size_for(2) < sizing.size_for(3));
	}

	#[test]
	fn test_alpha_decay_reaches_min_near_300_ticks() {
		let config = LayoutConfig::default();
		let alpha = (1.0 - config.alpha_decay).powi(300);
		assert!((alpha - config.alpha_min).abs() < 1e-9);
	}
}
