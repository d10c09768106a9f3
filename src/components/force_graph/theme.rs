//! Visual theming for the correlation graph.
//!
//! Node fill colors are not themed; they come from report titles so that the
//! graph and the timeline agree. The theme covers everything around them.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity, 0..1.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, new opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let mix = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: mix(self.r),
			g: mix(self.g),
			b: mix(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let mix = |c: u8| (c as f64 * f) as u8;
		Self {
			r: mix(self.r),
			g: mix(self.g),
			b: mix(self.b),
			a: self.a,
		}
	}

	/// Parse `#RRGGBB` (either case). Anything else yields mid gray.
	pub fn from_hex(hex: &str) -> Self {
		let channel = |range: std::ops::Range<usize>| {
			hex.get(range)
				.and_then(|s| u8::from_str_radix(s, 16).ok())
				.unwrap_or(128)
		};
		if hex.len() == 7 && hex.starts_with('#') {
			Self::rgb(channel(1..3), channel(3..5), channel(5..7))
		} else {
			Self::rgb(128, 128, 128)
		}
	}

	/// CSS `rgba()` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Base color.
	pub color: Color,
	/// Center color of the radial gradient.
	pub color_secondary: Color,
	/// Draw a radial gradient instead of a flat fill.
	pub use_gradient: bool,
}

/// Edge lines.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base color.
	pub color: Color,
	/// Draw a moving dash along edges, pointing from citing to cited report.
	pub animated: bool,
}

/// Node drawing options.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Draw a radial gradient instead of a flat fill.
	pub use_gradient: bool,
	/// Ring drawn around the externally focused report.
	pub focus_color: Color,
	/// Label text color.
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Background style.
	pub background: BackgroundStyle,
	/// Edge style.
	pub edge: EdgeStyle,
	/// Node style.
	pub node: NodeStyle,
}

impl Theme {
	/// Dark slate theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				animated: true,
			},
			node: NodeStyle {
				use_gradient: true,
				focus_color: Color::rgb(255, 196, 0),
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
		}
	}

	/// Deep blue night-sky theme
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				animated: true,
			},
			node: NodeStyle {
				use_gradient: true,
				focus_color: Color::rgb(120, 200, 255),
				label_color: Color::rgba(220, 230, 255, 0.85),
			},
		}
	}

	/// Light, flat theme for printing and bright rooms
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 247),
				color_secondary: Color::rgb(250, 250, 247),
				use_gradient: false,
			},
			edge: EdgeStyle {
				color: Color::rgba(90, 90, 100, 0.6),
				animated: false,
			},
			node: NodeStyle {
				use_gradient: false,
				focus_color: Color::rgb(200, 30, 30),
				label_color: Color::rgba(30, 30, 30, 0.9),
			},
		}
	}

	/// Look up a preset by name, falling back to the default.
	pub fn named(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			"paper" => Self::paper(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
