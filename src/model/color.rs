//! Title-derived report colors shared by the graph and the timeline.

/// Map a report title to a CSS hex color.
///
/// The title is folded with the classic `c + (h << 5) - h` rolling hash over
/// UTF-16 code units in wrapping 32-bit signed arithmetic, masked to 24 bits,
/// and printed as six uppercase hex digits. Distinct titles may collide.
pub fn color_of(title: &str) -> String {
	format!("#{:06X}", hash_title(title) & 0x00ff_ffff)
}

fn hash_title(title: &str) -> i32 {
	title.encode_utf16().fold(0i32, |hash, unit| {
		(unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_title_is_black() {
		assert_eq!(color_of(""), "#000000");
	}

	#[test]
	fn matches_reference_hashes() {
		// "a" = 97 = 0x61
		assert_eq!(color_of("a"), "#000061");
		// "ab" = 98 + (97 << 5) - 97 = 3105 = 0xC21
		assert_eq!(color_of("ab"), "#000C21");
	}

	#[test]
	fn negative_hashes_are_masked() {
		assert_eq!(hash_title("MAXI J1820+070"), -893_787_502);
		assert_eq!(color_of("MAXI J1820+070"), "#B9E292");
		assert_eq!(color_of("Optical spectroscopy of the nova"), "#A9B6DE");
		assert_eq!(color_of("Nova"), "#25244C");
	}

	#[test]
	fn deterministic() {
		let title = "Fermi-LAT detection of renewed gamma-ray activity";
		assert_eq!(color_of(title), color_of(title));
		assert_ne!(color_of(title), color_of("Fermi-LAT detection"));
	}

	#[test]
	fn counts_utf16_units() {
		// U+1F52D is a surrogate pair; both halves feed the hash.
		let high = 0xD83Di32;
		let low = 0xDD2Di32;
		let expected = low.wrapping_add(high.wrapping_shl(5).wrapping_sub(high));
		assert_eq!(hash_title("\u{1F52D}"), expected);
	}
}
