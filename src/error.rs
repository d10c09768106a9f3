//! Errors raised while decoding a search payload.
//!
//! The graph/selection engine itself never fails; malformed graph input is
//! filtered and stale selections fall back to defaults. Only the payload
//! boundary can reject input.

use thiserror::Error;

/// Why a search payload could not become a result.
#[derive(Debug, Error)]
pub enum PayloadError {
	/// Backend reported a system error (flag 0).
	#[error("search failed")]
	System,
	/// Backend rejected the query; the message is for the user (flag 2).
	#[error("{0}")]
	User(String),
	/// Backend answered with a flag other than 0, 1 or 2.
	#[error("search failed (unexpected response flag {0})")]
	UnexpectedFlag(u8),
	/// Payload is not valid JSON or has the wrong shape.
	#[error("malformed search payload: {0}")]
	Json(#[from] serde_json::Error),
	/// Report date in none of the accepted formats.
	#[error("unrecognized report date {0:?}")]
	Date(String),
}
