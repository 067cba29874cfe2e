//! Configuration constants for font set queries.

use std::time::Duration;

/// Locale preferred when selecting localized font names.
pub const DEFAULT_LOCALE: &str = "en-US";

/// How long a font data fetch may take before details are abandoned.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Interval between locality checks while waiting for font data.
pub const FETCH_POLL_INTERVAL: Duration = Duration::from_millis(20);
