/// First hour shown in the roster grid (07:00).
pub const DEFAULT_DAY_START_HOUR: u32 = 7;

/// Last hour shown in the roster grid (22:00, inclusive).
pub const DEFAULT_DAY_END_HOUR: u32 = 22;

/// Timezone roster timestamps are displayed in when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Europe/Amsterdam";

/// Environment variable holding the Airtable personal access token.
pub const DEFAULT_API_KEY_ENV: &str = "AIRTABLE_API_KEY";

/// Placeholder for references whose id is itself missing.
pub const UNKNOWN_LABEL: &str = "unknown";
