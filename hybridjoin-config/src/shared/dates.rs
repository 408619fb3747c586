use serde::{Deserialize, Serialize};

/// Calendar range covered by the generated date dimension.
///
/// Dates are ISO-8601 (`YYYY-MM-DD`) strings and are parsed when the dimension is generated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DateRangeConfig {
    /// First calendar day, inclusive.
    #[serde(default = "default_start")]
    pub start: String,
    /// Last calendar day, inclusive.
    #[serde(default = "default_end")]
    pub end: String,
}

impl DateRangeConfig {
    pub const DEFAULT_START: &'static str = "2015-01-01";

    pub const DEFAULT_END: &'static str = "2021-12-31";
}

impl Default for DateRangeConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
        }
    }
}

fn default_start() -> String {
    DateRangeConfig::DEFAULT_START.to_string()
}

fn default_end() -> String {
    DateRangeConfig::DEFAULT_END.to_string()
}
