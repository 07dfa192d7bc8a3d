use serde::Deserialize;

/// Process-wide mode
///
/// Passed explicitly to whatever needs it. The only behavior it changes is
/// whether the error responder writes diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Mode {
    /// Running under a test harness; diagnostics are suppressed
    Test,
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Whether failed requests should be written to the diagnostic sink
    pub const fn writes_diagnostics(self) -> bool {
        !matches!(self, Self::Test)
    }
}
