/// Configures per-request behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request HTTP timeout in milliseconds. Expiry cancels the
    /// in-flight call promptly and surfaces as a transport error.
    pub timeout_ms: u64,
    /// Server-side statement timeout in seconds, when set. `None` leaves the
    /// server default in place.
    pub statement_timeout_secs: Option<u64>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            statement_timeout_secs: None,
        }
    }
}
