//! History configuration loaded from environment variables.

use crate::history::DEFAULT_ACTION_BUFFER_SIZE;

/// History engine configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `ACTION_BUFFER_SIZE` — per-client undo buffer capacity (default: `32`)
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub action_buffer_size: usize,
}

impl HistoryConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            action_buffer_size: std::env::var("ACTION_BUFFER_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACTION_BUFFER_SIZE),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            action_buffer_size: DEFAULT_ACTION_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = HistoryConfig::default();
        assert_eq!(config.action_buffer_size, 32);
    }
}
