//! Runtime settings
//!
//! Read once from the environment at startup. Bad values fall back to the
//! defaults with a warning instead of aborting.

use tracing::warn;

/// Products a single comparison may hold by default
pub const DEFAULT_MAX_CANDIDATES: usize = 5;
/// Hard ceiling for `UPM_MAX_CANDIDATES`
pub const MAX_CANDIDATES_LIMIT: usize = 20;
pub const DEFAULT_CURRENCY: &str = "₽";

pub const ENV_MAX_CANDIDATES: &str = "UPM_MAX_CANDIDATES";
pub const ENV_CURRENCY: &str = "UPM_CURRENCY";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Upper bound on products submitted to one comparison
    pub max_candidates: usize,
    /// Symbol used in price labels ("₽/kg")
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_candidates: DEFAULT_MAX_CANDIDATES,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `UPM_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_MAX_CANDIDATES) {
            match raw.trim().parse::<usize>() {
                Ok(n) => {
                    let clamped = n.clamp(crate::pricing::MIN_CANDIDATES, MAX_CANDIDATES_LIMIT);
                    if clamped != n {
                        warn!("{}={} out of range, using {}", ENV_MAX_CANDIDATES, n, clamped);
                    }
                    settings.max_candidates = clamped;
                }
                Err(_) => {
                    warn!(
                        "Could not parse {}='{}', using default {}",
                        ENV_MAX_CANDIDATES, raw, DEFAULT_MAX_CANDIDATES
                    );
                }
            }
        }

        if let Some(raw) = lookup(ENV_CURRENCY) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                warn!("{} is empty, using default {}", ENV_CURRENCY, DEFAULT_CURRENCY);
            } else {
                settings.currency = trimmed.to_string();
            }
        }

        settings
    }
}
