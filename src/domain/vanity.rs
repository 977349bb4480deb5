//! Vanity mint hints passed to metadata creation

use serde::Serialize;

/// Default search budget for suffix mining when none is configured
pub const DEFAULT_SUFFIX_MAX_MILLIS: u64 = 10_000;

/// Vanity-address instruction for the launchpad
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VanityHint {
    /// Vanity generation explicitly turned off
    Disabled { max_millis: u64 },
    /// Mine a mint address ending in `suffix`
    Suffix { suffix: String, max_millis: u64 },
}

impl VanityHint {
    /// Parse a mode string (`off`, `auto`, `suffix:<text>`).
    ///
    /// `auto`, empty and unrecognised modes yield no hint so the launchpad
    /// applies its own default.
    pub fn from_mode(mode: &str, max_millis: Option<u64>) -> Option<Self> {
        let mode = normalize_mode(mode);
        if mode.is_empty() || mode == "auto" {
            return None;
        }
        if mode == "off" {
            return Some(Self::Disabled {
                max_millis: max_millis.unwrap_or(0),
            });
        }
        if let Some(rest) = mode.strip_prefix("suffix:") {
            let suffix = rest.split(':').next().unwrap_or_default().trim();
            if !suffix.is_empty() {
                return Some(Self::Suffix {
                    suffix: suffix.to_string(),
                    max_millis: max_millis.unwrap_or(DEFAULT_SUFFIX_MAX_MILLIS),
                });
            }
        }
        None
    }

    pub fn max_millis(&self) -> u64 {
        match self {
            Self::Disabled { max_millis } | Self::Suffix { max_millis, .. } => *max_millis,
        }
    }
}

/// Trimmed, lower-cased mode string
pub fn normalize_mode(mode: &str) -> String {
    mode.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_and_empty_give_no_hint() {
        assert_eq!(VanityHint::from_mode("auto", Some(500)), None);
        assert_eq!(VanityHint::from_mode("  ", None), None);
        assert_eq!(VanityHint::from_mode("prefix:abc", None), None);
        assert_eq!(VanityHint::from_mode("suffix:", None), None);
    }

    #[test]
    fn test_off() {
        assert_eq!(
            VanityHint::from_mode(" OFF ", None),
            Some(VanityHint::Disabled { max_millis: 0 })
        );
        assert_eq!(
            VanityHint::from_mode("off", Some(250)),
            Some(VanityHint::Disabled { max_millis: 250 })
        );
    }

    #[test]
    fn test_suffix_lowercased_with_default_budget() {
        let hint = VanityHint::from_mode("suffix:LIME", None).unwrap();
        assert_eq!(
            hint,
            VanityHint::Suffix {
                suffix: "lime".to_string(),
                max_millis: DEFAULT_SUFFIX_MAX_MILLIS
            }
        );
        assert_eq!(hint.max_millis(), 10_000);
    }

    #[test]
    fn test_suffix_keeps_zero_budget() {
        let hint = VanityHint::from_mode("suffix:x", Some(0)).unwrap();
        assert_eq!(
            hint,
            VanityHint::Suffix {
                suffix: "x".to_string(),
                max_millis: 0
            }
        );
    }

    #[test]
    fn test_suffix_takes_first_segment() {
        let hint = VanityHint::from_mode("suffix: ab :cd", Some(3000)).unwrap();
        assert_eq!(
            hint,
            VanityHint::Suffix {
                suffix: "ab".to_string(),
                max_millis: 3000
            }
        );
    }
}
