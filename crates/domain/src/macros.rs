//! Macro for implementing string conversions on status enums
//!
//! Every status that is persisted as text (order status, phase status,
//! roles, invoice kinds...) goes through this macro so the stored label,
//! the `Display` output and the parser can never drift apart.
//!
//! # Example
//!
//! ```rust
//! use printshop_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum PaperFinish {
//!     Matte,
//!     Gloss,
//! }
//!
//! impl_domain_status_conversions!(PaperFinish {
//!     Matte => "matte",
//!     Gloss => "gloss",
//! });
//!
//! assert_eq!(PaperFinish::Gloss.as_str(), "gloss");
//! assert_eq!("MATTE".parse::<PaperFinish>().unwrap(), PaperFinish::Matte);
//! ```

/// Implements `as_str`, `ALL`, Display and FromStr for status enums
///
/// Labels must be lowercase; parsing lowercases its input first, so any
/// casing of a label is accepted. Unknown labels are rejected with a message
/// naming the enum.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Stable storage label
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PlateStatus {
        Queued,
        Burning,
        Ready,
    }

    impl_domain_status_conversions!(PlateStatus {
        Queued => "queued",
        Burning => "burning",
        Ready => "ready",
    });

    #[test]
    fn test_display_uses_label() {
        assert_eq!(PlateStatus::Queued.to_string(), "queued");
        assert_eq!(PlateStatus::Burning.as_str(), "burning");
    }

    #[test]
    fn test_fromstr_is_case_insensitive() {
        assert_eq!(PlateStatus::from_str("READY").unwrap(), PlateStatus::Ready);
        assert_eq!(PlateStatus::from_str(" Burning ").unwrap(), PlateStatus::Burning);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = PlateStatus::from_str("melted");
        assert!(result.unwrap_err().contains("Invalid PlateStatus: melted"));
        assert!(PlateStatus::from_str("").is_err());
    }

    #[test]
    fn test_all_lists_variants_in_order() {
        assert_eq!(PlateStatus::ALL, &[PlateStatus::Queued, PlateStatus::Burning, PlateStatus::Ready]);
    }
}
