//! Macro for implementing Display and FromStr for wire-string enums
//!
//! Several resource fields are closed sets of lowercase strings on the wire
//! (user status, for instance). This macro maps each variant to its wire form
//! once and derives both conversions from that table.
//!
//! # Example
//!
//! ```rust
//! use duoadmin_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum EnrollmentState {
//!     Enrolled,
//!     Pending,
//! }
//!
//! impl_domain_status_conversions!(EnrollmentState {
//!     Enrolled => "enrolled",
//!     Pending => "pending",
//! });
//!
//! assert_eq!(EnrollmentState::Pending.to_string(), "pending");
//! assert_eq!("ENROLLED".parse::<EnrollmentState>().unwrap(), EnrollmentState::Enrolled);
//! ```

/// Implements Display and FromStr for an enum from a variant/wire-string table
///
/// Parsing is case-insensitive; Display always emits the table's string.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
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
    enum Platform {
        Ios,
        Android,
        Landline,
    }

    impl_domain_status_conversions!(Platform {
        Ios => "apple ios",
        Android => "google android",
        Landline => "landline",
    });

    #[test]
    fn display_uses_wire_string() {
        assert_eq!(Platform::Ios.to_string(), "apple ios");
        assert_eq!(Platform::Landline.to_string(), "landline");
    }

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!(Platform::from_str(" Google Android ").unwrap(), Platform::Android);
        assert_eq!(Platform::from_str("LANDLINE").unwrap(), Platform::Landline);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = Platform::from_str("windows phone").unwrap_err();
        assert!(err.contains("Invalid Platform: windows phone"));
    }
}
