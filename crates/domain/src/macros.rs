//! Macro for implementing Display and FromStr for status enums
//!
//! Eliminates boilerplate for the enums stored as text columns in the remote
//! store (theme preference, subscription tier and status). Parsing is
//! case-insensitive; the string representation is always lowercase.

/// Implements Display and FromStr traits for status enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = match self {
                    $(Self::$variant => $text,)+
                };
                write!(f, "{text}")
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::CalPilotError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::CalPilotError::InvalidInput(format!(
                        "unknown {} value: {}",
                        stringify!($enum_name),
                        other
                    ))),
                }
            }
        }
    };
}
