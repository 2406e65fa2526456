//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for enums
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::InterEdError;
///
/// enum_display_fromstr!(
///     MyEnum,
///     InterEdError::invalid_my_enum,
///     {
///         Variant1 => "variant1",
///         Variant2 => "variant_2",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::InterEdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}

/// Macro to declare a status/stage vocabulary.
///
/// Generates the enum with an extra `Unknown(String)` variant, a
/// `Vocabulary` impl (wire value, label, badge color), `Display`, and serde
/// impls that map unrecognized wire values to `Unknown` instead of failing.
///
/// # Usage
///
/// ```rust,ignore
/// vocabulary!(
///     /// Recruitment stage
///     StudentStage, "student stage", {
///         Inquiry => ("inquiry", "Inquiry", Blue),
///         Offer => ("offer", "Offer", Green),
///     }
/// );
/// ```
#[macro_export]
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, {
            $($variant:ident => ($str:literal, $label:literal, $color:ident)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A value outside the known vocabulary, kept verbatim
            Unknown(String),
        }

        impl $crate::types::Vocabulary for $name {
            const KIND: &'static str = $kind;

            fn values() -> &'static [&'static str] {
                &[$($str),+]
            }

            fn parse_lossy(s: &str) -> Self {
                match s {
                    $($str => $name::$variant,)+
                    other => $name::Unknown(other.to_string()),
                }
            }

            fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $str,)+
                    $name::Unknown(raw) => raw.as_str(),
                }
            }

            fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown(_) => "Unknown",
                }
            }

            fn badge(&self) -> $crate::display::BadgeColor {
                match self {
                    $($name::$variant => $crate::display::BadgeColor::$color,)+
                    $name::Unknown(_) => $crate::display::BadgeColor::Gray,
                }
            }

            fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown(_))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::types::Vocabulary::as_str(self))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::types::Vocabulary::as_str(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(<$name as $crate::types::Vocabulary>::parse_lossy(&raw))
            }
        }
    };
}

#[cfg(test)]
mod test {
    use crate::display::BadgeColor;
    use crate::types::Vocabulary;

    crate::vocabulary!(
        TestLevel, "test level", {
            Low => ("low", "Low", Green),
            High => ("high", "High", Red),
        }
    );

    #[test]
    fn test_vocabulary_roundtrip_known() {
        let level: TestLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(level, TestLevel::High);
        assert_eq!(level.label(), "High");
        assert_eq!(level.badge(), BadgeColor::Red);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"high\"");
    }

    #[test]
    fn test_vocabulary_unknown_falls_back_to_gray() {
        let level: TestLevel = serde_json::from_str("\"extreme\"").unwrap();
        assert_eq!(level, TestLevel::Unknown("extreme".to_string()));
        assert!(!level.is_known());
        assert_eq!(level.badge(), BadgeColor::Gray);
        assert_eq!(level.label(), "Unknown");
        assert_eq!(level.to_string(), "extreme");
    }

    #[test]
    fn test_vocabulary_values_in_order() {
        assert_eq!(TestLevel::values(), &["low", "high"]);
    }
}
