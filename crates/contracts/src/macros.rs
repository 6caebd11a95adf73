//! Declarative helpers shared by the request-parameter enums

/// Generate `ALL`, `as_str`, `Display` and `FromStr` for a fieldless enum
///
/// Parsing is case-insensitive and accepts `-` in place of `_`, so CLI
/// flags and JSON payloads share one spelling table.
///
/// # Usage
/// ```ignore
/// named_variants!(ViewMode, "view mode", {
///     Flat => "flat",
///     Grouped => "grouped",
/// });
/// ```
macro_rules! named_variants {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = crate::ContractError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == wanted)
                    .ok_or_else(|| crate::ContractError::unknown_variant($kind, s))
            }
        }
    };
}
