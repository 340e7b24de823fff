//! Opaque 64-bit data handles.
//!
//! Every handle reserves `0` as the invalid value.

use std::fmt;

macro_rules! data_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u64);

        impl $name {
            pub const INVALID: Self = Self(0);

            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

data_handle!(
    /// Identifies a prototype (a data ref).
    PrototypeId
);
data_handle!(
    /// Stable identifier of a prototype across data builds.
    PrototypeGuid
);
data_handle!(
    /// Identifies a localized string.
    LocaleStringId
);
data_handle!(
    /// Identifies an asset inside an asset type.
    AssetId
);
