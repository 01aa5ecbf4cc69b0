//! `define_port_error!` declares the error enum of a driven port.
//!
//! Every variant carries named fields and a `thiserror` message. Fields may
//! carry their own doc comments. The macro
//! adds a snake_case constructor per variant whose arguments take anything
//! convertible into the field types, so adapters can write
//! `UserPersistenceError::query(err.to_string())` or
//! `UserPersistenceError::query("pool closed")` alike.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $($(#[$field_meta:meta])* $field:ident : $ty:ty),+ $(,)?
                } => $message:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($(#[$field_meta])* $field: $ty),+ },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    /// Construct this variant from convertible field values.
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;
