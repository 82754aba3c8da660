//! `define_port_error!`: declares an adapter error enum for a driven port.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! field parameters accept anything convertible into the field type, so
//! adapters can write `ExperienceStoreError::query(err.to_string())` or
//! `NotifierError::delivery("provider down")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum MailboxError {
            Bounced { address: String } => "mail to {address} bounced",
            Throttled { retry_after_secs: u64 } => "throttled for {retry_after_secs}s",
            Rejected { address: String, code: u16 } => "{address} rejected with {code}",
            Offline => "mail provider offline",
        }
    }

    #[test]
    fn string_fields_take_str() {
        let err = MailboxError::bounced("ada@example.com");
        assert_eq!(err.to_string(), "mail to ada@example.com bounced");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = MailboxError::throttled(30_u64);
        assert_eq!(err, MailboxError::Throttled { retry_after_secs: 30 });
    }

    #[test]
    fn mixed_and_unit_variants() {
        assert_eq!(
            MailboxError::rejected("ada@example.com", 550_u16).to_string(),
            "ada@example.com rejected with 550"
        );
        assert_eq!(MailboxError::offline().to_string(), "mail provider offline");
    }
}
