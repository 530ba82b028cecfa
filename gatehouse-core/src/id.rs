//! Identity newtypes over platform snowflakes.

use std::fmt;

macro_rules! snowflake_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u64);

        impl $name {
            /// The raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

snowflake_id! {
    /// A platform user.
    UserId
}

snowflake_id! {
    /// A bounded context (a guild, or a sub-section within it) under which
    /// concurrency ceilings and channel configuration are evaluated.
    ScopeId
}

snowflake_id! {
    /// A channel within a scope.
    ChannelId
}

snowflake_id! {
    /// A message rendered into a channel. Live sessions are addressed by the
    /// identity of the message that represents them.
    MessageId
}
