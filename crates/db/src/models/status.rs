//! Lifecycle status enums mapped to TEXT columns.
//!
//! Statuses are stored as lowercase text; encoding and decoding delegate to
//! `&str`, which is compatible with both TEXT and VARCHAR columns.

use serde::{Deserialize, Serialize};

use minisite_core::error::CoreError;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// The stored text form.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(CoreError::Internal(format!(
                        concat!("Unknown ", stringify!($name), " value: {}"),
                        other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <&str as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }
    };
}

define_status_enum! {
    /// Lifecycle flag of the minisite record itself (distinct from version
    /// status).
    MinisiteStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

define_status_enum! {
    /// Finer-grained flag used during slug reservation and creation.
    PublishStatus {
        Draft => "draft",
        Reserved => "reserved",
        Published => "published",
    }
}

define_status_enum! {
    /// Status a version row carries. `Published` is a permanent historical
    /// label; liveness is tracked by `minisites.current_version_id`.
    VersionStatus {
        Draft => "draft",
        Published => "published",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_text() {
        assert_eq!(MinisiteStatus::Archived.as_str(), "archived");
        assert_eq!(
            "published".parse::<VersionStatus>().unwrap(),
            VersionStatus::Published
        );
        assert_eq!(
            "reserved".parse::<PublishStatus>().unwrap(),
            PublishStatus::Reserved
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("archived".parse::<VersionStatus>().is_err());
        assert!("".parse::<MinisiteStatus>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&MinisiteStatus::Published).unwrap(),
            "\"published\""
        );
        assert_eq!(
            serde_json::from_str::<VersionStatus>("\"draft\"").unwrap(),
            VersionStatus::Draft
        );
    }
}
