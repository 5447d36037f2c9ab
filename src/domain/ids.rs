//! Validated identifiers.
//!
//! Every caller-supplied name that ends up as a path component goes through
//! one of these newtypes first. Path construction only accepts the newtypes,
//! so a raw string can never reach the filesystem.

use crate::error::{StoreError, StoreResult};
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The distinguished entry page of every site. It can never be deleted.
pub const INDEX_PAGE: &str = "index";

const MAX_IDENTIFIER_LEN: usize = 128;

// allow-list: ascii alphanumerics, '-' and '_', plus '.' where the kind
// permits it (file names with extensions). '..' and leading dots are always
// rejected.
fn check_identifier(kind: &str, value: &str, allow_dot: bool) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{kind} must not be empty")));
    }
    if value.len() > MAX_IDENTIFIER_LEN {
        return Err(StoreError::Validation(format!(
            "{kind} is longer than {MAX_IDENTIFIER_LEN} bytes"
        )));
    }
    if value.starts_with('.') || value.contains("..") {
        return Err(StoreError::Validation(format!(
            "{kind} {value:?} is not a safe file name"
        )));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || (allow_dot && *c == '.')))
    {
        return Err(StoreError::Validation(format!(
            "{kind} {value:?} contains disallowed character {bad:?}"
        )));
    }
    Ok(())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, allow_dot = $dot:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
        #[display("{}", _0)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: &str) -> StoreResult<Self> {
                check_identifier($kind, value, $dot)?;
                Ok(Self(value.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = StoreError;

            fn try_from(value: String) -> StoreResult<Self> {
                check_identifier($kind, &value, $dot)?;
                Ok(Self(value))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(
    /// Opaque site identifier; a UUID v4 string when generated by the store.
    SiteId,
    "site id",
    allow_dot = false
);

identifier!(
    /// Page identifier, used as the stem of the page's content file.
    PageId,
    "page id",
    allow_dot = false
);

identifier!(
    /// File name of a per-page modification script.
    ScriptName,
    "script name",
    allow_dot = true
);

identifier!(
    /// Name of a template or style inside the external asset bundle.
    AssetName,
    "asset name",
    allow_dot = false
);

impl SiteId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl PageId {
    pub fn index() -> Self {
        Self(INDEX_PAGE.to_string())
    }

    pub fn is_index(&self) -> bool {
        self.0 == INDEX_PAGE
    }
}

impl ScriptName {
    /// `mod-<8 random alphanumerics>.js`
    pub(crate) fn generate() -> Self {
        use rand::distr::{Alphanumeric, SampleString};
        let suffix = Alphanumeric.sample_string(&mut rand::rng(), 8);
        Self(format!("mod-{suffix}.js"))
    }
}
