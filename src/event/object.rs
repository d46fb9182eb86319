use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::resource::ObjectName;

/// Storage object resource carried by a change notification.
///
/// Mirrors the provider's JSON object representation. Unknown fields are
/// ignored. Missing fields and explicit `null`s take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageObject {
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub self_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub media_link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bucket: String,
    #[serde(deserialize_with = "int64")]
    pub generation: i64,
    #[serde(deserialize_with = "int64")]
    pub metageneration: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_encoding: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_disposition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content_language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cache_control: String,
    #[serde(deserialize_with = "null_as_default")]
    pub storage_class: String,
    #[serde(deserialize_with = "int64")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub md5_hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub crc32c: String,
    #[serde(deserialize_with = "null_as_default")]
    pub etag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub component_count: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, String>,
    pub time_created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub time_deleted: Option<DateTime<Utc>>,
    pub time_storage_class_updated: Option<DateTime<Utc>>,
    pub custom_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub event_based_hold: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub temporary_hold: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub kms_key_name: String,
}

impl StorageObject {
    /// Resource name of this object within `project_id`.
    pub fn object_name(&self, project_id: &str) -> ObjectName {
        ObjectName::new(project_id, &self.bucket, &self.name)
    }

    /// Version ordering key: newer generations win, then newer metagenerations.
    pub fn version(&self) -> (i64, i64) {
        (self.generation, self.metageneration)
    }
}

/// Reads an explicit `null` as the field's zero value.
fn null_as_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts an int64 encoded either as a JSON number or as a decimal string.
/// `null` reads as 0.
fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct Int64Visitor;

    impl Visitor<'_> for Int64Visitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an integer or a decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(Int64Visitor)
}
