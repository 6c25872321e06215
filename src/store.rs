use crate::error::Result;
use serde::Deserialize;

/// Reserved alias the store accepts in place of the root folder's real id.
pub const ROOT_ALIAS: &str = "root";
pub const PATH_SEP: char = '/';
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
/// Native editor formats live under this prefix and have no binary content.
const NATIVE_DOC_PREFIX: &str = "application/vnd.google-apps.";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "parents")]
    pub parent_ids: Vec<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub size: Option<u64>,
    #[serde(default, rename = "md5Checksum")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub created_time: String,
}

impl ObjectMetadata {
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    pub fn is_directory(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    pub fn is_binary(&self) -> bool {
        self.checksum.is_some() || !self.mime_type.starts_with(NATIVE_DOC_PREFIX)
    }

    /// An editable office-type object with no fixed binary representation.
    pub fn is_document(&self) -> bool {
        !self.is_directory() && !self.is_binary()
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }
}

/// Ordering applied by the store when listing a folder. Every variant except
/// `None` keeps directories ahead of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    None,
    #[default]
    Name,
    Size,
    Created,
}

impl SortOrder {
    pub fn order_by(self) -> Option<&'static str> {
        match self {
            SortOrder::None => None,
            SortOrder::Name => Some("folder,name"),
            SortOrder::Size => Some("folder,quotaBytesUsed desc,name"),
            SortOrder::Created => Some("folder,createdTime desc,name"),
        }
    }
}

/// The remote object store as seen by the resolver and the printer.
pub trait MetadataStore {
    fn get_object(&self, id: &str) -> Result<ObjectMetadata>;

    /// Non-trashed children of `parent_id` named exactly `name`. An empty
    /// vector is not an error.
    fn query_by_name(&self, name: &str, parent_id: &str) -> Result<Vec<ObjectMetadata>>;

    /// Non-trashed children of `parent_id` owned by the caller, every page.
    fn list_children(&self, parent_id: &str, order: SortOrder) -> Result<Vec<ObjectMetadata>>;
}

fn de_opt_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct U64Visitor;
    impl<'de> Visitor<'de> for U64Visitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("u64 or stringified u64 or null")
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
            value.parse::<u64>().map(Some).map_err(E::custom)
        }

        fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Self::Value, E> {
            self.visit_str(&value)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}
