//! Namespace Codec - typed tables persisted as one substrate key each.
//!
//! A namespace is a whole logical table ("all interaction records", "all
//! saved entries"). It is read, modified and written back as a unit, so
//! two contexts writing the same namespace concurrently resolve
//! last-writer-wins.
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, Clone, Default)]
//! #[serde(transparent)]
//! struct SavedTable(Vec<SavedEntry>);
//!
//! impl Namespace for SavedTable {
//!     const KIND: NamespaceKind = NamespaceKind::SavedItems;
//! }
//!
//! let repo = ctx.namespace::<SavedTable>();
//! let mut table = repo.load()?;
//! table.0.push(entry);
//! repo.save(&table)?;
//! ```

mod repository;

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::StoreError;

pub(crate) use repository::NamespaceRepository;

/// The logical tables this store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceKind {
    Interactions,
    SavedItems,
    LikedItems,
    VisitHistory,
    TasteAnalysis,
}

impl NamespaceKind {
    pub const ALL: [NamespaceKind; 5] = [
        NamespaceKind::Interactions,
        NamespaceKind::SavedItems,
        NamespaceKind::LikedItems,
        NamespaceKind::VisitHistory,
        NamespaceKind::TasteAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceKind::Interactions => "interactions",
            NamespaceKind::SavedItems => "saved_items",
            NamespaceKind::LikedItems => "liked_items",
            NamespaceKind::VisitHistory => "visit_history",
            NamespaceKind::TasteAnalysis => "taste_analysis",
        }
    }

    /// Full substrate key under `prefix`.
    pub fn key(&self, prefix: &str) -> String {
        format!("{}:{}", prefix, self.as_str())
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table type persisted under one namespace key.
pub trait Namespace: Serialize + DeserializeOwned + Default + Clone {
    const KIND: NamespaceKind;
}

/// Byte encoding of namespace tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFormat {
    /// Human-readable, inspectable with host dev tools.
    #[default]
    Json,
    /// Compact binary.
    Bitcode,
}

/// Serializes namespace tables to and from substrate bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    format: CodecFormat,
}

impl Codec {
    pub fn new(format: CodecFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> CodecFormat {
        self.format
    }

    pub fn encode<N: Namespace>(&self, table: &N) -> Result<Vec<u8>, StoreError> {
        let encoded = match self.format {
            CodecFormat::Json => serde_json::to_vec(table).map_err(|e| e.to_string()),
            CodecFormat::Bitcode => bitcode::serialize(table).map_err(|e| e.to_string()),
        };
        encoded.map_err(|reason| StoreError::Encode {
            namespace: N::KIND.to_string(),
            reason,
        })
    }

    /// Decode a table. The error string is only ever logged.
    pub fn decode<N: Namespace>(&self, bytes: &[u8]) -> Result<N, String> {
        match self.format {
            CodecFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            CodecFormat::Bitcode => bitcode::deserialize(bytes).map_err(|e| e.to_string()),
        }
    }
}
