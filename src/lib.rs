//! Local-first engagement statistics and preferences.
//!
//! Tracks a user's interactions with catalog items (views, likes, saves,
//! visits) in a synchronous origin-scoped key/value substrate, derives a
//! taste pattern from the visit history, and keeps every execution
//! context of the same origin informed of changes without polling.
//!
//! ```text
//! writes:  caller ─▶ InteractionStore / CollectionStore ─▶ Codec ─▶ Substrate
//!                                  │                                   │
//!                                  └──▶ NotificationBus ◀──(other ctx)─┘
//! reads:   Substrate ─▶ Codec ─▶ merge() ─▶ DisplayItem
//! ```

pub mod analytics;
pub mod bus;
pub mod clock;
pub mod codec;
pub mod collection;
pub mod config;
mod error;
pub mod interaction;
pub mod projection;
pub mod store;
pub mod substrate;

pub use analytics::{analyze, classify, TasteAnalysis, TastePattern};
pub use bus::{ChangeNotice, ChangeOrigin, NotificationBus, Subscription};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CodecFormat, Namespace, NamespaceKind};
pub use collection::{CollectionStore, LikedEntry, SavedEntry, VisitDetails, VisitRecord};
pub use config::StoreConfig;
pub use error::StoreError;
pub use interaction::{InteractionRecord, InteractionStore, SeedTable, SeedValues};
pub use projection::{merge, merge_all, CatalogItem, DisplayItem};
pub use store::{EngagementStore, EngagementStoreBuilder};
pub use substrate::{ContextSubstrate, SharedOrigin, StorageEvent, Substrate, WatchId};
