//! Notification Bus - "state changed under key K".
//!
//! Two paths feed the same subscribers:
//!
//! ```text
//! ┌───────────────────────┐   publish(k)          ┌──────────────────┐
//! │ write in this context │ ────────────────────▶ │                  │
//! └───────────────────────┘                       │  NotificationBus │──▶ handlers(k)
//! ┌───────────────────────┐   dispatch_remote(ev) │                  │
//! │ substrate StorageEvent│ ────────────────────▶ │                  │
//! └───────────────────────┘                       └──────────────────┘
//! ```
//!
//! A remote whole-origin clear becomes one notice per subscribed key.
//! Handlers get only the key and which path it came from. They are
//! expected to re-read whatever state they render.

mod registry;

pub use registry::{ChangeNotice, ChangeOrigin, Handler, NotificationBus, Subscription};
