//! Brainrot Clicker game state engine.
//!
//! An idle clicker: clicks spend battery to earn coins, the battery refills on
//! a timer, coins buy upgrades and collectible badges whose rarity multiplies
//! income, and a bonus event periodically opens a short claim window.
//!
//! The UI layer owns an [`Engine`], calls [`Engine::update`] from its frame
//! or tick loop, and routes player input through [`Engine::dispatch`] (or the
//! individual action methods). Every committed change is written to the
//! engine's [`SaveSlot`].

pub mod actions;
pub mod badges;
pub mod catalog;
pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod save;
pub mod scheduler;
pub mod slot;
pub mod state;
pub mod time;
pub mod upgrades;

pub use actions::{Action, ActionOutcome};
pub use badges::{BadgeOutcome, BadgeStatus};
pub use catalog::{Badge, BadgeCatalog, Rarity};
pub use config::EngineConfig;
pub use economy::ClickOutcome;
pub use engine::{CatalogStatus, Engine};
pub use error::GameError;
pub use scheduler::ScheduledEvent;
pub use slot::{MemorySlot, SaveSlot};
pub use state::{Battery, GameState, Theme, UpgradeCosts};
pub use time::{Clock, ManualClock};
pub use upgrades::{PurchaseReceipt, UpgradeTrack};

#[cfg(not(target_arch = "wasm32"))]
pub use slot::FileSlot;
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;

#[cfg(target_arch = "wasm32")]
pub use slot::LocalStorageSlot;
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
