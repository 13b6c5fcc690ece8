//! Session context: owns the game state and routes every mutation.
//!
//! All actions and scheduler ticks go through `&mut Engine`, so mutations are
//! serialized by construction. After each committed mutation the state is
//! written to the save slot; a failed write is logged and otherwise ignored.

use std::borrow::Cow;

use tracing::{debug, info, warn};

use crate::actions::{Action, ActionOutcome};
use crate::badges::{self, BadgeOutcome, BadgeStatus};
use crate::catalog::{Badge, BadgeCatalog};
use crate::config::EngineConfig;
use crate::economy::{self, ClickOutcome};
use crate::error::GameError;
use crate::save;
use crate::scheduler::{ScheduledEvent, Scheduler};
use crate::slot::SaveSlot;
use crate::state::{Battery, GameState, Theme};
use crate::time::Clock;
use crate::upgrades::{self, PurchaseReceipt, UpgradeTrack};

/// Where the badge catalog currently comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogStatus {
    /// Fetch still in flight; the fallback badge is in use.
    Loading,
    Ready,
    /// Fetch failed; the fallback badge is in use for the rest of the session.
    Fallback,
}

pub struct Engine<C: Clock, S: SaveSlot> {
    state: GameState,
    catalog: BadgeCatalog,
    catalog_status: CatalogStatus,
    scheduler: Scheduler,
    bonus_available: bool,
    config: EngineConfig,
    clock: C,
    slot: S,
}

impl<C: Clock, S: SaveSlot> Engine<C, S> {
    /// Restore from `slot` (or start fresh) and arm the timers.
    pub fn new(config: EngineConfig, clock: C, slot: S) -> Result<Self, GameError> {
        config.validate()?;
        let state = save::load(slot.read().as_deref());
        let scheduler = Scheduler::new(&config, clock.now_ms());
        info!(
            currency = state.currency,
            click_level = state.click_level,
            "session started"
        );
        Ok(Self {
            state,
            catalog: BadgeCatalog::fallback(),
            catalog_status: CatalogStatus::Loading,
            scheduler,
            bonus_available: false,
            config,
            clock,
            slot,
        })
    }

    // ── Read accessors ──────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn currency(&self) -> u64 {
        self.state.currency
    }

    pub fn battery(&self) -> Battery {
        self.state.battery
    }

    /// Battery fill for display, clamped to `[0, 100]`.
    pub fn battery_percentage(&self) -> f64 {
        self.state.battery.percentage()
    }

    pub fn click_level(&self) -> u64 {
        self.state.click_level
    }

    pub fn charge_level(&self) -> u64 {
        self.state.charge_level
    }

    pub fn upgrade_cost(&self, track: UpgradeTrack) -> u64 {
        track.cost(&self.state)
    }

    pub fn can_afford(&self, track: UpgradeTrack) -> bool {
        upgrades::can_afford(&self.state, track)
    }

    /// False when the click action should be disabled.
    pub fn can_click(&self) -> bool {
        !self.state.battery.is_empty()
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn selected_badge_id(&self) -> &str {
        &self.state.selected_badge_id
    }

    pub fn owns_badge(&self, id: &str) -> bool {
        self.state.owns_badge(id)
    }

    pub fn current_badge(&self) -> Cow<'_, Badge> {
        self.catalog.resolve(&self.state.selected_badge_id)
    }

    pub fn click_multiplier(&self) -> u64 {
        economy::click_multiplier(&self.state, &self.catalog)
    }

    pub fn badge_status(&self, id: &str) -> Option<BadgeStatus> {
        badges::status(&self.state, &self.catalog, id)
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        self.catalog_status
    }

    pub fn bonus_available(&self) -> bool {
        self.bonus_available
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Earliest scheduler deadline in clock milliseconds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    pub fn timers_running(&self) -> bool {
        !self.scheduler.is_cancelled()
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Swap in the result of the one-shot catalog fetch.
    pub fn install_catalog(&mut self, fetched: Result<BadgeCatalog, GameError>) {
        let (catalog, ok) = BadgeCatalog::or_fallback(fetched);
        self.catalog_status = if ok {
            CatalogStatus::Ready
        } else {
            CatalogStatus::Fallback
        };
        info!(badges = catalog.len(), status = ?self.catalog_status, "badge catalog installed");
        self.catalog = catalog;
    }

    // ── Scheduler ───────────────────────────────────────────────────

    /// Run every timer that is due. Call this from the host's frame or tick loop.
    pub fn update(&mut self) -> Vec<ScheduledEvent> {
        let now = self.clock.now_ms();
        let events = self.scheduler.poll(now);
        let mut dirty = false;
        for event in &events {
            match event {
                ScheduledEvent::Regenerate => {
                    let added = self.state.battery.charge(self.state.charge_level);
                    dirty |= added > 0;
                }
                ScheduledEvent::BonusSpawn => {
                    self.bonus_available = true;
                    debug!("bonus available");
                }
                ScheduledEvent::BonusExpire => {
                    if self.bonus_available {
                        debug!("bonus expired unclaimed");
                    }
                    self.bonus_available = false;
                }
            }
        }
        if dirty {
            self.persist();
        }
        events
    }

    /// Cancel the regeneration, bonus and bonus-expiry timers together.
    pub fn cancel_timers(&mut self) {
        self.scheduler.cancel();
        self.bonus_available = false;
    }

    /// Tear down the session: stop all timers, write a final snapshot, and
    /// hand back the state.
    pub fn shutdown(mut self) -> GameState {
        self.cancel_timers();
        self.persist();
        info!(currency = self.state.currency, "session ended");
        self.state
    }

    // ── Actions ─────────────────────────────────────────────────────

    pub fn click(&mut self) -> Result<ClickOutcome, GameError> {
        let outcome = economy::click(&mut self.state, &self.catalog)?;
        self.persist();
        Ok(outcome)
    }

    pub fn purchase_upgrade(&mut self, track: UpgradeTrack) -> Result<PurchaseReceipt, GameError> {
        let receipt = upgrades::purchase(&mut self.state, track)?;
        if matches!(track, UpgradeTrack::Battery | UpgradeTrack::Charge) {
            // regeneration restarts whenever its inputs change
            self.scheduler.rearm_regen(self.clock.now_ms());
        }
        self.persist();
        Ok(receipt)
    }

    pub fn buy_or_select_badge(&mut self, id: &str) -> Result<BadgeOutcome, GameError> {
        let outcome = badges::buy_or_select(&mut self.state, &self.catalog, id)?;
        self.persist();
        Ok(outcome)
    }

    /// Claim the open bonus. Returns the reward, or None if no bonus is open.
    pub fn claim_bonus(&mut self) -> Option<u64> {
        if !self.bonus_available {
            return None;
        }
        let reward = economy::bonus_reward(&self.state, self.config.bonus_click_multiplier);
        economy::apply_income(&mut self.state, reward);
        self.bonus_available = false;
        self.scheduler.cancel_bonus_expiry();
        debug!(reward, "bonus claimed");
        self.persist();
        Some(reward)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.state.theme = self.state.theme.toggled();
        self.persist();
        self.state.theme
    }

    pub fn dispatch(&mut self, action: Action) -> Result<ActionOutcome, GameError> {
        match action {
            Action::Click => self.click().map(ActionOutcome::Clicked),
            Action::PurchaseUpgrade(track) => {
                self.purchase_upgrade(track).map(ActionOutcome::Upgraded)
            }
            Action::BuyOrSelectBadge(id) => {
                self.buy_or_select_badge(&id).map(ActionOutcome::Badge)
            }
            Action::ClaimBonus => Ok(match self.claim_bonus() {
                Some(reward) => ActionOutcome::BonusClaimed(reward),
                None => ActionOutcome::BonusMissed,
            }),
            Action::ToggleTheme => Ok(ActionOutcome::ThemeChanged(self.toggle_theme())),
        }
    }

    /// Discard progress and overwrite the slot with a new game.
    pub fn reset(&mut self) {
        self.state = GameState::new();
        self.bonus_available = false;
        self.scheduler.cancel_bonus_expiry();
        self.scheduler.rearm_regen(self.clock.now_ms());
        info!("game reset");
        self.persist();
    }

    fn persist(&mut self) {
        let result = save::save(&self.state).and_then(|blob| self.slot.write(&blob));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist game state");
        }
    }
}
