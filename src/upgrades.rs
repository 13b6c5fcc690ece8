//! Upgrade tracks and their geometric cost curves.

use tracing::debug;

use crate::economy::spend;
use crate::error::GameError;
use crate::state::GameState;

/// Battery capacity gained per battery upgrade.
pub const BATTERY_CAPACITY_STEP: u64 = 50;

/// One of the three purchasable progression lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeTrack {
    Click,
    Battery,
    Charge,
}

impl UpgradeTrack {
    /// All tracks in display order.
    pub fn all() -> &'static [UpgradeTrack] {
        &[UpgradeTrack::Click, UpgradeTrack::Battery, UpgradeTrack::Charge]
    }

    pub fn name(&self) -> &str {
        match self {
            UpgradeTrack::Click => "click",
            UpgradeTrack::Battery => "battery",
            UpgradeTrack::Charge => "charge",
        }
    }

    /// Key to buy (1-3 mapped to track index).
    pub fn key(&self) -> char {
        match self {
            UpgradeTrack::Click => '1',
            UpgradeTrack::Battery => '2',
            UpgradeTrack::Charge => '3',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.key() == key)
    }

    /// Cost growth per purchase as an exact fraction (numerator, denominator).
    pub fn growth(&self) -> (u64, u64) {
        match self {
            UpgradeTrack::Click => (11, 10),
            UpgradeTrack::Battery | UpgradeTrack::Charge => (6, 5),
        }
    }

    /// Price of the next purchase on this track.
    pub fn cost(&self, state: &GameState) -> u64 {
        match self {
            UpgradeTrack::Click => state.upgrade_costs.click,
            UpgradeTrack::Battery => state.upgrade_costs.battery,
            UpgradeTrack::Charge => state.upgrade_costs.charge,
        }
    }

    fn cost_mut<'a>(&self, state: &'a mut GameState) -> &'a mut u64 {
        match self {
            UpgradeTrack::Click => &mut state.upgrade_costs.click,
            UpgradeTrack::Battery => &mut state.upgrade_costs.battery,
            UpgradeTrack::Charge => &mut state.upgrade_costs.charge,
        }
    }

    /// Current level on this track (capacity for the battery track).
    pub fn level(&self, state: &GameState) -> u64 {
        match self {
            UpgradeTrack::Click => state.click_level,
            UpgradeTrack::Battery => state.battery.capacity(),
            UpgradeTrack::Charge => state.charge_level,
        }
    }
}

/// `ceil(cost * num / den)` in integer arithmetic, saturating at `u64::MAX`.
pub fn grow_cost(cost: u64, growth: (u64, u64)) -> u64 {
    let (num, den) = (growth.0 as u128, growth.1 as u128);
    let scaled = (cost as u128 * num).div_ceil(den);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// A committed upgrade purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub track: UpgradeTrack,
    pub paid: u64,
    pub new_level: u64,
    pub next_cost: u64,
}

pub fn can_afford(state: &GameState, track: UpgradeTrack) -> bool {
    state.currency >= track.cost(state)
}

/// Buy one level on `track`: debit, apply the effect, grow the cost.
pub fn purchase(state: &mut GameState, track: UpgradeTrack) -> Result<PurchaseReceipt, GameError> {
    let cost = track.cost(state);
    spend(state, cost)?;

    match track {
        UpgradeTrack::Click => state.click_level = state.click_level.saturating_add(1),
        UpgradeTrack::Battery => {
            let capacity = state
                .battery
                .capacity()
                .saturating_add(BATTERY_CAPACITY_STEP);
            state.battery.set_capacity(capacity);
        }
        UpgradeTrack::Charge => state.charge_level = state.charge_level.saturating_add(1),
    }

    let next_cost = grow_cost(cost, track.growth());
    *track.cost_mut(state) = next_cost;

    let receipt = PurchaseReceipt {
        track,
        paid: cost,
        new_level: track.level(state),
        next_cost,
    };
    debug!(
        track = track.name(),
        paid = receipt.paid,
        level = receipt.new_level,
        next_cost,
        "upgrade purchased"
    );
    Ok(receipt)
}
