/// Brainrot Clicker game state definitions.
use std::collections::BTreeSet;

/// Id of the badge every player owns from the start.
pub const DEFAULT_BADGE_ID: &str = "tripi";

pub const DEFAULT_CURRENCY: u64 = 0;
pub const DEFAULT_BATTERY_CAPACITY: u64 = 150;
pub const DEFAULT_CLICK_LEVEL: u64 = 1;
pub const DEFAULT_CHARGE_LEVEL: u64 = 10;
pub const DEFAULT_CLICK_COST: u64 = 100;
pub const DEFAULT_BATTERY_COST: u64 = 200;
pub const DEFAULT_CHARGE_COST: u64 = 150;

/// Color scheme preference. Has no effect on the economy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// Depletable resource gating the click action.
///
/// Fields are private so `current <= capacity` and `capacity > 0` hold for
/// every value that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Battery {
    current: u64,
    capacity: u64,
}

impl Battery {
    /// A battery filled to `capacity`. Zero capacity is raised to 1.
    pub fn full(capacity: u64) -> Self {
        let capacity = capacity.max(1);
        Self {
            current: capacity,
            capacity,
        }
    }

    /// Build from stored values. Returns None if they break an invariant.
    pub fn from_parts(current: u64, capacity: u64) -> Option<Self> {
        if capacity == 0 || current > capacity {
            return None;
        }
        Some(Self { current, capacity })
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Add `amount`, stopping at capacity. Returns the amount actually added.
    pub fn charge(&mut self, amount: u64) -> u64 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.capacity);
        self.current - before
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    pub fn drain(&mut self, amount: u64) -> u64 {
        let taken = amount.min(self.current);
        self.current -= taken;
        taken
    }

    /// Change capacity, clamping the charge down if it no longer fits.
    pub fn set_capacity(&mut self, capacity: u64) {
        self.capacity = capacity.max(1);
        self.current = self.current.min(self.capacity);
    }

    /// Fill level for display, in `[0, 100]`.
    pub fn percentage(&self) -> f64 {
        let pct = self.current as f64 / self.capacity as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }
}

/// Current price of the next purchase on each upgrade track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeCosts {
    pub click: u64,
    pub battery: u64,
    pub charge: u64,
}

impl Default for UpgradeCosts {
    fn default() -> Self {
        Self {
            click: DEFAULT_CLICK_COST,
            battery: DEFAULT_BATTERY_COST,
            charge: DEFAULT_CHARGE_COST,
        }
    }
}

/// Full persisted state of a Brainrot Clicker session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Spendable currency.
    pub currency: u64,
    pub battery: Battery,
    /// Income per click before the rarity multiplier. Always >= 1.
    pub click_level: u64,
    /// Battery restored per regeneration tick. Always >= 1.
    pub charge_level: u64,
    pub upgrade_costs: UpgradeCosts,
    /// Always contains `DEFAULT_BADGE_ID`.
    pub owned_badges: BTreeSet<String>,
    pub selected_badge_id: String,
    pub theme: Theme,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            currency: DEFAULT_CURRENCY,
            battery: Battery::full(DEFAULT_BATTERY_CAPACITY),
            click_level: DEFAULT_CLICK_LEVEL,
            charge_level: DEFAULT_CHARGE_LEVEL,
            upgrade_costs: UpgradeCosts::default(),
            owned_badges: BTreeSet::from([DEFAULT_BADGE_ID.to_string()]),
            selected_badge_id: DEFAULT_BADGE_ID.to_string(),
            theme: Theme::Light,
        }
    }

    pub fn owns_badge(&self, id: &str) -> bool {
        self.owned_badges.contains(id)
    }

    /// Battery drained by one full click at the current click level.
    pub fn click_battery_cost(&self) -> u64 {
        (self.click_level / 2).max(1)
    }

    /// Checks the invariants that do not depend on the badge catalog.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.click_level == 0 {
            return Err("click level must be >= 1".into());
        }
        if self.charge_level == 0 {
            return Err("charge level must be >= 1".into());
        }
        let costs = &self.upgrade_costs;
        if costs.click == 0 || costs.battery == 0 || costs.charge == 0 {
            return Err("upgrade costs must be > 0".into());
        }
        if !self.owns_badge(DEFAULT_BADGE_ID) {
            return Err(format!("owned badges must contain {DEFAULT_BADGE_ID}"));
        }
        if !self.owns_badge(&self.selected_badge_id) {
            return Err(format!(
                "selected badge {:?} is not owned",
                self.selected_badge_id
            ));
        }
        Ok(())
    }
}
