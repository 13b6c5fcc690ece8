//! Action surface invoked by the UI layer.

use crate::badges::BadgeOutcome;
use crate::economy::ClickOutcome;
use crate::state::Theme;
use crate::upgrades::{PurchaseReceipt, UpgradeTrack};

/// Every mutation a player can request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Click,
    PurchaseUpgrade(UpgradeTrack),
    BuyOrSelectBadge(String),
    ClaimBonus,
    ToggleTheme,
}

impl Action {
    /// Parse a typed command: `c`, `1`..`3`, `b <badge id>`, `g`, `t`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Some(id) = input.strip_prefix("b ") {
            let id = id.trim();
            return (!id.is_empty()).then(|| Action::BuyOrSelectBadge(id.to_string()));
        }
        let mut chars = input.chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match key {
            'c' => Some(Action::Click),
            'g' => Some(Action::ClaimBonus),
            't' => Some(Action::ToggleTheme),
            k => UpgradeTrack::from_key(k).map(Action::PurchaseUpgrade),
        }
    }
}

/// What a successfully dispatched action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Clicked(ClickOutcome),
    Upgraded(PurchaseReceipt),
    Badge(BadgeOutcome),
    /// Bonus granted this much currency.
    BonusClaimed(u64),
    /// No bonus was available; nothing changed.
    BonusMissed,
    ThemeChanged(Theme),
}
