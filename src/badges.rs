//! Badge collection: purchase, ownership and selection.

use tracing::debug;

use crate::catalog::BadgeCatalog;
use crate::economy::spend;
use crate::error::GameError;
use crate::state::GameState;

/// What `buy_or_select` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeOutcome {
    /// Paid for the badge and selected it.
    Purchased { paid: u64 },
    /// Badge was already owned or free; selected without spending.
    Selected,
}

/// Ownership status of a catalog badge from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeStatus {
    Owned,
    Free,
    Affordable,
    Locked,
}

pub fn status(state: &GameState, catalog: &BadgeCatalog, id: &str) -> Option<BadgeStatus> {
    let badge = catalog.find(id)?;
    Some(if state.owns_badge(id) {
        BadgeStatus::Owned
    } else if badge.is_free() {
        BadgeStatus::Free
    } else if state.currency >= badge.cost {
        BadgeStatus::Affordable
    } else {
        BadgeStatus::Locked
    })
}

/// Buy `id` if needed and affordable, then select it.
///
/// Owned and free badges are always selectable. An unaffordable locked badge
/// leaves the state untouched.
pub fn buy_or_select(
    state: &mut GameState,
    catalog: &BadgeCatalog,
    id: &str,
) -> Result<BadgeOutcome, GameError> {
    let badge = catalog
        .find(id)
        .ok_or_else(|| GameError::UnknownBadge(id.to_string()))?;

    let outcome = if state.owns_badge(id) {
        BadgeOutcome::Selected
    } else {
        spend(state, badge.cost)?;
        state.owned_badges.insert(id.to_string());
        if badge.is_free() {
            BadgeOutcome::Selected
        } else {
            BadgeOutcome::Purchased { paid: badge.cost }
        }
    };

    state.selected_badge_id = id.to_string();
    debug!(badge = id, ?outcome, "badge selected");
    Ok(outcome)
}
