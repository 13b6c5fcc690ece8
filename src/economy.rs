//! Brainrot Clicker economy: pure functions over `GameState`, fully testable.

use tracing::debug;

use crate::catalog::BadgeCatalog;
use crate::error::GameError;
use crate::state::GameState;

/// Result of a successful click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Currency granted.
    pub income: u64,
    /// Battery consumed.
    pub battery_used: u64,
    /// True when the battery could not cover a full click and was emptied.
    pub partial: bool,
}

/// Add `amount` to currency, saturating at `u64::MAX`.
pub fn apply_income(state: &mut GameState, amount: u64) {
    state.currency = state.currency.saturating_add(amount);
}

/// Debit `amount`, or reject without touching the balance.
pub fn spend(state: &mut GameState, amount: u64) -> Result<(), GameError> {
    if state.currency < amount {
        return Err(GameError::InsufficientFunds {
            cost: amount,
            available: state.currency,
        });
    }
    state.currency -= amount;
    Ok(())
}

/// Multiplier of the badge currently in use.
pub fn click_multiplier(state: &GameState, catalog: &BadgeCatalog) -> u64 {
    catalog.resolve(&state.selected_badge_id).multiplier()
}

/// Manual click: convert battery into currency at the current click level.
pub fn click(state: &mut GameState, catalog: &BadgeCatalog) -> Result<ClickOutcome, GameError> {
    if state.battery.is_empty() {
        return Err(GameError::BatteryEmpty);
    }
    let multiplier = click_multiplier(state, catalog);
    let cost = state.click_battery_cost();

    let outcome = if state.battery.current() >= cost {
        state.battery.drain(cost);
        ClickOutcome {
            income: state.click_level.saturating_mul(multiplier),
            battery_used: cost,
            partial: false,
        }
    } else {
        let left = state.battery.drain(cost);
        ClickOutcome {
            income: left.saturating_mul(multiplier),
            battery_used: left,
            partial: true,
        }
    };
    apply_income(state, outcome.income);
    debug!(
        income = outcome.income,
        battery_used = outcome.battery_used,
        partial = outcome.partial,
        "click"
    );
    Ok(outcome)
}

/// Reward for claiming a bonus event.
pub fn bonus_reward(state: &GameState, bonus_multiplier: u64) -> u64 {
    state.click_level.saturating_mul(bonus_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Badge, Rarity};
    use crate::state::Battery;

    fn catalog_with(rarity: Rarity) -> BadgeCatalog {
        let mut badge = Badge::fallback();
        badge.rarity = rarity;
        BadgeCatalog::new(vec![badge])
    }

    #[test]
    fn income_saturates() {
        let mut state = GameState::new();
        state.currency = u64::MAX - 1;
        apply_income(&mut state, 10);
        assert_eq!(state.currency, u64::MAX);
    }

    #[test]
    fn spend_success() {
        let mut state = GameState::new();
        state.currency = 100;
        assert!(spend(&mut state, 40).is_ok());
        assert_eq!(state.currency, 60);
    }

    #[test]
    fn spend_insufficient_leaves_balance() {
        let mut state = GameState::new();
        state.currency = 30;
        let err = spend(&mut state, 40).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientFunds {
                cost: 40,
                available: 30
            }
        );
        assert_eq!(state.currency, 30);
    }

    #[test]
    fn full_click_uses_level_and_multiplier() {
        let mut state = GameState::new();
        state.click_level = 4;
        let out = click(&mut state, &catalog_with(Rarity::Epic)).unwrap();
        assert_eq!(out.income, 16);
        assert_eq!(out.battery_used, 2);
        assert!(!out.partial);
        assert_eq!(state.currency, 16);
        assert_eq!(state.battery.current(), 148);
    }

    #[test]
    fn partial_click_empties_battery() {
        let mut state = GameState::new();
        state.click_level = 10;
        state.battery = Battery::from_parts(3, 150).unwrap();
        let out = click(&mut state, &BadgeCatalog::fallback()).unwrap();
        assert_eq!(out.income, 3);
        assert!(out.partial);
        assert_eq!(state.currency, 3);
        assert!(state.battery.is_empty());
    }

    #[test]
    fn partial_click_applies_multiplier() {
        let mut state = GameState::new();
        state.click_level = 10;
        state.battery = Battery::from_parts(3, 150).unwrap();
        let out = click(&mut state, &catalog_with(Rarity::Admin)).unwrap();
        assert_eq!(out.income, 45);
    }

    #[test]
    fn empty_battery_refuses_click() {
        let mut state = GameState::new();
        state.battery = Battery::from_parts(0, 150).unwrap();
        let before = state.clone();
        assert_eq!(
            click(&mut state, &BadgeCatalog::fallback()),
            Err(GameError::BatteryEmpty)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn unknown_selection_uses_first_badge_multiplier() {
        let mut state = GameState::new();
        state.selected_badge_id = "gone".into();
        assert_eq!(click_multiplier(&state, &catalog_with(Rarity::Rare)), 3);
        assert_eq!(click_multiplier(&state, &BadgeCatalog::default()), 1);
    }

    #[test]
    fn bonus_reward_scales_with_click_level() {
        let mut state = GameState::new();
        state.click_level = 7;
        assert_eq!(bonus_reward(&state, 10), 70);
    }
}
