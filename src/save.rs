//! Brainrot Clicker save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current envelope version. Bump when the field set changes.
//! - `MIN_COMPATIBLE_VERSION`: oldest version still restored. Version 0 is the
//!   bare game object written before the envelope existed.
//!
//! Restoring is all-or-nothing: a missing field, a wrong type, or a value
//! that breaks a state invariant discards the whole blob and the caller gets
//! `GameState::new()`. Fields are never repaired one by one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::GameError;
use crate::state::{Battery, GameState, Theme, UpgradeCosts};

/// Save envelope format version.
pub const SAVE_VERSION: u32 = 1;

/// Oldest version `decode` accepts.
pub const MIN_COMPATIBLE_VERSION: u32 = 0;

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

/// Serialized game fields. Key names are kept from the first release so old
/// blobs still load. Every field is required.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameSave {
    total_coins: u64,
    /// Battery charge.
    total_battery: u64,
    level_of_clicks: u64,
    /// Battery capacity.
    level_of_battery: u64,
    level_of_charge: u64,
    cost_for_click: u64,
    cost_for_battery: u64,
    cost_for_charge: u64,
    dark_mode: bool,
    selected_badge: String,
    owned_badges: Vec<String>,
}

fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            total_coins: state.currency,
            total_battery: state.battery.current(),
            level_of_clicks: state.click_level,
            level_of_battery: state.battery.capacity(),
            level_of_charge: state.charge_level,
            cost_for_click: state.upgrade_costs.click,
            cost_for_battery: state.upgrade_costs.battery,
            cost_for_charge: state.upgrade_costs.charge,
            dark_mode: state.theme.is_dark(),
            selected_badge: state.selected_badge_id.clone(),
            owned_badges: state.owned_badges.iter().cloned().collect(),
        },
    }
}

fn restore(save: GameSave) -> Result<GameState, GameError> {
    let battery = Battery::from_parts(save.total_battery, save.level_of_battery).ok_or_else(|| {
        GameError::CorruptSave(format!(
            "battery {}/{} out of range",
            save.total_battery, save.level_of_battery
        ))
    })?;

    let state = GameState {
        currency: save.total_coins,
        battery,
        click_level: save.level_of_clicks,
        charge_level: save.level_of_charge,
        upgrade_costs: UpgradeCosts {
            click: save.cost_for_click,
            battery: save.cost_for_battery,
            charge: save.cost_for_charge,
        },
        owned_badges: save.owned_badges.into_iter().collect(),
        selected_badge_id: save.selected_badge,
        theme: if save.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        },
    };
    state.check_invariants().map_err(GameError::CorruptSave)?;
    Ok(state)
}

/// Serialize a full snapshot of `state`.
pub fn save(state: &GameState) -> Result<String, GameError> {
    serde_json::to_string(&extract_save(state)).map_err(|e| GameError::Storage(e.to_string()))
}

/// Strictly restore a blob written by `save` (or a pre-envelope blob).
pub fn decode(blob: &str) -> Result<GameState, GameError> {
    let value: Value =
        serde_json::from_str(blob).map_err(|e| GameError::CorruptSave(e.to_string()))?;

    let (version, game) = if value.get("version").is_some() {
        let data: SaveData =
            serde_json::from_value(value).map_err(|e| GameError::CorruptSave(e.to_string()))?;
        (data.version, data.game)
    } else {
        let game: GameSave =
            serde_json::from_value(value).map_err(|e| GameError::CorruptSave(e.to_string()))?;
        (0, game)
    };

    if !(MIN_COMPATIBLE_VERSION..=SAVE_VERSION).contains(&version) {
        return Err(GameError::CorruptSave(format!(
            "unsupported save version {version} (supported {MIN_COMPATIBLE_VERSION}..={SAVE_VERSION})"
        )));
    }
    if version < SAVE_VERSION {
        info!(saved = version, current = SAVE_VERSION, "migrating old save");
    }
    restore(game)
}

/// Restore from the slot contents, falling back to a new game on any problem.
pub fn load(blob: Option<&str>) -> GameState {
    let Some(blob) = blob else {
        info!("no save found, starting new game");
        return GameState::new();
    };
    match decode(blob) {
        Ok(state) => {
            info!(currency = state.currency, "save restored");
            state
        }
        Err(e) => {
            warn!(error = %e, "discarding save data, starting new game");
            GameState::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn played_state() -> GameState {
        let mut s = GameState::new();
        s.currency = 12_345;
        s.battery = Battery::from_parts(42, 300).unwrap();
        s.click_level = 7;
        s.charge_level = 13;
        s.upgrade_costs = UpgradeCosts {
            click: 195,
            battery: 415,
            charge: 374,
        };
        s.owned_badges.insert("shark".into());
        s.selected_badge_id = "shark".into();
        s.theme = Theme::Dark;
        s
    }

    #[test]
    fn save_and_load_roundtrip() {
        let original = played_state();
        let blob = save(&original).unwrap();
        assert_eq!(load(Some(&blob)), original);
    }

    #[test]
    fn envelope_carries_current_version() {
        let blob = save(&GameState::new()).unwrap();
        let v: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(v["version"], SAVE_VERSION);
        assert_eq!(v["game"]["levelOfBattery"], 150);
    }

    #[test]
    fn missing_slot_gives_defaults() {
        assert_eq!(load(None), GameState::new());
    }

    #[test]
    fn garbage_gives_defaults() {
        for blob in ["", "{", "null", "[]", "42", "\u{0}\u{1}", "{\"version\": \"x\"}"] {
            assert_eq!(load(Some(blob)), GameState::new(), "blob {:?}", blob);
        }
    }

    #[test]
    fn missing_field_discards_whole_save() {
        let blob = r#"{"version": 1, "game": {
            "totalCoins": 999, "totalBattery": 10, "levelOfClicks": 3,
            "levelOfBattery": 150, "levelOfCharge": 10, "costForClick": 100,
            "costForBattery": 200, "darkMode": true,
            "selectedBadge": "tripi", "ownedBadges": ["tripi"]
        }}"#;
        assert!(matches!(decode(blob), Err(GameError::CorruptSave(_))));
        assert_eq!(load(Some(blob)), GameState::new());
    }

    #[test]
    fn legacy_unversioned_blob_restores() {
        let blob = r#"{
            "totalCoins": 500, "totalBattery": 120, "levelOfClicks": 2,
            "levelOfBattery": 200, "levelOfCharge": 11, "costForClick": 110,
            "costForBattery": 240, "costForCharge": 180, "darkMode": false,
            "selectedBadge": "tripi", "ownedBadges": ["tripi"]
        }"#;
        let s = decode(blob).unwrap();
        assert_eq!(s.currency, 500);
        assert_eq!(s.battery.current(), 120);
        assert_eq!(s.battery.capacity(), 200);
        assert_eq!(s.upgrade_costs.charge, 180);
    }

    #[test]
    fn future_version_rejected() {
        let mut v: Value = serde_json::from_str(&save(&played_state()).unwrap()).unwrap();
        v["version"] = Value::from(SAVE_VERSION + 1);
        let blob = v.to_string();
        assert!(decode(&blob).is_err());
        assert_eq!(load(Some(&blob)), GameState::new());
    }

    #[test]
    fn invariant_violations_rejected() {
        let base: Value = serde_json::from_str(&save(&played_state()).unwrap()).unwrap();
        let cases: [(&str, Value); 7] = [
            ("totalBattery", Value::from(301)),
            ("levelOfBattery", Value::from(0)),
            ("levelOfClicks", Value::from(0)),
            ("costForCharge", Value::from(0)),
            ("ownedBadges", serde_json::json!(["shark"])),
            ("ownedBadges", serde_json::json!(["tripi"])),
            ("selectedBadge", serde_json::json!("boss")),
        ];
        for (field, bad) in cases {
            let mut v = base.clone();
            v["game"][field] = bad;
            assert!(decode(&v.to_string()).is_err(), "{field} accepted");
        }
    }

    #[test]
    fn negative_and_fractional_numbers_rejected() {
        let mut v: Value = serde_json::from_str(&save(&played_state()).unwrap()).unwrap();
        v["game"]["totalCoins"] = Value::from(-5);
        assert!(decode(&v.to_string()).is_err());
        v["game"]["totalCoins"] = Value::from(1.5);
        assert!(decode(&v.to_string()).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut v: Value = serde_json::from_str(&save(&played_state()).unwrap()).unwrap();
        v["game"]["futureField"] = Value::from("ignored");
        assert_eq!(decode(&v.to_string()).unwrap(), played_state());
    }

    proptest! {
        #[test]
        fn roundtrip_any_valid_state(
            currency in any::<u64>(),
            capacity in 1u64..1_000_000,
            fill in 0u64..=100,
            click in 1u64..10_000,
            charge in 1u64..10_000,
            costs in (1u64..u64::MAX, 1u64..u64::MAX, 1u64..u64::MAX),
            extra in proptest::collection::btree_set("[a-z]{1,8}", 0..5),
            dark in any::<bool>(),
        ) {
            let mut s = GameState::new();
            s.currency = currency;
            s.battery = Battery::from_parts(capacity * fill / 100, capacity).unwrap();
            s.click_level = click;
            s.charge_level = charge;
            s.upgrade_costs = UpgradeCosts { click: costs.0, battery: costs.1, charge: costs.2 };
            if let Some(first) = extra.iter().next() {
                s.selected_badge_id = first.clone();
            }
            s.owned_badges.extend(extra);
            s.theme = if dark { Theme::Dark } else { Theme::Light };

            let blob = save(&s).unwrap();
            prop_assert_eq!(decode(&blob).unwrap(), s);
        }
    }
}
