//! Badge catalog: externally supplied list of collectible badges.
//!
//! The catalog is fetched once per session by whatever transport the host
//! uses and handed over as JSON of the form `{"badges": [...]}`. Nothing here
//! is persisted with the game state.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GameError;
use crate::state::DEFAULT_BADGE_ID;

/// Rarity tier of a badge. Determines the click income multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Secret,
    GodTier,
    Admin,
    /// Any label the engine does not recognise.
    Unknown,
}

impl Rarity {
    /// All known tiers in ascending order.
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
            Rarity::Secret,
            Rarity::GodTier,
            Rarity::Admin,
        ]
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::Epic => 4,
            Rarity::Legendary => 5,
            Rarity::Secret => 7,
            Rarity::GodTier => 10,
            Rarity::Admin => 15,
            Rarity::Unknown => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Secret => "secret",
            Rarity::GodTier => "god brainrot",
            Rarity::Admin => "admin",
            Rarity::Unknown => "unknown",
        }
    }

    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "common" => Rarity::Common,
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            "secret" => Rarity::Secret,
            "god brainrot" | "god-tier" | "god_tier" | "god tier" => Rarity::GodTier,
            "admin" => Rarity::Admin,
            _ => Rarity::Unknown,
        }
    }
}

impl From<String> for Rarity {
    fn from(label: String) -> Self {
        Rarity::parse(&label)
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.label().to_string()
    }
}

/// A collectible badge. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Image asset path. Older catalogs call this field `emoji`.
    #[serde(default, alias = "emoji")]
    pub image_ref: String,
    #[serde(default)]
    pub cost: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_rarity")]
    pub rarity: Rarity,
}

fn default_rarity() -> Rarity {
    Rarity::Common
}

impl Badge {
    /// Hardcoded badge used when no catalog entry can be resolved.
    pub fn fallback() -> Self {
        Self {
            id: DEFAULT_BADGE_ID.to_string(),
            name: "Tripi Tropi".to_string(),
            image_ref: "/brainrot/Tripi_Tropi_Original.webp".to_string(),
            cost: 0,
            description: "Default badge".to_string(),
            rarity: Rarity::Common,
        }
    }

    pub fn is_free(&self) -> bool {
        self.cost == 0
    }

    pub fn multiplier(&self) -> u64 {
        self.rarity.multiplier()
    }
}

/// The ordered list of badges available this session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCatalog {
    pub badges: Vec<Badge>,
}

impl BadgeCatalog {
    pub fn new(badges: Vec<Badge>) -> Self {
        Self { badges }
    }

    /// Single-entry catalog used before the fetch resolves or after it fails.
    pub fn fallback() -> Self {
        Self::new(vec![Badge::fallback()])
    }

    /// Parse a `{"badges": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::CatalogUnavailable(e.to_string()))
    }

    /// Resolve a fetch result, degrading to the fallback catalog on failure.
    pub fn or_fallback(fetched: Result<Self, GameError>) -> (Self, bool) {
        match fetched {
            Ok(catalog) => (catalog, true),
            Err(e) => {
                warn!(error = %e, "badge catalog unavailable, using default badge");
                (Self::fallback(), false)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }

    /// Resolve `id`, then the first entry, then the hardcoded default.
    pub fn resolve(&self, id: &str) -> Cow<'_, Badge> {
        if let Some(badge) = self.find(id) {
            return Cow::Borrowed(badge);
        }
        match self.badges.first() {
            Some(first) => Cow::Borrowed(first),
            None => Cow::Owned(Badge::fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(id: &str, cost: u64, rarity: Rarity) -> Badge {
        Badge {
            id: id.into(),
            name: id.into(),
            image_ref: String::new(),
            cost,
            description: String::new(),
            rarity,
        }
    }

    #[test]
    fn multiplier_table() {
        let expected = [1, 2, 3, 4, 5, 7, 10, 15];
        for (r, m) in Rarity::all().iter().zip(expected) {
            assert_eq!(r.multiplier(), m, "{:?}", r);
        }
        assert_eq!(Rarity::Unknown.multiplier(), 1);
    }

    #[test]
    fn rarity_parses_catalog_spellings() {
        assert_eq!(Rarity::parse("god brainrot"), Rarity::GodTier);
        assert_eq!(Rarity::parse("god-tier"), Rarity::GodTier);
        assert_eq!(Rarity::parse("Legendary"), Rarity::Legendary);
        assert_eq!(Rarity::parse("mythic"), Rarity::Unknown);
    }

    #[test]
    fn parses_catalog_with_emoji_field() {
        let json = r#"{"badges": [
            {"id": "tripi", "name": "Tripi Tropi", "emoji": "/a.webp", "cost": 0,
             "description": "Default badge", "rarity": "common"},
            {"id": "boss", "name": "Boss", "emoji": "/b.webp", "cost": 5000,
             "description": "", "rarity": "god brainrot"},
            {"id": "odd", "cost": 10, "rarity": "mythic"}
        ]}"#;
        let catalog = BadgeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.badges[0].image_ref, "/a.webp");
        assert_eq!(catalog.find("boss").unwrap().multiplier(), 10);
        assert_eq!(catalog.find("odd").unwrap().rarity, Rarity::Unknown);
        assert_eq!(catalog.find("odd").unwrap().multiplier(), 1);
    }

    #[test]
    fn malformed_catalog_is_unavailable() {
        let err = BadgeCatalog::from_json("<html>404</html>").unwrap_err();
        assert!(matches!(err, GameError::CatalogUnavailable(_)));
        let (catalog, ok) = BadgeCatalog::or_fallback(Err(err));
        assert!(!ok);
        assert_eq!(catalog, BadgeCatalog::fallback());
    }

    #[test]
    fn resolve_prefers_exact_match() {
        let catalog = BadgeCatalog::new(vec![
            badge("a", 0, Rarity::Common),
            badge("b", 10, Rarity::Epic),
        ]);
        assert_eq!(catalog.resolve("b").id, "b");
    }

    #[test]
    fn resolve_falls_back_to_first_entry() {
        let catalog = BadgeCatalog::new(vec![
            badge("a", 0, Rarity::Rare),
            badge("b", 10, Rarity::Epic),
        ]);
        assert_eq!(catalog.resolve("missing").id, "a");
    }

    #[test]
    fn resolve_on_empty_catalog_uses_hardcoded_default() {
        let catalog = BadgeCatalog::default();
        let badge = catalog.resolve("anything");
        assert_eq!(badge.id, DEFAULT_BADGE_ID);
        assert_eq!(badge.rarity, Rarity::Common);
        assert_eq!(badge.multiplier(), 1);
    }
}
