//! The fixed table of well-known objects the locator can resolve without
//! asking the widget.

use hashbrown::HashMap;

use crate::coords::Equatorial;
use crate::error::{Result, SkyviewError};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

const COMMON_NAMES: &[&str] = &[
    "Andromeda",
    "M31",
    "M51",
    "M101",
    "M104",
    "M33",
    "Milky Way",
    "Whirlpool Galaxy",
    "Pinwheel Galaxy",
    "Sombrero Galaxy",
    "Triangulum Galaxy",
    "Large Magellanic Cloud",
    "Small Magellanic Cloud",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub aliases: Vec<String>,
    pub canonical_search_term: String,
    pub display_name: String,
    pub coordinates: Option<Equatorial>,
}

impl CatalogEntry {
    pub fn new(
        aliases: &[&str],
        canonical_search_term: &str,
        display_name: &str,
        coordinates: Option<Equatorial>,
    ) -> Self {
        Self {
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
            canonical_search_term: canonical_search_term.to_string(),
            display_name: display_name.to_string(),
            coordinates,
        }
    }
}

/// Lookup key form of user input and aliases: trimmed and uppercased.
pub fn normalize_key(input: &str) -> String {
    input.trim().to_uppercase()
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    // Normalized aliases in table order, each paired with its entry index.
    keys: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut keys = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (entry_idx, entry) in entries.iter().enumerate() {
            if entry.coordinates.is_some_and(|coords| !coords.is_valid()) {
                return Err(SkyviewError::InvalidCoordinates(entry.display_name.clone()));
            }

            for alias in &entry.aliases {
                let key = normalize_key(alias);
                if key.is_empty() {
                    return Err(SkyviewError::EmptyAlias(entry.display_name.clone()));
                }

                if let Some(&existing) = index.get(&key) {
                    // The same alias listed twice on one entry is harmless.
                    if existing == entry_idx {
                        continue;
                    }
                    return Err(SkyviewError::DuplicateAlias {
                        alias: key,
                        first: entries[existing].display_name.clone(),
                        second: entry.display_name.clone(),
                    });
                }

                index.insert(key.clone(), entry_idx);
                keys.push((key, entry_idx));
            }
        }

        Ok(Self {
            entries,
            keys,
            index,
        })
    }

    /// Galaxies and clouds the dashboard knows by name.
    ///
    /// Table order decides substring ties, so the Milky Way with its generic
    /// `GALAXY` alias comes last.
    pub fn builtin() -> Self {
        let entries = vec![
            CatalogEntry::new(
                &["M101", "PINWHEEL", "PINWHEEL GALAXY"],
                "M101",
                "Pinwheel Galaxy (M101)",
                Some(Equatorial::new(210.802, 54.349)),
            ),
            CatalogEntry::new(
                &["M31", "ANDROMEDA", "ANDROMEDA GALAXY"],
                "M31",
                "Andromeda Galaxy (M31)",
                None,
            ),
            CatalogEntry::new(
                &["M51", "WHIRLPOOL", "WHIRLPOOL GALAXY"],
                "M51",
                "Whirlpool Galaxy (M51)",
                None,
            ),
            CatalogEntry::new(
                &["M33", "TRIANGULUM", "TRIANGULUM GALAXY"],
                "M33",
                "Triangulum Galaxy (M33)",
                None,
            ),
            CatalogEntry::new(
                &["M104", "SOMBRERO", "SOMBRERO GALAXY"],
                "M104",
                "Sombrero Galaxy (M104)",
                None,
            ),
            CatalogEntry::new(
                &["LMC", "LARGE MAGELLANIC CLOUD"],
                "LMC",
                "Large Magellanic Cloud",
                Some(Equatorial::new(80.9, -69.8)),
            ),
            CatalogEntry::new(
                &["SMC", "SMALL MAGELLANIC CLOUD"],
                "SMC",
                "Small Magellanic Cloud",
                Some(Equatorial::new(13.2, -72.8)),
            ),
            CatalogEntry::new(
                &["MILKY WAY", "GALACTIC CENTER", "GALAXY"],
                "Milky Way",
                "Milky Way (Galactic Center)",
                Some(Equatorial::new(266.4, -29.0)),
            ),
        ];

        Self::new(entries).expect("builtin catalog aliases are unique")
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// `key` must already be normalized with [`normalize_key`].
    pub fn lookup_exact(&self, key: &str) -> Option<&CatalogEntry> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    /// First alias, in table order, that contains `key` or is contained in it.
    pub fn lookup_substring(&self, key: &str) -> Option<&CatalogEntry> {
        if key.is_empty() {
            return None;
        }

        self.keys
            .iter()
            .find(|(alias, _)| key.contains(alias.as_str()) || alias.contains(key))
            .map(|&(_, idx)| &self.entries[idx])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Names worth suggesting when a search finds nothing.
pub fn suggestions(input: &str, limit: usize) -> Vec<String> {
    let needle = input.trim().to_lowercase();

    COMMON_NAMES
        .iter()
        .map(|name| name.to_string())
        .chain((1..=100).map(|n| format!("NGC {n}")))
        .filter(|name| name.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
