use crate::catalog::{normalize_key, Catalog, CatalogEntry};
use crate::coords::{parse_coordinates, Equatorial};

/// What a single search should do: jump to known coordinates, or hand
/// `search_term` to the widget's resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResolution {
    pub search_term: String,
    pub display_name: String,
    pub coordinates: Option<Equatorial>,
}

impl SearchResolution {
    fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            search_term: entry.canonical_search_term.clone(),
            display_name: entry.display_name.clone(),
            coordinates: entry.coordinates,
        }
    }

    fn from_coordinates(coords: Equatorial) -> Self {
        Self {
            search_term: format!("{} {}", coords.ra, coords.dec),
            display_name: format!("Coordinates ({coords})"),
            coordinates: Some(coords),
        }
    }

    fn free_text(raw_input: &str) -> Self {
        Self {
            search_term: raw_input.to_string(),
            display_name: raw_input.to_string(),
            coordinates: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectLocator {
    catalog: Catalog,
}

impl ObjectLocator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog exact match, then catalog substring match, then coordinates,
    /// then the raw input as free text for the widget's resolver.
    pub fn resolve(&self, raw_input: &str) -> SearchResolution {
        let key = normalize_key(raw_input);

        if let Some(entry) = self.catalog.lookup_exact(&key) {
            return SearchResolution::from_entry(entry);
        }

        if let Some(entry) = self.catalog.lookup_substring(&key) {
            return SearchResolution::from_entry(entry);
        }

        if let Some(coords) = parse_coordinates(raw_input) {
            return SearchResolution::from_coordinates(coords);
        }

        SearchResolution::free_text(raw_input)
    }
}
