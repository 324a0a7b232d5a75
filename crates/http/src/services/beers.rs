//! The beer catalog behind `/good-beers`

use crate::types::Beer;

/// Beers never served as good ones
pub const BAD_BEERS: &[&str] = &["Budweiser", "Coors Light", "PBR"];

const SEED: &[&str] = &[
    "Kentucky Brunch Brand Stout",
    "Good Morning",
    "Very Hazy",
    "King Julius",
    "Budweiser",
    "Coors Light",
    "PBR",
];

/// In-memory beer catalog
#[derive(Debug, Clone)]
pub struct BeerCatalog {
    beers: Vec<Beer>,
}

impl BeerCatalog {
    pub fn new(beers: Vec<Beer>) -> Self {
        Self { beers }
    }

    pub fn all(&self) -> &[Beer] {
        &self.beers
    }

    /// Every beer not on the bad list, in catalog order
    pub fn good_beers(&self) -> Vec<Beer> {
        self.beers
            .iter()
            .filter(|beer| !is_bad(&beer.name))
            .cloned()
            .collect()
    }
}

impl Default for BeerCatalog {
    fn default() -> Self {
        Self::new(
            SEED.iter()
                .zip(1u64..)
                .map(|(name, id)| Beer::new(id, *name))
                .collect(),
        )
    }
}

fn is_bad(name: &str) -> bool {
    BAD_BEERS.iter().any(|bad| bad.eq_ignore_ascii_case(name.trim()))
}
