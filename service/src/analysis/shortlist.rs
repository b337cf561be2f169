//! Client-local shortlists of [`Plot`]s.
//!
//! Both shortlists persist to browser local storage as a JSON array of
//! [`plot::Id`]s and are reconstructed from whatever is found there, so
//! deserialization tolerates duplicates and overflow instead of failing.
//!
//! [`Plot`]: crate::domain::Plot

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::plot;

/// Ordered set of favorite [`Plot`]s.
///
/// [`Plot`]: crate::domain::Plot
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "Vec<plot::Id>", into = "Vec<plot::Id>")]
pub struct Favorites(Vec<plot::Id>);

impl Favorites {
    /// Creates a new empty [`Favorites`] shortlist.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Indicates whether the provided [`plot::Id`] is a favorite.
    #[must_use]
    pub fn contains(&self, id: plot::Id) -> bool {
        self.0.contains(&id)
    }

    /// Toggles the provided [`plot::Id`], returning whether it is a
    /// favorite afterwards.
    pub fn toggle(&mut self, id: plot::Id) -> bool {
        if let Some(pos) = self.0.iter().position(|f| *f == id) {
            drop(self.0.remove(pos));
            false
        } else {
            self.0.push(id);
            true
        }
    }

    /// Returns the favorite [`plot::Id`]s, oldest first.
    #[must_use]
    pub fn ids(&self) -> &[plot::Id] {
        &self.0
    }
}

impl From<Vec<plot::Id>> for Favorites {
    fn from(ids: Vec<plot::Id>) -> Self {
        let mut this = Self::new();
        for id in ids {
            if !this.contains(id) {
                this.0.push(id);
            }
        }
        this
    }
}

impl From<Favorites> for Vec<plot::Id> {
    fn from(favorites: Favorites) -> Self {
        favorites.0
    }
}

/// Shortlist of [`Plot`]s picked for side-by-side comparison.
///
/// Bounded to [`CompareSet::MAX`] entries, since the comparison UI renders
/// at most that many columns.
///
/// [`Plot`]: crate::domain::Plot
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "Vec<plot::Id>", into = "Vec<plot::Id>")]
pub struct CompareSet(Vec<plot::Id>);

impl CompareSet {
    /// Maximum number of [`plot::Id`]s in a [`CompareSet`].
    pub const MAX: usize = 3;

    /// Creates a new empty [`CompareSet`].
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Indicates whether the provided [`plot::Id`] is picked for
    /// comparison.
    #[must_use]
    pub fn contains(&self, id: plot::Id) -> bool {
        self.0.contains(&id)
    }

    /// Adds the provided [`plot::Id`] to this [`CompareSet`].
    ///
    /// Adding an already-picked [`plot::Id`] is a no-op.
    ///
    /// # Errors
    ///
    /// Errors if this [`CompareSet`] is full already.
    pub fn add(&mut self, id: plot::Id) -> Result<(), FullError> {
        if self.contains(id) {
            return Ok(());
        }
        if self.0.len() >= Self::MAX {
            return Err(FullError);
        }
        self.0.push(id);
        Ok(())
    }

    /// Removes the provided [`plot::Id`] from this [`CompareSet`],
    /// returning whether it was picked.
    pub fn remove(&mut self, id: plot::Id) -> bool {
        if let Some(pos) = self.0.iter().position(|c| *c == id) {
            drop(self.0.remove(pos));
            true
        } else {
            false
        }
    }

    /// Returns the picked [`plot::Id`]s, oldest first.
    #[must_use]
    pub fn ids(&self) -> &[plot::Id] {
        &self.0
    }
}

impl From<Vec<plot::Id>> for CompareSet {
    fn from(ids: Vec<plot::Id>) -> Self {
        let mut this = Self::new();
        for id in ids {
            if this.add(id).is_err() {
                break;
            }
        }
        this
    }
}

impl From<CompareSet> for Vec<plot::Id> {
    fn from(compare: CompareSet) -> Self {
        compare.0
    }
}

/// Error of adding to a full [`CompareSet`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`CompareSet` holds {} plots already", CompareSet::MAX)]
pub struct FullError;

#[cfg(test)]
mod spec {
    use super::{CompareSet, Favorites};
    use crate::domain::plot;

    #[test]
    fn favorites_toggle_flips_membership() {
        let id = plot::Id::new();
        let mut favorites = Favorites::new();

        assert!(favorites.toggle(id));
        assert!(favorites.contains(id));
        assert!(!favorites.toggle(id));
        assert!(!favorites.contains(id));
    }

    #[test]
    fn favorites_round_trip_through_json() {
        let mut favorites = Favorites::new();
        let (a, b) = (plot::Id::new(), plot::Id::new());
        _ = favorites.toggle(a);
        _ = favorites.toggle(b);

        let json = serde_json::to_string(&favorites).unwrap();
        let restored: Favorites = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, favorites);
    }

    #[test]
    fn favorites_deduplicate_persisted_junk() {
        let id = plot::Id::new();
        let json = format!(r#"["{id}","{id}"]"#);

        let restored: Favorites = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.ids().len(), 1);
    }

    #[test]
    fn compare_set_is_bounded() {
        let mut compare = CompareSet::new();

        for _ in 0..CompareSet::MAX {
            compare.add(plot::Id::new()).unwrap();
        }
        assert!(compare.add(plot::Id::new()).is_err());

        // Re-adding a picked plot stays fine even when full.
        let picked = compare.ids()[0];
        compare.add(picked).unwrap();
    }

    #[test]
    fn compare_set_truncates_persisted_overflow() {
        let ids = (0..5).map(|_| plot::Id::new()).collect::<Vec<_>>();
        let json = serde_json::to_string(&ids).unwrap();

        let restored: CompareSet = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.ids().len(), CompareSet::MAX);
        assert_eq!(restored.ids(), &ids[..CompareSet::MAX]);
    }
}
