//! [`Plot`]-related read definitions.
//!
//! [`Plot`]: crate::domain::Plot

pub mod list {
    //! [`Plot`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::plot;
    #[cfg(doc)]
    use crate::domain::Plot;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = plot::Id;

    /// Cursor pointing to a specific [`Plot`] in a list.
    pub type Cursor = plot::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`plot::City`] to select exclusively.
        pub city: Option<plot::City>,

        /// [`plot::Status`] to select exclusively.
        pub status: Option<plot::Status>,

        /// Text to fuzzy search for across city, block and parcel number.
        pub search: Option<String>,
    }

    /// Total count of [`Plot`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}

pub mod snapshot {
    //! Whole-catalog snapshot definitions.
    //!
    //! The analysis pipeline is a pure function over an in-memory set of
    //! [`Plot`]s, so the Explore page selects the full (optionally
    //! city-narrowed) catalog in one go and derives everything else
    //! client of the database.
    //!
    //! [`Plot`]: crate::domain::Plot

    use crate::domain::plot;

    /// Filter narrowing a snapshot down.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`plot::City`] to select exclusively.
        pub city: Option<plot::City>,

        /// [`plot::Status`] to select exclusively.
        pub status: Option<plot::Status>,
    }
}
