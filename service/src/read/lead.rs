//! [`Lead`]-related read definitions.
//!
//! [`Lead`]: crate::domain::Lead

pub mod list {
    //! [`Lead`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::{lead, plot};
    #[cfg(doc)]
    use crate::domain::Lead;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = lead::Id;

    /// Cursor pointing to a specific [`Lead`] in a list.
    pub type Cursor = lead::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`lead::Status`] to select exclusively.
        pub status: Option<lead::Status>,

        /// [`plot::Id`] the selected [`Lead`]s are interested in.
        pub plot: Option<plot::Id>,
    }

    /// Total count of [`Lead`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
