//! Result interpretation for fan-out operations.
//!
//! - [`Presence`] decides whether a per-key result counts as "found" when
//!   probing sources for the first non-empty answer.
//! - [`MergeInto`] decides how a per-key result is appended when merging
//!   every source's answer into one list.
//!
//! # Default Implementations
//!
//! | type        | `Presence::into_found`  | `MergeInto::merge_into`  |
//! |-------------|-------------------------|--------------------------|
//! | `Option<T>` | `Some(t)` → `t`         | pushes `t` if present    |
//! | `Vec<T>`    | non-empty vector        | flattens the elements    |
//! | `String`    | non-empty string        | -                        |
//! | [`Outcome<T>`] | non-empty outcome    | pushes or flattens       |

/// Interpretation of a per-key result as "found" or "empty".
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be probed for a non-empty result",
    label = "missing `Presence` implementation",
    note = "Return `Option<T>` or `Vec<T>` from the unit of work, or implement `Presence`."
)]
pub trait Presence {
    /// The value handed back when the result is non-empty.
    type Found;

    /// `Some` when the result is non-empty.
    fn into_found(self) -> Option<Self::Found>;
}

impl<T> Presence for Option<T> {
    type Found = T;

    fn into_found(self) -> Option<T> {
        self
    }
}

impl<T> Presence for Vec<T> {
    type Found = Vec<T>;

    fn into_found(self) -> Option<Vec<T>> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl Presence for String {
    type Found = String;

    fn into_found(self) -> Option<String> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// How a per-key result is appended to a merged list.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be merged into a result list",
    label = "missing `MergeInto` implementation",
    note = "Return `Option<T>` or `Vec<T>` from the unit of work, or implement `MergeInto`."
)]
pub trait MergeInto {
    /// Element type of the merged list.
    type Item;

    /// Append this result to `merged`.
    fn merge_into(self, merged: &mut Vec<Self::Item>);
}

impl<T> MergeInto for Option<T> {
    type Item = T;

    fn merge_into(self, merged: &mut Vec<T>) {
        if let Some(item) = self {
            merged.push(item);
        }
    }
}

impl<T> MergeInto for Vec<T> {
    type Item = T;

    fn merge_into(self, merged: &mut Vec<T>) {
        merged.extend(self);
    }
}

/// A per-key result that may be absent, a single row or a list of rows.
///
/// Lets sources of one fan-out answer in different shapes: merging
/// `Outcome::Many(vec![a, b])` and `Outcome::One(c)` yields `[a, b, c]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome<T> {
    /// Nothing found.
    #[default]
    Empty,
    /// A single row.
    One(T),
    /// A list of rows; empty lists count as nothing found.
    Many(Vec<T>),
}

impl<T> Outcome<T> {
    /// Whether the outcome carries no rows.
    pub fn is_empty(&self) -> bool {
        match self {
            Outcome::Empty => true,
            Outcome::One(_) => false,
            Outcome::Many(rows) => rows.is_empty(),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Outcome::Empty, Outcome::One)
    }
}

impl<T> From<Vec<T>> for Outcome<T> {
    fn from(rows: Vec<T>) -> Self {
        Outcome::Many(rows)
    }
}

impl<T> Presence for Outcome<T> {
    type Found = Outcome<T>;

    fn into_found(self) -> Option<Outcome<T>> {
        if self.is_empty() { None } else { Some(self) }
    }
}

impl<T> MergeInto for Outcome<T> {
    type Item = T;

    fn merge_into(self, merged: &mut Vec<T>) {
        match self {
            Outcome::Empty => {}
            Outcome::One(row) => merged.push(row),
            Outcome::Many(rows) => merged.extend(rows),
        }
    }
}
