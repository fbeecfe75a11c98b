use super::Schema;
use derivative::Derivative;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;
use std::hash::Hash;

/// Like nodes, marks (which are associated with text to signify things like
/// being hidden behind a spoiler or carrying an annotation) are tagged with
/// type objects, which are shared by every mark of that kind.
///
/// The ordering of mark types is their rank: lower ranked marks wrap higher
/// ranked ones when serialized.
pub trait MarkType: Copy + Clone + Debug + PartialEq + Eq + PartialOrd + Ord + Hash {}

/// The methods that every mark of a schema supports.
pub trait Mark<S: Schema<Mark = Self>>:
    Serialize + for<'de> Deserialize<'de> + Debug + Clone + PartialEq + Eq + Hash
{
    /// The type of this mark.
    fn r#type(&self) -> S::MarkType;

    /// Create a set that contains only this mark.
    fn into_set(self) -> MarkSet<S> {
        let mut set = MarkSet::default();
        set.add(self);
        set
    }

    /// Test whether this mark is in the given set of marks.
    fn is_in_set(&self, set: &MarkSet<S>) -> bool {
        set.contains(self)
    }
}

/// An ordered set of marks.
///
/// The set holds at most one mark per mark type and keeps its marks sorted by type rank, so two
/// sets with the same marks always compare (and serialize) equal.
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    Default(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = "")
)]
pub struct MarkSet<S: Schema> {
    inner: Vec<S::Mark>,
}

impl<S: Schema> MarkSet<S> {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there are no marks in the set.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The number of marks in the set.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterate over the marks in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, S::Mark> {
        self.inner.iter()
    }

    /// Whether the exact mark is in the set.
    pub fn contains(&self, mark: &S::Mark) -> bool {
        self.inner.contains(mark)
    }

    /// Get the mark of the given type, if present.
    pub fn get(&self, mark_type: S::MarkType) -> Option<&S::Mark> {
        self.inner.iter().find(|m| m.r#type() == mark_type)
    }

    /// Add a mark. A mark of the same type that is already present is replaced.
    pub fn add(&mut self, mark: S::Mark) {
        let t = mark.r#type();
        match self.inner.binary_search_by(|m| m.r#type().cmp(&t)) {
            Ok(i) => self.inner[i] = mark,
            Err(i) => self.inner.insert(i, mark),
        }
    }

    /// A copy of this set with the mark added.
    pub fn with(&self, mark: S::Mark) -> Self {
        let mut copy = self.clone();
        copy.add(mark);
        copy
    }
}

impl<'a, S: Schema> IntoIterator for &'a MarkSet<S> {
    type Item = &'a S::Mark;
    type IntoIter = std::slice::Iter<'a, S::Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<S: Schema> From<Vec<S::Mark>> for MarkSet<S> {
    fn from(src: Vec<S::Mark>) -> Self {
        let mut set = Self::default();
        for mark in src {
            set.add(mark);
        }
        set
    }
}

impl<S: Schema> Serialize for MarkSet<S> {
    fn serialize<Sr>(&self, serializer: Sr) -> Result<Sr::Ok, Sr::Error>
    where
        Sr: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de, S: Schema> Deserialize<'de> for MarkSet<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let marks = Vec::<S::Mark>::deserialize(deserializer)?;
        Ok(Self::from(marks))
    }
}
