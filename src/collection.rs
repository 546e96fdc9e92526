//! # Object Collection
//!
//! An ordered, name-addressable container. Actions and resources are kept in
//! declaration order, and most graph lookups are "first item with this name".
//!
//! Lookups are linear. API graphs hold dozens of resources, not millions, so a
//! `Vec` keeps insertion order for free and stays cheap to clone when a new
//! version copies its ancestor.

use std::slice;

/// Anything stored in an [`ObjectCollection`] is addressed by its name.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ObjectCollection<T> {
    objects: Vec<T>,
}

impl<T> Default for ObjectCollection<T> {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
        }
    }
}

impl<T: Named> ObjectCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// First object whose name matches.
    pub fn find(&self, name: &str) -> Option<&T> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut T> {
        self.objects.iter_mut().find(|o| o.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Appends an object. Duplicate names are allowed.
    pub fn add(&mut self, item: T) -> &mut Self {
        self.objects.push(item);
        self
    }

    /// Replaces the first object with the same name in place, or appends.
    pub fn upsert(&mut self, item: T) -> &mut Self {
        match self.objects.iter().position(|o| o.name() == item.name()) {
            Some(index) => self.objects[index] = item,
            None => self.objects.push(item),
        }
        self
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) -> &mut Self {
        self.objects.extend(items);
        self
    }

    /// Removes the first object with the given name, handing it back.
    ///
    /// Returns `None` when nothing matches; callers that treat this as a
    /// definition error check [`contains`](Self::contains) first.
    pub fn delete(&mut self, name: &str) -> Option<T> {
        let index = self.objects.iter().position(|o| o.name() == name)?;
        Some(self.objects.remove(index))
    }

    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(Named::name).collect()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.objects
    }
}

impl<'a, T> IntoIterator for &'a ObjectCollection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

impl<T> IntoIterator for ObjectCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<T: Named> FromIterator<T> for ObjectCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Part(&'static str);

    impl Named for Part {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn parts() -> ObjectCollection<Part> {
        let mut collection = ObjectCollection::new();
        collection.add(Part("battery")).add(Part("charger"));
        collection
    }

    #[test]
    fn test_find_returns_matching_item() {
        let collection = parts();
        assert_eq!(collection.find("battery"), Some(&Part("battery")));
        assert_eq!(collection.find("cable"), None);
    }

    #[test]
    fn test_delete_removes_first_match_only() {
        let mut collection = parts();
        collection.add(Part("battery"));

        let removed = collection.delete("battery");
        assert_eq!(removed, Some(Part("battery")));
        assert_eq!(collection.names(), vec!["charger", "battery"]);

        assert_eq!(collection.delete("cable"), None);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_names_preserve_insertion_order() {
        let mut collection = parts();
        collection.add_all(vec![Part("case"), Part("adapter")]);
        assert_eq!(
            collection.names(),
            vec!["battery", "charger", "case", "adapter"]
        );
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut collection = parts();
        collection.upsert(Part("charger")).upsert(Part("cable"));
        assert_eq!(collection.names(), vec!["battery", "charger", "cable"]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_iteration_visits_every_item() {
        let collection = parts();
        let seen: Vec<_> = collection.iter().cloned().collect();
        assert_eq!(seen, vec![Part("battery"), Part("charger")]);
    }
}
