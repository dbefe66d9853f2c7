use std::fmt;

/// Name-keyed table of factories that remembers registration order.
///
/// Lookups of unknown names are not errors: [`Registry::get`] returns `None`
/// so the dispatcher can decide what an unknown name means.
pub struct Registry<F> {
    entries: Vec<(String, F)>,
}

impl<F> Registry<F> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register `factory` under `name`. Re-adding a name replaces the
    /// factory but keeps its original position.
    pub fn add(&mut self, name: impl Into<String>, factory: F) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = factory,
            None => self.entries.push((name, factory)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&F> {
        self.entries.iter().find(|(existing, _)| existing == name).map(|(_, factory)| factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// `(name, factory)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &F)> {
        self.entries.iter().map(|(name, factory)| (name.as_str(), factory))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<'a, F> IntoIterator for &'a Registry<F> {
    type Item = (&'a str, &'a F);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a F)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    type Factory = Arc<dyn Fn() -> &'static str + Send + Sync>;

    fn dummy(label: &'static str) -> Factory {
        Arc::new(move || label)
    }

    #[test]
    fn add_then_get_and_contains() {
        let mut registry: Registry<Factory> = Registry::new();
        let factory = dummy("provider");

        registry.add("provider", factory.clone());

        assert!(registry.contains("provider"));
        assert!(Arc::ptr_eq(registry.get("provider").unwrap(), &factory));
        assert_eq!(registry.get("provider").unwrap()(), "provider");
    }

    #[test]
    fn unknown_name_is_absent_not_an_error() {
        let mut registry: Registry<Factory> = Registry::default();
        registry.add("provider", dummy("provider"));

        assert!(!registry.contains("bar"));
        assert!(registry.get("bar").is_none());
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = Registry::new();
        registry.add("sinoptik", 3);
        registry.add("accu", 1);
        registry.add("rp5", 2);

        let pairs: Vec<_> = registry.iter().map(|(name, n)| (name, *n)).collect();
        assert_eq!(pairs, [("sinoptik", 3), ("accu", 1), ("rp5", 2)]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn re_adding_overwrites_in_place() {
        let mut registry = Registry::new();
        registry.add("accu", 1);
        registry.add("rp5", 2);
        registry.add("accu", 10);

        assert_eq!(registry.get("accu"), Some(&10));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["accu", "rp5"]);
        assert_eq!(format!("{registry:?}"), r#"["accu", "rp5"]"#);
    }
}
