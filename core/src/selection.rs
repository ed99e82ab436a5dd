use serde::Serialize;

/// Identifies the selection cycle a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FetchTag {
    pub intersection_id: String,
    pub generation: u64,
}

/// The single intersection under observation and the generation of its latest cycle.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<String>,
    generation: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `id` and opens a new cycle. Re-selecting the same id still opens a new one.
    pub fn select(&mut self, id: impl Into<String>) -> FetchTag {
        self.current = Some(id.into());
        self.next_tag()
    }

    /// Opens a new cycle for the current selection, superseding its in-flight fetches.
    pub fn begin_cycle(&mut self) -> Option<FetchTag> {
        self.current.as_ref()?;
        Some(self.next_tag())
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_tag(&self) -> Option<FetchTag> {
        self.current.as_ref().map(|id| FetchTag {
            intersection_id: id.clone(),
            generation: self.generation,
        })
    }

    pub fn is_current(&self, tag: &FetchTag) -> bool {
        self.generation == tag.generation && self.current.as_deref() == Some(&tag.intersection_id)
    }

    fn next_tag(&mut self) -> FetchTag {
        self.generation += 1;
        FetchTag {
            intersection_id: self.current.clone().unwrap_or_default(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let selection = SelectionState::new();
        assert!(selection.current().is_none());
        assert!(selection.current_tag().is_none());
    }

    #[test]
    fn reselecting_the_same_id_supersedes_the_previous_cycle() {
        let mut selection = SelectionState::new();
        let first = selection.select("A");
        let second = selection.select("A");
        assert_ne!(first, second);
        assert!(!selection.is_current(&first));
        assert!(selection.is_current(&second));
    }

    #[test]
    fn switching_ids_invalidates_older_tags() {
        let mut selection = SelectionState::new();
        let a = selection.select("A");
        let b = selection.select("B");
        assert_eq!(selection.current(), Some("B"));
        assert!(!selection.is_current(&a));
        assert!(selection.is_current(&b));
    }

    #[test]
    fn begin_cycle_requires_a_selection() {
        let mut selection = SelectionState::new();
        assert!(selection.begin_cycle().is_none());
        let a = selection.select("A");
        let refreshed = selection.begin_cycle().unwrap();
        assert_eq!(refreshed.intersection_id, "A");
        assert_eq!(refreshed.generation, a.generation + 1);
        assert!(!selection.is_current(&a));
    }
}
