use super::clip::Clip;
use serde::Serialize;
use std::sync::Arc;

/// Clip collection for one review session
///
/// Membership and order are fixed at construction; only selection flags change,
/// and every change yields a new set. Clones share storage, so a set handed to a
/// renderer never observes later toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClipSet {
    clips: Arc<[Clip]>,
}

impl ClipSet {
    /// Build from an analysis result, marking every clip selected
    pub fn from_analysis(clips: Vec<Clip>) -> Self {
        let clips: Vec<Clip> = clips
            .into_iter()
            .map(|clip| Clip {
                is_selected: true,
                ..clip
            })
            .collect();
        Self {
            clips: clips.into(),
        }
    }

    /// Return a copy with the matching clip's selection inverted
    ///
    /// An unknown id yields an identical set.
    pub fn toggle(&self, id: &str) -> Self {
        if !self.contains(id) {
            return self.clone();
        }

        let clips: Vec<Clip> = self
            .clips
            .iter()
            .map(|clip| {
                if clip.id == id {
                    Clip {
                        is_selected: !clip.is_selected,
                        ..clip.clone()
                    }
                } else {
                    clip.clone()
                }
            })
            .collect();

        Self {
            clips: clips.into(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.clips.iter().any(|clip| clip.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    pub fn selected_count(&self) -> usize {
        self.clips.iter().filter(|clip| clip.is_selected).count()
    }

    /// Selected clips in analysis order
    pub fn selected(&self) -> Vec<Clip> {
        self.clips
            .iter()
            .filter(|clip| clip.is_selected)
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.clips.iter()
    }

    pub fn as_slice(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClipSet {
        ClipSet::from_analysis(vec![
            Clip::new("a", "Intro", "00:00:00", "00:00:30"),
            Clip::new("b", "Key Moment", "00:01:00", "00:01:45"),
            Clip::new("c", "Outro", "00:05:00", "00:05:20"),
        ])
    }

    #[test]
    fn test_from_analysis_selects_all_in_order() {
        let set = sample();
        assert_eq!(set.selected_count(), 3);
        let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_inverts_only_target() {
        let set = sample();
        let toggled = set.toggle("b");

        assert!(!toggled.get("b").unwrap().is_selected);
        assert!(toggled.get("a").unwrap().is_selected);
        assert_eq!(toggled.selected_count(), 2);

        // Source set untouched
        assert_eq!(set.selected_count(), 3);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let set = sample();
        assert_eq!(set.toggle("missing"), set);
    }

    #[test]
    fn test_selected_count_tracks_odd_toggles() {
        let toggles = ["a", "b", "a", "c", "c", "c", "missing"];
        let mut set = sample();
        for id in toggles {
            set = set.toggle(id);
        }

        // a: 2 toggles (selected), b: 1 (deselected), c: 3 (deselected)
        assert_eq!(set.selected_count(), 1);
        let selected: Vec<_> = set.selected().into_iter().map(|c| c.id).collect();
        assert_eq!(selected, vec!["a"]);
    }

    #[test]
    fn test_selected_preserves_order_and_len() {
        let set = sample().toggle("a");
        let titles: Vec<_> = set.selected().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Key Moment", "Outro"]);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }
}
