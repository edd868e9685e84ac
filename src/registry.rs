//! Name-to-slot registry giving series stable positions across frames.
//!
//! The slot sequence has two regions. The named region holds series whose
//! identity persists across frames (car arrows, car footprints, lines); a
//! name keeps its index for as long as the registry lives. After it comes
//! the positional region, rewritten every frame for the polygon set and
//! shrunk with [`DatasetRegistry::truncate_from`].

use std::collections::HashMap;

use crate::geom::Sample;
use crate::series::{Series, SeriesRole};
use crate::style::{SeriesStyle, Theme};

/// Stable handle to a series slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesHandle(usize);

impl SeriesHandle {
    /// Position of the slot in the series sequence.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Ordered series sequence with name lookups.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    theme: Theme,
    named: HashMap<String, usize>,
    placed: HashMap<String, usize>,
    named_len: usize,
    slots: Vec<Option<Series>>,
}

impl DatasetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry resolving colors against `theme`.
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Return the slot of `name`, assigning the next index of the named
    /// region on first sight.
    ///
    /// If that index is occupied by a positional series, the positional
    /// series is displaced; the positional region is rewritten after the
    /// named region on every frame anyway.
    pub fn resolve_or_create(&mut self, name: &str) -> SeriesHandle {
        if let Some(&index) = self.named.get(name) {
            return SeriesHandle(index);
        }
        let index = self.named_len;
        self.named_len += 1;
        if index < self.slots.len() {
            self.placed.retain(|_, slot| *slot != index);
            self.slots[index] = None;
        }
        self.named.insert(name.to_string(), index);
        log::debug!("series {name:?} assigned slot {index}");
        SeriesHandle(index)
    }

    /// Bind `name` to a positional slot at `index`.
    ///
    /// Indices inside the named region are moved to its end.
    pub fn place(&mut self, index: usize, name: &str) -> SeriesHandle {
        let index = index.max(self.named_len);
        self.placed
            .retain(|placed, slot| *slot != index && placed.as_str() != name);
        self.placed.insert(name.to_string(), index);
        SeriesHandle(index)
    }

    /// Write a series into a slot.
    ///
    /// An empty slot, or one holding a different name, gets a fresh series
    /// built from the role template with `style` layered on top. Otherwise
    /// only the label text and points are replaced and the existing style is
    /// kept. Nothing is redrawn.
    pub fn set_series(
        &mut self,
        handle: SeriesHandle,
        name: &str,
        role: SeriesRole,
        style: &SeriesStyle,
        points: Vec<Sample>,
    ) {
        let index = handle.0;
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        match &mut self.slots[index] {
            Some(series) if series.name() == name => series.update(name, points),
            slot => {
                log::debug!("building series {name:?} in slot {index}");
                *slot = Some(Series::new(name, role, style, points, &self.theme));
            }
        }
    }

    /// Drop every slot from `index` to the end, along with the names bound
    /// to them. Returns the number of slots removed.
    ///
    /// A removed name that shows up again is treated as new.
    pub fn truncate_from(&mut self, index: usize) -> usize {
        if index >= self.slots.len() {
            return 0;
        }
        let removed = self.slots.len() - index;
        self.slots.truncate(index);
        self.named.retain(|_, slot| *slot < index);
        self.placed.retain(|_, slot| *slot < index);
        self.named_len = self.named_len.min(index);
        log::debug!("truncated {removed} series from slot {index}");
        removed
    }

    /// Look up the slot bound to `name`.
    pub fn resolve(&self, name: &str) -> Option<SeriesHandle> {
        self.named
            .get(name)
            .or_else(|| self.placed.get(name))
            .map(|&index| SeriesHandle(index))
    }

    /// Access the series in a slot.
    pub fn get(&self, handle: SeriesHandle) -> Option<&Series> {
        self.slots.get(handle.0)?.as_ref()
    }

    /// Access the series in a slot mutably.
    pub fn get_mut(&mut self, handle: SeriesHandle) -> Option<&mut Series> {
        self.slots.get_mut(handle.0)?.as_mut()
    }

    /// Iterate over series in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SeriesHandle, &Series)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|series| (SeriesHandle(index), series)))
    }

    /// Iterate over series in slot order, without handles.
    pub fn series(&self) -> impl Iterator<Item = &Series> + Clone + '_ {
        self.slots.iter().flatten()
    }

    /// Length of the slot sequence.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Length of the named region; positional slots start here.
    pub fn named_len(&self) -> usize {
        self.named_len
    }

    /// Remove every series and binding.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.named.clear();
        self.placed.clear();
        self.named_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(registry: &mut DatasetRegistry, handle: SeriesHandle, name: &str, role: SeriesRole) {
        registry.set_series(
            handle,
            name,
            role,
            &SeriesStyle::default(),
            vec![Sample::new(0.0, 0.0)],
        );
    }

    #[test]
    fn resolve_or_create_is_stable() {
        let mut registry = DatasetRegistry::new();
        let a = registry.resolve_or_create("a");
        let b = registry.resolve_or_create("b");
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(registry.resolve_or_create("a"), a);
        assert_eq!(registry.resolve("b"), Some(b));
        assert_eq!(registry.named_len(), 2);
    }

    #[test]
    fn set_series_updates_in_place() {
        let mut registry = DatasetRegistry::new();
        let handle = registry.resolve_or_create("line");
        registry.set_series(
            handle,
            "line",
            SeriesRole::Line,
            &SeriesStyle::with_color("red"),
            vec![Sample::new(0.0, 0.0)],
        );
        registry.set_series(
            handle,
            "line",
            SeriesRole::Line,
            &SeriesStyle::with_color("blue"),
            vec![Sample::new(1.0, 1.0), Sample::new(2.0, 2.0)],
        );
        let series = registry.get(handle).expect("series");
        assert_eq!(series.style().color, crate::render::Color::RED);
        assert_eq!(series.points().len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn truncate_clears_names_and_reuse_builds_fresh_series() {
        let mut registry = DatasetRegistry::new();
        let line = registry.resolve_or_create("line");
        set(&mut registry, line, "line", SeriesRole::Line);
        let a = registry.place(registry.named_len(), "a");
        set(&mut registry, a, "a", SeriesRole::Polygon);
        let b = registry.place(registry.named_len() + 1, "b");
        set(&mut registry, b, "b", SeriesRole::Polygon);
        assert_eq!(registry.len(), 3);

        assert_eq!(registry.truncate_from(2), 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve("b").is_none());
        assert_eq!(registry.resolve("a"), Some(a));

        let again = registry.place(2, "b");
        registry.set_series(
            again,
            "b",
            SeriesRole::Polygon,
            &SeriesStyle::with_color("blue"),
            Vec::new(),
        );
        let series = registry.get(again).expect("series");
        assert_eq!(series.style().color, crate::render::Color::rgb8(0, 0, 255));
    }

    #[test]
    fn placing_different_name_rebuilds_slot() {
        let mut registry = DatasetRegistry::new();
        let a = registry.place(0, "a");
        registry.set_series(
            a,
            "a",
            SeriesRole::Polygon,
            &SeriesStyle::with_color("blue"),
            Vec::new(),
        );
        let b = registry.place(0, "b");
        assert_eq!(a, b);
        set(&mut registry, b, "b", SeriesRole::Polygon);
        assert!(registry.resolve("a").is_none());
        let series = registry.get(b).expect("series");
        assert_eq!(series.name(), "b");
        assert_eq!(series.style().color, crate::render::Color::RED);
    }

    #[test]
    fn new_name_displaces_positional_slot() {
        let mut registry = DatasetRegistry::new();
        let car = registry.resolve_or_create("car");
        set(&mut registry, car, "car", SeriesRole::CarArrow);
        let poly = registry.place(1, "zone");
        set(&mut registry, poly, "zone", SeriesRole::Polygon);

        let line = registry.resolve_or_create("late_line");
        assert_eq!(line.index(), 1);
        assert!(registry.get(line).is_none());
        assert!(registry.resolve("zone").is_none());
        set(&mut registry, line, "late_line", SeriesRole::Line);
        assert_eq!(registry.get(line).map(Series::role), Some(SeriesRole::Line));
    }

    #[test]
    fn truncate_past_end_is_noop() {
        let mut registry = DatasetRegistry::new();
        assert_eq!(registry.truncate_from(0), 0);
        let handle = registry.resolve_or_create("a");
        set(&mut registry, handle, "a", SeriesRole::Line);
        assert_eq!(registry.truncate_from(5), 0);
        assert_eq!(registry.len(), 1);
    }
}
