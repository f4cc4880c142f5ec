use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use super::body::{Body, BodyId};
use crate::config::Bounds;

/// Bodies kept in ascending layer order.
///
/// Every layer forms one contiguous run. Insertion and removal by index move
/// at most one body per later layer run, so their cost depends on the number
/// of layers and not on the number of bodies. Order inside a layer is not
/// preserved across removals.
#[derive(Debug, Clone, Default)]
pub struct BodyGroup {
    bodies: Vec<Body>,
    layer_counts: BTreeMap<i32, usize>,
    next_id: u64,
}

impl BodyGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `body` at the end of its layer run and returns its new id.
    pub fn add(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.insert(body);
        id
    }

    fn insert(&mut self, body: Body) {
        let layer = body.layer;
        self.bodies.push(body);

        // Rotate the new body backwards through every later run: each run
        // hands its first element to the slot just past its end.
        let mut hole = self.bodies.len() - 1;
        for (_, &count) in self.layer_counts.range((Excluded(layer), Unbounded)).rev() {
            let run_start = hole - count;
            self.bodies.swap(run_start, hole);
            hole = run_start;
        }

        *self.layer_counts.entry(layer).or_insert(0) += 1;
    }

    /// Removes the body at `index`; `None` when the index is out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Body> {
        if index >= self.bodies.len() {
            return None;
        }

        let (layer, run_end) = self.run_containing(index)?;

        // Park the removed body at the end of its run, then let every later
        // run shift left by moving its last element into the gap.
        let mut hole = run_end - 1;
        self.bodies.swap(index, hole);
        for (_, &count) in self.layer_counts.range((Excluded(layer), Unbounded)) {
            let run_last = hole + count;
            self.bodies.swap(hole, run_last);
            hole = run_last;
        }
        debug_assert_eq!(hole, self.bodies.len() - 1);

        if let Some(count) = self.layer_counts.get_mut(&layer) {
            *count -= 1;
            if *count == 0 {
                self.layer_counts.remove(&layer);
            }
        }
        self.bodies.pop()
    }

    /// Removes the body with `id`; `None` when no such body exists.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        self.remove_at(index)
    }

    /// Moves a body to another layer, keeping its id.
    pub fn set_layer(&mut self, id: BodyId, layer: i32) -> bool {
        let Some(mut body) = self.remove(id) else {
            return false;
        };
        body.layer = layer;
        self.insert(body);
        true
    }

    /// Removes every body outside `bounds` and returns them.
    pub fn retain_in_bounds(&mut self, bounds: &Bounds) -> Vec<Body> {
        let mut pruned = Vec::new();
        // Removal only touches slots at or after the removed index, so a
        // backwards sweep visits every body exactly once.
        for index in (0..self.bodies.len()).rev() {
            if self.bodies[index].is_out_of_bounds(bounds) {
                if let Some(body) = self.remove_at(index) {
                    pruned.push(body);
                }
            }
        }
        pruned
    }

    /// Layer and exclusive end index of the run holding `index`.
    fn run_containing(&self, index: usize) -> Option<(i32, usize)> {
        let mut end = 0;
        for (&layer, &count) in &self.layer_counts {
            end += count;
            if index < end {
                return Some((layer, end));
            }
        }
        None
    }

    /// Ordered read-only view.
    pub fn all(&self) -> &[Body] {
        &self.bodies
    }

    pub(crate) fn all_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Body> {
        self.bodies.iter()
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|body| body.id == id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|body| body.id == id)
    }

    /// Mutable access to a body. Use [`BodyGroup::set_layer`] to change its layer.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|body| body.id == id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of bodies currently on `layer`.
    pub fn layer_count(&self, layer: i32) -> usize {
        self.layer_counts.get(&layer).copied().unwrap_or(0)
    }

    /// Occupied layers in ascending order.
    pub fn layers(&self) -> impl Iterator<Item = i32> + '_ {
        self.layer_counts.keys().copied()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.layer_counts.clear();
    }
}

impl<'a> IntoIterator for &'a BodyGroup {
    type Item = &'a Body;
    type IntoIter = std::slice::Iter<'a, Body>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}

/// Two distinct mutable bodies out of one slice, in the requested order.
pub fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> Option<(&mut Body, &mut Body)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }

    if a < b {
        let (left, right) = bodies.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = bodies.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::body::BodyOptions, utils::math::Vector2};

    fn body_on(layer: i32) -> Body {
        Body::circle(Vector2::ZERO, 1.0, BodyOptions::dynamic().on_layer(layer)).unwrap()
    }

    fn layers(group: &BodyGroup) -> Vec<i32> {
        group.all().iter().map(|b| b.layer).collect()
    }

    #[test]
    fn add_keeps_layers_sorted() {
        let mut group = BodyGroup::new();
        for layer in [5, 1, 3, 1, 5, 2, 0] {
            group.add(body_on(layer));
        }
        assert_eq!(layers(&group), vec![0, 1, 1, 2, 3, 5, 5]);
        assert_eq!(group.layer_count(1), 2);
        assert_eq!(group.layers().collect::<Vec<_>>(), vec![0, 1, 2, 3, 5]);
    }

    #[test]
    fn remove_at_keeps_runs_contiguous() {
        let mut group = BodyGroup::new();
        for layer in [1, 1, 2, 2, 3, 3] {
            group.add(body_on(layer));
        }
        let removed = group.remove_at(1).unwrap();
        assert_eq!(removed.layer, 1);
        assert_eq!(layers(&group), vec![1, 2, 2, 3, 3]);

        group.remove_at(0).unwrap();
        assert_eq!(layers(&group), vec![2, 2, 3, 3]);
        assert_eq!(group.layer_count(1), 0);
        assert!(group.layers().all(|l| l != 1));
    }

    #[test]
    fn remove_at_out_of_range_is_a_no_op() {
        let mut group = BodyGroup::new();
        group.add(body_on(1));
        assert!(group.remove_at(1).is_none());
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn remove_by_id_reports_presence() {
        let mut group = BodyGroup::new();
        let a = group.add(body_on(4));
        let b = group.add(body_on(2));
        assert_eq!(group.remove(a).map(|body| body.id), Some(a));
        assert!(group.remove(a).is_none());
        assert_eq!(group.all()[0].id, b);
    }

    #[test]
    fn set_layer_moves_the_body() {
        let mut group = BodyGroup::new();
        let a = group.add(body_on(1));
        group.add(body_on(2));
        assert!(group.set_layer(a, 3));
        assert_eq!(layers(&group), vec![2, 3]);
        assert_eq!(group.get(a).unwrap().layer, 3);
        assert!(!group.set_layer(BodyId(999), 0));
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut bodies = vec![body_on(0), body_on(1), body_on(2)];
        let (x, y) = pair_mut(&mut bodies, 2, 0).unwrap();
        assert_eq!((x.layer, y.layer), (2, 0));
        assert!(pair_mut(&mut bodies, 1, 1).is_none());
        assert!(pair_mut(&mut bodies, 0, 3).is_none());
    }
}
