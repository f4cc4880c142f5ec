use std::collections::HashMap;

use crate::{
    collision::{
        broadphase::{ExhaustivePairs, PairSource},
        contact::ContactManifold,
        narrowphase::NarrowPhase,
    },
    core::body::{Body, BodyId},
    utils::math::Vector2,
};

/// Pair generation plus the manifolds kept for the current step.
pub struct CollisionManager {
    pub pair_source: Box<dyn PairSource>,
    pub contacts: Vec<ContactManifold>,
    pairs: Vec<(usize, usize)>,
}

impl Default for CollisionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionManager {
    pub fn new() -> Self {
        Self {
            pair_source: Box::new(ExhaustivePairs::new()),
            contacts: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Rebuilds the contact list; returns the number of candidate pairs tested.
    pub fn generate(&mut self, bodies: &[Body], gravity: Vector2, dt: f64) -> usize {
        self.contacts.clear();
        self.pair_source.collect_pairs(bodies, &mut self.pairs);

        let mut tested = 0;
        for &(i, j) in &self.pairs {
            let (Some(a), Some(b)) = (bodies.get(i), bodies.get(j)) else {
                continue;
            };
            if i == j || NarrowPhase::should_ignore(a, b) {
                continue;
            }
            tested += 1;

            let mut manifold = ContactManifold::new(i, j);
            manifold.solve(bodies);
            if manifold.is_touching() {
                manifold.init_collision(bodies, gravity, dt);
                self.contacts.push(manifold);
            }
        }
        tested
    }

    /// Body ids behind every manifold, in contact order.
    pub fn body_ids(&self, bodies: &[Body]) -> Vec<(BodyId, BodyId)> {
        let id_at = |index: usize| bodies.get(index).map_or(BodyId::UNASSIGNED, |body| body.id);
        self.contacts
            .iter()
            .map(|manifold| (id_at(manifold.a), id_at(manifold.b)))
            .collect()
    }

    /// Points every manifold back at its bodies after the slice was
    /// reshuffled. Manifolds that lost a body are dropped. `ids` comes from
    /// [`CollisionManager::body_ids`] taken before the change.
    pub fn reindex(&mut self, ids: &[(BodyId, BodyId)], bodies: &[Body]) {
        let index_of: HashMap<BodyId, usize> =
            bodies.iter().enumerate().map(|(index, body)| (body.id, index)).collect();

        let mut ids = ids.iter();
        self.contacts.retain_mut(|manifold| {
            let Some((a, b)) = ids.next() else {
                return false;
            };
            match (index_of.get(a), index_of.get(b)) {
                (Some(&a), Some(&b)) => {
                    manifold.a = a;
                    manifold.b = b;
                    true
                }
                _ => false,
            }
        });
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
