use impulse2d::{
    config::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH},
    *,
};

fn ball(x: f64, y: f64, radius: f64) -> Body {
    Body::circle(Vector2::new(x, y), radius, BodyOptions::dynamic()).unwrap()
}

fn ball_on(layer: i32, x: f64, y: f64) -> Body {
    Body::circle(Vector2::new(x, y), 5.0, BodyOptions::dynamic().on_layer(layer)).unwrap()
}

fn weightless() -> World {
    World::new(WorldConfig::weightless()).unwrap()
}

#[test]
fn bodies_fall_under_gravity() {
    let mut world = World::default();
    let id = world.add(ball(400.0, 100.0, 10.0));

    world.step();

    let body = world.body(id).expect("body should exist");
    assert!(body.position.y > 100.0, "body should start falling, y = {}", body.position.y);
    assert!(body.velocity.y > 0.0);
    assert_eq!(body.force, Vector2::ZERO);
}

#[test]
fn static_bodies_stay_put() {
    let mut world = World::default();
    let slab = Vector2::new(300.0, 20.0);
    let ground =
        world.add(Body::rect(Vector2::new(400.0, 500.0), slab, BodyOptions::fixed()).unwrap());
    let pillar =
        world.add(Body::circle(Vector2::new(200.0, 300.0), 15.0, BodyOptions::fixed()).unwrap());
    for i in 0..5 {
        world.add(ball(180.0 + i as f64 * 12.0, 250.0, 8.0));
    }
    let crate_size = Vector2::splat(20.0);
    world.add(Body::rect(Vector2::new(400.0, 440.0), crate_size, BodyOptions::dynamic()).unwrap());

    for _ in 0..120 {
        world.step();
        for id in [ground, pillar] {
            let body = world.body(id).unwrap();
            assert_eq!(body.velocity, Vector2::ZERO);
            assert_eq!(body.angular_velocity, 0.0);
        }
    }
    assert_eq!(world.body(ground).unwrap().position, Vector2::new(400.0, 500.0));
    assert_eq!(world.body(pillar).unwrap().position, Vector2::new(200.0, 300.0));
}

#[test]
fn far_away_body_is_pruned_after_one_step() {
    let mut world = World::default();
    let stays = world.add(ball(400.0, 300.0, 5.0));
    let leaves = world.add(ball(3.0 * DEFAULT_SCREEN_WIDTH, 300.0, 5.0));
    assert_eq!(world.len(), 2);

    world.step();

    assert_eq!(world.len(), 1);
    assert!(world.body(leaves).is_none());
    assert!(world.body(stays).is_some());
    assert_eq!(world.last_profile().pruned_count, 1);
}

#[test]
fn pruning_keeps_contacts_of_surviving_bodies() {
    let mut world = weightless();
    world.add(ball(3.0 * DEFAULT_SCREEN_WIDTH, 300.0, 5.0));
    world.add(ball(3.0 * DEFAULT_SCREEN_WIDTH, 305.0, 5.0));
    let left = world.add(ball(400.0, 300.0, 10.0));
    let right = world.add(ball(415.0, 300.0, 10.0));

    world.step();

    assert_eq!(world.len(), 2);
    assert_eq!(world.last_profile().pruned_count, 2);
    assert_eq!(world.contacts().len(), 1);
    assert_eq!(world.last_profile().contact_count, 1);

    let contact = &world.contacts()[0];
    let bodies = world.bodies();
    let (a, b) = (&bodies[contact.a], &bodies[contact.b]);
    let mut pair = [a.id(), b.id()];
    pair.sort();
    assert_eq!(pair, [left, right]);
    assert!(contact.normal.dot(b.position - a.position) > 0.0);
}

#[test]
fn body_mut_cannot_break_layer_order() {
    let mut world = weightless();
    let a = world.add(ball_on(1, 100.0, 100.0));
    world.add(ball_on(2, 200.0, 100.0));
    world.add(ball_on(3, 300.0, 100.0));

    let body = world.body_mut(a).unwrap();
    body.position.x += 5.0;
    body.set_static(true).unwrap();

    assert!(world.set_layer(a, 99));
    world.add(ball_on(0, 400.0, 100.0));

    let layers: Vec<i32> = world.bodies().iter().map(|b| b.layer()).collect();
    assert_eq!(layers, vec![0, 2, 3, 99]);
    assert_eq!(world.group().layer_count(1), 0);
    assert_eq!(world.group().layer_count(99), 1);

    let body = world.body(a).unwrap();
    assert!(body.is_static());
    assert_eq!(body.inv_mass(), 0.0);
    assert_eq!(body.position.x, 105.0);
}

#[test]
fn top_edge_is_only_pruned_when_requested() {
    let above = -2.0 * DEFAULT_SCREEN_HEIGHT;

    let mut world = weightless();
    world.add(ball(400.0, above, 5.0));
    world.step();
    assert_eq!(world.len(), 1);

    let mut config = WorldConfig::weightless();
    config.bounds.check_top = true;
    let mut world = World::new(config).unwrap();
    world.add(ball(400.0, above, 5.0));
    world.step();
    assert!(world.is_empty());
}

#[test]
fn bodies_are_exposed_in_layer_order() {
    let mut world = weightless();
    for (i, layer) in [4, -1, 9, 0, 4, 2].into_iter().enumerate() {
        world.add(ball_on(layer, 50.0 + 60.0 * i as f64, 100.0));
    }
    world.step();

    let layers: Vec<i32> = world.bodies().iter().map(|b| b.layer()).collect();
    assert_eq!(layers, vec![-1, 0, 2, 4, 4, 9]);

    let first = world.bodies()[0].id();
    assert!(world.remove_at(0).is_some());
    assert!(world.body(first).is_none());
    assert!(world.remove_at(99).is_none());
}

#[test]
fn steering_drags_a_body_toward_the_pointer() {
    let mut world = weightless();
    let id = world.add(ball(100.0, 100.0, 10.0));
    let target = Vector2::new(300.0, 200.0);

    let start = world.body(id).unwrap().position.distance(target);
    for _ in 0..30 {
        world.steer_body(id, target, 1.0e6);
        world.step();
    }
    let end = world.body(id).unwrap().position.distance(target);
    assert!(end < start);
}

/// Exhaustive pairs, minus any pair whose bounding circles are apart.
struct BoundingCirclePairs {
    inner: ExhaustivePairs,
}

impl PairSource for BoundingCirclePairs {
    fn name(&self) -> &str {
        "bounding_circles"
    }

    fn collect_pairs(&mut self, bodies: &[Body], pairs: &mut Vec<(usize, usize)>) {
        self.inner.collect_pairs(bodies, pairs);
        pairs.retain(|&(i, j)| {
            let (a, b) = (&bodies[i], &bodies[j]);
            let reach = a.shape().bounding_radius() + b.shape().bounding_radius();
            a.position.distance_squared(b.position) <= reach * reach
        });
    }
}

#[test]
fn custom_pair_source_sees_the_same_contacts() {
    let build = || {
        let mut world = weightless();
        for i in 0..6 {
            world.add(ball(100.0 + 15.0 * i as f64, 300.0, 10.0));
        }
        let half = Vector2::splat(10.0);
        world.add(Body::rect(Vector2::new(600.0, 300.0), half, BodyOptions::dynamic()).unwrap());
        world
    };

    let mut exhaustive = build();
    let mut filtered = build();
    filtered.set_pair_source(BoundingCirclePairs { inner: ExhaustivePairs::new() });
    assert_eq!(filtered.pair_source_name(), "bounding_circles");

    exhaustive.step();
    filtered.step();
    assert_eq!(exhaustive.contacts().len(), 5);
    assert_eq!(filtered.contacts().len(), 5);
    assert!(filtered.last_profile().pair_count < exhaustive.last_profile().pair_count);
}
