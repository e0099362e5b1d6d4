//! Animation Coordinator Tests
//!
//! Tests for:
//! - attach_animation: wrapping, target binding, stop-before-install ordering
//! - append_animation: overwrite without stopping, idempotence with the same group
//! - apply_animation / apply_animations_to_children: animated and immediate paths
//! - detach_animation and tick-driven completion

use stagehand::prelude::*;

const EPSILON: f32 = 1e-5;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> (Scene, AnimationCoordinator) {
    init_logger();
    (Scene::new(), AnimationCoordinator::new())
}

fn slide(x: f32) -> AnimationDescriptor {
    AnimationDescriptor::position(Vec3::new(x, 0.0, 0.0), 0.5).unwrap()
}

fn fade(to: f32) -> AnimationDescriptor {
    AnimationDescriptor::opacity(to, 0.25).unwrap()
}

// ============================================================================
// attach_animation
// ============================================================================

#[test]
fn attach_single_descriptor_wraps_and_binds() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    let desc = slide(3.0);

    coordinator.attach_animation(&mut scene, node, desc.clone(), "move");

    let cached = scene.cached_animations(node).unwrap();
    let group = &cached["move"];
    assert_eq!(group.animations(), &[desc]);
    assert_eq!(group.target(), Some(node));
}

#[test]
fn attach_stops_previous_before_install() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, slide(1.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", true);
    let first = scene.cached_animations(node).unwrap()["move"].clone();
    assert!(first.is_running());
    coordinator.drain_events().for_each(drop);

    coordinator.attach_animation(&mut scene, node, slide(2.0), "move");
    let second = scene.cached_animations(node).unwrap()["move"].id();

    assert!(!first.is_running(), "Superseded group must be stopped");
    let events: Vec<AnimationEvent> = coordinator.drain_events().collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        AnimationEvent::Stopped { group, key, .. } if *group == first.id() && key == "move"
    ));
    assert!(matches!(
        &events[1],
        AnimationEvent::Installed { group, .. } if *group == second
    ));
}

#[test]
fn attach_on_empty_key_stops_nothing() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, fade(0.0), "fade");

    let events: Vec<AnimationEvent> = coordinator.drain_events().collect();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], AnimationEvent::Installed { .. }));
}

#[test]
fn attach_prebuilt_group_binds_target() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    let group = AnimationGroup::new([fade(0.0), slide(1.0)]);
    let id = group.id();
    assert!(group.target().is_none());

    coordinator.attach_animation(&mut scene, node, group, "combo");

    let installed = &scene.cached_animations(node).unwrap()["combo"];
    assert_eq!(installed.id(), id);
    assert_eq!(installed.target(), Some(node));
    assert_eq!(installed.animations().len(), 2);
}

#[test]
fn attach_group_copied_from_another_node_settles_on_its_new_node() {
    let (mut scene, mut coordinator) = setup();
    let a = scene.create_node();
    let b = scene.create_node();

    coordinator.attach_animation(&mut scene, a, fade(0.0), "fade");
    coordinator.apply_animation(&mut scene, a, "fade", true);
    let copy = scene.cached_animations(a).unwrap()["fade"].clone();

    coordinator.attach_animation(&mut scene, b, copy, "fade");

    let on_b = &scene.cached_animations(b).unwrap()["fade"];
    assert_eq!(on_b.target(), Some(b));
    assert!(!on_b.is_running(), "The copy must not inherit a's loop");
    assert!(scene.cached_animations(a).unwrap()["fade"].is_running());

    coordinator.apply_animation(&mut scene, b, "fade", true);
    assert_eq!(coordinator.running_count(), 2);
    assert_eq!(coordinator.tick(&mut scene, 0.25), 2);

    assert!(scene.get_node(a).unwrap().opacity.abs() < EPSILON);
    assert!(scene.get_node(b).unwrap().opacity.abs() < EPSILON);
    let finished: Vec<NodeHandle> = coordinator
        .events()
        .filter(|e| matches!(e, AnimationEvent::Finished { .. }))
        .map(AnimationEvent::node)
        .collect();
    assert_eq!(finished.len(), 2);
    assert!(finished.contains(&a) && finished.contains(&b));
}

#[test]
fn move_move_fade_scenario() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    let desc_a = slide(1.0);
    let desc_b = slide(2.0);

    coordinator.attach_animation(&mut scene, node, desc_a.clone(), "move");
    assert_eq!(scene.cached_animations(node).unwrap()["move"].animations(), &[desc_a]);
    let group_a = scene.cached_animations(node).unwrap()["move"].id();

    coordinator.attach_animation(&mut scene, node, desc_b.clone(), "move");
    let stops: Vec<_> = coordinator
        .events()
        .filter(|e| matches!(e, AnimationEvent::Stopped { .. }))
        .collect();
    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].group(), Some(group_a));
    assert_eq!(scene.cached_animations(node).unwrap()["move"].animations(), &[desc_b.clone()]);

    let group_c = AnimationGroup::new([fade(0.2)]);
    coordinator.attach_animation(&mut scene, node, group_c, "fade");

    let cached = scene.cached_animations(node).unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached["move"].animations(), &[desc_b]);
    assert_eq!(
        coordinator
            .events()
            .filter(|e| matches!(e, AnimationEvent::Stopped { .. }))
            .count(),
        1,
        "Attaching a new key must not stop other keys"
    );
}

// ============================================================================
// append_animation
// ============================================================================

#[test]
fn append_overwrites_without_stopping() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.append_animation(&mut scene, node, slide(1.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", true);
    let first = scene.cached_animations(node).unwrap()["move"].clone();

    coordinator.append_animation(&mut scene, node, slide(2.0), "move");

    assert!(first.is_running(), "append must not stop the displaced group");
    assert_ne!(scene.cached_animations(node).unwrap()["move"].id(), first.id());
    assert!(
        !coordinator
            .events()
            .any(|e| matches!(e, AnimationEvent::Stopped { .. }))
    );

    // The displaced loop runs out but has no cached group left to settle.
    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert!(!first.is_running());
    assert_eq!(coordinator.running_count(), 0);
    assert!(scene.get_node(node).unwrap().transform.position.x.abs() < EPSILON);
    assert!(
        !coordinator
            .events()
            .any(|e| matches!(e, AnimationEvent::Finished { .. }))
    );
}

#[test]
fn append_same_group_twice_is_idempotent() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    let group = AnimationGroup::new([fade(0.5)]);
    let id = group.id();

    coordinator.append_animation(&mut scene, node, group.clone(), "fade");
    coordinator.append_animation(&mut scene, node, group, "fade");

    let cached = scene.cached_animations(node).unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached["fade"].id(), id);
    assert_eq!(cached["fade"].target(), Some(node));
}

#[test]
fn append_initializes_registry() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    assert!(scene.cached_animations(node).is_none());

    coordinator.append_animation(&mut scene, node, AnimationGroup::empty(), "idle");

    let registry = scene.animation_registry(node).unwrap();
    assert!(registry.contains_key("idle"));
    assert!(registry.is_bound_to(node));
}

// ============================================================================
// apply_animation / apply_animations_to_children
// ============================================================================

#[test]
fn apply_immediate_commits_final_values() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    let group = AnimationGroup::new([
        slide(4.0),
        fade(0.25),
        AnimationDescriptor::scale(Vec3::splat(2.0), 1.0).unwrap(),
    ]);
    coordinator.attach_animation(&mut scene, node, group, "enter");
    coordinator.apply_animation(&mut scene, node, "enter", false);

    let n = scene.get_node(node).unwrap();
    assert!((n.transform.position.x - 4.0).abs() < EPSILON);
    assert!((n.opacity - 0.25).abs() < EPSILON);
    assert!((n.transform.scale - Vec3::splat(2.0)).length() < EPSILON);
    assert!(
        coordinator
            .events()
            .any(|e| matches!(e, AnimationEvent::Finished { key, .. } if key == "enter"))
    );
}

#[test]
fn later_animation_wins_on_same_property() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    let group = AnimationGroup::new([fade(0.1), fade(0.9)]);
    coordinator.attach_animation(&mut scene, node, group, "fade");
    coordinator.apply_animation(&mut scene, node, "fade", false);

    assert!((scene.get_node(node).unwrap().opacity - 0.9).abs() < EPSILON);
}

#[test]
fn apply_animated_settles_on_tick() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, slide(5.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", true);

    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert!(scene.get_node(node).unwrap().transform.position.x.abs() < EPSILON);

    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert_eq!(coordinator.tick(&mut scene, 0.2), 1);
    assert!((scene.get_node(node).unwrap().transform.position.x - 5.0).abs() < EPSILON);
    assert!(!scene.cached_animations(node).unwrap()["move"].is_running());
}

#[test]
fn apply_animated_twice_keeps_single_loop() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, fade(0.0), "fade");
    coordinator.apply_animation(&mut scene, node, "fade", true);
    coordinator.apply_animation(&mut scene, node, "fade", true);

    assert_eq!(coordinator.display_link().subscription_count(), 1);
    let started = coordinator
        .events()
        .filter(|e| matches!(e, AnimationEvent::Started { .. }))
        .count();
    assert_eq!(started, 1);
}

#[test]
fn superseded_group_never_settles() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, slide(1.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", true);
    coordinator.attach_animation(&mut scene, node, slide(9.0), "move");

    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert_eq!(coordinator.tick(&mut scene, 0.2), 0);
    assert!(scene.get_node(node).unwrap().transform.position.x.abs() < EPSILON);
    assert_eq!(coordinator.display_link().subscription_count(), 0);
}

#[test]
fn broadcast_reaches_every_child() {
    let (mut scene, mut coordinator) = setup();
    let root = scene.add_node(Node::new());
    let children: Vec<NodeHandle> = (0..3).map(|_| scene.create_node()).collect();
    for &child in &children {
        scene.attach(child, root);
    }
    coordinator.attach_animation(&mut scene, children[0], slide(1.0), "move");
    coordinator.attach_animation(&mut scene, children[2], slide(2.0), "move");
    coordinator.drain_events().for_each(drop);

    coordinator.apply_animations_to_children(&mut scene, root, "move", true);

    let applied: Vec<(NodeHandle, bool)> = coordinator
        .events()
        .filter_map(|e| match e {
            AnimationEvent::Applied { node, group, animated, .. } => {
                assert!(*animated);
                Some((*node, group.is_some()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        applied,
        vec![(children[0], true), (children[1], false), (children[2], true)]
    );
    assert_eq!(coordinator.display_link().subscription_count(), 2);
}

#[test]
fn broadcast_is_not_recursive() {
    let (mut scene, mut coordinator) = setup();
    let root = scene.add_node(Node::new());
    let child = scene.create_node();
    let grandchild = scene.create_node();
    scene.attach(child, root);
    scene.attach(grandchild, child);
    coordinator.attach_animation(&mut scene, grandchild, fade(0.0), "fade");

    coordinator.apply_animations_to_children(&mut scene, root, "fade", false);

    assert!((scene.get_node(grandchild).unwrap().opacity - 1.0).abs() < EPSILON);
}

// ============================================================================
// detach_animation
// ============================================================================

#[test]
fn detach_stops_and_removes() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    coordinator.attach_animation(&mut scene, node, fade(0.0), "fade");
    coordinator.apply_animation(&mut scene, node, "fade", true);

    let removed = coordinator.detach_animation(&mut scene, node, "fade").unwrap();

    assert!(!removed.is_running());
    assert!(scene.cached_animations(node).unwrap().is_empty());
    assert!(coordinator.detach_animation(&mut scene, node, "fade").is_none());
}

// ============================================================================
// Node destruction
// ============================================================================

#[test]
fn removed_node_target_resolves_to_nothing() {
    let (mut scene, mut coordinator) = setup();
    let node = scene.create_node();
    coordinator.attach_animation(&mut scene, node, slide(1.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", true);
    let group = scene.cached_animations(node).unwrap()["move"].clone();

    scene.remove_node(node);

    let target = group.target().unwrap();
    assert!(scene.get_node(target).is_none());
    assert!(!group.is_running(), "Loops of removed nodes are stopped");
    assert!(!group.stop_update_loop());
    assert_eq!(coordinator.running_count(), 1);

    // Operations on the dead node are silent no-ops.
    coordinator.attach_animation(&mut scene, node, slide(2.0), "move");
    coordinator.apply_animation(&mut scene, node, "move", false);
    assert!(scene.cached_animations(node).is_none());
    assert_eq!(coordinator.tick(&mut scene, 1.0), 0);
    assert_eq!(coordinator.running_count(), 0);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_from_json_drive_coordinator() {
    init_logger();
    let json = serde_json::json!({ "commit_on_finish": false, "event_capacity": 4 }).to_string();
    let settings = AnimationSettings::from_json(&json).unwrap();
    let mut coordinator = AnimationCoordinator::with_settings(settings);
    let mut scene = Scene::new();
    let node = scene.create_node();

    coordinator.attach_animation(&mut scene, node, fade(0.0), "fade");
    coordinator.apply_animation(&mut scene, node, "fade", true);
    assert_eq!(coordinator.tick(&mut scene, 0.25), 1);

    assert!((scene.get_node(node).unwrap().opacity - 1.0).abs() < EPSILON);
    // Installed, Applied, Started, Finished: all fit in a queue of four.
    assert_eq!(coordinator.events().count(), 4);
}
