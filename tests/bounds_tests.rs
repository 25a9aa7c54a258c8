//! Bounds and Host Node Tests
//!
//! Tests for:
//! - Rect helpers
//! - compute_bounds over regions and meshes (scale, position, empty skeletons)
//! - SkeletonNode update, layout queries and pass-throughs

use std::sync::Arc;

use glam::Vec2;

use skeleton_batch::attachment::{ClippingAttachment, MeshAttachment, RegionAttachment, VertexData};
use skeleton_batch::bounds::{Rect, compute_bounds};
use skeleton_batch::errors::SkeletonError;
use skeleton_batch::node::SkeletonNode;
use skeleton_batch::pose::{BoneData, Skeleton, SkeletonData, SlotData};
use skeleton_batch::settings::RenderSettings;
use skeleton_batch::texture::{TextureRegion, TextureRegistry};

const EPSILON: f32 = 1e-4;

fn vec2_approx(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Helpers
// ============================================================================

/// A 10 × 20 region at the origin, a 4-vertex mesh spanning (20, 0)..(30, 5),
/// and a large clipping mask that must not affect the bounds.
fn scene_data() -> SkeletonData {
    let mut registry = TextureRegistry::new();
    let page = TextureRegion::full(registry.insert("page", 64, 64));

    let mut data = SkeletonData::new("scene");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("body", 0).with_attachment("body"));
    data.slots.push(SlotData::new("tail", 0).with_attachment("tail"));
    data.slots.push(SlotData::new("mask", 0).with_attachment("mask"));

    data.default_skin
        .set_attachment(0, "body", RegionAttachment::new("body", 10.0, 20.0).with_region(page));

    let tail = VertexData::Unweighted(vec![
        Vec2::new(20.0, 0.0),
        Vec2::new(30.0, 0.0),
        Vec2::new(30.0, 5.0),
        Vec2::new(20.0, 5.0),
    ]);
    let mesh = MeshAttachment::new("tail", tail, vec![0.0; 8], vec![0, 1, 2, 2, 3, 0])
        .unwrap()
        .with_region(page);
    data.default_skin.set_attachment(1, "tail", mesh);

    let mask = VertexData::Unweighted(vec![
        Vec2::new(-100.0, -100.0),
        Vec2::new(100.0, -100.0),
        Vec2::new(100.0, 100.0),
    ]);
    data.default_skin
        .set_attachment(2, "mask", ClippingAttachment::new("mask", mask, None));
    data
}

// ============================================================================
// Rect
// ============================================================================

#[test]
fn rect_min_max() {
    let rect = Rect::from_min_max(Vec2::new(-1.0, 2.0), Vec2::new(3.0, 4.0));
    assert_eq!(rect.origin, Vec2::new(-1.0, 2.0));
    assert_eq!(rect.size, Vec2::new(4.0, 2.0));
    assert_eq!(rect.max(), Vec2::new(3.0, 4.0));
    assert!(!rect.is_empty());
    assert!(rect.contains(Vec2::new(0.0, 3.0)));
    assert!(!rect.contains(Vec2::new(5.0, 3.0)));
}

// ============================================================================
// compute_bounds
// ============================================================================

#[test]
fn bounds_cover_regions_and_meshes() {
    let skeleton = Skeleton::new(Arc::new(scene_data())).unwrap();
    let bounds = compute_bounds(&skeleton, Vec2::ONE, Vec2::ZERO);

    assert!(vec2_approx(bounds.min(), Vec2::new(-5.0, -10.0)));
    assert!(vec2_approx(bounds.max(), Vec2::new(30.0, 10.0)));
}

#[test]
fn bounds_apply_scale_then_position() {
    let skeleton = Skeleton::new(Arc::new(scene_data())).unwrap();
    let bounds = compute_bounds(&skeleton, Vec2::new(2.0, 0.5), Vec2::new(100.0, 50.0));

    assert!(vec2_approx(bounds.origin, Vec2::new(90.0, 45.0)));
    assert!(vec2_approx(bounds.size, Vec2::new(70.0, 10.0)));
}

#[test]
fn bounds_ignore_draw_order_and_hidden_slots() {
    let mut skeleton = Skeleton::new(Arc::new(scene_data())).unwrap();
    skeleton.set_draw_order(vec![2, 1, 0]).unwrap();
    let reordered = compute_bounds(&skeleton, Vec2::ONE, Vec2::ZERO);
    assert!(vec2_approx(reordered.max(), Vec2::new(30.0, 10.0)));

    skeleton.set_attachment("tail", None).unwrap();
    let bounds = compute_bounds(&skeleton, Vec2::ONE, Vec2::ZERO);
    assert!(vec2_approx(bounds.max(), Vec2::new(5.0, 10.0)));
}

#[test]
fn bounds_of_empty_skeleton_are_empty() {
    let mut data = SkeletonData::new("empty");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("nothing", 0));
    let skeleton = Skeleton::new(Arc::new(data)).unwrap();

    let bounds = compute_bounds(&skeleton, Vec2::ONE, Vec2::ZERO);
    assert!(bounds.is_empty());
    assert!(!bounds.contains(Vec2::ZERO));
}

// ============================================================================
// SkeletonNode
// ============================================================================

#[test]
fn node_update_builds_geometry() -> anyhow::Result<()> {
    let mut node = SkeletonNode::from_data(Arc::new(scene_data()), RenderSettings::default())?;
    assert!(node.geometry().is_empty());

    node.update(1.0 / 60.0)?;
    // The mask is drawn last, so both renderables are unclipped.
    assert_eq!(node.geometry().len(), 2);
    assert_eq!(node.geometry().vertex_count(), 8);
    Ok(())
}

#[test]
fn node_layout_uses_node_transform() {
    let mut node = SkeletonNode::from_data(Arc::new(scene_data()), RenderSettings::default()).unwrap();
    node.position = Vec2::new(10.0, 10.0);
    node.scale = Vec2::splat(2.0);

    let bounds = node.bounding_box();
    assert!(vec2_approx(bounds.origin, Vec2::new(0.0, -10.0)));
    assert!(vec2_approx(node.content_size(), Vec2::new(70.0, 40.0)));
}

#[test]
fn node_content_size_of_empty_skeleton_is_zero() {
    let mut data = SkeletonData::new("empty");
    data.bones.push(BoneData::new("root", None));
    let node = SkeletonNode::from_data(Arc::new(data), RenderSettings::default()).unwrap();

    assert!(node.bounding_box().is_empty());
    assert_eq!(node.content_size(), Vec2::ZERO);
}

#[test]
fn node_pass_throughs() {
    let mut node = SkeletonNode::from_data(Arc::new(scene_data()), RenderSettings::default()).unwrap();

    assert!(node.find_bone("root").is_some());
    assert!(node.find_slot("tail").is_some());
    assert_eq!(node.get_attachment("tail", "tail").unwrap().name(), "tail");
    assert!(matches!(
        node.get_attachment("tail", "body"),
        Err(SkeletonError::AttachmentNotFound { .. })
    ));
    assert!(matches!(node.set_skin(Some("missing")), Err(SkeletonError::SkinNotFound(_))));

    node.set_attachment("tail", None).unwrap();
    node.update(0.0).unwrap();
    assert_eq!(node.geometry().len(), 1);

    node.set_slots_to_setup_pose();
    node.update(0.0).unwrap();
    assert_eq!(node.geometry().len(), 2);

    node.skeleton_mut().find_bone_mut("root").unwrap().x = 5.0;
    node.update_world_transform();
    assert!(vec2_approx(node.bounding_box().min(), Vec2::new(0.0, -10.0)));

    node.set_to_setup_pose();
    node.update_world_transform();
    assert!(vec2_approx(node.bounding_box().min(), Vec2::new(-5.0, -10.0)));
}

#[test]
fn node_premultiplied_toggle() {
    let mut node = SkeletonNode::from_data(Arc::new(scene_data()), RenderSettings::default()).unwrap();
    assert!(!node.premultiplied_alpha());

    node.set_premultiplied_alpha(true);
    assert!(node.premultiplied_alpha());
    assert!(node.builder().premultiplied_alpha());
}
