//! Pose Model Tests
//!
//! Tests for:
//! - Bone world transform propagation (root placement, parent chains)
//! - Skeleton data validation
//! - Setup pose reset (bones, slots, draw order)
//! - Draw order permutation checks
//! - Skin lookup and skin switching
//! - Attachment changes and deform invalidation
//! - Weighted and unweighted vertex skinning

use std::sync::Arc;

use glam::Vec2;
use smallvec::smallvec;

use skeleton_batch::attachment::{
    Attachment, BoneWeight, ClippingAttachment, MeshAttachment, RegionAttachment, VertexData,
};
use skeleton_batch::color::Color;
use skeleton_batch::errors::SkeletonError;
use skeleton_batch::pose::{BoneData, Skeleton, SkeletonData, Skin, SlotData};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec2_approx(a: Vec2, b: Vec2) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

// ============================================================================
// Helpers
// ============================================================================

/// root (10, 20) rotated 90° → child (5, 0); one slot "body" on the child.
fn chain_data() -> SkeletonData {
    let mut data = SkeletonData::new("chain");
    data.bones.push(BoneData::new("root", None).with_translation(10.0, 20.0).with_rotation(90.0));
    data.bones.push(BoneData::new("child", Some(0)).with_translation(5.0, 0.0));
    data.slots.push(SlotData::new("body", 1).with_attachment("body"));
    data.default_skin.set_attachment(0, "body", RegionAttachment::new("body", 10.0, 10.0));
    data.default_skin.set_attachment(0, "alt", RegionAttachment::new("alt", 4.0, 4.0));
    data
}

fn region_width(skeleton: &Skeleton, slot: &str) -> Option<f32> {
    match skeleton.find_slot(slot)?.attachment()?.as_ref() {
        Attachment::Region(region) => Some(region.width),
        _ => None,
    }
}

/// Default skin width 10, "red" width 20, "blue" width 30, all named "body".
fn skinned_data() -> SkeletonData {
    let mut data = SkeletonData::new("skinned");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("body", 0).with_attachment("body"));
    data.default_skin.set_attachment(0, "body", RegionAttachment::new("body", 10.0, 10.0));

    for (name, width) in [("red", 20.0), ("blue", 30.0)] {
        let mut skin = Skin::new(name);
        skin.set_attachment(0, "body", RegionAttachment::new("body", width, 10.0));
        data.skins.push(skin);
    }
    data
}

// ============================================================================
// World Transforms
// ============================================================================

#[test]
fn world_transform_follows_parent_chain() {
    let skeleton = Skeleton::new(Arc::new(chain_data())).unwrap();

    let root = skeleton.find_bone("root").unwrap();
    let child = skeleton.find_bone("child").unwrap();
    assert!(vec2_approx(root.world_position(), Vec2::new(10.0, 20.0)));
    // Parent rotation turns the child's +x offset into +y.
    assert!(vec2_approx(child.world_position(), Vec2::new(10.0, 25.0)));
    assert!(vec2_approx(child.local_to_world(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 26.0)));
}

#[test]
fn world_transform_applies_skeleton_placement() {
    let mut skeleton = Skeleton::new(Arc::new(chain_data())).unwrap();
    skeleton.x = 1.0;
    skeleton.y = 2.0;
    skeleton.scale_x = 2.0;
    skeleton.update_world_transform();

    let root = skeleton.find_bone("root").unwrap();
    assert!(vec2_approx(root.world_position(), Vec2::new(21.0, 22.0)));
}

#[test]
fn world_transform_is_stale_until_updated() {
    let mut skeleton = Skeleton::new(Arc::new(chain_data())).unwrap();
    skeleton.find_bone_mut("root").unwrap().x = 100.0;

    let root = skeleton.find_bone("root").unwrap();
    assert!(vec2_approx(root.world_position(), Vec2::new(10.0, 20.0)));

    skeleton.update_world_transform();
    let root = skeleton.find_bone("root").unwrap();
    assert!(vec2_approx(root.world_position(), Vec2::new(100.0, 20.0)));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn child_before_parent_is_rejected() {
    let mut data = SkeletonData::new("bad");
    data.bones.push(BoneData::new("child", Some(1)));
    data.bones.push(BoneData::new("root", None));

    let err = Skeleton::new(Arc::new(data)).unwrap_err();
    assert!(matches!(err, SkeletonError::InvalidSkeleton(_)));
}

#[test]
fn slot_on_missing_bone_is_rejected() {
    let mut data = SkeletonData::new("bad");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("body", 3));

    let err = Skeleton::new(Arc::new(data)).unwrap_err();
    assert!(matches!(err, SkeletonError::IndexOutOfBounds { index: 3, .. }));
}

#[test]
fn weighted_mesh_on_missing_bone_is_rejected() {
    let mut data = SkeletonData::new("bad");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("body", 0));

    let vertices = VertexData::Weighted(vec![
        smallvec![BoneWeight { bone: 0, position: Vec2::ZERO, weight: 1.0 }],
        smallvec![BoneWeight { bone: 5, position: Vec2::X, weight: 1.0 }],
        smallvec![BoneWeight { bone: 0, position: Vec2::Y, weight: 1.0 }],
    ]);
    let mesh = MeshAttachment::new("body", vertices, vec![0.0; 6], vec![0, 1, 2]).unwrap();
    let mut skin = Skin::new("alt");
    skin.set_attachment(0, "body", mesh);
    data.skins.push(skin);

    let err = Skeleton::new(Arc::new(data)).unwrap_err();
    assert!(matches!(err, SkeletonError::IndexOutOfBounds { index: 5, .. }));
}

#[test]
fn clip_end_slot_out_of_range_is_rejected() {
    let mut data = SkeletonData::new("bad");
    data.bones.push(BoneData::new("root", None));
    data.slots.push(SlotData::new("mask", 0));
    data.slots.push(SlotData::new("body", 0));

    let polygon = VertexData::Unweighted(vec![Vec2::ZERO, Vec2::X, Vec2::Y]);
    data.default_skin
        .set_attachment(0, "mask", ClippingAttachment::new("mask", polygon.clone(), Some(2)));
    let err = Skeleton::new(Arc::new(data.clone())).unwrap_err();
    assert!(matches!(err, SkeletonError::IndexOutOfBounds { index: 2, .. }));

    data.default_skin
        .set_attachment(0, "mask", ClippingAttachment::new("mask", polygon, Some(1)));
    assert!(Skeleton::new(Arc::new(data)).is_ok());
}

// ============================================================================
// Setup Pose & Draw Order
// ============================================================================

#[test]
fn setup_pose_restores_bones_and_slots() {
    let mut skeleton = Skeleton::new(Arc::new(chain_data())).unwrap();
    skeleton.find_bone_mut("child").unwrap().rotation = 45.0;
    skeleton.find_slot_mut("body").unwrap().color = Color::new(1.0, 0.0, 0.0, 0.5);
    skeleton.set_attachment("body", None).unwrap();

    skeleton.set_to_setup_pose();

    assert!(approx(skeleton.find_bone("child").unwrap().rotation, 0.0));
    assert_eq!(skeleton.find_slot("body").unwrap().color, Color::WHITE);
    assert_eq!(region_width(&skeleton, "body"), Some(10.0));
}

#[test]
fn set_draw_order_requires_permutation() {
    let mut data = SkeletonData::new("order");
    data.bones.push(BoneData::new("root", None));
    for name in ["a", "b", "c"] {
        data.slots.push(SlotData::new(name, 0));
    }
    let mut skeleton = Skeleton::new(Arc::new(data)).unwrap();

    skeleton.set_draw_order(vec![2, 0, 1]).unwrap();
    assert_eq!(skeleton.draw_order(), &[2, 0, 1]);

    assert!(matches!(
        skeleton.set_draw_order(vec![0, 1]),
        Err(SkeletonError::InvalidDrawOrder(_))
    ));
    assert!(matches!(
        skeleton.set_draw_order(vec![0, 0, 1]),
        Err(SkeletonError::InvalidDrawOrder(_))
    ));
    assert!(matches!(
        skeleton.set_draw_order(vec![0, 1, 7]),
        Err(SkeletonError::IndexOutOfBounds { index: 7, .. })
    ));
    // Failed updates leave the order untouched.
    assert_eq!(skeleton.draw_order(), &[2, 0, 1]);

    skeleton.set_slots_to_setup_pose();
    assert_eq!(skeleton.draw_order(), &[0, 1, 2]);
}

// ============================================================================
// Skins & Attachments
// ============================================================================

#[test]
fn setup_attachment_comes_from_default_skin() {
    let skeleton = Skeleton::new(Arc::new(skinned_data())).unwrap();
    assert!(skeleton.skin().is_none());
    assert_eq!(region_width(&skeleton, "body"), Some(10.0));
}

#[test]
fn set_skin_swaps_visible_attachments() {
    let mut skeleton = Skeleton::new(Arc::new(skinned_data())).unwrap();

    skeleton.set_skin(Some("red")).unwrap();
    assert_eq!(skeleton.skin().map(|s| s.name.as_str()), Some("red"));
    assert_eq!(region_width(&skeleton, "body"), Some(20.0));

    skeleton.set_skin(Some("blue")).unwrap();
    assert_eq!(region_width(&skeleton, "body"), Some(30.0));
}

#[test]
fn set_skin_keeps_attachments_from_other_sources() {
    let mut skeleton = Skeleton::new(Arc::new(skinned_data())).unwrap();
    skeleton.set_skin(Some("red")).unwrap();
    skeleton.set_attachment("body", None).unwrap();

    skeleton.set_skin(Some("blue")).unwrap();
    assert!(skeleton.find_slot("body").unwrap().attachment().is_none());
}

#[test]
fn unknown_names_are_errors() {
    let mut skeleton = Skeleton::new(Arc::new(skinned_data())).unwrap();

    assert!(matches!(skeleton.set_skin(Some("green")), Err(SkeletonError::SkinNotFound(_))));
    assert!(matches!(
        skeleton.set_attachment("missing", None),
        Err(SkeletonError::SlotNotFound(_))
    ));
    assert!(matches!(
        skeleton.set_attachment("body", Some("hat")),
        Err(SkeletonError::AttachmentNotFound { .. })
    ));
}

#[test]
fn active_skin_shadows_default_skin() {
    let mut skeleton = Skeleton::new(Arc::new(skinned_data())).unwrap();
    let default = skeleton.get_attachment(0, "body").unwrap();
    skeleton.set_skin(Some("red")).unwrap();
    let red = skeleton.get_attachment(0, "body").unwrap();

    assert!(!Arc::ptr_eq(&default, &red));
    assert!(skeleton.get_attachment(0, "hat").is_none());
}

#[test]
fn attachment_change_clears_deform() {
    let mut skeleton = Skeleton::new(Arc::new(chain_data())).unwrap();
    skeleton.find_slot_mut("body").unwrap().deform = vec![1.0; 8];

    // Same attachment keeps the deform.
    skeleton.set_attachment("body", Some("body")).unwrap();
    assert_eq!(skeleton.find_slot("body").unwrap().deform.len(), 8);

    skeleton.set_attachment("body", Some("alt")).unwrap();
    assert!(skeleton.find_slot("body").unwrap().deform.is_empty());
}

// ============================================================================
// Vertex Skinning
// ============================================================================

fn two_bone_skeleton() -> Skeleton {
    let mut data = SkeletonData::new("two");
    data.bones.push(BoneData::new("a", None));
    data.bones.push(BoneData::new("b", None).with_translation(10.0, 0.0));
    data.slots.push(SlotData::new("mesh", 0));
    Skeleton::new(Arc::new(data)).unwrap()
}

#[test]
fn weighted_vertices_blend_bone_transforms() {
    let skeleton = two_bone_skeleton();
    let vertices = VertexData::Weighted(vec![
        smallvec![
            BoneWeight { bone: 0, position: Vec2::ZERO, weight: 0.5 },
            BoneWeight { bone: 1, position: Vec2::ZERO, weight: 0.5 },
        ],
        smallvec![BoneWeight { bone: 1, position: Vec2::new(0.0, 3.0), weight: 1.0 }],
    ]);

    let mut out = vec![0.0; vertices.world_vertices_length()];
    vertices.compute_world_vertices(skeleton.bones(), &skeleton.slots()[0], &mut out);

    assert!(vec2_approx(Vec2::new(out[0], out[1]), Vec2::new(5.0, 0.0)));
    assert!(vec2_approx(Vec2::new(out[2], out[3]), Vec2::new(10.0, 3.0)));
    assert_eq!(vertices.max_bone(), Some(1));
}

#[test]
fn weighted_deform_offsets_each_influence() {
    let mut skeleton = two_bone_skeleton();
    skeleton.slots_mut()[0].deform = vec![0.0, 2.0];
    let vertices = VertexData::Weighted(vec![smallvec![BoneWeight {
        bone: 1,
        position: Vec2::ZERO,
        weight: 1.0,
    }]]);

    let mut out = vec![0.0; 2];
    vertices.compute_world_vertices(skeleton.bones(), &skeleton.slots()[0], &mut out);
    assert!(vec2_approx(Vec2::new(out[0], out[1]), Vec2::new(10.0, 2.0)));
}

#[test]
fn unweighted_deform_replaces_positions() {
    let mut skeleton = two_bone_skeleton();
    let vertices = VertexData::Unweighted(vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)]);

    let mut out = vec![0.0; 4];
    vertices.compute_world_vertices(skeleton.bones(), &skeleton.slots()[0], &mut out);
    assert_eq!(out, vec![1.0, 1.0, 2.0, 2.0]);

    // A deform buffer too short for every vertex is ignored.
    skeleton.slots_mut()[0].deform = vec![5.0, 5.0];
    vertices.compute_world_vertices(skeleton.bones(), &skeleton.slots()[0], &mut out);
    assert_eq!(out, vec![1.0, 1.0, 2.0, 2.0]);

    skeleton.slots_mut()[0].deform = vec![5.0, 5.0, 6.0, 6.0];
    vertices.compute_world_vertices(skeleton.bones(), &skeleton.slots()[0], &mut out);
    assert_eq!(out, vec![5.0, 5.0, 6.0, 6.0]);
}
