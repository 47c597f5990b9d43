use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::Utc;
use decal_types::*;
use design_engine::*;

// ── Helper functions ─────────────────────────────────────────────────────

fn new_state() -> DesignState {
    DesignState::new(Arc::new(RegionRegistry::garment_default()))
}

fn preset(id: &str) -> Asset {
    AssetCatalog::default().get_preset(id).unwrap().clone()
}

fn apply(state: &mut DesignState, region: &str, asset: &str) -> Result<RegionId, DesignError> {
    state.select_region(region)?;
    state.select_asset(preset(asset));
    state.apply_staged()
}

// ── Selection ────────────────────────────────────────────────────────────

#[test]
fn new_state_has_one_empty_slot_per_region() {
    let state = new_state();
    assert_eq!(state.applied_logos().len(), 5);
    assert!(state.applied_logos().values().all(Option::is_none));
    assert!(!state.can_submit());
    assert_eq!(state.size_tier(), SizeTier::Medium);
}

#[test]
fn select_region_sets_selection() {
    let mut state = new_state();
    state.select_region("back").unwrap();
    assert_eq!(state.selected_region().unwrap(), "back");
}

#[test]
fn select_unknown_region_fails_and_leaves_state_unchanged() {
    let mut state = new_state();
    state.select_region("chest").unwrap();
    let before = state.snapshot_at(Utc::now());

    let err = state.select_region("nonexistent").unwrap_err();
    assert_eq!(
        err,
        DesignError::UnknownRegion {
            id: "nonexistent".to_string()
        }
    );
    let after = state.snapshot_at(before.taken_at);
    assert_eq!(before, after);
}

#[test]
fn select_asset_stages_without_applying() {
    let mut state = new_state();
    state.select_asset(preset("mahou"));
    assert_eq!(state.selected_asset().unwrap().id.as_str(), "mahou");
    assert!(!state.can_submit());
}

#[test]
fn clear_staged_drops_asset() {
    let mut state = new_state();
    state.select_asset(preset("mahou"));
    state.clear_staged();
    assert!(state.selected_asset().is_none());
}

// ── Application ──────────────────────────────────────────────────────────

#[test]
fn apply_to_left_sleeve() {
    let mut state = new_state();
    state.select_region("sleeve_left").unwrap();
    state.select_asset(preset("mahou"));
    let region = state.apply_staged().unwrap();

    assert_eq!(region, "sleeve_left");
    assert_eq!(state.applied("sleeve_left").unwrap().id.as_str(), "mahou");
    assert!(state.selected_asset().is_none());
    assert!(state.can_submit());
}

#[test]
fn selection_order_does_not_matter() {
    let mut state = new_state();
    state.select_asset(preset("mahou_futbol"));
    state.select_region("back").unwrap();
    state.apply_staged().unwrap();
    assert_eq!(state.applied("back").unwrap().id.as_str(), "mahou_futbol");
}

#[test]
fn apply_without_region_fails() {
    let mut state = new_state();
    state.select_asset(preset("mahou"));
    let err = state.apply_staged().unwrap_err();
    assert_eq!(err, DesignError::NothingStaged { missing: "region" });
    assert!(state.selected_asset().is_some());
}

#[test]
fn apply_without_asset_fails() {
    let mut state = new_state();
    state.select_region("front").unwrap();
    let err = state.apply_staged().unwrap_err();
    assert_eq!(err, DesignError::NothingStaged { missing: "asset" });
    assert!(!state.can_submit());
}

#[test]
fn apply_twice_needs_a_new_stage() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    let err = state.apply_staged().unwrap_err();
    assert!(matches!(err, DesignError::NothingStaged { .. }));
}

#[test]
fn applying_to_occupied_region_replaces_logo() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    apply(&mut state, "back", "mahou_futbol").unwrap();
    assert_eq!(state.applied("back").unwrap().id.as_str(), "mahou_futbol");
}

// ── Conflicts ────────────────────────────────────────────────────────────

#[test]
fn chest_is_blocked_while_front_is_occupied() {
    let mut state = new_state();
    apply(&mut state, "front", "mahou").unwrap();

    let err = apply(&mut state, "chest", "mahou").unwrap_err();
    assert_eq!(
        err,
        DesignError::RegionConflict {
            region: RegionId::new("chest"),
            occupied: RegionId::new("front"),
        }
    );
    assert!(state.applied("chest").is_none());
    // Staged asset survives the rejected application.
    assert!(state.selected_asset().is_some());
}

#[test]
fn front_is_blocked_while_chest_is_occupied() {
    let mut state = new_state();
    apply(&mut state, "chest", "mahou").unwrap();
    let err = apply(&mut state, "front", "mahou_futbol").unwrap_err();
    assert!(matches!(err, DesignError::RegionConflict { .. }));
    assert!(state.applied("front").is_none());
}

#[test]
fn conflict_clears_after_removal() {
    let mut state = new_state();
    apply(&mut state, "front", "mahou").unwrap();
    assert!(!state.is_region_available("chest"));

    state.remove_applied("front").unwrap();
    assert!(state.is_region_available("chest"));
    apply(&mut state, "chest", "mahou").unwrap();
}

#[test]
fn region_availability_reports_blockers() {
    let mut state = new_state();
    apply(&mut state, "chest", "mahou").unwrap();

    let availability = state.region_availability();
    assert_eq!(availability.len(), 5);
    let front = availability.iter().find(|a| a.region == "front").unwrap();
    assert!(!front.available);
    assert_eq!(front.blocked_by.as_ref().unwrap(), "chest");
    let chest = availability.iter().find(|a| a.region == "chest").unwrap();
    assert!(chest.occupied);
    assert!(chest.available);
    let back = availability.iter().find(|a| a.region == "back").unwrap();
    assert!(back.available && !back.occupied);
}

// ── Removal ──────────────────────────────────────────────────────────────

#[test]
fn remove_applied_recomputes_can_submit() {
    let mut state = new_state();
    apply(&mut state, "sleeve_right", "mahou").unwrap();
    assert!(state.can_submit());
    assert!(state.remove_applied("sleeve_right").unwrap());
    assert!(!state.can_submit());
}

#[test]
fn remove_applied_is_idempotent() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    apply(&mut state, "sleeve_left", "mahou").unwrap();

    state.remove_applied("back").unwrap();
    let once = state.snapshot_at(Utc::now());
    assert!(!state.remove_applied("back").unwrap());
    let twice = state.snapshot_at(once.taken_at);
    assert_eq!(once, twice);
}

#[test]
fn remove_from_unknown_region_fails() {
    let mut state = new_state();
    assert!(matches!(
        state.remove_applied("collar"),
        Err(DesignError::UnknownRegion { .. })
    ));
}

// ── Options ──────────────────────────────────────────────────────────────

#[test]
fn size_tier_by_name() {
    let mut state = new_state();
    assert_eq!(state.set_size_tier_named("large").unwrap(), SizeTier::Large);
    assert_eq!(state.size_tier(), SizeTier::Large);

    let err = state.set_size_tier_named("huge").unwrap_err();
    assert_eq!(
        err,
        DesignError::InvalidTier {
            value: "huge".to_string()
        }
    );
    assert_eq!(state.size_tier(), SizeTier::Large);
}

#[test]
fn garment_options_are_tracked() {
    let mut state = new_state();
    state.set_garment_size(GarmentSize::XL);
    state.set_gender(Gender::Unisex);
    let snap = state.snapshot();
    assert_eq!(snap.garment.size, GarmentSize::XL);
    assert_eq!(snap.garment.gender, Gender::Unisex);
}

// ── Snapshots ────────────────────────────────────────────────────────────

#[test]
fn snapshot_is_detached_from_state() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    let snap = state.snapshot();
    state.remove_applied("back").unwrap();

    assert!(snap.has_logos());
    assert_eq!(snap.applied("back").unwrap().id.as_str(), "mahou");
    assert!(state.applied("back").is_none());
}

#[test]
fn snapshot_serde_roundtrip() {
    let mut state = new_state();
    apply(&mut state, "sleeve_left", "mahou").unwrap();
    state.set_size_tier(SizeTier::Small);

    let snap = state.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: DesignSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snap, back);
}

#[test]
fn restore_rehydrates_design() {
    let mut original = new_state();
    apply(&mut original, "front", "mahou").unwrap();
    original.set_size_tier(SizeTier::Large);
    let snap = original.snapshot();

    let registry = Arc::new(RegionRegistry::garment_default());
    let restored = DesignState::from_snapshot(registry, &snap).unwrap();
    assert_eq!(restored.applied("front").unwrap().id.as_str(), "mahou");
    assert_eq!(restored.size_tier(), SizeTier::Large);
    assert!(restored.can_submit());
    assert!(restored.selected_asset().is_none());
}

#[test]
fn restore_rejects_unknown_region() {
    let mut state = new_state();
    let mut snap = state.snapshot();
    snap.applied_logos
        .insert(RegionId::new("hood"), Some(preset("mahou")));

    let err = state.restore(&snap).unwrap_err();
    assert_eq!(
        err,
        DesignError::UnknownRegion {
            id: "hood".to_string()
        }
    );
}

#[test]
fn restore_rejects_conflicting_snapshot() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    let mut snap = state.snapshot();
    snap.applied_logos
        .insert(RegionId::new("front"), Some(preset("mahou")));
    snap.applied_logos
        .insert(RegionId::new("chest"), Some(preset("mahou")));

    assert!(matches!(
        state.restore(&snap),
        Err(DesignError::RegionConflict { .. })
    ));
    // Untouched on failure.
    assert!(state.applied("front").is_none());
    assert!(state.applied("back").is_some());
}

#[test]
fn reset_discards_design() {
    let mut state = new_state();
    apply(&mut state, "back", "mahou").unwrap();
    state.set_size_tier(SizeTier::Small);
    state.reset();
    assert!(!state.can_submit());
    assert!(state.selected_region().is_none());
    assert_eq!(state.size_tier(), SizeTier::Medium);
    assert_eq!(state.applied_logos().len(), 5);
}

// ── Notifications ────────────────────────────────────────────────────────

#[test]
fn subscribers_see_successful_changes_only() {
    let mut state = new_state();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    let id = state.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    apply(&mut state, "sleeve_left", "mahou").unwrap();
    let _ = state.select_region("nonexistent");
    let _ = state.apply_staged();

    let seen = events.borrow().clone();
    assert_eq!(
        seen,
        vec![
            DesignEvent::RegionSelected {
                region: RegionId::new("sleeve_left")
            },
            DesignEvent::AssetStaged {
                asset: AssetId::new("mahou")
            },
            DesignEvent::LogoApplied {
                region: RegionId::new("sleeve_left"),
                asset: AssetId::new("mahou")
            },
        ]
    );

    assert!(state.unsubscribe(id));
    state.remove_applied("sleeve_left").unwrap();
    assert_eq!(events.borrow().len(), 3);
}

#[test]
fn unchanged_tier_does_not_notify() {
    let mut state = new_state();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    state.subscribe(move |_| *sink.borrow_mut() += 1);

    state.set_size_tier(SizeTier::Medium);
    assert_eq!(*count.borrow(), 0);
    state.set_size_tier(SizeTier::Small);
    assert_eq!(*count.borrow(), 1);
}
