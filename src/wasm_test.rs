use super::*;

// =============================================================
// Modifier bits
// =============================================================

#[test]
fn no_bits_means_no_modifiers() {
    assert_eq!(modifiers_from_bits(0), Modifiers::default());
}

#[test]
fn each_bit_maps_to_one_key() {
    assert!(modifiers_from_bits(MOD_SHIFT).shift);
    assert!(modifiers_from_bits(MOD_CTRL).ctrl);
    assert!(modifiers_from_bits(MOD_ALT).alt);
    assert!(modifiers_from_bits(MOD_META).meta);
    let m = modifiers_from_bits(MOD_SHIFT | MOD_META);
    assert_eq!(m, Modifiers { shift: true, meta: true, ..Modifiers::default() });
}

#[test]
fn event_carries_modifiers_and_bounds() {
    let e = event(0.5, 1.5, MOD_ALT);
    assert!(e.modifiers.alt);
    assert!(!e.within_bounds);
}

// =============================================================
// Redraw signal
// =============================================================

#[test]
fn redraw_only_for_render_or_cursor_actions() {
    assert!(!needs_render(&[]));
    assert!(!needs_render(&[Action::SelectionChanged(None)]));
    assert!(needs_render(&[Action::SelectionChanged(None), Action::RenderNeeded]));
    assert!(needs_render(&[Action::SetCursor("crosshair".into())]));
}
