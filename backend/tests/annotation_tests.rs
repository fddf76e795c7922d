//! Annotation parsing tests for the AgroStock inventory dashboard
//!
//! Properties over the count-annotation parser: the reconciliation
//! arithmetic must hold for any note, and parsing must be stable.

use proptest::prelude::*;
use shared::annotation::parse_annotation;
use shared::models::StockStatus;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any note and system quantity, the derived difference equals
    /// physical minus system
    #[test]
    fn property_difference_invariant(
        note in ".{0,40}",
        qty in 0i64..100_000,
    ) {
        let ann = parse_annotation(&note, qty);
        prop_assert_eq!(ann.difference, ann.qty_physical - qty);
    }

    /// The status never contradicts the difference sign. A literal
    /// "falta 0" keeps the shortage status with a zero difference, so the
    /// bounds are non-strict for the divergent statuses.
    #[test]
    fn property_status_matches_difference_sign(
        note in ".{0,40}",
        qty in 0i64..100_000,
    ) {
        let ann = parse_annotation(&note, qty);
        match ann.status {
            StockStatus::Shortage => prop_assert!(ann.difference <= 0),
            StockStatus::Overage => prop_assert!(ann.difference >= 0),
            StockStatus::Ok | StockStatus::Damaged => prop_assert_eq!(ann.difference, 0),
        }
    }

    /// A shortage note never reports more physical stock than the system
    #[test]
    fn property_shortage_bounded_by_system(
        amount in 1i64..1_000,
        qty in 0i64..100_000,
    ) {
        let ann = parse_annotation(&format!("falta {}", amount), qty);
        prop_assert_eq!(ann.status, StockStatus::Shortage);
        prop_assert_eq!(ann.qty_physical, qty - amount);
    }

    /// The shorthand forms parse identically to the full words
    #[test]
    fn property_shorthand_equivalence(
        amount in 1i64..1_000,
        qty in 0i64..100_000,
    ) {
        let full = parse_annotation(&format!("falta {}", amount), qty);
        let short = parse_annotation(&format!("f {}", amount), qty);
        prop_assert_eq!(full.qty_physical, short.qty_physical);
        prop_assert_eq!(full.status, short.status);

        let full = parse_annotation(&format!("sobra {}", amount), qty);
        let short = parse_annotation(&format!("s {}", amount), qty);
        prop_assert_eq!(full.qty_physical, short.qty_physical);
        prop_assert_eq!(full.status, short.status);
    }

    /// Leading/trailing whitespace and letter case never change the result
    #[test]
    fn property_whitespace_and_case_insensitive(
        amount in 1i64..1_000,
        qty in 0i64..100_000,
    ) {
        let plain = parse_annotation(&format!("falta {}", amount), qty);
        let noisy = parse_annotation(&format!("  FALTA   {}  ", amount), qty);
        prop_assert_eq!(plain.qty_physical, noisy.qty_physical);
        prop_assert_eq!(plain.status, noisy.status);
    }
}

// ============================================================================
// Unit tests over the documented note forms
// ============================================================================

#[test]
fn test_blank_and_null_notes_leave_count_unchanged() {
    for note in ["", "   ", "nan", "NaN", "none", "NONE"] {
        let ann = parse_annotation(note, 10);
        assert_eq!(ann.qty_physical, 10, "note {:?}", note);
        assert_eq!(ann.status, StockStatus::Ok);
        assert_eq!(ann.note, "");
    }
}

#[test]
fn test_shortage_verb_conjugations() {
    for note in ["falta 3", "faltando 3", "faltam 3", "faltou 3", "faltaram 3", "falt. 3"] {
        let ann = parse_annotation(note, 10);
        assert_eq!(ann.qty_physical, 7, "note {:?}", note);
        assert_eq!(ann.status, StockStatus::Shortage);
    }
}

#[test]
fn test_shortage_with_preposition() {
    let ann = parse_annotation("falta de 2 unidades", 10);
    assert_eq!(ann.qty_physical, 8);
    assert_eq!(ann.note, "unidades");
}

#[test]
fn test_overage_forms() {
    for note in ["sobra 2", "sobrando 2", "sobraram 2", "passou 2", "s 2", "s. 2"] {
        let ann = parse_annotation(note, 10);
        assert_eq!(ann.qty_physical, 12, "note {:?}", note);
        assert_eq!(ann.status, StockStatus::Overage);
    }
}

#[test]
fn test_anchored_shortage_beats_damage_keyword() {
    let ann = parse_annotation("falta 5 avariado", 20);
    assert_eq!(ann.qty_physical, 15);
    assert_eq!(ann.status, StockStatus::Shortage);
    assert_eq!(ann.note, "avariado");
}

#[test]
fn test_damage_keyword_beats_embedded_amount() {
    // No anchored prefix, so the damage scan fires before the embedded
    // shortage fallback
    let ann = parse_annotation("caixa avariada, falta 2", 10);
    assert_eq!(ann.status, StockStatus::Damaged);
    assert_eq!(ann.qty_physical, 10);
    assert_eq!(ann.note, "caixa avariada, falta 2");
}

#[test]
fn test_embedded_fallbacks() {
    let ann = parse_annotation("no fundo faltavam 4", 10);
    assert_eq!(ann.qty_physical, 6);
    assert_eq!(ann.status, StockStatus::Shortage);

    let ann = parse_annotation("acho que sobraram 3 na prateleira", 10);
    assert_eq!(ann.qty_physical, 13);
    assert_eq!(ann.status, StockStatus::Overage);
}

#[test]
fn test_unparseable_note_is_kept_verbatim() {
    let ann = parse_annotation("  conferir com o João  ", 10);
    assert_eq!(ann.qty_physical, 10);
    assert_eq!(ann.status, StockStatus::Ok);
    assert_eq!(ann.note, "conferir com o João");
}

#[test]
fn test_decimal_amount_stops_at_integer_part() {
    // The integer group stops at the comma; only the "2" counts
    let ann = parse_annotation("falta 2,5", 10);
    assert_eq!(ann.qty_physical, 8);
    assert_eq!(ann.status, StockStatus::Shortage);
}

#[test]
fn test_huge_amount_falls_through_to_verbatim() {
    let ann = parse_annotation("falta 99999999999999999999", 10);
    assert_eq!(ann.qty_physical, 10);
    assert_eq!(ann.status, StockStatus::Ok);
}
