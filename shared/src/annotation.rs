//! Free-text count annotation parsing
//!
//! Warehouse staff annotate stock counts in Portuguese shorthand:
//! "falta 3 caixas", "f 5", "sobrou 2", "danificado, vazando". This module
//! recovers a structured correction (physical quantity, signed difference,
//! residual note, status) from that text. Matching runs through an ordered
//! tier cascade; the first tier that produces a result wins.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::models::StockStatus;

/// Result of reconciling one note against the system quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub qty_physical: i64,
    pub difference: i64,
    /// Residual note after the numeric prefix was stripped, or the
    /// original text when no prefix was recognized
    pub note: String,
    pub status: StockStatus,
}

impl Annotation {
    fn unchanged(qty_system: i64, note: String) -> Self {
        Self {
            qty_physical: qty_system,
            difference: 0,
            note,
            status: StockStatus::Ok,
        }
    }
}

// Patterns compile once at first use, not once per row. All matching runs
// against lowercased, whitespace-collapsed text.
static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Anchored shortage verb with inflections: "falta 3", "faltando 2 cx",
/// "faltaram de 5", "falt. 4"
static RE_SHORTAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^falt(?:a|ando|am|ou|aram|\.)?(?:\s+(?:de|do|da))?\s+(\d+)\s*(.*)").unwrap()
});

/// Clerk shorthand: "f 5", "f. 3 caixa"
static RE_SHORTAGE_SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^f\.?\s+(\d+)\s*(.*)").unwrap());

/// Anchored overage verbs, two synonym families: "sobra"/"sobrou"… and
/// "passa"/"passou"…
static RE_OVERAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:sobr(?:a|ando|am|ou|aram|\.)?|pass(?:a|ando|aram|ou|\.)?)\s+(\d+)\s*(.*)")
        .unwrap()
});

/// Clerk shorthand: "s 2"
static RE_OVERAGE_SHORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^s\.?\s+(\d+)\s*(.*)").unwrap());

/// Damage-indicating stems, matched anywhere in the note
static RE_DAMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "avariad|danificad|quebra|defeit|vencid|improprio|impróprio|vaza|estragad|molhad|rasgad|furad|amassad|contaminad",
    )
    .unwrap()
});

/// Embedded shortage: the phrase is not the first token ("cx azul falta 2")
static RE_SHORTAGE_MID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"falt\w*\s+(?:de\s+)?(\d+)").unwrap());

/// Embedded overage
static RE_OVERAGE_MID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:sobr|pass)\w*\s+(\d+)").unwrap());

/// One tier of the cascade: a pattern plus the interpretation applied to
/// its captures. Returning `None` lets the cascade fall through, so a
/// malformed capture (e.g. an amount that overflows i64) degrades to the
/// terminal fallback instead of failing.
struct Tier {
    pattern: &'static Lazy<Regex>,
    apply: fn(&Captures<'_>, &str, i64) -> Option<Annotation>,
}

static TIERS: &[Tier] = &[
    Tier { pattern: &RE_SHORTAGE, apply: shortage_prefix },
    Tier { pattern: &RE_SHORTAGE_SHORT, apply: shortage_prefix },
    Tier { pattern: &RE_OVERAGE, apply: overage_prefix },
    Tier { pattern: &RE_OVERAGE_SHORT, apply: overage_prefix },
    Tier { pattern: &RE_DAMAGE, apply: damage_scan },
    Tier { pattern: &RE_SHORTAGE_MID, apply: shortage_embedded },
    Tier { pattern: &RE_OVERAGE_MID, apply: overage_embedded },
];

fn captured_amount(caps: &Captures<'_>) -> Option<i64> {
    caps.get(1)?.as_str().parse().ok()
}

fn captured_remainder(caps: &Captures<'_>) -> String {
    caps.get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn shortage_prefix(caps: &Captures<'_>, _original: &str, qty_system: i64) -> Option<Annotation> {
    let amount = captured_amount(caps)?;
    Some(Annotation {
        qty_physical: qty_system.checked_sub(amount)?,
        difference: -amount,
        note: captured_remainder(caps),
        status: StockStatus::Shortage,
    })
}

fn overage_prefix(caps: &Captures<'_>, _original: &str, qty_system: i64) -> Option<Annotation> {
    let amount = captured_amount(caps)?;
    Some(Annotation {
        qty_physical: qty_system.checked_add(amount)?,
        difference: amount,
        note: captured_remainder(caps),
        status: StockStatus::Overage,
    })
}

fn damage_scan(_caps: &Captures<'_>, original: &str, qty_system: i64) -> Option<Annotation> {
    // Damage alone carries no quantity correction; the note is kept whole
    Some(Annotation {
        qty_physical: qty_system,
        difference: 0,
        note: original.to_string(),
        status: StockStatus::Damaged,
    })
}

fn shortage_embedded(caps: &Captures<'_>, original: &str, qty_system: i64) -> Option<Annotation> {
    let amount = captured_amount(caps)?;
    Some(Annotation {
        qty_physical: qty_system.checked_sub(amount)?,
        difference: -amount,
        note: original.to_string(),
        status: StockStatus::Shortage,
    })
}

fn overage_embedded(caps: &Captures<'_>, original: &str, qty_system: i64) -> Option<Annotation> {
    let amount = captured_amount(caps)?;
    Some(Annotation {
        qty_physical: qty_system.checked_add(amount)?,
        difference: amount,
        note: original.to_string(),
        status: StockStatus::Overage,
    })
}

/// Parse a count annotation against the system-recorded quantity.
///
/// Pure and total: every input yields exactly one result. Unrecognized
/// text passes through verbatim with an `Ok` status, so a malformed note
/// never blocks ingestion. Amounts are strict base-10 integers; a decimal
/// like "falta 2,5" only matches up to the integer part.
pub fn parse_annotation(note: &str, qty_system: i64) -> Annotation {
    let text = note.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") || text.eq_ignore_ascii_case("none") {
        return Annotation::unchanged(qty_system, String::new());
    }

    let lowered = text.to_lowercase();
    let normalized = RE_SPACES.replace_all(&lowered, " ");
    let normalized = normalized.trim();

    for tier in TIERS {
        if let Some(caps) = tier.pattern.captures(normalized) {
            if let Some(annotation) = (tier.apply)(&caps, text, qty_system) {
                return annotation;
            }
        }
    }

    Annotation::unchanged(qty_system, text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(note: &str, qty: i64) -> (i64, i64, String, StockStatus) {
        let a = parse_annotation(note, qty);
        (a.qty_physical, a.difference, a.note, a.status)
    }

    #[test]
    fn test_blank_and_null_literals() {
        assert_eq!(parse("", 12), (12, 0, String::new(), StockStatus::Ok));
        assert_eq!(parse("   ", 12), (12, 0, String::new(), StockStatus::Ok));
        assert_eq!(parse("NaN", 12), (12, 0, String::new(), StockStatus::Ok));
        assert_eq!(parse("none", 12), (12, 0, String::new(), StockStatus::Ok));
    }

    #[test]
    fn test_shortage_full_form() {
        assert_eq!(
            parse("falta 3 caixas", 10),
            (7, -3, "caixas".to_string(), StockStatus::Shortage)
        );
        assert_eq!(parse("faltou 1", 5), (4, -1, String::new(), StockStatus::Shortage));
        assert_eq!(parse("faltaram 4", 9), (5, -4, String::new(), StockStatus::Shortage));
        assert_eq!(
            parse("faltando de 2 sacos", 8),
            (6, -2, "sacos".to_string(), StockStatus::Shortage)
        );
    }

    #[test]
    fn test_shortage_shorthand_equivalence() {
        assert_eq!(parse("f 3 caixa", 10), parse("falta 3 caixa", 10));
        assert_eq!(parse("f. 5", 20), (15, -5, String::new(), StockStatus::Shortage));
    }

    #[test]
    fn test_overage_full_form() {
        assert_eq!(parse("sobrou 2", 8), (10, 2, String::new(), StockStatus::Overage));
        assert_eq!(
            parse("passaram 3 unidades", 7),
            (10, 3, "unidades".to_string(), StockStatus::Overage)
        );
    }

    #[test]
    fn test_overage_shorthand() {
        assert_eq!(parse("s 2", 8), (10, 2, String::new(), StockStatus::Overage));
    }

    #[test]
    fn test_tier_precedence_shortage_beats_damage() {
        // "avariado" appears, but the anchored shortage tier runs first
        assert_eq!(
            parse("falta 5 avariado", 20),
            (15, -5, "avariado".to_string(), StockStatus::Shortage)
        );
    }

    #[test]
    fn test_damage_keywords() {
        assert_eq!(
            parse("danificado, vazando", 6),
            (6, 0, "danificado, vazando".to_string(), StockStatus::Damaged)
        );
        assert_eq!(
            parse("embalagem molhada", 4),
            (4, 0, "embalagem molhada".to_string(), StockStatus::Damaged)
        );
        assert_eq!(
            parse("produto vencido", 3),
            (3, 0, "produto vencido".to_string(), StockStatus::Damaged)
        );
    }

    #[test]
    fn test_damage_beats_embedded_shortage() {
        // Tier order: damage scan runs before the unanchored fallbacks
        assert_eq!(
            parse("caixa rasgada, falta 2", 10),
            (10, 0, "caixa rasgada, falta 2".to_string(), StockStatus::Damaged)
        );
    }

    #[test]
    fn test_embedded_fallbacks() {
        assert_eq!(
            parse("no fundo falta de 2", 10),
            (8, -2, "no fundo falta de 2".to_string(), StockStatus::Shortage)
        );
        assert_eq!(
            parse("na prateleira sobram 3", 10),
            (13, 3, "na prateleira sobram 3".to_string(), StockStatus::Overage)
        );
    }

    #[test]
    fn test_terminal_fallback_preserves_text() {
        assert_eq!(
            parse("produto trocado pelo cliente", 9),
            (9, 0, "produto trocado pelo cliente".to_string(), StockStatus::Ok)
        );
    }

    #[test]
    fn test_whitespace_and_case_insensitive() {
        assert_eq!(
            parse("  FALTA   3   caixas ", 10),
            (7, -3, "caixas".to_string(), StockStatus::Shortage)
        );
    }

    #[test]
    fn test_decimal_amount_truncates_at_integer_part() {
        // The integer group stops at the comma, so only the "2" counts
        // and ",5" lands in the residual note
        let a = parse_annotation("falta 2,5", 10);
        assert_eq!(a.status, StockStatus::Shortage);
        assert_eq!(a.difference, -2);
        assert_eq!(a.note, ",5");
    }

    #[test]
    fn test_huge_amount_falls_through() {
        let a = parse_annotation("falta 99999999999999999999", 10);
        assert_eq!(a.status, StockStatus::Ok);
        assert_eq!(a.difference, 0);
    }

    #[test]
    fn test_invariant_holds() {
        for (note, qty) in [
            ("falta 3", 10),
            ("s 7", 2),
            ("vazando", 5),
            ("qualquer coisa", 1),
            ("", 0),
        ] {
            let a = parse_annotation(note, qty);
            assert_eq!(a.difference, a.qty_physical - qty);
        }
    }

    #[test]
    fn test_idempotent() {
        let first = parse_annotation("falta 2 cx", 15);
        let second = parse_annotation("falta 2 cx", 15);
        assert_eq!(first, second);
    }
}
