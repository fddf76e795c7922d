//! WebAssembly module for the AgroStock inventory dashboard
//!
//! Provides client-side computation for:
//! - Count annotation parsing (live preview while typing)
//! - Product category classification
//! - Group label normalization and display helpers

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::annotation::*;
pub use shared::category::*;
pub use shared::models::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Parse a count annotation against the system quantity, returning the
/// reconciliation result as a JSON string
#[wasm_bindgen]
pub fn parse_note(note: &str, qty_system: i64) -> Result<String, JsValue> {
    let annotation = parse_annotation(note, qty_system);
    serde_json::to_string(&annotation)
        .map_err(|e| JsValue::from_str(&format!("serialization failed: {}", e)))
}

/// Classify a product name into the fixed category taxonomy
#[wasm_bindgen]
pub fn classify_product_name(name: &str) -> String {
    classify_product(name).to_string()
}

/// Normalize a raw spreadsheet group label to its canonical spelling
#[wasm_bindgen]
pub fn normalize_group_label(group: &str) -> String {
    normalize_group(group)
}

/// Strip a redundant category prefix from a product name for display
#[wasm_bindgen]
pub fn short_product_name(product: &str) -> String {
    short_name(product).to_string()
}

/// Whether a category is blacklisted from the store-restock queue
#[wasm_bindgen]
pub fn restock_excluded(category: &str) -> bool {
    is_restock_excluded(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_json_shape() {
        let json = parse_note("falta 2", 10).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["qty_physical"], 8);
        assert_eq!(value["difference"], -2);
        assert_eq!(value["status"], "shortage");
    }

    #[test]
    fn test_classify_product_name() {
        assert_eq!(classify_product_name("HERBICIDA GLIFOSATO"), "HERBICIDAS");
        assert_eq!(classify_product_name("PARAFUSO"), "OUTROS");
    }

    #[test]
    fn test_normalize_group_label() {
        assert_eq!(normalize_group_label("adubos quimicos"), "ADUBOS QUÍMICOS");
    }

    #[test]
    fn test_short_product_name() {
        assert_eq!(short_product_name("SEMENTE Milho AG"), "Milho AG");
    }

    #[test]
    fn test_restock_excluded() {
        assert!(restock_excluded("SEMENTES"));
        assert!(!restock_excluded("FERRAMENTAS"));
    }
}
