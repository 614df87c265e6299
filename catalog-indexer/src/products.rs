//! Legacy product-id remapping.
//!
//! Some manifests still publish retired product identifiers. They are
//! remapped to their canonical ids before indexing so the front end only
//! ever sees one id per product.

/// Legacy product ids and their canonical replacements.
const LEGACY_PRODUCT_ALIASES: [(&str, &str); 2] = [
    ("oceanColour-chlA-year", "oceanColour-chlA"),
    ("adjustedSeaLevelAnomaly-sst-year", "adjustedSeaLevelAnomaly-sst"),
];

/// Map a product id from a manifest to its canonical id.
///
/// Ids without a legacy alias pass through unchanged.
pub fn canonical_product_id(product_id: &str) -> &str {
    LEGACY_PRODUCT_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == product_id)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(product_id)
}
