//! PNC reference normalisation.
//!
//! A Police National Computer reference has the canonical form
//! `YYYY/SSSSSSSC`: a four digit year, a slash, a seven digit serial and a
//! check character. Upstream systems store it with or without the slash, so a
//! lookup tries both spellings, slashed form first.

/// Length of a PNC reference without its slash
pub const PNC_COMPACT_LEN: usize = 12;

/// Position of the slash in the canonical form
const SLASH_AT: usize = 4;

/// Alternate spellings of a PNC reference, in lookup order.
///
/// - empty input: no candidates
/// - not 12 characters once the slash is removed: the input unchanged
/// - otherwise: the slashed form, then the compact form
pub fn pnc_candidates(pnc_id: &str) -> Vec<String> {
    let raw = pnc_id.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let compact: String = raw.chars().filter(|c| *c != '/').collect();
    if compact.chars().count() != PNC_COMPACT_LEN || !compact.is_ascii() {
        return vec![raw.to_string()];
    }

    let slashed = if raw.contains('/') {
        raw.to_string()
    } else {
        format!("{}/{}", &compact[..SLASH_AT], &compact[SLASH_AT..])
    };

    vec![slashed, compact]
}
