//! Flex-form restriction pattern collection

use dynroute_core::FlexFormRestriction;

/// Collect one LIKE pattern per well-formed restriction.
///
/// Restrictions missing `field` or `value` are skipped without notice;
/// an all-malformed list yields no patterns and therefore no narrowing.
pub fn like_patterns(restrictions: &[FlexFormRestriction]) -> Vec<String> {
    restrictions
        .iter()
        .filter_map(FlexFormRestriction::as_like_pattern)
        .collect()
}
