//! Conversion of Tree-sitter points into display coordinates.

/// Converts a zero-based Tree-sitter point into one-based (line, column).
///
/// Columns count bytes, as Tree-sitter does.
#[must_use]
pub(crate) fn point_to_one_based(point: tree_sitter::Point) -> (u32, u32) {
    let to_u32 = |value: usize| u32::try_from(value.saturating_add(1)).unwrap_or(u32::MAX);
    (to_u32(point.row), to_u32(point.column))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_becomes_one_one() {
        assert_eq!(point_to_one_based(tree_sitter::Point::new(0, 0)), (1, 1));
    }

    #[test]
    fn huge_points_saturate() {
        let point = tree_sitter::Point::new(usize::MAX, 4);
        assert_eq!(point_to_one_based(point), (u32::MAX, 5));
    }
}
