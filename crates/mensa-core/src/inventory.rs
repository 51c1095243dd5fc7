#![forbid(unsafe_code)]

//! Baseline inventory of rendered items.

use crate::document::DocumentAdapter;
use crate::ids::DomSnapshot;

/// Scan every item node and keep the first occurrence of each id.
///
/// Sections repeat the same ids, so the result has one entry per logical
/// item. Ids that only appear in a later section are still picked up.
pub fn scan<D: DocumentAdapter + ?Sized>(document: &D) -> DomSnapshot {
    DomSnapshot::from_ids(document.scan_items())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;
    use pretty_assertions::assert_eq;

    #[test]
    fn dedupes_across_sections_in_encounter_order() {
        let doc = FakeDocument::new(&[0, 99], &[3, 1, 4]);
        assert_eq!(scan(&doc), DomSnapshot::from_ids([3, 1, 4]));
    }

    #[test]
    fn ids_only_in_later_sections_are_included() {
        let mut doc = FakeDocument::new(&[0, 99], &[3, 1]);
        doc.add_node(99, 8);
        assert_eq!(scan(&doc), DomSnapshot::from_ids([3, 1, 8]));
    }

    #[test]
    fn empty_document_yields_empty_snapshot() {
        let doc = FakeDocument::new(&[0, 99], &[]);
        assert!(scan(&doc).is_empty());
    }
}
