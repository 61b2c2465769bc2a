//! Pack version numbering and file naming.

use packforge_core::DocumentKind;

/// Version to stamp on the next pack.
///
/// An explicit version (regenerating under the same number) wins; otherwise
/// the previous version plus one. Zero is never a valid version.
pub fn next_version(previous: Option<u32>, explicit: Option<u32>) -> u32 {
    match explicit.filter(|v| *v > 0) {
        Some(version) => version,
        None => previous.unwrap_or(0).saturating_add(1),
    }
}

/// Empty for the first version, `_v{N}` after that.
pub fn version_suffix(version: u32) -> String {
    if version <= 1 {
        String::new()
    } else {
        format!("_v{version}")
    }
}

/// PO number made safe to embed in an archive entry name.
fn file_safe(po_number: &str) -> String {
    let cleaned: String = po_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnumbered".to_string()
    } else {
        cleaned
    }
}

/// `PO_…`, `FNSKU_Labels_…`, `PackingList_…` or `CartonLabels_…` PDF name.
pub fn document_file_name(kind: DocumentKind, po_number: &str, version: u32) -> String {
    format!(
        "{}_{}{}.pdf",
        kind.file_prefix(),
        file_safe(po_number),
        version_suffix(version)
    )
}

pub fn archive_file_name(po_number: &str, version: u32) -> String {
    format!(
        "ManufacturerPack_{}{}.zip",
        file_safe(po_number),
        version_suffix(version)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_pack_is_version_one() {
        assert_eq!(next_version(None, None), 1);
        assert_eq!(next_version(Some(0), None), 1);
        assert_eq!(next_version(Some(3), None), 4);
    }

    #[test]
    fn explicit_version_is_kept() {
        assert_eq!(next_version(Some(3), Some(3)), 3);
        assert_eq!(next_version(Some(3), Some(0)), 4);
    }

    #[test]
    fn suffix_only_after_version_one() {
        assert_eq!(
            document_file_name(DocumentKind::OrderSheet, "PO-2024-017", 1),
            "PO_PO-2024-017.pdf"
        );
        assert_eq!(
            document_file_name(DocumentKind::IdentificationLabels, "PO-2024-017", 2),
            "FNSKU_Labels_PO-2024-017_v2.pdf"
        );
        assert_eq!(
            document_file_name(DocumentKind::PackingList, "PO-2024-017", 1),
            "PackingList_PO-2024-017.pdf"
        );
        assert_eq!(
            document_file_name(DocumentKind::CartonLabels, "PO-2024-017", 12),
            "CartonLabels_PO-2024-017_v12.pdf"
        );
        assert_eq!(archive_file_name("PO-2024-017", 1), "ManufacturerPack_PO-2024-017.zip");
        assert_eq!(archive_file_name("PO-2024-017", 2), "ManufacturerPack_PO-2024-017_v2.zip");
    }

    #[test]
    fn path_separators_never_reach_file_names() {
        assert_eq!(archive_file_name("PO 12/3", 1), "ManufacturerPack_PO_12_3.zip");
        assert_eq!(archive_file_name("  ", 1), "ManufacturerPack_unnumbered.zip");
    }

    proptest! {
        /// Property: feeding each output back as the previous version gives a
        /// strictly increasing sequence.
        #[test]
        fn chained_versions_strictly_increase(start in proptest::option::of(0u32..10_000), steps in 1usize..20) {
            let mut previous = start;
            let mut seen = Vec::new();
            for _ in 0..steps {
                let next = next_version(previous, None);
                if let Some(prev) = previous {
                    prop_assert!(next > prev);
                }
                seen.push(next);
                previous = Some(next);
            }
            prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));
        }

        /// Property: the same PO number and version always yield the same names.
        #[test]
        fn naming_is_deterministic(po in "[A-Za-z0-9 /-]{1,20}", version in 1u32..50) {
            prop_assert_eq!(archive_file_name(&po, version), archive_file_name(&po, version));
            let ending = format!("{}.pdf", version_suffix(version));
            for kind in DocumentKind::ALL {
                let name = document_file_name(kind, &po, version);
                prop_assert!(!name.contains('/'));
                prop_assert!(name.ends_with(&ending), "{} does not end with {}", name, ending);
            }
        }
    }
}
