use serde::{Deserialize, Serialize};

/// Closed set of documents a manufacturer pack can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    OrderSheet,
    IdentificationLabels,
    PackingList,
    CartonLabels,
}

impl DocumentKind {
    /// Every kind, in pack assembly order.
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::OrderSheet,
        DocumentKind::IdentificationLabels,
        DocumentKind::PackingList,
        DocumentKind::CartonLabels,
    ];

    /// Human-readable name used in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            DocumentKind::OrderSheet => "order sheet",
            DocumentKind::IdentificationLabels => "FNSKU labels",
            DocumentKind::PackingList => "packing list",
            DocumentKind::CartonLabels => "carton labels",
        }
    }

    /// Filename prefix, before the order number.
    pub fn file_prefix(self) -> &'static str {
        match self {
            DocumentKind::OrderSheet => "PO",
            DocumentKind::IdentificationLabels => "FNSKU_Labels",
            DocumentKind::PackingList => "PackingList",
            DocumentKind::CartonLabels => "CartonLabels",
        }
    }

    /// Whether the document reads the readiness record at all.
    pub fn requires_readiness(self) -> bool {
        !matches!(self, DocumentKind::OrderSheet)
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which documents the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackSelection {
    pub include_order_sheet: bool,
    pub include_labels: bool,
    pub include_packing_list: bool,
    pub include_carton_labels: bool,
}

impl PackSelection {
    pub fn all() -> Self {
        Self {
            include_order_sheet: true,
            include_labels: true,
            include_packing_list: true,
            include_carton_labels: true,
        }
    }

    pub fn only(kind: DocumentKind) -> Self {
        Self::default().with(kind)
    }

    pub fn with(mut self, kind: DocumentKind) -> Self {
        *self.flag_mut(kind) = true;
        self
    }

    fn flag_mut(&mut self, kind: DocumentKind) -> &mut bool {
        match kind {
            DocumentKind::OrderSheet => &mut self.include_order_sheet,
            DocumentKind::IdentificationLabels => &mut self.include_labels,
            DocumentKind::PackingList => &mut self.include_packing_list,
            DocumentKind::CartonLabels => &mut self.include_carton_labels,
        }
    }

    pub fn includes(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::OrderSheet => self.include_order_sheet,
            DocumentKind::IdentificationLabels => self.include_labels,
            DocumentKind::PackingList => self.include_packing_list,
            DocumentKind::CartonLabels => self.include_carton_labels,
        }
    }

    /// Selected kinds in assembly order.
    pub fn kinds(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|k| self.includes(*k))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

/// A rendered document held in memory for the duration of one assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_assembly_order_regardless_of_construction_order() {
        let selection = PackSelection::only(DocumentKind::CartonLabels).with(DocumentKind::OrderSheet);
        assert_eq!(
            selection.kinds(),
            vec![DocumentKind::OrderSheet, DocumentKind::CartonLabels]
        );
    }

    #[test]
    fn default_selection_is_empty() {
        assert!(PackSelection::default().is_empty());
        assert_eq!(PackSelection::all().kinds(), DocumentKind::ALL.to_vec());
    }

    #[test]
    fn selection_deserializes_from_camel_case_flags() {
        let selection: PackSelection =
            serde_json::from_str(r#"{"includeCartonLabels":true}"#).unwrap();
        assert_eq!(selection, PackSelection::only(DocumentKind::CartonLabels));
    }
}
