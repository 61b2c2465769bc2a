//! Render the selected documents and bundle them into one archive.

use packforge_core::{DocumentKind, GeneratedDocument, PackSelection};
use packforge_documents::{DocumentBundle, render_carton_labels, render_order_sheet, render_packing_list};
use packforge_labels::{
    LabelConfiguration, LabelContent, LabelError, LabelTemplate, render_labels_pdf, thermal_labels,
};

use crate::archive::{PackArchive, write_archive};
use crate::config::PackConfig;
use crate::error::{GenerationError, PackError, PackResult};
use crate::version::{archive_file_name, document_file_name};

#[derive(Debug, Clone, Default)]
pub struct PackAssembler {
    config: PackConfig,
}

impl PackAssembler {
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Render every selected document, in fixed order, and zip them.
    ///
    /// The first failure aborts the whole pack; no partial archive is
    /// returned. `labels` overrides the label run otherwise derived from the
    /// readiness record.
    pub fn assemble(
        &self,
        bundle: &DocumentBundle,
        selection: &PackSelection,
        labels: Option<&LabelConfiguration>,
        version: u32,
    ) -> PackResult<PackArchive> {
        let po_number = bundle.order.po_number.as_str();
        let span = tracing::info_span!("assemble_pack", po_number, version);
        let _guard = span.enter();

        let kinds = selection.kinds();
        if kinds.is_empty() {
            return Err(PackError::Validation {
                errors: vec!["Select at least one document".to_string()],
            });
        }
        tracing::info!(documents = kinds.len(), "pack assembly started");

        let mut documents = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let bytes = self.render(kind, bundle, labels).map_err(|err| {
                tracing::error!(document = %kind, error = %err, "document generation failed");
                PackError::generation(kind, err)
            })?;
            tracing::info!(document = %kind, bytes = bytes.len(), "document rendered");
            documents.push(GeneratedDocument {
                kind,
                file_name: document_file_name(kind, po_number, version),
                bytes,
            });
        }

        let bytes = write_archive(&documents)?;
        let archive = PackArchive {
            file_name: archive_file_name(po_number, version),
            version,
            entries: documents.into_iter().map(|d| d.file_name).collect(),
            bytes,
        };
        tracing::info!(
            archive = %archive.file_name,
            entries = archive.entries.len(),
            bytes = archive.bytes.len(),
            "pack assembly finished"
        );
        Ok(archive)
    }

    fn render(
        &self,
        kind: DocumentKind,
        bundle: &DocumentBundle,
        labels: Option<&LabelConfiguration>,
    ) -> Result<Vec<u8>, GenerationError> {
        match kind {
            DocumentKind::OrderSheet => Ok(render_order_sheet(bundle)?),
            DocumentKind::IdentificationLabels => {
                let config = match labels {
                    Some(config) => config.clone(),
                    None => self.label_configuration(bundle)?,
                };
                let content = label_content(bundle)?;
                let (bytes, summary) = render_labels_pdf(&content, &config)?;
                tracing::info!(
                    pages = summary.pages,
                    labels = summary.labels,
                    barcode_fallbacks = summary.barcode_fallbacks,
                    "identification labels rendered"
                );
                Ok(bytes)
            }
            DocumentKind::PackingList => Ok(render_packing_list(bundle)?),
            DocumentKind::CartonLabels => {
                Ok(render_carton_labels(bundle, self.config.carton_labels_per_page)?)
            }
        }
    }

    /// Label run matching what was printed before: stored template and
    /// quantity, with the configured calibration offsets.
    pub fn label_configuration(&self, bundle: &DocumentBundle) -> Result<LabelConfiguration, LabelError> {
        let readiness = bundle.readiness.as_ref();
        let template = match readiness.and_then(|r| r.labels_template.as_deref()) {
            Some(stored) => stored.parse::<LabelTemplate>().unwrap_or_else(|err| {
                tracing::warn!(template = stored, error = %err, "unknown stored label template; using default");
                LabelTemplate::default()
            }),
            None => LabelTemplate::default(),
        };
        let quantity = readiness
            .and_then(|r| r.labels_qty().or_else(|| r.total_units()))
            .and_then(|q| u32::try_from(q).ok())
            .ok_or(LabelError::EmptyRun)?;

        Ok(LabelConfiguration {
            template,
            quantity,
            offset_x_mm: self.config.label_offset_x_mm,
            offset_y_mm: self.config.label_offset_y_mm,
            ..LabelConfiguration::default()
        })
    }

    /// The identification labels as ZPL for a thermal printer at the
    /// configured density. Not part of the archive.
    pub fn thermal(
        &self,
        bundle: &DocumentBundle,
        labels: Option<&LabelConfiguration>,
    ) -> Result<String, LabelError> {
        let config = match labels {
            Some(config) => config.clone(),
            None => self.label_configuration(bundle)?,
        };
        thermal_labels(&label_content(bundle)?, &config, self.config.thermal_dpi)
    }
}

/// Printed identifier chosen the way the readiness gate expects it.
pub fn label_content(bundle: &DocumentBundle) -> Result<LabelContent, LabelError> {
    let identifiers = bundle.identifiers.as_ref().ok_or(LabelError::MissingPayload)?;
    let needs_fnsku = bundle.readiness.as_ref().is_none_or(|r| r.needs_fnsku);
    LabelContent::from_identifiers(identifiers, needs_fnsku, bundle.order.project_name.as_deref())
}
