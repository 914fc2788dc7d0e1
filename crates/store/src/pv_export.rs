//! Rendering PV documents and QR codes to files.
//!
//! Two documents are produced: the reception PV and the per-reserve PV. QR
//! drawing and PDF serialization are delegated to [`QrEncoder`] and
//! [`PdfRenderer`] implementations supplied by the caller.

use std::path::{Path, PathBuf};

use chantier_core::error::CoreError;
use chantier_core::lookup;
use chantier_core::models::{NewNotification, NotificationKind, Reception, Reserve};
use chantier_core::pdf::{
    layout_pv, pdf_filename, PdfRenderer, PvDocument, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use chantier_core::qr::{qr_filename, QrEncoder, QrKind, QrOptions, QrPayload};
use chantier_core::reception::{pv_number, reserve_pv_number};
use chantier_core::types::format_date_fr;

use crate::backend::write_atomic;
use crate::error::{StoreError, StoreResult};
use crate::repositories::NotificationRepo;
use crate::store::Store;

const DOCUMENT_TITLE: &str = "Procès-verbal de réception des travaux";

pub struct PvExporter<'a> {
    qr: &'a dyn QrEncoder,
    pdf: &'a dyn PdfRenderer,
    qr_options: QrOptions,
}

impl<'a> PvExporter<'a> {
    pub fn new(qr: &'a dyn QrEncoder, pdf: &'a dyn PdfRenderer) -> Self {
        Self {
            qr,
            pdf,
            qr_options: QrOptions::default(),
        }
    }

    pub fn with_qr_options(mut self, options: QrOptions) -> Self {
        self.qr_options = options;
        self
    }

    /// Write `PV_<number>_<date>.pdf` for the reception into `dir`.
    ///
    /// Any failure is logged, recorded as an error notification and returned
    /// as [`StoreError::Render`]. No partial file is left behind.
    pub fn export_reception(
        &self,
        store: &mut Store,
        reception_id: &str,
        dir: &Path,
    ) -> StoreResult<PathBuf> {
        let reception = lookup::find_by_id(store.receptions(), reception_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Reception", reception_id))?;
        let doc = reception_document(store, &reception);
        self.export_pdf(store, &reception.id, QrKind::Pv, &doc, dir)
    }

    /// Write the PV of a single reserve, numbered `PV-YYYY-MM-NNN`.
    ///
    /// Failures are handled as in [`Self::export_reception`].
    pub fn export_reserve(
        &self,
        store: &mut Store,
        reserve_id: &str,
        dir: &Path,
    ) -> StoreResult<PathBuf> {
        let reserve = find_reserve(store, reserve_id)?;
        let doc = reserve_document(store, &reserve);
        self.export_pdf(store, &reserve.id, QrKind::Reserve, &doc, dir)
    }

    /// Write the reserve's QR code alone as `QR_<number>_<date>.png`.
    pub fn export_reserve_qr(
        &self,
        store: &mut Store,
        reserve_id: &str,
        dir: &Path,
    ) -> StoreResult<PathBuf> {
        let reserve = find_reserve(store, reserve_id)?;
        let doc = reserve_document(store, &reserve);
        let payload = payload(store, &reserve.id, QrKind::Reserve, &doc);

        let path = dir.join(qr_filename(&doc.pv_number, &doc.date));
        let result = payload
            .encode()
            .and_then(|data| self.qr.encode_png(&data, &self.qr_options))
            .and_then(|png| write_file(path, &png));

        match result {
            Ok(path) => {
                tracing::info!(reserve_id, path = %path.display(), "Reserve QR code exported");
                Ok(path)
            }
            Err(e) => {
                tracing::error!(reserve_id, error = %e, "QR code export failed");
                NotificationRepo::add(
                    store,
                    NewNotification::new(
                        NotificationKind::Error,
                        "Impossible de générer le code QR",
                    )
                    .with_description(e.to_string()),
                );
                Err(StoreError::Render(e.to_string()))
            }
        }
    }

    fn export_pdf(
        &self,
        store: &mut Store,
        id: &str,
        kind: QrKind,
        doc: &PvDocument,
        dir: &Path,
    ) -> StoreResult<PathBuf> {
        let path = dir.join(pdf_filename(&doc.pv_number, &doc.date));
        let result = self
            .render(store, id, kind, doc)
            .and_then(|bytes| write_file(path, &bytes));

        match result {
            Ok(path) => {
                tracing::info!(id, kind = ?kind, path = %path.display(), "PV exported");
                NotificationRepo::add(
                    store,
                    NewNotification::new(
                        NotificationKind::Reception,
                        format!("PV généré : {}", doc.pv_number),
                    ),
                );
                Ok(path)
            }
            Err(e) => {
                tracing::error!(id, kind = ?kind, error = %e, "PV export failed");
                NotificationRepo::add(
                    store,
                    NewNotification::new(
                        NotificationKind::Error,
                        "Erreur lors de la génération du PDF",
                    )
                    .with_description(e.to_string()),
                );
                Err(StoreError::Render(e.to_string()))
            }
        }
    }

    fn render(
        &self,
        store: &Store,
        id: &str,
        kind: QrKind,
        doc: &PvDocument,
    ) -> Result<Vec<u8>, CoreError> {
        let data = payload(store, id, kind, doc).encode()?;
        let png = self.qr.encode_png(&data, &self.qr_options)?;
        let ops = layout_pv(doc, store.settings().language, Some(png), store.now());
        self.pdf.render(PAGE_WIDTH_MM, PAGE_HEIGHT_MM, &ops)
    }
}

fn payload(store: &Store, id: &str, kind: QrKind, doc: &PvDocument) -> QrPayload {
    QrPayload::new(
        doc.pv_number.clone(),
        doc.date.clone(),
        id,
        kind,
        Some(doc.title.clone()),
        store.now(),
    )
}

fn write_file(path: PathBuf, bytes: &[u8]) -> Result<PathBuf, CoreError> {
    write_atomic(&path, bytes)
        .map(|()| path)
        .map_err(|e| CoreError::Internal(format!("Cannot write file: {e}")))
}

fn find_reserve(store: &Store, reserve_id: &str) -> Result<Reserve, CoreError> {
    lookup::find_by_id(store.reserves(), reserve_id)
        .cloned()
        .ok_or_else(|| CoreError::not_found("Reserve", reserve_id))
}

fn reception_document(store: &Store, reception: &Reception) -> PvDocument {
    let project_name = lookup::project_name(store.projects(), &reception.project_id);
    let mut details = Vec::new();
    if let Some(block_id) = &reception.block_id {
        details.push((
            "Bloc".to_string(),
            lookup::block_name(store.blocks(), block_id).to_string(),
        ));
    }
    if let Some(category_id) = &reception.category_id {
        details.push((
            "Catégorie".to_string(),
            lookup::category_name(store.categories(), category_id).to_string(),
        ));
    }
    details.push(("Réserves".to_string(), reception.reserve_count.to_string()));
    let delay = if reception.is_on_time {
        "Dans les délais".to_string()
    } else {
        format!("Retard de {} jours", reception.delay_days)
    };
    details.push(("Délai".to_string(), delay));
    if !reception.responsible_parties.is_empty() {
        details.push((
            "Intervenants".to_string(),
            reception.responsible_parties.join(", "),
        ));
    }

    let number = reception
        .pv_number
        .clone()
        .unwrap_or_else(|| pv_number(project_name, reception.date));

    PvDocument {
        pv_number: number,
        date: format_date_fr(reception.date),
        title: DOCUMENT_TITLE.to_string(),
        project_name: project_name.to_string(),
        description: reception.pv_content.clone(),
        details,
    }
}

fn reserve_document(store: &Store, reserve: &Reserve) -> PvDocument {
    let mut details = Vec::new();
    if let Some(block_id) = &reserve.block_id {
        details.push((
            "Bloc".to_string(),
            lookup::block_name(store.blocks(), block_id).to_string(),
        ));
    }
    if let Some(apartment_id) = &reserve.apartment_id {
        details.push((
            "Appartement".to_string(),
            lookup::apartment_number(store.apartments(), apartment_id).to_string(),
        ));
    }
    details.push((
        "Catégorie".to_string(),
        lookup::category_name(store.categories(), &reserve.category_id).to_string(),
    ));
    details.push((
        "Sous-traitant".to_string(),
        lookup::contractor_name(store.contractors(), &reserve.contractor_id).to_string(),
    ));
    details.push(("Priorité".to_string(), reserve.priority.label().to_string()));
    details.push(("Statut".to_string(), reserve.status.label().to_string()));

    PvDocument {
        pv_number: reserve_pv_number(store.reserves(), reserve),
        date: format_date_fr(reserve.created_at.date_naive()),
        title: reserve.title.clone(),
        project_name: lookup::project_name(store.projects(), &reserve.project_id).to_string(),
        description: reserve.description.clone(),
        details,
    }
}
