//! `pts-reports` — permit exports.
//!
//! Rendering is mocked at fixed sizes: the bytes carry a valid file
//! signature and nothing else, so downloads and content-type handling can
//! be exercised end to end without a PDF or spreadsheet engine behind
//! them.

use tracing::debug;

use pts_permits::Permit;

/// Size of a rendered single-permit PDF.
pub const PDF_REPORT_SIZE: usize = 1024;
/// Size of a rendered permit workbook.
pub const EXCEL_REPORT_SIZE: usize = 2048;

const PDF_HEADER: &[u8] = b"%PDF-1.4\n";
const PDF_FOOTER: &[u8] = b"\n%%EOF";
const XLSX_HEADER: &[u8] = b"PK\x03\x04";

/// Render one permit as a PDF document.
pub fn permit_pdf(permit: &Permit) -> Vec<u8> {
    debug!(
        permit_id = %permit.id,
        status = permit.return_to_operation.status.as_str(),
        "rendering permit pdf"
    );
    let mut bytes = vec![0u8; PDF_REPORT_SIZE];
    bytes[..PDF_HEADER.len()].copy_from_slice(PDF_HEADER);
    let footer_at = PDF_REPORT_SIZE - PDF_FOOTER.len();
    bytes[footer_at..].copy_from_slice(PDF_FOOTER);
    bytes
}

/// Render a set of permits as an xlsx workbook.
pub fn permits_excel(permits: &[Permit]) -> Vec<u8> {
    debug!(rows = permits.len(), "rendering permit workbook");
    let mut bytes = vec![0u8; EXCEL_REPORT_SIZE];
    bytes[..XLSX_HEADER.len()].copy_from_slice(XLSX_HEADER);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pts_core::PermitId;
    use pts_permits::PermitDraft;

    fn test_permit() -> Permit {
        Permit::from_draft(
            PermitId::new("PTS-251107-001"),
            PermitDraft {
                area: "Mantenimiento".to_string(),
                equipment_or_installation: "K7451".to_string(),
                requester_id: "12345".to_string(),
                supervisor_id: "SUP222".to_string(),
                start_date: "2025-11-07".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn pdf_is_framed_at_fixed_size() {
        let bytes = permit_pdf(&test_permit());
        assert_eq!(bytes.len(), PDF_REPORT_SIZE);
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"\n%%EOF"));
    }

    #[test]
    fn excel_carries_the_zip_signature() {
        let bytes = permits_excel(&[test_permit()]);
        assert_eq!(bytes.len(), EXCEL_REPORT_SIZE);
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn excel_size_does_not_depend_on_row_count() {
        assert_eq!(permits_excel(&[]).len(), EXCEL_REPORT_SIZE);
        let many: Vec<Permit> = (0..50).map(|_| test_permit()).collect();
        assert_eq!(permits_excel(&many).len(), EXCEL_REPORT_SIZE);
    }
}
