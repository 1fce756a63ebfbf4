//! Fictional deposits used by the scenarios.
//!
//! Each sample is small enough to read in a hex dump but carries the magic
//! bytes and trailer of its format, so the signature extractor treats it as
//! a real file.

/// A file as a depositor would upload it.
#[derive(Debug, Clone, Copy)]
pub struct SampleDeposit {
    pub object_id: &'static str,
    pub label: &'static str,
    pub content: &'static [u8],
}

pub const ANNUAL_REPORT: SampleDeposit = SampleDeposit {
    object_id: "scholarsphere:annual-report",
    label: "annual-report-2025.pdf",
    content: b"%PDF-1.7\n1 0 obj\n<< /Title (Annual Report 2025) /Author (Office of Research) >>\nendobj\ntrailer\n%%EOF\n",
};

pub const FIELD_NOTES: SampleDeposit = SampleDeposit {
    object_id: "scholarsphere:field-notes",
    label: "field-notes.txt",
    content: b"Title: Field Notes, Spring Survey\nAuthor: J. Alvarez\n\nTransect 4: 12 specimens recorded.\n",
};

pub const CAMPUS_PHOTO: SampleDeposit = SampleDeposit {
    object_id: "scholarsphere:campus-photo",
    label: "old-main.png",
    content: b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x02\x00\x00\x00\x00\x00\x00\x00\x00IEND\xaeB`\x82",
};

/// Revised content for `ANNUAL_REPORT`, used to show a second version.
pub const ANNUAL_REPORT_REVISED: &[u8] =
    b"%PDF-1.7\n1 0 obj\n<< /Title (Annual Report 2025, Revised) /Author (Office of Research) >>\nendobj\ntrailer\n%%EOF\n";

pub fn all_deposits() -> [SampleDeposit; 3] {
    [ANNUAL_REPORT, FIELD_NOTES, CAMPUS_PHOTO]
}
