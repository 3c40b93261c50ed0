//! pdfqbo-ofx: OFX/QBO rendering of parsed checking statements

pub mod writer;

pub use writer::{OFX_HEADER, output_file_name, render_ofx};
