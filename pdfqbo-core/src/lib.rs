//! pdfqbo-core: statement model, institution config and OFX time helpers

pub mod config;
pub mod model;
pub mod time;

pub use config::{Config, InstitutionConfig, StatementConfig};
pub use model::{
    BalanceKind, Balances, DocumentError, MAX_DESCRIPTION_LEN, StatementDocument, StatementDraft,
    StatementPeriod, Transaction, TxnType, synthesize_fitid,
};
