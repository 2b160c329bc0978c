//! Database entities

pub mod claim;
pub mod claim_document;
pub mod patta;
pub mod socio_economic;
