//! Post-quantum signature schemes

pub mod meds;

pub use meds::{Meds, Meds134180, Meds13220, Meds167717, Meds41711, Meds69497, Meds9923};
