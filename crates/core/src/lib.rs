//! Domain rules for construction-site management: projects and their
//! buildings, contractors, reserves (punch-list defects), task planning and
//! reception reports.
//!
//! Everything here is pure and synchronous. Time-dependent operations take
//! `today` / `now` explicitly; persistence lives in `chantier-store`.

pub mod csv;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod lookup;
pub mod models;
pub mod notifications;
pub mod pdf;
pub mod planning;
pub mod qr;
pub mod reception;
pub mod reserve_lifecycle;
pub mod search;
pub mod status;
pub mod types;
