//! User-facing notice formatting and delivery.
//!
//! # Responsibility
//! - Render the fixed wording of parcel notices.
//! - Abstract where notice lines go (stdout by default).

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};

/// Destination for human-readable notice lines.
pub trait NoticeSink {
    fn notify(&self, line: &str);
}

impl<T: NoticeSink + ?Sized> NoticeSink for &T {
    fn notify(&self, line: &str) {
        (**self).notify(line);
    }
}

/// Writes each notice line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotices;

impl NoticeSink for StdoutNotices {
    fn notify(&self, line: &str) {
        println!("{line}");
    }
}

pub fn registered_notice(parcel: &Parcel) -> String {
    format!(
        "New parcel #{} to address {} from client {} registered at {}",
        parcel.number, parcel.address, parcel.client, parcel.created_at
    )
}

pub fn client_header_notice(client: ClientId) -> String {
    format!("Parcels of client {client}:")
}

pub fn client_parcel_notice(parcel: &Parcel) -> String {
    format!(
        "Parcel #{} to address {} from client {} registered at {}, status {}",
        parcel.number, parcel.address, parcel.client, parcel.created_at, parcel.status
    )
}

pub fn status_changed_notice(number: ParcelNumber, status: ParcelStatus) -> String {
    format!("Parcel #{number} has new status: {status}")
}
