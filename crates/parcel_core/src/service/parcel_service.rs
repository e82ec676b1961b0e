//! Parcel use-case service.
//!
//! # Responsibility
//! - Apply the status lifecycle on top of the parcel store.
//! - Emit user-facing notices for registrations, listings and transitions.
//!
//! # Invariants
//! - Status advances only through `ParcelStatus::next`.
//! - Store errors are returned unchanged; nothing is retried or recovered.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoResult};
use crate::service::notice::{
    client_header_notice, client_parcel_notice, registered_notice, status_changed_notice,
    NoticeSink, StdoutNotices,
};
use log::{info, warn};

/// Business-rule layer over a parcel repository.
pub struct ParcelService<R: ParcelRepository, N: NoticeSink = StdoutNotices> {
    repo: R,
    notices: N,
}

impl<R: ParcelRepository> ParcelService<R> {
    /// Creates a service that prints notices to standard output.
    pub fn new(repo: R) -> Self {
        Self::with_notices(repo, StdoutNotices)
    }
}

impl<R: ParcelRepository, N: NoticeSink> ParcelService<R, N> {
    pub fn with_notices(repo: R, notices: N) -> Self {
        Self { repo, notices }
    }

    /// Registers a new parcel for `client` at `address`.
    ///
    /// # Contract
    /// - Status is always `registered`; `created_at` is the current UTC time.
    /// - Returns the persisted parcel with its assigned number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> RepoResult<Parcel> {
        let mut parcel = Parcel::new_registered(client, address);
        parcel.number = self.repo.add(&parcel).inspect_err(|err| {
            warn!("event=parcel_register module=service status=error client={client} error={err}");
        })?;

        info!(
            "event=parcel_register module=service status=ok number={} client={client}",
            parcel.number
        );
        self.notices.notify(&registered_notice(&parcel));
        Ok(parcel)
    }

    /// Emits a header and one line per parcel owned by `client`.
    pub fn print_client_parcels(&self, client: ClientId) -> RepoResult<()> {
        let parcels = self.repo.get_by_client(client)?;

        self.notices.notify(&client_header_notice(client));
        for parcel in &parcels {
            self.notices.notify(&client_parcel_notice(parcel));
        }
        self.notices.notify("");

        info!(
            "event=parcel_list module=service status=ok client={client} count={}",
            parcels.len()
        );
        Ok(())
    }

    /// Advances the parcel to its successor status.
    ///
    /// A `delivered` parcel stays `delivered`: no notice and no write. The
    /// notice is only emitted once the new status is stored.
    /// Returns the status the parcel has afterwards.
    pub fn next_status(&self, number: ParcelNumber) -> RepoResult<ParcelStatus> {
        let parcel = self.repo.get(number)?;
        if parcel.status.is_terminal() {
            info!("event=parcel_next_status module=service status=noop number={number}");
            return Ok(parcel.status);
        }

        let next = parcel.status.next();
        self.repo.set_status(number, next).inspect_err(|err| {
            warn!("event=parcel_next_status module=service status=error number={number} error={err}");
        })?;
        self.notices.notify(&status_changed_notice(number, next));

        info!(
            "event=parcel_next_status module=service status=ok number={number} from={} to={next}",
            parcel.status
        );
        Ok(next)
    }

    /// Changes the address of a `registered` parcel.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
        self.repo.set_address(number, address).inspect_err(|err| {
            warn!("event=parcel_change_address module=service status=error number={number} error={err}");
        })?;
        info!("event=parcel_change_address module=service status=ok number={number}");
        Ok(())
    }

    /// Deletes a `registered` parcel.
    pub fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
        self.repo.delete(number).inspect_err(|err| {
            warn!("event=parcel_delete module=service status=error number={number} error={err}");
        })?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }
}
