//! Parcel tracking demonstration driver.
//!
//! Runs a fixed register/update/advance/delete sequence against the
//! configured SQLite database and prints notices to stdout. The first error
//! stops the run with a non-zero exit code.

use log::error;
use parcel_core::db::open_db;
use parcel_core::{
    init_logging, ParcelRepository, ParcelService, RepoError, SqliteParcelRepository,
    TrackerConfig,
};
use std::error::Error;
use std::process::ExitCode;

const DEMO_CLIENT: i64 = 1;
const DEMO_ADDRESS: &str = "Pskov, Pushkin st., Kolotushkin bld. 5";
const DEMO_NEW_ADDRESS: &str = "Saratov, Verkhnie Zori, Kozlov st. 25";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=demo_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = TrackerConfig::from_env();
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let conn = open_db(&config.db_path)?;
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn)?);
    run_demo(&service)?;
    Ok(())
}

fn run_demo<R: ParcelRepository>(service: &ParcelService<R>) -> Result<(), RepoError> {
    let parcel = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    service.change_address(parcel.number, DEMO_NEW_ADDRESS)?;
    service.next_status(parcel.number)?;
    service.print_client_parcels(DEMO_CLIENT)?;

    // The parcel is `sent` now: the store refuses the delete and the run
    // stops here with `InvalidState`.
    service.delete(parcel.number)?;
    service.print_client_parcels(DEMO_CLIENT)?;

    let parcel = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    service.delete(parcel.number)?;
    service.print_client_parcels(DEMO_CLIENT)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run_demo, DEMO_CLIENT, DEMO_NEW_ADDRESS};
    use parcel_core::db::open_db_in_memory;
    use parcel_core::{
        ParcelRepository, ParcelService, ParcelStatus, RepoError, SqliteParcelRepository,
    };

    #[test]
    fn demo_halts_at_rejected_delete_of_sent_parcel() {
        let conn = open_db_in_memory().unwrap();
        let service = ParcelService::new(SqliteParcelRepository::try_new(&conn).unwrap());

        let number = match run_demo(&service).unwrap_err() {
            RepoError::InvalidState {
                number,
                status: ParcelStatus::Sent,
            } => number,
            other => panic!("unexpected error: {other}"),
        };

        let parcels = SqliteParcelRepository::try_new(&conn)
            .unwrap()
            .get_by_client(DEMO_CLIENT)
            .unwrap();
        assert_eq!(parcels.len(), 1, "run must stop before the second registration");
        assert_eq!(parcels[0].number, number);
        assert_eq!(parcels[0].status, ParcelStatus::Sent);
        assert_eq!(parcels[0].address, DEMO_NEW_ADDRESS);
    }
}
