use parcel_core::{Parcel, ParcelStatus, UnknownParcelStatus};

#[test]
fn new_registered_sets_defaults() {
    let parcel = Parcel::new_registered(42, "Main st. 1");

    assert_eq!(parcel.number, 0);
    assert!(!parcel.is_persisted());
    assert_eq!(parcel.client, 42);
    assert_eq!(parcel.status, ParcelStatus::Registered);
    assert_eq!(parcel.address, "Main st. 1");
}

#[test]
fn created_at_is_rfc3339_utc_with_seconds() {
    let parcel = Parcel::new_registered(1, "a");

    // YYYY-MM-DDTHH:MM:SSZ
    assert_eq!(parcel.created_at.len(), 20);
    assert!(parcel.created_at.ends_with('Z'));
    assert_eq!(&parcel.created_at[10..11], "T");
    assert!(chrono::DateTime::parse_from_rfc3339(&parcel.created_at).is_ok());
}

#[test]
fn transition_table_only_moves_forward() {
    assert_eq!(ParcelStatus::Registered.next(), ParcelStatus::Sent);
    assert_eq!(ParcelStatus::Sent.next(), ParcelStatus::Delivered);
    assert_eq!(ParcelStatus::Delivered.next(), ParcelStatus::Delivered);
}

#[test]
fn only_registered_is_mutable_and_only_delivered_is_terminal() {
    assert!(ParcelStatus::Registered.is_mutable());
    assert!(!ParcelStatus::Sent.is_mutable());
    assert!(!ParcelStatus::Delivered.is_mutable());

    assert!(!ParcelStatus::Registered.is_terminal());
    assert!(!ParcelStatus::Sent.is_terminal());
    assert!(ParcelStatus::Delivered.is_terminal());
}

#[test]
fn status_parses_known_text_and_rejects_the_rest() {
    for status in [
        ParcelStatus::Registered,
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
    ] {
        assert_eq!(status.as_str().parse::<ParcelStatus>(), Ok(status));
        assert_eq!(status.to_string(), status.as_str());
    }

    assert_eq!(
        "Sent".parse::<ParcelStatus>(),
        Err(UnknownParcelStatus("Sent".to_string()))
    );
    assert!("".parse::<ParcelStatus>().is_err());
}

#[test]
fn parcel_serialization_uses_expected_wire_fields() {
    let parcel = Parcel {
        number: 5,
        client: 1000,
        status: ParcelStatus::Sent,
        address: "test".to_string(),
        created_at: "2026-10-19T08:15:00Z".to_string(),
    };

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(json["number"], 5);
    assert_eq!(json["client"], 1000);
    assert_eq!(json["status"], "sent");
    assert_eq!(json["address"], "test");
    assert_eq!(json["created_at"], "2026-10-19T08:15:00Z");

    let decoded: Parcel = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, parcel);
}

#[test]
fn unknown_status_fails_deserialization() {
    let json = serde_json::json!({
        "number": 1,
        "client": 1,
        "status": "lost",
        "address": "a",
        "created_at": "2026-10-19T08:15:00Z",
    });

    assert!(serde_json::from_value::<Parcel>(json).is_err());
}
