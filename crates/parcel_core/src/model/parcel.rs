//! Parcel domain model.
//!
//! # Responsibility
//! - Define the tracked shipment record and its lifecycle states.
//! - Own the forward-only status transition table.
//!
//! # Invariants
//! - `number` is assigned by storage and never changes afterwards.
//! - Status only advances `registered -> sent -> delivered`.
//! - `delivered` is terminal; advancing it yields `delivered` again.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// External identifier of the parcel owner.
pub type ClientId = i64;

/// Lifecycle state of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for shipping; address may still change.
    Registered,
    /// Handed over to delivery.
    Sent,
    /// Received by the client. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Returns the stable text form used in storage and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the successor state.
    ///
    /// `Delivered` maps to itself, so callers can treat the terminal state as
    /// a no-op instead of an error.
    pub fn next(self) -> Self {
        match self {
            Self::Registered => Self::Sent,
            Self::Sent => Self::Delivered,
            Self::Delivered => Self::Delivered,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Delivered
    }

    /// Whether address changes and deletion are still allowed.
    pub fn is_mutable(self) -> bool {
        self == Self::Registered
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known parcel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParcelStatus(pub String);

impl Display for UnknownParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown parcel status `{}`", self.0)
    }
}

impl Error for UnknownParcelStatus {}

impl FromStr for ParcelStatus {
    type Err = UnknownParcelStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(UnknownParcelStatus(other.to_string())),
        }
    }
}

/// Tracked shipment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// `0` until the store assigns a number.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    pub address: String,
    /// RFC 3339 UTC timestamp with second precision.
    pub created_at: String,
}

impl Parcel {
    /// Builds an unsaved parcel in `registered` state stamped with the
    /// current UTC time.
    pub fn new_registered(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: utc_timestamp_now(),
        }
    }

    /// Returns whether storage has assigned a number yet.
    pub fn is_persisted(&self) -> bool {
        self.number > 0
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn utc_timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
