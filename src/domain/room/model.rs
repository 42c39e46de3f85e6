//! Read-only room snapshot owned by the inventory service

use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::DomainError;

/// Room category as published by the inventory service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Deluxe => "DELUXE",
            Self::Suite => "SUITE",
        }
    }
}

impl FromStr for RoomType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(Self::Standard),
            "DELUXE" => Ok(Self::Deluxe),
            "SUITE" => Ok(Self::Suite),
            other => Err(DomainError::Validation(format!("invalid room type: {other}"))),
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a room in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Maintenance => "MAINTENANCE",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "OCCUPIED" => Ok(Self::Occupied),
            "MAINTENANCE" => Ok(Self::Maintenance),
            other => Err(DomainError::Validation(format!("invalid room status: {other}"))),
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a room fetched per request
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub id: Uuid,
    /// Human-facing room number ("101", "2B")
    pub number: String,
    pub room_type: RoomType,
    /// Price of one night
    pub nightly_rate: Decimal,
    /// Maximum number of guests
    pub capacity: u32,
    pub status: RoomStatus,
}

/// Room filter shared by the inventory lookup and availability search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub min_capacity: Option<u32>,
    pub room_type: Option<RoomType>,
    pub status: Option<RoomStatus>,
}

impl SearchCriteria {
    pub fn new(room_type: Option<RoomType>, min_capacity: Option<u32>) -> Self {
        Self {
            min_capacity,
            room_type,
            status: None,
        }
    }

    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Same predicate the room service applies: type equality,
    /// capacity at least the minimum, status equality.
    pub fn matches(&self, room: &RoomSummary) -> bool {
        self.room_type.map_or(true, |t| room.room_type == t)
            && self.min_capacity.map_or(true, |c| room.capacity >= c)
            && self.status.map_or(true, |s| room.status == s)
    }
}
