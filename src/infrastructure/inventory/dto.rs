//! Wire format of the room inventory service

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::room::{RoomStatus, RoomSummary, RoomType};

/// Prices travel as decimal strings; older catalog builds emit numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceDto {
    Text(String),
    Number(serde_json::Number),
}

impl PriceDto {
    fn to_decimal(&self) -> Result<Decimal, String> {
        let raw = match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) => number.to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|e| format!("invalid room price {raw:?}: {e}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: Uuid,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    pub price: PriceDto,
    pub capacity: u32,
    pub status: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

impl RoomDto {
    pub fn into_domain(self) -> Result<RoomSummary, String> {
        let nightly_rate = self.price.to_decimal()?;
        let room_type = RoomType::from_str(&self.room_type).map_err(|e| e.to_string())?;
        let status = RoomStatus::from_str(&self.status).map_err(|e| e.to_string())?;
        Ok(RoomSummary {
            id: self.id,
            number: self.room_number,
            room_type,
            nightly_rate,
            capacity: self.capacity,
            status,
        })
    }
}

impl From<&RoomSummary> for RoomDto {
    fn from(room: &RoomSummary) -> Self {
        Self {
            id: room.id,
            room_number: room.number.clone(),
            room_type: room.room_type.as_str().to_string(),
            price: PriceDto::Text(room.nightly_rate.to_string()),
            capacity: room.capacity,
            status: room.status.as_str().to_string(),
            amenities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomCountDto {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_and_numeric_prices() {
        let id = Uuid::new_v4();
        let text = format!(
            r#"{{"id":"{id}","room_number":"101","type":"STANDARD","price":"120.50","capacity":2,"status":"AVAILABLE"}}"#
        );
        let room = serde_json::from_str::<RoomDto>(&text)
            .unwrap()
            .into_domain()
            .unwrap();
        assert_eq!(room.nightly_rate, Decimal::new(12050, 2));
        assert_eq!(room.room_type, RoomType::Standard);

        let numeric = format!(
            r#"{{"id":"{id}","room_number":"102","type":"suite","price":300,"capacity":4,"status":"maintenance","amenities":["wifi"]}}"#
        );
        let room = serde_json::from_str::<RoomDto>(&numeric)
            .unwrap()
            .into_domain()
            .unwrap();
        assert_eq!(room.nightly_rate, Decimal::from(300));
        assert_eq!(room.status, RoomStatus::Maintenance);
    }

    #[test]
    fn rejects_garbage_price() {
        let dto = RoomDto {
            id: Uuid::new_v4(),
            room_number: "1".into(),
            room_type: "STANDARD".into(),
            price: PriceDto::Text("cheap".into()),
            capacity: 1,
            status: "AVAILABLE".into(),
            amenities: Vec::new(),
        };
        assert!(dto.into_domain().is_err());
    }
}
