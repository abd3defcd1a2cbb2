use serde::{Deserialize, Serialize};

/// The two service periods offered by the restaurant. Wire values stay
/// Italian to match the booking form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MealType {
    #[serde(rename = "pranzo")]
    Lunch,
    #[serde(rename = "cena")]
    Dinner,
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealType::Lunch => "pranzo",
            MealType::Dinner => "cena",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pranzo" => Ok(MealType::Lunch),
            "cena" => Ok(MealType::Dinner),
            _ => Err(anyhow::anyhow!("Unknown meal type: {s}")),
        }
    }
}

/// Per-weekday service policy: which meals are served that day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayService {
    #[serde(rename = "pranzo")]
    Lunch,
    #[serde(rename = "cena")]
    Dinner,
    #[serde(rename = "entrambi")]
    Both,
    #[serde(rename = "chiuso")]
    Closed,
}

impl std::fmt::Display for DayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DayService::Lunch => "pranzo",
            DayService::Dinner => "cena",
            DayService::Both => "entrambi",
            DayService::Closed => "chiuso",
        };
        write!(f, "{s}")
    }
}

/// Query params for GET /availability.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// ISO 8601 calendar date, e.g. "2026-02-14".
    pub date: chrono::NaiveDate,
    pub meal: MealType,
}

/// Query params for GET /availability/slots.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub meal: MealType,
}
