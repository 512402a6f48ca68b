//! Shelter records — capacity, risk rating, occupancy scoring.
//!
//! Shelters come from a live capacity store. The allocator only reads
//! `available()`; the occupancy score and catalog checks serve the shelter
//! list and the operator's data-quality view.

use serde::{Deserialize, Serialize};

/// Safety rating of a shelter site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShelterRisk {
    #[default]
    #[serde(alias = "GOOD")]
    Low,
    Moderate,
    #[serde(alias = "HIGH_RISK")]
    High,
}

impl ShelterRisk {
    /// Travel-time multiplier for routing people toward this shelter.
    pub fn travel_penalty(&self) -> f64 {
        match self {
            Self::Low => 1.00,
            Self::Moderate => 1.12,
            Self::High => 1.25,
        }
    }

    /// Points deducted from the shelter's list score.
    pub fn score_penalty(&self) -> u32 {
        match self {
            Self::Low => 0,
            Self::Moderate => 15,
            Self::High => 35,
        }
    }
}

/// A shelter and its current capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, alias = "safety")]
    pub risk: ShelterRisk,
    pub capacity_total: u32,
    pub capacity_used: u32,
}

impl Shelter {
    /// Places left, floored at zero for over-capacity records.
    pub fn available(&self) -> u32 {
        self.capacity_total.saturating_sub(self.capacity_used)
    }

    /// Occupancy as a rounded percentage. Zero-capacity shelters count as full.
    pub fn occupancy_pct(&self) -> u32 {
        if self.capacity_total == 0 {
            return 100;
        }
        (self.capacity_used as f64 / self.capacity_total as f64 * 100.0).round() as u32
    }

    /// List score: emptier and safer shelters score higher, 0–100.
    pub fn score(&self) -> u32 {
        100u32
            .saturating_sub(self.occupancy_pct())
            .saturating_sub(self.risk.score_penalty())
    }
}

/// A shelter with its derived list metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedShelter {
    pub id: String,
    pub name: String,
    pub occupancy_pct: u32,
    pub available: u32,
    pub score: u32,
}

/// Rank shelters best-first by score. Equal scores keep catalog order.
pub fn rank_shelters(shelters: &[Shelter]) -> Vec<RankedShelter> {
    let mut ranked: Vec<RankedShelter> = shelters
        .iter()
        .map(|s| RankedShelter {
            id: s.id.clone(),
            name: s.name.clone(),
            occupancy_pct: s.occupancy_pct(),
            available: s.available(),
            score: s.score(),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// A data-quality problem in a shelter record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// More people recorded than the shelter holds: (id, used, total).
    OverCapacity(String, u32, u32),
    /// Shelter with no capacity at all.
    ZeroCapacity(String),
}

/// Check shelter records for capacity inconsistencies.
///
/// These are reported, not rejected: the allocator treats an over-capacity
/// shelter as full.
pub fn check_shelters(shelters: &[Shelter]) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    for s in shelters {
        if s.capacity_total == 0 {
            issues.push(CatalogIssue::ZeroCapacity(s.id.clone()));
        } else if s.capacity_used > s.capacity_total {
            issues.push(CatalogIssue::OverCapacity(
                s.id.clone(),
                s.capacity_used,
                s.capacity_total,
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelter(id: &str, total: u32, used: u32, risk: ShelterRisk) -> Shelter {
        Shelter {
            id: id.into(),
            name: format!("Shelter {id}"),
            lat: 13.0,
            lng: 80.0,
            risk,
            capacity_total: total,
            capacity_used: used,
        }
    }

    #[test]
    fn test_available_floors_at_zero() {
        assert_eq!(shelter("a", 300, 210, ShelterRisk::Low).available(), 90);
        assert_eq!(shelter("b", 100, 140, ShelterRisk::Low).available(), 0);
    }

    #[test]
    fn test_occupancy_pct() {
        assert_eq!(shelter("a", 300, 210, ShelterRisk::Low).occupancy_pct(), 70);
        assert_eq!(shelter("b", 0, 0, ShelterRisk::Low).occupancy_pct(), 100);
        // 160/180 = 88.9%
        assert_eq!(shelter("c", 180, 160, ShelterRisk::Low).occupancy_pct(), 89);
    }

    #[test]
    fn test_score_applies_risk_penalty() {
        assert_eq!(shelter("a", 100, 20, ShelterRisk::Low).score(), 80);
        assert_eq!(shelter("b", 100, 20, ShelterRisk::Moderate).score(), 65);
        assert_eq!(shelter("c", 100, 20, ShelterRisk::High).score(), 45);
        assert_eq!(shelter("d", 100, 90, ShelterRisk::High).score(), 0);
    }

    #[test]
    fn test_rank_shelters_best_first_stable() {
        let shelters = vec![
            shelter("full", 100, 100, ShelterRisk::Low),
            shelter("x", 100, 50, ShelterRisk::Low),
            shelter("y", 100, 50, ShelterRisk::Low),
            shelter("empty", 100, 0, ShelterRisk::Low),
        ];
        let ranked = rank_shelters(&shelters);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["empty", "x", "y", "full"]);
    }

    #[test]
    fn test_rank_shelters_zero_capacity_last() {
        let shelters = vec![
            shelter("half", 100, 50, ShelterRisk::Low),
            shelter("empty", 100, 0, ShelterRisk::Low),
            shelter("zero", 0, 0, ShelterRisk::Low),
        ];
        let ranked = rank_shelters(&shelters);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["empty", "half", "zero"]);
        let zero = &ranked[2];
        assert_eq!((zero.score, zero.occupancy_pct, zero.available), (0, 100, 0));
    }

    #[test]
    fn test_check_shelters() {
        let shelters = vec![
            shelter("ok", 100, 10, ShelterRisk::Low),
            shelter("over", 50, 60, ShelterRisk::Low),
            shelter("zero", 0, 0, ShelterRisk::Low),
        ];
        let issues = check_shelters(&shelters);
        assert_eq!(
            issues,
            vec![
                CatalogIssue::OverCapacity("over".into(), 60, 50),
                CatalogIssue::ZeroCapacity("zero".into()),
            ]
        );
    }

    #[test]
    fn test_risk_aliases() {
        let r: ShelterRisk = serde_json::from_str("\"HIGH_RISK\"").unwrap();
        assert_eq!(r, ShelterRisk::High);
        let r: ShelterRisk = serde_json::from_str("\"GOOD\"").unwrap();
        assert_eq!(r, ShelterRisk::Low);
        let r: ShelterRisk = serde_json::from_str("\"MODERATE\"").unwrap();
        assert_eq!(r, ShelterRisk::Moderate);
    }

    #[test]
    fn test_missing_risk_defaults_low() {
        let json = r#"{"id":"S9","name":"Hall","lat":1.0,"lng":2.0,
            "capacityTotal":10,"capacityUsed":3}"#;
        let s: Shelter = serde_json::from_str(json).unwrap();
        assert_eq!(s.risk, ShelterRisk::Low);
        assert_eq!(s.available(), 7);
    }

    #[test]
    fn test_legacy_safety_field() {
        let json = r#"{"id":"S8","name":"Depot","lat":1.0,"lng":2.0,
            "safety":"HIGH_RISK","capacityTotal":10,"capacityUsed":3}"#;
        let s: Shelter = serde_json::from_str(json).unwrap();
        assert_eq!(s.risk, ShelterRisk::High);
    }
}
