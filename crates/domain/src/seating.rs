//! Seating policies: the capacity rule attached to an event.
//!
//! Capacity is tracked as aggregate seat counts only. No variant assigns
//! individual seats, including `FullReserved`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Section name to seat capacity.
pub type SectionMap = BTreeMap<String, i32>;

/// The allocation rule an event is created with.
///
/// On the wire the variant is selected by a `type` tag; missing
/// configuration fields take their zero/empty default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SeatingPolicy {
    /// No seat assignment at all, only the venue capacity limit.
    #[default]
    Open,

    /// Fully seated event. Same capacity rule as `Open`.
    FullReserved {
        #[serde(default)]
        total_seats: i32,
    },

    /// Every booking targets a named section with its own capacity.
    SectionReserved(SectionLayout),
}

/// Section configuration of a section-reserved event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    #[serde(default, deserialize_with = "null_as_empty")]
    sections: SectionMap,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<SectionMap, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SectionMap>::deserialize(deserializer)?.unwrap_or_default())
}

impl SectionLayout {
    pub fn new(sections: SectionMap) -> Self {
        Self { sections }
    }

    /// Capacity of the named section, or 0 for an unknown section.
    pub fn capacity_of(&self, section: &str) -> i32 {
        self.sections.get(section).copied().unwrap_or(0)
    }

    pub fn contains(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }
}

impl From<Option<SectionMap>> for SectionLayout {
    fn from(sections: Option<SectionMap>) -> Self {
        Self::new(sections.unwrap_or_default())
    }
}

impl SeatingPolicy {
    /// Builds a section-reserved policy from `(name, capacity)` pairs.
    pub fn section_reserved<I, K>(sections: I) -> Self
    where
        I: IntoIterator<Item = (K, i32)>,
        K: Into<String>,
    {
        SeatingPolicy::SectionReserved(SectionLayout::new(
            sections.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn full_reserved(total_seats: i32) -> Self {
        SeatingPolicy::FullReserved { total_seats }
    }

    /// Persisted discriminator of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            SeatingPolicy::Open => "Open",
            SeatingPolicy::FullReserved { .. } => "FullReserved",
            SeatingPolicy::SectionReserved(_) => "SectionReserved",
        }
    }

    /// Human-readable name of the seating style.
    pub fn display_name(&self) -> &'static str {
        match self {
            SeatingPolicy::Open => "Open Seating",
            SeatingPolicy::FullReserved { .. } => "Full Reserved Seating",
            SeatingPolicy::SectionReserved(_) => "Section Reserved Seating",
        }
    }

    /// Seats left given a capacity and the seats already booked against it.
    ///
    /// Identical for every variant. The result is negative when the
    /// capacity is already oversold.
    pub fn available_capacity(&self, total_capacity: i64, current_booked: i64) -> i64 {
        total_capacity - current_booked
    }

    /// Whether `requested_seats` fit into `available_capacity`.
    ///
    /// For `SectionReserved` the caller must pass the section's own
    /// availability, and the section must be a configured one; a missing,
    /// empty or unknown section is never accommodated.
    pub fn can_accommodate(
        &self,
        requested_seats: i32,
        available_capacity: i64,
        section: Option<&str>,
    ) -> bool {
        match self {
            SeatingPolicy::Open | SeatingPolicy::FullReserved { .. } => {
                i64::from(requested_seats) <= available_capacity
            }
            SeatingPolicy::SectionReserved(layout) => match section {
                Some(name) if !name.is_empty() && layout.contains(name) => {
                    i64::from(requested_seats) <= available_capacity
                }
                _ => false,
            },
        }
    }

    /// Diagnostic summary of the seating configuration.
    pub fn section_info(&self) -> String {
        match self {
            SeatingPolicy::Open => "Open seating - no specific sections".to_string(),
            SeatingPolicy::FullReserved { total_seats } => format!("Total Seats: {total_seats}"),
            SeatingPolicy::SectionReserved(layout) => {
                let details: Vec<String> = layout
                    .sections
                    .iter()
                    .map(|(name, seats)| format!("{name}: {seats} seats"))
                    .collect();
                format!("Sections: {}", details.join(", "))
            }
        }
    }

    /// Capacity of a section, 0 for unknown sections and non-section policies.
    pub fn section_capacity(&self, section: &str) -> i32 {
        match self {
            SeatingPolicy::SectionReserved(layout) => layout.capacity_of(section),
            _ => 0,
        }
    }

    /// Converts the policy into its persisted (discriminator, configuration) form.
    pub fn to_record(&self) -> SeatingRecord {
        let configuration = match self {
            SeatingPolicy::Open => None,
            SeatingPolicy::FullReserved { total_seats } => {
                Some(serde_json::json!({ "TotalSeats": total_seats }))
            }
            SeatingPolicy::SectionReserved(layout) => {
                Some(serde_json::json!({ "Sections": layout.sections }))
            }
        };

        SeatingRecord {
            type_name: self.type_name().to_string(),
            configuration,
        }
    }

    /// Rebuilds a policy from its persisted form.
    ///
    /// Never fails: absent or unreadable configuration yields the variant's
    /// zero default and an unknown discriminator yields `Open`.
    pub fn from_record(type_name: &str, configuration: Option<&serde_json::Value>) -> Self {
        match type_name {
            "FullReserved" => {
                let total_seats = configuration
                    .and_then(|c| c.get("TotalSeats"))
                    .and_then(serde_json::Value::as_i64)
                    .and_then(|n| i32::try_from(n).ok())
                    .unwrap_or(0);
                SeatingPolicy::FullReserved { total_seats }
            }
            "SectionReserved" => {
                let sections = configuration
                    .and_then(|c| c.get("Sections"))
                    .filter(|s| !s.is_null())
                    .and_then(|s| match serde_json::from_value::<SectionMap>(s.clone()) {
                        Ok(map) => Some(map),
                        Err(error) => {
                            tracing::warn!(%error, "unreadable section configuration, using empty layout");
                            None
                        }
                    });
                SeatingPolicy::SectionReserved(SectionLayout::from(sections))
            }
            "Open" => SeatingPolicy::Open,
            other => {
                tracing::warn!(type_name = other, "unknown seating type, falling back to Open");
                SeatingPolicy::Open
            }
        }
    }
}

/// Durable representation of a [`SeatingPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingRecord {
    pub type_name: String,
    pub configuration: Option<serde_json::Value>,
}

impl SeatingRecord {
    pub fn into_policy(self) -> SeatingPolicy {
        SeatingPolicy::from_record(&self.type_name, self.configuration.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vip_layout() -> SeatingPolicy {
        SeatingPolicy::section_reserved([("VIP", 100), ("Balcony", 200)])
    }

    #[test]
    fn test_available_capacity_is_subtraction_for_every_variant() {
        for policy in [SeatingPolicy::Open, SeatingPolicy::full_reserved(50), vip_layout()] {
            assert_eq!(policy.available_capacity(100, 30), 70);
            assert_eq!(policy.available_capacity(100, 120), -20);
        }
    }

    #[test]
    fn test_open_and_full_reserved_ignore_section() {
        for policy in [SeatingPolicy::Open, SeatingPolicy::full_reserved(500)] {
            assert!(policy.can_accommodate(5, 5, None));
            assert!(policy.can_accommodate(5, 10, Some("Nowhere")));
            assert!(!policy.can_accommodate(6, 5, None));
            assert!(!policy.can_accommodate(6, 5, Some("VIP")));
            assert!(!policy.can_accommodate(1, -3, Some("")));
        }
    }

    #[test]
    fn test_section_reserved_requires_known_section() {
        let policy = vip_layout();
        assert!(!policy.can_accommodate(1, 1000, None));
        assert!(!policy.can_accommodate(1, 1000, Some("")));
        assert!(!policy.can_accommodate(1, 1000, Some("Pit")));
        assert!(policy.can_accommodate(10, 95, Some("VIP")));
        assert!(!policy.can_accommodate(96, 95, Some("VIP")));
    }

    #[test]
    fn test_section_capacity_of_unknown_section_is_zero() {
        let policy = vip_layout();
        assert_eq!(policy.section_capacity("VIP"), 100);
        assert_eq!(policy.section_capacity("Pit"), 0);
        assert_eq!(SeatingPolicy::Open.section_capacity("VIP"), 0);
    }

    #[test]
    fn test_section_info_summaries() {
        assert_eq!(
            SeatingPolicy::Open.section_info(),
            "Open seating - no specific sections"
        );
        assert_eq!(
            SeatingPolicy::full_reserved(5000).section_info(),
            "Total Seats: 5000"
        );
        assert_eq!(
            vip_layout().section_info(),
            "Sections: Balcony: 200 seats, VIP: 100 seats"
        );
    }

    #[test]
    fn test_null_sections_normalize_to_empty() {
        let layout = SectionLayout::from(None);
        assert!(layout.sections().is_empty());

        let policy: SeatingPolicy =
            serde_json::from_str(r#"{"type":"SectionReserved","sections":null}"#).unwrap();
        assert_eq!(policy, SeatingPolicy::SectionReserved(SectionLayout::default()));
    }

    #[test]
    fn test_wire_form_defaults_missing_configuration() {
        let policy: SeatingPolicy = serde_json::from_str(r#"{"type":"FullReserved"}"#).unwrap();
        assert_eq!(policy, SeatingPolicy::full_reserved(0));

        let policy: SeatingPolicy = serde_json::from_str(r#"{"type":"SectionReserved"}"#).unwrap();
        assert_eq!(policy, SeatingPolicy::SectionReserved(SectionLayout::default()));

        let policy: SeatingPolicy = serde_json::from_str(
            r#"{"type":"SectionReserved","sections":{"GoldenCircle":100}}"#,
        )
        .unwrap();
        assert_eq!(policy.section_capacity("GoldenCircle"), 100);
    }

    #[test]
    fn test_record_discriminators_and_payloads() {
        let record = SeatingPolicy::Open.to_record();
        assert_eq!(record.type_name, "Open");
        assert!(record.configuration.is_none());

        let record = SeatingPolicy::full_reserved(300).to_record();
        assert_eq!(record.type_name, "FullReserved");
        assert_eq!(record.configuration, Some(serde_json::json!({"TotalSeats": 300})));

        let record = vip_layout().to_record();
        assert_eq!(record.type_name, "SectionReserved");
        assert_eq!(
            record.configuration,
            Some(serde_json::json!({"Sections": {"VIP": 100, "Balcony": 200}}))
        );
        assert_eq!(record.into_policy(), vip_layout());
    }

    #[test]
    fn test_record_without_configuration_uses_zero_defaults() {
        assert_eq!(
            SeatingPolicy::from_record("FullReserved", None),
            SeatingPolicy::full_reserved(0)
        );
        assert_eq!(
            SeatingPolicy::from_record("SectionReserved", None),
            SeatingPolicy::SectionReserved(SectionLayout::default())
        );
        let garbage = serde_json::json!({"Sections": "not a map"});
        assert_eq!(
            SeatingPolicy::from_record("SectionReserved", Some(&garbage)),
            SeatingPolicy::SectionReserved(SectionLayout::default())
        );
    }

    #[test]
    fn test_unknown_discriminator_falls_back_to_open() {
        assert_eq!(SeatingPolicy::from_record("Balloon", None), SeatingPolicy::Open);
    }
}
