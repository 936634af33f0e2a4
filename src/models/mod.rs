/// Hospital directory records served by the read-only directory API.
use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Which roster a record belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Gov,
    Private,
}

/// Bed availability snapshot.
///
/// The private roster does not publish totals, so `total` is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BedAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    pub available: u32,
    #[serde(rename = "icuAvailable")]
    pub icu_available: u32,
}

/// Doctors on call, by speciality (government roster only).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorsOnCall {
    pub emergency: u32,
    pub cardiology: u32,
    pub general: u32,
    pub pediatrics: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub network: Network,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub facilities: Vec<String>,
    pub beds: BedAvailability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctors: Option<DoctorsOnCall>,
    pub rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_serialization() {
        assert_eq!(serde_json::to_value(Network::Gov).unwrap(), "gov");
        assert_eq!(serde_json::to_value(Network::Private).unwrap(), "private");
    }

    #[test]
    fn test_hospital_serialization_skips_absent_fields() {
        let hospital = Hospital {
            id: "ap1".to_string(),
            name: "Apollo Health City Jubilee Hills".to_string(),
            address: "Jubilee Hills, Hyderabad".to_string(),
            phone: None,
            network: Network::Private,
            coordinates: Coordinates {
                latitude: 17.4327,
                longitude: 78.4070,
            },
            facilities: vec![],
            beds: BedAvailability {
                total: None,
                available: 14,
                icu_available: 3,
            },
            doctors: None,
            rating: 4.6,
        };

        let value = serde_json::to_value(&hospital).unwrap();
        assert!(value.get("phone").is_none());
        assert!(value.get("facilities").is_none());
        assert!(value.get("doctors").is_none());
        assert!(value["beds"].get("total").is_none());
        assert_eq!(value["beds"]["icuAvailable"], 3);
    }
}
