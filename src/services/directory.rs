/// Static hospital directory with distance-aware querying.
///
/// Records are fixed at process start; there is no mutation API. The
/// query semantics mirror what the dispatch console offers: substring
/// search, minimum free beds, required facilities and a sort key.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::{BedAvailability, Coordinates, DoctorsOnCall, Hospital, Network};

/// Fallback origin used when the caller does not supply one.
pub const DEMO_LOCATION: Coordinates = Coordinates {
    latitude: 17.433,
    longitude: 78.45,
};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Distance,
    Availability,
    Rating,
    Name,
}

#[derive(Debug, Clone)]
pub struct DirectoryQuery {
    pub network: Network,
    pub origin: Coordinates,
    pub search: Option<String>,
    pub min_beds: u32,
    pub facilities: Vec<String>,
    pub sort: SortKey,
}

impl Default for DirectoryQuery {
    fn default() -> Self {
        Self {
            network: Network::Gov,
            origin: DEMO_LOCATION,
            search: None,
            min_beds: 0,
            facilities: Vec::new(),
            sort: SortKey::Distance,
        }
    }
}

/// A directory record annotated with distance from the query origin.
#[derive(Debug, Clone, Serialize)]
pub struct RankedHospital {
    #[serde(flatten)]
    pub hospital: Hospital,
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
}

fn gov(
    id: &str,
    name: &str,
    address: &str,
    phone: &str,
    lat: f64,
    lon: f64,
    facilities: &[&str],
    beds: (u32, u32, u32),
    doctors: (u32, u32, u32, u32),
    rating: f64,
) -> Hospital {
    Hospital {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: Some(phone.to_string()),
        network: Network::Gov,
        coordinates: Coordinates {
            latitude: lat,
            longitude: lon,
        },
        facilities: facilities.iter().map(|f| f.to_string()).collect(),
        beds: BedAvailability {
            total: Some(beds.0),
            available: beds.1,
            icu_available: beds.2,
        },
        doctors: Some(DoctorsOnCall {
            emergency: doctors.0,
            cardiology: doctors.1,
            general: doctors.2,
            pediatrics: doctors.3,
        }),
        rating,
    }
}

fn branch(
    id: &str,
    name: &str,
    address: &str,
    lat: f64,
    lon: f64,
    beds_available: u32,
    icu_available: u32,
    rating: f64,
) -> Hospital {
    Hospital {
        id: id.to_string(),
        name: name.to_string(),
        address: address.to_string(),
        phone: None,
        network: Network::Private,
        coordinates: Coordinates {
            latitude: lat,
            longitude: lon,
        },
        facilities: Vec::new(),
        beds: BedAvailability {
            total: None,
            available: beds_available,
            icu_available,
        },
        doctors: None,
        rating,
    }
}

static HOSPITALS: Lazy<Vec<Hospital>> = Lazy::new(|| {
    vec![
        gov(
            "h1",
            "CityCare General Hospital",
            "12 Park Ave, Midtown",
            "+1 (555) 011-2001",
            17.4413,
            78.3915,
            &["ICU", "Trauma", "Cardiology", "Labour", "Ventilator"],
            (150, 24, 6),
            (5, 3, 12, 2),
            4.5,
        ),
        gov(
            "h2",
            "GreenCross Medical Center",
            "88 Riverside Rd, West End",
            "+1 (555) 011-2002",
            17.4421,
            78.4631,
            &["ICU", "Trauma", "Pediatrics", "Labour"],
            (90, 12, 3),
            (3, 1, 7, 3),
            4.1,
        ),
        gov(
            "h3",
            "Sunrise Specialty Hospital",
            "5 Hillcrest Blvd, East Side",
            "+1 (555) 011-2003",
            17.4082,
            78.4983,
            &["ICU", "Cardiology", "Ventilator"],
            (120, 34, 10),
            (4, 4, 9, 1),
            4.7,
        ),
        gov(
            "h4",
            "Lakeside Children & Trauma",
            "42 Lake Rd, North Quarter",
            "+1 (555) 011-2004",
            17.4804,
            78.3999,
            &["Trauma", "Pediatrics", "Labour"],
            (60, 18, 2),
            (2, 0, 6, 5),
            4.0,
        ),
        gov(
            "h5",
            "Metro Heart Institute",
            "210 Central Ave, Downtown",
            "+1 (555) 011-2005",
            17.4218,
            78.4501,
            &["ICU", "Cardiology", "Ventilator"],
            (110, 6, 1),
            (3, 6, 8, 0),
            4.6,
        ),
        gov(
            "h6",
            "Riverbend Community Hospital",
            "9 Old Mill St, Riverbend",
            "+1 (555) 011-2006",
            17.3659,
            78.4422,
            &["General", "Pediatrics", "Labour"],
            (80, 27, 0),
            (2, 0, 10, 2),
            3.9,
        ),
        branch(
            "ap1",
            "Apollo Health City Jubilee Hills",
            "Jubilee Hills, Hyderabad",
            17.4327,
            78.4070,
            14,
            3,
            4.6,
        ),
        branch(
            "ap2",
            "Apollo Hospital Secunderabad",
            "Secunderabad",
            17.4410,
            78.4983,
            8,
            1,
            4.4,
        ),
        branch(
            "ap3",
            "Apollo DRDO",
            "Kanchanbagh",
            17.3308,
            78.5247,
            21,
            4,
            4.2,
        ),
    ]
});

#[derive(Default)]
pub struct HospitalDirectory;

impl HospitalDirectory {
    pub fn new() -> Self {
        Self
    }

    /// All records of a network, in roster order.
    pub fn list(&self, network: Network) -> Vec<&'static Hospital> {
        HOSPITALS.iter().filter(|h| h.network == network).collect()
    }

    /// Lookup by id across both networks.
    pub fn get(&self, id: &str) -> Option<&'static Hospital> {
        HOSPITALS.iter().find(|h| h.id == id)
    }

    /// Filter and sort one network's roster.
    pub fn query(&self, query: &DirectoryQuery) -> Vec<RankedHospital> {
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut results: Vec<RankedHospital> = HOSPITALS
            .iter()
            .filter(|h| h.network == query.network)
            .filter(|h| match &search {
                Some(s) => {
                    h.name.to_lowercase().contains(s) || h.address.to_lowercase().contains(s)
                }
                None => true,
            })
            .filter(|h| h.beds.available >= query.min_beds)
            .filter(|h| {
                query
                    .facilities
                    .iter()
                    .all(|f| h.facilities.iter().any(|have| have == f))
            })
            .map(|h| RankedHospital {
                hospital: h.clone(),
                distance_km: distance_km(query.origin, h.coordinates),
            })
            .collect();

        match query.sort {
            SortKey::Distance => results.sort_by(|a, b| {
                a.distance_km
                    .total_cmp(&b.distance_km)
                    .then_with(|| a.hospital.name.cmp(&b.hospital.name))
            }),
            SortKey::Availability => {
                results.sort_by(|a, b| b.hospital.beds.available.cmp(&a.hospital.beds.available))
            }
            SortKey::Rating => {
                results.sort_by(|a, b| b.hospital.rating.total_cmp(&a.hospital.rating))
            }
            SortKey::Name => results.sort_by(|a, b| a.hospital.name.cmp(&b.hospital.name)),
        }

        results
    }
}
