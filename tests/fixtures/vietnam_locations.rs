//! Real Hanoi and Da Nang places for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use itinerary_optimizer::category::Category;

/// A named place with coordinates and the category a draft would give it.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lon: f64, category: Category) -> Self {
        Self { name, lat, lon, category }
    }
}

// ============================================================================
// Hanoi sights
// ============================================================================

pub const HOAN_KIEM_LAKE: Place = Place::new("Hoan Kiem Lake", 21.0287, 105.8524, Category::Lake);
pub const TEMPLE_OF_LITERATURE: Place = Place::new("Temple of Literature", 21.0277, 105.8355, Category::Historic);
pub const HO_CHI_MINH_MAUSOLEUM: Place = Place::new("Ho Chi Minh Mausoleum", 21.0368, 105.8346, Category::Monument);
pub const ONE_PILLAR_PAGODA: Place = Place::new("One Pillar Pagoda", 21.0359, 105.8336, Category::Historic);
pub const TRAN_QUOC_PAGODA: Place = Place::new("Tran Quoc Pagoda", 21.0480, 105.8368, Category::Historic);
pub const THONG_NHAT_PARK: Place = Place::new("Thong Nhat Park", 21.0147, 105.8441, Category::Park);
pub const WATER_PUPPET_THEATRE: Place =
    Place::new("Thang Long Water Puppet Theatre", 21.0318, 105.8531, Category::Theater);
pub const DONG_XUAN_MARKET: Place = Place::new("Dong Xuan Market", 21.0380, 105.8497, Category::Shopping);

pub const HANOI_MUSEUMS: &[Place] = &[
    Place::new("Vietnam Museum of Ethnology", 21.0405, 105.7986, Category::Museum),
    Place::new("National Museum of Vietnamese History", 21.0245, 105.8597, Category::Museum),
    Place::new("Hoa Lo Prison", 21.0253, 105.8463, Category::Museum),
    Place::new("Vietnam Fine Arts Museum", 21.0305, 105.8370, Category::Museum),
];

// ============================================================================
// Hanoi food
// ============================================================================

pub const CAFE_GIANG: Place = Place::new("Cafe Giang", 21.0335, 105.8547, Category::Cafe);
pub const BUN_CHA_HUONG_LIEN: Place = Place::new("Bun Cha Huong Lien", 21.0183, 105.8538, Category::Restaurant);
pub const CHA_CA_THANG_LONG: Place = Place::new("Cha Ca Thang Long", 21.0318, 105.8471, Category::Restaurant);
pub const PHO_THIN: Place = Place::new("Pho Thin", 21.0163, 105.8585, Category::Restaurant);

// ============================================================================
// Da Nang
// ============================================================================

pub const DRAGON_BRIDGE: Place = Place::new("Dragon Bridge", 16.0612, 108.2275, Category::Monument);
pub const MY_KHE_BEACH: Place = Place::new("My Khe Beach", 16.0544, 108.2478, Category::Beach);
pub const MARBLE_MOUNTAINS: Place = Place::new("Marble Mountains", 16.0037, 108.2632, Category::Mountain);
pub const CHAM_MUSEUM: Place = Place::new("Museum of Cham Sculpture", 16.0605, 108.2234, Category::Museum);
pub const HAN_MARKET: Place = Place::new("Han Market", 16.0683, 108.2243, Category::Shopping);
pub const BA_NA_HILLS: Place = Place::new("Ba Na Hills", 15.9977, 107.9960, Category::ThemePark);
