//! Activity categories and the lookup tables keyed on them.
//!
//! Draft sources send free-form labels ("Restaurant", "nhà hàng", "coffee shop").
//! They are folded into [`Category`] once at the boundary; every table below is
//! an exhaustive match so a new variant cannot silently fall through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Category {
    Accommodation,
    Hotel,
    Hostel,
    Apartment,
    Food,
    Restaurant,
    Cafe,
    Bar,
    FastFood,
    Bakery,
    StreetFood,
    FineDining,
    Dessert,
    Attraction,
    Museum,
    ArtGallery,
    Park,
    Monument,
    Historic,
    Zoo,
    ThemePark,
    Beach,
    Mountain,
    Lake,
    Cultural,
    Sightseeing,
    Tour,
    Entertainment,
    Theater,
    Cinema,
    Shopping,
    Nightlife,
    Transport,
    Taxi,
    Bus,
    Train,
    Subway,
    /// Synthetic segment inserted by the scheduler between two stops.
    Travel,
    Other,
}

/// Spending bucket used by the budget split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBucket {
    Accommodation,
    Food,
    Attractions,
    Transportation,
    Other,
}

impl BudgetBucket {
    pub const ALL: [BudgetBucket; 5] = [
        BudgetBucket::Accommodation,
        BudgetBucket::Food,
        BudgetBucket::Attractions,
        BudgetBucket::Transportation,
        BudgetBucket::Other,
    ];
}

/// How an activity's price grows with the size of the travelling party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingRegime {
    /// One ticket mostly covers the group (museums, parks).
    Group,
    /// Everyone pays their own (meals, beds).
    Individual,
    /// Shared vehicle or guide with per-head extras.
    Mixed,
    Unclassified,
}

/// Exposure to the weather while doing the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    Indoor,
    Outdoor,
    /// Neither (lodging, transfers); never reshuffled for weather.
    Neutral,
}

impl Category {
    /// Folds a free-form label into a category. Unknown labels become `Other`.
    pub fn from_label(raw: &str) -> Category {
        let label = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match label.as_str() {
            "accommodation" | "lodging" | "stay" | "chỗ_ở" | "lưu_trú" => Category::Accommodation,
            "hotel" | "resort" | "khách_sạn" => Category::Hotel,
            "hostel" | "homestay" | "nhà_nghỉ" => Category::Hostel,
            "apartment" | "căn_hộ" => Category::Apartment,
            "food" | "meal" | "dining" | "ăn_uống" | "ẩm_thực" => Category::Food,
            "restaurant" | "nhà_hàng" => Category::Restaurant,
            "cafe" | "café" | "coffee" | "coffee_shop" | "cà_phê" | "quán_cà_phê" => Category::Cafe,
            "bar" | "pub" | "quán_bar" => Category::Bar,
            "fast_food" | "fastfood" => Category::FastFood,
            "bakery" | "tiệm_bánh" => Category::Bakery,
            "street_food" | "ẩm_thực_đường_phố" => Category::StreetFood,
            "fine_dining" => Category::FineDining,
            "dessert" | "ice_cream" | "tráng_miệng" => Category::Dessert,
            "attraction" | "tham_quan" => Category::Attraction,
            "museum" | "bảo_tàng" => Category::Museum,
            "art_gallery" | "gallery" | "phòng_tranh" => Category::ArtGallery,
            "park" | "garden" | "công_viên" => Category::Park,
            "monument" | "landmark" | "đài_tưởng_niệm" => Category::Monument,
            "historic" | "historical" | "heritage" | "temple" | "pagoda" | "di_tích" | "chùa" => {
                Category::Historic
            }
            "zoo" | "sở_thú" => Category::Zoo,
            "theme_park" | "amusement_park" | "công_viên_giải_trí" => Category::ThemePark,
            "beach" | "bãi_biển" | "biển" => Category::Beach,
            "mountain" | "hiking" | "núi" => Category::Mountain,
            "lake" | "hồ" => Category::Lake,
            "cultural" | "culture" | "văn_hóa" => Category::Cultural,
            "sightseeing" | "ngắm_cảnh" => Category::Sightseeing,
            "tour" | "guided_tour" => Category::Tour,
            "entertainment" | "giải_trí" => Category::Entertainment,
            "theater" | "theatre" | "nhà_hát" => Category::Theater,
            "cinema" | "movie" | "rạp_chiếu_phim" => Category::Cinema,
            "shopping" | "mall" | "market" | "mua_sắm" | "chợ" => Category::Shopping,
            "nightlife" => Category::Nightlife,
            "transport" | "transportation" | "giao_thông" => Category::Transport,
            "taxi" | "grab" => Category::Taxi,
            "bus" | "xe_buýt" => Category::Bus,
            "train" | "tàu_hỏa" => Category::Train,
            "subway" | "metro" => Category::Subway,
            "travel" | "di_chuyển" => Category::Travel,
            _ => Category::Other,
        }
    }

    pub fn is_travel(self) -> bool {
        self == Category::Travel
    }

    /// Per-person base price in VND before destination and season factors.
    pub fn base_cost(self) -> i64 {
        match self {
            Category::Hotel => 800_000,
            Category::Hostel => 200_000,
            Category::Apartment => 600_000,
            Category::Restaurant => 150_000,
            Category::Cafe => 50_000,
            Category::Bar => 200_000,
            Category::FastFood => 80_000,
            Category::Bakery => 50_000,
            Category::StreetFood => 40_000,
            Category::FineDining => 500_000,
            Category::Dessert => 50_000,
            Category::Museum => 100_000,
            Category::ArtGallery => 80_000,
            Category::Park => 20_000,
            Category::Monument => 50_000,
            Category::Historic => 100_000,
            Category::Zoo => 150_000,
            Category::ThemePark => 300_000,
            Category::Beach | Category::Lake => 0,
            Category::Mountain => 50_000,
            Category::Travel => 100_000,
            Category::Taxi => 150_000,
            Category::Bus | Category::Subway => 30_000,
            Category::Train => 80_000,
            Category::Shopping | Category::Entertainment => 200_000,
            Category::Accommodation
            | Category::Food
            | Category::Attraction
            | Category::Cultural
            | Category::Sightseeing
            | Category::Tour
            | Category::Theater
            | Category::Cinema
            | Category::Nightlife
            | Category::Transport
            | Category::Other => 100_000,
        }
    }

    pub fn scaling_regime(self) -> ScalingRegime {
        match self {
            Category::Museum
            | Category::ArtGallery
            | Category::Park
            | Category::Historic
            | Category::Entertainment
            | Category::Cultural => ScalingRegime::Group,
            Category::Accommodation
            | Category::Hotel
            | Category::Hostel
            | Category::Food
            | Category::Restaurant
            | Category::Cafe
            | Category::StreetFood
            | Category::FastFood
            | Category::FineDining => ScalingRegime::Individual,
            Category::Travel | Category::Taxi | Category::Transport | Category::Tour => {
                ScalingRegime::Mixed
            }
            _ => ScalingRegime::Unclassified,
        }
    }

    pub fn budget_bucket(self) -> BudgetBucket {
        match self {
            Category::Accommodation | Category::Hotel | Category::Hostel | Category::Apartment => {
                BudgetBucket::Accommodation
            }
            Category::Food
            | Category::Restaurant
            | Category::Cafe
            | Category::Bar
            | Category::FastFood
            | Category::Bakery
            | Category::StreetFood
            | Category::FineDining
            | Category::Dessert => BudgetBucket::Food,
            Category::Attraction
            | Category::Museum
            | Category::ArtGallery
            | Category::Park
            | Category::Monument
            | Category::Historic
            | Category::Zoo
            | Category::ThemePark
            | Category::Beach
            | Category::Mountain
            | Category::Lake
            | Category::Cultural
            | Category::Sightseeing => BudgetBucket::Attractions,
            Category::Transport
            | Category::Taxi
            | Category::Bus
            | Category::Train
            | Category::Subway
            | Category::Travel => BudgetBucket::Transportation,
            Category::Tour
            | Category::Entertainment
            | Category::Theater
            | Category::Cinema
            | Category::Shopping
            | Category::Nightlife
            | Category::Other => BudgetBucket::Other,
        }
    }

    pub fn exposure(self) -> Exposure {
        match self {
            Category::Museum
            | Category::ArtGallery
            | Category::Theater
            | Category::Cinema
            | Category::Shopping
            | Category::Restaurant
            | Category::Cafe
            | Category::Bar
            | Category::FastFood
            | Category::Bakery
            | Category::FineDining
            | Category::Dessert => Exposure::Indoor,
            Category::Park
            | Category::Monument
            | Category::Historic
            | Category::Zoo
            | Category::ThemePark
            | Category::Beach
            | Category::Mountain
            | Category::Lake
            | Category::StreetFood
            | Category::Cultural
            | Category::Sightseeing => Exposure::Outdoor,
            _ => Exposure::Neutral,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::from_label(&raw)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}
