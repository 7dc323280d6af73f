//! Amenity catalogs offered as checkboxes on the listing forms.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenityCategory {
    pub key: &'static str,
    pub title: &'static str,
    pub amenities: &'static [&'static str],
}

pub const AMENITY_CATEGORIES: &[AmenityCategory] = &[
    AmenityCategory {
        key: "essentials",
        title: "Essentials",
        amenities: &["WiFi", "Heating", "Air Conditioning", "Parking", "Kitchen Access"],
    },
    AmenityCategory {
        key: "appliances",
        title: "Appliances",
        amenities: &["Washer", "Dryer", "Dishwasher", "Microwave", "Refrigerator"],
    },
    AmenityCategory {
        key: "accessibility",
        title: "Accessibility",
        amenities: &["Wheelchair Access", "Elevator", "Ground Floor Access"],
    },
    AmenityCategory {
        key: "policies",
        title: "Policies",
        amenities: &["Pets Allowed", "Smoking Allowed"],
    },
];

pub const PETS_ALLOWED: &str = "Pets Allowed";
pub const SMOKING_ALLOWED: &str = "Smoking Allowed";

/// Amenities a search can ask for.
pub const SEARCH_AMENITIES: &[&str] = &[
    "WiFi",
    "Kitchen Access",
    "Washing Machine",
    "Air Conditioning",
    "Heating",
    "Parking",
    "Balcony/Terrace",
    "Garden",
    "Elevator",
    "Pet Friendly",
    "Gym Access",
    "Swimming Pool",
    "Dishwasher",
    "TV",
    "Workspace/Desk",
    "Near Public Transport",
];

/// Every property amenity, in category order.
pub fn all_amenities() -> impl Iterator<Item = &'static str> {
    AMENITY_CATEGORIES.iter().flat_map(|c| c.amenities.iter().copied())
}

pub fn category_of(amenity: &str) -> Option<&'static AmenityCategory> {
    AMENITY_CATEGORIES.iter().find(|c| c.amenities.contains(&amenity))
}
