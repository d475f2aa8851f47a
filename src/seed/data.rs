//! Fixed development dataset.
//!
//! Cross references are positional: `buyer`/`seller` index into the users of that role in
//! [`USERS`] order, `listing` indexes into [`LISTINGS`] (which pairs with [`CARS`]).

use crate::entities::car::{FuelType, Transmission};
use crate::entities::car_listing::ListingStatus;
use crate::entities::document::DocumentValue;
use crate::entities::report::{ReportReason, ReportStatus};
use crate::entities::user::Role;

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

pub struct UserSeed {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: Role,
    pub phone_number: &'static str,
}

#[rustfmt::skip]
pub const USERS: [UserSeed; 10] = [
    UserSeed { username: "admin_user", email: "admin@carzone.com", first_name: "Admin", last_name: "User", role: Role::Admin, phone_number: "+1234567890" },
    UserSeed { username: "john_buyer", email: "john.buyer@email.com", first_name: "John", last_name: "Smith", role: Role::Buyer, phone_number: "+1234567891" },
    UserSeed { username: "jane_buyer", email: "jane.buyer@email.com", first_name: "Jane", last_name: "Doe", role: Role::Buyer, phone_number: "+1234567892" },
    UserSeed { username: "mike_buyer", email: "mike.buyer@email.com", first_name: "Mike", last_name: "Johnson", role: Role::Buyer, phone_number: "+1234567893" },
    UserSeed { username: "sarah_buyer", email: "sarah.buyer@email.com", first_name: "Sarah", last_name: "Wilson", role: Role::Buyer, phone_number: "+1234567894" },
    UserSeed { username: "ace_motors", email: "contact@acemotors.com", first_name: "David", last_name: "Miller", role: Role::Seller, phone_number: "+1234567895" },
    UserSeed { username: "premium_cars", email: "sales@premiumcars.com", first_name: "Lisa", last_name: "Anderson", role: Role::Seller, phone_number: "+1234567896" },
    UserSeed { username: "city_auto", email: "info@cityauto.com", first_name: "Robert", last_name: "Brown", role: Role::Seller, phone_number: "+1234567897" },
    UserSeed { username: "luxury_motors", email: "hello@luxurymotors.com", first_name: "Emma", last_name: "Davis", role: Role::Seller, phone_number: "+1234567898" },
    UserSeed { username: "budget_cars", email: "contact@budgetcars.com", first_name: "Tom", last_name: "Garcia", role: Role::Seller, phone_number: "+1234567899" },
];

/// A saved-search value as it appears in the fixture.
#[derive(Clone, Copy)]
pub enum Scalar {
    Text(&'static str),
    Int(i64),
}

impl From<Scalar> for DocumentValue {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s.into(),
            Scalar::Int(n) => n.into(),
        }
    }
}

/// Saved searches for buyers in order. There are more entries than buyers; extras are unused.
#[rustfmt::skip]
pub const BUYER_SEARCHES: [&[(&str, Scalar)]; 5] = [
    &[("make", Scalar::Text("Toyota")), ("max_price", Scalar::Int(30_000)), ("location", Scalar::Text("New York"))],
    &[("fuel_type", Scalar::Text("electric")), ("max_price", Scalar::Int(50_000)), ("location", Scalar::Text("California"))],
    &[("transmission", Scalar::Text("manual")), ("max_price", Scalar::Int(25_000)), ("location", Scalar::Text("Texas"))],
    &[("make", Scalar::Text("BMW")), ("min_year", Scalar::Int(2018)), ("location", Scalar::Text("Florida"))],
    &[("make", Scalar::Text("Honda")), ("max_mileage", Scalar::Int(50_000)), ("location", Scalar::Text("Illinois"))],
];

/// `(company_name, rating)` for sellers in order.
pub const SELLER_PROFILES: [(&str, f64); 5] = [
    ("Ace Motors LLC", 4.8),
    ("Premium Cars Inc", 4.5),
    ("City Auto Sales", 4.2),
    ("Luxury Motors Group", 4.9),
    ("Budget Cars Direct", 4.0),
];

pub struct CarSeed {
    pub make: &'static str,
    pub model: &'static str,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub color: &'static str,
    pub engine_size: &'static str,
}

#[rustfmt::skip]
pub const CARS: [CarSeed; 10] = [
    CarSeed { make: "Toyota", model: "Camry", year: 2020, mileage: 25_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Silver", engine_size: "2.5L" },
    CarSeed { make: "Honda", model: "Civic", year: 2019, mileage: 30_000, fuel_type: FuelType::Petrol, transmission: Transmission::Manual, color: "Blue", engine_size: "1.5L" },
    CarSeed { make: "BMW", model: "3 Series", year: 2021, mileage: 15_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Black", engine_size: "2.0L" },
    CarSeed { make: "Tesla", model: "Model 3", year: 2022, mileage: 10_000, fuel_type: FuelType::Electric, transmission: Transmission::Automatic, color: "White", engine_size: "Electric" },
    CarSeed { make: "Ford", model: "F-150", year: 2020, mileage: 35_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Red", engine_size: "5.0L" },
    CarSeed { make: "Mercedes-Benz", model: "C-Class", year: 2021, mileage: 18_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Gray", engine_size: "2.0L" },
    CarSeed { make: "Audi", model: "A4", year: 2019, mileage: 28_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "White", engine_size: "2.0L" },
    CarSeed { make: "Nissan", model: "Altima", year: 2020, mileage: 22_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Black", engine_size: "2.5L" },
    CarSeed { make: "Hyundai", model: "Elantra", year: 2021, mileage: 12_000, fuel_type: FuelType::Petrol, transmission: Transmission::Manual, color: "Silver", engine_size: "2.0L" },
    CarSeed { make: "Volkswagen", model: "Jetta", year: 2019, mileage: 32_000, fuel_type: FuelType::Petrol, transmission: Transmission::Automatic, color: "Blue", engine_size: "1.4L" },
];

/// Listing `i` offers `CARS[i]` and is sold by seller `i % sellers`.
pub struct ListingSeed {
    pub price_cents: i64,
    pub description: &'static str,
    pub location: &'static str,
    pub status: ListingStatus,
    pub views: i64,
}

#[rustfmt::skip]
pub const LISTINGS: [ListingSeed; 10] = [
    ListingSeed { price_cents: 2_850_000, description: "Excellent condition Toyota Camry with low mileage. Well-maintained, single owner.", location: "New York, NY", status: ListingStatus::Available, views: 45 },
    ListingSeed { price_cents: 2_200_000, description: "Reliable Honda Civic, perfect for city driving. Manual transmission, fuel efficient.", location: "Los Angeles, CA", status: ListingStatus::Available, views: 32 },
    ListingSeed { price_cents: 3_500_000, description: "Luxury BMW 3 Series in pristine condition. All service records available.", location: "Chicago, IL", status: ListingStatus::Available, views: 67 },
    ListingSeed { price_cents: 4_200_000, description: "Tesla Model 3 with autopilot, supercharger included. Like new condition.", location: "San Francisco, CA", status: ListingStatus::Available, views: 89 },
    ListingSeed { price_cents: 3_800_000, description: "Ford F-150 truck, perfect for work or family. Powerful V8 engine.", location: "Houston, TX", status: ListingStatus::Sold, views: 54 },
    ListingSeed { price_cents: 4_500_000, description: "Mercedes-Benz C-Class sedan with premium package. Exceptional luxury.", location: "Miami, FL", status: ListingStatus::Available, views: 76 },
    ListingSeed { price_cents: 3_200_000, description: "Audi A4 quattro with all-wheel drive. Perfect for all weather conditions.", location: "Denver, CO", status: ListingStatus::Pending, views: 41 },
    ListingSeed { price_cents: 2_500_000, description: "Nissan Altima sedan, comfortable and reliable. Great value for money.", location: "Phoenix, AZ", status: ListingStatus::Available, views: 28 },
    ListingSeed { price_cents: 2_350_000, description: "Hyundai Elantra with excellent warranty coverage. Low mileage, great condition.", location: "Seattle, WA", status: ListingStatus::Available, views: 36 },
    ListingSeed { price_cents: 2_100_000, description: "Volkswagen Jetta with turbocharged engine. Fun to drive, German engineering.", location: "Boston, MA", status: ListingStatus::Available, views: 29 },
];

/// `(buyer, listing)` pairs.
pub const FAVORITES: [(usize, usize); 8] = [
    (0, 0),
    (0, 2),
    (1, 3),
    (1, 5),
    (2, 1),
    (2, 6),
    (3, 3),
    (3, 8),
];

/// Buyer-to-seller messages.
pub struct MessageSeed {
    pub buyer: usize,
    pub seller: usize,
    pub listing: usize,
    pub content: &'static str,
    pub is_read: bool,
}

#[rustfmt::skip]
pub const MESSAGES: [MessageSeed; 8] = [
    MessageSeed { buyer: 0, seller: 0, listing: 0, content: "Hi, I'm very interested in your Toyota Camry. Is it still available? Can we schedule a test drive?", is_read: true },
    MessageSeed { buyer: 0, seller: 0, listing: 0, content: "Yes, the Camry is still available! I'd be happy to arrange a test drive. When would be convenient for you?", is_read: false },
    MessageSeed { buyer: 1, seller: 3, listing: 3, content: "I love the Tesla Model 3! What's included with the purchase? Does it have the premium interior package?", is_read: true },
    MessageSeed { buyer: 2, seller: 1, listing: 1, content: "Is the Honda Civic's manual transmission in good condition? Any recent repairs?", is_read: true },
    MessageSeed { buyer: 3, seller: 4, listing: 8, content: "The Hyundai Elantra looks perfect for my needs. What's your best price?", is_read: false },
    MessageSeed { buyer: 0, seller: 2, listing: 2, content: "Beautiful BMW! Can you provide the maintenance history?", is_read: true },
    MessageSeed { buyer: 1, seller: 3, listing: 5, content: "Interested in the Mercedes C-Class. Can we negotiate on the price?", is_read: false },
    MessageSeed { buyer: 2, seller: 2, listing: 6, content: "The Audi A4 is exactly what I'm looking for. Is financing available?", is_read: true },
];

/// What a seeded report points at.
#[derive(Clone, Copy)]
pub enum SeedTarget {
    Listing(usize),
    Seller(usize),
}

pub struct ReportSeed {
    pub buyer: usize,
    pub target: SeedTarget,
    pub reason: ReportReason,
    pub description: &'static str,
    pub status: ReportStatus,
}

#[rustfmt::skip]
pub const REPORTS: [ReportSeed; 5] = [
    ReportSeed { buyer: 0, target: SeedTarget::Listing(4), reason: ReportReason::Fake, description: "This listing shows as available but I called and they said it was sold weeks ago.", status: ReportStatus::Pending },
    ReportSeed { buyer: 1, target: SeedTarget::Seller(4), reason: ReportReason::Scam, description: "This seller asked for payment before showing the car. Very suspicious behavior.", status: ReportStatus::Reviewed },
    ReportSeed { buyer: 2, target: SeedTarget::Listing(7), reason: ReportReason::Inappropriate, description: "The description contains misleading information about the car's condition.", status: ReportStatus::Resolved },
    ReportSeed { buyer: 3, target: SeedTarget::Listing(9), reason: ReportReason::Spam, description: "This looks like a duplicate listing with slightly different prices.", status: ReportStatus::Pending },
    ReportSeed { buyer: 0, target: SeedTarget::Seller(2), reason: ReportReason::Other, description: "Seller was very rude and unprofessional during our phone conversation.", status: ReportStatus::Dismissed },
];

/// Days of analytics, ending today.
pub const ANALYTICS_DAYS: u32 = 7;

/// `(term, base count)`; day `i` back from today adds `i` to each count.
pub const SEARCH_TERMS: [(&str, u64); 5] = [
    ("toyota", 15),
    ("honda", 12),
    ("bmw", 8),
    ("tesla", 10),
    ("mercedes", 6),
];

pub const TOP_MODELS: [(&str, u64); 5] = [
    ("Toyota Camry", 25),
    ("Honda Civic", 20),
    ("BMW 3 Series", 18),
    ("Tesla Model 3", 22),
    ("Mercedes C-Class", 15),
];

pub const POPULAR_LOCATIONS: [(&str, u64); 5] = [
    ("New York", 5),
    ("Los Angeles", 4),
    ("Chicago", 3),
    ("San Francisco", 4),
    ("Houston", 2),
];

/// Search `i` is anonymous when `i % 3 == 0`, otherwise by `USERS[i % USERS.len()]`.
pub const SEARCH_QUERIES: [&str; 15] = [
    "Toyota Camry 2020",
    "Honda Civic manual",
    "BMW under 40000",
    "Tesla Model 3",
    "Mercedes luxury sedan",
    "Ford truck 2020",
    "Audi A4 quattro",
    "Nissan reliable car",
    "Hyundai warranty",
    "Volkswagen turbo",
    "electric cars",
    "manual transmission",
    "low mileage cars",
    "luxury sedans",
    "SUV family car",
];

pub const SEARCH_IPS: [&str; 8] = [
    "192.168.1.100",
    "192.168.1.101",
    "192.168.1.102",
    "192.168.1.103",
    "192.168.1.104",
    "10.0.0.100",
    "10.0.0.101",
    "172.16.0.100",
];
