//! Seeded catalog: sarees and the reference tables the filters are built from.

use serde::Serialize;

use crate::domain::aggregates::{Product, Specifications};
use crate::domain::value_objects::{Price, ProductId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Category { pub id: &'static str, pub name: &'static str, pub count: u32 }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColorSwatch { pub id: &'static str, pub name: &'static str, pub hex: &'static str }

/// A preset price band. `max: None` means no upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceBand { pub id: &'static str, pub label: &'static str, pub min: Price, pub max: Option<Price> }

pub const CATEGORIES: &[Category] = &[
    Category { id: "silk", name: "Silk Sarees", count: 156 },
    Category { id: "cotton", name: "Cotton Sarees", count: 98 },
    Category { id: "georgette", name: "Georgette Sarees", count: 67 },
    Category { id: "chiffon", name: "Chiffon Sarees", count: 45 },
    Category { id: "net", name: "Net Sarees", count: 34 },
    Category { id: "designer", name: "Designer Sarees", count: 89 },
];

pub const COLORS: &[ColorSwatch] = &[
    ColorSwatch { id: "red", name: "Red", hex: "#DC2626" },
    ColorSwatch { id: "blue", name: "Blue", hex: "#2563EB" },
    ColorSwatch { id: "green", name: "Green", hex: "#16A34A" },
    ColorSwatch { id: "yellow", name: "Yellow", hex: "#CA8A04" },
    ColorSwatch { id: "purple", name: "Purple", hex: "#9333EA" },
    ColorSwatch { id: "pink", name: "Pink", hex: "#EC4899" },
    ColorSwatch { id: "orange", name: "Orange", hex: "#EA580C" },
    ColorSwatch { id: "black", name: "Black", hex: "#000000" },
    ColorSwatch { id: "white", name: "White", hex: "#FFFFFF" },
    ColorSwatch { id: "gold", name: "Gold", hex: "#F59E0B" },
];

pub const PRICE_BANDS: &[PriceBand] = &[
    PriceBand { id: "under-5k", label: "Under ₹5,000", min: Price::new(0), max: Some(Price::new(5_000)) },
    PriceBand { id: "5k-10k", label: "₹5,000 - ₹10,000", min: Price::new(5_000), max: Some(Price::new(10_000)) },
    PriceBand { id: "10k-20k", label: "₹10,000 - ₹20,000", min: Price::new(10_000), max: Some(Price::new(20_000)) },
    PriceBand { id: "20k-50k", label: "₹20,000 - ₹50,000", min: Price::new(20_000), max: Some(Price::new(50_000)) },
    PriceBand { id: "above-50k", label: "Above ₹50,000", min: Price::new(50_000), max: None },
];

struct Seed {
    id: u32,
    name: &'static str,
    price: i64,
    mrp: Option<i64>,
    fabric: &'static str,
    color: &'static str,
    category: &'static str,
    subcategory: &'static str,
    rating: f32,
    reviews: u32,
    is_new: bool,
    stock: u32,
    tags: &'static [&'static str],
    weave: &'static str,
    origin: &'static str,
    care: &'static [&'static str],
    description: &'static str,
}

const DRY_CLEAN: &[&str] = &["Dry clean only", "Store in cotton cloth", "Avoid direct sunlight"];
const GENTLE_WASH: &[&str] = &["Gentle hand wash", "Dry in shade", "Iron on low heat"];
const MACHINE_WASH: &[&str] = &["Machine washable", "Iron on high heat", "Tumble dry"];

const SEEDS: &[Seed] = &[
    Seed { id: 1, name: "Royal Emerald Silk Saree", price: 15999, mrp: Some(19999), fabric: "Pure Silk", color: "Emerald Green", category: "silk", subcategory: "banarasi", rating: 4.8, reviews: 124, is_new: true, stock: 15, tags: &["wedding", "festive", "traditional", "handwoven"], weave: "Banarasi Handloom", origin: "Varanasi, Uttar Pradesh", care: DRY_CLEAN, description: "Emerald green silk saree with intricate golden zari work in the Banarasi tradition." },
    Seed { id: 2, name: "Purple Banarasi Heritage", price: 12999, mrp: Some(15999), fabric: "Banarasi Silk", color: "Royal Purple", category: "silk", subcategory: "banarasi", rating: 4.9, reviews: 89, is_new: false, stock: 8, tags: &["wedding", "heritage", "silver-zari"], weave: "Banarasi Handloom", origin: "Varanasi, Uttar Pradesh", care: DRY_CLEAN, description: "Rich purple Banarasi silk with traditional motifs and silver zari work." },
    Seed { id: 3, name: "Golden Kanjivaram Classic", price: 18999, mrp: Some(22999), fabric: "Kanjivaram Silk", color: "Golden Yellow", category: "silk", subcategory: "kanjivaram", rating: 4.7, reviews: 156, is_new: true, stock: 0, tags: &["bridal", "temple-border", "traditional"], weave: "Kanjivaram Handloom", origin: "Kanchipuram, Tamil Nadu", care: DRY_CLEAN, description: "Classic golden Kanjivaram with a contrast temple border." },
    Seed { id: 4, name: "Coral Pink Georgette Elegance", price: 8999, mrp: Some(11999), fabric: "Pure Georgette", color: "Coral Pink", category: "georgette", subcategory: "party-wear", rating: 4.6, reviews: 67, is_new: false, stock: 25, tags: &["party", "lightweight", "embroidered"], weave: "Machine embroidered", origin: "Surat, Gujarat", care: GENTLE_WASH, description: "Flowing coral georgette with sequin and thread embroidery." },
    Seed { id: 5, name: "Midnight Blue Chiffon Dream", price: 6999, mrp: None, fabric: "Pure Chiffon", color: "Midnight Blue", category: "chiffon", subcategory: "casual", rating: 4.5, reviews: 43, is_new: false, stock: 18, tags: &["evening", "casual", "lightweight"], weave: "Printed chiffon", origin: "Mumbai, Maharashtra", care: GENTLE_WASH, description: "Midnight blue chiffon with a subtle silver print for evening wear." },
    Seed { id: 6, name: "Crimson Red Designer Net", price: 14999, mrp: Some(17999), fabric: "Designer Net", color: "Crimson Red", category: "net", subcategory: "designer", rating: 4.8, reviews: 78, is_new: true, stock: 5, tags: &["reception", "designer", "stone-work"], weave: "Net with stone work", origin: "Delhi", care: DRY_CLEAN, description: "Crimson net saree with hand-placed stone and cutdana work." },
    Seed { id: 7, name: "Sage Green Cotton Handloom", price: 4999, mrp: None, fabric: "Handloom Cotton", color: "Sage Green", category: "cotton", subcategory: "handloom", rating: 4.4, reviews: 92, is_new: false, stock: 35, tags: &["daily-wear", "office", "comfortable", "handloom", "eco-friendly"], weave: "Pochampally Ikat", origin: "Pochampally, Telangana", care: MACHINE_WASH, description: "Breathable sage cotton handloom with ikat borders for everyday wear." },
    Seed { id: 8, name: "Ivory White Designer Lehenga Saree", price: 24999, mrp: Some(29999), fabric: "Silk Blend", color: "Ivory White", category: "designer", subcategory: "lehenga-saree", rating: 4.9, reviews: 45, is_new: true, stock: 3, tags: &["bridal", "designer", "luxury", "wedding", "reception"], weave: "Designer embroidered", origin: "Mumbai, Maharashtra", care: DRY_CLEAN, description: "Ivory lehenga-style saree with pearl and crystal work and pre-stitched pleats." },
    Seed { id: 9, name: "Maroon Kanjivaram Bridal", price: 21999, mrp: Some(25999), fabric: "Kanjivaram Silk", color: "Maroon Red", category: "silk", subcategory: "kanjivaram", rating: 4.9, reviews: 64, is_new: false, stock: 6, tags: &["bridal", "wedding", "gold-zari"], weave: "Kanjivaram Handloom", origin: "Kanchipuram, Tamil Nadu", care: DRY_CLEAN, description: "Deep maroon bridal Kanjivaram with a broad gold zari pallu." },
    Seed { id: 10, name: "Peacock Blue Mysore Silk", price: 9999, mrp: None, fabric: "Mysore Silk", color: "Peacock Blue", category: "silk", subcategory: "mysore", rating: 4.6, reviews: 51, is_new: true, stock: 12, tags: &["festive", "lightweight", "crepe"], weave: "Crepe silk", origin: "Mysuru, Karnataka", care: DRY_CLEAN, description: "Lustrous peacock blue Mysore crepe silk with a slim gold border." },
    Seed { id: 11, name: "Mustard Tussar Silk", price: 7499, mrp: Some(8999), fabric: "Tussar Silk", color: "Mustard Yellow", category: "silk", subcategory: "tussar", rating: 4.3, reviews: 38, is_new: false, stock: 20, tags: &["office", "festive", "handwoven"], weave: "Tussar Handloom", origin: "Bhagalpur, Bihar", care: DRY_CLEAN, description: "Textured mustard tussar with hand-painted madhubani pallu." },
    Seed { id: 12, name: "Indigo Block Print Cotton", price: 2499, mrp: None, fabric: "Mulmul Cotton", color: "Indigo Blue", category: "cotton", subcategory: "block-print", rating: 4.2, reviews: 110, is_new: false, stock: 40, tags: &["daily-wear", "block-print", "summer"], weave: "Hand block printed", origin: "Bagru, Rajasthan", care: MACHINE_WASH, description: "Soft mulmul cotton with indigo dabu block prints." },
    Seed { id: 13, name: "Black Sequin Georgette", price: 10999, mrp: Some(13999), fabric: "Georgette", color: "Jet Black", category: "georgette", subcategory: "party-wear", rating: 4.7, reviews: 58, is_new: true, stock: 9, tags: &["party", "sequin", "cocktail"], weave: "Sequin embroidered", origin: "Surat, Gujarat", care: DRY_CLEAN, description: "All-over sequinned black georgette for cocktail evenings." },
    Seed { id: 14, name: "Blush Pink Floral Chiffon", price: 5499, mrp: None, fabric: "Chiffon", color: "Blush Pink", category: "chiffon", subcategory: "printed", rating: 4.4, reviews: 72, is_new: false, stock: 22, tags: &["floral", "day-wear", "lightweight"], weave: "Digital print", origin: "Surat, Gujarat", care: GENTLE_WASH, description: "Featherlight chiffon with a pastel floral digital print." },
    Seed { id: 15, name: "Teal Embellished Net", price: 16999, mrp: Some(19999), fabric: "Net", color: "Teal Green", category: "net", subcategory: "designer", rating: 4.5, reviews: 29, is_new: false, stock: 4, tags: &["reception", "embellished", "designer"], weave: "Net with sequins", origin: "Delhi", care: DRY_CLEAN, description: "Teal net saree with scattered sequins and a scalloped border." },
    Seed { id: 16, name: "Sunset Orange Bandhani Designer", price: 11999, mrp: None, fabric: "Gaji Silk", color: "Sunset Orange", category: "designer", subcategory: "bandhani", rating: 4.6, reviews: 33, is_new: true, stock: 7, tags: &["festive", "bandhani", "mehendi"], weave: "Tie and dye", origin: "Bhuj, Gujarat", care: DRY_CLEAN, description: "Hand-tied bandhani on gaji silk in sunset orange." },
];

impl Seed {
    fn to_product(&self) -> Product {
        let discount = self.mrp.map(|mrp| (((mrp - self.price) * 100 + mrp / 2) / mrp) as u8);
        let slug = self.name.replace(' ', "_");
        Product {
            id: ProductId::new(self.id),
            name: self.name.to_string(),
            price: Price::new(self.price),
            original_price: self.mrp.map(Price::new),
            fabric: self.fabric.to_string(),
            color: self.color.to_string(),
            category: self.category.to_string(),
            subcategory: self.subcategory.to_string(),
            rating: self.rating,
            reviews: self.reviews,
            images: (0..3).map(|i| if i == 0 { format!("/assets/{slug}.png") } else { format!("/assets/{slug}_{i}.png") }).collect(),
            description: self.description.to_string(),
            features: vec![format!("{} fabric", self.fabric), self.weave.to_string()],
            specifications: Specifications {
                fabric: self.fabric.to_string(),
                weave: self.weave.to_string(),
                length: "6.3 meters".to_string(),
                width: "1.15 meters".to_string(),
                blouse_piece: true,
                care_instructions: self.care.iter().map(|c| c.to_string()).collect(),
                origin: self.origin.to_string(),
            },
            is_new: self.is_new,
            in_stock: self.stock > 0,
            stock_quantity: self.stock,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            discount,
        }
    }
}

pub fn products() -> Vec<Product> { SEEDS.iter().map(Seed::to_product).collect() }
