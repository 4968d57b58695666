//! The storefront's product catalog.
//!
//! The shop sells a fixed lineup of pre-configured ad accounts; the catalog is static
//! and versioned with the code rather than stored anywhere. Served verbatim to the
//! storefront UI.

use pgs_common::{Baht, THB_CURRENCY_CODE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: Baht,
    pub currency: String,
    pub account_tier: String,
    pub availability: String,
}

impl Product {
    fn new(id: i64, slug: &str, name: &str, image: &str, price: i64, account_tier: &str, availability: &str) -> Self {
        Self {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
            image: image.to_string(),
            description: "🟢บัญชีเฟสเขียว | ✔ยืนยันตัวตนแล้ว".to_string(),
            price: Baht::from_baht(price),
            currency: THB_CURRENCY_CODE.to_string(),
            account_tier: account_tier.to_string(),
            availability: availability.to_string(),
        }
    }
}

pub fn catalog() -> Vec<Product> {
    vec![
        Product::new(1, "facebook-thai-1600", "Acc_FB_Thai | Limit=1600", "/images/1600.jpg", 350, "BM-01", "🟢บัญชี"),
        Product::new(2, "facebook-thai-8000", "Acc_FB_Thai | Limit=8000", "/images/8000.jpg", 1590, "BM-02", "🟢บัญชี"),
        Product::new(3, "facebook-thai-Unlimit", "Acc_FB_Thai | Limit=Unlimit", "/images/no.jpg", 1590, "BM-03", "🟢บัญชี"),
        Product::new(4, "facebook-1600", "Acc_FB | Limit=1600", "/images/1600+.jpg", 300, "acc-01", "🌏บัญชี"),
        Product::new(5, "facebook-8000", "Acc_FB | Limit=8000", "/images/8000+.jpg", 990, "acc-02", "🌏บัญชี"),
        Product::new(6, "facebook-Unlimit", "Acc_FB | Limit=Unlimit", "/images/no+.jpg", 1190, "acc-03", "🌏บัญชี"),
        Product::new(7, "facebook-bm", "BM_FB | Limit=Unlimit", "/images/no+.jpg", 2090, "acc-03", "🌏👩‍👩‍👧 บัญชี"),
    ]
}
