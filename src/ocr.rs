//! Receipt scanning.
//!
//! A `ReceiptScanner` turns the bytes of a receipt image into a draft expense. The only scanner
//! shipped is `SimulatedScanner`, which checks that the bytes are an image, waits to imitate
//! processing time, and then returns one of a few canned receipts.

use crate::error::Res;
use crate::model::{Amount, Category};
use anyhow::bail;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// How long the simulated scanner takes by default.
pub const DEFAULT_SCAN_DELAY: Duration = Duration::from_secs(2);

/// What a scanner read from a receipt. It becomes an expense only once the user accepts it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    pub amount: Amount,
    pub vendor: String,
    pub date: NaiveDate,
    pub category: Category,
    /// Between 0 and 1.
    pub confidence: Decimal,
}

impl ReceiptDraft {
    /// The confidence as a whole percentage, e.g. `92`.
    pub fn confidence_percent(&self) -> Decimal {
        (self.confidence * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[async_trait]
pub trait ReceiptScanner: Send + Sync {
    /// Reads a receipt image. `today` is used when the receipt has no legible date.
    async fn scan(&self, image: &[u8], today: NaiveDate) -> Res<ReceiptDraft>;
}

/// A stand-in scanner that returns canned results.
#[derive(Debug, Clone)]
pub struct SimulatedScanner {
    delay: Duration,
}

impl Default for SimulatedScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_DELAY)
    }
}

impl SimulatedScanner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ReceiptScanner for SimulatedScanner {
    async fn scan(&self, image: &[u8], today: NaiveDate) -> Res<ReceiptDraft> {
        let Some(format) = ImageFormat::sniff(image) else {
            bail!("Please upload an image file (PNG, JPEG, GIF, WEBP or BMP)");
        };
        debug!("Scanning a {} byte {format:?} receipt", image.len());
        tokio::time::sleep(self.delay).await;

        // Deterministic for a given image.
        let checksum = image
            .iter()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(*b)));
        let (cents, vendor, category, confidence) = CANNED[checksum % CANNED.len()];
        Ok(ReceiptDraft {
            amount: Amount::new(Decimal::new(cents, 2)),
            vendor: vendor.to_string(),
            date: today,
            category,
            confidence: Decimal::new(confidence, 2),
        })
    }
}

/// (amount in cents, vendor, category, confidence in hundredths)
const CANNED: [(i64, &str, Category, i64); 4] = [
    (4567, "Grocery Store", Category::FoodDining, 92),
    (1250, "Coffee Shop", Category::FoodDining, 88),
    (8999, "Gas Station", Category::Transportation, 95),
    (2500, "Restaurant", Category::FoodDining, 90),
];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else if bytes.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn png(extra: &[u8]) -> Vec<u8> {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(extra);
        bytes
    }

    #[test]
    fn test_sniff() {
        assert_eq!(ImageFormat::sniff(&png(b"")), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(
            ImageFormat::sniff(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageFormat::Webp)
        );
        assert_eq!(ImageFormat::sniff(b"BM...."), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::sniff(b"%PDF-1.7"), None);
        assert_eq!(ImageFormat::sniff(b""), None);
    }

    #[tokio::test]
    async fn test_scan_rejects_non_images() {
        let scanner = SimulatedScanner::new(Duration::ZERO);
        let err = scanner.scan(b"hello", today()).await.unwrap_err();
        assert!(err.to_string().contains("upload an image"));
    }

    #[tokio::test]
    async fn test_scan_is_deterministic_and_canned() {
        let scanner = SimulatedScanner::new(Duration::ZERO);
        let image = png(b"receipt-1");
        let a = scanner.scan(&image, today()).await.unwrap();
        let b = scanner.scan(&image, today()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.date, today());
        assert!(CANNED.iter().any(|(_, vendor, _, _)| *vendor == a.vendor));
        assert!(a.confidence > Decimal::ZERO && a.confidence <= Decimal::ONE);
    }

    #[test]
    fn test_confidence_percent() {
        let draft = ReceiptDraft {
            amount: Amount::ZERO,
            vendor: "x".into(),
            date: today(),
            category: Category::Other,
            confidence: Decimal::new(92, 2),
        };
        assert_eq!(draft.confidence_percent(), Decimal::from(92));
        let draft = ReceiptDraft {
            confidence: Decimal::new(925, 3),
            ..draft
        };
        assert_eq!(draft.confidence_percent(), Decimal::from(93));
    }
}
