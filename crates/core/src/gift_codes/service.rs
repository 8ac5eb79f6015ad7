//! Gift code issuance, filtering and redemption stats.

use chrono::{Days, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sleepdash_shared::types::GiftCodeId;

use super::types::{GiftCode, GiftCodeKind, GiftCodeStatus};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_SUFFIX_LEN: usize = 8;

/// Largest batch issued at once.
pub const MAX_BATCH_QUANTITY: u32 = 1_000;

/// Parameters of a batch of new codes. Omitted fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftCodeBatch {
    /// What the codes grant.
    #[serde(rename = "type")]
    pub kind: GiftCodeKind,
    /// Number of codes.
    pub quantity: u32,
    /// Days until expiry.
    pub expiration_days: u32,
    /// Code prefix, such as `SLEEP`.
    pub prefix: String,
}

impl Default for GiftCodeBatch {
    fn default() -> Self {
        Self {
            kind: GiftCodeKind::PremiumTrial,
            quantity: 10,
            expiration_days: 30,
            prefix: "SLEEP".to_string(),
        }
    }
}

impl GiftCodeBatch {
    /// Checks quantity and prefix.
    ///
    /// # Errors
    ///
    /// Returns a human readable message for the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_BATCH_QUANTITY).contains(&self.quantity) {
            return Err(format!("quantity must be between 1 and {MAX_BATCH_QUANTITY}"));
        }
        let prefix = self.prefix.trim();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("prefix must be letters and digits".to_string());
        }
        Ok(())
    }

    /// Issues `quantity` active single-use codes dated `today`.
    #[must_use]
    pub fn generate<R: Rng>(&self, rng: &mut R, today: NaiveDate) -> Vec<GiftCode> {
        let expires = today
            .checked_add_days(Days::new(u64::from(self.expiration_days)))
            .unwrap_or(NaiveDate::MAX);

        (0..self.quantity)
            .map(|_| GiftCode {
                id: GiftCodeId::from_random_bytes(rng.random()),
                code: random_code(rng, &self.prefix),
                kind: self.kind,
                status: GiftCodeStatus::Active,
                created_date: today,
                expires_date: expires,
                redeemed_by: None,
                value: self.kind.default_value(),
                max_uses: 1,
                current_uses: 0,
            })
            .collect()
    }
}

/// `PREFIX-XXXXXXXX` with an uppercase alphanumeric suffix.
pub(crate) fn random_code<R: Rng>(rng: &mut R, prefix: &str) -> String {
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
        .collect();
    format!("{}-{suffix}", prefix.trim().to_uppercase())
}

/// Codes table filter. `None` status means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCodeFilter {
    /// Case-insensitive substring of the code.
    #[serde(default)]
    pub search: String,
    /// Lifecycle state.
    #[serde(default)]
    pub status: Option<GiftCodeStatus>,
}

impl GiftCodeFilter {
    /// Returns true if `code` passes every criterion.
    #[must_use]
    pub fn matches(&self, code: &GiftCode) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || code.code.to_lowercase().contains(&needle))
            && self.status.is_none_or(|s| code.status == s)
    }

    /// Codes passing the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, codes: &'a [GiftCode]) -> Vec<&'a GiftCode> {
        codes.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Headline figures for the gift codes page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCodeStats {
    /// Codes issued.
    pub total: u64,
    /// Codes redeemed.
    pub redeemed: u64,
    /// Face value of redeemed codes.
    pub generated_revenue: Decimal,
    /// Redeemed share of all codes, whole percent.
    pub conversion_rate: u64,
}

impl GiftCodeStats {
    /// Computes stats over `codes`.
    #[must_use]
    pub fn from_codes(codes: &[GiftCode]) -> Self {
        let redeemed: Vec<&GiftCode> = codes
            .iter()
            .filter(|c| c.status == GiftCodeStatus::Redeemed)
            .collect();
        let total = codes.len() as u64;
        let redeemed_count = redeemed.len() as u64;
        let conversion_rate = if total == 0 {
            0
        } else {
            (redeemed_count * 200 + total) / (total * 2)
        };
        Self {
            total,
            redeemed: redeemed_count,
            generated_revenue: redeemed.iter().map(|c| c.value).sum(),
            conversion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
    }

    fn batch(quantity: u32) -> Vec<GiftCode> {
        GiftCodeBatch {
            quantity,
            ..GiftCodeBatch::default()
        }
        .generate(&mut StdRng::seed_from_u64(7), today())
    }

    #[test]
    fn test_generate_shape() {
        let codes = batch(5);
        assert_eq!(codes.len(), 5);

        for code in &codes {
            let (prefix, suffix) = code.code.split_once('-').unwrap();
            assert_eq!(prefix, "SLEEP");
            assert_eq!(suffix.len(), 8);
            assert!(suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
            assert_eq!(code.status, GiftCodeStatus::Active);
            assert_eq!(code.max_uses, 1);
            assert_eq!(code.current_uses, 0);
            assert_eq!(code.value, dec!(9.99));
            assert_eq!(code.expires_date, NaiveDate::from_ymd_opt(2024, 12, 20).unwrap());
        }
    }

    #[rstest]
    #[case(0, "SLEEP", false)]
    #[case(1, "SLEEP", true)]
    #[case(MAX_BATCH_QUANTITY, "dream", true)]
    #[case(MAX_BATCH_QUANTITY + 1, "SLEEP", false)]
    #[case(5, "  ", false)]
    #[case(5, "SLE-EP", false)]
    fn test_validate(#[case] quantity: u32, #[case] prefix: &str, #[case] ok: bool) {
        let batch = GiftCodeBatch {
            quantity,
            prefix: prefix.to_string(),
            ..GiftCodeBatch::default()
        };
        assert_eq!(batch.validate().is_ok(), ok);
    }

    #[test]
    fn test_batch_fields_default() {
        let batch: GiftCodeBatch =
            serde_json::from_value(serde_json::json!({ "type": "sound-pack", "quantity": 2 }))
                .unwrap();
        assert_eq!(batch.kind, GiftCodeKind::SoundPack);
        assert_eq!(batch.quantity, 2);
        assert_eq!(batch.prefix, "SLEEP");
        assert_eq!(batch.expiration_days, 30);
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a: Vec<String> = batch(3).into_iter().map(|c| c.code).collect();
        let b: Vec<String> = batch(3).into_iter().map(|c| c.code).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stats() {
        let mut codes = batch(4);
        codes[0].status = GiftCodeStatus::Redeemed;
        codes[1].status = GiftCodeStatus::Redeemed;
        codes[1].value = dec!(25);
        codes[2].status = GiftCodeStatus::Expired;

        let stats = GiftCodeStats::from_codes(&codes);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.redeemed, 2);
        assert_eq!(stats.generated_revenue, dec!(34.99));
        assert_eq!(stats.conversion_rate, 50);
    }

    #[test]
    fn test_stats_rounding_and_empty() {
        let mut codes = batch(3);
        codes[0].status = GiftCodeStatus::Redeemed;
        assert_eq!(GiftCodeStats::from_codes(&codes).conversion_rate, 33);
        codes[1].status = GiftCodeStatus::Redeemed;
        assert_eq!(GiftCodeStats::from_codes(&codes).conversion_rate, 67);

        assert_eq!(GiftCodeStats::from_codes(&[]), GiftCodeStats::default());
    }

    #[test]
    fn test_filter() {
        let mut codes = batch(3);
        codes[0].status = GiftCodeStatus::Expired;
        let needle = codes[1].code[6..].to_lowercase();

        let by_status = GiftCodeFilter {
            status: Some(GiftCodeStatus::Active),
            ..Default::default()
        };
        assert_eq!(by_status.apply(&codes).len(), 2);

        let by_search = GiftCodeFilter {
            search: needle,
            status: None,
        };
        assert_eq!(by_search.apply(&codes)[0].id, codes[1].id);
    }
}
