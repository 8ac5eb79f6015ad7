//! Gift code data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sleepdash_shared::types::GiftCodeId;

/// What a gift code grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GiftCodeKind {
    /// Seven days of premium.
    PremiumTrial,
    /// One month of premium.
    PremiumMonth,
    /// Enterprise trial.
    EnterpriseTrial,
    /// A premium sound pack.
    SoundPack,
    /// Discount on a subscription.
    Discount,
}

impl GiftCodeKind {
    /// Every kind, in menu order.
    pub const ALL: [Self; 5] = [
        Self::PremiumTrial,
        Self::PremiumMonth,
        Self::EnterpriseTrial,
        Self::SoundPack,
        Self::Discount,
    ];

    /// Face value in USD of a newly generated code.
    #[must_use]
    pub fn default_value(self) -> Decimal {
        match self {
            Self::PremiumTrial | Self::PremiumMonth => dec!(9.99),
            Self::EnterpriseTrial => dec!(49.99),
            Self::SoundPack => dec!(14.99),
            Self::Discount => dec!(25),
        }
    }

    /// Label shown in the codes table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PremiumTrial => "Premium Trial (7 days)",
            Self::PremiumMonth => "Premium Month",
            Self::EnterpriseTrial => "Enterprise Trial",
            Self::SoundPack => "Sound Pack",
            Self::Discount => "Discount Code",
        }
    }
}

/// Lifecycle state of a gift code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftCodeStatus {
    /// Can be redeemed.
    #[default]
    Active,
    /// Used up.
    Redeemed,
    /// Past its expiry date.
    Expired,
}

impl GiftCodeStatus {
    /// Label shown in the codes table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Redeemed => "Redeemed",
            Self::Expired => "Expired",
        }
    }
}

/// A gift code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCode {
    /// Gift code ID.
    pub id: GiftCodeId,
    /// The redeemable code, such as `SLEEP-7K2M9QXA`.
    pub code: String,
    /// What the code grants.
    #[serde(rename = "type")]
    pub kind: GiftCodeKind,
    /// Lifecycle state.
    pub status: GiftCodeStatus,
    /// Issue date.
    pub created_date: NaiveDate,
    /// Last valid date.
    pub expires_date: NaiveDate,
    /// Email of the redeeming user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_by: Option<String>,
    /// Face value in USD.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Redemption limit.
    pub max_uses: u32,
    /// Redemptions so far.
    pub current_uses: u32,
}

impl GiftCode {
    /// Percentage of allowed uses consumed, rounded.
    #[must_use]
    pub fn utilization(&self) -> u32 {
        if self.max_uses == 0 {
            return 0;
        }
        let pct = (u64::from(self.current_uses) * 200 + u64::from(self.max_uses))
            / (u64::from(self.max_uses) * 2);
        u32::try_from(pct).unwrap_or(u32::MAX)
    }
}
