//! The sleep sound library.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sleepdash_shared::types::SoundId;

/// Royalty-free revenue estimate per premium play.
const REVENUE_PER_PREMIUM_PLAY: Decimal = dec!(0.001);

/// Library category of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundCategory {
    /// Rain, forest, ocean.
    Nature,
    /// Ambient pads and drones.
    Ambient,
    /// White, pink and brown noise.
    WhiteNoise,
    /// Guided meditation.
    Meditation,
    /// City and cafe soundscapes.
    Urban,
    /// Binaural beats.
    Binaural,
    /// ASMR recordings.
    Asmr,
    /// Any category this build does not know.
    #[serde(other)]
    Unknown,
}

impl SoundCategory {
    /// Every known category, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Nature,
        Self::Ambient,
        Self::WhiteNoise,
        Self::Meditation,
        Self::Urban,
        Self::Binaural,
        Self::Asmr,
    ];

    /// Label shown in the library table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Nature => "Nature",
            Self::Ambient => "Ambient",
            Self::WhiteNoise => "White Noise",
            Self::Meditation => "Meditation",
            Self::Urban => "Urban",
            Self::Binaural => "Binaural",
            Self::Asmr => "ASMR",
            Self::Unknown => "Unknown",
        }
    }

    /// CSS class of the category badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Nature => "badge-nature",
            Self::Ambient => "badge-ambient",
            Self::WhiteNoise => "badge-whitenoise",
            Self::Meditation => "badge-meditation",
            Self::Urban => "badge-urban",
            Self::Binaural => "badge-binaural",
            Self::Asmr => "badge-asmr",
            Self::Unknown => "badge-default",
        }
    }
}

/// Publication state of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundStatus {
    /// Visible in the app.
    #[default]
    Active,
    /// Hidden from the app.
    Inactive,
}

/// A sound in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sound {
    /// Sound ID.
    pub id: SoundId,
    /// Title.
    pub name: String,
    /// Library category.
    pub category: SoundCategory,
    /// Length in seconds.
    #[serde(default)]
    pub duration_secs: u32,
    /// Requires a paid tier.
    #[serde(default)]
    pub premium: bool,
    /// Play count.
    #[serde(default)]
    pub plays: u64,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Download location.
    #[serde(default)]
    pub file_url: String,
    /// Publication state.
    #[serde(default)]
    pub status: SoundStatus,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

impl Sound {
    /// Duration as `m:ss`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}

/// Sound library filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundFilter {
    /// Case-insensitive substring of the title.
    #[serde(default)]
    pub search: String,
    /// Category.
    #[serde(default)]
    pub category: Option<SoundCategory>,
    /// `Some(true)` for premium only, `Some(false)` for free only.
    #[serde(default)]
    pub premium: Option<bool>,
}

impl SoundFilter {
    /// Returns true if `sound` passes every criterion.
    #[must_use]
    pub fn matches(&self, sound: &Sound) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || sound.name.to_lowercase().contains(&needle))
            && self.category.is_none_or(|c| sound.category == c)
            && self.premium.is_none_or(|p| sound.premium == p)
    }

    /// Sounds passing the filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, sounds: &'a [Sound]) -> Vec<&'a Sound> {
        sounds.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Headline figures for the sound library page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryTotals {
    /// Sounds in the library.
    pub total: u64,
    /// Premium sounds.
    pub premium_count: u64,
    /// Plays across all sounds.
    pub total_plays: u64,
    /// Combined length in seconds.
    pub total_duration_secs: u64,
    /// Estimated revenue from premium plays, whole dollars.
    pub estimated_revenue: Decimal,
}

impl LibraryTotals {
    /// Computes totals over `sounds`.
    #[must_use]
    pub fn from_sounds(sounds: &[Sound]) -> Self {
        let premium_plays: u64 = sounds.iter().filter(|s| s.premium).map(|s| s.plays).sum();
        Self {
            total: sounds.len() as u64,
            premium_count: sounds.iter().filter(|s| s.premium).count() as u64,
            total_plays: sounds.iter().map(|s| s.plays).sum(),
            total_duration_secs: sounds.iter().map(|s| u64::from(s.duration_secs)).sum(),
            estimated_revenue: (Decimal::from(premium_plays) * REVENUE_PER_PREMIUM_PLAY).round(),
        }
    }

    /// Combined length as `Xh Ym`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        let minutes = self.total_duration_secs / 60;
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sound(name: &str, category: SoundCategory, premium: bool, plays: u64, secs: u32) -> Sound {
        Sound {
            id: SoundId::new(),
            name: name.into(),
            category,
            duration_secs: secs,
            premium,
            plays,
            likes: 0,
            file_url: String::new(),
            status: SoundStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn library() -> Vec<Sound> {
        vec![
            sound("Forest Rain", SoundCategory::Nature, true, 15_420, 504),
            sound("Deep Meditation", SoundCategory::Meditation, true, 8_920, 735),
            sound("City Night", SoundCategory::Urban, false, 12_350, 405),
            sound("Ocean Waves", SoundCategory::Nature, false, 18_760, 630),
        ]
    }

    #[rstest]
    #[case(SoundCategory::Nature, "badge-nature")]
    #[case(SoundCategory::WhiteNoise, "badge-whitenoise")]
    #[case(SoundCategory::Asmr, "badge-asmr")]
    #[case(SoundCategory::Unknown, "badge-default")]
    fn test_category_badge(#[case] category: SoundCategory, #[case] class: &str) {
        assert_eq!(category.badge_class(), class);
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_string(&SoundCategory::WhiteNoise).unwrap(),
            "\"white-noise\""
        );
        let parsed: SoundCategory = serde_json::from_str("\"lofi\"").unwrap();
        assert_eq!(parsed, SoundCategory::Unknown);
        assert_eq!(parsed.display_name(), "Unknown");
    }

    #[rstest]
    #[case(SoundFilter::default(), 4)]
    #[case(SoundFilter { search: "ocean".into(), ..Default::default() }, 1)]
    #[case(SoundFilter { category: Some(SoundCategory::Nature), ..Default::default() }, 2)]
    #[case(SoundFilter { premium: Some(true), ..Default::default() }, 2)]
    #[case(SoundFilter { premium: Some(false), category: Some(SoundCategory::Meditation), search: String::new() }, 0)]
    fn test_filter(#[case] filter: SoundFilter, #[case] expected: usize) {
        assert_eq!(filter.apply(&library()).len(), expected);
    }

    #[test]
    fn test_totals() {
        let totals = LibraryTotals::from_sounds(&library());
        assert_eq!(totals.total, 4);
        assert_eq!(totals.premium_count, 2);
        assert_eq!(totals.total_plays, 55_450);
        // (15420 + 8920) * 0.001 = 24.34
        assert_eq!(totals.estimated_revenue, Decimal::from(24));
        // 2274 seconds
        assert_eq!(totals.duration_label(), "0h 37m");
    }

    #[test]
    fn test_duration_label() {
        assert_eq!(library()[0].duration_label(), "8:24");
    }
}
