//! Tone bands.
//!
//! The slider value 0-100 maps onto seven ordered bands, formal to casual.
//! Each band covers values up to and including its upper bound.

/// Highest valid tone value.
pub const MAX_TONE_VALUE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ToneBand {
    ExtremelyFormal,
    VeryFormal,
    Formal,
    Neutral,
    Conversational,
    Casual,
    VeryCasual,
}

impl ToneBand {
    /// All bands, most formal first.
    pub const ALL: [ToneBand; 7] = [
        ToneBand::ExtremelyFormal,
        ToneBand::VeryFormal,
        ToneBand::Formal,
        ToneBand::Neutral,
        ToneBand::Conversational,
        ToneBand::Casual,
        ToneBand::VeryCasual,
    ];

    /// Band for a tone value. Values above 100 land in the most casual band.
    pub fn from_value(tone_value: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| tone_value <= band.upper_bound())
            .unwrap_or(ToneBand::VeryCasual)
    }

    /// Inclusive upper bound of the band.
    pub fn upper_bound(self) -> u8 {
        match self {
            ToneBand::ExtremelyFormal => 10,
            ToneBand::VeryFormal => 20,
            ToneBand::Formal => 40,
            ToneBand::Neutral => 60,
            ToneBand::Conversational => 80,
            ToneBand::Casual => 90,
            ToneBand::VeryCasual => 100,
        }
    }

    /// Phrase inserted into the rewrite prompt.
    pub fn description(self) -> &'static str {
        match self {
            ToneBand::ExtremelyFormal => "extremely formal and professional with academic language",
            ToneBand::VeryFormal => "very formal and professional",
            ToneBand::Formal => "formal and professional",
            ToneBand::Neutral => "neutral and balanced",
            ToneBand::Conversational => "conversational and friendly",
            ToneBand::Casual => "casual and relaxed",
            ToneBand::VeryCasual => "very casual, informal and colloquial",
        }
    }
}

/// Description of the band containing `tone_value`.
pub fn tone_description(tone_value: u8) -> &'static str {
    ToneBand::from_value(tone_value).description()
}
