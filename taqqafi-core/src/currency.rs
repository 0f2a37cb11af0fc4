//! Static currency catalog: codes, display symbols, and the keyword variants
//! (Latin abbreviations and Arabic names/abbreviations) that identify a
//! currency inside bank notification text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Sar,
    Aed,
    Jod,
    Bhd,
    Kwd,
    Omr,
    Qar,
    Egp,
    Mad,
    Tnd,
    Lbp,
    Iqd,
    Sdg,
    Lyd,
    Syp,
    Yer,
    Dzd,
    Usd,
    Eur,
    Gbp,
    Try,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    pub name: &'static str,
    pub name_ar: &'static str,
    pub symbol: &'static str,
    /// Detection keywords. Latin entries match case-insensitively.
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// Catalog order doubles as the tie-break order for keyword detection.
pub static CURRENCIES: [CurrencyInfo; 21] = [
    CurrencyInfo {
        code: CurrencyCode::Sar,
        name: "Saudi Riyal",
        name_ar: "ريال سعودي",
        symbol: "SR",
        keywords: &["SAR", "SR", "ر.س", "ريال سعودى", "ريال سعودي", "ريال"],
    },
    CurrencyInfo {
        code: CurrencyCode::Aed,
        name: "UAE Dirham",
        name_ar: "درهم إماراتي",
        symbol: "AED",
        keywords: &["AED", "د.إ", "درهم اماراتي", "درهم إماراتي", "درهم"],
    },
    CurrencyInfo {
        code: CurrencyCode::Jod,
        name: "Jordanian Dinar",
        name_ar: "دينار أردني",
        symbol: "JD",
        keywords: &["JOD", "JD", "د.أ", "دينار اردني", "دينار أردني"],
    },
    CurrencyInfo {
        code: CurrencyCode::Bhd,
        name: "Bahraini Dinar",
        name_ar: "دينار بحريني",
        symbol: "BD",
        keywords: &["BHD", "BD", "د.ب", "دينار بحريني"],
    },
    CurrencyInfo {
        code: CurrencyCode::Kwd,
        name: "Kuwaiti Dinar",
        name_ar: "دينار كويتي",
        symbol: "KD",
        keywords: &["KWD", "KD", "د.ك", "دينار كويتي"],
    },
    CurrencyInfo {
        code: CurrencyCode::Omr,
        name: "Omani Rial",
        name_ar: "ريال عماني",
        symbol: "OMR",
        keywords: &["OMR", "ر.ع", "ريال عماني", "ريال عمانى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Qar,
        name: "Qatari Riyal",
        name_ar: "ريال قطري",
        symbol: "QR",
        keywords: &["QAR", "QR", "ر.ق", "ريال قطري", "ريال قطرى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Egp,
        name: "Egyptian Pound",
        name_ar: "جنيه مصري",
        symbol: "EGP",
        keywords: &["EGP", "ج.م", "جنيه مصري", "جنيه مصرى", "جنيه"],
    },
    CurrencyInfo {
        code: CurrencyCode::Mad,
        name: "Moroccan Dirham",
        name_ar: "درهم مغربي",
        symbol: "MAD",
        keywords: &["MAD", "د.م", "درهم مغربي", "درهم مغربى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Tnd,
        name: "Tunisian Dinar",
        name_ar: "دينار تونسي",
        symbol: "TND",
        keywords: &["TND", "د.ت", "دينار تونسي", "دينار تونسى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Lbp,
        name: "Lebanese Pound",
        name_ar: "ليرة لبنانية",
        symbol: "LBP",
        keywords: &["LBP", "ل.ل", "ليرة لبنانية", "ليره لبنانيه"],
    },
    CurrencyInfo {
        code: CurrencyCode::Iqd,
        name: "Iraqi Dinar",
        name_ar: "دينار عراقي",
        symbol: "IQD",
        keywords: &["IQD", "د.ع", "دينار عراقي", "دينار عراقى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Sdg,
        name: "Sudanese Pound",
        name_ar: "جنيه سوداني",
        symbol: "SDG",
        keywords: &["SDG", "ج.س", "جنيه سوداني", "جنيه سودانى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Lyd,
        name: "Libyan Dinar",
        name_ar: "دينار ليبي",
        symbol: "LYD",
        keywords: &["LYD", "د.ل", "دينار ليبي", "دينار ليبى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Syp,
        name: "Syrian Pound",
        name_ar: "ليرة سورية",
        symbol: "SYP",
        keywords: &["SYP", "ل.س", "ليرة سورية", "ليره سوريه"],
    },
    CurrencyInfo {
        code: CurrencyCode::Yer,
        name: "Yemeni Rial",
        name_ar: "ريال يمني",
        symbol: "YER",
        keywords: &["YER", "ر.ي", "ريال يمني", "ريال يمنى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Dzd,
        name: "Algerian Dinar",
        name_ar: "دينار جزائري",
        symbol: "DZD",
        keywords: &["DZD", "د.ج", "دينار جزائري", "دينار جزائرى"],
    },
    CurrencyInfo {
        code: CurrencyCode::Usd,
        name: "US Dollar",
        name_ar: "دولار أمريكي",
        symbol: "$",
        keywords: &["USD", "دولار امريكي", "دولار أمريكي", "دولار"],
    },
    CurrencyInfo {
        code: CurrencyCode::Eur,
        name: "Euro",
        name_ar: "يورو",
        symbol: "€",
        keywords: &["EUR", "يورو"],
    },
    CurrencyInfo {
        code: CurrencyCode::Gbp,
        name: "British Pound",
        name_ar: "جنيه إسترليني",
        symbol: "£",
        keywords: &["GBP", "جنيه استرليني", "جنيه إسترليني"],
    },
    CurrencyInfo {
        code: CurrencyCode::Try,
        name: "Turkish Lira",
        name_ar: "ليرة تركية",
        symbol: "₺",
        keywords: &["TRY", "TL", "ليرة تركية", "ليره تركيه"],
    },
];

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 21] = [
        CurrencyCode::Sar,
        CurrencyCode::Aed,
        CurrencyCode::Jod,
        CurrencyCode::Bhd,
        CurrencyCode::Kwd,
        CurrencyCode::Omr,
        CurrencyCode::Qar,
        CurrencyCode::Egp,
        CurrencyCode::Mad,
        CurrencyCode::Tnd,
        CurrencyCode::Lbp,
        CurrencyCode::Iqd,
        CurrencyCode::Sdg,
        CurrencyCode::Lyd,
        CurrencyCode::Syp,
        CurrencyCode::Yer,
        CurrencyCode::Dzd,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Try,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Sar => "SAR",
            CurrencyCode::Aed => "AED",
            CurrencyCode::Jod => "JOD",
            CurrencyCode::Bhd => "BHD",
            CurrencyCode::Kwd => "KWD",
            CurrencyCode::Omr => "OMR",
            CurrencyCode::Qar => "QAR",
            CurrencyCode::Egp => "EGP",
            CurrencyCode::Mad => "MAD",
            CurrencyCode::Tnd => "TND",
            CurrencyCode::Lbp => "LBP",
            CurrencyCode::Iqd => "IQD",
            CurrencyCode::Sdg => "SDG",
            CurrencyCode::Lyd => "LYD",
            CurrencyCode::Syp => "SYP",
            CurrencyCode::Yer => "YER",
            CurrencyCode::Dzd => "DZD",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Try => "TRY",
        }
    }

    /// Catalog entry for this code.
    pub fn info(&self) -> &'static CurrencyInfo {
        // CURRENCIES is laid out in declaration order.
        &CURRENCIES[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn name_ar(&self) -> &'static str {
        self.info().name_ar
    }

    pub fn symbol(&self) -> &'static str {
        self.info().symbol
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        self.info().keywords
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

/// Every Latin-script keyword in the catalog (codes plus short aliases such as `SR`, `KD`, `TL`).
pub fn latin_keywords() -> impl Iterator<Item = &'static str> {
    CURRENCIES
        .iter()
        .flat_map(|c| c.keywords.iter().copied())
        .filter(|k| k.is_ascii())
}

/// Arabic dotted abbreviations such as `ر.س` or `د.ك`.
pub fn arabic_symbols() -> impl Iterator<Item = &'static str> {
    CURRENCIES
        .iter()
        .flat_map(|c| c.keywords.iter().copied())
        .filter(|k| !k.is_ascii() && k.contains('.'))
}

/// Find `needle` in `haystack` (both already lowercased). Latin keywords must not be
/// glued to other Latin letters, so `tl` never fires inside `settlement`.
fn find_keyword(haystack: &str, needle: &str) -> Option<usize> {
    if !needle.is_ascii() {
        return haystack.find(needle);
    }

    haystack.match_indices(needle).map(|(i, _)| i).find(|&i| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphabetic()) && !after.is_some_and(|c| c.is_ascii_alphabetic())
    })
}

/// Detect the currency named in `text` by keyword scan.
///
/// The longest matching keyword across the whole catalog wins, so
/// `دينار اردني` beats any shorter keyword. On equal lengths the entry that
/// comes first in `CURRENCIES` keeps the win, wherever the keywords sit in
/// the text.
pub fn detect_currency(text: &str) -> Option<CurrencyCode> {
    let haystack = text.to_lowercase();
    let mut best: Option<(CurrencyCode, usize)> = None; // (code, keyword chars)

    for info in CURRENCIES.iter() {
        for keyword in info.keywords {
            let needle = keyword.to_lowercase();
            if find_keyword(&haystack, &needle).is_none() {
                continue;
            }
            let len = needle.chars().count();
            if best.is_none_or(|(_, best_len)| len > best_len) {
                best = Some((info.code, len));
            }
        }
    }

    best.map(|(code, _)| code)
}
