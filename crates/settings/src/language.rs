use std::fmt;
use std::str::FromStr;

use icu_locid::{locale, Locale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 介面支援的語言代碼。 / Language codes the interface can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "zh")]
    Zh,
    #[serde(rename = "en")]
    En,
}

/// Raised when a string is not one of the supported language codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported language code '{input}'")]
pub struct LanguageParseError {
    pub input: String,
}

impl LanguageCode {
    /// 所有支援語言，依固定順序。 / Every supported code in a fixed order.
    pub const ALL: [LanguageCode; 2] = [LanguageCode::Zh, LanguageCode::En];

    /// 兩字母代碼。 / Two-letter code stored in preferences and markup attributes.
    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::Zh => "zh",
            LanguageCode::En => "en",
        }
    }

    /// Value written to `<html lang>`.
    pub fn html_lang(self) -> &'static str {
        match self {
            LanguageCode::Zh => "zh-CN",
            LanguageCode::En => "en",
        }
    }

    pub fn locale(self) -> Locale {
        match self {
            LanguageCode::Zh => locale!("zh-CN"),
            LanguageCode::En => locale!("en"),
        }
    }

    /// 切換按鈕上顯示的是「另一個」語言。 / The toggle button names the language you would switch to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            LanguageCode::Zh => "EN",
            LanguageCode::En => "中",
        }
    }

    pub fn other(self) -> LanguageCode {
        match self {
            LanguageCode::Zh => LanguageCode::En,
            LanguageCode::En => LanguageCode::Zh,
        }
    }

    /// Attribute carrying this language's inline text, e.g. `data-zh`.
    pub fn text_attr(self) -> &'static str {
        match self {
            LanguageCode::Zh => "data-zh",
            LanguageCode::En => "data-en",
        }
    }

    pub fn placeholder_attr(self) -> &'static str {
        match self {
            LanguageCode::Zh => "data-zh-placeholder",
            LanguageCode::En => "data-en-placeholder",
        }
    }

    pub fn title_attr(self) -> &'static str {
        match self {
            LanguageCode::Zh => "data-zh-title",
            LanguageCode::En => "data-en-title",
        }
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        LanguageCode::En
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "zh" => Ok(LanguageCode::Zh),
            "en" => Ok(LanguageCode::En),
            other => Err(LanguageParseError {
                input: other.to_string(),
            }),
        }
    }
}
