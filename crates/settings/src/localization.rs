use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::language::LanguageCode;

const BILL_ZH: &[(&str, &str)] = &[
    ("page-title", "电费账单"),
    ("share", "分享"),
    ("user-name", "志闪"),
    ("switch-account", "切换户号"),
    ("account-id", "用电户号:"),
    ("address", "用电地址:"),
    ("user-address", "山西省运城市万荣县******087号"),
    ("date-text", "2025年7月"),
    ("bill-info", "账单信息"),
    ("bill-guide", "账单阅读指南"),
    ("subscribe-download", "订阅下载"),
    ("bill-period", "账单周期:"),
    ("payment-due", "缴费截止日期:"),
    ("current-usage", "本期电量"),
    ("current-bill", "本期电费"),
    ("cost-type", "费用类别"),
    ("usage-kwh", "电量(kW·h)"),
    ("rate-kwh", "电价(₹/kW·h)"),
    ("cost-inr", "电费(₹)"),
    ("electricity-fee", "电度电费"),
    ("tier-surcharge", "三档加价电费"),
    ("tiered-usage-title", "阶梯电量使用情况"),
    ("unit-kwh", "单位：千瓦时"),
    ("your-tier-is", "您的阶梯电量正处于"),
    ("second-tier", "第二阶梯"),
    ("cumulative-usage", "累计电量"),
    ("tier-1", "第一阶梯"),
    ("tier-2", "第二阶梯"),
    ("tier-3", "第三阶梯"),
    ("tier-3-range", "521-以上"),
];

const BILL_EN: &[(&str, &str)] = &[
    ("page-title", "Electricity Bill"),
    ("share", "Share"),
    ("user-name", "Zhishan"),
    ("switch-account", "Switch Account"),
    ("account-id", "Account ID:"),
    ("address", "Address:"),
    (
        "user-address",
        "Shanxi Province, Yuncheng, Wanrong County ******087",
    ),
    ("date-text", "July 2025"),
    ("bill-info", "Bill Information"),
    ("bill-guide", "Bill Reading Guide"),
    ("subscribe-download", "Subscribe & Download"),
    ("bill-period", "Bill Period:"),
    ("payment-due", "Payment Due Date:"),
    ("current-usage", "Current Usage"),
    ("current-bill", "Current Bill"),
    ("cost-type", "Cost Type"),
    ("usage-kwh", "Usage(kW·h)"),
    ("rate-kwh", "Rate(₹/kW·h)"),
    ("cost-inr", "Cost(₹)"),
    ("electricity-fee", "Electricity Fee"),
    ("tier-surcharge", "Tier Surcharge"),
    ("tiered-usage-title", "Tiered Usage Status"),
    ("unit-kwh", "Unit: kWh"),
    ("your-tier-is", "Your tiered usage is at"),
    ("second-tier", "Second Tier"),
    ("cumulative-usage", "Cumulative Usage"),
    ("tier-1", "Tier 1"),
    ("tier-2", "Tier 2"),
    ("tier-3", "Tier 3"),
    ("tier-3-range", "521+"),
];

const CHROME_ZH: &[(&str, &str)] = &[
    ("confirm.title", "确认操作"),
    ("confirm.cancel", "取消"),
    ("confirm.ok", "确认"),
    ("loading", "加载中..."),
    ("toast.date-selector", "点击了日期选择"),
    ("toast.switch-account", "切换户号功能"),
    ("share.title", "电费账单"),
    ("share.text", "我的电费账单详情"),
    ("share.copied", "链接已复制到剪贴板"),
    ("share.unavailable", "分享功能"),
    ("action.bill-guide", "打开账单阅读指南"),
    ("action.subscribe-download", "订阅下载功能"),
];

const CHROME_EN: &[(&str, &str)] = &[
    ("confirm.title", "Confirm Action"),
    ("confirm.cancel", "Cancel"),
    ("confirm.ok", "Confirm"),
    ("loading", "Loading..."),
    ("toast.date-selector", "Date selector clicked"),
    ("toast.switch-account", "Switch account feature"),
    ("share.title", "Electricity Bill"),
    ("share.text", "My electricity bill details"),
    ("share.copied", "Link copied to clipboard"),
    ("share.unavailable", "Share feature"),
    ("action.bill-guide", "Open bill reading guide"),
    ("action.subscribe-download", "Subscribe and download feature"),
];

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("failed to read catalog overlay {0}: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("failed to parse catalog overlay {0}: {1}")]
    ParseFile(PathBuf, serde_json::Error),
}

/// Result of a catalog lookup. A missing entry is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    Found(&'a str),
    Missing,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a str> {
        match self {
            Lookup::Found(text) => Some(text),
            Lookup::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub language: LanguageCode,
    pub total_entries: usize,
    pub missing_entries: usize,
}

#[derive(Debug, Deserialize)]
struct OverlayFile {
    language: LanguageCode,
    #[serde(default)]
    strings: HashMap<String, String>,
}

/// 依語言代碼分組的靜態字串表。 / Static display strings grouped by language code.
#[derive(Debug, Clone, Default)]
pub struct TextCatalog {
    entries: HashMap<LanguageCode, HashMap<String, String>>,
}

impl TextCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 帳單頁面的內建字串。 / Built-in strings for the bill page.
    pub fn bill() -> Self {
        let mut catalog = Self::new();
        catalog.extend(LanguageCode::Zh, BILL_ZH);
        catalog.extend(LanguageCode::En, BILL_EN);
        catalog
    }

    /// Strings used by widgets, share and action handlers.
    pub fn chrome() -> Self {
        let mut catalog = Self::new();
        catalog.extend(LanguageCode::Zh, CHROME_ZH);
        catalog.extend(LanguageCode::En, CHROME_EN);
        catalog
    }

    /// Bill page strings plus the widget strings.
    pub fn builtin() -> Self {
        let mut catalog = Self::bill();
        catalog.merge(Self::chrome());
        catalog
    }

    pub fn insert(&mut self, language: LanguageCode, key: impl Into<String>, text: impl Into<String>) {
        self.entries
            .entry(language)
            .or_default()
            .insert(key.into(), text.into());
    }

    fn extend(&mut self, language: LanguageCode, pairs: &[(&str, &str)]) {
        for (key, text) in pairs {
            self.insert(language, *key, *text);
        }
    }

    /// 合併另一份字串表；後者覆蓋前者。 / Overlays `other`, replacing entries that already exist.
    pub fn merge(&mut self, other: TextCatalog) {
        for (language, strings) in other.entries {
            self.entries.entry(language).or_default().extend(strings);
        }
    }

    /// Reads a JSON overlay (`{"language": "zh", "strings": {...}}`) and merges it.
    pub fn load_overlay(&mut self, path: impl AsRef<Path>) -> Result<usize, LocalizationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|err| LocalizationError::ReadFile(path.to_path_buf(), err))?;
        let file: OverlayFile = serde_json::from_str(&contents)
            .map_err(|err| LocalizationError::ParseFile(path.to_path_buf(), err))?;
        let count = file.strings.len();
        debug!(path = %path.display(), language = %file.language, entries = count, "merging catalog overlay");
        self.entries
            .entry(file.language)
            .or_default()
            .extend(file.strings);
        Ok(count)
    }

    pub fn lookup(&self, language: LanguageCode, key: &str) -> Lookup<'_> {
        match self
            .entries
            .get(&language)
            .and_then(|strings| strings.get(key))
        {
            Some(text) => Lookup::Found(text.as_str()),
            None => Lookup::Missing,
        }
    }

    pub fn text(&self, language: LanguageCode, key: &str) -> Option<&str> {
        self.lookup(language, key).found()
    }

    pub fn contains(&self, language: LanguageCode, key: &str) -> bool {
        self.text(language, key).is_some()
    }

    /// 取得字串並套用 `{0}` 類型的位置參數。 / Looks up `key` and fills `{0}`-style positional placeholders.
    pub fn render<'a>(
        &'a self,
        language: LanguageCode,
        key: &str,
        positional: &[&str],
    ) -> Option<Cow<'a, str>> {
        self.text(language, key)
            .map(|template| render_template(template, positional))
    }

    /// 排序後的鍵清單。 / Sorted keys defined for `language`.
    pub fn keys(&self, language: LanguageCode) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .get(&language)
            .map(|strings| strings.keys().map(String::as_str).collect())
            .unwrap_or_default();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self, language: LanguageCode) -> usize {
        self.entries.get(&language).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// 其他語言有、但此語言缺少的鍵。 / Keys some other language defines that `language` lacks.
    pub fn missing_keys(&self, language: LanguageCode) -> Vec<String> {
        let mut union = BTreeSet::new();
        for (code, strings) in &self.entries {
            if *code != language {
                union.extend(strings.keys().map(String::as_str));
            }
        }
        union
            .into_iter()
            .filter(|key| !self.contains(language, key))
            .map(str::to_string)
            .collect()
    }

    /// Finds the key whose text in `language` equals `text`.
    pub fn key_for_text(&self, language: LanguageCode, text: &str) -> Option<&str> {
        let strings = self.entries.get(&language)?;
        let mut matches: Vec<&str> = strings
            .iter()
            .filter(|(_, value)| value.as_str() == text)
            .map(|(key, _)| key.as_str())
            .collect();
        matches.sort_unstable();
        matches.into_iter().next()
    }

    pub fn stats(&self) -> Vec<CatalogStats> {
        LanguageCode::ALL
            .iter()
            .map(|language| CatalogStats {
                language: *language,
                total_entries: self.len(*language),
                missing_entries: self.missing_keys(*language).len(),
            })
            .collect()
    }
}

fn render_template<'a>(template: &'a str, positional: &[&str]) -> Cow<'a, str> {
    if positional.is_empty() || !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut current: Cow<'a, str> = Cow::Borrowed(template);
    for (idx, value) in positional.iter().enumerate() {
        let placeholder = format!("{{{idx}}}");
        if current.contains(&placeholder) {
            current = Cow::Owned(current.replace(&placeholder, value));
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs_have_matching_keys() {
        let catalog = TextCatalog::builtin();
        for code in LanguageCode::ALL {
            assert!(catalog.missing_keys(code).is_empty(), "{code} drifted");
        }
        assert_eq!(
            catalog.len(LanguageCode::Zh),
            catalog.len(LanguageCode::En)
        );
    }

    #[test]
    fn render_fills_positional_placeholders() {
        let mut catalog = TextCatalog::new();
        catalog.insert(LanguageCode::En, "greeting", "Hello {0}, {1} due");
        let rendered = catalog
            .render(LanguageCode::En, "greeting", &["Zhishan", "₹120"])
            .unwrap();
        assert_eq!(rendered, "Hello Zhishan, ₹120 due");
        assert!(matches!(
            catalog.render(LanguageCode::En, "greeting", &[]),
            Some(Cow::Borrowed(_))
        ));
    }

    #[test]
    fn key_for_text_reverses_lookup() {
        let catalog = TextCatalog::bill();
        assert_eq!(
            catalog.key_for_text(LanguageCode::En, "Bill Reading Guide"),
            Some("bill-guide")
        );
        assert_eq!(catalog.key_for_text(LanguageCode::Zh, "nothing"), None);
    }
}
