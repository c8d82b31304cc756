use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use crate::{ShowroomError, ShowroomResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Self::En => TextDirection::Ltr,
            Self::Ar => TextDirection::Rtl,
        }
    }
}

impl FromStr for Locale {
    type Err = ShowroomError;

    /// Accepts bare tags and regional ones ("ar-AE", "en_GB").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(ShowroomError::InvalidArgument {
                field: "locale".into(),
                reason: format!("Unsupported locale '{s}'."),
            }),
        }
    }
}

/// Static string tables keyed by locale and dot-path ("loan.monthly_payment").
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    tables: HashMap<Locale, HashMap<String, String>>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, text: impl Into<String>) {
        self.tables
            .entry(locale)
            .or_default()
            .insert(key.into(), text.into());
    }

    /// Merge a nested JSON object, flattening nested keys into dot paths.
    pub fn load_json(&mut self, locale: Locale, json: &str) -> ShowroomResult<()> {
        let root: Value = serde_json::from_str(json)?;
        if !root.is_object() {
            return Err(ShowroomError::InvalidArgument {
                field: "json".into(),
                reason: "Translation table must be a JSON object.".into(),
            });
        }
        let table = self.tables.entry(locale).or_default();
        flatten(&root, String::new(), table);
        Ok(())
    }

    /// Text for `key`, falling back to English and then to the key itself.
    pub fn resolve<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.lookup(locale, key)
            .or_else(|| self.lookup(Locale::En, key))
            .unwrap_or(key)
    }

    /// `resolve` with `{name}` placeholders substituted.
    pub fn format(&self, locale: Locale, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.resolve(locale, key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn contains(&self, locale: Locale, key: &str) -> bool {
        self.lookup(locale, key).is_some()
    }

    fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        self.tables
            .get(&locale)
            .and_then(|t| t.get(key))
            .map(String::as_str)
    }

    /// Strings shared by the catalog and finance pages.
    pub fn builtin() -> Self {
        let mut bundle = Self::new();
        for (key, en, ar) in BUILTIN {
            bundle.insert(Locale::En, *key, *en);
            bundle.insert(Locale::Ar, *key, *ar);
        }
        bundle
    }
}

fn flatten(value: &Value, prefix: String, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten(v, path, out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

const BUILTIN: &[(&str, &str, &str)] = &[
    ("catalog.title", "Our Inventory", "مخزوننا"),
    ("catalog.no_results", "No cars found", "لم يتم العثور على سيارات"),
    ("catalog.results_count", "{count} cars found", "تم العثور على {count} سيارة"),
    ("catalog.certified", "Certified", "معتمدة"),
    ("catalog.popular_models", "Popular Models", "الطرازات الأكثر طلباً"),
    ("catalog.status.available", "Available", "متاحة"),
    ("catalog.status.reserved", "Reserved", "محجوزة"),
    ("catalog.status.sold", "Sold", "مباعة"),
    ("filters.make", "Make", "الشركة المصنعة"),
    ("filters.body_type", "Body Type", "نوع الهيكل"),
    ("filters.fuel_type", "Fuel Type", "نوع الوقود"),
    ("filters.transmission", "Transmission", "ناقل الحركة"),
    ("filters.year", "Year", "سنة الصنع"),
    ("filters.price", "Price", "السعر"),
    ("filters.mileage", "Mileage", "المسافة المقطوعة"),
    ("filters.clear", "Clear Filters", "مسح الفلاتر"),
    ("loan.title", "Finance Calculator", "حاسبة التمويل"),
    ("loan.monthly_payment", "Monthly Payment", "القسط الشهري"),
    ("loan.total_interest", "Total Interest", "إجمالي الفائدة"),
    ("loan.total_amount", "Total Amount", "المبلغ الإجمالي"),
    ("loan.down_payment", "Down Payment", "الدفعة المقدمة"),
    ("loan.term_months", "Term (months)", "المدة (بالأشهر)"),
    ("loan.interest_rate", "Interest Rate", "معدل الفائدة"),
    ("preferences.favorites", "Favorites", "المفضلة"),
    ("preferences.compare", "Compare", "مقارنة"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!("ar-AE".parse::<Locale>().unwrap(), Locale::Ar);
        assert_eq!("EN_gb".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::Ar.direction(), TextDirection::Rtl);
    }

    #[test]
    fn test_resolve_with_fallbacks() {
        let mut bundle = ResourceBundle::new();
        bundle.insert(Locale::En, "nav.home", "Home");
        bundle.insert(Locale::Ar, "nav.home", "الرئيسية");
        bundle.insert(Locale::En, "nav.about", "About");

        assert_eq!(bundle.resolve(Locale::Ar, "nav.home"), "الرئيسية");
        assert_eq!(bundle.resolve(Locale::Ar, "nav.about"), "About");
        assert_eq!(bundle.resolve(Locale::Ar, "nav.missing"), "nav.missing");
    }

    #[test]
    fn test_load_nested_json() {
        let mut bundle = ResourceBundle::new();
        bundle
            .load_json(
                Locale::En,
                r#"{"hero": {"title": "Drive home today", "cta": {"label": "Browse"}}, "seats": 5}"#,
            )
            .unwrap();
        assert_eq!(bundle.resolve(Locale::En, "hero.title"), "Drive home today");
        assert_eq!(bundle.resolve(Locale::En, "hero.cta.label"), "Browse");
        assert_eq!(bundle.resolve(Locale::En, "seats"), "5");
        assert!(!bundle.contains(Locale::En, "hero"));
    }

    #[test]
    fn test_load_json_rejects_non_object() {
        let mut bundle = ResourceBundle::new();
        assert!(bundle.load_json(Locale::En, "[1, 2]").is_err());
        assert!(bundle.load_json(Locale::En, "not json").is_err());
    }

    #[test]
    fn test_builtin_covers_both_locales() {
        let bundle = ResourceBundle::builtin();
        for (key, _, _) in BUILTIN {
            assert!(bundle.contains(Locale::En, key), "{key}");
            assert!(bundle.contains(Locale::Ar, key), "{key}");
        }
        assert_eq!(
            bundle.format(Locale::En, "catalog.results_count", &[("count", "12")]),
            "12 cars found"
        );
    }
}
