use crate::domain::model::{Category, CategoryGroup};
use serde::{Deserialize, Serialize};
use url::Url;

const NAME_FRAGMENT_LEN: usize = 15;
const MIN_CONTENT_TERMS: usize = 2;
/// Leading letters of a long name word that still count as a name match.
const WORD_PREFIX_LEN: usize = 4;

/// Weights and pass mark for one scoring variant. Overriding a profile from
/// config replaces all of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub name_in_domain: u8,
    pub keyword_in_domain: u8,
    pub keyword_in_name: u8,
    pub initials_in_domain: u8,
    pub significant_word_in_domain: u8,
    pub content_terms: u8,
    pub threshold: u8,
}

impl ScoringProfile {
    pub fn strict() -> Self {
        Self {
            name_in_domain: 40,
            keyword_in_domain: 20,
            keyword_in_name: 10,
            initials_in_domain: 40,
            significant_word_in_domain: 40,
            content_terms: 0,
            threshold: 50,
        }
    }

    pub fn lenient() -> Self {
        Self {
            name_in_domain: 40,
            keyword_in_domain: 30,
            keyword_in_name: 20,
            initials_in_domain: 0,
            significant_word_in_domain: 0,
            content_terms: 30,
            threshold: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Bank categories: initials and name-word checks, pass mark 50.
    Strict,
    /// Everything else: optional page content, pass mark 60.
    Lenient,
}

impl Variant {
    pub fn for_category(category: Category) -> Self {
        if category.is_bank() {
            Variant::Strict
        } else {
            Variant::Lenient
        }
    }
}

/// Vocabularies and weights used by [`Validator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub trusted_categories: Vec<Category>,
    pub financial_keywords: Vec<String>,
    pub content_terms: Vec<String>,
    pub reject_terms: Vec<String>,
    pub generic_words: Vec<String>,
    pub stop_words: Vec<String>,
    pub strict: ScoringProfile,
    pub lenient: ScoringProfile,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            trusted_categories: vec![
                Category::PsuBank,
                Category::SmallFinanceBank,
                Category::ForeignBank,
            ],
            financial_keywords: words(&[
                "finance", "financial", "finserv", "fincorp", "loan", "credit", "bank", "nbfc",
                "capital", "lending", "leasing", "money",
            ]),
            content_terms: words(&[
                "nbfc",
                "loan",
                "finance",
                "credit",
                "lending",
                "capital",
                "rbi",
                "reserve bank",
                "financial services",
                "microfinance",
                "housing finance",
                "vehicle finance",
                "gold loan",
                "personal loan",
            ]),
            reject_terms: words(&[
                "architecture",
                "construction",
                "real estate developer",
                "steel",
                "manufacturing",
                "oil",
                "gas",
                "retail",
                "university",
                "college",
                "hospital",
                "school",
                "restaurant",
                "hotel",
            ]),
            generic_words: words(&[
                "bank", "banks", "finance", "financial", "india", "indian", "limited", "ltd",
                "private", "pvt", "small", "services", "company", "corporation",
            ]),
            stop_words: words(&["of", "and", "the", "&"]),
            strict: ScoringProfile::strict(),
            lenient: ScoringProfile::lenient(),
        }
    }
}

/// Outcome of scoring one website.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub passed: bool,
    pub score: u8,
    pub reason: String,
}

impl Validation {
    fn rejected(reason: String) -> Self {
        Self {
            passed: false,
            score: 0,
            reason,
        }
    }
}

/// Decides whether a candidate URL plausibly belongs to a lender.
///
/// Pure and deterministic; every comparison is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        let lower = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            config: ValidatorConfig {
                financial_keywords: lower(config.financial_keywords),
                content_terms: lower(config.content_terms),
                reject_terms: lower(config.reject_terms),
                generic_words: lower(config.generic_words),
                stop_words: lower(config.stop_words),
                ..config
            },
        }
    }

    pub fn group(&self, category: Category) -> CategoryGroup {
        if self.config.trusted_categories.contains(&category) {
            CategoryGroup::Trusted
        } else {
            CategoryGroup::Heuristic
        }
    }

    pub fn validate(&self, name: &str, url: &str, category: Category) -> Validation {
        self.validate_with_content(name, url, category, None)
    }

    /// Like [`Validator::validate`], also weighing a snippet of page text
    /// under the lenient variant.
    pub fn validate_with_content(
        &self,
        name: &str,
        url: &str,
        category: Category,
        content: Option<&str>,
    ) -> Validation {
        if self.group(category) == CategoryGroup::Trusted {
            return Validation {
                passed: true,
                score: 100,
                reason: format!("Auto-validated: trusted category ({})", category),
            };
        }

        let domain = domain_of(url);
        if let Some(term) = self.reject_term_in(&domain) {
            return Validation::rejected(format!("Wrong industry: non-banking domain ({})", term));
        }

        let variant = Variant::for_category(category);
        let profile = match variant {
            Variant::Strict => self.config.strict,
            Variant::Lenient => self.config.lenient,
        };

        let name_lower = name.to_lowercase();
        let mut score: u32 = 0;
        let mut reasons: Vec<String> = Vec::new();
        let mut award = |weight: u8, reason: String| {
            score += u32::from(weight);
            reasons.push(reason);
        };

        let fragment = name_fragment(&name_lower);
        if !fragment.is_empty() && domain.contains(&fragment) {
            award(profile.name_in_domain, "Domain matches company name".to_string());
        }

        if self.has_keyword(&domain) {
            award(profile.keyword_in_domain, "Financial terms in URL".to_string());
        }

        if self.has_keyword(&name_lower) {
            award(profile.keyword_in_name, "Financial terms in company name".to_string());
        }

        match variant {
            Variant::Strict => {
                let initials = self.initials(name);
                if initials.len() >= 2 && domain.contains(&initials) {
                    award(
                        profile.initials_in_domain,
                        format!("Initials '{}' in domain", initials),
                    );
                }

                let words = self.significant_words(name);
                if let Some(word) = words.iter().find(|word| domain.contains(word.as_str())) {
                    award(
                        profile.significant_word_in_domain,
                        format!("Name word '{}' in domain", word),
                    );
                } else if let Some(prefix) = words
                    .iter()
                    .filter(|word| word.chars().count() > WORD_PREFIX_LEN)
                    .map(|word| word.chars().take(WORD_PREFIX_LEN).collect::<String>())
                    .find(|prefix| domain.contains(prefix.as_str()))
                {
                    // dhanbank.com for Dhanlaxmi Bank
                    award(
                        profile.significant_word_in_domain,
                        format!("Name prefix '{}' in domain", prefix),
                    );
                }
            }
            Variant::Lenient => {
                if let Some(content) = content.map(str::to_lowercase).filter(|c| !c.is_empty()) {
                    if let Some(term) = self
                        .config
                        .reject_terms
                        .iter()
                        .find(|term| content.contains(term.as_str()))
                    {
                        return Validation::rejected(format!(
                            "Wrong industry detected in content ({})",
                            term
                        ));
                    }

                    let found = self
                        .config
                        .content_terms
                        .iter()
                        .filter(|term| content.contains(term.as_str()))
                        .count();
                    if found >= MIN_CONTENT_TERMS {
                        award(
                            profile.content_terms,
                            format!("Financial terms in content ({} found)", found),
                        );
                    }
                }
            }
        }

        let score = score.min(100) as u8;
        let reason = if reasons.is_empty() {
            "Insufficient evidence".to_string()
        } else {
            reasons.join(" | ")
        };

        tracing::debug!(name, url, score, reason = %reason, "website scored");

        Validation {
            passed: score >= profile.threshold,
            score,
            reason,
        }
    }

    fn reject_term_in(&self, domain: &str) -> Option<&str> {
        self.config
            .reject_terms
            .iter()
            .find(|term| domain.contains(&term.replace(' ', "")))
            .map(String::as_str)
    }

    fn has_keyword(&self, haystack: &str) -> bool {
        self.config
            .financial_keywords
            .iter()
            .any(|keyword| haystack.contains(keyword.as_str()))
    }

    fn name_words<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        name.split_whitespace()
            .filter(|raw| !self.config.stop_words.contains(&raw.to_lowercase()))
            .map(|raw| {
                raw.chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
            })
            .filter(|word| !word.is_empty())
    }

    /// First letter of every non-stop-word, lower-cased.
    fn initials(&self, name: &str) -> String {
        self.name_words(name)
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Distinctive words worth looking for in a domain: longer than four
    /// letters, or an all-caps acronym of three or more.
    fn significant_words(&self, name: &str) -> Vec<String> {
        self.name_words(name)
            .filter(|word| {
                let is_acronym =
                    word.chars().count() >= 3 && word.chars().all(|c| c.is_ascii_uppercase());
                word.chars().count() > 4 || is_acronym
            })
            .map(|word| word.to_lowercase())
            .filter(|word| !self.config.generic_words.contains(word))
            .collect()
    }
}

/// Lower-case name with spaces and dots removed, cut to 15 characters.
fn name_fragment(name_lower: &str) -> String {
    name_lower
        .chars()
        .filter(|c| *c != ' ' && *c != '.')
        .take(NAME_FRAGMENT_LEN)
        .collect()
}

/// Host of `url` in lower case, or the whole string when it is not a URL.
pub fn domain_of(url: &str) -> String {
    let trimmed = url.trim();
    Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{}", trimmed)))
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(ValidatorConfig::default())
    }

    #[test]
    fn test_trusted_categories_skip_scoring() {
        let v = validator();
        for category in [
            Category::PsuBank,
            Category::SmallFinanceBank,
            Category::ForeignBank,
        ] {
            let result = v.validate("Anything", "https://www.hotelparadise.com", category);
            assert!(result.passed);
            assert_eq!(result.score, 100);
            assert!(result.reason.starts_with("Auto-validated"));
        }
    }

    #[test]
    fn test_known_private_bank_domain_passes() {
        let result = validator().validate("HDFC Bank", "https://www.hdfcbank.com", Category::PrivateBank);
        assert!(result.passed);
        assert!(result.score >= 50);
        assert!(result.reason.contains("Domain matches company name"));
    }

    #[test]
    fn test_reject_term_short_circuits() {
        let result = validator().validate(
            "Fake Bank",
            "https://www.hotelparadise.com",
            Category::PrivateBank,
        );
        assert!(!result.passed);
        assert_eq!(result.score, 0);
        assert!(result.reason.contains("non-banking domain"));

        let steel = validator().validate("XYZ Bank", "https://www.steelworks.co.in", Category::PrivateBank);
        assert!(!steel.passed);
        assert_eq!(steel.score, 0);
    }

    #[test]
    fn test_reject_wins_over_positive_signals() {
        let result = validator().validate(
            "Hotel Finance Capital",
            "https://www.hotelfinancecapital.com",
            Category::Nbfc,
        );
        assert!(!result.passed);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_initials_and_significant_words() {
        let v = validator();

        let tmb = v.validate("Tamilnad Mercantile Bank", "https://www.tmbank.in", Category::PrivateBank);
        assert!(tmb.passed);
        assert!(tmb.reason.contains("Initials 'tmb'"));

        let jk = v.validate("Jammu & Kashmir Bank", "https://www.jkbank.com", Category::PrivateBank);
        assert!(jk.passed);
        assert!(jk.reason.contains("Initials 'jkb'"));

        let kotak = v.validate("Kotak Mahindra Bank", "https://www.kotak.com", Category::PrivateBank);
        assert!(kotak.passed);
        assert!(kotak.reason.contains("Name word 'kotak'"));

        let csb = v.validate("CSB Bank", "https://www.csb.co.in", Category::PrivateBank);
        assert!(csb.passed);
    }

    #[test]
    fn test_shortened_name_word_in_domain() {
        let v = validator();

        let dhan = v.validate("Dhanlaxmi Bank", "https://www.dhanbank.com", Category::PrivateBank);
        assert!(dhan.passed, "{}", dhan.reason);
        assert_eq!(dhan.score, 70);
        assert!(dhan.reason.contains("Name prefix 'dhan'"));

        // short words are never cut down
        let acme = v.validate("Acme Bank", "https://www.acmi.org", Category::PrivateBank);
        assert!(!acme.reason.contains("Name prefix"));
    }

    #[test]
    fn test_unrelated_domain_fails_with_fallback_reason() {
        let result = validator().validate("Acme Holdings", "https://example.org", Category::CooperativeBank);
        assert!(!result.passed);
        assert_eq!(result.score, 0);
        assert_eq!(result.reason, "Insufficient evidence");
    }

    #[test]
    fn test_lenient_variant_uses_higher_threshold() {
        let v = validator();

        let matched = v.validate("Mega Finance", "https://www.megafinance.in", Category::Nbfc);
        assert_eq!(matched.score, 90);
        assert!(matched.passed);

        // name keyword only: 20 < 60
        let weak = v.validate("Mega Finance", "https://www.mega.in", Category::Nbfc);
        assert_eq!(weak.score, 20);
        assert!(!weak.passed);
    }

    #[test]
    fn test_content_terms_and_content_rejects() {
        let v = validator();

        let with_content = v.validate_with_content(
            "Mega Finance",
            "https://www.mega.in",
            Category::Nbfc,
            Some("An RBI registered NBFC offering gold loan and personal loan products"),
        );
        assert_eq!(with_content.score, 50);
        assert!(with_content.reason.contains("Financial terms in content"));

        let rejected = v.validate_with_content(
            "Mega Finance",
            "https://www.megafinance.in",
            Category::Nbfc,
            Some("Book a room at our luxury hotel"),
        );
        assert!(!rejected.passed);
        assert_eq!(rejected.score, 0);
    }

    #[test]
    fn test_comparisons_are_case_insensitive() {
        let upper = validator().validate("HDFC BANK", "HTTPS://WWW.HDFCBANK.COM", Category::PrivateBank);
        let lower = validator().validate("hdfc bank", "https://www.hdfcbank.com", Category::PrivateBank);
        assert_eq!(upper.passed, lower.passed);
        assert!(upper.passed);
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://www.sc.com/in"), "www.sc.com");
        assert_eq!(domain_of("hdfcbank.com"), "hdfcbank.com");
        assert_eq!(domain_of("HTTP://Example.COM:8080/x"), "example.com");
    }

    #[test]
    fn test_custom_config_is_normalized() {
        let v = Validator::new(ValidatorConfig {
            reject_terms: vec!["  Casino ".to_string()],
            trusted_categories: vec![],
            ..ValidatorConfig::default()
        });
        let result = v.validate("Lucky Bank", "https://luckycasino.com", Category::ForeignBank);
        assert!(!result.passed);
        assert_eq!(v.group(Category::ForeignBank), CategoryGroup::Heuristic);
    }
}
