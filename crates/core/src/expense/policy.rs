//! Submission policy: allowed categories and minimum text lengths.

use expensa_shared::config::ExpenseSettings;

/// Rules a new expense must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpensePolicy {
    categories: Vec<String>,
    min_title_len: usize,
    min_description_len: usize,
}

impl Default for ExpensePolicy {
    fn default() -> Self {
        Self::from_settings(&ExpenseSettings::default())
    }
}

impl ExpensePolicy {
    /// Creates a policy.
    ///
    /// Minimum lengths below 1 are raised to 1 so empty text is never accepted.
    #[must_use]
    pub fn new(categories: Vec<String>, min_title_len: usize, min_description_len: usize) -> Self {
        Self {
            categories,
            min_title_len: min_title_len.max(1),
            min_description_len: min_description_len.max(1),
        }
    }

    /// Builds the policy from configuration.
    #[must_use]
    pub fn from_settings(settings: &ExpenseSettings) -> Self {
        Self::new(
            settings.categories.clone(),
            settings.min_title_len,
            settings.min_description_len,
        )
    }

    /// Configured categories.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Minimum title length.
    #[must_use]
    pub const fn min_title_len(&self) -> usize {
        self.min_title_len
    }

    /// Minimum description length.
    #[must_use]
    pub const fn min_description_len(&self) -> usize {
        self.min_description_len
    }

    /// Returns the configured spelling of `category`, matched case-insensitively.
    #[must_use]
    pub fn canonical_category(&self, category: &str) -> Option<&str> {
        let wanted = category.trim();
        self.categories
            .iter()
            .find(|c| c.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}
