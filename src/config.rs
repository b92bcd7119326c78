//! Configuration for MARC export.
//!
//! [`ExportOptions`] carries the per-export switches threaded from the caller
//! (whether unpublished content is included, whether ARKs are exported).
//! [`CatalogingConventions`] holds the constants of local cataloging practice
//! written into the cataloging source (040), local code (049) and country of
//! publication (044) fields.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for a single export.
///
/// # Examples
///
/// ```
/// use archmarc::ExportOptions;
///
/// let options = ExportOptions::new().with_unpublished(true);
/// assert!(options.include_unpublished);
/// assert!(!options.arks_enabled);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Include unpublished notes and sub-notes in the exported text.
    pub include_unpublished: bool,

    /// Export the current ARK as an 856 field.
    pub arks_enabled: bool,
}

impl ExportOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Include unpublished content.
    #[must_use]
    pub const fn with_unpublished(mut self, enabled: bool) -> Self {
        self.include_unpublished = enabled;
        self
    }

    /// Export ARKs.
    #[must_use]
    pub const fn with_arks(mut self, enabled: bool) -> Self {
        self.arks_enabled = enabled;
        self
    }
}

/// Local cataloging constants.
///
/// The defaults encode the conventions of the University of Colorado Boulder
/// Libraries (`COD`), which describe in English under DACS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogingConventions {
    /// MARC code of the cataloging agency (040 $a and $c)
    pub cataloging_agency: String,

    /// Language of cataloging (040 $b)
    pub cataloging_language: String,

    /// Description conventions (040 $e)
    pub description_rules: String,

    /// Local holdings code (049 $a)
    pub local_code: String,

    /// MARC country code written for `US` repositories.
    ///
    /// Repositories carry no state, so the generic "United States" code is
    /// used instead of a state-level one.
    pub us_country_code: String,
}

impl Default for CatalogingConventions {
    fn default() -> Self {
        Self {
            cataloging_agency: "COD".to_string(),
            cataloging_language: "eng".to_string(),
            description_rules: "dacs".to_string(),
            local_code: "CODE".to_string(),
            us_country_code: "xxu".to_string(),
        }
    }
}

impl CatalogingConventions {
    /// Creates conventions with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load conventions from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the cataloging agency code.
    #[must_use]
    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.cataloging_agency = agency.into();
        self
    }

    /// Sets the local holdings code.
    #[must_use]
    pub fn with_local_code(mut self, code: impl Into<String>) -> Self {
        self.local_code = code.into();
        self
    }
}
