use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Tuning knobs for a single extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Clustering tolerance for column positions, in page units
    pub x_tolerance: f64,
    /// Clustering tolerance for row positions, in page units
    pub y_tolerance: f64,
    /// Lower bound for the automatic column-count search
    pub min_column_count: usize,
    /// Upper bound for the automatic column-count search
    pub max_column_count: usize,
    /// Header labels; a `\n` inside a label separates parts stacked on the page
    pub column_headers: Option<Vec<String>>,
    /// Vertical gap that ends a header-guided table (`None` = unbounded)
    pub end_of_table_whitespace: Option<f64>,
    /// Decimal separator used when mapping tables to records
    pub decimal_separator: char,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            min_column_count: 2,
            max_column_count: 15,
            column_headers: None,
            end_of_table_whitespace: None,
            decimal_separator: '.',
        }
    }
}

impl ExtractionOptions {
    #[must_use]
    pub fn with_tolerances(mut self, x_tolerance: f64, y_tolerance: f64) -> Self {
        self.x_tolerance = x_tolerance;
        self.y_tolerance = y_tolerance;
        self
    }

    #[must_use]
    pub fn with_column_range(mut self, min: usize, max: usize) -> Self {
        self.min_column_count = min;
        self.max_column_count = max;
        self
    }

    /// Enable header-guided extraction with the given labels
    #[must_use]
    pub fn with_column_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_end_of_table_whitespace(mut self, gap: f64) -> Self {
        self.end_of_table_whitespace = Some(gap);
        self
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Header labels, if any non-empty list was configured.
    pub fn header_labels(&self) -> Option<&[String]> {
        self.column_headers
            .as_deref()
            .filter(|labels| !labels.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("x_tolerance", self.x_tolerance),
            ("y_tolerance", self.y_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidOptions(format!(
                    "{name} must be a finite value >= 0, got {value}"
                )));
            }
        }

        if self.min_column_count == 0 {
            return Err(LayoutError::InvalidOptions(
                "min_column_count must be >= 1".to_string(),
            ));
        }
        if self.min_column_count > self.max_column_count {
            return Err(LayoutError::InvalidOptions(format!(
                "min_column_count {} is greater than max_column_count {}",
                self.min_column_count, self.max_column_count
            )));
        }

        if let Some(gap) = self.end_of_table_whitespace {
            if gap.is_nan() || gap <= 0.0 {
                return Err(LayoutError::InvalidOptions(format!(
                    "end_of_table_whitespace must be > 0, got {gap}"
                )));
            }
        }

        if self.decimal_separator.is_whitespace() || self.decimal_separator.is_ascii_digit() {
            return Err(LayoutError::InvalidOptions(format!(
                "decimal_separator {:?} cannot be whitespace or a digit",
                self.decimal_separator
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractionOptions::default();
        assert_eq!(options.x_tolerance, 3.0);
        assert_eq!(options.y_tolerance, 3.0);
        assert_eq!(options.min_column_count, 2);
        assert_eq!(options.max_column_count, 15);
        assert!(options.column_headers.is_none());
        assert!(options.end_of_table_whitespace.is_none());
        assert_eq!(options.decimal_separator, '.');
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = ExtractionOptions::default();
        assert!(base.clone().with_tolerances(-1.0, 3.0).validate().is_err());
        assert!(base.clone().with_tolerances(3.0, f64::NAN).validate().is_err());
        assert!(base.clone().with_column_range(0, 4).validate().is_err());
        assert!(base.clone().with_column_range(5, 4).validate().is_err());
        assert!(base
            .clone()
            .with_end_of_table_whitespace(0.0)
            .validate()
            .is_err());
        assert!(base.clone().with_decimal_separator('7').validate().is_err());
        assert!(base.with_decimal_separator(',').validate().is_ok());
    }

    #[test]
    fn test_empty_header_list_is_disabled() {
        let options = ExtractionOptions::default().with_column_headers(Vec::<String>::new());
        assert!(options.header_labels().is_none());

        let options = ExtractionOptions::default().with_column_headers(["Name", "Qty"]);
        assert_eq!(options.header_labels().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ExtractionOptions =
            serde_json::from_str(r#"{"x_tolerance": 5.0, "column_headers": ["A\nB"]}"#)
                .expect("options json");
        assert_eq!(options.x_tolerance, 5.0);
        assert_eq!(options.y_tolerance, 3.0);
        assert_eq!(options.header_labels(), Some(&["A\nB".to_string()][..]));
    }
}
