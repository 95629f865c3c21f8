//! Per-column filter conditions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::value::CellValue;

/// The kind of data a filter condition interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterType {
    /// Case-insensitive string comparisons.
    Text,
    /// Numeric comparisons.
    Number,
    /// Calendar-date comparisons on ISO `YYYY-MM-DD` values.
    Date,
    /// Membership in an explicit value list.
    Set,
}

/// The comparison a filter condition applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    Equals,
    NotEqual,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    /// Inclusive range between `filter` and `filter_to`.
    InRange,
}

/// A filter applied to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub filter_type: FilterType,
    /// The comparison. When absent, text filters use `contains` and the
    /// other types use `equals`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_to: Option<CellValue>,
    /// Accepted values for `set` filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<CellValue>>,
}

impl FilterCondition {
    fn new(filter_type: FilterType, operator: FilterOperator, filter: CellValue) -> Self {
        Self {
            filter_type,
            operator: Some(operator),
            filter: Some(filter),
            filter_to: None,
            values: None,
        }
    }

    /// Creates a text condition.
    pub fn text(operator: FilterOperator, filter: impl Into<String>) -> Self {
        Self::new(FilterType::Text, operator, CellValue::String(filter.into()))
    }

    /// Creates a number condition.
    pub fn number(operator: FilterOperator, filter: f64) -> Self {
        Self::new(FilterType::Number, operator, CellValue::Float(filter))
    }

    /// Creates an inclusive number range condition.
    pub fn number_range(from: f64, to: f64) -> Self {
        Self {
            filter_to: Some(CellValue::Float(to)),
            ..Self::new(FilterType::Number, FilterOperator::InRange, CellValue::Float(from))
        }
    }

    /// Creates a date condition on an ISO `YYYY-MM-DD` value.
    pub fn date(operator: FilterOperator, filter: impl Into<String>) -> Self {
        Self::new(FilterType::Date, operator, CellValue::String(filter.into()))
    }

    /// Creates a set condition accepting any of `values`.
    pub fn set(values: impl IntoIterator<Item = CellValue>) -> Self {
        Self {
            filter_type: FilterType::Set,
            operator: None,
            filter: None,
            filter_to: None,
            values: Some(values.into_iter().collect()),
        }
    }

    /// The effective comparison.
    pub fn effective_operator(&self) -> FilterOperator {
        self.operator.unwrap_or(match self.filter_type {
            FilterType::Text => FilterOperator::Contains,
            _ => FilterOperator::Equals,
        })
    }

    /// Tests a cell value against this condition.
    ///
    /// A condition without an operand accepts every value.
    pub fn matches(&self, value: &CellValue) -> bool {
        match self.filter_type {
            FilterType::Set => match &self.values {
                Some(values) => {
                    let text = value.to_string();
                    values.iter().any(|candidate| candidate.to_string() == text)
                }
                None => true,
            },
            FilterType::Text => match &self.filter {
                Some(filter) => self.matches_text(value, filter),
                None => true,
            },
            FilterType::Number => match &self.filter {
                Some(filter) => match (value.as_f64(), filter.as_f64()) {
                    (Some(v), Some(f)) => {
                        let to = self.filter_to.as_ref().and_then(CellValue::as_f64);
                        compare_ordered(self.effective_operator(), v, f, to)
                    }
                    _ => false,
                },
                None => true,
            },
            FilterType::Date => match &self.filter {
                Some(filter) => match (parse_date(value), parse_date(filter)) {
                    (Some(v), Some(f)) => {
                        let to = self.filter_to.as_ref().and_then(parse_date);
                        compare_ordered(self.effective_operator(), v, f, to)
                    }
                    _ => false,
                },
                None => true,
            },
        }
    }

    fn matches_text(&self, value: &CellValue, filter: &CellValue) -> bool {
        let value = value.to_string().to_lowercase();
        let filter = filter.to_string().to_lowercase();
        match self.effective_operator() {
            FilterOperator::Contains => value.contains(&filter),
            FilterOperator::Equals => value == filter,
            FilterOperator::NotEqual => value != filter,
            FilterOperator::StartsWith => value.starts_with(&filter),
            FilterOperator::EndsWith => value.ends_with(&filter),
            FilterOperator::GreaterThan => value > filter,
            FilterOperator::LessThan => value < filter,
            FilterOperator::InRange => {
                let to = self
                    .filter_to
                    .as_ref()
                    .map(|to| to.to_string().to_lowercase());
                value >= filter && to.is_none_or(|to| value <= to)
            }
        }
    }
}

fn compare_ordered<T: PartialOrd>(operator: FilterOperator, value: T, filter: T, to: Option<T>) -> bool {
    match operator {
        FilterOperator::Equals => value == filter,
        FilterOperator::NotEqual => value != filter,
        FilterOperator::GreaterThan => value > filter,
        FilterOperator::LessThan => value < filter,
        FilterOperator::InRange => value >= filter && to.is_none_or(|to| value <= to),
        // String operators have no meaning for ordered values.
        FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith => false,
    }
}

fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| text.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}
