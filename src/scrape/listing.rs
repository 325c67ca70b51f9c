//! Listing and time-filter parameters for Reddit queries.

use std::fmt;
use std::str::FromStr;

use crate::error::RedsiftError;

/// Subreddit listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Listing {
    #[default]
    Hot,
    New,
    Top,
    Rising,
}

impl Listing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Listing::Hot => "hot",
            Listing::New => "new",
            Listing::Top => "top",
            Listing::Rising => "rising",
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Listing {
    type Err = RedsiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Listing::Hot),
            "new" => Ok(Listing::New),
            "top" => Ok(Listing::Top),
            "rising" => Ok(Listing::Rising),
            other => Err(RedsiftError::Config(format!("Unknown listing: {}", other))),
        }
    }
}

/// Time window for search and top listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFilter {
    type Err = RedsiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeFilter::Hour),
            "day" => Ok(TimeFilter::Day),
            "week" => Ok(TimeFilter::Week),
            "month" => Ok(TimeFilter::Month),
            "year" => Ok(TimeFilter::Year),
            "all" => Ok(TimeFilter::All),
            other => Err(RedsiftError::Config(format!(
                "Unknown time filter: {}",
                other
            ))),
        }
    }
}
