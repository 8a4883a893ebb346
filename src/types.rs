use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How an [`ArgumentSet`](crate::args::ArgumentSet) renders its entries.
///
/// - `Flag`: `-key value` / `-flag`, the form used for encoder options.
/// - `Assignment`: `key=value`, the form used inside filter chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgStyle {
    #[default]
    Flag,
    Assignment,
}

impl fmt::Display for ArgStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgStyle::Flag => write!(f, "flag"),
            ArgStyle::Assignment => write!(f, "assignment"),
        }
    }
}

impl FromStr for ArgStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flag" | "arg" => Ok(ArgStyle::Flag),
            "assignment" | "filter" => Ok(ArgStyle::Assignment),
            other => Err(format!(
                "invalid argument style: {other} (expected \"flag\" or \"assignment\")"
            )),
        }
    }
}
