//! Planner view tabs.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the four planner pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ViewMode {
    /// Tab order.
    pub const ALL: [ViewMode; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Tab label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| format!("unknown view `{value}`; expected daily|weekly|monthly|yearly"))
    }
}

#[cfg(test)]
mod tests {
    use super::ViewMode;

    #[test]
    fn parses_case_insensitively_and_defaults_to_daily() {
        assert_eq!("Monthly".parse::<ViewMode>().unwrap(), ViewMode::Monthly);
        assert!("agenda".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::default(), ViewMode::Daily);
        assert_eq!(ViewMode::Yearly.label(), "Yearly");
    }
}
