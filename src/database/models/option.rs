use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// A lookup row: type, status, severity, product, area, indicator, faulty system or cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OptionItem {
    pub id: i32,
    pub name: String,
}

/// The eight lookup tables exposed under `/options`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Types,
    Statuses,
    Severities,
    Products,
    Areas,
    PerformanceIndicators,
    FaultySystems,
    Causes,
}

impl OptionKind {
    pub const ALL: [OptionKind; 8] = [
        OptionKind::Types,
        OptionKind::Statuses,
        OptionKind::Severities,
        OptionKind::Products,
        OptionKind::Areas,
        OptionKind::PerformanceIndicators,
        OptionKind::FaultySystems,
        OptionKind::Causes,
    ];

    pub fn table(self) -> &'static str {
        match self {
            OptionKind::Types => "types",
            OptionKind::Statuses => "statuses",
            OptionKind::Severities => "severities",
            OptionKind::Products => "products",
            OptionKind::Areas => "areas",
            OptionKind::PerformanceIndicators => "performance_indicators",
            OptionKind::FaultySystems => "faulty_systems",
            OptionKind::Causes => "causes",
        }
    }

    /// URL segment under `/options/`
    pub fn slug(self) -> &'static str {
        match self {
            OptionKind::Types => "types",
            OptionKind::Statuses => "status",
            OptionKind::Severities => "severity",
            OptionKind::Products => "products",
            OptionKind::Areas => "areas",
            OptionKind::PerformanceIndicators => "performance-indicators",
            OptionKind::FaultySystems => "faulty-systems",
            OptionKind::Causes => "causes",
        }
    }

    /// Key the list is wrapped under in the response `data` object
    pub fn response_key(self) -> &'static str {
        match self {
            OptionKind::Types => "type",
            OptionKind::Statuses => "status",
            OptionKind::Severities => "severity",
            OptionKind::Products => "products",
            OptionKind::Areas => "areas",
            OptionKind::PerformanceIndicators => "performanceIndicators",
            OptionKind::FaultySystems => "faultySystems",
            OptionKind::Causes => "causes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OptionKind::Types => "types",
            OptionKind::Statuses => "statuses",
            OptionKind::Severities => "severities",
            OptionKind::Products => "products",
            OptionKind::Areas => "areas",
            OptionKind::PerformanceIndicators => "performance indicators",
            OptionKind::FaultySystems => "faulty systems",
            OptionKind::Causes => "causes",
        }
    }
}

impl FromStr for OptionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("unknown option list: {}", s))
    }
}
