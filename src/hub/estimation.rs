/// Unit a human-entered effort estimate is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimationUnit {
    #[default]
    Hours,
    Days,
    Weeks,
    Months,
}

impl EstimationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimationUnit::Hours => "hours",
            EstimationUnit::Days => "days",
            EstimationUnit::Weeks => "weeks",
            EstimationUnit::Months => "months",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hours" => Some(EstimationUnit::Hours),
            "days" => Some(EstimationUnit::Days),
            "weeks" => Some(EstimationUnit::Weeks),
            "months" => Some(EstimationUnit::Months),
            _ => None,
        }
    }

    /// Working hours per unit
    pub fn multiplier(&self) -> f64 {
        match self {
            EstimationUnit::Hours => 1.0,
            EstimationUnit::Days => 8.0,
            EstimationUnit::Weeks => 40.0,
            EstimationUnit::Months => 160.0,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            EstimationUnit::Hours => EstimationUnit::Days,
            EstimationUnit::Days => EstimationUnit::Weeks,
            EstimationUnit::Weeks => EstimationUnit::Months,
            EstimationUnit::Months => EstimationUnit::Hours,
        }
    }
}

/// Convert an estimate to hours. Unknown units pass the value through;
/// missing, non-finite or non-positive values become 0.
pub fn convert_to_hours(value: Option<f64>, unit: &str) -> f64 {
    let value = match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => return 0.0,
    };
    match EstimationUnit::from_str(unit) {
        Some(unit) => value * unit.multiplier(),
        None => value,
    }
}
