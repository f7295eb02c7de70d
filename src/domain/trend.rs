// Trend analysis domain models
use chrono::NaiveDateTime;

/// Ordinary least squares fit of weight against elapsed days.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    /// Weight units per day
    pub slope: f64,
    pub intercept: f64,
    pub first_timestamp: NaiveDateTime,
    pub elapsed_days: Vec<f64>,
    pub residuals: Vec<f64>,
    pub r_squared: f64,
    pub sample_count: usize,
    pub mean_elapsed_days: f64,
    /// Σ(x−x̄)² over elapsed days
    pub sxx: f64,
    pub residual_sum_squares: f64,
}

impl RegressionResult {
    /// All samples share one instant, so no slope can be fitted.
    pub fn is_degenerate(&self) -> bool {
        self.sxx == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub standard_error: f64,
    pub t_value: f64,
    pub degrees_of_freedom: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrendDirection {
    Approaching { days_remaining: f64 },
    TargetReached,
    MovingAway,
}

impl TrendDirection {
    pub fn is_moving_away(&self) -> bool {
        matches!(self, TrendDirection::MovingAway)
    }

    pub fn days_remaining(&self) -> Option<f64> {
        match self {
            TrendDirection::Approaching { days_remaining } => Some(*days_remaining),
            TrendDirection::TargetReached => Some(0.0),
            TrendDirection::MovingAway => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPoint {
    pub label: String,
    pub timestamp: NaiveDateTime,
    pub projected_weight: f64,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
}

/// One entry of the combined history + projection sequence.
///
/// Historical entries carry `weight`; projected entries carry `trend_weight`
/// and, outside fallback mode, the interval bounds. The last historical entry
/// carries both so the trend line joins the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub timestamp: NaiveDateTime,
    pub weight: Option<f64>,
    pub trend_weight: Option<f64>,
    pub upper_bound: Option<f64>,
    pub lower_bound: Option<f64>,
    pub is_projection: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendAnalysis {
    pub target_weight: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub sample_count: usize,
    pub weekly_rate: f64,
    pub deviation: Option<Deviation>,
    pub direction: TrendDirection,
    pub estimated_date: Option<NaiveDateTime>,
    pub points: Vec<ChartPoint>,
    pub y_domain: Option<(f64, f64)>,
}

impl TrendAnalysis {
    pub fn days_remaining_rounded(&self) -> Option<i64> {
        self.direction.days_remaining().map(|d| d.ceil() as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendView {
    Available(TrendAnalysis),
    Unavailable { message: String, reason: String },
}
