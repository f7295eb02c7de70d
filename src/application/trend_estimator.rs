// Trend estimator - Linear trend toward a target weight with prediction bounds
use crate::domain::sample::{Sample, Series};
use crate::domain::trend::{
    ChartPoint, Deviation, ProjectionPoint, RegressionResult, TrendAnalysis, TrendDirection,
};
use chrono::{NaiveDateTime, TimeDelta};
use thiserror::Error;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Distance from the target that counts as having reached it
pub const TARGET_EPSILON: f64 = 0.1;

pub const INSUFFICIENT_DATA_MESSAGE: &str = "Insufficient data for trend analysis";

const ASYMPTOTIC_T_VALUE: f64 = 1.960;

/// Two-tailed 95% critical values of Student's t, keyed by degrees of freedom
const T_TABLE_95: [(usize, f64); 33] = [
    (1, 12.706),
    (2, 4.303),
    (3, 3.182),
    (4, 2.776),
    (5, 2.571),
    (6, 2.447),
    (7, 2.365),
    (8, 2.306),
    (9, 2.262),
    (10, 2.228),
    (11, 2.201),
    (12, 2.179),
    (13, 2.160),
    (14, 2.145),
    (15, 2.131),
    (16, 2.120),
    (17, 2.110),
    (18, 2.101),
    (19, 2.093),
    (20, 2.086),
    (21, 2.080),
    (22, 2.074),
    (23, 2.069),
    (24, 2.064),
    (25, 2.060),
    (26, 2.056),
    (27, 2.052),
    (28, 2.048),
    (29, 2.045),
    (30, 2.042),
    (40, 2.021),
    (50, 2.009),
    (60, 2.000),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrendError {
    #[error("need at least 2 samples for a trend, got {count}")]
    InsufficientData { count: usize },
    #[error("all samples share the same timestamp")]
    DegenerateRegression,
    #[error("prediction interval unavailable: {reason}")]
    DeviationUnavailable { reason: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Fit weight against days elapsed since the first sample.
///
/// The x axis uses real time deltas, so irregular sampling is respected. When
/// every sample shares one instant the result is flagged degenerate: slope 0,
/// intercept at the mean weight and an r² of 0.
pub fn fit_linear_regression(series: &Series) -> Result<RegressionResult, TrendError> {
    let samples = series.samples();
    let n = samples.len();
    if n < 2 {
        return Err(TrendError::InsufficientData { count: n });
    }
    if let Some(bad) = samples.iter().find(|s| !s.weight.is_finite()) {
        return Err(TrendError::InvalidInput(format!(
            "non-finite weight at {}",
            bad.timestamp
        )));
    }

    let first_timestamp = samples[0].timestamp;
    let xs: Vec<f64> = samples
        .iter()
        .map(|s| elapsed_days(first_timestamp, s.timestamp))
        .collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.weight).collect();

    let count = n as f64;
    let mean_x = xs.iter().sum::<f64>() / count;
    let mean_y = ys.iter().sum::<f64>() / count;

    let (sxx, sxy, syy) = xs
        .iter()
        .zip(&ys)
        .fold((0.0, 0.0, 0.0), |(sxx, sxy, syy), (x, y)| {
            let dx = x - mean_x;
            let dy = y - mean_y;
            (sxx + dx * dx, sxy + dx * dy, syy + dy * dy)
        });

    let (slope, intercept) = if sxx == 0.0 {
        (0.0, mean_y)
    } else {
        let slope = sxy / sxx;
        (slope, mean_y - slope * mean_x)
    };

    let residuals: Vec<f64> = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| y - (intercept + slope * x))
        .collect();
    let residual_sum_squares = residuals.iter().map(|r| r * r).sum::<f64>();

    let r_squared = if sxx == 0.0 {
        0.0
    } else if syy == 0.0 {
        1.0
    } else {
        (1.0 - residual_sum_squares / syy).clamp(0.0, 1.0)
    };

    Ok(RegressionResult {
        slope,
        intercept,
        first_timestamp,
        elapsed_days: xs,
        residuals,
        r_squared,
        sample_count: n,
        mean_elapsed_days: mean_x,
        sxx,
        residual_sum_squares,
    })
}

/// Standard error of the fit plus the 95% t multiplier for its degrees of
/// freedom. Callers fall back to an unbounded trend line on error.
pub fn estimate_deviation(regression: &RegressionResult) -> Result<Deviation, TrendError> {
    let n = regression.sample_count;
    if n < 3 {
        return Err(TrendError::DeviationUnavailable {
            reason: format!("need at least 3 samples, got {}", n),
        });
    }

    let degrees_of_freedom = n - 2;
    let standard_error = (regression.residual_sum_squares / degrees_of_freedom as f64).sqrt();
    if !standard_error.is_finite() {
        return Err(TrendError::DeviationUnavailable {
            reason: format!("standard error is {}", standard_error),
        });
    }

    Ok(Deviation {
        standard_error,
        t_value: t_value_95(degrees_of_freedom),
        degrees_of_freedom,
    })
}

/// Nearest tabulated entry; ties go to the smaller df (the wider interval).
fn t_value_95(degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom > 60 {
        return ASYMPTOTIC_T_VALUE;
    }
    T_TABLE_95
        .iter()
        .min_by_key(|(df, _)| df.abs_diff(degrees_of_freedom))
        .map(|(_, t)| *t)
        .unwrap_or(ASYMPTOTIC_T_VALUE)
}

/// Compare the trend against the target, measured from the last sample.
///
/// A flat trend only counts as reaching the target when the last sample is
/// already within [`TARGET_EPSILON`] of it.
pub fn classify_trend_direction(
    regression: &RegressionResult,
    last_sample: &Sample,
    target_weight: f64,
) -> TrendDirection {
    let remaining = target_weight - last_sample.weight;
    let slope = regression.slope;

    if slope == 0.0 || !slope.is_finite() {
        return if remaining.abs() <= TARGET_EPSILON {
            TrendDirection::TargetReached
        } else {
            TrendDirection::MovingAway
        };
    }
    if remaining == 0.0 {
        return TrendDirection::TargetReached;
    }
    if remaining.signum() != slope.signum() {
        return TrendDirection::MovingAway;
    }

    TrendDirection::Approaching {
        days_remaining: remaining / slope,
    }
}

/// Timestamp `days` after `from`, if representable.
pub fn arrival_date(from: NaiveDateTime, days: f64) -> Option<NaiveDateTime> {
    if !days.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_milliseconds((days * MS_PER_DAY).round() as i64)?;
    from.checked_add_signed(delta)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IntervalParams {
    t_times_se: f64,
    sample_count: f64,
    mean_elapsed_days: f64,
    sxx: f64,
}

impl IntervalParams {
    fn margin(&self, elapsed_days: f64) -> f64 {
        let dx = elapsed_days - self.mean_elapsed_days;
        self.t_times_se * (1.0 + 1.0 / self.sample_count + dx * dx / self.sxx).sqrt()
    }
}

/// Future points from the last sample to the target date.
///
/// Holds only scalars; every call to [`Projection::iter`] recomputes the points
/// from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    start: NaiveDateTime,
    start_weight: f64,
    start_elapsed_days: f64,
    slope: f64,
    target_weight: f64,
    target_date: NaiveDateTime,
    total_days: f64,
    point_count: usize,
    interval: Option<IntervalParams>,
}

impl Projection {
    pub fn iter(&self) -> ProjectionPoints {
        ProjectionPoints {
            projection: *self,
            step: 1,
        }
    }

    /// Intermediate points plus the pinned final point
    pub fn len(&self) -> usize {
        self.point_count + 1
    }

    fn point(&self, step: usize) -> ProjectionPoint {
        let last_step = self.point_count + 1;
        let is_final = step == last_step;
        let offset_days = self.total_days * step as f64 / last_step as f64;

        let (timestamp, projected_weight) = if is_final {
            (self.target_date, self.target_weight)
        } else {
            (
                arrival_date(self.start, offset_days).unwrap_or(self.target_date),
                self.start_weight + self.slope * offset_days,
            )
        };

        let (upper_bound, lower_bound) = match self.interval {
            Some(params) => {
                let margin = params.margin(self.start_elapsed_days + offset_days);
                (Some(projected_weight + margin), Some(projected_weight - margin))
            }
            None => (None, None),
        };

        let label = if is_final {
            timestamp.format("%d/%m").to_string()
        } else {
            relative_label(offset_days)
        };

        ProjectionPoint {
            label,
            timestamp,
            projected_weight,
            upper_bound,
            lower_bound,
        }
    }
}

impl<'a> IntoIterator for &'a Projection {
    type Item = ProjectionPoint;
    type IntoIter = ProjectionPoints;

    fn into_iter(self) -> ProjectionPoints {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ProjectionPoints {
    projection: Projection,
    step: usize,
}

impl Iterator for ProjectionPoints {
    type Item = ProjectionPoint;

    fn next(&mut self) -> Option<ProjectionPoint> {
        if self.step > self.projection.len() {
            return None;
        }
        let point = self.projection.point(self.step);
        self.step += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.projection.len() + 1).saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProjectionPoints {}

/// Plan `point_count` evenly spaced points between the last sample and
/// `target_date`, followed by a final point at exactly `target_weight`.
pub fn generate_projection_points(
    regression: &RegressionResult,
    deviation: Option<&Deviation>,
    last_sample: &Sample,
    target_weight: f64,
    target_date: NaiveDateTime,
    point_count: usize,
) -> Projection {
    let interval = deviation
        .filter(|_| regression.sxx > 0.0)
        .map(|d| IntervalParams {
            t_times_se: d.t_value * d.standard_error,
            sample_count: regression.sample_count as f64,
            mean_elapsed_days: regression.mean_elapsed_days,
            sxx: regression.sxx,
        });

    Projection {
        start: last_sample.timestamp,
        start_weight: last_sample.weight,
        start_elapsed_days: elapsed_days(regression.first_timestamp, last_sample.timestamp),
        slope: regression.slope,
        target_weight,
        target_date,
        total_days: elapsed_days(last_sample.timestamp, target_date),
        point_count,
        interval,
    }
}

/// Run the whole pipeline and merge history with the projection for charting.
pub fn analyze_trend(
    series: &Series,
    target_weight: f64,
    point_count: usize,
) -> Result<TrendAnalysis, TrendError> {
    if !target_weight.is_finite() {
        return Err(TrendError::InvalidInput(format!(
            "target weight {} is not finite",
            target_weight
        )));
    }
    let regression = fit_linear_regression(series)?;
    if regression.is_degenerate() {
        return Err(TrendError::DegenerateRegression);
    }
    let Some(last) = series.last() else {
        return Err(TrendError::InsufficientData { count: 0 });
    };

    let deviation = match estimate_deviation(&regression) {
        Ok(deviation) => Some(deviation),
        Err(e) => {
            tracing::debug!("Rendering trend without prediction bounds: {}", e);
            None
        }
    };

    let direction = classify_trend_direction(&regression, last, target_weight);
    let estimated_date = match direction {
        TrendDirection::Approaching { days_remaining } => {
            let date = arrival_date(last.timestamp, days_remaining);
            if date.is_none() {
                tracing::debug!(
                    "Arrival date {} days out is not representable",
                    days_remaining
                );
            }
            date
        }
        TrendDirection::TargetReached => Some(last.timestamp),
        TrendDirection::MovingAway => None,
    };

    let mut points = history_points(series, deviation.is_some());
    if let (TrendDirection::Approaching { .. }, Some(target_date)) = (direction, estimated_date) {
        let projection = generate_projection_points(
            &regression,
            deviation.as_ref(),
            last,
            target_weight,
            target_date,
            point_count,
        );
        points.extend(projection.iter().map(ChartPoint::from));
    }

    let y_domain = weight_domain(&points);

    Ok(TrendAnalysis {
        target_weight,
        slope: regression.slope,
        intercept: regression.intercept,
        r_squared: regression.r_squared,
        sample_count: regression.sample_count,
        weekly_rate: regression.slope * 7.0,
        deviation,
        direction,
        estimated_date,
        points,
        y_domain,
    })
}

impl From<ProjectionPoint> for ChartPoint {
    fn from(point: ProjectionPoint) -> Self {
        ChartPoint {
            label: point.label,
            timestamp: point.timestamp,
            weight: None,
            trend_weight: Some(point.projected_weight),
            upper_bound: point.upper_bound,
            lower_bound: point.lower_bound,
            is_projection: true,
        }
    }
}

fn history_points(series: &Series, with_bounds: bool) -> Vec<ChartPoint> {
    let last_index = series.len().saturating_sub(1);
    series
        .samples()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let join = i == last_index;
            let bound = (join && with_bounds).then_some(s.weight);
            ChartPoint {
                label: s.timestamp.format("%d/%m").to_string(),
                timestamp: s.timestamp,
                weight: Some(s.weight),
                trend_weight: join.then_some(s.weight),
                upper_bound: bound,
                lower_bound: bound,
                is_projection: false,
            }
        })
        .collect()
}

/// `[floor(min) - 1, ceil(max) + 1]` over every plotted value
fn weight_domain(points: &[ChartPoint]) -> Option<(f64, f64)> {
    let values = points.iter().flat_map(|p| {
        [p.weight, p.trend_weight, p.upper_bound, p.lower_bound]
            .into_iter()
            .flatten()
    });

    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((min, max)) => Some((min.min(v), max.max(v))),
        None => Some((v, v)),
    })?;

    Some((min.floor() - 1.0, max.ceil() + 1.0))
}

fn elapsed_days(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / MS_PER_DAY
}

fn relative_label(offset_days: f64) -> String {
    if offset_days < 7.0 {
        format!("+{}d", offset_days.round() as i64)
    } else {
        format!("+{}w", (offset_days / 7.0).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn day(offset: f64) -> NaiveDateTime {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        arrival_date(base, offset).unwrap()
    }

    fn series(points: &[(f64, f64)]) -> Series {
        Series::new(
            points
                .iter()
                .map(|(d, w)| Sample::new(day(*d), *w, None, None, "scale".to_string()))
                .collect(),
        )
    }

    fn noisy_series() -> Series {
        series(&[
            (0.0, 82.1),
            (1.5, 81.7),
            (2.0, 81.9),
            (6.25, 80.8),
            (7.0, 81.0),
            (13.0, 79.6),
            (20.5, 78.9),
            (21.0, 79.3),
        ])
    }

    #[test]
    fn test_residuals_sum_to_zero() {
        let regression = fit_linear_regression(&noisy_series()).unwrap();
        let sum: f64 = regression.residuals.iter().sum();
        assert!(sum.abs() < 1e-9, "residual sum was {}", sum);
        assert_eq!(regression.residuals.len(), 8);
    }

    #[test]
    fn test_uses_elapsed_days_not_index() {
        let regression = fit_linear_regression(&noisy_series()).unwrap();
        assert_eq!(regression.elapsed_days[0], 0.0);
        assert!((regression.elapsed_days[3] - 6.25).abs() < EPS);
        assert!((regression.elapsed_days[7] - 21.0).abs() < EPS);
    }

    #[test]
    fn test_r_squared_in_unit_range() {
        let regression = fit_linear_regression(&noisy_series()).unwrap();
        assert!((0.0..=1.0).contains(&regression.r_squared));
        assert!(regression.slope < 0.0);

        let scattered = series(&[(0.0, 70.0), (1.0, 75.0), (2.0, 69.0), (3.0, 74.0)]);
        let regression = fit_linear_regression(&scattered).unwrap();
        assert!((0.0..=1.0).contains(&regression.r_squared));
    }

    #[test]
    fn test_two_points_exact_slope() {
        let regression = fit_linear_regression(&series(&[(0.0, 80.0), (10.0, 78.0)])).unwrap();
        assert_eq!(regression.slope, -0.2);
        assert_eq!(regression.r_squared, 1.0);
        assert_eq!(regression.sample_count, 2);
        assert!(((regression.intercept + regression.slope * 10.0) - 78.0).abs() < EPS);
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            fit_linear_regression(&series(&[(0.0, 80.0)])),
            Err(TrendError::InsufficientData { count: 1 })
        );
        assert_eq!(
            fit_linear_regression(&Series::default()),
            Err(TrendError::InsufficientData { count: 0 })
        );
    }

    #[test]
    fn test_non_finite_weight_is_invalid() {
        let result = fit_linear_regression(&series(&[(0.0, 80.0), (1.0, f64::NAN)]));
        assert!(matches!(result, Err(TrendError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_time_variance() {
        let same_instant = series(&[(3.0, 80.0), (3.0, 78.0), (3.0, 79.0)]);
        let regression = fit_linear_regression(&same_instant).unwrap();

        assert!(regression.is_degenerate());
        assert_eq!(regression.slope, 0.0);
        assert!((regression.intercept - 79.0).abs() < EPS);
        assert_eq!(regression.r_squared, 0.0);

        assert_eq!(
            analyze_trend(&same_instant, 64.0, 3),
            Err(TrendError::DegenerateRegression)
        );
    }

    #[test]
    fn test_zero_weight_variance() {
        let flat = series(&[(0.0, 75.0), (4.0, 75.0), (9.0, 75.0)]);
        let regression = fit_linear_regression(&flat).unwrap();
        assert_eq!(regression.slope, 0.0);
        assert_eq!(regression.r_squared, 1.0);
    }

    #[test]
    fn test_deviation_needs_three_samples() {
        let regression = fit_linear_regression(&series(&[(0.0, 80.0), (10.0, 78.0)])).unwrap();
        assert!(matches!(
            estimate_deviation(&regression),
            Err(TrendError::DeviationUnavailable { .. })
        ));
    }

    #[test]
    fn test_deviation_values() {
        let regression = fit_linear_regression(&noisy_series()).unwrap();
        let deviation = estimate_deviation(&regression).unwrap();

        assert_eq!(deviation.degrees_of_freedom, 6);
        assert_eq!(deviation.t_value, 2.447);
        let expected = (regression.residual_sum_squares / 6.0).sqrt();
        assert!((deviation.standard_error - expected).abs() < EPS);
    }

    #[test]
    fn test_deviation_non_finite_standard_error() {
        let mut regression = fit_linear_regression(&noisy_series()).unwrap();
        regression.residual_sum_squares = f64::INFINITY;
        assert!(matches!(
            estimate_deviation(&regression),
            Err(TrendError::DeviationUnavailable { .. })
        ));
    }

    #[test]
    fn test_t_value_lookup() {
        assert_eq!(t_value_95(1), 12.706);
        assert_eq!(t_value_95(30), 2.042);
        assert_eq!(t_value_95(33), 2.042);
        // ties go to the smaller df
        assert_eq!(t_value_95(35), 2.042);
        assert_eq!(t_value_95(46), 2.009);
        assert_eq!(t_value_95(60), 2.000);
        assert_eq!(t_value_95(61), 1.960);
        assert_eq!(t_value_95(500), 1.960);
    }

    #[test]
    fn test_classify_losing_toward_lower_target() {
        let data = series(&[(0.0, 80.0), (10.0, 78.0)]);
        let regression = fit_linear_regression(&data).unwrap();
        let direction = classify_trend_direction(&regression, data.last().unwrap(), 64.0);

        assert!(!direction.is_moving_away());
        let days = direction.days_remaining().unwrap();
        assert!((days - 70.0).abs() < EPS);

        let arrival = arrival_date(data.last().unwrap().timestamp, days).unwrap();
        assert_eq!(arrival, day(80.0));
    }

    #[test]
    fn test_classify_gaining_away_from_lower_target() {
        let data = series(&[(0.0, 70.0), (10.0, 71.0)]);
        let regression = fit_linear_regression(&data).unwrap();
        assert!((regression.slope - 0.1).abs() < EPS);

        let direction = classify_trend_direction(&regression, data.last().unwrap(), 64.0);
        assert_eq!(direction, TrendDirection::MovingAway);
        assert_eq!(direction.days_remaining(), None);

        let analysis = analyze_trend(&data, 64.0, 3).unwrap();
        assert_eq!(analysis.estimated_date, None);
        assert!(analysis.points.iter().all(|p| !p.is_projection));
    }

    #[test]
    fn test_classify_flat_trend() {
        let flat = series(&[(0.0, 75.0), (4.0, 75.0), (9.0, 75.0)]);
        let regression = fit_linear_regression(&flat).unwrap();
        let last = flat.last().unwrap();

        assert_eq!(
            classify_trend_direction(&regression, last, 64.0),
            TrendDirection::MovingAway
        );
        assert_eq!(
            classify_trend_direction(&regression, last, 75.05),
            TrendDirection::TargetReached
        );
    }

    #[test]
    fn test_projection_final_point_is_exact_target() {
        let data = series(&[(0.0, 81.3), (3.0, 80.9), (8.0, 80.2), (11.5, 79.77)]);
        let regression = fit_linear_regression(&data).unwrap();
        let target = 64.3;
        let last = data.last().unwrap();
        let days = classify_trend_direction(&regression, last, target)
            .days_remaining()
            .unwrap();
        let target_date = arrival_date(last.timestamp, days).unwrap();

        let projection =
            generate_projection_points(&regression, None, last, target, target_date, 4);
        let points: Vec<ProjectionPoint> = projection.iter().collect();

        assert_eq!(points.len(), 5);
        let final_point = points.last().unwrap();
        assert_eq!(final_point.projected_weight, target);
        assert_eq!(final_point.timestamp, target_date);
    }

    #[test]
    fn test_projection_spacing_and_labels() {
        let data = series(&[(0.0, 80.0), (10.0, 78.0)]);
        let regression = fit_linear_regression(&data).unwrap();
        let last = data.last().unwrap();

        let projection =
            generate_projection_points(&regression, None, last, 64.0, day(80.0), 3);
        let points: Vec<ProjectionPoint> = projection.iter().collect();

        let timestamps: Vec<NaiveDateTime> = points.iter().map(|p| p.timestamp).collect();
        assert_eq!(
            timestamps,
            vec![day(27.5), day(45.0), day(62.5), day(80.0)]
        );
        assert!((points[0].projected_weight - 74.5).abs() < EPS);
        assert!((points[1].projected_weight - 71.0).abs() < EPS);

        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["+3w", "+5w", "+8w", "21/03"]);
    }

    #[test]
    fn test_projection_is_restartable() {
        let data = noisy_series();
        let regression = fit_linear_regression(&data).unwrap();
        let deviation = estimate_deviation(&regression).unwrap();
        let last = data.last().unwrap();

        let projection = generate_projection_points(
            &regression,
            Some(&deviation),
            last,
            75.0,
            day(60.0),
            3,
        );

        let first: Vec<ProjectionPoint> = projection.iter().collect();
        let second: Vec<ProjectionPoint> = (&projection).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(projection.iter().len(), 4);
    }

    #[test]
    fn test_projection_bounds_widen_with_distance() {
        let data = noisy_series();
        let regression = fit_linear_regression(&data).unwrap();
        let deviation = estimate_deviation(&regression).unwrap();
        let last = data.last().unwrap();

        let points: Vec<ProjectionPoint> = generate_projection_points(
            &regression,
            Some(&deviation),
            last,
            75.0,
            day(60.0),
            3,
        )
        .iter()
        .collect();

        let widths: Vec<f64> = points
            .iter()
            .map(|p| p.upper_bound.unwrap() - p.lower_bound.unwrap())
            .collect();
        assert!(widths.windows(2).all(|w| w[1] > w[0]));

        for p in &points {
            let up = p.upper_bound.unwrap() - p.projected_weight;
            let down = p.projected_weight - p.lower_bound.unwrap();
            assert!((up - down).abs() < EPS);
        }

        // first point sits 9.75 days past the last sample
        let n = regression.sample_count as f64;
        let dx = 21.0 + 9.75 - regression.mean_elapsed_days;
        let expected = deviation.t_value
            * deviation.standard_error
            * (1.0 + 1.0 / n + dx * dx / regression.sxx).sqrt();
        assert!((points[0].upper_bound.unwrap() - points[0].projected_weight - expected).abs() < 1e-6);
    }

    #[test]
    fn test_two_samples_fall_back_without_bounds() {
        let data = series(&[(0.0, 80.0), (10.0, 78.0)]);
        let analysis = analyze_trend(&data, 64.0, 3).unwrap();

        assert_eq!(analysis.deviation, None);
        assert!(analysis
            .points
            .iter()
            .all(|p| p.upper_bound.is_none() && p.lower_bound.is_none()));
        assert_eq!(analysis.estimated_date, Some(day(80.0)));
        assert_eq!(analysis.days_remaining_rounded(), Some(70));
        assert!((analysis.weekly_rate + 1.4).abs() < EPS);
    }

    #[test]
    fn test_analysis_combined_sequence() {
        let data = noisy_series();
        let analysis = analyze_trend(&data, 75.0, 3).unwrap();

        assert_eq!(analysis.points.len(), data.len() + 4);

        let history = &analysis.points[..data.len()];
        assert!(history.iter().all(|p| p.weight.is_some() && !p.is_projection));
        assert!(history[..data.len() - 1]
            .iter()
            .all(|p| p.trend_weight.is_none() && p.upper_bound.is_none()));

        let join = &history[data.len() - 1];
        assert_eq!(join.trend_weight, join.weight);
        assert_eq!(join.upper_bound, join.weight);

        let projected = &analysis.points[data.len()..];
        assert!(projected
            .iter()
            .all(|p| p.weight.is_none() && p.trend_weight.is_some() && p.upper_bound.is_some()));
        assert_eq!(projected.last().unwrap().trend_weight, Some(75.0));

        let (low, high) = analysis.y_domain.unwrap();
        assert!(low <= 74.0);
        assert!(high >= 83.0);
    }

    #[test]
    fn test_non_finite_target_is_invalid() {
        let result = analyze_trend(&noisy_series(), f64::INFINITY, 3);
        assert!(matches!(result, Err(TrendError::InvalidInput(_))));
    }

    #[test]
    fn test_target_reached_has_no_projection() {
        let data = series(&[(0.0, 64.0625), (5.0, 64.0625), (9.0, 64.0625)]);
        let analysis = analyze_trend(&data, 64.0, 3).unwrap();

        assert_eq!(analysis.direction, TrendDirection::TargetReached);
        assert_eq!(analysis.estimated_date, Some(day(9.0)));
        assert_eq!(analysis.points.len(), 3);
    }

    #[test]
    fn test_falling_trend_near_target_still_projects() {
        let data = series(&[(0.0, 64.5), (5.0, 64.2), (9.0, 64.05)]);
        let analysis = analyze_trend(&data, 64.0, 3).unwrap();

        assert!(matches!(
            analysis.direction,
            TrendDirection::Approaching { .. }
        ));
        assert!(analysis.estimated_date.is_some());
        assert_eq!(analysis.points.iter().filter(|p| p.is_projection).count(), 4);
    }

    #[test]
    fn test_rising_just_above_target_moves_away() {
        let data = series(&[(0.0, 63.0), (10.0, 64.05)]);
        let regression = fit_linear_regression(&data).unwrap();
        assert!(regression.slope > 0.0);

        let direction = classify_trend_direction(&regression, data.last().unwrap(), 64.0);
        assert_eq!(direction, TrendDirection::MovingAway);
        assert_eq!(direction.days_remaining(), None);
    }

    #[test]
    fn test_falling_just_above_target_approaches() {
        let data = series(&[(0.0, 80.0), (10.0, 64.05)]);
        let regression = fit_linear_regression(&data).unwrap();
        let direction = classify_trend_direction(&regression, data.last().unwrap(), 64.0);

        let days = direction.days_remaining().unwrap();
        let expected = (64.0 - 64.05) / regression.slope;
        assert!((days - expected).abs() < EPS);
        assert!((days - 0.0313).abs() < 1e-4);
    }
}
