//! Linear trend estimation for yearly series.
//!
//! Uses ordinary least squares over (period, value) pairs and extrapolates
//! the fitted line past the last observed period.

use crate::domain::model::{SeriesKind, TimeSeriesPoint};
use crate::utils::error::{EtlError, Result};

/// Fitted line `value = slope * period + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    n_observations: usize,
}

impl LinearTrend {
    /// Fits the line over `samples`. Repeated periods count as independent
    /// samples. Needs at least two points spread over two distinct periods.
    pub fn fit(samples: &[(i32, f64)]) -> Result<Self> {
        if samples.len() < 2 {
            return Err(EtlError::InsufficientData {
                required: 2,
                actual: samples.len(),
            });
        }

        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|&(x, _)| f64::from(x)).sum::<f64>() / n;
        let mean_y = samples.iter().map(|&(_, y)| y).sum::<f64>() / n;

        // Centered sums keep precision with year-sized abscissas.
        let (sxx, sxy) = samples.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = f64::from(x) - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

        if sxx == 0.0 {
            return Err(EtlError::InsufficientData {
                required: 2,
                actual: 1,
            });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ss_tot: f64 = samples.iter().map(|&(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = samples
            .iter()
            .map(|&(x, y)| (y - (slope * f64::from(x) + intercept)).powi(2))
            .sum();
        let r_squared = if ss_tot > 1e-12 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        Ok(Self {
            slope,
            intercept,
            r_squared,
            n_observations: samples.len(),
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    pub fn predict_at(&self, period: i32) -> f64 {
        self.slope * f64::from(period) + self.intercept
    }
}

/// Fits a trend over the historical `series` and appends `horizon`
/// prediction points for the periods right after the last one.
///
/// The returned series holds the input points ordered by period followed
/// by the predictions. Input points keep their values and tags.
pub fn fit_and_extrapolate(
    series: &[TimeSeriesPoint],
    horizon: usize,
) -> Result<Vec<TimeSeriesPoint>> {
    let samples: Vec<(i32, f64)> = series.iter().map(|p| (p.period, p.value)).collect();
    let trend = LinearTrend::fit(&samples)?;

    let mut historical = series.to_vec();
    historical.sort_by_key(|p| p.period);

    let last = historical
        .last()
        .map(|p| p.period)
        .ok_or(EtlError::InsufficientData {
            required: 2,
            actual: 0,
        })?;

    tracing::debug!(
        slope = trend.slope(),
        intercept = trend.intercept(),
        r_squared = trend.r_squared(),
        horizon,
        "Fitted temperature trend"
    );

    let steps = i32::try_from(horizon)
        .ok()
        .filter(|steps| last.checked_add(*steps).is_some())
        .ok_or_else(|| EtlError::ProcessingError {
            message: format!("forecast horizon {} runs past the last representable year", horizon),
        })?;

    let predictions = (1..=steps).map(|step| {
        let period = last + step;
        TimeSeriesPoint {
            period,
            value: trend.predict_at(period),
            series_kind: SeriesKind::Prediction,
        }
    });

    historical.extend(predictions);
    Ok(historical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_two_point_fit_and_extrapolation() {
        let series = vec![
            TimeSeriesPoint::historical(2000, 10.0),
            TimeSeriesPoint::historical(2001, 12.0),
        ];

        let trend = LinearTrend::fit(&[(2000, 10.0), (2001, 12.0)]).unwrap();
        assert_close(trend.slope(), 2.0);
        assert_close(trend.intercept(), -3990.0);

        let extended = fit_and_extrapolate(&series, 2).unwrap();
        assert_eq!(extended.len(), 4);
        assert_eq!(&extended[..2], &series[..]);

        assert_eq!(extended[2].period, 2002);
        assert_close(extended[2].value, 14.0);
        assert_eq!(extended[2].series_kind, SeriesKind::Prediction);

        assert_eq!(extended[3].period, 2003);
        assert_close(extended[3].value, 16.0);
        assert_eq!(extended[3].series_kind, SeriesKind::Prediction);
    }

    #[test]
    fn test_output_is_ordered_by_period() {
        let series = vec![
            TimeSeriesPoint::historical(2003, 4.0),
            TimeSeriesPoint::historical(2001, 2.0),
            TimeSeriesPoint::historical(2002, 3.0),
        ];

        let extended = fit_and_extrapolate(&series, 3).unwrap();
        let periods: Vec<i32> = extended.iter().map(|p| p.period).collect();
        assert_eq!(periods, vec![2001, 2002, 2003, 2004, 2005, 2006]);

        for original in &series {
            assert!(extended.contains(original));
        }
        assert_close(extended[5].value, 7.0);
    }

    #[test]
    fn test_tied_periods_are_independent_samples() {
        let trend = LinearTrend::fit(&[(2000, 0.0), (2000, 2.0), (2001, 3.0)]).unwrap();
        // mean_x = 2000.333, mean_y = 5/3; slope = 2.0
        assert_close(trend.slope(), 2.0);
        assert_close(trend.predict_at(2000), 1.0);
    }

    #[test]
    fn test_zero_horizon_returns_history_only() {
        let series = vec![
            TimeSeriesPoint::historical(1990, 1.0),
            TimeSeriesPoint::historical(1991, 1.5),
        ];
        assert_eq!(fit_and_extrapolate(&series, 0).unwrap(), series);
    }

    #[test]
    fn test_fewer_than_two_points_is_insufficient() {
        let err = fit_and_extrapolate(&[TimeSeriesPoint::historical(2000, 1.0)], 5).unwrap_err();
        assert!(matches!(
            err,
            EtlError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));

        let err = fit_and_extrapolate(&[], 5).unwrap_err();
        assert!(matches!(err, EtlError::InsufficientData { actual: 0, .. }));
    }

    #[test]
    fn test_single_distinct_period_is_insufficient() {
        let err = LinearTrend::fit(&[(2000, 1.0), (2000, 3.0)]).unwrap_err();
        assert!(matches!(err, EtlError::InsufficientData { actual: 1, .. }));
    }

    #[test]
    fn test_horizon_past_last_year_is_rejected() {
        let series = vec![
            TimeSeriesPoint::historical(2000, 1.0),
            TimeSeriesPoint::historical(2001, 2.0),
        ];
        let err = fit_and_extrapolate(&series, usize::MAX).unwrap_err();
        assert!(matches!(err, EtlError::ProcessingError { .. }));

        let near_end = vec![
            TimeSeriesPoint::historical(i32::MAX - 1, 1.0),
            TimeSeriesPoint::historical(i32::MAX, 2.0),
        ];
        assert!(fit_and_extrapolate(&near_end, 1).is_err());
        assert_eq!(fit_and_extrapolate(&near_end, 0).unwrap().len(), 2);
    }

    #[test]
    fn test_perfect_fit_r_squared() {
        let samples: Vec<(i32, f64)> = (0..10).map(|i| (1950 + i, 0.5 * i as f64)).collect();
        let trend = LinearTrend::fit(&samples).unwrap();
        assert_close(trend.r_squared(), 1.0);
        assert_eq!(trend.n_observations(), 10);
    }
}
