//! Metric functions over label/prediction vectors.
//!
//! Classification metrics compare cells for equality. `precision`, `recall`
//! and `f1` are binary with `1`/`true` as the positive label. Regression
//! metrics require numeric cells. Error metrics are negated by the scorer
//! registry so that greater is always better.

use std::collections::BTreeMap;

use trubric_core::errors::{ValidationError, ValidationResult};

use crate::data::Cell;

fn check_lengths(metric: &str, y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<()> {
    if y_true.len() != y_pred.len() {
        return Err(ValidationError::Metric {
            metric: metric.to_string(),
            reason: format!(
                "{} labels but {} predictions",
                y_true.len(),
                y_pred.len()
            ),
        });
    }
    if y_true.is_empty() {
        return Err(ValidationError::Metric {
            metric: metric.to_string(),
            reason: "no samples to score".to_string(),
        });
    }
    Ok(())
}

fn is_positive(cell: &Cell) -> bool {
    matches!(cell, Cell::Bool(true)) || *cell == Cell::Int(1)
}

pub fn accuracy(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    check_lengths("accuracy", y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean of per-class recall over the classes present in `y_true`.
pub fn balanced_accuracy(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    check_lengths("balanced_accuracy", y_true, y_pred)?;
    let mut per_class: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (t, p) in y_true.iter().zip(y_pred) {
        let entry = per_class.entry(t.to_string()).or_default();
        entry.1 += 1;
        if t == p {
            entry.0 += 1;
        }
    }
    let recalls: f64 = per_class
        .values()
        .map(|(hit, total)| *hit as f64 / *total as f64)
        .sum();
    Ok(recalls / per_class.len() as f64)
}

struct Confusion {
    tp: usize,
    fp: usize,
    fn_: usize,
}

fn confusion(y_true: &[Cell], y_pred: &[Cell]) -> Confusion {
    let mut c = Confusion { tp: 0, fp: 0, fn_: 0 };
    for (t, p) in y_true.iter().zip(y_pred) {
        match (is_positive(t), is_positive(p)) {
            (true, true) => c.tp += 1,
            (false, true) => c.fp += 1,
            (true, false) => c.fn_ += 1,
            (false, false) => {}
        }
    }
    c
}

fn ratio(num: usize, den: usize) -> f64 {
    // Zero-division yields 0, as scikit-learn does by default.
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn precision(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    check_lengths("precision", y_true, y_pred)?;
    let c = confusion(y_true, y_pred);
    Ok(ratio(c.tp, c.tp + c.fp))
}

pub fn recall(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    check_lengths("recall", y_true, y_pred)?;
    let c = confusion(y_true, y_pred);
    Ok(ratio(c.tp, c.tp + c.fn_))
}

pub fn f1(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    check_lengths("f1", y_true, y_pred)?;
    let c = confusion(y_true, y_pred);
    Ok(ratio(2 * c.tp, 2 * c.tp + c.fp + c.fn_))
}

fn numeric_pairs(
    metric: &str,
    y_true: &[Cell],
    y_pred: &[Cell],
) -> ValidationResult<Vec<(f64, f64)>> {
    check_lengths(metric, y_true, y_pred)?;
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| match (t.as_f64(), p.as_f64()) {
            (Some(t), Some(p)) if !t.is_nan() && !p.is_nan() => Ok((t, p)),
            _ => Err(ValidationError::Metric {
                metric: metric.to_string(),
                reason: format!("non-numeric pair ({t}, {p})"),
            }),
        })
        .collect()
}

pub fn r2(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    let pairs = numeric_pairs("r2", y_true, y_pred)?;
    let mean = pairs.iter().map(|(t, _)| t).sum::<f64>() / pairs.len() as f64;
    let ss_res: f64 = pairs.iter().map(|(t, p)| (t - p).powi(2)).sum();
    let ss_tot: f64 = pairs.iter().map(|(t, _)| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

pub fn max_error(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    let pairs = numeric_pairs("max_error", y_true, y_pred)?;
    Ok(pairs.iter().map(|(t, p)| (t - p).abs()).fold(0.0, f64::max))
}

pub fn mean_absolute_error(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    let pairs = numeric_pairs("mean_absolute_error", y_true, y_pred)?;
    Ok(pairs.iter().map(|(t, p)| (t - p).abs()).sum::<f64>() / pairs.len() as f64)
}

pub fn mean_squared_error(y_true: &[Cell], y_pred: &[Cell]) -> ValidationResult<f64> {
    let pairs = numeric_pairs("mean_squared_error", y_true, y_pred)?;
    Ok(pairs.iter().map(|(t, p)| (t - p).powi(2)).sum::<f64>() / pairs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[i64]) -> Vec<Cell> {
        values.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn binary_classification_metrics() {
        let y_true = cells(&[1, 1, 0, 0, 1, 0]);
        let y_pred = cells(&[1, 0, 0, 1, 1, 0]);
        assert!((accuracy(&y_true, &y_pred).unwrap() - 4.0 / 6.0).abs() < 1e-12);
        assert!((precision(&y_true, &y_pred).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((recall(&y_true, &y_pred).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((f1(&y_true, &y_pred).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn balanced_accuracy_weights_classes_equally() {
        let y_true = cells(&[0, 0, 0, 1]);
        let y_pred = cells(&[0, 0, 0, 0]);
        assert_eq!(balanced_accuracy(&y_true, &y_pred).unwrap(), 0.5);
    }

    #[test]
    fn regression_metrics() {
        let y_true = vec![Cell::from(3.0), Cell::from(-0.5), Cell::from(2.0), Cell::from(7.0)];
        let y_pred = vec![Cell::from(2.5), Cell::from(0.0), Cell::from(2.0), Cell::from(8.0)];
        assert!((r2(&y_true, &y_pred).unwrap() - 0.948_608_137_044_967_9).abs() < 1e-9);
        assert_eq!(max_error(&y_true, &y_pred).unwrap(), 1.0);
        assert_eq!(mean_absolute_error(&y_true, &y_pred).unwrap(), 0.5);
        assert_eq!(mean_squared_error(&y_true, &y_pred).unwrap(), 0.375);
    }

    #[test]
    fn empty_or_mismatched_inputs_fail() {
        assert!(accuracy(&[], &[]).is_err());
        assert!(accuracy(&cells(&[1]), &cells(&[1, 0])).is_err());
        assert!(r2(&[Cell::from("a")], &[Cell::from(1.0)]).is_err());
    }
}
