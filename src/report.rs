/// Fraction of predictions that match the ground truth labels, or `None` when there is nothing
/// to score.
pub fn accuracy<P, T>(predictions: &[P], truth: &[T]) -> Option<f64>
where
    P: AsRef<str>,
    T: AsRef<str>,
{
    let total = predictions.len().min(truth.len());
    if total == 0 {
        return None;
    }

    let correct = predictions
        .iter()
        .zip(truth.iter())
        .filter(|(p, t)| p.as_ref() == t.as_ref())
        .count();

    Some(correct as f64 / total as f64)
}
