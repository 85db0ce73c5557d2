use crate::pmf::{Distribution, Observation, PmfError};

/// mean of a distribution, computed straight from its items
pub fn pmf_mean<D: Distribution + ?Sized>(dist: &D) -> Result<f64, PmfError> {
    let mut mean = 0.0;
    for (x, p) in dist.items() {
        let x = x.as_f64().ok_or_else(|| PmfError::unsupported("mean", x))?;
        mean += p * x;
    }
    Ok(mean)
}

/// variance of a distribution, computed straight from its items
pub fn pmf_var<D: Distribution + ?Sized>(dist: &D) -> Result<f64, PmfError> {
    let mut var = 0.0;
    let mean = pmf_mean(dist).map_err(|e| e.for_operation("variance"))?;
    for (x, p) in dist.items() {
        let x = x
            .as_f64()
            .ok_or_else(|| PmfError::unsupported("variance", x))?;
        var += p * (x - mean).powi(2);
    }
    Ok(var)
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}
