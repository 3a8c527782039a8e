use log::debug;

use crate::core::{OError, ObjectiveVector};
use crate::utils::{argsort, Sort};

/// Calculate the crowding distance (with complexity $O(M * N log(N))$, where `M` is the number of
/// objectives and `N` the number of vectors) of the vectors of one non-dominated front.
///
/// For each objective component, the front is sorted by that component; the two boundary
/// vectors get an infinite distance and each interior vector adds the gap between its two
/// neighbours, normalised by the component range. A component whose minimum and maximum are equal
/// does not contribute. A front with less than 3 vectors only has boundary vectors, so all
/// distances are infinite.
///
/// Implemented based on paragraph 3B in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
///
/// # Arguments
///
/// * `front`: The vectors in a non-dominated front.
///
/// returns: `Result<Vec<f64>, OError>`. The distances in the same order as `front`.
pub fn crowding_distance(front: &[&ObjectiveVector]) -> Result<Vec<f64>, OError> {
    let total = front.len();
    if total < 3 {
        return Ok(vec![f64::INFINITY; total]);
    }

    let number_of_objectives = front[0].len();
    if let Some(v) = front.iter().find(|v| v.len() != number_of_objectives) {
        return Err(OError::ObjectiveLengthMismatch(
            v.len(),
            number_of_objectives,
        ));
    }

    let mut distances = vec![0.0; total];
    for component in 0..number_of_objectives {
        let values: Vec<f64> = front.iter().map(|v| v[component]).collect();
        let sorted_idx = argsort(&values, Sort::Ascending);
        let min = values[sorted_idx[0]];
        let max = values[sorted_idx[total - 1]];
        let delta_range = max - min;

        if delta_range == 0.0 {
            debug!("Skipping objective #{component} in crowding distance: the range is zero");
            continue;
        }

        // assign infinite distance to the boundary points
        distances[sorted_idx[0]] = f64::INFINITY;
        distances[sorted_idx[total - 1]] = f64::INFINITY;

        for k in 1..(total - 1) {
            let delta = (values[sorted_idx[k + 1]] - values[sorted_idx[k - 1]]) / delta_range;
            // an infinite value on the component makes the gap undefined
            if delta.is_nan() {
                continue;
            }
            distances[sorted_idx[k]] += delta;
        }
    }

    Ok(distances)
}
