use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Index;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::OError;

/// Whether the objective should be minimised or maximised. Default is minimise.
#[derive(Default, Clone, Copy, Debug, PartialOrd, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveDirection {
    #[default]
    /// Minimise an objective.
    Minimise,
    /// Maximise an objective.
    Maximise,
}

impl ObjectiveDirection {
    /// Convert a value so that smaller is always better.
    ///
    /// # Arguments
    ///
    /// * `value`: The objective value.
    ///
    /// returns: `f64`
    pub fn as_minimised(&self, value: f64) -> f64 {
        match self {
            ObjectiveDirection::Minimise => value,
            ObjectiveDirection::Maximise => -value,
        }
    }

    /// The worst possible value for this direction.
    pub fn worst(&self) -> f64 {
        match self {
            ObjectiveDirection::Minimise => f64::INFINITY,
            ObjectiveDirection::Maximise => f64::NEG_INFINITY,
        }
    }
}

impl Display for ObjectiveDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveDirection::Minimise => f.write_str("minimised"),
            ObjectiveDirection::Maximise => f.write_str("maximised"),
        }
    }
}

/// The dominance relation of a vector `a` with respect to a vector `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// `a` is at least as good as `b` on every component and strictly better on one.
    Dominates,
    /// `b` dominates `a`.
    IsDominatedBy,
    /// The two vectors tie on every component.
    Equivalent,
    /// Each vector is strictly better than the other on at least one component.
    Incomparable,
}

impl Dominance {
    /// The relation seen from the other vector.
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Dominates => Dominance::IsDominatedBy,
            Dominance::IsDominatedBy => Dominance::Dominates,
            other => other,
        }
    }
}

/// The total order used when multiple-component vectors must be ranked on a single scale (for
/// example to keep elites or to report the best solution).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScalarComparator {
    /// Compare the components in order; the first non-tied component decides.
    Lexicographic,
    /// Compare the weighted sum of the components, after converting every component so that
    /// smaller is better.
    WeightedSum(Vec<f64>),
}

/// The optimisation directions of an objective vector and the optional scalar comparator.
///
/// # Example
/// ```
///  use metarustic::core::{Objective, ObjectiveDirection, ScalarComparator};
///
///  let o = Objective::new(vec![ObjectiveDirection::Minimise, ObjectiveDirection::Maximise])
///     .unwrap()
///     .with_comparator(ScalarComparator::Lexicographic);
///  println!("{}", o);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "ObjectiveData")]
pub struct Objective {
    /// The direction of each component.
    directions: Vec<ObjectiveDirection>,
    /// The comparator used to rank multi-component vectors on a single scale.
    comparator: Option<ScalarComparator>,
}

/// The unchecked fields of a deserialised [`Objective`].
#[derive(Deserialize)]
struct ObjectiveData {
    directions: Vec<ObjectiveDirection>,
    comparator: Option<ScalarComparator>,
}

impl TryFrom<ObjectiveData> for Objective {
    type Error = OError;

    fn try_from(data: ObjectiveData) -> Result<Self, Self::Error> {
        let objective = Objective::new(data.directions)?;
        Ok(match data.comparator {
            Some(comparator) => objective.with_comparator(comparator),
            None => objective,
        })
    }
}

impl Objective {
    /// Create a new objective. This returns an error if no direction is given.
    ///
    /// # Arguments
    ///
    /// * `directions`: Whether each component is minimised or maximised.
    ///
    /// returns: `Result<Objective, OError>`
    pub fn new(directions: Vec<ObjectiveDirection>) -> Result<Self, OError> {
        if directions.is_empty() {
            return Err(OError::NoObjective);
        }
        Ok(Self {
            directions,
            comparator: None,
        })
    }

    /// A single-component objective to minimise.
    pub fn minimise() -> Self {
        Self {
            directions: vec![ObjectiveDirection::Minimise],
            comparator: None,
        }
    }

    /// A single-component objective to maximise.
    pub fn maximise() -> Self {
        Self {
            directions: vec![ObjectiveDirection::Maximise],
            comparator: None,
        }
    }

    /// Set the comparator used for single-scale rankings.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The comparator.
    ///
    /// returns: `Objective`
    pub fn with_comparator(mut self, comparator: ScalarComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// The direction of each component.
    pub fn directions(&self) -> &[ObjectiveDirection] {
        &self.directions
    }

    /// The scalar comparator, if any.
    pub fn comparator(&self) -> Option<&ScalarComparator> {
        self.comparator.as_ref()
    }

    /// The number of components.
    pub fn number_of_objectives(&self) -> usize {
        self.directions.len()
    }

    /// Whether the objective has one component only.
    pub fn is_single_objective(&self) -> bool {
        self.directions.len() == 1
    }

    /// The sentinel vector with the worst possible value on every component.
    ///
    /// returns: `ObjectiveVector`
    pub fn worst(&self) -> ObjectiveVector {
        ObjectiveVector(self.directions.iter().map(|d| d.worst()).collect())
    }

    /// Return an error if the vector length does not match the number of directions.
    ///
    /// # Arguments
    ///
    /// * `vector`: The vector to check.
    ///
    /// returns: `Result<(), OError>`
    pub fn check_length(&self, vector: &ObjectiveVector) -> Result<(), OError> {
        if vector.len() != self.directions.len() {
            return Err(OError::ObjectiveLengthMismatch(
                vector.len(),
                self.directions.len(),
            ));
        }
        Ok(())
    }

    /// Rank two vectors on a single scale. [`Ordering::Less`] means that `first` is better
    /// than `second`. Single-component objectives are compared directly; vectors with more
    /// components need a [`ScalarComparator`], otherwise an error is returned.
    ///
    /// # Arguments
    ///
    /// * `first`: The first vector.
    /// * `second`: The second vector.
    ///
    /// returns: `Result<Ordering, OError>`
    pub fn compare_scalar(
        &self,
        first: &ObjectiveVector,
        second: &ObjectiveVector,
    ) -> Result<Ordering, OError> {
        self.check_length(first)?;
        self.check_length(second)?;

        if self.is_single_objective() {
            let d = self.directions[0];
            return Ok(OrderedFloat(d.as_minimised(first[0]))
                .cmp(&OrderedFloat(d.as_minimised(second[0]))));
        }

        match &self.comparator {
            None => Err(OError::MissingComparator(self.directions.len())),
            Some(ScalarComparator::Lexicographic) => {
                for (i, d) in self.directions.iter().enumerate() {
                    let ord = OrderedFloat(d.as_minimised(first[i]))
                        .cmp(&OrderedFloat(d.as_minimised(second[i])));
                    if ord != Ordering::Equal {
                        return Ok(ord);
                    }
                }
                Ok(Ordering::Equal)
            }
            Some(ScalarComparator::WeightedSum(weights)) => {
                if weights.len() != self.directions.len() {
                    return Err(OError::ObjectiveLengthMismatch(
                        weights.len(),
                        self.directions.len(),
                    ));
                }
                let score = |v: &ObjectiveVector| -> f64 {
                    self.directions
                        .iter()
                        .zip(weights)
                        .enumerate()
                        .map(|(i, (d, w))| w * d.as_minimised(v[i]))
                        .sum()
                };
                Ok(OrderedFloat(score(first)).cmp(&OrderedFloat(score(second))))
            }
        }
    }
}

impl Display for Objective {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let directions = self
            .directions
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "Objective with components [{}]", directions)
    }
}

/// The immutable objective values of one solution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<f64>")]
pub struct ObjectiveVector(Vec<f64>);

impl TryFrom<Vec<f64>> for ObjectiveVector {
    type Error = OError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        ObjectiveVector::new(values)
    }
}

impl ObjectiveVector {
    /// Create a new vector. This returns an error if `values` is empty or contains a NaN.
    ///
    /// # Arguments
    ///
    /// * `values`: The objective values.
    ///
    /// returns: `Result<ObjectiveVector, OError>`
    pub fn new(values: Vec<f64>) -> Result<Self, OError> {
        if values.is_empty() {
            return Err(OError::NoObjective);
        }
        if let Some(i) = values.iter().position(|v| v.is_nan()) {
            return Err(OError::NaN("objective".to_string(), format!("#{i}")));
        }
        Ok(Self(values))
    }

    /// A one-component vector. This returns an error if `value` is NaN.
    ///
    /// # Arguments
    ///
    /// * `value`: The objective value.
    ///
    /// returns: `Result<ObjectiveVector, OError>`
    pub fn single(value: f64) -> Result<Self, OError> {
        Self::new(vec![value])
    }

    /// The objective values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// The number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no component. This is always `false`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the dominance relation of this vector against `other`. Each component is compared
    /// after normalising by its direction. With one component this reduces to an ordinary
    /// comparison.
    ///
    /// # Arguments
    ///
    /// * `other`: The vector to compare against.
    /// * `objective`: The objective with the component directions.
    ///
    /// returns: `Result<Dominance, OError>`
    pub fn compare_to(
        &self,
        other: &ObjectiveVector,
        objective: &Objective,
    ) -> Result<Dominance, OError> {
        objective.check_length(self)?;
        objective.check_length(other)?;

        let mut relation = Dominance::Equivalent;
        for (i, direction) in objective.directions().iter().enumerate() {
            let a = direction.as_minimised(self.0[i]);
            let b = direction.as_minimised(other.0[i]);
            if a < b {
                if relation == Dominance::IsDominatedBy {
                    return Ok(Dominance::Incomparable);
                }
                relation = Dominance::Dominates;
            } else if a > b {
                if relation == Dominance::Dominates {
                    return Ok(Dominance::Incomparable);
                }
                relation = Dominance::IsDominatedBy;
            }
        }
        Ok(relation)
    }
}

impl Index<usize> for ObjectiveVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Display for ObjectiveVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use crate::core::{Dominance, Objective, ObjectiveDirection, ObjectiveVector, OError, ScalarComparator};

    fn vector(values: &[f64]) -> ObjectiveVector {
        ObjectiveVector::new(values.to_vec()).unwrap()
    }

    #[test]
    /// Test one objective, which reduces to an ordinary comparison.
    fn test_dominance_1_objective() {
        let min = Objective::minimise();
        assert_eq!(
            vector(&[5.0]).compare_to(&vector(&[15.0]), &min).unwrap(),
            Dominance::Dominates
        );
        assert_eq!(
            vector(&[5.0]).compare_to(&vector(&[1.0]), &min).unwrap(),
            Dominance::IsDominatedBy
        );
        assert_eq!(
            vector(&[5.0]).compare_to(&vector(&[5.0]), &min).unwrap(),
            Dominance::Equivalent
        );

        let max = Objective::maximise();
        assert_eq!(
            vector(&[5.0]).compare_to(&vector(&[15.0]), &max).unwrap(),
            Dominance::IsDominatedBy
        );
    }

    #[test]
    /// Test two objectives with mixed directions.
    fn test_dominance_2_objectives() {
        let min = Objective::new(vec![ObjectiveDirection::Minimise; 2]).unwrap();
        assert_eq!(
            vector(&[5.0, 1.0]).compare_to(&vector(&[15.0, 25.0]), &min).unwrap(),
            Dominance::Dominates
        );
        assert_eq!(
            vector(&[5.0, 100.0]).compare_to(&vector(&[15.0, 25.0]), &min).unwrap(),
            Dominance::Incomparable
        );
        // weakly better everywhere
        assert_eq!(
            vector(&[0.0, 0.0]).compare_to(&vector(&[0.0, 1.0]), &min).unwrap(),
            Dominance::Dominates
        );
        assert_eq!(
            vector(&[0.0, 1.0]).compare_to(&vector(&[0.0, 0.0]), &min).unwrap(),
            Dominance::IsDominatedBy
        );

        let mixed = Objective::new(vec![
            ObjectiveDirection::Minimise,
            ObjectiveDirection::Maximise,
        ])
        .unwrap();
        assert_eq!(
            vector(&[5.0, 5.0]).compare_to(&vector(&[15.0, 15.0]), &mixed).unwrap(),
            Dominance::Incomparable
        );
        assert_eq!(
            vector(&[5.0, -5.0]).compare_to(&vector(&[1.0, 15.0]), &mixed).unwrap(),
            Dominance::IsDominatedBy
        );
    }

    #[test]
    /// Test the precondition errors.
    fn test_invalid_vectors() {
        assert_eq!(ObjectiveVector::new(vec![]).unwrap_err(), OError::NoObjective);
        assert!(ObjectiveVector::new(vec![1.0, f64::NAN]).is_err());
        assert_eq!(Objective::new(vec![]).unwrap_err(), OError::NoObjective);

        let min = Objective::minimise();
        assert_eq!(
            vector(&[1.0, 2.0]).compare_to(&vector(&[1.0]), &min).unwrap_err(),
            OError::ObjectiveLengthMismatch(2, 1)
        );
    }

    #[test]
    /// Test the scalar comparators.
    fn test_compare_scalar() {
        let max = Objective::maximise();
        assert_eq!(
            max.compare_scalar(&vector(&[3.0]), &vector(&[1.0])).unwrap(),
            Ordering::Less
        );

        let two = Objective::new(vec![
            ObjectiveDirection::Minimise,
            ObjectiveDirection::Maximise,
        ])
        .unwrap();
        assert_eq!(
            two.compare_scalar(&vector(&[1.0, 2.0]), &vector(&[2.0, 1.0]))
                .unwrap_err(),
            OError::MissingComparator(2)
        );

        let lex = two.clone().with_comparator(ScalarComparator::Lexicographic);
        assert_eq!(
            lex.compare_scalar(&vector(&[1.0, 2.0]), &vector(&[1.0, 3.0]))
                .unwrap(),
            Ordering::Greater
        );

        // 1 * 1 - 2 * 2 = -3 vs 1 * 2 - 2 * 1 = 0
        let weighted = two.with_comparator(ScalarComparator::WeightedSum(vec![1.0, 2.0]));
        assert_eq!(
            weighted
                .compare_scalar(&vector(&[1.0, 2.0]), &vector(&[2.0, 1.0]))
                .unwrap(),
            Ordering::Less
        );
    }

    #[test]
    /// The worst sentinel is dominated by any finite vector.
    fn test_worst() {
        let o = Objective::new(vec![
            ObjectiveDirection::Minimise,
            ObjectiveDirection::Maximise,
        ])
        .unwrap();
        let worst = o.worst();
        assert_eq!(worst.values(), &[f64::INFINITY, f64::NEG_INFINITY]);
        assert_eq!(
            vector(&[1e300, -1e300]).compare_to(&worst, &o).unwrap(),
            Dominance::Dominates
        );
    }
}
