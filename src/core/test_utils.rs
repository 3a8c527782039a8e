use float_cmp::{approx_eq, F64Margin};
use rand_distr::{Distribution, Normal};

use crate::algorithms::AdaptiveMutation;
use crate::core::{OError, Objective, ObjectiveVector, Population, Problem, SearchSpace, Solution};
use crate::operators::{Creation, Mutation, Recombination};
use crate::random::RandomStream;

/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    assert_eq!(calculated_values.len(), expected_values.len());
    let margins = F64Margin {
        epsilon: 0.0001,
        ulps: 2,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if calculated.is_infinite() && calculated == expected {
            continue;
        }
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

/// Build objective vectors from raw values.
pub(crate) fn vectors(values: &[Vec<f64>]) -> Vec<ObjectiveVector> {
    values
        .iter()
        .map(|v| ObjectiveVector::new(v.clone()).unwrap())
        .collect()
}

/// Build a population from objective values. The genotype of each solution is its index.
pub(crate) fn population_from_obj_values(values: &[Vec<f64>]) -> Population<usize> {
    vectors(values)
        .into_iter()
        .enumerate()
        .map(|(i, o)| Solution::new(i, o))
        .collect()
}

/// A hyper-rectangle with the same bounds on every dimension.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoxSpace {
    dimensions: usize,
    lower: f64,
    upper: f64,
}

impl BoxSpace {
    pub(crate) fn new(dimensions: usize, lower: f64, upper: f64) -> Self {
        Self {
            dimensions,
            lower,
            upper,
        }
    }

    pub(crate) fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}

impl SearchSpace<Vec<f64>> for BoxSpace {
    fn contains(&self, genotype: &Vec<f64>) -> bool {
        genotype.len() == self.dimensions
            && genotype
                .iter()
                .all(|x| (self.lower..=self.upper).contains(x))
    }

    fn is_subspace_of(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions
            && self.lower >= other.lower
            && self.upper <= other.upper
    }
}

/// Minimise the sum of the squared variables.
#[derive(Debug)]
pub(crate) struct SphereProblem {
    space: BoxSpace,
    objective: Objective,
}

impl SphereProblem {
    pub(crate) fn new(dimensions: usize) -> Self {
        Self {
            space: BoxSpace::new(dimensions, -5.0, 5.0),
            objective: Objective::minimise(),
        }
    }
}

impl Problem for SphereProblem {
    type Genotype = Vec<f64>;
    type Space = BoxSpace;

    fn objective(&self) -> &Objective {
        &self.objective
    }

    fn search_space(&self) -> &BoxSpace {
        &self.space
    }

    fn evaluate(&self, x: &Vec<f64>, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
        ObjectiveVector::single(x.iter().map(|v| v.powi(2)).sum())
    }
}

/// The Schaffer's study (SCH) problem with one variable and two minimised objectives
/// `x^2` and `(x-2)^2`. The Pareto front is at `x` in `[0, 2]`.
#[derive(Debug)]
pub(crate) struct SchProblem {
    space: BoxSpace,
    objective: Objective,
}

impl SchProblem {
    pub(crate) fn new() -> Self {
        Self {
            space: BoxSpace::new(1, -1000.0, 1000.0),
            objective: Objective::new(vec![Default::default(), Default::default()]).unwrap(),
        }
    }
}

impl Problem for SchProblem {
    type Genotype = Vec<f64>;
    type Space = BoxSpace;

    fn objective(&self) -> &Objective {
        &self.objective
    }

    fn search_space(&self) -> &BoxSpace {
        &self.space
    }

    fn evaluate(&self, x: &Vec<f64>, _: &mut RandomStream) -> Result<ObjectiveVector, OError> {
        ObjectiveVector::new(vec![x[0].powi(2), (x[0] - 2.0).powi(2)])
    }
}

/// Sample each variable uniformly within the box.
#[derive(Debug)]
pub(crate) struct UniformCreation;

impl Creation<Vec<f64>, BoxSpace> for UniformCreation {
    fn create_one(&self, rng: &mut RandomStream, space: &BoxSpace) -> Result<Vec<f64>, OError> {
        Ok((0..space.dimensions)
            .map(|_| space.lower + rng.next_double() * (space.upper - space.lower))
            .collect())
    }
}

/// Add gaussian noise to each variable and clamp it to the box.
#[derive(Debug)]
pub(crate) struct GaussianMutation {
    pub(crate) sigma: f64,
}

impl Mutation<Vec<f64>, BoxSpace> for GaussianMutation {
    fn mutate_one(
        &self,
        genotype: &Vec<f64>,
        rng: &mut RandomStream,
        space: &BoxSpace,
    ) -> Result<Vec<f64>, OError> {
        self.mutate_with_strength(genotype, self.sigma, rng, space)
    }
}

impl AdaptiveMutation<Vec<f64>, BoxSpace> for GaussianMutation {
    fn mutate_with_strength(
        &self,
        genotype: &Vec<f64>,
        strength: f64,
        rng: &mut RandomStream,
        space: &BoxSpace,
    ) -> Result<Vec<f64>, OError> {
        let normal = Normal::new(0.0, strength)
            .map_err(|e| OError::MutationOperator("GaussianMutation".to_string(), e.to_string()))?;
        Ok(genotype
            .iter()
            .map(|x| space.clamp(x + normal.sample(rng)))
            .collect())
    }
}

/// Take a random convex combination of the two parents.
#[derive(Debug)]
pub(crate) struct BlendRecombination;

impl Recombination<Vec<f64>, BoxSpace> for BlendRecombination {
    fn recombine(
        &self,
        first: &Vec<f64>,
        second: &Vec<f64>,
        rng: &mut RandomStream,
        _space: &BoxSpace,
    ) -> Result<Vec<f64>, OError> {
        let alpha = rng.next_double();
        Ok(first
            .iter()
            .zip(second)
            .map(|(a, b)| alpha * a + (1.0 - alpha) * b)
            .collect())
    }
}
