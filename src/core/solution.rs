use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::core::{OError, Objective, ObjectiveVector};

/// A genotype paired with its objective values. Solutions are produced by evaluation only and
/// are never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<T> {
    /// The genotype.
    genotype: T,
    /// The evaluated objective values.
    objectives: ObjectiveVector,
}

impl<T> Solution<T> {
    /// Pair a genotype with its objective values.
    ///
    /// # Arguments
    ///
    /// * `genotype`: The evaluated genotype.
    /// * `objectives`: The genotype's objective values.
    ///
    /// returns: `Solution<T>`
    pub fn new(genotype: T, objectives: ObjectiveVector) -> Self {
        Self {
            genotype,
            objectives,
        }
    }

    /// The genotype.
    pub fn genotype(&self) -> &T {
        &self.genotype
    }

    /// The objective values.
    pub fn objectives(&self) -> &ObjectiveVector {
        &self.objectives
    }

    /// Split the solution into its genotype and objective values.
    pub fn into_parts(self) -> (T, ObjectiveVector) {
        (self.genotype, self.objectives)
    }
}

impl<T: Display> Display for Solution<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution {} with objectives {}", self.genotype, self.objectives)
    }
}

/// An ordered collection of solutions. The order carries no meaning unless an algorithm
/// declares one (for example [`crate::operators::ElitismReplacer`] puts the elites first).
#[derive(Debug, Clone, PartialEq)]
pub struct Population<T> {
    solutions: Vec<Solution<T>>,
}

impl<T> Default for Population<T> {
    fn default() -> Self {
        Self {
            solutions: Vec::new(),
        }
    }
}

impl<T> Population<T> {
    /// Create a population from its solutions.
    ///
    /// # Arguments
    ///
    /// * `solutions`: The solutions.
    ///
    /// returns: `Population<T>`
    pub fn new(solutions: Vec<Solution<T>>) -> Self {
        Self { solutions }
    }

    /// The number of solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether the population has no solutions.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// The solutions.
    pub fn solutions(&self) -> &[Solution<T>] {
        &self.solutions
    }

    /// Get a solution by index.
    pub fn solution(&self, index: usize) -> Option<&Solution<T>> {
        self.solutions.get(index)
    }

    /// Iterate over the solutions.
    pub fn iter(&self) -> std::slice::Iter<'_, Solution<T>> {
        self.solutions.iter()
    }

    /// Consume the population and return its solutions.
    pub fn into_solutions(self) -> Vec<Solution<T>> {
        self.solutions
    }

    /// The objective vectors in population order.
    pub fn objective_vectors(&self) -> Vec<&ObjectiveVector> {
        self.solutions.iter().map(|s| s.objectives()).collect()
    }

    /// The index of the best solution according to [`Objective::compare_scalar`]. On ties the
    /// first solution wins. This returns an error if the population is empty or the objective
    /// cannot rank the vectors on a single scale.
    ///
    /// # Arguments
    ///
    /// * `objective`: The objective.
    ///
    /// returns: `Result<usize, OError>`
    pub fn best_index(&self, objective: &Objective) -> Result<usize, OError> {
        if self.solutions.is_empty() {
            return Err(OError::EmptyPopulation("best solution".to_string()));
        }
        let mut best = 0;
        for (i, s) in self.solutions.iter().enumerate().skip(1) {
            if objective.compare_scalar(s.objectives(), self.solutions[best].objectives())?
                == Ordering::Less
            {
                best = i;
            }
        }
        Ok(best)
    }

    /// The best solution. See [`Population::best_index`].
    ///
    /// # Arguments
    ///
    /// * `objective`: The objective.
    ///
    /// returns: `Result<&Solution<T>, OError>`
    pub fn best(&self, objective: &Objective) -> Result<&Solution<T>, OError> {
        let index = self.best_index(objective)?;
        Ok(&self.solutions[index])
    }

    /// The indexes of the solutions sorted from best to worst. The sort is stable so tied
    /// solutions keep their population order.
    ///
    /// # Arguments
    ///
    /// * `objective`: The objective.
    ///
    /// returns: `Result<Vec<usize>, OError>`
    pub fn ranked_indexes(&self, objective: &Objective) -> Result<Vec<usize>, OError> {
        // validate once so that the sort closure cannot fail
        for s in &self.solutions {
            objective.check_length(s.objectives())?;
        }
        if self.solutions.len() > 1 && !objective.is_single_objective() {
            objective.compare_scalar(self.solutions[0].objectives(), self.solutions[1].objectives())?;
        }

        let mut indexes: Vec<usize> = (0..self.solutions.len()).collect();
        indexes.sort_by(|a, b| {
            objective
                .compare_scalar(self.solutions[*a].objectives(), self.solutions[*b].objectives())
                .unwrap_or(Ordering::Equal)
        });
        Ok(indexes)
    }
}

impl<T> FromIterator<Solution<T>> for Population<T> {
    fn from_iter<I: IntoIterator<Item = Solution<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Population<T> {
    type Item = Solution<T>;
    type IntoIter = std::vec::IntoIter<Solution<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Population<T> {
    type Item = &'a Solution<T>;
    type IntoIter = std::slice::Iter<'a, Solution<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::population_from_obj_values;
    use crate::core::{Objective, ObjectiveDirection, OError, Population, ScalarComparator};

    #[test]
    /// Test the best solution for minimised and maximised objectives.
    fn test_best() {
        let population = population_from_obj_values(&[vec![5.0], vec![3.0], vec![3.0], vec![9.0]]);
        assert_eq!(population.best_index(&Objective::minimise()).unwrap(), 1);
        assert_eq!(population.best_index(&Objective::maximise()).unwrap(), 3);
        assert_eq!(
            population.ranked_indexes(&Objective::minimise()).unwrap(),
            vec![1, 2, 0, 3]
        );
    }

    #[test]
    /// Test the precondition errors.
    fn test_best_errors() {
        let empty: Population<usize> = Population::default();
        assert_eq!(
            empty.best(&Objective::minimise()).unwrap_err(),
            OError::EmptyPopulation("best solution".to_string())
        );

        let population = population_from_obj_values(&[vec![1.0, 2.0], vec![2.0, 1.0]]);
        let objective = Objective::new(vec![ObjectiveDirection::Minimise; 2]).unwrap();
        assert_eq!(
            population.best(&objective).unwrap_err(),
            OError::MissingComparator(2)
        );
        assert!(population.ranked_indexes(&objective).is_err());

        let objective = objective.with_comparator(ScalarComparator::Lexicographic);
        assert_eq!(population.best_index(&objective).unwrap(), 0);
    }
}
