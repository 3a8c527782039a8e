use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
/// Errors raised by the library.
pub enum OError {
    #[error("The following error occurred: {0}")]
    Generic(String),
    #[error("You must provide at least one objective to properly define an objective vector")]
    NoObjective,
    #[error("The objective vector has {0} values but {1} were expected")]
    ObjectiveLengthMismatch(usize, usize),
    #[error("The population is empty and the {0} cannot be computed")]
    EmptyPopulation(String),
    #[error("A total order between objective vectors with {0} components requires a scalar comparator")]
    MissingComparator(usize),
    #[error("The configuration of {0} is not valid: {1}")]
    InvalidConfiguration(String, String),
    #[error("The search space is not a subspace of the problem's search space: {0}")]
    IncompatibleSearchSpace(String),
    #[error("An error occurred in the selector operator '{0}': {1}")]
    SelectorOperator(String, String),
    #[error("An error occurred in the crossover operator '{0}': {1}")]
    CrossoverOperator(String, String),
    #[error("An error occurred in the mutation operator '{0}': {1}")]
    MutationOperator(String, String),
    #[error("An error occurred in the creator operator '{0}': {1}")]
    CreatorOperator(String, String),
    #[error("An error occurred in the replacement operator '{0}': {1}")]
    ReplacementOperator(String, String),
    #[error("An error occurred when evaluating a solution: {0}")]
    Evaluation(String),
    #[error("An error occurred when initialising {0}: {1}")]
    AlgorithmInit(String, String),
    #[error("An error occurred when running {0}: {1}")]
    AlgorithmRun(String, String),
    #[error("NaN detected when adding {0} '{1}'. This may be an error in the user-defined evaluation function")]
    NaN(String, String),
}
