pub use algorithm::{AlgorithmState, IterativeAlgorithm, PopulationState};
pub use evolution_strategy::{
    AdaptiveMutation, EvolutionStrategy, EvolutionStrategyArg, EvolutionStrategyState,
    SuccessRule,
};
pub use executor::{ExecutorArg, ExecutorStatus, StreamingExecutor};
pub use genetic_algorithm::{GeneticAlgorithm, GeneticAlgorithmArg};
pub use interceptor::{
    DuplicateRemover, GenerationLogger, Interceptor, InterceptorChain, Reevaluator,
};
pub use nsga2::{NSGA2Arg, NSGA2};
pub use terminator::{
    AfterIterations, AllTerminator, AnyTerminator, EvaluationBudgetTerminator, PauseTerminator,
    PauseToken, TargetObjective, Terminator,
};

mod algorithm;
mod evolution_strategy;
mod executor;
mod genetic_algorithm;
mod interceptor;
mod nsga2;
mod terminator;
