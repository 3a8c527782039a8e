pub use batch::{BatchExecution, ParallelExecution};

mod batch;
