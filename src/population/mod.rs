pub mod joint;
pub mod model;

pub use joint::{JointEntry, JointTable, JointTableSpec};
pub use model::{
    AttributeStatistics, CorrelationMatrix, ModelTolerance, PopulationModel, SamplingMode,
};
