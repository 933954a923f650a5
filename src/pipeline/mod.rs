pub mod commands;
pub mod composer;
pub mod context;
pub mod phrases;
pub mod stage;
pub mod stages;

pub use commands::TrainingCommandStage;
pub use composer::ComposerStage;
pub use context::{CommandContext, TurnContext};
pub use stage::{Pipeline, Stage, StageReply};
pub use stages::{
    BasicIntentStage, BehaviorMatchStage, BehaviorTeachingStage, DynamicFactStage, FactQueryStage, MemoryCheckStage,
    PairLookupStage, SemanticRecallStage, TaskStage,
};
