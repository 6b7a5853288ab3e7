// Engine configuration: indicator parameters and the scoring policy table.
pub mod settings;

pub use settings::{
    ActionLadder, BollParams, EngineSettings, IndicatorSettings, KdjParams, LevelParams, MacdParams,
    PatternParams, RsiParams, ScoringPolicy, VolumeParams,
};
