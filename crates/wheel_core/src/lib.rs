pub mod animator;
pub mod driver;
pub mod machine;
pub mod roster;
pub mod settings;
pub mod slices;
pub mod spinner;
pub mod wheel;

pub use animator::{Clock, ManualClock, SpinAnimator, TokioClock};
pub use driver::{drive_spin, DEFAULT_FRAME_INTERVAL};
pub use machine::{GameStateMachine, Phase};
pub use roster::{ImportSummary, Roster};
pub use settings::WheelSettings;
pub use slices::SliceMapper;
pub use spinner::{RandomSpinner, SpinPlan, SpinRanges};
pub use wheel::{Wheel, WheelHooks};
