/*!
Motion predictors.

- stop:       velocity decay under friction and braking (Stop and Pivot markers)
- ballistic:  gravity-only paths swept through the environment (Apex and Landing markers)
- ground:     vertical correction of a predicted location onto the floor

Predictors are pure functions of a [`KinematicSnapshot`](crate::KinematicSnapshot), the
settings and an [`EnvironmentProbe`](crate::collision::EnvironmentProbe). They never
mutate the snapshot.
*/

pub mod ballistic;
pub mod ground;
pub mod stop;

pub use ballistic::{PathPrediction, predict_apex, predict_landing, predict_path, time_to_apex};
pub use ground::ground_location;
pub use stop::{predict_stop, simulate_braking};
