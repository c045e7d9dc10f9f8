//! Exercise catalog
//!
//! Hand-authored drills keyed by the metric they target and a difficulty tier.
//! Tiers are picked from the runner's score:
//! - Foundational: 0-33
//! - Intermediate: 34-66
//! - Advanced: 67-100
//!
//! The built-in catalog can be replaced by a TOML file with the same shape
//! (`[[exercises]]` tables).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{AletheiaError, CatalogError};

/// Metric an exercise is meant to improve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingTarget {
    Impact,
    Sway,
    HipMobility,
}

impl fmt::Display for CoachingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachingTarget::Impact => write!(f, "Impact"),
            CoachingTarget::Sway => write!(f, "Sway"),
            CoachingTarget::HipMobility => write!(f, "Hip Mobility"),
        }
    }
}

impl std::str::FromStr for CoachingTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "impact" => Ok(CoachingTarget::Impact),
            "sway" => Ok(CoachingTarget::Sway),
            "hip_mobility" | "hip" => Ok(CoachingTarget::HipMobility),
            _ => Err(format!("Invalid coaching target: {}", s)),
        }
    }
}

/// Exercise difficulty tier, ordered easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Foundational,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Tier matching a 0-100 score
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=33 => Difficulty::Foundational,
            34..=66 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Foundational => write!(f, "Foundational"),
            Difficulty::Intermediate => write!(f, "Intermediate"),
            Difficulty::Advanced => write!(f, "Advanced"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "foundational" | "beginner" => Ok(Difficulty::Foundational),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

/// A single drill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,

    pub target: CoachingTarget,

    /// Free text, e.g. "3 x 30 seconds"
    pub duration: String,

    pub difficulty: Difficulty,

    pub benefit: String,

    /// Ordered steps
    pub instructions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// Collection of exercises available to the coaching engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseCatalog {
    pub exercises: Vec<Exercise>,
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ExerciseCatalog {
    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: ExerciseCatalog =
            toml::from_str(content).map_err(|e| CatalogError::Parse {
                reason: e.to_string(),
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file from disk
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AletheiaError> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            exercises = catalog.exercises.len(),
            "Loaded exercise catalog"
        );
        Ok(catalog)
    }

    pub fn to_toml_string(&self) -> Result<String, CatalogError> {
        toml::to_string_pretty(self).map_err(|e| CatalogError::Parse {
            reason: e.to_string(),
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.exercises.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(exercise) = self.exercises.iter().find(|e| e.instructions.is_empty()) {
            return Err(CatalogError::MissingInstructions {
                name: exercise.name.clone(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Exercises for a target, optionally restricted to one tier
    pub fn filter(
        &self,
        target: Option<CoachingTarget>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|e| target.map_or(true, |t| e.target == t))
            .filter(|e| difficulty.map_or(true, |d| e.difficulty == d))
            .collect()
    }

    /// Up to `limit` exercises for a target at the score's tier
    ///
    /// Exercises at the matching tier come first, then easier tiers from the
    /// closest down, then harder ones.
    pub fn recommend(&self, target: CoachingTarget, score: u8, limit: usize) -> Vec<Exercise> {
        let tier = Difficulty::for_score(score);
        let mut candidates: Vec<&Exercise> = self
            .exercises
            .iter()
            .filter(|e| e.target == target)
            .collect();

        // sort_by_key is stable, so authoring order breaks ties
        candidates.sort_by_key(|e| {
            if e.difficulty == tier {
                (0, 0)
            } else if e.difficulty < tier {
                (1, tier as i32 - e.difficulty as i32)
            } else {
                (2, e.difficulty as i32 - tier as i32)
            }
        });

        candidates.into_iter().take(limit).cloned().collect()
    }

    /// The hand-authored catalog shipped with the app
    pub fn builtin() -> Self {
        let exercises = vec![
            // Impact
            exercise(
                "Pogo Hops",
                CoachingTarget::Impact,
                "3 x 20 hops",
                Difficulty::Foundational,
                "Teaches the ankles and calves to absorb and return landing forces.",
                &[
                    "Stand tall with feet hip-width apart",
                    "Hop lightly on the balls of your feet, keeping knees soft",
                    "Land quietly and rebound immediately",
                ],
                Some("Think of the ground as hot. Minimise contact time."),
            ),
            exercise(
                "Cadence Strides",
                CoachingTarget::Impact,
                "4 x 20 seconds",
                Difficulty::Foundational,
                "Raising step rate shortens stride length and lowers peak impact.",
                &[
                    "Set a metronome 5% above your usual cadence",
                    "Run relaxed strides matching each beat",
                    "Walk back to recover between efforts",
                ],
                None,
            ),
            exercise(
                "Eccentric Calf Lowers",
                CoachingTarget::Impact,
                "3 x 12 each leg",
                Difficulty::Intermediate,
                "Builds calf and Achilles capacity for controlled landings.",
                &[
                    "Rise onto both toes on the edge of a step",
                    "Lift one foot and lower slowly on the other for 3 seconds",
                    "Return to the top using both feet",
                ],
                Some("Keep the knee straight, then repeat with a slight bend."),
            ),
            exercise(
                "Soft Landing Drops",
                CoachingTarget::Impact,
                "3 x 8",
                Difficulty::Intermediate,
                "Rehearses quiet, knee-flexed landings under load.",
                &[
                    "Step off a low box onto both feet",
                    "Absorb the landing through ankles, knees and hips together",
                    "Hold the landing position for 2 seconds",
                ],
                None,
            ),
            exercise(
                "Single-Leg Bounds",
                CoachingTarget::Impact,
                "3 x 10 each leg",
                Difficulty::Advanced,
                "Develops reactive stiffness for faster, lighter ground contact.",
                &[
                    "Bound forward from one leg to the same leg",
                    "Land midfoot beneath the hip",
                    "Rebound without pausing",
                ],
                Some("Stop the set as soon as landings get loud."),
            ),
            // Sway
            exercise(
                "Single-Leg Balance",
                CoachingTarget::Sway,
                "3 x 30 seconds each leg",
                Difficulty::Foundational,
                "Trains the small stabilisers that keep the pelvis level.",
                &[
                    "Stand on one leg with a soft knee",
                    "Keep hips level and trunk tall",
                    "Progress by closing your eyes",
                ],
                None,
            ),
            exercise(
                "Side Plank",
                CoachingTarget::Sway,
                "3 x 30 seconds each side",
                Difficulty::Foundational,
                "Strengthens the lateral trunk to limit side-to-side motion.",
                &[
                    "Lie on your side propped on one forearm",
                    "Lift hips until body forms a straight line",
                    "Hold without letting hips sag",
                ],
                Some("Stack feet, or stagger them to make it easier."),
            ),
            exercise(
                "Lateral Band Walks",
                CoachingTarget::Sway,
                "3 x 15 steps each way",
                Difficulty::Intermediate,
                "Activates glute medius, the main brake on pelvic drop.",
                &[
                    "Place a resistance band above the knees",
                    "Sink into a quarter squat",
                    "Step sideways, keeping tension on the band",
                ],
                None,
            ),
            exercise(
                "Single-Leg Romanian Deadlift",
                CoachingTarget::Sway,
                "3 x 10 each leg",
                Difficulty::Intermediate,
                "Builds hip control through the stance phase.",
                &[
                    "Stand on one leg holding a light weight",
                    "Hinge at the hip, extending the free leg behind",
                    "Return to standing with hips square",
                ],
                Some("Keep the standing knee slightly bent."),
            ),
            exercise(
                "Lateral Bounds",
                CoachingTarget::Sway,
                "3 x 8 each side",
                Difficulty::Advanced,
                "Challenges frontal-plane stability at running speeds.",
                &[
                    "Push off one leg sideways",
                    "Land on the opposite leg and stick the landing",
                    "Hold 1 second before bounding back",
                ],
                None,
            ),
            // Hip mobility
            exercise(
                "Hip Flexor Stretch",
                CoachingTarget::HipMobility,
                "2 x 45 seconds each side",
                Difficulty::Foundational,
                "Opens the front of the hip for a longer push-off.",
                &[
                    "Kneel on one knee with the other foot forward",
                    "Tuck the pelvis and shift weight forward",
                    "Reach the same-side arm overhead",
                ],
                Some("Squeeze the glute of the kneeling leg."),
            ),
            exercise(
                "Leg Swings",
                CoachingTarget::HipMobility,
                "2 x 15 each direction",
                Difficulty::Foundational,
                "Dynamic warm-up through the full hip range.",
                &[
                    "Hold a wall for balance",
                    "Swing one leg forward and back, gradually increasing range",
                    "Repeat side to side across the body",
                ],
                None,
            ),
            exercise(
                "90/90 Hip Switches",
                CoachingTarget::HipMobility,
                "2 x 10 switches",
                Difficulty::Intermediate,
                "Improves internal and external hip rotation.",
                &[
                    "Sit with both knees bent at 90 degrees to one side",
                    "Rotate both knees over to the other side",
                    "Keep the chest tall throughout",
                ],
                None,
            ),
            exercise(
                "World's Greatest Stretch",
                CoachingTarget::HipMobility,
                "2 x 5 each side",
                Difficulty::Intermediate,
                "Combines hip flexor, hamstring and thoracic mobility.",
                &[
                    "Step into a deep lunge",
                    "Place the same-side elbow toward the front instep",
                    "Rotate and reach that arm to the ceiling",
                ],
                Some("Move slowly and breathe out on the rotation."),
            ),
            exercise(
                "Cossack Squats",
                CoachingTarget::HipMobility,
                "3 x 6 each side",
                Difficulty::Advanced,
                "Loads the hips through deep adduction and flexion.",
                &[
                    "Take a wide stance with toes slightly out",
                    "Shift into one hip, squatting deep while the other leg straightens",
                    "Drive back through the centre to the other side",
                ],
                None,
            ),
        ];

        Self { exercises }
    }
}

fn exercise(
    name: &str,
    target: CoachingTarget,
    duration: &str,
    difficulty: Difficulty,
    benefit: &str,
    instructions: &[&str],
    tips: Option<&str>,
) -> Exercise {
    Exercise {
        name: name.to_string(),
        target,
        duration: duration.to_string(),
        difficulty,
        benefit: benefit.to_string(),
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        tips: tips.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_cut_points() {
        assert_eq!(Difficulty::for_score(0), Difficulty::Foundational);
        assert_eq!(Difficulty::for_score(33), Difficulty::Foundational);
        assert_eq!(Difficulty::for_score(34), Difficulty::Intermediate);
        assert_eq!(Difficulty::for_score(66), Difficulty::Intermediate);
        assert_eq!(Difficulty::for_score(67), Difficulty::Advanced);
        assert_eq!(Difficulty::for_score(100), Difficulty::Advanced);
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.len(), 15);
        for target in [
            CoachingTarget::Impact,
            CoachingTarget::Sway,
            CoachingTarget::HipMobility,
        ] {
            assert_eq!(catalog.filter(Some(target), None).len(), 5);
            assert_eq!(
                catalog
                    .filter(Some(target), Some(Difficulty::Foundational))
                    .len(),
                2
            );
        }
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_recommend_matches_tier() {
        let catalog = ExerciseCatalog::builtin();
        let picks = catalog.recommend(CoachingTarget::Impact, 45, 2);
        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|e| e.difficulty == Difficulty::Intermediate));
        assert_eq!(picks[0].name, "Eccentric Calf Lowers");
    }

    #[test]
    fn test_recommend_falls_back_to_easier_tier() {
        let catalog = ExerciseCatalog::builtin();
        // only one advanced hip drill, next best is intermediate
        let picks = catalog.recommend(CoachingTarget::HipMobility, 68, 2);
        assert_eq!(picks[0].name, "Cossack Squats");
        assert_eq!(picks[1].difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn test_toml_round_trip_and_errors() {
        let catalog = ExerciseCatalog::builtin();
        let text = catalog.to_toml_string().unwrap();
        let parsed = ExerciseCatalog::from_toml_str(&text).unwrap();
        assert_eq!(parsed, catalog);

        assert!(matches!(
            ExerciseCatalog::from_toml_str("exercises = []"),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            ExerciseCatalog::from_toml_str("not toml at all ["),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
[[exercises]]
name = "Skipping"
target = "impact"
duration = "2 minutes"
difficulty = "foundational"
benefit = "Light, rhythmic landings"
instructions = ["Skip in place", "Stay on the balls of your feet"]
"#,
        )
        .unwrap();

        let catalog = ExerciseCatalog::load_from_file(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.exercises[0].tips, None);
    }
}
