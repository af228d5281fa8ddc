//! Randomize where the correct answer sits in multiple-choice exercises.
//!
//! Works on raw JSON so every field the pipeline does not model survives the
//! rewrite, in its original key order.

use std::path::Path;

use rand::Rng;
use serde_json::Value;

use crate::error::PipelineError;

/// Move each exercise's correct option to a random position.
///
/// The correct option is removed and reinserted at an index drawn uniformly
/// from `0..=remaining.len()`, then `correctAnswerIndex` is updated. Exercises
/// lacking `options` or `correctAnswerIndex`, or whose index is out of range,
/// are left alone. Returns the number of exercises shuffled.
pub fn shuffle_answers<R: Rng>(unit: &mut Value, rng: &mut R) -> usize {
    let Some(exercises) = unit.get_mut("exercises").and_then(Value::as_array_mut) else {
        return 0;
    };

    let mut shuffled = 0;
    for (n, exercise) in exercises.iter_mut().enumerate() {
        let Some(correct) = exercise.get("correctAnswerIndex").and_then(Value::as_u64) else {
            continue;
        };
        let Some(options) = exercise.get_mut("options").and_then(Value::as_array_mut) else {
            continue;
        };

        let correct = correct as usize;
        if correct >= options.len() {
            log::warn!(
                "Exercise {n}: correctAnswerIndex {correct} is out of range for {} options",
                options.len()
            );
            continue;
        }

        let answer = options.remove(correct);
        let new_index = rng.gen_range(0..=options.len());
        options.insert(new_index, answer);
        exercise["correctAnswerIndex"] = Value::from(new_index);
        shuffled += 1;
    }

    shuffled
}

/// Shuffle a unit file in place.
pub fn shuffle_file<R: Rng>(path: &Path, rng: &mut R) -> Result<usize, PipelineError> {
    let content = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let mut unit: Value =
        serde_json::from_str(&content).map_err(|e| PipelineError::json(path, e))?;

    let shuffled = shuffle_answers(&mut unit, rng);

    let out = serde_json::to_string_pretty(&unit).map_err(|e| PipelineError::json(path, e))?;
    std::fs::write(path, out).map_err(|e| PipelineError::io(path, e))?;

    log::info!("Shuffled {shuffled} exercises in {}", path.display());
    Ok(shuffled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn correct_answer_is_tracked_through_shuffle() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut unit = json!({
                "exercises": [{"options": ["A", "B", "C"], "correctAnswerIndex": 1}]
            });

            assert_eq!(shuffle_answers(&mut unit, &mut rng), 1);

            let ex = &unit["exercises"][0];
            let options: Vec<&str> = ex["options"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            let mut sorted = options.clone();
            sorted.sort();
            assert_eq!(sorted, vec!["A", "B", "C"]);

            let idx = ex["correctAnswerIndex"].as_u64().unwrap() as usize;
            assert_eq!(options[idx], "B");
        }
    }

    #[test]
    fn every_position_is_reachable() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let mut unit = json!({
                "exercises": [{"options": ["A", "B", "C"], "correctAnswerIndex": 0}]
            });
            shuffle_answers(&mut unit, &mut rng);
            let idx = unit["exercises"][0]["correctAnswerIndex"].as_u64().unwrap() as usize;
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn leaves_other_exercises_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut unit = json!({
            "exercises": [
                {"tibetanText": "ཀ", "options": ["x", "y"]},
                {"correctAnswerIndex": 0},
                {"options": ["p", "q"], "correctAnswerIndex": 5}
            ]
        });
        let before = unit.clone();
        assert_eq!(shuffle_answers(&mut unit, &mut rng), 0);
        assert_eq!(unit, before);
        assert_eq!(shuffle_answers(&mut json!({"metadata": {}}), &mut rng), 0);
    }

    #[test]
    fn rewrites_file_preserving_fields_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weather.json");
        std::fs::write(
            &path,
            r#"{"title": "གནམ་གཤིས", "exercises": [
                {"id": "q1", "tibetanText": "ཆར་པ", "options": ["rain", "snow", "wind"], "correctAnswerIndex": 0}
            ], "metadata": {"vocabularyIntroduced": ["ཆར་པ(charpa)"]}}"#,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(shuffle_file(&path, &mut rng).unwrap(), 1);

        let written = std::fs::read_to_string(&path).unwrap();
        // Not ASCII-escaped, two-space indent, original key order.
        assert!(written.contains("\"title\": \"གནམ་གཤིས\""));
        assert!(written.starts_with("{\n  \"title\""));
        let title = written.find("\"title\"").unwrap();
        let exercises = written.find("\"exercises\"").unwrap();
        let metadata = written.find("\"metadata\"").unwrap();
        assert!(title < exercises && exercises < metadata);

        let unit: Value = serde_json::from_str(&written).unwrap();
        let ex = &unit["exercises"][0];
        let idx = ex["correctAnswerIndex"].as_u64().unwrap() as usize;
        assert_eq!(ex["options"][idx], "rain");
        assert_eq!(ex["id"], "q1");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            shuffle_file(&path, &mut rng),
            Err(PipelineError::Json { .. })
        ));
    }
}
