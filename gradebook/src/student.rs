//! Student record model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A student with per-course scores
///
/// Scores live in a BTreeMap so listings and JSON output are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    /// Mean of all course scores; 0.0 with no scores
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.values().sum::<f64>() / self.scores.len() as f64
    }
}

/// Parse "Course=Score" pairs from the command line
pub fn parse_scores(args: &[String]) -> anyhow::Result<BTreeMap<String, f64>> {
    let mut parsed = BTreeMap::new();
    for arg in args {
        let Some((course, value)) = arg.split_once('=') else {
            anyhow::bail!("scores must look like Course=Score, e.g. Math=95 (got '{}')", arg);
        };
        let value: f64 = value
            .parse()
            .map_err(|_| anyhow::anyhow!("'{}' is not a number in '{}'", value, arg))?;
        parsed.insert(course.to_string(), value);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average() {
        let mut student = Student::new("Ada");
        assert_eq!(student.average(), 0.0);

        student.scores.insert("Math".to_string(), 90.0);
        student.scores.insert("Physics".to_string(), 80.0);
        assert_eq!(student.average(), 85.0);
    }

    #[test]
    fn test_parse_scores() {
        let args = vec!["Math=95".to_string(), "English=80.5".to_string()];
        let scores = parse_scores(&args).unwrap();
        assert_eq!(scores["Math"], 95.0);
        assert_eq!(scores["English"], 80.5);
    }

    #[test]
    fn test_parse_scores_rejects_bad_input() {
        assert!(parse_scores(&["Math95".to_string()]).is_err());
        assert!(parse_scores(&["Math=high".to_string()]).is_err());
    }
}
